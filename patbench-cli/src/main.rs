fn main() {
    std::process::exit(patbench_cli::run());
}
