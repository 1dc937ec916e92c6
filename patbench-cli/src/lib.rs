#![warn(missing_docs)]
//! Patbench CLI Library
//!
//! Command-line front end for the patbench kernels. Each subcommand selects
//! a kernel, an execution backend and the kernel's sizing; global options
//! control repetition and report output.
//!
//! ```text
//! patbench --repeat 5 --format json mergesort 1000000 --mode tbb --threads 8
//! ```
//!
//! On success the last line on standard output is
//! `Execution time: <ms> milliseconds`. Any error prints to standard error
//! and exits with code −1.

mod config;
mod executor;
mod signal;

pub use config::*;
pub use executor::{
    KernelOutcome, RunPlan, Runner, build_report_meta, execute, format_human_output, system_info,
};
pub use signal::interrupt_token;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use patbench_core::{ExecutionPolicy, resolve};
use patbench_report::{
    OutputFormat, Report, RunConfig, generate_csv_report, generate_json_report,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Process exit code for usage, configuration and format errors
pub const EXIT_FAILURE: i32 = -1;

/// Patbench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "patbench")]
#[command(author, version, about = "Patbench - parallel pattern benchmarks")]
pub struct Cli {
    /// Kernel to run
    #[command(subcommand)]
    pub command: Commands,

    /// Timed repetitions (default from config, else 1)
    #[arg(long, global = true)]
    pub repeat: Option<usize>,

    /// Untimed warmup repetitions (default from config, else 0)
    #[arg(long, global = true)]
    pub warmup: Option<usize>,

    /// Report format: human, json, csv
    #[arg(long, global = true)]
    pub format: Option<String>,

    /// Report file (stdout if not specified)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Configuration file (default: discover patbench.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Seed for generated inputs
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default patbench.toml to the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Benchmark kernels
    #[command(flatten)]
    Kernel(KernelCommand),
}

/// Benchmark kernels
#[derive(Subcommand, Debug, Clone)]
pub enum KernelCommand {
    /// Blur a 24-bit BMP with a square convolution kernel
    Blur(BlurArgs),
    /// Dense matrix-vector product on random data
    Dgemv(DgemvArgs),
    /// Render the Mandelbrot set to a BMP
    Mandelbrot(MandelbrotArgs),
    /// Merge sort a random integer sequence
    Mergesort(MergesortArgs),
    /// Moving average over a counter sensor
    Sensor(SensorArgs),
}

impl KernelCommand {
    /// Backend selection shared by every kernel
    pub fn policy_args(&self) -> &PolicyArgs {
        match self {
            KernelCommand::Blur(a) => &a.policy,
            KernelCommand::Dgemv(a) => &a.policy,
            KernelCommand::Mandelbrot(a) => &a.policy,
            KernelCommand::Mergesort(a) => &a.policy,
            KernelCommand::Sensor(a) => &a.policy,
        }
    }
}

/// Execution backend selection
#[derive(Args, Debug, Clone, Default)]
pub struct PolicyArgs {
    /// Backend: seq, thr, omp, tbb
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Worker threads; 0 = all available cores
    #[arg(short, long)]
    pub threads: Option<usize>,
}

/// `blur` arguments
#[derive(Args, Debug, Clone)]
pub struct BlurArgs {
    /// Kernel file: odd count of whitespace-separated integers
    pub kernel: PathBuf,
    /// Input bitmap
    pub input: PathBuf,
    /// Output bitmap
    #[arg(value_name = "OUTPUT")]
    pub destination: PathBuf,
    #[command(flatten)]
    #[allow(missing_docs)]
    pub policy: PolicyArgs,
}

/// `dgemv` arguments
#[derive(Args, Debug, Clone)]
pub struct DgemvArgs {
    /// Matrix rows
    pub rows: usize,
    /// Matrix columns (and vector length)
    pub cols: usize,
    #[command(flatten)]
    #[allow(missing_docs)]
    pub policy: PolicyArgs,
}

/// `mandelbrot` arguments
#[derive(Args, Debug, Clone)]
pub struct MandelbrotArgs {
    /// Image width in pixels
    pub width: usize,
    /// Image height in pixels
    pub height: usize,
    /// Output bitmap
    #[arg(value_name = "OUTPUT")]
    pub destination: PathBuf,
    #[command(flatten)]
    #[allow(missing_docs)]
    pub policy: PolicyArgs,
}

/// `mergesort` arguments
#[derive(Args, Debug, Clone)]
pub struct MergesortArgs {
    /// Sequence length
    pub size: usize,
    /// Print the original and sorted sequences
    #[arg(long)]
    pub print: bool,
    #[command(flatten)]
    #[allow(missing_docs)]
    pub policy: PolicyArgs,
}

/// `sensor` arguments
#[derive(Args, Debug, Clone)]
pub struct SensorArgs {
    /// Samples per window
    pub window_size: usize,
    /// Samples evicted between windows
    pub slide: usize,
    /// Sample budget
    pub items: u64,
    /// Do not print each average
    #[arg(short, long)]
    pub quiet: bool,
    #[command(flatten)]
    #[allow(missing_docs)]
    pub policy: PolicyArgs,
}

/// Run the patbench CLI on the process arguments.
///
/// Returns the process exit code: 0 on success, [`EXIT_FAILURE`] otherwise.
pub fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() { EXIT_FAILURE } else { 0 };
        }
    };
    match run_with_cli(cli) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_FAILURE
        }
    }
}

/// Run the patbench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Init { force } => init_config(Path::new(CONFIG_FILE_NAME), *force),
        Commands::Kernel(command) => {
            let config = PatbenchConfig::resolve(cli.config.as_deref())?;
            run_kernel(&cli, command, &config)
        }
    }
}

/// Install the global subscriber; `RUST_LOG` overrides the default filter
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "patbench=debug"
    } else {
        "patbench=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A subscriber may already be installed when embedded (tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    std::fs::write(path, PatbenchConfig::default_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Settings after layering defaults, config file and command line
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Backend name
    pub mode: String,
    /// Worker count; 0 = all cores
    pub threads: usize,
    /// Repetitions
    pub plan: RunPlan,
    /// Seed for generated inputs
    pub seed: Option<u64>,
    /// Report format
    pub format: OutputFormat,
}

impl Settings {
    /// Layer CLI flags over config values
    pub fn resolve(
        cli: &Cli,
        policy: &PolicyArgs,
        config: &PatbenchConfig,
    ) -> anyhow::Result<Self> {
        let format = match &cli.format {
            Some(name) => name
                .parse::<OutputFormat>()
                .map_err(|e| anyhow::anyhow!(e))?,
            None => config.output.format,
        };
        Ok(Self {
            mode: policy
                .mode
                .clone()
                .unwrap_or_else(|| config.runner.mode.clone()),
            threads: policy.threads.unwrap_or(config.runner.threads),
            plan: RunPlan {
                repeat: cli.repeat.unwrap_or(config.runner.repeat).max(1),
                warmup: cli.warmup.unwrap_or(config.runner.warmup),
            },
            seed: cli.seed.or(config.runner.seed),
            format,
        })
    }

    /// Resolve the execution policy
    pub fn policy(&self) -> anyhow::Result<ExecutionPolicy> {
        resolve(&self.mode, self.threads)
            .with_context(|| format!("Invalid execution mode '{}'", self.mode))
    }
}

fn run_kernel(cli: &Cli, command: &KernelCommand, config: &PatbenchConfig) -> anyhow::Result<()> {
    let settings = Settings::resolve(cli, command.policy_args(), config)?;
    let policy = settings.policy()?;
    tracing::info!(
        policy = %policy,
        repeat = settings.plan.repeat,
        warmup = settings.plan.warmup,
        "starting"
    );

    let outcome = execute(command, &policy, settings.seed, settings.plan)?;

    let run_config = RunConfig {
        kernel: outcome.kernel.to_string(),
        policy: policy.to_string(),
        repeat: settings.plan.repeat,
        warmup: settings.plan.warmup,
        seed: settings.seed,
        parameters: outcome.parameters,
    };
    let report = Report::new(build_report_meta(), run_config, outcome.runs);

    let show_report =
        settings.plan.repeat > 1 || settings.format != OutputFormat::Human || cli.output.is_some();
    if show_report {
        let output = render(&report, settings.format)?;
        if let Some(ref path) = cli.output {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            file.write_all(output.as_bytes())?;
            println!("Report written to: {}", path.display());
        } else {
            print!("{}", output);
        }
    }

    if config.output.save_report {
        let path = save_report(&report, Path::new(&config.output.directory))?;
        tracing::info!(path = %path.display(), "report saved");
    }

    println!(
        "Execution time: {} milliseconds",
        report.summary.execution_time_ms
    );
    Ok(())
}

/// Render `report` in `format`
pub fn render(report: &Report, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => {
            let mut json = generate_json_report(report)?;
            json.push('\n');
            json
        }
        OutputFormat::Csv => generate_csv_report(report),
        OutputFormat::Human => format_human_output(report),
    })
}

/// Write `report` as JSON into `directory`, named by kernel and timestamp
pub fn save_report(report: &Report, directory: &Path) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create {}", directory.display()))?;
    let name = format!(
        "{}-{}.json",
        report.config.kernel,
        report.meta.timestamp.format("%Y%m%dT%H%M%S%.3fZ")
    );
    let path = directory.join(name);
    std::fs::write(&path, generate_json_report(report)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
