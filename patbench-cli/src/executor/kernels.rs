//! Kernel Drivers
//!
//! One driver per subcommand. Each loads or generates its inputs, hands a
//! timed body to the [`Runner`], then writes any output the kernel produces.

use super::{RunPlan, Runner};
use crate::signal;
use crate::{BlurArgs, DgemvArgs, KernelCommand, MandelbrotArgs, MergesortArgs, SensorArgs};
use anyhow::Context;
use patbench_core::{ExecutionPolicy, WindowConfig};
use patbench_kernels::io::load_kernel;
use patbench_kernels::{BmpImage, DataGen, MandelbrotParams, Sensor};
use patbench_kernels::{blur, dgemv, mandelbrot, mergesort, sensor};
use patbench_report::RunRecord;
use std::collections::BTreeMap;
use std::io::{self, BufWriter, Write};

/// Timings and parameters of one kernel invocation
#[derive(Debug, Clone)]
pub struct KernelOutcome {
    /// Kernel name
    pub kernel: &'static str,
    /// Kernel-specific parameters, for the report
    pub parameters: BTreeMap<String, String>,
    /// One record per timed run
    pub runs: Vec<RunRecord>,
}

/// Run `command` under `policy`
pub fn execute(
    command: &KernelCommand,
    policy: &ExecutionPolicy,
    seed: Option<u64>,
    plan: RunPlan,
) -> anyhow::Result<KernelOutcome> {
    let runner = Runner::new(plan);
    match command {
        KernelCommand::Blur(args) => run_blur(args, policy, &runner),
        KernelCommand::Dgemv(args) => run_dgemv(args, policy, seed, &runner),
        KernelCommand::Mandelbrot(args) => run_mandelbrot(args, policy, &runner),
        KernelCommand::Mergesort(args) => run_mergesort(args, policy, seed, &runner),
        KernelCommand::Sensor(args) => {
            let runner = runner.with_cancel(signal::interrupt_token());
            run_sensor(args, policy, &runner)
        }
    }
}

fn params<const N: usize>(pairs: [(&str, String); N]) -> BTreeMap<String, String> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn run_blur(
    args: &BlurArgs,
    policy: &ExecutionPolicy,
    runner: &Runner,
) -> anyhow::Result<KernelOutcome> {
    let kernel = load_kernel(&args.kernel)?;
    let image = BmpImage::read(&args.input)?;
    tracing::info!(
        input = %args.input.display(),
        width = image.width(),
        height = image.height(),
        kernel_side = kernel.side(),
        "blur"
    );

    let mut result = None;
    let runs = runner.run("blur", || {
        result = Some(blur::blur(&image, &kernel, policy)?);
        Ok(())
    })?;

    if let Some(blurred) = result {
        blurred.write(&args.destination)?;
    }

    Ok(KernelOutcome {
        kernel: "blur",
        parameters: params([
            ("kernel", args.kernel.display().to_string()),
            ("input", args.input.display().to_string()),
            ("output", args.destination.display().to_string()),
            ("width", image.width().to_string()),
            ("height", image.height().to_string()),
        ]),
        runs,
    })
}

fn run_dgemv(
    args: &DgemvArgs,
    policy: &ExecutionPolicy,
    seed: Option<u64>,
    runner: &Runner,
) -> anyhow::Result<KernelOutcome> {
    let mut data = DataGen::new(seed);
    let mat = data.matrix(args.rows, args.cols);
    let vec = data.vector(args.cols);
    tracing::info!(rows = args.rows, cols = args.cols, "dgemv");

    let mut checksum = 0.0;
    let runs = runner.run("dgemv", || {
        let res = dgemv::dgemv(&mat, &vec, policy)?;
        checksum = res.iter().sum();
        Ok(())
    })?;
    tracing::debug!(checksum, "dgemv result");

    Ok(KernelOutcome {
        kernel: "dgemv",
        parameters: params([
            ("rows", args.rows.to_string()),
            ("cols", args.cols.to_string()),
        ]),
        runs,
    })
}

fn run_mandelbrot(
    args: &MandelbrotArgs,
    policy: &ExecutionPolicy,
    runner: &Runner,
) -> anyhow::Result<KernelOutcome> {
    let params_in = MandelbrotParams::new(args.width, args.height);
    tracing::info!(width = args.width, height = args.height, "mandelbrot");

    let mut pixels = Vec::new();
    let runs = runner.run("mandelbrot", || {
        pixels = mandelbrot::render(&params_in, policy);
        Ok(())
    })?;

    mandelbrot::to_bitmap(&params_in, &pixels)?.write(&args.destination)?;

    Ok(KernelOutcome {
        kernel: "mandelbrot",
        parameters: params([
            ("width", args.width.to_string()),
            ("height", args.height.to_string()),
            ("output", args.destination.display().to_string()),
        ]),
        runs,
    })
}

fn run_mergesort(
    args: &MergesortArgs,
    policy: &ExecutionPolicy,
    seed: Option<u64>,
    runner: &Runner,
) -> anyhow::Result<KernelOutcome> {
    let sequence = DataGen::new(seed).integers(args.size);
    tracing::info!(size = args.size, "mergesort");

    if args.print {
        println!("Original sequence: {}", mergesort::format_sequence(&sequence));
    }

    let mut sorted = Vec::new();
    let runs = runner.run("mergesort", || {
        sorted = mergesort::sort(&sequence, policy);
        Ok(())
    })?;

    if args.print {
        println!("Result sequence: {}", mergesort::format_sequence(&sorted));
    }

    Ok(KernelOutcome {
        kernel: "mergesort",
        parameters: params([("size", args.size.to_string())]),
        runs,
    })
}

fn run_sensor(
    args: &SensorArgs,
    policy: &ExecutionPolicy,
    runner: &Runner,
) -> anyhow::Result<KernelOutcome> {
    let config = WindowConfig {
        window_size: args.window_size,
        slide: args.slide,
        item_count: args.items,
    };
    config.validate()?;
    let cancel = signal::interrupt_token();
    tracing::info!(
        window_size = args.window_size,
        slide = args.slide,
        items = args.items,
        "sensor"
    );

    let mut windows = 0;
    let runs = runner.run("sensor", || {
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        let mut write_err = None;
        let stats = sensor::moving_average(
            config,
            cancel.clone(),
            &mut Sensor::new(),
            |avg| {
                if !args.quiet && write_err.is_none() {
                    if let Err(e) = writeln!(out, "{}", avg) {
                        write_err = Some(e);
                    }
                }
            },
            policy,
        )?;
        if let Some(e) = write_err {
            return Err(e).context("Failed to write moving averages");
        }
        out.flush().context("Failed to write moving averages")?;
        if stats.cancelled {
            tracing::warn!(windows = stats.windows, "sensor stream interrupted");
        }
        windows = stats.windows;
        Ok(())
    })?;
    tracing::debug!(windows, "sensor finished");

    Ok(KernelOutcome {
        kernel: "sensor",
        parameters: params([
            ("window_size", args.window_size.to_string()),
            ("slide", args.slide.to_string()),
            ("items", args.items.to_string()),
        ]),
        runs,
    })
}
