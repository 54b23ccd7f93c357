use ellipack::{bench_pair_phase, bench_separation_curve};
use ellipack::{generate, GenerationConfig, PackError};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rayon::prelude::*;

use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Run configuration YAML; built-in defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for image<i>.tif / label<i>.npy
    #[arg(short, long, default_value = "out")]
    output: PathBuf,

    /// Number of volumes to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// Base seed, overriding the configured one; run i uses seed + i
    #[arg(short, long)]
    seed: Option<u64>,

    /// Worker threads for the batch (default: one per core)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Run the collision-phase benchmarks instead of generating
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_config(args: &Args) -> Result<GenerationConfig> {
    let cfg = match &args.config {
        Some(path) => GenerationConfig::from_yaml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => GenerationConfig::default(),
    };
    Ok(cfg)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.bench {
        bench_pair_phase();
        bench_separation_curve();
        return Ok(());
    }

    let mut cfg = load_config(&args)?;
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    cfg.validate()?;

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()?;
    }
    fs::create_dir_all(&args.output)?;

    // Runs are independent, one per seed, fanned out over the pool
    let instances: Vec<usize> = (0..args.count)
        .into_par_iter()
        .map(|i| {
            let volume = generate(&cfg, cfg.seed + i as u64)?;
            volume.save(&args.output, i)?;
            Ok::<usize, PackError>(volume.instances)
        })
        .collect::<Result<_, _>>()?;

    info!(
        "wrote {} volumes to {}, {} instances total",
        args.count,
        args.output.display(),
        instances.iter().sum::<usize>()
    );
    Ok(())
}
