use anyhow::{bail, Context, Result};
use chroma_alpha::{
    matte_to_rgba, process_with_matte, FileSource, HsvBound, ImageSource, KeyParams, OutputSink,
    PngFileOutput, Preset,
};
use clap::Parser;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Green-screen images to key
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file (single input only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for `<name>_transparent.png` outputs
    /// Defaults to the directory of each input
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// JSON preset with keying parameters; flags below override it
    #[arg(long)]
    preset: Option<PathBuf>,

    /// Green spill removal strength (0.0 to 1.0)
    #[arg(long)]
    despill: Option<f64>,

    /// Edge feather size in pixels (even values are rounded up to odd, 0 disables)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=KeyParams::FEATHER_MAX as i64))]
    feather: Option<u32>,

    /// Erosion passes over the background mask
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=KeyParams::ERODE_MAX as i64))]
    erode: Option<u32>,

    /// Dilation passes over the background mask
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=KeyParams::DILATE_MAX as i64))]
    dilate: Option<u32>,

    /// Lower HSV bound of the key color as H,S,V (hue 0-179)
    #[arg(long)]
    lower: Option<HsvBound>,

    /// Upper HSV bound of the key color as H,S,V (hue 0-179)
    #[arg(long)]
    upper: Option<HsvBound>,

    /// Write the alpha matte as a grayscale image instead of the keyed result
    #[arg(long)]
    show_matte: bool,

    /// Worker threads for batch processing (defaults to one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

/// Time spent in each step of one image
#[derive(Debug, Default, Clone, Copy)]
struct Timings {
    decode: Duration,
    key: Duration,
    encode: Duration,
}

impl std::ops::Add for Timings {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            decode: self.decode + other.decode,
            key: self.key + other.key,
            encode: self.encode + other.encode,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let params = build_params(args)?;
    tracing::debug!("Keying parameters: {:?}", params);

    let jobs = plan_outputs(args)?;
    if let [(input, output)] = jobs.as_slice() {
        key_file(input, output, params, args.show_matte)?;
        return Ok(());
    }

    run_batch(args, &jobs, params)
}

/// Pair every input with the file it will be written to.
///
/// Two inputs that would land on the same output are rejected up front.
fn plan_outputs(args: &Args) -> Result<Vec<(PathBuf, PathBuf)>> {
    if let Some(output) = &args.output {
        if args.out_dir.is_some() {
            bail!("--output and --out-dir cannot be combined");
        }
        let [input] = args.inputs.as_slice() else {
            bail!("--output only works with a single input; use --out-dir for batches");
        };
        return Ok(vec![(input.clone(), output.clone())]);
    }

    let mut seen: HashMap<PathBuf, &Path> = HashMap::new();
    let mut jobs = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        let output = default_output_path(input, args.out_dir.as_deref());
        if let Some(previous) = seen.insert(output.clone(), input.as_path()) {
            bail!(
                "{} and {} would both be written to {}",
                previous.display(),
                input.display(),
                output.display()
            );
        }
        jobs.push((input.clone(), output));
    }
    Ok(jobs)
}

/// Defaults, then the preset, then explicit flags
fn build_params(args: &Args) -> Result<KeyParams> {
    let mut params = KeyParams::default();

    if let Some(path) = &args.preset {
        tracing::info!("Loading preset from {}", path.display());
        let preset = Preset::load(path)
            .with_context(|| format!("Failed to load preset {}", path.display()))?;
        params = preset.apply(params).context("Invalid preset")?;
    }

    if let Some(despill) = args.despill {
        params = params.with_despill_strength(despill);
    }
    if let Some(feather) = args.feather {
        params = params.with_feather(feather);
    }
    if let Some(erode) = args.erode {
        params = params.with_erode_iterations(erode);
    }
    if let Some(dilate) = args.dilate {
        params = params.with_dilate_iterations(dilate);
    }
    params = params.with_bounds(
        args.lower.unwrap_or(params.lower),
        args.upper.unwrap_or(params.upper),
    );

    params.validate().context("Invalid keying parameters")?;
    Ok(params)
}

fn default_output_path(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let dir = out_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(format!("{}_transparent.png", stem))
}

fn key_file(input: &Path, output: &Path, params: KeyParams, show_matte: bool) -> Result<Timings> {
    let decode_start = Instant::now();
    let image = FileSource::new(input)
        .load()
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let decode = decode_start.elapsed();

    let key_start = Instant::now();
    let keyed = process_with_matte(&image, params)
        .with_context(|| format!("Failed to key {}", input.display()))?;
    let key = key_start.elapsed();

    let encode_start = Instant::now();
    let result = if show_matte {
        matte_to_rgba(&keyed.matte)
    } else {
        keyed.image
    };
    PngFileOutput::new(output)
        .write_image(&result)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    let encode = encode_start.elapsed();

    tracing::info!("Processed: {} -> {}", input.display(), output.display());

    Ok(Timings {
        decode,
        key,
        encode,
    })
}

fn run_batch(args: &Args, jobs: &[(PathBuf, PathBuf)], params: KeyParams) -> Result<()> {
    if let Some(num_threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .context("Failed to configure thread pool")?;
        tracing::info!("Using {} threads", num_threads);
    }

    if let Some(dir) = &args.out_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    tracing::info!("Keying {} images", jobs.len());
    let batch_start = Instant::now();

    let results: Vec<Result<Timings>> = jobs
        .par_iter()
        .map(|(input, output)| key_file(input, output, params, args.show_matte))
        .collect();

    let mut total = Timings::default();
    let mut succeeded = 0u32;
    let mut failed = 0u32;
    for result in results {
        match result {
            Ok(timings) => {
                total = total + timings;
                succeeded += 1;
            }
            Err(e) => {
                tracing::error!("{:#}", e);
                failed += 1;
            }
        }
    }

    if succeeded > 0 {
        let avg_ms = |d: Duration| d.as_secs_f64() * 1000.0 / f64::from(succeeded);
        tracing::info!(
            "Batch: {} ok, {} failed in {:.1}s (avg decode={:.1}ms, key={:.1}ms, encode={:.1}ms)",
            succeeded,
            failed,
            batch_start.elapsed().as_secs_f64(),
            avg_ms(total.decode),
            avg_ms(total.key),
            avg_ms(total.encode)
        );
    }

    if failed > 0 {
        bail!("{} of {} images failed", failed, jobs.len());
    }
    Ok(())
}
