use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use dog_cli::{Config, ScaleSpace, ScaleSpaceError, ScaleSpaceResult, draw_keypoints, dump_pyramid, grid_from_luma8};
use image::ImageReader;
use log::{error, info};

const USAGE: &str = "usage: dogspace <input> [output] [--config FILE.json|FILE.toml] [--dump-pyramid DIR]";

#[derive(Debug)]
struct Args {
    input: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    dump_dir: Option<PathBuf>,
}

fn parse_args(mut raw: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut config: Option<PathBuf> = None;
    let mut dump_dir: Option<PathBuf> = None;
    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--config" => config = Some(raw.next().ok_or("--config needs a file")?.into()),
            "--dump-pyramid" => dump_dir = Some(raw.next().ok_or("--dump-pyramid needs a directory")?.into()),
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with("--") => return Err(format!("unknown option {}", flag)),
            _ => positional.push(PathBuf::from(arg)),
        }
    }
    let mut positional = positional.into_iter();
    let input = positional.next().ok_or_else(|| USAGE.to_string())?;
    let output = positional.next();
    if positional.next().is_some() {
        return Err(USAGE.to_string());
    }
    Ok(Args {
        input,
        output,
        config,
        dump_dir,
    })
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("image");
    input.with_file_name(format!("{}_keypoints.png", stem))
}

#[cfg(feature = "serde")]
fn load_config(path: Option<&Path>) -> ScaleSpaceResult<Config> {
    match path {
        Some(p) => dog_cli::load_config(p),
        None => Ok(Config::reference_preset()),
    }
}

#[cfg(not(feature = "serde"))]
fn load_config(path: Option<&Path>) -> ScaleSpaceResult<Config> {
    match path {
        Some(_) => Err(ScaleSpaceError::Config("built without the serde feature".to_string())),
        None => Ok(Config::reference_preset()),
    }
}

fn run(args: Args) -> ScaleSpaceResult<()> {
    let config = load_config(args.config.as_deref())?;
    info!("{}", config.summary());
    let factor = config.core.downsampling_factor;
    let space = ScaleSpace::new(config)?;

    let img = ImageReader::open(&args.input)?.decode()?.to_luma8();
    let grid = grid_from_luma8(&img)?;

    // Time the full pipeline
    let t0 = Instant::now();
    let report = space.detect_with_report(&grid)?;
    let elapsed = t0.elapsed();

    info!("Time taken: {:.2?}", elapsed);
    info!(
        "Detected {} keypoints ({} extrema, {} low contrast, {} on edges)",
        report.keypoints.len(),
        report.stats.extrema,
        report.stats.rejected_low_contrast,
        report.stats.rejected_edge
    );

    if let Some(dir) = &args.dump_dir {
        dump_pyramid(&report, dir)?;
    }

    let output_path = args.output.unwrap_or_else(|| default_output(&args.input));
    draw_keypoints(&img, &report.keypoints(), factor).save(&output_path)?;
    info!("Saved result image as {}", output_path.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            if let ScaleSpaceError::Dog(inner) = &e {
                error!("kind: {:?}", inner.kind());
            }
            ExitCode::FAILURE
        }
    }
}
