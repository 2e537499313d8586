//! geoenhance CLI - Contrast enhancement and super-resolution for GeoTIFF rasters

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use geoenhance::filter::{BandEnhancer, Clahe, ClaheParams, Equalize};
use geoenhance::io::{TiffCompression, read_geotiff, read_header};
use geoenhance::pipeline::{
    BatchConfig, BatchEvent, ContrastConfig, SuperResConfig, run_batch, run_contrast_with,
    run_superres,
};
use geoenhance::transform::{ChannelMerge, InterpolatingUpsampler, ScaleFilter, Upsampler};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "geoenhance")]
#[command(author, version, about = "Contrast enhancement and super-resolution for GeoTIFF rasters", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a raster file
    Info {
        /// Input raster file
        input: PathBuf,
    },
    /// Contrast-limited adaptive histogram equalization of one band
    Clahe {
        /// Input raster file
        input: PathBuf,
        /// Output file
        output: PathBuf,
        /// Contrast limit; 0 disables clipping
        #[arg(short, long, default_value = "2.0")]
        clip_limit: f32,
        /// Tiles per axis
        #[arg(short, long, default_value = "64")]
        tiles: u32,
        /// Tiles down, when different from --tiles
        #[arg(long)]
        tiles_y: Option<u32>,
        /// Band to enhance (1-based)
        #[arg(short, long, default_value = "1")]
        band: usize,
        /// Output compression: none, lzw, zip, packbits
        #[arg(long, default_value = "none", value_parser = str::parse::<TiffCompression>)]
        compression: TiffCompression,
        /// Use global histogram equalization instead of CLAHE
        #[arg(long)]
        equalize: bool,
    },
    /// Upscale a 1- or 3-band raster
    Superres {
        /// Input raster file
        input: PathBuf,
        /// Output file
        output: PathBuf,
        #[command(flatten)]
        opts: SuperResArgs,
    },
    /// Upscale every GeoTIFF in a directory
    Batch {
        /// Input directory
        input_dir: PathBuf,
        /// Output directory
        output_dir: PathBuf,
        /// Suffix appended to each output file stem
        #[arg(short, long, default_value = "_25cm")]
        suffix: String,
        /// Input file extensions
        #[arg(short, long, default_value = "tif", value_delimiter = ',')]
        extensions: Vec<String>,
        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,
        /// Continue after a failed file
        #[arg(short, long)]
        keep_going: bool,
        #[command(flatten)]
        opts: SuperResArgs,
    },
}

#[derive(Args)]
struct SuperResArgs {
    /// Pre-trained model file; requires the onnx feature [default: EDSR_x4.onnx]
    #[arg(short, long, conflicts_with = "filter")]
    model: Option<PathBuf>,
    /// Interpolate instead of running a model: nearest, triangle, catmull-rom, lanczos3
    #[arg(short, long, value_parser = str::parse::<ScaleFilter>)]
    filter: Option<ScaleFilter>,
    /// Scale factor for --filter
    #[arg(long, default_value = "4")]
    scale: u32,
    /// Single-band channel merge: mean, first
    #[arg(long, default_value = "mean", value_parser = str::parse::<ChannelMerge>)]
    merge: ChannelMerge,
    /// Output compression: none, lzw, zip, packbits
    #[arg(long, default_value = "none", value_parser = str::parse::<TiffCompression>)]
    compression: TiffCompression,
}

impl SuperResArgs {
    fn config(&self) -> SuperResConfig {
        SuperResConfig {
            merge: self.merge,
            compression: self.compression,
            ..SuperResConfig::default()
        }
    }

    /// The model, unless interpolation was asked for with `--filter`
    fn upsampler(&self) -> Result<Box<dyn Upsampler>> {
        if let Some(filter) = self.filter {
            return Ok(Box::new(InterpolatingUpsampler::new(self.scale, filter)?));
        }
        let model = self.model.as_deref().unwrap_or(Path::new(DEFAULT_MODEL));
        load_model(model)
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────

const DEFAULT_MODEL: &str = "EDSR_x4.onnx";

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")
}

#[cfg(feature = "onnx")]
fn load_model(path: &Path) -> Result<Box<dyn Upsampler>> {
    let upsampler = geoenhance::transform::OnnxUpsampler::from_file(path)
        .with_context(|| format!("Failed to load model {}", path.display()))?;
    Ok(Box::new(upsampler))
}

#[cfg(not(feature = "onnx"))]
fn load_model(path: &Path) -> Result<Box<dyn Upsampler>> {
    anyhow::bail!(
        "Cannot load {}: geoenhance was built without the onnx feature \
         (use --filter to interpolate instead)",
        path.display()
    )
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn info_cmd(input: &Path) -> Result<()> {
    let header = read_header(input).context("Failed to read header")?;
    let raster = read_geotiff(input).context("Failed to read raster")?;
    let gt = raster.geo_transform();
    let (min_x, min_y, max_x, max_y) = gt.bounds(raster.width() as usize, raster.height() as usize);

    println!("File: {}", input.display());
    println!("Driver: {}", raster.format());
    println!(
        "Dimensions: {} x {}, {} band(s)",
        raster.width(),
        raster.height(),
        raster.band_count()
    );
    println!("Type: {}", raster.sample_type().gdal_name());
    match header.compression() {
        Some(c) => println!("Compression: {}", c.name()),
        None => println!("Compression: tag {}", header.compression_tag),
    }
    println!("GeoTransform: {}", gt);
    println!(
        "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
        min_x, min_y, max_x, max_y
    );
    match raster.spatial_ref() {
        Some(srs) => println!("CRS: {}", srs.description()),
        None => println!("CRS: none"),
    }
    if let Some(nodata) = raster.nodata() {
        println!("NoData: {}", nodata);
    }

    for (i, band) in raster.bands().iter().enumerate() {
        println!("\nBand {}:", i + 1);
        if let Some((min, max)) = band.min_max() {
            println!("  Min: {:.4}", min);
            println!("  Max: {:.4}", max);
        }
        if let Some(mean) = band.mean() {
            println!("  Mean: {:.4}", mean);
        }
        println!(
            "  Valid cells: {} ({:.1}%)",
            band.valid_count(),
            100.0 * band.valid_count() as f64 / band.len() as f64
        );
    }
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Info { input } => info_cmd(&input)?,

        Commands::Clahe {
            input,
            output,
            clip_limit,
            tiles,
            tiles_y,
            band,
            compression,
            equalize,
        } => {
            let config = ContrastConfig {
                band,
                clahe: ClaheParams::new(clip_limit, tiles, tiles_y.unwrap_or(tiles)),
                compression,
            };
            let enhancer: Box<dyn BandEnhancer> = if equalize {
                Box::new(Equalize::default())
            } else {
                Box::new(Clahe::new(config.clahe))
            };
            let start = Instant::now();
            run_contrast_with(&input, &output, &config, enhancer.as_ref())
                .context("Failed to enhance contrast")?;
            done("Enhanced image", &output, start.elapsed());
        }

        Commands::Superres {
            input,
            output,
            opts,
        } => {
            let config = opts.config();
            let mut upsampler = opts.upsampler()?;
            info!("Upsampler: {} x{}", upsampler.name(), upsampler.scale());
            let start = Instant::now();
            run_superres(&input, &output, upsampler.as_mut(), &config)
                .with_context(|| format!("Failed to process {}", input.display()))?;
            done("Super-resolved image", &output, start.elapsed());
        }

        Commands::Batch {
            input_dir,
            output_dir,
            suffix,
            extensions,
            recursive,
            keep_going,
            opts,
        } => {
            let batch = BatchConfig {
                input_dir,
                output_dir,
                suffix,
                extensions,
                recursive,
                keep_going,
            };
            let config = opts.config();
            let mut upsampler = opts.upsampler()?;
            info!("Upsampler: {} x{}", upsampler.name(), upsampler.scale());

            let pb = ProgressBar::new(0);
            pb.set_style(
                ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
                    .context("invalid progress template")?,
            );
            let report = run_batch(&batch, &config, upsampler.as_mut(), |event| match event {
                BatchEvent::Started { total, path, .. } => {
                    pb.set_length(*total as u64);
                    pb.set_message(path.display().to_string());
                }
                BatchEvent::Finished { .. } => pb.inc(1),
                BatchEvent::Failed { path, error, .. } => {
                    pb.println(format!("Failed: {}: {}", path.display(), error));
                    pb.inc(1);
                }
            });
            pb.finish_and_clear();
            let report = report.context("Batch stopped")?;

            println!(
                "Processing completed. Total processing time: {:.2?}",
                report.elapsed
            );
            println!("  Processed: {}, failed: {}", report.processed, report.failed());
            if !report.is_success() {
                for (path, error) in &report.failures {
                    warn!("{}: {}", path.display(), error);
                }
                anyhow::bail!("{} file(s) failed", report.failed());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn superres_opts(args: &[&str]) -> Result<SuperResArgs, clap::Error> {
        let argv = ["geoenhance", "superres", "in.tif", "out.tif"]
            .iter()
            .chain(args)
            .copied();
        match Cli::try_parse_from(argv)?.command {
            Commands::Superres { opts, .. } => Ok(opts),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_bad_values_fail_at_parse_time() {
        assert!(superres_opts(&["--merge", "median"]).is_err());
        assert!(superres_opts(&["--compression", "jpeg"]).is_err());
        assert!(superres_opts(&["--filter", "sinc"]).is_err());
        assert!(superres_opts(&["--model", "m.onnx", "--filter", "nearest"]).is_err());

        let opts = superres_opts(&["--merge", "first", "--compression", "LZW"]).unwrap();
        let config = opts.config();
        assert_eq!(config.merge, ChannelMerge::First);
        assert_eq!(config.compression, TiffCompression::Lzw);
    }

    #[test]
    fn test_filter_selects_interpolation() {
        let opts = superres_opts(&["--filter", "bicubic", "--scale", "2"]).unwrap();
        let upsampler = opts.upsampler().unwrap();
        assert_eq!(upsampler.name(), "catmull-rom");
        assert_eq!(upsampler.scale(), 2);
    }

    #[test]
    fn test_missing_model_is_an_error() {
        let opts = superres_opts(&["--model", "/nonexistent/EDSR_x4.onnx"]).unwrap();
        assert!(opts.upsampler().is_err());
    }
}
