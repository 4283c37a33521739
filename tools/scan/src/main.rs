//! Land-cover scan of drone photos.
//! Decodes each image, reports the share of healthy vegetation, dry
//! vegetation, and bare soil plus mean RGB, and optionally writes a JSON report.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use landcover_core::decode::{is_supported_extension, open_image};
use landcover_core::{channel_means, CategoryTable, ChannelMeans, Classification, LandCoverClassifier};
use rayon::prelude::*;
use serde::Serialize;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "scan", about = "Estimate vegetation and soil cover in drone photos")]
struct Args {
    /// PNG or JPEG images to analyse.
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// JSON category table replacing the built-in land-cover thresholds.
    #[arg(short, long)]
    table: Option<PathBuf>,

    /// Write the JSON report here instead of only printing a summary.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON report.
    #[arg(long)]
    pretty: bool,
}

// ── Report ────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ImageReport {
    image: String,
    /// Present when the image passed the classifier's format checks.
    cover: Option<Classification>,
    channel_means: Option<ChannelMeans>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn load_table(path: Option<&Path>) -> Result<CategoryTable> {
    match path {
        None => Ok(CategoryTable::land_cover()),
        Some(p) => {
            let json = fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            CategoryTable::from_json(&json).with_context(|| format!("parsing {}", p.display()))
        }
    }
}

fn analyse(path: &Path, classifier: &LandCoverClassifier) -> ImageReport {
    let image = path.display().to_string();
    let raster = match open_image(path) {
        Ok(r) => r,
        Err(e) => {
            log::warn!("skipping {image}: {e}");
            return ImageReport { image, cover: None, channel_means: None, error: Some(e.to_string()) };
        }
    };

    let means = channel_means(&raster).ok();
    match classifier.classify(&raster) {
        Ok(cover) => ImageReport { image, cover: Some(cover), channel_means: means, error: None },
        Err(e) => {
            log::warn!("{image}: {e}");
            ImageReport { image, cover: None, channel_means: means, error: Some(e.to_string()) }
        }
    }
}

fn print_report(r: &ImageReport) {
    println!("{}", r.image);
    if let Some(m) = &r.channel_means {
        println!("  mean RGB     {:.1} / {:.1} / {:.1}", m.red, m.green, m.blue);
    }
    match (&r.cover, &r.error) {
        (Some(cover), _) => {
            for share in cover.iter() {
                println!("  {:<20} {:.1}%", share.name, share.percent);
            }
        }
        (None, Some(err)) => println!("  error: {err}"),
        (None, None) => {}
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let table = load_table(args.table.as_deref())?;
    let classifier = LandCoverClassifier::new(table);

    let (images, skipped): (Vec<&PathBuf>, Vec<&PathBuf>) =
        args.images.iter().partition(|p| is_supported_extension(p));
    for p in &skipped {
        log::warn!("skipping {}: not a PNG or JPEG file", p.display());
    }
    log::info!("analysing {} image(s) with {} categories", images.len(), classifier.table().len());

    let reports: Vec<ImageReport> = images.par_iter().map(|p| analyse(p, &classifier)).collect();

    for r in &reports {
        print_report(r);
    }

    if let Some(out) = &args.output {
        let json = if args.pretty {
            serde_json::to_string_pretty(&reports)?
        } else {
            serde_json::to_string(&reports)?
        };
        fs::write(out, json).with_context(|| format!("writing {}", out.display()))?;
        log::info!("report written to {}", out.display());
    }

    let classified = reports.iter().filter(|r| r.cover.is_some()).count();
    if classified == 0 {
        bail!("no image could be classified");
    }
    log::info!("classified {classified}/{} image(s)", args.images.len());
    Ok(())
}
