use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use gangsheet_core::decode::{SourceFormat, decode_artwork};
use gangsheet_core::prelude::*;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use tracing::{error, info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "gangsheet",
    about = "Lay out DTF gang sheets on a fixed-width roll",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --progress false or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print billable length, cost and auto-fill advice
    Quote(SheetArgs),
    /// Write the gang sheet (PNG and/or PDF) plus a JSON manifest
    Build(BuildArgs),
}

#[derive(Args, Debug, Clone)]
struct SheetArgs {
    // Input
    /// Artwork files or directories
    #[arg(help_heading = "Input")]
    inputs: Vec<PathBuf>,
    /// YAML job file (artworks, job details, roll overrides)
    #[arg(long, help_heading = "Input")]
    job: Option<PathBuf>,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input")]
    exclude: Vec<String>,
    /// Copies of each artwork given on the command line
    #[arg(long, default_value_t = 1, help_heading = "Input")]
    qty: usize,
    /// Print width in inches for command-line artworks (height keeps the aspect ratio)
    #[arg(long, help_heading = "Input")]
    width: Option<f64>,
    /// Trim fully transparent borders before sizing
    #[arg(long, default_value_t = false, help_heading = "Input")]
    trim: bool,
    /// Alpha at or below this value counts as transparent when trimming
    #[arg(long, default_value_t = 0, help_heading = "Input")]
    trim_threshold: u8,

    // Roll
    /// Roll width in inches
    #[arg(long, help_heading = "Roll")]
    roll_width: Option<f64>,
    /// Margin in inches (overrides --margin-preset)
    #[arg(long, help_heading = "Roll")]
    margin: Option<f64>,
    /// Margin preset: standard (0.5 in) | narrow (0.375 in)
    #[arg(long, help_heading = "Roll")]
    margin_preset: Option<String>,
    /// Render DPI
    #[arg(long, help_heading = "Roll")]
    dpi: Option<u32>,
    /// Billing unit in inches
    #[arg(long, help_heading = "Roll")]
    billing_unit: Option<f64>,
    /// Header band in inches
    #[arg(long, help_heading = "Roll")]
    header: Option<f64>,
    /// Packing: shelf | justified
    #[arg(long, help_heading = "Roll")]
    packing: Option<String>,
    /// Rotation when both orientations fit: min_height | fit_only
    #[arg(long, help_heading = "Roll")]
    rotation: Option<String>,

    // Job
    /// Customer name
    #[arg(long, help_heading = "Job")]
    customer: Option<String>,
    /// Order number
    #[arg(long, help_heading = "Job")]
    order: Option<String>,
    /// Price per billed foot
    #[arg(long, help_heading = "Job")]
    price: Option<f64>,
    /// Append the suggested free copies of the last artwork
    #[arg(long, default_value_t = false, help_heading = "Job")]
    autofill: bool,

    /// Print the merged roll config and exit: json | yaml
    #[arg(long, value_parser = ["json", "yaml"], help_heading = "Debug")]
    print_config: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct BuildArgs {
    #[command(flatten)]
    sheet: SheetArgs,
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Output")]
    out_dir: PathBuf,
    /// Output format
    #[arg(long, value_parser = ["png", "pdf", "both"], default_value = "pdf", help_heading = "Output")]
    format: String,
    /// Mirror the sheet horizontally (printing on the film back)
    #[arg(long, default_value_t = false, help_heading = "Output")]
    mirror: bool,
    /// Skip the JSON manifest
    #[arg(long, default_value_t = false, help_heading = "Output")]
    no_manifest: bool,
    /// Compute everything but write no files
    #[arg(long, default_value_t = false, help_heading = "Output")]
    dry_run: bool,
}

/// `--job` file layout.
#[derive(Debug, Default, Deserialize)]
struct JobFile {
    #[serde(flatten)]
    details: JobDetails,
    #[serde(default)]
    roll: Option<RollConfig>,
    #[serde(default)]
    artworks: Vec<JobArtwork>,
}

#[derive(Debug, Deserialize)]
struct JobArtwork {
    path: PathBuf,
    width: Option<f64>,
    height: Option<f64>,
    #[serde(default = "default_qty")]
    qty: usize,
    #[serde(default)]
    trim: Option<bool>,
}

fn default_qty() -> usize {
    1
}

/// One artwork to load: where it lives, how big to print it, how many.
struct Request {
    path: PathBuf,
    width: Option<f64>,
    height: Option<f64>,
    qty: usize,
    trim: bool,
    /// Failures abort the run instead of skipping the file.
    required: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    let progress = cli.progress && !cli.quiet;
    match &cli.command {
        Commands::Quote(args) => run_quote(args, progress),
        Commands::Build(args) => run_build(args, progress),
    }
}

fn run_quote(args: &SheetArgs, progress: bool) -> anyhow::Result<()> {
    let Some(job) = prepare_job(args, progress)? else {
        return Ok(());
    };
    print_quote(&job)
}

fn run_build(args: &BuildArgs, progress: bool) -> anyhow::Result<()> {
    let Some(job) = prepare_job(&args.sheet, progress)? else {
        return Ok(());
    };
    print_quote(&job)?;
    if job.inventory().is_empty() {
        bail!("nothing to build: no artwork loaded");
    }

    let opts = RenderOptions {
        mirror: args.mirror,
        header_text: Some(job.header_text()),
    };
    let want_png = matches!(args.format.as_str(), "png" | "both");
    let want_pdf = matches!(args.format.as_str(), "pdf" | "both");

    let mut outputs: Vec<(PathBuf, Vec<u8>)> = Vec::new();
    if want_pdf {
        let bytes = job.render_pdf(&opts).context("render pdf")?;
        outputs.push((args.out_dir.join(job.pdf_file_name()), bytes));
    }
    if want_png {
        let png_opts = RenderOptions {
            header_text: None,
            ..opts.clone()
        };
        let bytes = job.render_png(&png_opts).context("render png")?;
        outputs.push((args.out_dir.join(job.png_file_name()), bytes));
    }
    if !args.no_manifest {
        let manifest = serde_json::to_vec_pretty(&job.manifest()?)?;
        let name = Path::new(&job.pdf_file_name()).with_extension("json");
        outputs.push((args.out_dir.join(name), manifest));
    }

    if args.dry_run {
        for (path, bytes) in &outputs {
            println!("would write {} ({} bytes)", path.display(), bytes.len());
        }
        return Ok(());
    }

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create out_dir {}", args.out_dir.display()))?;
    for (path, bytes) in &outputs {
        fs::write(path, bytes).with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), bytes = bytes.len(), "wrote");
    }
    Ok(())
}

/// Builds the job from flags and the optional job file. `None` means the
/// merged config was printed and there is nothing else to do.
fn prepare_job(args: &SheetArgs, progress: bool) -> anyhow::Result<Option<Job>> {
    let (file, base_dir) = match &args.job {
        Some(path) => {
            let text =
                fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
            let file: JobFile = serde_yaml::from_str(&text)
                .with_context(|| format!("parse job file {}", path.display()))?;
            let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            (file, dir)
        }
        None => (JobFile::default(), PathBuf::new()),
    };

    let cfg = merge_config(file.roll.clone().unwrap_or_default(), args)?;
    if let Some(fmt) = &args.print_config {
        match fmt.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(None);
    }
    cfg.validate()?;

    let mut details = file.details;
    if let Some(c) = &args.customer {
        details.customer = c.clone();
    }
    if let Some(o) = &args.order {
        details.order_number = o.clone();
    }
    if let Some(p) = args.price {
        details.price_per_foot = p;
    }

    let mut requests: Vec<Request> = file
        .artworks
        .into_iter()
        .map(|a| Request {
            path: base_dir.join(a.path),
            width: a.width,
            height: a.height,
            qty: a.qty,
            trim: a.trim.unwrap_or(args.trim),
            required: true,
        })
        .collect();
    for path in gather_paths(&args.inputs, &args.include, &args.exclude)? {
        requests.push(Request {
            path,
            width: args.width,
            height: None,
            qty: args.qty,
            trim: args.trim,
            required: false,
        });
    }
    if requests.is_empty() {
        warn!("no artwork inputs given");
    }

    let mut job = Job::new(details, cfg)?;
    load_artworks_with_progress(&mut job, &requests, args.trim_threshold, progress)?;
    info!(count = job.inventory().len(), "inventory ready");

    if args.autofill {
        let added = job.apply_autofill()?;
        if added > 0 {
            println!("auto-fill: added {added} free copies");
        }
    }
    Ok(Some(job))
}

/// Flags win over the job file's `roll:` section, which wins over defaults.
fn merge_config(base: RollConfig, args: &SheetArgs) -> anyhow::Result<RollConfig> {
    let mut b = RollConfigBuilder::from(base);
    if let Some(v) = args.roll_width {
        b = b.roll_width(v);
    }
    if let Some(s) = &args.margin_preset {
        b = b.margin_preset(parse_named::<MarginPreset>(s, "margin preset")?);
    }
    if let Some(v) = args.margin {
        b = b.margin(v);
    }
    if let Some(v) = args.dpi {
        b = b.dpi(v);
    }
    if let Some(v) = args.billing_unit {
        b = b.billing_unit(v);
    }
    if let Some(v) = args.header {
        b = b.header_allowance(v);
    }
    if let Some(s) = &args.packing {
        b = b.packing(parse_named::<PackingPolicy>(s, "packing")?);
    }
    if let Some(s) = &args.rotation {
        b = b.rotation(parse_named::<RotationPolicy>(s, "rotation")?);
    }
    Ok(b.build())
}

fn parse_named<T: std::str::FromStr>(s: &str, what: &str) -> anyhow::Result<T> {
    s.parse::<T>()
        .map_err(|_| anyhow::anyhow!("unknown {what}: {s}"))
}

fn print_quote(job: &Job) -> anyhow::Result<()> {
    let quote = job.quote()?;
    println!("{}", quote.stats.summary());
    println!(
        "Cost: ${:.2} ({} in at ${:.2}/ft)",
        quote.cost,
        quote.stats.billable_length,
        job.details().price_per_foot
    );
    if let Some(fill) = &quote.autofill {
        if fill.count > 0 {
            let capped = if fill.capped { " (search limit reached)" } else { "" };
            println!(
                "Auto-fill: {} more '{}' fit free{}",
                fill.count, fill.key, capped
            );
        }
    }
    Ok(())
}

fn gather_paths(
    inputs: &[PathBuf],
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    let inc_set = build_globset(include)?;
    let exc_set = build_globset(exclude)?;
    let mut list: Vec<PathBuf> = Vec::new();
    for path in inputs {
        if path.is_file() {
            if !should_skip(path, inc_set.as_ref(), exc_set.as_ref()) && is_artwork(path) {
                list.push(path.to_path_buf());
            }
        } else if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .map(|e| e.into_path())
                .filter(|p| {
                    p.is_file() && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) && is_artwork(p)
                })
                .collect();
            // walk order is filesystem dependent; keep tie-breaking stable
            found.sort();
            list.extend(found);
        } else {
            bail!("input not found: {}", path.display());
        }
    }
    Ok(list)
}

fn build_globset(patterns: &[String]) -> anyhow::Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut b = GlobSetBuilder::new();
    for pat in patterns {
        b.add(Glob::new(pat).with_context(|| format!("bad glob {pat}"))?);
    }
    Ok(Some(b.build()?))
}

fn should_skip(p: &Path, include: Option<&GlobSet>, exclude: Option<&GlobSet>) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn is_artwork(p: &Path) -> bool {
    SourceFormat::from_path(p).is_some()
}

fn load_artworks_with_progress(
    job: &mut Job,
    requests: &[Request],
    trim_threshold: u8,
    progress: bool,
) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress && !requests.is_empty() {
        let b = ProgressBar::new(requests.len() as u64);
        let style = ProgressStyle::with_template(
            "{spinner:.green} loading {pos}/{len} [{elapsed_precise}] {wide_msg}",
        )?;
        b.set_style(style);
        Some(b)
    } else {
        None
    };
    let dpi = job.config().dpi;
    for req in requests {
        let msg = req.path.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        let loaded = load_artwork(req, dpi, trim_threshold)
            .and_then(|art| Ok(job.add_artwork(art, req.qty)?));
        match loaded {
            Ok(()) => {}
            Err(e) if req.required => {
                return Err(e.context(format!("load {}", req.path.display())));
            }
            Err(e) => {
                error!(path = %req.path.display(), error = %e, "skip artwork");
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(())
}

fn load_artwork(req: &Request, dpi: u32, trim_threshold: u8) -> anyhow::Result<Artwork> {
    let format = SourceFormat::from_path(&req.path)
        .with_context(|| format!("unsupported file type {}", req.path.display()))?;
    let bytes = fs::read(&req.path).with_context(|| format!("read {}", req.path.display()))?;
    let decoded = decode_artwork(&bytes, format, dpi, None)?;
    let key = req.path.to_string_lossy().replace('\\', "/");

    let image = if req.trim {
        let trimmed = trim_transparent(&key, decoded.image, trim_threshold);
        if let Some(w) = &trimmed.warning {
            warn!("{w}");
        }
        trimmed.image
    } else {
        decoded.image
    };

    let (px_w, px_h) = image.dimensions();
    let aspect = px_h as f64 / px_w.max(1) as f64;
    let art = match (req.width, req.height) {
        (Some(w), Some(h)) => Artwork::with_print_size(key, image, w, h)?,
        (Some(w), None) => Artwork::with_print_size(key, image, w, round2(w * aspect))?,
        (None, Some(h)) => Artwork::with_print_size(key, image, round2(h / aspect), h)?,
        (None, None) => Artwork::new(key, image, decoded.dpi)?,
    };
    Ok(art)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}
