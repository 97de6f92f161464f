use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use stitchview::codec::dialog::ensure_extension;
use stitchview::codec::png::PngCodec;
use stitchview::{FormatRegistry, PreviewSession, RenderConfig, RenderOutcome, Viewport, units};

#[derive(Parser, Debug)]
#[command(name = "stitchview", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a pattern to a transparent PNG preview.
    Preview(PreviewArgs),
    /// Print stitch counts and physical size.
    Info(InfoArgs),
    /// Convert a pattern between formats.
    Convert(ConvertArgs),
    /// List supported formats.
    Formats,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Input pattern file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    render: RenderArgs,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Viewport hint as WIDTHxHEIGHT.
    #[arg(long, default_value = "800x600", value_parser = parse_viewport)]
    viewport: Viewport,

    /// Render config JSON (partial configs are merged over the defaults).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable sheen shading.
    #[arg(long)]
    plain: bool,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input pattern file.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input pattern file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output path; its extension is corrected to match `--format`.
    #[arg(long)]
    out: PathBuf,

    /// Target format extension. Defaults to the output path's extension.
    #[arg(long)]
    format: Option<String>,

    /// Settings for raster targets such as PNG.
    #[command(flatten)]
    render: RenderArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Preview(args) => cmd_preview(args),
        Command::Info(args) => cmd_info(args),
        Command::Convert(args) => cmd_convert(args),
        Command::Formats => cmd_formats(),
    }
}

fn parse_viewport(s: &str) -> Result<Viewport, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w = w.trim().parse::<u32>().map_err(|e| format!("width: {e}"))?;
    let h = h.trim().parse::<u32>().map_err(|e| format!("height: {e}"))?;
    Ok(Viewport::new(w, h))
}

fn load_config(args: &RenderArgs) -> anyhow::Result<RenderConfig> {
    let cfg = match args.config.as_deref() {
        Some(p) => RenderConfig::from_json_file(p)
            .with_context(|| format!("load render config '{}'", p.display()))?,
        None => RenderConfig::default(),
    };
    let cfg = cfg.with_env_overrides();
    Ok(if args.plain { cfg.with_fancy(false) } else { cfg })
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.render)?;
    let registry = FormatRegistry::with_defaults();
    let mut session = PreviewSession::new(cfg);
    session
        .load_path(&registry, &args.in_path)
        .with_context(|| format!("read pattern '{}'", args.in_path.display()))?;

    let rendered = session.render(args.render.viewport);
    match rendered.outcome {
        RenderOutcome::Rendered | RenderOutcome::Cached => {}
        RenderOutcome::Empty => eprintln!("pattern has no stitches, writing background"),
        RenderOutcome::Fallback | RenderOutcome::Cancelled => {
            eprintln!("rasterization failed, writing background")
        }
    }

    ensure_parent(&args.out)?;
    rendered
        .image
        .save_png(&args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        rendered.image.width,
        rendered.image.height
    );
    Ok(())
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let registry = FormatRegistry::with_defaults();
    let pattern = registry
        .read_path(&args.in_path)
        .with_context(|| format!("read pattern '{}'", args.in_path.display()))?;
    let summary = pattern.summary();

    println!("file: {}", args.in_path.display());
    println!("commands: {}", summary.command_count);
    println!("stitches: {}", summary.stitch_count);
    println!("colors: {}", summary.color_count);
    match (summary.size_cm, pattern.bounds()) {
        (Some((w_cm, h_cm)), Some(b)) => {
            println!("size: {w_cm:.2} x {h_cm:.2} cm");
            println!(
                "size: {:.2} x {:.2} in",
                units::mm10_to_inches(b.width()),
                units::mm10_to_inches(b.height())
            );
        }
        _ => println!("size: n/a"),
    }
    for (i, t) in pattern.threads().iter().enumerate() {
        println!(
            "thread {i}: {} {} {}",
            t.color.to_hex(),
            t.description,
            t.catalog_number
        );
    }
    Ok(())
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.render)?;
    let mut registry = FormatRegistry::with_defaults();
    registry.register(Box::new(PngCodec::new(cfg, args.render.viewport)));

    let pattern = registry
        .read_path(&args.in_path)
        .with_context(|| format!("read pattern '{}'", args.in_path.display()))?;

    let ext = match &args.format {
        Some(f) => f.trim_start_matches('.').to_ascii_lowercase(),
        None => args
            .out
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .context("output path has no extension; pass --format")?,
    };
    let out = ensure_extension(&args.out, &ext);

    ensure_parent(&out)?;
    registry
        .write_path(&pattern, &out, Some(&ext))
        .with_context(|| format!("write '{}' as {ext}", out.display()))?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_formats() -> anyhow::Result<()> {
    let registry = FormatRegistry::with_defaults();
    for f in registry.list_formats() {
        let mode = match (f.can_read, f.can_write) {
            (true, true) => "rw",
            (true, false) => "r-",
            (false, true) => "-w",
            (false, false) => "--",
        };
        println!("{:<6} {mode}  {}", f.extension, f.description);
    }
    Ok(())
}
