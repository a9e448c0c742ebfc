use anyhow::{Context, Result};
use blockchart::export::{ExporterRegistry, ImageFormat, SvgExporter, save_jpeg, save_png};
use blockchart::factory::build_chart;
use blockchart::{Chart, ChartConfig, ChartData, ChartKind, ChartRenderingInfo, PlotOrientation};
use blockchart::imagemap;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "blockchart",
    version,
    about = "Render line, bar and pie charts from CSV files, with optional image maps"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a chart from a CSV file.
    Render(RenderArgs),
    /// Write a config file with every default spelled out.
    InitConfig {
        /// Where to write the JSON config.
        path: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Line,
    Bar,
    Pie,
}

impl From<KindArg> for ChartKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Line => ChartKind::Line,
            KindArg::Bar => ChartKind::Bar,
            KindArg::Pie => ChartKind::Pie,
        }
    }
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Chart type. Line charts read `series,x,y` rows, bar charts a wide
    /// table (first column = series), pie charts `key,value` rows.
    #[arg(short, long, value_enum, default_value_t = KindArg::Line)]
    kind: KindArg,
    /// Input CSV file.
    #[arg(short, long)]
    input: PathBuf,
    /// Output image (.png, .jpg, .svg); format inferred from the extension.
    #[arg(short, long)]
    out: PathBuf,
    /// JSON config file; command-line flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Chart title.
    #[arg(short, long)]
    title: Option<String>,
    /// Subtitle line (repeatable).
    #[arg(long)]
    subtitle: Vec<String>,
    /// Label for the domain / category axis.
    #[arg(long)]
    x_label: Option<String>,
    /// Label for the value axis.
    #[arg(long)]
    y_label: Option<String>,
    /// Legend edge (top, bottom, left, right) or `none`.
    #[arg(long)]
    legend: Option<String>,
    /// Lay the domain axis out vertically.
    #[arg(long, default_value_t = false)]
    horizontal: bool,
    /// Width in pixels (config default 800).
    #[arg(long)]
    width: Option<u32>,
    /// Height in pixels (config default 600).
    #[arg(long)]
    height: Option<u32>,
    /// Write an HTML image map of the chart's items.
    #[arg(long)]
    image_map: Option<PathBuf>,
    /// Write all chart entities as JSON.
    #[arg(long)]
    entities: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::InitConfig { path } => {
            ChartConfig::default()
                .save(&path)
                .with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Wrote default config to {}", path.display());
            Ok(())
        }
    }
}

fn merged_config(args: &RenderArgs) -> Result<ChartConfig> {
    let mut cfg = match &args.config {
        Some(path) => ChartConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ChartConfig::default(),
    };
    if args.title.is_some() {
        cfg.title = args.title.clone();
    }
    cfg.subtitles.extend(args.subtitle.iter().cloned());
    if args.x_label.is_some() {
        cfg.x_label = args.x_label.clone();
    }
    if args.y_label.is_some() {
        cfg.y_label = args.y_label.clone();
    }
    match args.legend.as_deref() {
        Some("none") => cfg.legend = false,
        Some(edge) => {
            cfg.legend = true;
            cfg.legend_position = edge.to_string();
        }
        None => {}
    }
    if args.horizontal {
        cfg.orientation = PlotOrientation::Horizontal;
    }
    if let Some(w) = args.width {
        cfg.width = w;
    }
    if let Some(h) = args.height {
        cfg.height = h;
    }
    cfg.validate().context("invalid chart settings")?;
    Ok(cfg)
}

/// Draw `chart` to `path`, recording entities into `info` where the format
/// allows it.
fn export(chart: &mut Chart, path: &Path, cfg: &ChartConfig, info: &mut ChartRenderingInfo) -> Result<()> {
    let (w, h) = (cfg.width, cfg.height);
    match ImageFormat::from_path(path)? {
        ImageFormat::Png => save_png(chart, path, w, h, Some(info))?,
        ImageFormat::Jpeg => save_jpeg(chart, path, w, h, 90, Some(info))?,
        ImageFormat::Svg => {
            let svg = SvgExporter.render_string(chart, w as f64, h as f64, Some(info))?;
            std::fs::write(path, svg)?;
        }
        ImageFormat::Pdf => ExporterRegistry::new().save(chart, path, w, h)?,
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let cfg = merged_config(&args)?;
    let kind = ChartKind::from(args.kind);
    let data = ChartData::load_csv(kind, &args.input)
        .with_context(|| format!("reading {} data from {}", kind, args.input.display()))?;
    let mut chart = build_chart(&cfg, data)?;

    let mut info = ChartRenderingInfo::new();
    export(&mut chart, &args.out, &cfg, &mut info)
        .with_context(|| format!("writing {}", args.out.display()))?;
    eprintln!("Wrote chart to {}", args.out.display());

    if let Some(path) = args.image_map.as_ref() {
        let name = args
            .out
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("chart");
        std::fs::write(path, imagemap::write_image_map(name, &info))
            .with_context(|| format!("writing {}", path.display()))?;
        eprintln!("Wrote image map to {}", path.display());
    }

    if let Some(path) = args.entities.as_ref() {
        std::fs::write(path, imagemap::entities_json(&info)?)
            .with_context(|| format!("writing {}", path.display()))?;
        let count = info.entities().map_or(0, |e| e.len());
        eprintln!("Wrote {} entities to {}", count, path.display());
    }
    Ok(())
}
