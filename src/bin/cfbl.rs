use anyhow::Result;
use cfbl::{reshape, stats, storage, viz};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "cfbl",
    version,
    about = "Load, reshape, summarize & chart the carbon footprint of bank loans dataset"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the pipeline (and optionally export, chart, and print stats).
    Report(ReportArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(ValueEnum, Clone, Debug)]
enum ImageFormat {
    Svg,
    Png,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Path to the wide-format dataset CSV.
    #[arg(short, long)]
    input: PathBuf,
    /// Save the melted long table to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Render both charts into this directory.
    #[arg(long)]
    figures: Option<PathBuf>,
    /// Image format for --figures (default svg).
    #[arg(long, value_enum, default_value = "svg")]
    image_format: ImageFormat,
    /// Width of each chart (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Height of each chart (default 600).
    #[arg(long, default_value_t = 600)]
    height: u32,
    /// Locale tag for tick labels (e.g. en, de).
    #[arg(long, default_value = "en")]
    locale: String,
    /// Print grouped statistics to stdout.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Report(args) => cmd_report(args),
    }
}

fn cmd_report(args: ReportArgs) -> Result<()> {
    let wide = cfbl::dataset::load_csv(&args.input)?;
    log::info!("loaded {} wide rows from {}", wide.len(), args.input.display());

    let long = reshape::melt(&wide);
    let pivoted = reshape::pivot(&long)?;
    log::info!("melted to {} observations, pivoted to {} rows", long.len(), pivoted.len());

    if let Some(path) = args.out.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_csv(&long, path)?,
            "json" => storage::save_json(&long, path)?,
            other => anyhow::bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} rows to {}", long.len(), path.display());
    }

    if let Some(dir) = args.figures.as_ref() {
        std::fs::create_dir_all(dir)?;
        let ext = match args.image_format {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        };

        let recent = stats::from_year(&pivoted, stats::TIER_WINDOW_FROM);
        let means = stats::tier_year_means(&recent, stats::ECFLIN);
        let tier_path = dir.join(format!("tier_trends.{ext}"));
        viz::tier_trend_chart_locale(&means, &tier_path, args.width, args.height, &args.locale)?;
        eprintln!("Wrote plot to {}", tier_path.display());

        let emitters_path = dir.join(format!("top_emitters.{ext}"));
        viz::top_emitter_chart_locale(
            &long,
            &emitters_path,
            args.width,
            args.height,
            &args.locale,
        )?;
        eprintln!("Wrote plot to {}", emitters_path.display());
    }

    if args.stats {
        let summaries = stats::grouped_summary(&long);
        for s in summaries {
            println!(
                "{} • {}  count={} missing={}  min={} max={} mean={} median={}",
                s.key.iso3,
                s.key.cts_code,
                s.count,
                s.missing,
                fmt_opt(s.min),
                fmt_opt(s.max),
                fmt_opt(s.mean),
                fmt_opt(s.median)
            );
        }
    }

    Ok(())
}
