use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use std::process;
use timelane::RenderOptions;
use timelane::event::DateRange;
use timelane::palette::{Palette, parse_owner_color};
use timelane::parser::parse_date;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Svg,
    Json,
}

/// Render a milestone event file as a timeline chart.
#[derive(Debug, Parser)]
#[command(name = "timelane", version)]
struct Cli {
    /// Event file (`effective | planned | owner | label` per line)
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Start of a custom range (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long, requires = "to", value_parser = date_arg)]
    from: Option<NaiveDate>,

    /// End of a custom range
    #[arg(long, requires = "from", value_parser = date_arg)]
    to: Option<NaiveDate>,

    /// Show 365 days either side of today instead of the calendar year
    #[arg(long, conflicts_with_all = ["from", "to"])]
    rolling: bool,

    /// Calendar year to show (default: current year)
    #[arg(long, conflicts_with_all = ["from", "to", "rolling"])]
    year: Option<i32>,

    /// Hide the today marker
    #[arg(long)]
    no_today: bool,

    /// Chart title (overrides @title)
    #[arg(short, long)]
    title: Option<String>,

    /// Fixed owner color, repeatable (e.g. --color "Board=#1f77b4")
    #[arg(short, long = "color", value_name = "OWNER=HEX", value_parser = color_arg)]
    colors: Vec<(String, String)>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Svg)]
    format: Format,
}

fn date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s, 0).map_err(|_| format!("invalid date: {s}"))
}

fn color_arg(s: &str) -> Result<(String, String), String> {
    parse_owner_color(s).map_err(|e| e.to_string())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let today = Local::now().date_naive();

    let range = match (cli.from, cli.to, cli.year) {
        (Some(start), Some(end), _) => DateRange::custom(start, end),
        (_, _, Some(year)) => match NaiveDate::from_ymd_opt(year, 1, 1) {
            Some(jan1) => DateRange::calendar_year(jan1),
            None => {
                eprintln!("Invalid year: {year}");
                process::exit(1);
            }
        },
        _ if cli.rolling => DateRange::rolling(today),
        _ => DateRange::calendar_year(today),
    };

    let input = match fs::read_to_string(&cli.input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {}: {}", cli.input.display(), e);
            process::exit(1);
        }
    };

    let mut options = RenderOptions::new(range, today);
    options.show_today = !cli.no_today;
    options.title = cli.title;
    options.palette = Palette::default().with_known(cli.colors);

    let rendered = match cli.format {
        Format::Svg => timelane::render_svg(&input, &options),
        Format::Json => timelane::render_json(&input, &options),
    };
    let out = match rendered {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    match cli.output {
        Some(path) => {
            if let Err(e) = fs::write(&path, &out) {
                eprintln!("Failed to write {}: {}", path.display(), e);
                process::exit(1);
            }
        }
        None => print!("{}", out),
    }
}
