mod app;
mod help;
mod input;
mod theme;
mod widget;
use crate::app::App;
use crate::input::{describe, read_values, Record};
use anyhow::Context;
use calheat::{parse_date, Heatmap, HeatmapConfig, Orientation, ScaleBounds, ValueFn};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::{Date, OffsetDateTime};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, PartialEq)]
enum Command {
    Run(Options),
    Help,
    Version,
}

#[derive(Clone, Debug, PartialEq)]
struct Options {
    file: Option<PathBuf>,
    end: Option<Date>,
    days: i64,
    orientation: Orientation,
    min_color: Option<String>,
    max_color: Option<String>,
    bounds: ScaleBounds,
    gutter: u32,
    month_labels: bool,
    out_of_range: bool,
    log_file: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Options {
        let config = HeatmapConfig::<()>::default();
        Options {
            file: None,
            end: None,
            days: config.num_days,
            orientation: config.orientation,
            min_color: None,
            max_color: None,
            bounds: config.bounds,
            gutter: config.gutter_size,
            month_labels: config.show_month_labels,
            out_of_range: config.show_out_of_range_days,
            log_file: None,
        }
    }
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = Options::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('e') | Arg::Long("end") => {
                    opts.end = Some(parser.value()?.parse_with(parse_date)?);
                }
                Arg::Short('d') | Arg::Long("days") => opts.days = parser.value()?.parse()?,
                Arg::Long("vertical") => opts.orientation = Orientation::Vertical,
                Arg::Long("min-color") => opts.min_color = Some(parser.value()?.string()?),
                Arg::Long("max-color") => opts.max_color = Some(parser.value()?.string()?),
                Arg::Long("min") => opts.bounds.min = Some(parser.value()?.parse()?),
                Arg::Long("max") => opts.bounds.max = Some(parser.value()?.parse()?),
                Arg::Long("gutter") => opts.gutter = parser.value()?.parse()?,
                Arg::Long("no-month-labels") => opts.month_labels = false,
                Arg::Long("out-of-range") => opts.out_of_range = true,
                Arg::Long("log-file") => opts.log_file = Some(parser.value()?.into()),
                Arg::Value(value) if opts.file.is_none() => opts.file = Some(value.into()),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                if let Some(ref path) = opts.log_file {
                    init_logging(path)?;
                }
                let end = match opts.end {
                    Some(d) => d,
                    None => OffsetDateTime::now_local()
                        .context("failed to determine local date")?
                        .date(),
                };
                let values = load_values(opts.file.as_deref())?;
                let heatmap = Heatmap::new(end, values, opts.config())
                    .context("failed to lay out heatmap")?;
                for diag in heatmap.cache().diagnostics() {
                    tracing::warn!(?diag, "Problem with input values");
                }
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(heatmap).run(terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: calheat [<options>] [FILE]");
                println!();
                println!("Browse a calendar heatmap of dated values in the terminal");
                println!();
                println!("FILE holds one value per line as `DATE COUNT [TITLE...]`.  Use `-` or");
                println!("omit it to read from standard input.");
                println!();
                println!("Options:");
                println!("  -e, --end <DATE>        Last day to show [default: today]");
                println!("  -d, --days <N>          Number of days to show [default: 200]");
                println!("      --vertical          Lay weeks out as rows instead of columns");
                println!("      --min-color <COLOR> Color of the lowest count [default: #d6e685]");
                println!("      --max-color <COLOR> Color of the highest count [default: #1e6823]");
                println!("      --min <COUNT>       Count drawn in the lowest color");
                println!("      --max <COUNT>       Count drawn in the highest color");
                println!("      --gutter <N>        Space between squares [default: 1]");
                println!("      --no-month-labels   Do not label months");
                println!("      --out-of-range      Also show the padding days around the range");
                println!("      --log-file <PATH>   Write log messages to PATH");
                println!("  -h, --help              Display this help message and exit");
                println!("  -V, --version           Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

impl Options {
    fn config(&self) -> HeatmapConfig<Option<String>> {
        let mut config = HeatmapConfig {
            num_days: self.days,
            orientation: self.orientation,
            gutter_size: self.gutter,
            show_month_labels: self.month_labels,
            show_out_of_range_days: self.out_of_range,
            bounds: self.bounds,
            ..HeatmapConfig::default()
        };
        if let Some(ref c) = self.min_color {
            config.min_color.clone_from(c);
        }
        if let Some(ref c) = self.max_color {
            config.max_color.clone_from(c);
        }
        config.callbacks.title_for_value = ValueFn::computed(describe);
        config
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn load_values(path: Option<&Path>) -> anyhow::Result<Vec<Record>> {
    let values = match path {
        Some(p) if p != Path::new("-") => {
            let fp = File::open(p).with_context(|| format!("failed to open {}", p.display()))?;
            read_values(BufReader::new(fp))
                .with_context(|| format!("failed to load values from {}", p.display()))?
        }
        _ => read_values(io::stdin().lock()).context("failed to load values from stdin")?,
    };
    tracing::info!(count = values.len(), "Loaded values");
    Ok(values)
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let fp = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(Mutex::new(fp))
        .with_ansi(false)
        .init();
    Ok(())
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
