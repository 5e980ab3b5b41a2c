//! Gangsheet CLI
//!
//! Usage:
//!   gangsheet [OPTIONS] [TEMPLATE] [DATA]
//!
//! Options:
//!   -c, --config <FILE>        Run configuration (TOML format)
//!   -o, --output-dir <DIR>     Directory for the output sheets
//!   --width, --height <N>      Output sheet size, in the template's unit
//!   --edge-margin <N>          Blank border around each sheet
//!   --inner-margin <N>         Gap between neighbouring copies
//!   -v, --verbose              More log output (repeatable)
//!   -h, --help                 Print help

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gangsheet::{
    impose, read_records, FilePageWriter, ImposeOptions, MissingFieldPolicy, RunConfig, Template,
};

#[derive(Parser)]
#[command(name = "gangsheet")]
#[command(about = "Impose copies of a vector template onto print sheets, one per data row")]
struct Cli {
    /// Design template (SVG) [default: example_design.svg]
    template: Option<PathBuf>,

    /// Data table, one row per copy [default: example_data.csv]
    data: Option<PathBuf>,

    /// Run configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output sheet width [default: 900]
    #[arg(long)]
    width: Option<f64>,

    /// Output sheet height [default: 600]
    #[arg(long)]
    height: Option<f64>,

    /// Blank border kept along every sheet edge [default: 15]
    #[arg(long)]
    edge_margin: Option<f64>,

    /// Gap between neighbouring copies [default: 5]
    #[arg(long)]
    inner_margin: Option<f64>,

    /// Directory the sheets are written to [default: .]
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output file name prefix [default: output_]
    #[arg(long)]
    prefix: Option<String>,

    /// Field delimiter of the data table [default: ,]
    #[arg(long)]
    delimiter: Option<char>,

    /// Abort when a label refers to a field the row does not have
    #[arg(long)]
    strict: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Layer command line values over a loaded configuration
    fn apply(&self, mut config: RunConfig) -> RunConfig {
        if let Some(path) = &self.template {
            config.template = path.clone();
        }
        if let Some(path) = &self.data {
            config.data = path.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(width) = self.width {
            config.page.width = width;
        }
        if let Some(height) = self.height {
            config.page.height = height;
        }
        if let Some(margin) = self.edge_margin {
            config.page.edge_margin = margin;
        }
        if let Some(margin) = self.inner_margin {
            config.page.inner_margin = margin;
        }
        if let Some(prefix) = &self.prefix {
            config.svg = config.svg.with_file_prefix(prefix.clone());
        }
        if let Some(delimiter) = self.delimiter {
            config.table = config.table.with_delimiter(delimiter);
        }
        if self.strict {
            config.missing_field = MissingFieldPolicy::Fail;
        }
        config
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "gangsheet=info",
        1 => "gangsheet=debug",
        _ => "gangsheet=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load run configuration
    let config = match &cli.config {
        Some(path) => match RunConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => RunConfig::default(),
    };
    let config = cli.apply(config);
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Read and parse the template
    let source = match fs::read_to_string(&config.template) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", config.template.display(), e);
            std::process::exit(1);
        }
    };
    let template = match Template::parse(&source) {
        Ok(t) => t,
        Err(e) => {
            let filename = config.template.display().to_string();
            eprint!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
    };

    // Read the data table
    let records = match read_records(&config.data, &config.table) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut writer = FilePageWriter::new(&config.output_dir, config.svg.clone());
    match impose(&template, records, &ImposeOptions::from(&config), &mut writer) {
        Ok(summary) => {
            println!(
                "{} page(s) written to '{}' ({} record(s), {} skipped substitution(s))",
                summary.pages,
                writer.dir().display(),
                summary.records,
                summary.skipped_substitutions
            );
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
