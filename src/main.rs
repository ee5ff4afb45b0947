use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use boxtab::{
    BoxModel, Center, CellFilter, Ellipsis, LeftJustify, Model, Result, RightJustify, StatusLine,
    TableOptions, build_sort_index, render, starts_with,
};

/// Draw tabular files as box tables and try out the matching helpers.
#[derive(Parser)]
#[command(name = "boxtab", version)]
struct Args {
    /// Log level, used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a CSV, TSV, Parquet or Arrow file as a table
    Table {
        /// Input file, or - to read CSV from stdin
        file: String,

        /// Do not style the column names as a header row
        #[arg(long)]
        no_header: bool,

        /// Draw a line between body rows
        #[arg(long)]
        separators: bool,

        /// Box style: heavy or double
        #[arg(long, default_value = "double")]
        style: String,

        #[arg(long, value_enum, default_value_t = Align::Left)]
        align: Align,

        /// Cut cell values longer than this, marking them with an ellipsis
        #[arg(long)]
        max_width: Option<usize>,

        /// Columns to show first, in this order
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
    },
    /// Check whether PREFIX is a structural prefix of URL
    UrlMatch { url: String, prefix: String },
    /// Print the index order of VALUES with PRIORITY values first
    SortIndex {
        #[arg(long, value_delimiter = ',')]
        priority: Vec<String>,

        values: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Align {
    Left,
    Right,
    Center,
}

fn setup_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(ErrorLayer::default())
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(&args.log_level);

    match run(args.command) {
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(code) => code,
    }
}

fn run(command: Command) -> Result<ExitCode> {
    match command {
        Command::Table {
            file,
            no_header,
            separators,
            style,
            align,
            max_width,
            columns,
        } => {
            let options = TableOptions::default()
                .box_model(style.parse::<BoxModel>()?)
                .has_header(!no_header)
                .separators(separators);
            show_table(&file, &options, align, max_width, &columns)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::UrlMatch { url, prefix } => {
            let matched = starts_with(&url, &prefix);
            println!("{matched}");
            Ok(if matched { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::SortIndex { priority, values } => {
            let index = build_sort_index(&values, &priority);
            let line: Vec<String> = index.iter().map(ToString::to_string).collect();
            println!("{}", line.join(" "));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn show_table(
    file: &str,
    options: &TableOptions,
    align: Align,
    max_width: Option<usize>,
    columns: &[String],
) -> Result<()> {
    let mut status = StatusLine::stderr();
    status.set(&format!("Loading {file} ..."))?;
    let mut model = Model::load(file)?;
    status.clear()?;
    info!("Loaded {} rows from {}", model.nrows(), model.source());

    if !columns.is_empty() {
        let order = build_sort_index(model.column_names(), columns);
        debug!("Column order: {order:?}");
        model.reorder_columns(&order);
    }

    let rows = model.rows(options.has_header);
    let mut out = io::stdout().lock();
    match align {
        Align::Left => draw(&rows, &mut out, options, LeftJustify, max_width),
        Align::Right => draw(&rows, &mut out, options, RightJustify, max_width),
        Align::Center => draw(&rows, &mut out, options, Center, max_width),
    }
}

fn draw<W: Write, F: CellFilter>(
    rows: &[&[String]],
    out: &mut W,
    options: &TableOptions,
    filter: F,
    max_width: Option<usize>,
) -> Result<()> {
    match max_width {
        Some(max_width) => render(rows, out, options, &Ellipsis { max_width, inner: filter }),
        None => render(rows, out, options, &filter),
    }
}
