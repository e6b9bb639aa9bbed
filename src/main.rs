use std::fs::File;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use illuminate::Markup;
use illuminate::core::blocks;
use illuminate::core::config::{self, CliOverrides};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(
    name = "illuminate",
    about = "Read source files as documentation, with the code alongside",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    view: ViewArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Browse pages in the terminal (the default)
    View(ViewArgs),
    /// Print the doc/code blocks of a source file as JSON
    Split {
        file: PathBuf,
        /// Code row width [default: 80]
        #[arg(long)]
        chars_per_row: Option<usize>,
    },
}

#[derive(Args, Debug, Default)]
struct ViewArgs {
    /// Fragment to open, e.g. '#docs.js@Router' [default: the overview page]
    fragment: Option<String>,
    /// Directory pages are read from
    #[arg(long)]
    root: Option<PathBuf>,
    /// Fetch pages over HTTP from this URL instead of the disk
    #[arg(long)]
    base_url: Option<String>,
    /// Code row width; longer lines wrap
    #[arg(long)]
    chars_per_row: Option<usize>,
    /// Markup of the comments
    #[arg(long, value_enum)]
    markup: Option<Markup>,
    /// File shown as the overview page
    #[arg(long)]
    overview: Option<PathBuf>,
}

fn split(file: PathBuf, chars_per_row: Option<usize>) -> std::io::Result<()> {
    let source = std::fs::read_to_string(&file)?;
    let blocks = blocks::split(
        &source,
        chars_per_row.unwrap_or(blocks::DEFAULT_CHARS_PER_ROW),
    );
    log::info!("Split {} into {} blocks", file.display(), blocks.len());
    let json = serde_json::to_string_pretty(&blocks)?;
    println!("{json}");
    Ok(())
}

fn view(args: ViewArgs) -> std::io::Result<()> {
    // Config errors are fatal: a malformed file should not be silently ignored
    let file_config = config::load_config().map_err(std::io::Error::other)?;
    let overrides = CliOverrides {
        chars_per_row: args.chars_per_row,
        markup: args.markup,
        base_url: args.base_url,
        root: args.root,
    };
    let resolved = config::resolve(&file_config, &overrides);
    log::info!(
        "Resolved config: source={:?}, chars_per_row={}, markup={:?}",
        resolved.source,
        resolved.chars_per_row,
        resolved.markup
    );

    let overview = args
        .overview
        .map(std::fs::read_to_string)
        .transpose()?;
    let fragment = args.fragment.unwrap_or_default();

    illuminate::tui::run(resolved, fragment, overview)
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to illuminate.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("illuminate.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    log::info!("Illuminate starting up");

    match cli.command {
        Some(Command::Split {
            file,
            chars_per_row,
        }) => split(file, chars_per_row),
        Some(Command::View(args)) => view(args),
        None => view(cli.view),
    }
}
