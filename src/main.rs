use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::{Builder, Target};
use log::{debug, info, LevelFilter};

use scrawl::ast_printer::AstPrinter;
use scrawl::parser::Parser;
use scrawl::scanner::Tokeniser;

#[derive(ClapParser, Debug)]
#[command(version, about = "Scrawl language front end", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Write debug logs to FILE (scrawl.log when no FILE is given)
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = "scrawl.log"
    )]
    log: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize { filename: Option<PathBuf> },

    /// Parses input from a file as a program and prints its syntax tree
    Parse {
        filename: Option<PathBuf>,

        /// Print the tree as JSON instead of canonical source
        #[arg(long)]
        json: bool,
    },
}

fn read_source(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    info!("Read {} bytes from {}", bytes.len(), path.display());

    Ok(bytes)
}

/// Routes log records to `target`, or silences logging when there is none.
///
/// Records are written as `LEVEL module:line message`, with the crate prefix
/// dropped from module paths.
fn init_logger(target: Option<&Path>) -> Result<()> {
    let Some(path) = target else {
        Builder::new().filter_level(LevelFilter::Off).init();
        return Ok(());
    };

    let sink = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    Builder::new()
        .format(|buf, record| {
            let module = record.module_path().unwrap_or("scrawl");
            writeln!(
                buf,
                "{:<5} {}:{} {}",
                record.level(),
                module.trim_start_matches("scrawl::"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(sink)))
        .filter_level(LevelFilter::Debug)
        .init();

    info!("Logging to {}", path.display());
    Ok(())
}

fn tokenize(filename: PathBuf) -> Result<()> {
    let tokeniser = Tokeniser::from_bytes(read_source(&filename)?)?;
    let mut tokenized = true;

    for token in tokeniser {
        match token {
            Ok(token) => println!("{}", token),

            Err(e) => {
                tokenized = false;
                debug!("Tokenization debug: {}", e);
                eprintln!("{}", e);
            }
        }
    }

    if !tokenized {
        debug!("Tokenization failed, exiting with code 65");
        std::process::exit(65);
    }

    info!("Tokenization completed successfully");
    Ok(())
}

fn parse(filename: PathBuf, json: bool) -> Result<()> {
    let tokeniser = Tokeniser::from_bytes(read_source(&filename)?)?;
    let mut parser = Parser::new(tokeniser);

    match parser.parse() {
        Ok(root) => {
            info!("Program parsed: {} statement(s)", root.len());

            if json {
                let out = serde_json::to_string_pretty(&root).context("Failed to serialize AST")?;
                println!("{}", out);
            } else {
                print!("{}", AstPrinter::print(&root));
            }
        }

        Err(e) => {
            debug!("Parse debug: {}", e);
            eprintln!("{}", e);
            std::process::exit(65);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    init_logger(args.log.as_deref())?;

    info!("CLI arguments: {:?}", args);

    let filename = match args.commands {
        Commands::Tokenize { ref filename } | Commands::Parse { ref filename, .. } => {
            filename.clone()
        }
    };

    let Some(filename) = filename else {
        info!("No filepath provided");
        println!("No input filepath was provided. Exiting...");
        return Ok(());
    };

    match args.commands {
        Commands::Tokenize { .. } => tokenize(filename),
        Commands::Parse { json, .. } => parse(filename, json),
    }
}
