use clap::{Parser, Subcommand};
use json_rules::{migrate_v1_to_v2, Evaluator};
use std::process::ExitCode;
use tracing::Level;

/// Match JSON documents against declarative rules.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Log evaluation decisions to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a rule against a document. Exits 0 on match, 1 otherwise.
    Eval {
        /// JSON document, or @FILE to read it from a file
        document: String,
        /// Rule JSON, or @FILE to read it from a file
        rule: String,
        /// Do not print the result
        #[arg(short, long)]
        quiet: bool,
    },
    /// Rewrite a legacy `composites` rule into the current format.
    Migrate {
        /// Legacy JSON, or @FILE to read it from a file
        legacy: String,
    },
}

// `@path` reads the argument from a file.
fn load(arg: &str) -> Result<String, String> {
    match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path).map_err(|e| format!("reading {path}: {e}")),
        None => Ok(arg.to_string()),
    }
}

fn run(command: Command) -> Result<bool, String> {
    match command {
        Command::Eval { document, rule, quiet } => {
            let document = load(&document)?;
            let rule = load(&rule)?;
            let matched = Evaluator::default()
                .evaluate(&document, &rule)
                .map_err(|e| e.to_string())?;
            if !quiet {
                println!("{matched}");
            }
            Ok(matched)
        }
        Command::Migrate { legacy } => {
            let legacy = load(&legacy)?;
            let rule = migrate_v1_to_v2(&legacy).map_err(|e| e.to_string())?;
            println!("{rule}");
            Ok(true)
        }
    }
}

fn main() -> ExitCode {
    // Parse CLI arguments.
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    match run(args.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}
