use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process;

mod commands;

/// Standardized exit codes for CLI.
/// 0 = OK, 2 = input error (incl. HTTP 400), 3 = not found (404), 1 = other.
const EXIT_OTHER: i32 = 1;
const EXIT_INPUT: i32 = 2;
const EXIT_NOT_FOUND: i32 = 3;

#[derive(Parser)]
#[command(name = "rpnx", version, about = "RPN stack CLI: create, inspect and evaluate stacks")]
struct Cli {
    /// Gate server URL
    #[arg(long, env = "RPN_GATE_URL", default_value = "http://127.0.0.1:5500")]
    gate: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the supported operators
    Ops,
    /// Create a stack from an expression, e.g. "3 4 +"
    Create {
        expr: String,
    },
    /// List all stacks
    List,
    /// Show one stack
    Show {
        id: u64,
    },
    /// Replace a stack's tokens
    Push {
        id: u64,
        #[arg(required = true)]
        tokens: Vec<String>,
    },
    /// Apply an operator to the top two values of a stack
    Apply {
        op: String,
        id: u64,
    },
    /// Delete a stack
    Delete {
        id: u64,
    },
    /// Check gate server health
    Health,
}

/// Map error strings to exit codes based on HTTP status patterns.
fn exit_code_for(err: &str) -> i32 {
    if err.contains("HTTP 404") {
        EXIT_NOT_FOUND
    } else if err.contains("HTTP 400") || err.contains("parse ") {
        EXIT_INPUT
    } else {
        EXIT_OTHER
    }
}

fn main() {
    let cli = Cli::parse();
    let client = commands::Client::new(&cli.gate);

    let result = match cli.command {
        Commands::Ops => commands::ops(&client),
        Commands::Create { expr } => commands::create(&client, &expr),
        Commands::List => commands::list(&client),
        Commands::Show { id } => commands::show(&client, id),
        Commands::Push { id, tokens } => commands::push(&client, id, &tokens),
        Commands::Apply { op, id } => commands::apply(&client, &op, id),
        Commands::Delete { id } => commands::delete(&client, id),
        Commands::Health => commands::health(&client),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        process::exit(exit_code_for(&e));
    }
}
