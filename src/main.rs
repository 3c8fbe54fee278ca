use arbor_query::cli::{self, CheckOptions, CheckResult, CliError};
use clap::{Parser as ClapParser, Subcommand};
use std::fs;
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "arbor")]
#[command(about = "Arbor - A filter language for locating nodes in hierarchical data")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a filter and run it against a JSON tree
    Check {
        /// The filter expression, e.g. "[title] == 'x' and name() like 'p.*'"
        expression: String,

        /// JSON input file, or '-' for stdin (reads stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Path of the node to start from
        #[arg(short, long)]
        start: Option<String>,

        /// Maximum number of matches to return
        #[arg(short, long)]
        limit: Option<i64>,

        /// Number of matches to skip
        #[arg(short, long)]
        offset: Option<i64>,

        /// Only descend into children matching this filter
        #[arg(short, long)]
        traverse: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't execute
        #[arg(long)]
        syntax_only: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            expression,
            input,
            start,
            limit,
            offset,
            traverse,
            pretty,
            syntax_only,
        } => read_input(input).and_then(|input| {
            run_check(CheckOptions {
                expression,
                input,
                start,
                limit,
                offset,
                traverse,
                pretty,
                syntax_only,
            })
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_stdin() -> Result<String, CliError> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn read_input(input: Option<String>) -> Result<Option<String>, CliError> {
    match input.as_deref() {
        Some("-") => read_stdin().map(Some),
        Some(path) => Ok(Some(fs::read_to_string(path)?)),
        None if !atty::is(atty::Stream::Stdin) => read_stdin().map(Some),
        None => Ok(None),
    }
}

fn run_check(options: CheckOptions) -> Result<(), CliError> {
    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Success(output) => {
            let json = if options.pretty {
                serde_json::to_string_pretty(&output)
            } else {
                serde_json::to_string(&output)
            }?;
            println!("{}", json);
        }
    }
    Ok(())
}
