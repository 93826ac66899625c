use clap::{Parser as ClapParser, Subcommand};
use molang_expr::cli::{self, CliError, EvalOptions};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "molang")]
#[command(about = "Molang - a numeric expression language for animation and particle content")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression and print the result
    Eval {
        /// The expression to evaluate (reads from stdin if not provided)
        expression: Option<String>,

        /// Bind a query value, e.g. -q health=20
        #[arg(short, long = "query", value_name = "NAME=VALUE")]
        queries: Vec<String>,

        /// Bind a variable value, e.g. -v scale=0.5
        #[arg(short, long = "variable", value_name = "NAME=VALUE")]
        variables: Vec<String>,

        /// Seed the random generator for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Skip constant folding before evaluation
        #[arg(long)]
        raw: bool,
    },

    /// Validate expression syntax without evaluating
    Check {
        /// The expression to check (reads from stdin if not provided)
        expression: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Eval {
            expression,
            queries,
            variables,
            seed,
            raw,
        } => run_eval(expression, queries, variables, seed, raw),
        Commands::Check { expression } => run_check(expression),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_eval(
    expression: Option<String>,
    queries: Vec<String>,
    variables: Vec<String>,
    seed: Option<u64>,
    raw: bool,
) -> Result<(), CliError> {
    let options = EvalOptions {
        expression: read_expression(expression)?,
        queries: parse_bindings(queries)?,
        variables: parse_bindings(variables)?,
        seed,
        raw,
    };

    let value = cli::execute_eval(&options)?;
    println!("{}", value);
    Ok(())
}

fn run_check(expression: Option<String>) -> Result<(), CliError> {
    cli::execute_check(&read_expression(expression)?)?;
    println!("Syntax is valid");
    Ok(())
}

fn parse_bindings(bindings: Vec<String>) -> Result<Vec<(String, f32)>, CliError> {
    bindings.iter().map(|b| cli::parse_binding(b)).collect()
}

fn read_expression(expression: Option<String>) -> Result<String, CliError> {
    match expression {
        Some(s) => Ok(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(CliError::Io)?;
            Ok(buffer.trim().to_string())
        }
        None => Err(CliError::NoInput),
    }
}
