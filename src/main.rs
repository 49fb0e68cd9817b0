use clap::{Parser as ClapParser, Subcommand};
use std::io::{self, Read};
use stencil_expr::cli::{self, CliError, EvalOptions, EvalOutcome};
use stencil_expr::parse_expression;

#[derive(ClapParser)]
#[command(name = "stencil")]
#[command(about = "Stencil - parse and evaluate template expressions against JSON")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and evaluate an expression
    Eval {
        /// The expression to evaluate
        expression: String,

        /// JSON object of variable bindings (reads from stdin if not provided)
        #[arg(short, long)]
        context: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't evaluate
        #[arg(long)]
        syntax_only: bool,

        /// Enable the whitespace-sensitive filter call form
        #[arg(long)]
        filter_mode: bool,
    },

    /// Parse an expression and print its canonical source form
    Ast {
        /// The expression to parse
        expression: String,

        /// Enable the whitespace-sensitive filter call form
        #[arg(long)]
        filter_mode: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Eval {
            expression,
            context,
            pretty,
            syntax_only,
            filter_mode,
        } => run_eval(expression, context, pretty, syntax_only, filter_mode),
        Commands::Ast {
            expression,
            filter_mode,
        } => run_ast(expression, filter_mode),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_eval(
    expression: String,
    context: Option<String>,
    pretty: bool,
    syntax_only: bool,
    filter_mode: bool,
) -> Result<(), CliError> {
    let context = match context {
        Some(s) => Some(s),
        None if !syntax_only && !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            Some(buffer)
        }
        None => None,
    };

    let options = EvalOptions {
        expression,
        context,
        filter_mode,
        syntax_only,
    };

    match cli::execute_eval(&options)? {
        EvalOutcome::SyntaxValid => println!("Syntax is valid"),
        EvalOutcome::Success(output) => {
            let json = if pretty {
                serde_json::to_string_pretty(&output)
            } else {
                serde_json::to_string(&output)
            }
            .map_err(CliError::Json)?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn run_ast(expression: String, filter_mode: bool) -> Result<(), CliError> {
    let (expr, _) = parse_expression(&expression, filter_mode)?;
    println!("{}", expr.to_raw_string());
    Ok(())
}
