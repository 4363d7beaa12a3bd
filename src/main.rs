use clap::{Parser as ClapParser, Subcommand};
use js_to_json_logic::{
    TransformOptions,
    cli::{self, CheckOptions, CheckResult, CliError, ConvertOptions},
};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "js2jl")]
#[command(about = "Convert JavaScript-like expressions into JSON Logic rules")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an expression and print the rule
    Convert {
        /// The expression (reads from stdin if not provided)
        source: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Deepest nesting accepted
        #[arg(long, default_value_t = TransformOptions::default().max_depth)]
        max_depth: usize,
    },

    /// Check that an expression converts, without printing the rule
    Check {
        /// The expression (reads from stdin if not provided)
        source: Option<String>,

        /// Only validate syntax, don't convert
        #[arg(long)]
        syntax_only: bool,

        /// Deepest nesting accepted
        #[arg(long, default_value_t = TransformOptions::default().max_depth)]
        max_depth: usize,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            source,
            pretty,
            max_depth,
        } => read_source(source).and_then(|source| {
            let rule = cli::execute_convert(&ConvertOptions {
                source,
                pretty,
                max_depth,
            })?;
            println!("{}", rule);
            Ok(())
        }),
        Commands::Check {
            source,
            syntax_only,
            max_depth,
        } => read_source(source).and_then(|source| {
            match cli::execute_check(&CheckOptions {
                source,
                syntax_only,
                max_depth,
            })? {
                CheckResult::SyntaxValid => println!("Syntax is valid"),
                CheckResult::Expressible => println!("Expression converts to a rule"),
            }
            Ok(())
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_source(source: Option<String>) -> Result<String, CliError> {
    match source {
        Some(s) => Ok(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        None => Err(CliError::NoInput),
    }
}
