extern crate chef;
extern crate clap;

use clap::{value_parser, Arg, ArgAction, Command};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chef::internal::evaluator::DEFAULT_MAX_LOOP_ITERATIONS;
use chef::{ChefError, Evaluator, Limits, Recipe};

fn main() {
    let cmd = Command::new("chef")
        .version("0.1.0")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log every executed statement"),
        )
        .subcommand(
            Command::new("run")
                .about("Cook the specified recipe and print what it serves")
                .arg(
                    Arg::new("recipe")
                        .required(true)
                        .help("Load and execute the recipe in the specified file"),
                )
                .arg(
                    Arg::new("max-iterations")
                        .long("max-iterations")
                        .value_name("N")
                        .value_parser(value_parser!(u64))
                        .help("Abort when any loop runs more than N times"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Parse the specified recipe without cooking it")
                .arg(Arg::new("recipe").required(true).help("Recipe file to parse")),
        );
    let matches = cmd.get_matches();
    init_tracing(matches.get_flag("verbose"));

    let result = match matches.subcommand() {
        Some(("run", sub_matches)) => {
            let start = Instant::now();
            let limits = Limits {
                max_loop_iterations: sub_matches
                    .get_one::<u64>("max-iterations")
                    .copied()
                    .unwrap_or(DEFAULT_MAX_LOOP_ITERATIONS),
            };
            load(sub_matches.get_one::<String>("recipe")).and_then(|recipe| {
                let output = Evaluator::new(&recipe, limits).run()?;
                print!("{}", output);
                info!(duration = ?Instant::now().duration_since(start), "finished");
                Ok(())
            })
        }
        Some(("check", sub_matches)) => {
            load(sub_matches.get_one::<String>("recipe")).map(|recipe| {
                println!("{} (serves {})", recipe.title(), recipe.servings());
            })
        }
        _ => unreachable!(),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn load(path: Option<&String>) -> Result<Recipe, ChefError> {
    let path = path.map(String::as_str).unwrap_or_default();
    let source = std::fs::read_to_string(path)
        .map_err(|e| {
            ChefError::from(e).with_context(format!("Could not read recipe file {}", path))
        })?;
    Recipe::parse(&source).map_err(|e| e.with_context(format!("Failed to parse recipe {}", path)))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .try_init();
}
