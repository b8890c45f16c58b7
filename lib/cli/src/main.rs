use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::bail;
use elapsed::measure_time;
use log::{debug, info};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use modal_nexus_engine::runner::{summarize, Runner};
use modal_nexus_engine::TheoryRegistry;

mod parsing;

#[derive(Parser, Debug)]
#[clap(author, version)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// More log output (-v: debug, -vv: trace)
    #[clap(short, long, parse(from_occurrences), global = true)]
    verbose: usize,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the examples in a JSON file
    Run {
        /// Example file
        #[clap(parse(from_os_str), value_name = "FILE")]
        file: PathBuf,

        /// Theory, overriding the one named in the file
        #[clap(short, long)]
        theory: Option<String>,

        /// Only run the named example (repeatable)
        #[clap(long, value_name = "NAME")]
        only: Vec<String>,

        /// Number of examples checked in parallel
        #[clap(short, long, default_value = "1")]
        jobs: usize,

        /// Print the extracted models
        #[clap(long)]
        print_models: bool,

        /// Rewrite an operator symbol before parsing (repeatable)
        #[clap(long, value_name = "FROM=TO")]
        translate: Vec<String>,
    },

    /// List the registered theories
    Theories,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();
    let level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)?;
    debug!("args = {:?}", args);

    let registry = TheoryRegistry::standard();
    match args.command {
        Command::Theories => {
            for name in registry.names() {
                println!("{}", name);
            }
            Ok(())
        }
        Command::Run {
            file,
            theory,
            only,
            jobs,
            print_models,
            translate,
        } => {
            let examples_file = parsing::read_example_file(&file)?;
            let theory = match theory.or_else(|| examples_file.theory.clone()) {
                Some(theory) => theory,
                None => bail!("No theory given on the command line or in '{}'", file.display()),
            };
            let examples = parsing::select_examples(&examples_file, &only)?;
            let translation = parsing::parse_translation(&translate)?;
            info!("Running {} example(s) from '{}' with theory {}", examples.len(), file.display(), theory);

            let mut runner = Runner::new(&registry).with_jobs(jobs);
            if !translation.is_empty() {
                runner = runner.with_translation(translation);
            }
            let (elapsed, outcomes) = measure_time(|| runner.run(&theory, &examples));

            for outcome in &outcomes {
                println!("{}", outcome);
                if !print_models {
                    continue;
                }
                if let Ok(report) = &outcome.result {
                    if let Some(example) = examples.iter().find(|(name, _)| *name == outcome.name) {
                        println!("  premises:    {}", example.1.premises.join(", "));
                        println!("  conclusions: {}", example.1.conclusions.join(", "));
                    }
                    for (i, model) in report.models.iter().enumerate() {
                        println!("  Model {}:", i + 1);
                        for line in model.to_string().lines() {
                            println!("    {}", line);
                        }
                    }
                    if let Some(stop) = &report.iteration_stop {
                        println!("  ({})", stop);
                    }
                    println!("  solver: {}", report.stats);
                }
            }

            let (pass, fail, unchecked) = summarize(&outcomes);
            info!("{} passed, {} failed, {} without expectation in {}", pass, fail, unchecked, elapsed);
            if fail > 0 {
                bail!("{} example(s) did not meet their expectation", fail);
            }
            Ok(())
        }
    }
}
