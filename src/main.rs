use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use rand::SeedableRng;
use rand::rngs::StdRng;

use exbana::ebnf::{self, CompiledGrammar, LowerOptions};
use exbana::pattern::DEFAULT_GENERATION_CEILING;
use exbana::{Mismatch, PatternRef, StackLogger, TextPos, TextReader, VoidLogger};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every rule of a grammar as EBNF
    Print {
        #[arg(value_name = "GRAMMAR")]
        grammar: PathBuf,
    },
    /// Print every match of a rule in the input
    Scan {
        #[arg(value_name = "GRAMMAR")]
        grammar: PathBuf,
        /// Rule to scan for
        #[arg(short, long)]
        rule: String,
        /// Input file (stdin if omitted)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
    },
    /// Match a rule once at the start of the input
    Match {
        #[arg(value_name = "GRAMMAR")]
        grammar: PathBuf,
        #[arg(short, long)]
        rule: String,
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
        /// Report every mismatch, not only the furthest
        #[arg(short, long)]
        trace: bool,
    },
    /// Print random sentences of a rule
    Generate {
        #[arg(value_name = "GRAMMAR")]
        grammar: PathBuf,
        #[arg(short, long)]
        rule: String,
        /// Seed for reproducible output
        #[arg(short, long)]
        seed: Option<u64>,
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
        /// Extra repetitions allowed for unbounded repeats
        #[arg(long, default_value_t = DEFAULT_GENERATION_CEILING)]
        ceiling: usize,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).init();

    match args.command {
        Command::Print { grammar } => {
            let compiled = load_grammar(&grammar, &LowerOptions::default())?;
            print!("{}", compiled.print()?);
        }
        Command::Scan {
            grammar,
            rule,
            input,
        } => {
            let compiled = load_grammar(&grammar, &LowerOptions::default())?;
            let root = find_rule(&compiled, &rule)?;
            let mut reader = load_input(input.as_deref())?;
            for m in compiled.grammar.scan(root, &mut reader, &mut VoidLogger)? {
                println!("{}: {}", m.begin, m.text());
            }
        }
        Command::Match {
            grammar,
            rule,
            input,
            trace,
        } => {
            let options = LowerOptions {
                log_mismatches: true,
                ..LowerOptions::default()
            };
            let compiled = load_grammar(&grammar, &options)?;
            let root = find_rule(&compiled, &rule)?;
            let mut reader = load_input(input.as_deref())?;
            let mut logger = StackLogger::new();

            match compiled.grammar.match_at(root, &mut reader, &mut logger)? {
                Some(m) => println!("{}..{}: {}", m.begin, m.end, m.text()),
                None => {
                    if trace {
                        for mismatch in &logger.mismatches {
                            eprintln!("{}", describe(mismatch));
                        }
                    } else if let Some(mismatch) = logger.furthest() {
                        eprintln!("{}", describe(mismatch));
                    }
                    bail!("no match for rule '{rule}'");
                }
            }
        }
        Command::Generate {
            grammar,
            rule,
            seed,
            count,
            ceiling,
        } => {
            let options = LowerOptions {
                generation_ceiling: ceiling,
                ..LowerOptions::default()
            };
            let compiled = load_grammar(&grammar, &options)?;
            let root = find_rule(&compiled, &rule)?;
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            for _ in 0..count {
                let mut sentence = String::new();
                compiled.grammar.generate(root, &mut sentence, &mut rng)?;
                println!("{sentence}");
            }
        }
    }
    Ok(())
}

fn load_grammar(path: &Path, options: &LowerOptions) -> Result<CompiledGrammar> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let compiled = ebnf::compile(&text, options)
        .with_context(|| format!("Invalid grammar {}", path.display()))?;
    log::debug!("{}: {} rule(s)", path.display(), compiled.rules.len());
    Ok(compiled)
}

fn find_rule(compiled: &CompiledGrammar, name: &str) -> Result<PatternRef> {
    compiled
        .rule(name)
        .with_context(|| format!("No rule named '{name}'"))
}

fn load_input(path: Option<&Path>) -> Result<TextReader> {
    let reader = match path {
        Some(path) => {
            let file = fs::File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            TextReader::from_reader(file)
        }
        None => TextReader::from_reader(io::stdin().lock()),
    };
    reader.context("Failed to read input")
}

fn describe(mismatch: &Mismatch<char, TextPos>) -> String {
    let name = if mismatch.id.is_empty() {
        "<anonymous>"
    } else {
        mismatch.id.as_str()
    };
    match &mismatch.error {
        Some(reason) => format!("{}: {name}: {reason}", mismatch.begin),
        None => format!("{}: {name}", mismatch.begin),
    }
}
