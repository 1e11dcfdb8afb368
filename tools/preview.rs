/// Preview: interactive shell for trying moods, prompts and generators.
///
/// Usage: preview [--command <program> [--arg <a>]...] [--catalog <path>]
///                [--settings <path>] [--seed <n>]
///
/// Commands:
///   mood <label>           set active mood (e.g. `mood feeling down`)
///   generate | g           produce a quote for the active mood
///   bulk <n>               produce n quotes with provenance stats
///   prompt                 show the prompt for the active mood
///   temperature <0.1-1.0>  set creativity
///   length <30-100>        set generation length
///   seed <n>               reset the RNG seed
///   moods                  list selector moods
///   help                   list commands
///   quit                   exit

use mood_quotes::core::generator::CommandGenerator;
use mood_quotes::core::pipeline::{QuoteEngine, DEFAULT_SEED};
use mood_quotes::core::prompt::PromptBuilder;
use mood_quotes::schema::mood::Mood;
use mood_quotes::schema::outcome::{FallbackReason, Provenance};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let mut command = None;
    let mut command_args: Vec<String> = Vec::new();
    let mut catalog_paths: Vec<String> = Vec::new();
    let mut settings_path = None;
    let mut seed: u64 = DEFAULT_SEED;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--command" if i + 1 < args.len() => {
                i += 1;
                command = Some(args[i].clone());
            }
            "--arg" if i + 1 < args.len() => {
                i += 1;
                command_args.push(args[i].clone());
            }
            "--catalog" if i + 1 < args.len() => {
                i += 1;
                catalog_paths.push(args[i].clone());
            }
            "--settings" if i + 1 < args.len() => {
                i += 1;
                settings_path = Some(args[i].clone());
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().unwrap_or(DEFAULT_SEED);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut builder = QuoteEngine::builder().seed(seed);
    if let Some(ref program) = command {
        builder = builder.generator(CommandGenerator::new(program).args(command_args.clone()));
    }
    if let Some(ref path) = settings_path {
        builder = builder.settings_file(path);
    }
    for path in &catalog_paths {
        builder = builder.catalog_file(path);
    }

    let mut engine = match builder.build() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    if engine.has_generator() {
        println!("AI Status: generator ready ({})", command.as_deref().unwrap_or(""));
    } else {
        println!("AI Status: no generator configured, using curated quotes");
    }
    println!("Catalog: {} moods", engine.catalog().len());
    println!("Seed: {}", seed);
    println!("Type 'help' for commands.\n");

    let mut mood = Mood::Anxious.label();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("preview [{}]> ", mood);
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
            None => (line.to_lowercase(), ""),
        };

        match cmd.as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "help" | "h" | "?" => {
                print_help();
            }
            "moods" => {
                for m in Mood::ALL {
                    println!(
                        "  {:<20} {}",
                        m.label(),
                        m.description().unwrap_or_default()
                    );
                }
            }
            "mood" => {
                if rest.is_empty() {
                    println!("Usage: mood <label>");
                    println!("  Current: {}", mood);
                    continue;
                }
                let parsed = Mood::parse(rest);
                if parsed.is_custom() {
                    println!("'{}' is not a selector mood; it will use the generic context.", rest);
                } else if let Some(description) = parsed.description() {
                    println!("{}", description);
                }
                mood = rest.to_string();
            }
            "prompt" => {
                println!("\n--- Prompt ---");
                println!("{}", PromptBuilder::build(&mood));
                println!("--- End ---\n");
            }
            "generate" | "g" => {
                let outcome = engine.generate(&mood);
                println!("\n[{}]", outcome.provenance.badge());
                println!("{}", outcome.quote.quoted());
                println!("{}\n", outcome.notice());
            }
            "bulk" => {
                let n: usize = match rest.parse() {
                    Ok(n) => n,
                    Err(_) => {
                        println!("Usage: bulk <n>");
                        continue;
                    }
                };
                run_bulk(&mut engine, &mood, n);
            }
            "temperature" | "temp" => match rest.parse::<f32>() {
                Ok(t) => {
                    let settings = engine.settings().clone().with_temperature(t).snapped();
                    let snapped = settings.temperature;
                    match engine.set_settings(settings) {
                        Ok(()) => println!("Creativity set to {:.1}", snapped),
                        Err(e) => println!("ERROR: {}", e),
                    }
                }
                Err(_) => println!("Usage: temperature <0.1-1.0>"),
            },
            "length" => match rest.parse::<u32>() {
                Ok(l) => {
                    let settings = engine.settings().clone().with_length(l).snapped();
                    let snapped = settings.length;
                    match engine.set_settings(settings) {
                        Ok(()) => println!("Length set to {}", snapped),
                        Err(e) => println!("ERROR: {}", e),
                    }
                }
                Err(_) => println!("Usage: length <30-100>"),
            },
            "seed" => match rest.parse::<u64>() {
                Ok(s) => {
                    engine.reseed(s);
                    println!("Seed set to {}", s);
                }
                Err(_) => println!("Usage: seed <n>"),
            },
            _ => {
                println!("Unknown command '{}'. Type 'help' for commands.", cmd);
            }
        }
    }
}

fn run_bulk(engine: &mut QuoteEngine, mood: &str, n: usize) {
    let mut generated = 0usize;
    let mut misses = 0usize;
    let mut failures = 0usize;
    let mut unavailable = 0usize;
    let mut distinct = std::collections::HashSet::new();

    for _ in 0..n {
        let outcome = engine.generate(mood);
        match (&outcome.provenance, &outcome.fallback_reason) {
            (Provenance::AiGenerated, _) => generated += 1,
            (_, Some(FallbackReason::ExtractionMiss)) => misses += 1,
            (_, Some(FallbackReason::GenerationFailed { .. })) => failures += 1,
            _ => unavailable += 1,
        }
        println!("  {}", outcome.quote.quoted());
        distinct.insert(outcome.quote);
    }

    println!("\n--- Bulk Stats ---");
    println!("  requests:      {}", n);
    println!("  ai-generated:  {}", generated);
    println!("  unsuitable:    {}", misses);
    println!("  failed:        {}", failures);
    println!("  unavailable:   {}", unavailable);
    println!("  distinct:      {}", distinct.len());
    println!("--- End ---\n");
}

fn print_usage() {
    println!("Usage: preview [--command <program> [--arg <a>]...] [--catalog <path>]");
    println!("               [--settings <path>] [--seed <n>]");
    println!();
    println!("The generator program reads the prompt on stdin and prints the");
    println!("generated text. Sampling parameters arrive as QUOTE_* variables.");
}

fn print_help() {
    println!("Commands:");
    println!("  mood <label>           set active mood");
    println!("  generate | g           produce a quote for the active mood");
    println!("  bulk <n>               produce n quotes with provenance stats");
    println!("  prompt                 show the prompt for the active mood");
    println!("  temperature <0.1-1.0>  set creativity");
    println!("  length <30-100>        set generation length");
    println!("  seed <n>               reset the RNG seed");
    println!("  moods                  list selector moods");
    println!("  help                   this message");
    println!("  quit                   exit");
}
