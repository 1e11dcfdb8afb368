/// Quote Linter: checks fallback catalogs against the quote shape rules.
///
/// Usage: quote_linter <catalog.ron | catalog_dir> [--builtin]
///        quote_linter --builtin

use mood_quotes::core::fallback::{catalog_key, FallbackCatalog};
use mood_quotes::schema::mood::Mood;
use mood_quotes::schema::quote::{Quote, QuoteIssue};
use std::collections::HashSet;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: quote_linter <catalog.ron | catalog_dir> [--builtin]");
        println!("       quote_linter --builtin");
        process::exit(0);
    }

    let mut catalog_path = None;
    let mut include_builtin = false;

    for arg in &args[1..] {
        if arg == "--builtin" {
            include_builtin = true;
        } else if catalog_path.is_none() {
            catalog_path = Some(arg.clone());
        } else {
            eprintln!("Unknown argument: {}", arg);
            process::exit(1);
        }
    }

    let mut catalog = if include_builtin {
        FallbackCatalog::builtin().clone()
    } else {
        FallbackCatalog::default()
    };

    if let Some(ref path) = catalog_path {
        let path = Path::new(path);
        if path.is_file() {
            match FallbackCatalog::load_from_ron(path) {
                Ok(overlay) => catalog.merge(overlay),
                Err(e) => {
                    eprintln!("ERROR: Failed to load catalog file: {}", e);
                    process::exit(1);
                }
            }
        } else if path.is_dir() {
            load_catalogs_recursive(path, &mut catalog);
        } else {
            eprintln!("ERROR: Path '{}' does not exist", path.display());
            process::exit(1);
        }
    }

    println!(
        "Loaded {} moods, {} quotes",
        catalog.len(),
        catalog.entries.values().map(Vec::len).sum::<usize>()
    );

    let (errors, warnings) = lint_catalog(&catalog);

    println!("\n=== Quote Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn load_catalogs_recursive(dir: &Path, catalog: &mut FallbackCatalog) {
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                load_catalogs_recursive(&path, catalog);
            } else if path.extension().and_then(|s| s.to_str()) == Some("ron") {
                match FallbackCatalog::load_from_ron(&path) {
                    Ok(overlay) => {
                        println!("  Loaded: {}", path.display());
                        catalog.merge(overlay);
                    }
                    Err(e) => {
                        eprintln!("  ERROR loading {}: {}", path.display(), e);
                    }
                }
            }
        }
    }
}

fn lint_catalog(catalog: &FallbackCatalog) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Coverage: every selector mood should have curated quotes
    for mood in Mood::ALL {
        let key = catalog_key(&mood.key());
        if !catalog.entries.contains_key(&key) {
            warnings.push(format!(
                "No quotes for selector mood '{}' (it will get the generic quote)",
                mood.label()
            ));
        }
    }

    let mut seen = HashSet::new();
    for key in catalog.keys() {
        let quotes = &catalog.entries[key];

        if quotes.len() < 2 {
            warnings.push(format!(
                "Mood '{}' has only {} quote (repeat requests will always show it)",
                key,
                quotes.len()
            ));
        }

        for text in quotes {
            if !seen.insert(text.as_str()) {
                warnings.push(format!("Mood '{}' repeats quote \"{}\"", key, text));
            }

            for issue in Quote::new(text.as_str()).issues() {
                let message = format!("Mood '{}': {} in \"{}\"", key, issue, text);
                match issue {
                    QuoteIssue::TooShort(_) => warnings.push(message),
                    _ => errors.push(message),
                }
            }
        }
    }

    (errors, warnings)
}
