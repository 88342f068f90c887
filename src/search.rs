//! Inspection and conversion commands over a docs index

use clap::ValueEnum;
use colored::*;
use docidx::docs::{DocEntry, DocIndex, EntryKind, get_docs, legacy};
use std::{
    borrow::Cow,
    fs,
    path::{Path, PathBuf},
};

use crate::config::Config;

/// On-disk formats an index can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// JSON array of entries
    Json,
    /// The generator's `var DATA = [...]` script
    Js,
}

/// Index file to open: the command-line flag, then the config, else the embedded index
pub fn resolve_index_path(flag: Option<PathBuf>, config: &Config) -> Option<PathBuf> {
    flag.or_else(|| config.index_path.clone())
}

/// Open the index at `path`, or the embedded one when no path is given
pub fn open_index(path: Option<&Path>) -> Result<Cow<'static, DocIndex>, String> {
    match path {
        Some(path) => DocIndex::load_file(path)
            .map(Cow::Owned)
            .map_err(|e| e.to_string()),
        None => get_docs()
            .map(Cow::Borrowed)
            .map_err(|e| format!("Embedded docs index is malformed: {}", e)),
    }
}

/// Print every entry, optionally only one kind
pub fn list_entries(index: &DocIndex, kind: Option<EntryKind>) -> Result<(), String> {
    let mut count = 0;
    for entry in index.iter().filter(|e| kind.is_none_or(|k| e.kind == k)) {
        display_entry(entry);
        count += 1;
    }

    println!(
        "\n{} {} entr{}",
        "✓".green(),
        count.to_string().bold(),
        if count == 1 { "y" } else { "ies" }
    );
    Ok(())
}

/// Resolve an id or a fully qualified label
pub fn find_entry<'a>(index: &'a DocIndex, query: &str) -> Option<&'a DocEntry> {
    match query.parse::<usize>() {
        Ok(id) => index.get(id),
        Err(_) => index.get_by_label(query),
    }
}

/// Show one entry with its package or its classes
pub fn show_entry(index: &DocIndex, query: &str, max_results: usize) -> Result<(), String> {
    if query.trim().is_empty() {
        return Err(format!("No entry '{}' in the docs index", query));
    }

    let Some(entry) = find_entry(index, query) else {
        let results = index.search(query);
        if results.is_empty() {
            return Err(format!("No entry '{}' in the docs index", query));
        }

        println!(
            "{} No exact match found. Did you mean one of these?\n",
            "ℹ️".blue()
        );
        for entry in results.iter().take(max_results) {
            println!("  {} {}", "•".cyan(), entry.label.green());
        }
        if results.len() > max_results {
            println!("\n  ... and {} more", results.len() - max_results);
        }
        return Ok(());
    };

    println!();
    println!("{}", "╔═══════════════════════════════════════════╗".cyan());
    println!(
        "║ {} {}: {}",
        "📦".cyan(),
        capitalize(entry.kind.as_str()),
        entry.label.green().bold()
    );
    println!("{}", "╚═══════════════════════════════════════════╝".cyan());
    println!();
    println!("{} {}", "Id:".bold(), entry.id);
    println!("{} {}", "Link:".bold(), entry.link.cyan());

    match entry.kind {
        EntryKind::Package => {
            let classes = index.classes_in_package(&entry.label);
            println!("{} {} class(es)", "Classes:".bold(), classes.len());
            println!();
            for class in classes {
                println!(
                    "  {} {} {}",
                    "•".cyan(),
                    class.simple_name().green(),
                    class.link.dimmed()
                );
            }
        }
        EntryKind::Class => match index.package_of(entry) {
            Some(package) => println!("{} {}", "Package:".bold(), package.label.yellow()),
            None => {
                if let Some(parent) = entry.parent() {
                    println!(
                        "{} {} {}",
                        "Package:".bold(),
                        parent.yellow(),
                        "(not documented)".dimmed()
                    );
                }
            }
        },
    }
    println!();

    Ok(())
}

/// Substring search over labels
pub fn search_entries(index: &DocIndex, query: &str, max_results: usize) -> Result<(), String> {
    let results = index.search(query);
    if results.is_empty() {
        println!("{} No results found for '{}'", "ℹ️".blue(), query);
        return Ok(());
    }

    println!("\n{} Found {} result(s):\n", "🔍".cyan(), results.len());
    for entry in results.iter().take(max_results) {
        display_entry(entry);
    }
    if results.len() > max_results {
        println!("\n  ... and {} more", results.len() - max_results);
    }

    Ok(())
}

/// Counts and fingerprint
pub fn show_info(index: &DocIndex) -> Result<(), String> {
    let fingerprint = index
        .fingerprint()
        .map_err(|e| format!("Failed to serialize index: {}", e))?;

    println!("{} Docs index", "📚".cyan());
    println!("   Entries:     {}", index.len().to_string().bold());
    println!("   Packages:    {}", index.packages().count());
    println!("   Classes:     {}", index.classes().count());
    println!("   Fingerprint: {}", fingerprint.dimmed());
    Ok(())
}

/// Load a file and report whether it is a well-formed index
pub fn validate_file(path: &Path) -> Result<(), String> {
    let index = DocIndex::load_file(path)
        .map_err(|e| format!("{} is not a valid docs index: {}", path.display(), e))?;

    println!(
        "{} {} is valid ({} entries: {} packages, {} classes)",
        "✅".green(),
        path.display(),
        index.len(),
        index.packages().count(),
        index.classes().count()
    );
    Ok(())
}

/// Pick the output format: explicit choice, then output extension, then JSON
pub fn resolve_format(requested: Option<Format>, output: Option<&Path>) -> Format {
    requested.unwrap_or_else(|| match output.and_then(|p| p.extension()) {
        Some(ext) if ext == "js" => Format::Js,
        _ => Format::Json,
    })
}

pub fn render(index: &DocIndex, format: Format) -> Result<String, String> {
    match format {
        Format::Json => index
            .to_json_pretty()
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(|e| format!("Failed to serialize index: {}", e)),
        Format::Js => Ok(legacy::render(index)),
    }
}

/// Convert between the JSON asset and the generator's script
pub fn convert_file(
    input: &Path,
    output: Option<&Path>,
    requested: Option<Format>,
) -> Result<(), String> {
    let index = DocIndex::load_file(input).map_err(|e| e.to_string())?;
    let format = resolve_format(requested, output);
    let rendered = render(&index, format)?;

    match output {
        Some(path) => {
            fs::write(path, rendered)
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
            tracing::debug!(
                input = %input.display(),
                output = %path.display(),
                entries = index.len(),
                "index converted"
            );
            println!(
                "{} Wrote {} entries to {}",
                "✅".green(),
                index.len(),
                path.display()
            );
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

fn display_entry(entry: &DocEntry) {
    let kind = match entry.kind {
        EntryKind::Package => entry.kind.as_str().yellow(),
        EntryKind::Class => entry.kind.as_str().blue(),
    };
    println!(
        "  {} {:>4} {:<7} {}",
        "•".cyan(),
        entry.id.to_string().dimmed(),
        kind,
        entry.label.green()
    );
    println!("         {}", entry.link.dimmed());
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
