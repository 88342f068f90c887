use colored::*;
use std::{fs, path::Path};

use crate::config::CONFIG_FILE;

const TEMPLATE: &str = r#"# docidx Configuration File

# Index to serve instead of the one compiled into the binary.
# JSON files and the generator's lists.js script are both accepted.
# index_path = "apidocs/reference/lists.json"

# Maximum number of search results to print
max_results = 10
"#;

pub fn init_config(force: bool) -> Result<(), String> {
    write_template(Path::new(CONFIG_FILE), force)?;

    println!("{} Created {}", "✅".green(), CONFIG_FILE);
    println!("\n{}", "Configuration file created with defaults:".cyan());
    println!("  {} index_path = (embedded index)", "•".blue());
    println!("  {} max_results = 10", "•".blue());
    println!(
        "\n{}",
        format!("Edit {} to customize your settings.", CONFIG_FILE).cyan()
    );

    Ok(())
}

fn write_template(config_path: &Path, force: bool) -> Result<(), String> {
    if config_path.exists() && !force {
        return Err(format!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        ));
    }

    fs::write(config_path, TEMPLATE)
        .map_err(|e| format!("Failed to create {}: {}", config_path.display(), e))
}
