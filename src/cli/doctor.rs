//! Doctor command - check configuration and provider

use anyhow::Result;
use console::style;

use crate::config::{EvalConfig, ENV_PROVIDER_URL, ENV_TIMEOUT_SECS, PROJECT_CONFIG_FILE};
use crate::nlp::LinguisticFacts;

pub fn run(config: &EvalConfig, facts: &dyn LinguisticFacts) -> Result<()> {
    println!("{}\n", style("essay-eval doctor").bold());

    match EvalConfig::user_config_path() {
        Some(path) if path.exists() => println!("✓ User config: {}", path.display()),
        Some(path) => println!("○ User config: none ({})", style(path.display()).dim()),
        None => println!("○ User config: no config directory"),
    }
    if std::path::Path::new(PROJECT_CONFIG_FILE).exists() {
        println!("✓ Project config: {}", PROJECT_CONFIG_FILE);
    } else {
        println!("○ Project config: none (run `essay-eval init`)");
    }
    for var in [ENV_PROVIDER_URL, ENV_TIMEOUT_SECS] {
        if std::env::var(var).is_ok() {
            println!("✓ {} is set", var);
        }
    }

    println!(
        "  Provider: {} ({}, timeout {}s, language {})",
        facts.name(),
        config.provider_url(),
        config.timeout().as_secs(),
        config.language()
    );

    match facts.health() {
        Ok(()) => {
            println!("{} Linguistic facts provider: OK", style("✓").green());
            println!("\n{}", style("All checks passed!").green());
            Ok(())
        }
        Err(e) => {
            println!("{} Linguistic facts provider: {}", style("✗").red(), e);
            anyhow::bail!("provider health check failed")
        }
    }
}
