//! Init command - create a project config file

use anyhow::Result;
use console::style;
use std::path::Path;

use crate::config::{EvalConfig, PROJECT_CONFIG_FILE};

pub fn run(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("Path is not a directory: {}", dir.display());
    }

    let existing = dir.join(PROJECT_CONFIG_FILE);
    if existing.exists() {
        println!(
            "{} Already initialized: {}",
            style("✓").green(),
            style(existing.display()).cyan()
        );
        return Ok(());
    }

    let path = EvalConfig::init_project_config(dir)?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(path.display()).cyan()
    );
    println!(
        "\n  Edit {} to point at your linguistic facts service, then run:\n  {}",
        style("[provider] url").bold(),
        style("essay-eval evaluate essay.txt").cyan()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_then_keeps_config() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path()).unwrap();
        let path = dir.path().join(PROJECT_CONFIG_FILE);
        assert!(path.exists());

        std::fs::write(&path, "# custom\n").unwrap();
        run(dir.path()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# custom\n");
    }

    #[test]
    fn test_init_rejects_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(&dir.path().join("nope")).is_err());
    }
}
