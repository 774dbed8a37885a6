//! `semver-best` command

use super::output;
use anyhow::{Context, Result};
use metatypes_types::validators::semver;

/// Configuration for the semver-best command
pub struct SemverConfig {
    pub constraint: String,
    pub versions: Vec<String>,
    pub all: bool,
}

pub fn run(config: SemverConfig) -> Result<()> {
    if config.all {
        let satisfying =
            semver::find_versions_satisfying(&config.constraint, config.versions.as_slice())
                .with_context(|| format!("Invalid constraint {}", config.constraint))?;
        for version in &satisfying {
            println!("{}", version);
        }
        if satisfying.is_empty() {
            anyhow::bail!("No version satisfies {}", config.constraint);
        }
        return Ok(());
    }

    match semver::find_version_best(&config.constraint, config.versions.as_slice())
        .with_context(|| format!("Invalid constraint {}", config.constraint))?
    {
        Some(best) => {
            println!("{}", best);
            Ok(())
        }
        None => {
            eprintln!(
                "{}",
                output::format_warning(&format!(
                    "none of {} versions satisfies {}",
                    config.versions.len(),
                    config.constraint
                ))
            );
            anyhow::bail!("No version satisfies {}", config.constraint)
        }
    }
}
