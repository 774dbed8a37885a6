//! `cast`, `parse` and `format` commands

use super::output::{self, OutputFormat};
use crate::TypeRegistry;
use anyhow::{Context, Result};
use metatypes_model::{FileSecretStore, MemorySecretStore, SecretStore, StaticLocale};
use metatypes_types::{DataType, EncryptionKeyProvider, TypeContext, Value};
use std::path::PathBuf;
use std::sync::Arc;

/// What to do with each value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Cast,
    Parse,
    Format,
}

/// Configuration for the value commands
pub struct ValuesConfig {
    pub operation: Operation,
    pub type_alias: String,
    /// UXON configuration of the type as JSON text
    pub uxon: Option<String>,
    pub values: Vec<String>,
    pub locale: Option<String>,
    /// File holding installation variables (the encryption secret)
    pub secrets: Option<PathBuf>,
    pub format: OutputFormat,
    pub verbose: bool,
}

fn build_context(config: &ValuesConfig) -> TypeContext {
    let mut context = TypeContext::default();
    if let Some(locale) = &config.locale {
        context = context.with_locale(Arc::new(StaticLocale::new(locale.as_str())));
    }
    let store: Arc<dyn SecretStore> = match &config.secrets {
        Some(path) => Arc::new(FileSecretStore::new(path)),
        None => {
            if config.verbose {
                eprintln!(
                    "{}",
                    output::format_warning(
                        "No --secrets file given; encrypted values will not be readable later"
                    )
                );
            }
            Arc::new(MemorySecretStore::new())
        }
    };
    context.with_keys(Arc::new(EncryptionKeyProvider::new(store)))
}

fn apply(
    data_type: &dyn DataType,
    operation: Operation,
    input: &str,
) -> std::result::Result<String, metatypes_diagnostics::DataTypeError> {
    let value = Value::from(input);
    match operation {
        Operation::Cast => data_type.cast(&value).map(|v| v.to_plain_string()),
        Operation::Parse => data_type.parse(&value).map(|v| v.to_plain_string()),
        Operation::Format => Ok(data_type.format(&value)),
    }
}

/// Run every value through the configured type
pub fn run(config: ValuesConfig) -> Result<()> {
    if config.values.is_empty() {
        anyhow::bail!("No values given");
    }
    let uxon = config
        .uxon
        .as_deref()
        .map(serde_json::from_str::<serde_json::Value>)
        .transpose()
        .context("Type configuration is not valid JSON")?;

    let registry = TypeRegistry::new(build_context(&config));
    let data_type = registry
        .create(&config.type_alias, uxon.as_ref())
        .with_context(|| format!("Cannot create data type {}", config.type_alias))?;
    if config.verbose {
        eprintln!(
            "{} ({})",
            data_type.name(),
            data_type.validation_description()
        );
    }

    let outcomes: Vec<_> = config
        .values
        .iter()
        .map(|input| (input, apply(data_type.as_ref(), config.operation, input)))
        .collect();
    let failed = outcomes.iter().filter(|(_, o)| o.is_err()).count();

    match config.format {
        OutputFormat::Json => {
            let records: Vec<_> = outcomes
                .iter()
                .map(|(input, outcome)| output::outcome_json(input, outcome))
                .collect();
            println!("{}", output::format_json(&serde_json::Value::Array(records))?);
        }
        OutputFormat::Text => {
            for (input, outcome) in &outcomes {
                println!("{}", output::format_outcome(input, outcome));
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} values failed", failed, outcomes.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_operations() {
        let registry = TypeRegistry::with_defaults();
        let boolean = registry.create("Boolean", None).unwrap();
        assert_eq!(apply(boolean.as_ref(), Operation::Cast, "yes").unwrap(), "true");
        assert!(apply(boolean.as_ref(), Operation::Parse, "maybe").is_err());
    }

    #[test]
    fn test_run_reports_failures() {
        let config = ValuesConfig {
            operation: Operation::Parse,
            type_alias: "Integer".to_string(),
            uxon: Some(r#"{"max": 10}"#.to_string()),
            values: vec!["5".to_string(), "11".to_string()],
            locale: None,
            secrets: None,
            format: OutputFormat::Json,
            verbose: false,
        };
        let err = run(config).unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 values failed");
    }

    #[test]
    fn test_run_rejects_bad_configuration() {
        let config = ValuesConfig {
            operation: Operation::Cast,
            type_alias: "Integer".to_string(),
            uxon: Some("{not json".to_string()),
            values: vec!["1".to_string()],
            locale: None,
            secrets: None,
            format: OutputFormat::Text,
            verbose: false,
        };
        assert!(run(config).is_err());
    }
}
