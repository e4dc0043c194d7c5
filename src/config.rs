use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Root configuration structure, deserialized from `.abc-analyzer/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Config {
    /// Source column names for the canonical line fields.
    #[serde(default)]
    pub columns: ColumnMapping,
}

/// Declares which input columns feed each canonical field.
///
/// The mapping is fixed configuration; nothing is inferred from the input.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ColumnMapping {
    #[serde(default = "default_item_id")]
    pub item_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: String,
    #[serde(default = "default_value")]
    pub value: String,
    /// Human-readable attribute used only to order the cleaned lines.
    /// An empty string turns the ordering off.
    #[serde(default = "default_description")]
    pub description: Option<String>,
}

fn default_item_id() -> String {
    "item_id".to_string()
}

fn default_quantity() -> String {
    "qty".to_string()
}

fn default_value() -> String {
    "value".to_string()
}

fn default_description() -> Option<String> {
    Some("description".to_string())
}

impl Default for ColumnMapping {
    fn default() -> Self {
        ColumnMapping {
            item_id: default_item_id(),
            quantity: default_quantity(),
            value: default_value(),
            description: default_description(),
        }
    }
}

/// Per-run column overrides coming from the command line.
#[derive(Debug, Default)]
pub struct ColumnOverrides<'a> {
    pub item_id: Option<&'a str>,
    pub quantity: Option<&'a str>,
    pub value: Option<&'a str>,
    pub description: Option<&'a str>,
}

impl ColumnMapping {
    /// Apply command-line overrides on top of the loaded mapping.
    pub fn with_overrides(mut self, overrides: &ColumnOverrides<'_>) -> Self {
        if let Some(c) = overrides.item_id {
            self.item_id = c.to_string();
        }
        if let Some(c) = overrides.quantity {
            self.quantity = c.to_string();
        }
        if let Some(c) = overrides.value {
            self.value = c.to_string();
        }
        if let Some(c) = overrides.description {
            self.description = Some(c.to_string());
        }
        self
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<input_dir>/.abc-analyzer/config.toml`
/// 3. `~/.config/abc-analyzer/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(input_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = input_dir.join(".abc-analyzer").join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("abc-analyzer").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    log::debug!("no config file found, using built-in column mapping");
    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("invalid config {}", path.display()))?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_partial_columns_fall_back_to_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [columns]
            item_id = "ProductName"
            value = "LINeSales"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.columns.item_id, "ProductName");
        assert_eq!(cfg.columns.value, "LINeSales");
        assert_eq!(cfg.columns.quantity, "qty");
        assert_eq!(cfg.columns.description.as_deref(), Some("description"));
    }

    #[test]
    fn test_empty_file_is_default() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_load_from_input_dir() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".abc-analyzer")).unwrap();
        fs::write(
            dir.path().join(".abc-analyzer").join("config.toml"),
            "[columns]\nquantity = \"Units\"\n",
        )
        .unwrap();

        let cfg = load_config(dir.path(), None).unwrap();
        assert_eq!(cfg.columns.quantity, "Units");
    }

    #[test]
    fn test_override_path_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[columns]\nitem_id = \"sku\"\n").unwrap();

        let cfg = load_config(dir.path(), Some(&path)).unwrap();
        assert_eq!(cfg.columns.item_id, "sku");
    }

    #[test]
    fn test_malformed_config_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[columns\n").unwrap();
        assert!(load_config(dir.path(), Some(&path)).is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mapping = ColumnMapping::default().with_overrides(&ColumnOverrides {
            value: Some("LINeSales"),
            description: Some("Desc"),
            ..Default::default()
        });
        assert_eq!(mapping.item_id, "item_id");
        assert_eq!(mapping.value, "LINeSales");
        assert_eq!(mapping.description.as_deref(), Some("Desc"));
    }
}
