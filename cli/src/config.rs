//! CLI Configuration

use anyhow::{anyhow, bail, Context as _};
use sase_forms::FormsSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "OPENSASE_FORMS_";

pub const KEYS: &[&str] = &[
    "schema_file",
    "default_format",
    "autosave_delay_ms",
    "submit_delay_ms",
    "submit_failure_rate",
    "schema_url",
    "base_url",
];

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,
    #[serde(flatten)]
    pub settings: FormsSettings,
}

impl Config {
    pub fn load(profile: Option<&str>) -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path(profile)?)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, profile: Option<&str>) -> anyhow::Result<PathBuf> {
        let path = Self::config_path(profile)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Overlay `OPENSASE_FORMS_<KEY>` variables. Unknown or malformed
    /// values are skipped with a warning.
    pub fn apply_env(&mut self, vars: impl IntoIterator<Item = (String, String)>) {
        for (name, value) in vars {
            let Some(key) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let key = key.to_ascii_lowercase();
            if !KEYS.contains(&key.as_str()) {
                continue;
            }
            if let Err(e) = self.set(&key, &value) {
                tracing::warn!(variable = %name, error = %e, "ignoring environment override");
            }
        }
    }

    pub fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let s = &self.settings;
        Ok(match key {
            "schema_file" => self.schema_file.clone(),
            "default_format" => self.default_format.clone(),
            "autosave_delay_ms" => Some(s.autosave_delay_ms.to_string()),
            "submit_delay_ms" => Some(s.submit_delay_ms.to_string()),
            "submit_failure_rate" => Some(s.submit_failure_rate.to_string()),
            "schema_url" => Some(s.schema_url.clone()),
            "base_url" => s.base_url.clone(),
            _ => bail!("Unknown config key: {}", key),
        })
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let s = &mut self.settings;
        match key {
            "schema_file" => self.schema_file = Some(value.to_string()),
            "default_format" => {
                value.parse::<crate::output::OutputFormat>().map_err(|e| anyhow!(e))?;
                self.default_format = Some(value.to_string());
            }
            "autosave_delay_ms" => s.autosave_delay_ms = value.parse()?,
            "submit_delay_ms" => s.submit_delay_ms = value.parse()?,
            "submit_failure_rate" => {
                let rate: f64 = value.parse()?;
                if !(0.0..=1.0).contains(&rate) {
                    bail!("submit_failure_rate must be between 0 and 1");
                }
                s.submit_failure_rate = rate;
            }
            "schema_url" => s.schema_url = value.to_string(),
            "base_url" => s.base_url = Some(value.to_string()),
            _ => bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    fn config_path(profile: Option<&str>) -> anyhow::Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("Cannot find home directory"))?;
        Ok(home.join(".opensase").join(Self::file_name(profile)))
    }

    fn file_name(profile: Option<&str>) -> String {
        match profile {
            Some(p) => format!("forms.{}.toml", p),
            None => "forms.toml".to_string(),
        }
    }
}
