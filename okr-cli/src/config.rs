use anyhow::{Context, Result};
use okr_core::DEFAULT_CATEGORIES;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::{default_objectives_path, ensure_okr_home, okr_home};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// IANA timezone used to resolve "now".
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Objectives JSON file used when `--file` is not given.
    #[serde(default)]
    pub objectives_file: Option<PathBuf>,

    /// Categories offered on import; the first one is the fallback.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            objectives_file: None,
            categories: default_categories(),
        }
    }
}

impl Config {
    pub fn objectives_path(&self) -> Result<PathBuf> {
        match &self.objectives_file {
            Some(p) => Ok(p.clone()),
            None => default_objectives_path(),
        }
    }

    pub fn default_category(&self) -> String {
        self.categories
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_CATEGORIES[0].to_string())
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(okr_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<()> {
    ensure_okr_home()?;
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
