use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$OKR_HOME`, or `~/.okr`.
pub fn okr_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("OKR_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".okr"))
}

pub fn ensure_okr_home() -> Result<PathBuf> {
    let dir = okr_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn default_objectives_path() -> Result<PathBuf> {
    Ok(okr_home()?.join("objectives.json"))
}
