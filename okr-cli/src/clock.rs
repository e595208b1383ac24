//! Resolving "now" for the core: wall clock in a configured timezone, or an override.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// Local wall time in `tz` at the UTC instant `at`.
pub fn local_now(at: DateTime<Utc>, tz: &str) -> Result<NaiveDateTime> {
    let tz = parse_timezone(tz)?;
    Ok(at.with_timezone(&tz).naive_local())
}

/// Parse a `--now` override: `YYYY-MM-DDTHH:MM`, `YYYY-MM-DD HH:MM` or `YYYY-MM-DD` (midnight).
pub fn parse_now_override(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    for fmt in ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ndt);
        }
    }
    let d = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid --now '{s}' (expected YYYY-MM-DDTHH:MM)"))?;
    Ok(d.and_time(chrono::NaiveTime::MIN))
}

/// The `now` handed to okr-core.
pub fn resolve_now(override_now: Option<&str>, tz: &str) -> Result<NaiveDateTime> {
    match override_now {
        Some(s) => parse_now_override(s),
        None => local_now(Utc::now(), tz),
    }
}
