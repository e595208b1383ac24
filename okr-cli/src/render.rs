//! Plain-text rendering of groups, statuses and summaries.

use std::fmt::{self, Write};

use chrono::NaiveDateTime;
use okr_core::{CategoryProgress, Objective, ProgressBand, ProgressWarning, Status, TemporalStatus, TimeGroup};

fn band_marker(progress: f64) -> &'static str {
    match ProgressBand::of(progress) {
        ProgressBand::High => "++",
        ProgressBand::Good => "+ ",
        ProgressBand::Fair => "- ",
        ProgressBand::Low => "--",
    }
}

fn bar(progress: f64) -> String {
    let filled = (progress.clamp(0.0, 100.0) / 10.0).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(10 - filled))
}

fn group_badge(status: TemporalStatus) -> &'static str {
    match status {
        TemporalStatus::Current => "Current",
        TemporalStatus::Future => "Upcoming",
        TemporalStatus::Past => "Past",
    }
}

/// "not-started" -> "Not Started"
pub fn status_label(status: Status) -> String {
    status
        .as_str()
        .split('-')
        .map(|w| {
            let mut cs = w.chars();
            match cs.next() {
                Some(first) => first.to_uppercase().chain(cs).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The `groups` text report: heading, one section per group, then any
/// data-quality warnings from recomputing progress.
pub fn groups_report(heading: &str, groups: &[TimeGroup], warnings: &[ProgressWarning]) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_groups(&mut out, heading, groups);
    out.push_str(&warnings_text(warnings));
    out
}

fn write_groups(out: &mut String, heading: &str, groups: &[TimeGroup]) -> fmt::Result {
    writeln!(out, "{heading}\n")?;
    if groups.is_empty() {
        return writeln!(out, "(no objectives in the selected period)");
    }

    for g in groups {
        writeln!(
            out,
            "## {}  [{}]  {} - {}",
            g.label,
            group_badge(g.status),
            g.start_date.format("%b %Y"),
            g.end_date.format("%b %Y")
        )?;
        writeln!(out, "{} {:.0}% complete\n", bar(g.progress), g.progress)?;

        for o in &g.objectives {
            writeln!(
                out,
                "- {} {} ({}) | {:.0}% | {} | {} - {}",
                band_marker(o.progress),
                o.title,
                o.category,
                o.progress,
                status_label(o.status),
                o.start_date.format("%b %-d, %Y"),
                o.end_date.format("%b %-d, %Y")
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn print_statuses(objectives: &[Objective], now: NaiveDateTime) {
    for o in objectives {
        println!(
            "{} [{}] {:.1}% - {} ({} days left)",
            o.title,
            o.category,
            o.progress,
            status_label(o.status),
            o.days_remaining(now)
        );
        for kr in &o.key_results {
            println!(
                "    - {}: {}/{} {} | {:.1}% | {} | {} days left",
                kr.description,
                kr.current_value,
                kr.target_value,
                kr.unit,
                kr.progress,
                status_label(kr.status),
                kr.days_remaining(now)
            );
            for (m, s) in kr.milestone_statuses(now) {
                println!(
                    "        * {} {} {}: {:?}",
                    m.date,
                    m.target_value,
                    m.description.as_deref().unwrap_or(""),
                    s
                );
            }
        }
    }
}

/// Empty when there is nothing to report.
pub fn warnings_text(warnings: &[ProgressWarning]) -> String {
    if warnings.is_empty() {
        return String::new();
    }
    let mut out = format!("\nData quality ({}):\n", warnings.len());
    for w in warnings {
        out.push_str(&format!("- {w}\n"));
    }
    out
}

pub fn print_warnings(warnings: &[ProgressWarning]) {
    print!("{}", warnings_text(warnings));
}

pub fn print_summary(categories: &[CategoryProgress], distribution: &[(Status, usize)]) {
    println!("## Progress by category\n");
    for c in categories {
        println!("{:<16} {} {:>5.1}% ({} objectives)", c.category, bar(c.progress), c.progress, c.count);
    }

    let total: usize = distribution.iter().map(|(_, n)| n).sum();
    println!("\n## Status distribution\n");
    for (status, n) in distribution {
        let pct = if total == 0 { 0.0 } else { *n as f64 / total as f64 * 100.0 };
        println!("{:<12} {:>3} ({:.0}%)", status_label(*status), n, pct);
    }
}
