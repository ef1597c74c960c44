//! Text report for check results
//!
//! Renders one line per checked requirement, grouped by severity:
//! updates first (major, then minor, then patch), unpinned requirements,
//! up-to-date entries (verbose only), then lookup failures and parse
//! warnings. Alphabetical within each group.

use crate::domain::{ChangeKind, CheckSummary, Resolution, ResolutionStatus};
use colored::Colorize;
use std::io::{self, Write};

/// Display configuration for the report
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Show skipped and up-to-date entries as well
    pub verbose: bool,
    /// Append changelog/homepage links to update lines
    pub info: bool,
    /// Emphasize unpinned requirements as warnings
    pub pin_warn: bool,
    /// Disable styled output
    pub boring: bool,
}

/// Renders a CheckSummary as human-readable text
pub struct TextReporter {
    options: ReportOptions,
}

impl TextReporter {
    /// Create a new reporter
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Render the full report
    pub fn render(&self, summary: &CheckSummary, writer: &mut dyn Write) -> io::Result<()> {
        let sorted = summary.sorted_resolutions();

        let updates: Vec<&Resolution> = sorted
            .iter()
            .copied()
            .filter(|r| r.is_outdated())
            .collect();
        let unpinned: Vec<&Resolution> = sorted
            .iter()
            .copied()
            .filter(|r| matches!(r.status, ResolutionStatus::Unpinned))
            .collect();
        let up_to_date: Vec<&Resolution> = sorted
            .iter()
            .copied()
            .filter(|r| matches!(r.status, ResolutionStatus::UpToDate))
            .collect();
        let failures: Vec<&Resolution> = sorted
            .iter()
            .copied()
            .filter(|r| r.is_failure())
            .collect();

        let name_width = sorted
            .iter()
            .map(|r| r.requirement.name.len())
            .max()
            .unwrap_or(0);

        if !updates.is_empty() {
            self.section(writer, "Updates")?;
            for resolution in &updates {
                self.update_line(writer, resolution, name_width)?;
            }
        }

        if !unpinned.is_empty() {
            self.section(writer, "Unpinned")?;
            for resolution in &unpinned {
                self.unpinned_line(writer, resolution)?;
            }
        }

        if self.options.verbose {
            if !summary.skipped.is_empty() {
                self.section(writer, "Skipped")?;
                for skipped in &summary.skipped {
                    let line = format!("{} {}", self.marker("⬜", "-"), skipped);
                    writeln!(writer, "{}", self.dimmed(&line))?;
                }
            }

            if !up_to_date.is_empty() {
                self.section(writer, "Up to date")?;
                for resolution in &up_to_date {
                    self.up_to_date_line(writer, resolution)?;
                }
            }
        }

        if !failures.is_empty() || !summary.warnings.is_empty() {
            self.section(writer, "Errors")?;
            for resolution in &failures {
                if let ResolutionStatus::LookupFailed { reason } = &resolution.status {
                    writeln!(
                        writer,
                        "{} {}: {}",
                        self.marker("⛔", "x"),
                        self.emphasized(&resolution.requirement.name),
                        reason
                    )?;
                }
            }
            for warning in &summary.warnings {
                writeln!(writer, "{} {}", self.marker("⛔", "x"), warning)?;
            }
        }

        self.footer(writer, summary)
    }

    fn section(&self, writer: &mut dyn Write, title: &str) -> io::Result<()> {
        let bar = if self.options.boring { "-" } else { "─" };
        let pad = 44usize.saturating_sub(title.len());
        let rule = format!("{0}{0} {1} {2}", bar, title, bar.repeat(pad));
        if self.options.boring {
            writeln!(writer, "{}", rule)
        } else {
            writeln!(writer, "{}", rule.bold())
        }
    }

    fn update_line(
        &self,
        writer: &mut dyn Write,
        resolution: &Resolution,
        name_width: usize,
    ) -> io::Result<()> {
        let requirement = &resolution.requirement;
        let current = requirement
            .specifier
            .as_ref()
            .map(|s| s.raw.clone())
            .unwrap_or_default();
        let latest = resolution.latest.as_deref().unwrap_or("?");
        let change = match &resolution.status {
            ResolutionStatus::Outdated { change } => *change,
            _ => ChangeKind::Patch,
        };
        let date = resolution
            .released_at
            .map(|d| format!(" ({})", d.format("%Y/%m/%d")))
            .unwrap_or_default();

        if self.options.boring {
            writeln!(
                writer,
                "* {:width$} {} -> {} [{}]{}",
                requirement.name,
                current,
                latest,
                change.label(),
                date,
                width = name_width
            )?;
        } else {
            // Pad before styling so ANSI codes do not skew the column
            let name_padded = format!("{:width$}", requirement.name, width = name_width);
            writeln!(
                writer,
                "🔼 {} {} {} {} [{}]{}",
                name_padded.bold(),
                current.dimmed(),
                "→".dimmed(),
                latest.bright_white().bold(),
                self.change_label(change),
                date.dimmed()
            )?;
        }

        if self.options.info {
            if let Some(url) = &resolution.info_url {
                let line = format!("   {}", url);
                writeln!(writer, "{}", self.dimmed(&line))?;
            }
        }
        Ok(())
    }

    fn unpinned_line(&self, writer: &mut dyn Write, resolution: &Resolution) -> io::Result<()> {
        let name = &resolution.requirement.name;
        let marker = self.marker("🟨", "!");
        match (&resolution.latest, self.options.pin_warn) {
            (Some(latest), true) => writeln!(
                writer,
                "{} {} {} {}",
                marker,
                self.warning(name),
                self.marker("❔", "->"),
                latest
            ),
            (Some(latest), false) => writeln!(
                writer,
                "{} {} {} {}",
                marker,
                self.emphasized(name),
                self.marker("❔", "->"),
                latest
            ),
            (None, true) => writeln!(
                writer,
                "{} {} (version not pinned)",
                marker,
                self.warning(name)
            ),
            (None, false) => writeln!(
                writer,
                "{} {} (version not pinned)",
                marker,
                self.emphasized(name)
            ),
        }
    }

    fn up_to_date_line(&self, writer: &mut dyn Write, resolution: &Resolution) -> io::Result<()> {
        writeln!(
            writer,
            "{} {} {}",
            self.marker("✅", "="),
            resolution.requirement.name,
            resolution.latest.as_deref().unwrap_or("")
        )
    }

    fn footer(&self, writer: &mut dyn Write, summary: &CheckSummary) -> io::Result<()> {
        if summary.is_empty() {
            return writeln!(writer, "Nothing to check in the requirements file.");
        }

        let outdated = summary.outdated_count();
        if outdated == 0 && summary.failure_count() == 0 && summary.unpinned_count() == 0 {
            let line = "All pinned requirements are up to date.";
            return if self.options.boring {
                writeln!(writer, "{}", line)
            } else {
                writeln!(writer, "{}", line.green())
            };
        }

        let mut parts = Vec::new();
        if outdated > 0 {
            parts.push(format!("{} update(s) available", outdated));
        }
        if summary.unpinned_count() > 0 {
            parts.push(format!("{} unpinned", summary.unpinned_count()));
        }
        if summary.failure_count() > 0 {
            parts.push(format!("{} lookup(s) failed", summary.failure_count()));
        }
        if !summary.warnings.is_empty() {
            parts.push(format!("{} parse warning(s)", summary.warnings.len()));
        }

        writeln!(writer)?;
        let line = parts.join(", ");
        if self.options.boring {
            writeln!(writer, "{}", line)
        } else {
            writeln!(writer, "{}", line.dimmed())
        }
    }

    fn marker<'a>(&self, styled: &'a str, plain: &'a str) -> &'a str {
        if self.options.boring {
            plain
        } else {
            styled
        }
    }

    fn change_label(&self, change: ChangeKind) -> String {
        match change {
            ChangeKind::Major => "major".red().bold().to_string(),
            ChangeKind::Minor => "minor".yellow().to_string(),
            ChangeKind::Patch => "patch".green().to_string(),
        }
    }

    fn emphasized(&self, text: &str) -> String {
        if self.options.boring {
            text.to_string()
        } else {
            text.bold().to_string()
        }
    }

    fn warning(&self, text: &str) -> String {
        if self.options.boring {
            text.to_string()
        } else {
            text.yellow().bold().to_string()
        }
    }

    fn dimmed(&self, text: &str) -> String {
        if self.options.boring {
            text.to_string()
        } else {
            text.dimmed().to_string()
        }
    }
}
