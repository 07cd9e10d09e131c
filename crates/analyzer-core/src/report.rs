//! ============================================================================
//! Report Writer
//! ============================================================================
//! Renders the three-section analysis report and writes it to a timestamped
//! file in the working directory. Rendering targets any `Write`, so tests
//! never need the filesystem.
//! ============================================================================

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;

use crate::analysis;
use crate::types::{AnalyzerError, Username};

/// Width of the `=` rule under the report title
const TITLE_RULE: usize = 60;

/// Width of the `-` rule under each section header
const SECTION_RULE: usize = 40;

/// Counts and location of a written report
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub path: PathBuf,
    pub following: usize,
    pub followers: usize,
    pub mutual: usize,
}

pub struct ReportRenderer<W: Write> {
    writer: W,
}

impl<W: Write> ReportRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Render the full report body: title block, then the following,
    /// followers, and mutual sections, each sorted lexicographically.
    pub fn render(
        &mut self,
        target: &Username,
        followers: &HashSet<Username>,
        following: &HashSet<Username>,
        mutual: &HashSet<Username>,
        generated: DateTime<Local>,
    ) -> std::io::Result<()> {
        writeln!(self.writer, "Instagram Follower Analysis for @{target}")?;
        writeln!(
            self.writer,
            "Generated: {}",
            generated.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(self.writer, "{}", "=".repeat(TITLE_RULE))?;
        writeln!(self.writer)?;

        self.section(&format!("ACCOUNTS @{target} FOLLOWS"), following)?;
        writeln!(self.writer)?;
        self.section(&format!("ACCOUNTS THAT FOLLOW @{target}"), followers)?;
        writeln!(self.writer)?;
        self.section("MUTUAL FOLLOWS - Both follow each other", mutual)?;
        Ok(())
    }

    fn section(&mut self, label: &str, entries: &HashSet<Username>) -> std::io::Result<()> {
        writeln!(self.writer, "{label} ({})", entries.len())?;
        writeln!(self.writer, "{}", "-".repeat(SECTION_RULE))?;
        for username in analysis::sorted(entries) {
            writeln!(self.writer, "@{username}")?;
        }
        Ok(())
    }
}

/// Compute mutuals and write the report into `dir`. The filename embeds the
/// target and a second-resolution timestamp; two runs within the same second
/// overwrite silently, a known limitation.
pub fn write_report(
    dir: &Path,
    target: &Username,
    followers: &HashSet<Username>,
    following: &HashSet<Username>,
) -> Result<ReportOutcome, AnalyzerError> {
    let mutual = analysis::mutuals(followers, following);
    let generated = Local::now();
    let filename = format!("{target}_analysis_{}.txt", generated.format("%Y%m%d_%H%M%S"));
    let path = dir.join(filename);

    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    let mut renderer = ReportRenderer::new(&mut writer);
    renderer.render(target, followers, following, &mutual, generated)?;
    writer.flush()?;

    info!("report written to {}", path.display());
    Ok(ReportOutcome {
        path,
        following: following.len(),
        followers: followers.len(),
        mutual: mutual.len(),
    })
}
