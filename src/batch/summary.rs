//! Batch summary: per-file counts, complexity scores and rendering.

use crate::config::ComplexityConfig;
use crate::descriptor::ConversionStats;
use crate::pipeline::CopyReport;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityRating {
    Low,
    Medium,
    High,
}

impl fmt::Display for ComplexityRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        })
    }
}

/// Weighted sum of the counts.
pub fn complexity_score(stats: &ConversionStats, weights: &ComplexityConfig) -> u32 {
    let weighted = |count: usize, weight: u32| (count as u32).saturating_mul(weight);
    weighted(stats.selectors, weights.selector)
        + weighted(stats.event_handlers, weights.handler)
        + weighted(stats.mutations, weights.mutation)
        + weighted(stats.remote_calls, weights.remote_call)
        + weighted(stats.animations, weights.animation)
        + weighted(stats.style_mutations, weights.style_mutation)
}

pub fn rate(score: u32, thresholds: &ComplexityConfig) -> ComplexityRating {
    if score > thresholds.high {
        ComplexityRating::High
    } else if score >= thresholds.medium {
        ComplexityRating::Medium
    } else {
        ComplexityRating::Low
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Converted {
        output: PathBuf,
        component: String,
        warnings: usize,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    /// Path relative to the batch root.
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
    pub stats: ConversionStats,
    pub score: u32,
    pub rating: ComplexityRating,
}

impl FileSummary {
    pub fn converted(
        path: PathBuf,
        output: PathBuf,
        component: String,
        warnings: usize,
        stats: ConversionStats,
        weights: &ComplexityConfig,
    ) -> Self {
        let score = complexity_score(&stats, weights);
        Self {
            path,
            status: FileStatus::Converted {
                output,
                component,
                warnings,
            },
            stats,
            score,
            rating: rate(score, weights),
        }
    }

    pub fn failed(path: PathBuf, error: String) -> Self {
        Self {
            path,
            status: FileStatus::Failed { error },
            stats: ConversionStats::default(),
            score: 0,
            rating: ComplexityRating::Low,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, FileStatus::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub root: PathBuf,
    pub output_root: PathBuf,
    pub converted: usize,
    pub failed: usize,
    pub totals: ConversionStats,
    pub total_score: u32,
    pub rating: ComplexityRating,
    pub files: Vec<FileSummary>,
    /// Linked stylesheets and scripts copied for the whole batch.
    pub resources: CopyReport,
}

impl BatchSummary {
    pub fn new(
        root: PathBuf,
        output_root: PathBuf,
        files: Vec<FileSummary>,
        weights: &ComplexityConfig,
    ) -> Self {
        let mut totals = ConversionStats::default();
        for file in &files {
            totals.accumulate(&file.stats);
        }
        let failed = files.iter().filter(|file| file.is_failed()).count();
        let total_score = complexity_score(&totals, weights);
        Self {
            root,
            output_root,
            converted: files.len() - failed,
            failed,
            totals,
            total_score,
            rating: rate(total_score, weights),
            files,
            resources: CopyReport::default(),
        }
    }

    pub fn with_resources(mut self, resources: CopyReport) -> Self {
        self.resources = resources;
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn rating_cell(rating: ComplexityRating) -> Cell {
        let text = rating.to_string();
        Cell::new(match rating {
            ComplexityRating::High => text.red().bold().to_string(),
            ComplexityRating::Medium => text.yellow().to_string(),
            ComplexityRating::Low => text.green().to_string(),
        })
    }

    fn stats_cells(stats: &ConversionStats) -> Vec<Cell> {
        [
            stats.selectors,
            stats.event_handlers,
            stats.mutations,
            stats.style_mutations,
            stats.remote_calls,
            stats.animations,
        ]
        .into_iter()
        .map(Cell::new)
        .collect()
    }

    /// Human-readable summary: a table per file, a totals row and the failures.
    pub fn render_table(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                "File",
                "Selectors",
                "Handlers",
                "Mutations",
                "Styles",
                "Remote",
                "Animations",
                "Score",
                "Rating",
            ]);

        for file in self.files.iter().filter(|file| !file.is_failed()) {
            let mut row = vec![Cell::new(file.path.display())];
            row.extend(Self::stats_cells(&file.stats));
            row.push(Cell::new(file.score));
            row.push(Self::rating_cell(file.rating));
            table.add_row(row);
        }
        let mut totals = vec![Cell::new("Total".bold())];
        totals.extend(Self::stats_cells(&self.totals));
        totals.push(Cell::new(self.total_score));
        totals.push(Self::rating_cell(self.rating));
        table.add_row(totals);

        let mut out = format!(
            "Converted {} of {} files into {}\n{table}\n",
            self.converted,
            self.files.len(),
            self.output_root.display()
        );
        for file in &self.files {
            if let FileStatus::Failed { error } = &file.status {
                out.push_str(&format!("{} {}: {}\n", "failed".red(), file.path.display(), error));
            }
        }
        if !self.resources.copied.is_empty() {
            out.push_str(&format!("Copied {} linked resources\n", self.resources.copied.len()));
        }
        for conflict in &self.resources.conflicts {
            out.push_str(&format!(
                "{} {} already taken by {}, {} not copied\n",
                "conflict".yellow(),
                conflict.destination.display(),
                conflict.kept.display(),
                conflict.skipped.display()
            ));
        }
        for error in &self.resources.errors {
            out.push_str(&format!("{} {}\n", "copy failed".red(), error));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(selectors: usize, handlers: usize, remote_calls: usize) -> ConversionStats {
        ConversionStats {
            selectors,
            event_handlers: handlers,
            remote_calls,
            ..ConversionStats::default()
        }
    }

    #[test]
    fn score_uses_the_weights() {
        let stats = ConversionStats {
            selectors: 1,
            event_handlers: 1,
            mutations: 1,
            remote_calls: 1,
            animations: 1,
            style_mutations: 1,
        };
        assert_eq!(complexity_score(&stats, &ComplexityConfig::default()), 11);
    }

    #[test]
    fn rating_boundaries() {
        let config = ComplexityConfig::default();
        assert_eq!(rate(9, &config), ComplexityRating::Low);
        assert_eq!(rate(10, &config), ComplexityRating::Medium);
        assert_eq!(rate(20, &config), ComplexityRating::Medium);
        assert_eq!(rate(21, &config), ComplexityRating::High);
    }

    #[test]
    fn totals_and_failures() {
        let weights = ComplexityConfig::default();
        let files = vec![
            FileSummary::converted("a.js".into(), "out/a.jsx".into(), "A".into(), 0, stats(4, 2, 1), &weights),
            FileSummary::failed("b.js".into(), "permission denied".into()),
            FileSummary::converted("c.js".into(), "out/c.jsx".into(), "C".into(), 1, stats(6, 3, 2), &weights),
        ];
        let summary = BatchSummary::new("src".into(), "out".into(), files, &weights);
        assert_eq!(summary.converted, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.totals.selectors, 10);
        assert_eq!(summary.total_score, 10 + 10 + 9);
        assert_eq!(summary.rating, ComplexityRating::High);
        assert_eq!(summary.files[0].rating, ComplexityRating::Medium);

        colored::control::set_override(false);
        let table = summary.render_table();
        assert!(table.starts_with("Converted 2 of 3 files into out\n"));
        assert!(table.contains("failed b.js: permission denied"));
    }

    #[test]
    fn resource_conflicts_are_listed() {
        use crate::pipeline::ResourceConflict;

        let weights = ComplexityConfig::default();
        let summary = BatchSummary::new("src".into(), "out".into(), Vec::new(), &weights)
            .with_resources(CopyReport {
                copied: vec!["out/x.css".into()],
                conflicts: vec![ResourceConflict {
                    destination: "out/x.css".into(),
                    kept: "src/a/x.css".into(),
                    skipped: "src/b/x.css".into(),
                }],
                errors: Vec::new(),
            });

        colored::control::set_override(false);
        let table = summary.render_table();
        assert!(table.contains("Copied 1 linked resources\n"));
        assert!(table.contains("conflict out/x.css already taken by src/a/x.css, src/b/x.css not copied"));
        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(json["resources"]["conflicts"][0]["skipped"], "src/b/x.css");
    }

    #[test]
    fn json_is_tagged_by_status() {
        let weights = ComplexityConfig::default();
        let summary = BatchSummary::new(
            "src".into(),
            "out".into(),
            vec![FileSummary::failed("b.js".into(), "boom".into())],
            &weights,
        );
        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(json["files"][0]["status"], "failed");
        assert_eq!(json["files"][0]["error"], "boom");
        assert_eq!(json["rating"], "low");
    }
}
