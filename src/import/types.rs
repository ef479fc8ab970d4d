use std::path::PathBuf;

use serde::Serialize;

// Plan envelope types
#[derive(Serialize)]
pub struct PlannedFile { pub content_type: String, pub path: PathBuf, pub entries: usize, pub batches: usize }

#[derive(Serialize)]
pub struct ImportPlan { pub base_url: String, pub in_dir: PathBuf, pub batch_size: usize, pub batch_delay_ms: u128, pub files: Vec<PlannedFile> }

// Apply/result envelope types
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct TypeSummary { pub content_type: String, pub entries: usize, pub batches: usize, pub imported: usize, pub failed: usize }

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct ImportTotals { pub imported: usize, pub failed: usize }

#[derive(Debug, Serialize)]
pub struct ImportReport { pub totals: ImportTotals, pub per_type: Vec<TypeSummary> }

impl ImportReport {
    pub fn from_summaries(per_type: Vec<TypeSummary>) -> Self {
        let totals = per_type.iter().fold(ImportTotals::default(), |acc, t| ImportTotals {
            imported: acc.imported + t.imported,
            failed: acc.failed + t.failed,
        });
        Self { totals, per_type }
    }
}

/// Number of request groups for `entries` at `batch_size` per group.
pub fn batch_count(entries: usize, batch_size: usize) -> usize {
    entries.div_ceil(batch_size.max(1))
}
