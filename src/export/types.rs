use std::path::PathBuf;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Combined artifact: every exported content type plus when the run happened.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub exported_at: String,
    pub content_types: Map<String, Value>,
}

impl ExportBundle {
    pub fn new() -> Self {
        Self {
            exported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            content_types: Map::new(),
        }
    }
}

// Plan envelope types
#[derive(Serialize)]
pub struct PlannedFetch { pub content_type: String, pub url: String }

#[derive(Serialize)]
pub struct ExportPlan { pub base_url: String, pub out_dir: PathBuf, pub requests: Vec<PlannedFetch> }

// Apply/result envelope types
#[derive(Debug, Serialize)]
pub struct TypeExport { pub content_type: String, pub entries: usize, pub path: PathBuf }

#[derive(Debug, Serialize)]
pub struct ExportReport {
    pub out_dir: PathBuf,
    pub exported: Vec<TypeExport>,
    pub failed: Vec<String>,
    pub bundle_path: PathBuf,
}
