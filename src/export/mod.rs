use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use clap::Args;
use reqwest::StatusCode;
use serde_json::Value;

use crate::api::{client, ContentApi, StrapiClient};
use crate::config::{MigrateConfig, BUNDLE_FILE_NAME};
use crate::telemetry::{self};
use crate::telemetry::ops::export::Phase as ExportPhase;

mod types;
mod write;

use types::{ExportBundle, ExportPlan, ExportReport, PlannedFetch, TypeExport};

/// Content types exported when `--types` is not given.
pub const DEFAULT_CONTENT_TYPES: [&str; 5] = [
    "mycitykolkata",
    "cover-content",
    "healthcare",
    "attraction",
    "suggestion",
];

/// cms-migrate export: pull every content type from the source CMS into JSON files
#[derive(Args, Default)]
pub struct ExportCmd {
    /// Source CMS base URL (overrides LOCAL_STRAPI_URL)
    #[arg(long)] pub url: Option<String>,
    /// Source API token (overrides STRAPI_API_TOKEN)
    #[arg(long)] pub token: Option<String>,
    #[arg(long)] pub out_dir: Option<PathBuf>,
    /// Comma-separated content types to export
    #[arg(long, value_delimiter = ',')] pub types: Vec<String>,
    #[arg(long)] pub timeout_secs: Option<u64>,
    /// Print the requests that would be made and exit
    #[arg(long, default_value_t = false)] pub dry_run: bool,
}

impl ExportCmd {
    fn apply_to(&self, cfg: &mut MigrateConfig) {
        if let Some(url) = &self.url { cfg.source.url = url.clone(); }
        if let Some(token) = &self.token { cfg.source.token = Some(token.clone()); }
        if let Some(dir) = &self.out_dir { cfg.dir = dir.clone(); }
        if let Some(secs) = self.timeout_secs { cfg.timeout = Some(Duration::from_secs(secs)); }
    }

    /// Requested types, or the defaults. Each name becomes `<type>.json` in the
    /// output directory, so names that could leave it are rejected.
    fn content_types(&self) -> Result<Vec<String>> {
        if self.types.is_empty() {
            return Ok(DEFAULT_CONTENT_TYPES.iter().map(|s| s.to_string()).collect());
        }
        for t in &self.types {
            if t.is_empty() || t == "." || t.contains(['/', '\\']) || t.contains("..") {
                bail!("Invalid content type name '{}'", t);
            }
        }
        Ok(self.types.clone())
    }
}

pub async fn run(mut cfg: MigrateConfig, args: ExportCmd) -> Result<()> {
    let started = Instant::now();
    let log = telemetry::export();
    args.apply_to(&mut cfg);
    let types = args.content_types()?;
    let _g = log.root_span_kv([
        ("url", cfg.source.url.clone()),
        ("out_dir", cfg.dir.display().to_string()),
        ("types", types.join(",")),
        ("dry_run", args.dry_run.to_string()),
    ]).entered();

    log.info("🚀 Starting data export");
    log.info(format!("📍 Source URL: {}", cfg.source.url));
    log.info(format!("📁 Output directory: {}", cfg.dir.display()));

    let token = match cfg.source_token() {
        Ok(t) => t.to_string(),
        Err(e) => {
            log.error(format!("❌ {e}"));
            log.info("📝 To create an API token: Admin Panel → Settings → API Tokens, create a token with \"Read\" permissions,");
            log.info("   then set it with: export STRAPI_API_TOKEN=your-token-here");
            return Err(e);
        }
    };
    let base_url = cfg.source.base_url()?;

    if args.dry_run {
        let _s = log.span(&ExportPhase::Plan).entered();
        let requests: Vec<PlannedFetch> = types.iter()
            .map(|t| PlannedFetch { content_type: t.clone(), url: client::list_url(&base_url, t) })
            .collect();
        log.info(format!("📝 Export plan — types={} out_dir={}", requests.len(), cfg.dir.display()));
        for r in &requests { log.info(format!("  GET {}", r.url)); }
        if telemetry::config::json_mode() {
            log.plan(&ExportPlan { base_url, out_dir: cfg.dir.clone(), requests })?;
        }
        return Ok(());
    }

    if write::ensure_dir(&cfg.dir)? {
        log.info(format!("📁 Created output directory: {}", cfg.dir.display()));
    }

    let api = StrapiClient::new(base_url, token, cfg.timeout)?;
    let report = export_all(&api, &types, &cfg.dir).await?;

    log.info(format!("💾 Combined export saved to: {}", report.bundle_path.display()));
    log.info(format!("✅ Export completed — exported={} failed={}", report.exported.len(), report.failed.len()));
    log.info(format!("📋 Next steps: review the files in {}, then run `cms-migrate import` against the target instance", cfg.dir.display()));

    if telemetry::config::json_mode() {
        log.result(&report, started)?;
    }
    Ok(())
}

/// Fetches each content type in order and writes `<type>.json` plus the combined
/// bundle. A type that fails to fetch is logged and left out; file writes are fatal.
pub async fn export_all(api: &dyn ContentApi, types: &[String], out_dir: &Path) -> Result<ExportReport> {
    let log = telemetry::export();
    let mut bundle = ExportBundle::new();
    let mut exported = Vec::new();
    let mut failed = Vec::new();

    for content_type in types {
        log.info(format!("📦 Exporting {}...", content_type));
        let data = {
            let _s = log.span_kv(&ExportPhase::FetchType, [("content_type", content_type.clone())]).entered();
            fetch_content_type(api, content_type).await
        };
        let Some(data) = data else {
            failed.push(content_type.clone());
            continue;
        };

        let entries = entry_count(&data);
        let path = {
            let _s = log.span(&ExportPhase::WriteType).entered();
            write::write_json(out_dir.join(format!("{content_type}.json")), &data)?
        };
        log.info(format!("💾 Saved to: {}", path.display()));
        bundle.content_types.insert(content_type.clone(), data);
        exported.push(TypeExport { content_type: content_type.clone(), entries, path });
    }

    let bundle_path = {
        let _s = log.span(&ExportPhase::WriteBundle).entered();
        write::write_json(out_dir.join(BUNDLE_FILE_NAME), &bundle)?
    };

    Ok(ExportReport { out_dir: out_dir.to_path_buf(), exported, failed, bundle_path })
}

/// The exportable data for one content type, or None when the request failed,
/// returned a status other than 200, or carried no data.
async fn fetch_content_type(api: &dyn ContentApi, content_type: &str) -> Option<Value> {
    let log = telemetry::export();
    match api.fetch_entries(content_type).await {
        Ok(resp) if resp.status == StatusCode::OK => {
            let data = resp.body.into_data();
            if is_empty_data(&data) {
                log.warn(format!("⚠️  No data returned for {}", content_type));
                return None;
            }
            log.type_exported(content_type, entry_count(&data));
            Some(data)
        }
        Ok(resp) => {
            log.error_kv(&format!("❌ Failed to export {}", content_type), [
                ("status", resp.status.as_u16().to_string()),
                ("body", resp.body.to_string()),
            ]);
            None
        }
        Err(e) => {
            log.error_kv(&format!("❌ Error exporting {}", content_type), [
                ("timeout", e.is_timeout().to_string()),
                ("error", e.to_string()),
            ]);
            None
        }
    }
}

fn is_empty_data(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn entry_count(data: &Value) -> usize {
    data.as_array().map(Vec::len).unwrap_or(0)
}
