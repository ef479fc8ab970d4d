use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Args;
use futures::future::join_all;
use serde_json::Value;
use tracing::Instrument;

use crate::api::{ApiResponse, ContentApi, StrapiClient};
use crate::config::MigrateConfig;
use crate::telemetry::{self};
use crate::telemetry::ops::import::Phase as ImportPhase;

mod discover;
mod entry;
mod types;

pub use entry::strip_source_fields;
use discover::ContentFile;
use types::{batch_count, ImportPlan, ImportReport, PlannedFile, TypeSummary};

/// cms-migrate import: replay exported JSON files as create requests on the target CMS
#[derive(Args, Default)]
pub struct ImportCmd {
    /// Target CMS base URL (overrides CLOUD_STRAPI_URL)
    #[arg(long)] pub url: Option<String>,
    /// Target API token (overrides CLOUD_STRAPI_API_TOKEN)
    #[arg(long)] pub token: Option<String>,
    #[arg(long)] pub in_dir: Option<PathBuf>,
    /// Entries submitted concurrently per batch
    #[arg(long)] pub batch_size: Option<usize>,
    /// Pause between batches, in milliseconds
    #[arg(long)] pub batch_delay_ms: Option<u64>,
    #[arg(long)] pub timeout_secs: Option<u64>,
    /// List what would be imported and exit
    #[arg(long, default_value_t = false)] pub dry_run: bool,
}

impl ImportCmd {
    fn apply_to(&self, cfg: &mut MigrateConfig) {
        if let Some(url) = &self.url { cfg.target.url = url.clone(); }
        if let Some(token) = &self.token { cfg.target.token = Some(token.clone()); }
        if let Some(dir) = &self.in_dir { cfg.dir = dir.clone(); }
        if let Some(n) = self.batch_size { cfg.batch_size = n; }
        if let Some(ms) = self.batch_delay_ms { cfg.batch_delay = Duration::from_millis(ms); }
        if let Some(secs) = self.timeout_secs { cfg.timeout = Some(Duration::from_secs(secs)); }
    }
}

pub async fn run(mut cfg: MigrateConfig, args: ImportCmd) -> Result<()> {
    let started = Instant::now();
    let log = telemetry::import();
    args.apply_to(&mut cfg);
    let _g = log.root_span_kv([
        ("url", cfg.target.url.clone()),
        ("in_dir", cfg.dir.display().to_string()),
        ("batch_size", cfg.batch_size.to_string()),
        ("batch_delay_ms", cfg.batch_delay.as_millis().to_string()),
        ("dry_run", args.dry_run.to_string()),
    ]).entered();

    log.info("🚀 Starting data import");
    log.info(format!("📍 Target URL: {}", cfg.target.url));
    log.info(format!("📁 Input directory: {}", cfg.dir.display()));

    let token = match cfg.target_token() {
        Ok(t) => t.to_string(),
        Err(e) => {
            log.error(format!("❌ {e}"));
            log.info("📝 To create an API token: Admin Panel → Settings → API Tokens, create a token with \"Full access\" permissions,");
            log.info("   then set it with: export CLOUD_STRAPI_API_TOKEN=your-token-here");
            return Err(e);
        }
    };
    let base_url = cfg.target.base_url()?;
    cfg.validate_batching()?;

    let files = {
        let _s = log.span(&ImportPhase::Discover).entered();
        discover::discover(&cfg.dir)?
    };
    log.info(format!("📋 Found {} content type files to import", files.len()));

    if args.dry_run {
        let _s = log.span(&ImportPhase::Plan).entered();
        let mut planned = Vec::with_capacity(files.len());
        for f in &files {
            let entries = match entry::load_entries(&f.path) {
                Ok(loaded) => loaded.map(|e| e.len()).unwrap_or(0),
                Err(e) => {
                    log.error_kv(&format!("❌ Could not read {}", f.path.display()), [("error", format!("{e:#}"))]);
                    0
                }
            };
            log.info(format!("  {} — entries={} batches={}", f.content_type, entries, batch_count(entries, cfg.batch_size)));
            planned.push(PlannedFile { content_type: f.content_type.clone(), path: f.path.clone(), entries, batches: batch_count(entries, cfg.batch_size) });
        }
        if telemetry::config::json_mode() {
            let plan = ImportPlan {
                base_url,
                in_dir: cfg.dir.clone(),
                batch_size: cfg.batch_size,
                batch_delay_ms: cfg.batch_delay.as_millis(),
                files: planned,
            };
            log.plan(&plan)?;
        }
        return Ok(());
    }

    let api = StrapiClient::new(base_url, token, cfg.timeout)?;
    let report = import_all(&api, &files, cfg.batch_size, cfg.batch_delay).await;

    {
        let _s = log.span(&ImportPhase::Summary).entered();
        log.info("📊 Import summary");
        for t in &report.per_type { log.type_summary(&t.content_type, t.imported, t.failed); }
        log.totals(report.totals.imported, report.totals.failed);
        log.info("✅ Import completed");
    }

    if telemetry::config::json_mode() {
        log.result(&report, started)?;
    }
    Ok(())
}

/// Imports every discovered file in order. Per-entry and per-file failures are
/// counted and logged, never returned.
pub async fn import_all(api: &dyn ContentApi, files: &[ContentFile], batch_size: usize, batch_delay: Duration) -> ImportReport {
    let mut per_type = Vec::with_capacity(files.len());
    for file in files {
        per_type.push(import_content_type(api, file, batch_size, batch_delay).await);
    }
    ImportReport::from_summaries(per_type)
}

async fn import_content_type(api: &dyn ContentApi, file: &ContentFile, batch_size: usize, batch_delay: Duration) -> TypeSummary {
    let log = telemetry::import();
    let mut summary = TypeSummary { content_type: file.content_type.clone(), ..TypeSummary::default() };
    log.info(format!("📦 Importing {}...", file.content_type));

    let loaded = {
        let _s = log.span_kv(&ImportPhase::LoadFile, [("path", file.path.display().to_string())]).entered();
        entry::load_entries(&file.path)
    };
    let entries = match loaded {
        Ok(Some(entries)) => entries,
        Ok(None) => {
            log.warn(format!("⚠️  File not found: {}", file.path.display()));
            return summary;
        }
        Err(e) => {
            log.error_kv(&format!("❌ Could not read {}", file.path.display()), [("error", format!("{e:#}"))]);
            return summary;
        }
    };
    log.info(format!("📄 Found {} entries to import", entries.len()));

    summary.entries = entries.len();
    summary.batches = batch_count(entries.len(), batch_size);

    for (i, batch) in entries.chunks(batch_size.max(1)).enumerate() {
        let span = log.span_kv(&ImportPhase::Batch, [("index", i.to_string()), ("size", batch.len().to_string())]);
        let outcomes = join_all(batch.iter().map(|e| create_one(api, &file.content_type, e)))
            .instrument(span)
            .await;
        for created in outcomes {
            if created { summary.imported += 1; } else { summary.failed += 1; }
        }

        if i + 1 < summary.batches {
            tokio::time::sleep(batch_delay).await;
        }
    }

    log.type_summary(&summary.content_type, summary.imported, summary.failed);
    summary
}

/// Submits one entry without its source-only fields. True when the target
/// accepted it (200/201).
async fn create_one(api: &dyn ContentApi, content_type: &str, entry: &Value) -> bool {
    let log = telemetry::import();
    if entry.is_null() {
        log.error_kv("❌ Failed to import entry", [
            ("content_type", content_type.to_string()),
            ("error", "entry is null".to_string()),
        ]);
        return false;
    }
    let clean = strip_source_fields(entry);
    let outcome = api.create_entry(content_type, &clean)
        .instrument(log.span(&ImportPhase::CreateEntry))
        .await;
    match outcome {
        Ok(resp) if resp.is_created() => {
            log.debug(format!("➕ created {} entry (status {})", content_type, resp.status.as_u16()));
            true
        }
        Ok(ApiResponse { status, body }) => {
            log.error_kv("❌ Failed to import entry", [
                ("content_type", content_type.to_string()),
                ("status", status.as_u16().to_string()),
                ("error", body.to_string()),
            ]);
            false
        }
        Err(e) => {
            log.error_kv("❌ Failed to import entry", [
                ("content_type", content_type.to_string()),
                ("timeout", e.is_timeout().to_string()),
                ("error", e.to_string()),
            ]);
            false
        }
    }
}
