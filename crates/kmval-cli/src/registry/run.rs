use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use kmval_eval::{SuiteMode, SuiteOutcome, SuiteSummary};
use serde::Serialize;
use uuid::Uuid;

use super::{RegistryError, RegistryResult};

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub manifest: PathBuf,
    pub mode: SuiteMode,
}

impl RunContext {
    pub fn start(manifest: PathBuf, mode: SuiteMode) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            manifest,
            mode,
        }
    }
}

/// JSON report written with `--report`.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: String,
    pub finished_at: String,
    pub duration_ms: i64,
    pub manifest: String,
    #[serde(flatten)]
    pub summary: SuiteSummary,
}

impl RunReport {
    pub fn new(ctx: &RunContext, outcome: &SuiteOutcome) -> Self {
        let finished_at = Utc::now();
        Self {
            run_id: ctx.run_id.clone(),
            started_at: ctx.started_at.to_rfc3339(),
            finished_at: finished_at.to_rfc3339(),
            duration_ms: (finished_at - ctx.started_at).num_milliseconds(),
            manifest: ctx.manifest.display().to_string(),
            summary: SuiteSummary::new(outcome, ctx.mode),
        }
    }
}

/// Write the report as pretty JSON.
///
/// The JSON lands in a hidden sibling file first and is renamed into place,
/// so readers never observe a partial report.
pub fn write_report(path: &Path, report: &RunReport) -> RegistryResult<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| RegistryError::InvalidPath(path.display().to_string()))?;
    let staging = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

    let mut data = serde_json::to_vec_pretty(report)?;
    data.push(b'\n');

    persist(&staging, path, &data).map_err(|source| RegistryError::Report {
        path: path.to_path_buf(),
        source,
    })
}

fn persist(staging: &Path, path: &Path, data: &[u8]) -> io::Result<()> {
    let dir = path.parent().filter(|dir| !dir.as_os_str().is_empty());
    if let Some(dir) = dir {
        fs::create_dir_all(dir)?;
    }

    let mut file = File::create(staging)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);

    if let Err(err) = fs::rename(staging, path) {
        let _ = fs::remove_file(staging);
        return Err(err);
    }

    // Make the rename durable.
    if let Some(dir) = dir {
        File::open(dir)?.sync_all()?;
    }
    Ok(())
}
