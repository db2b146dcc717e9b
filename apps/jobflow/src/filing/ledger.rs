//! Ledger: the per-run CSV manifest of filed applications.
//!
//! CRITICAL: `init` truncates. The ledger records one run, not the history of all runs.
//! Rows are written whole under a lock, so concurrent appends never interleave.

use std::borrow::Cow;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, info};

use crate::errors::PipelineError;
use crate::models::ApplicationRecord;

pub const LEDGER_COLUMNS: [&str; 4] = ["Job Title", "Company", "Job Link", "Folder ID"];

pub struct Ledger {
    path: PathBuf,
    inner: Mutex<LedgerFile>,
}

struct LedgerFile {
    file: File,
    rows: usize,
}

impl Ledger {
    /// Creates the parent directory, truncates the ledger and writes the header row.
    pub fn init(path: impl Into<PathBuf>) -> Result<Self, PipelineError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| PipelineError::filesystem(parent, e))?;
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| PipelineError::filesystem(&path, e))?;

        file.write_all(format_row(&LEDGER_COLUMNS).as_bytes())
            .and_then(|_| file.sync_data())
            .map_err(|e| PipelineError::filesystem(&path, e))?;

        info!("Ledger initialized at {}", path.display());

        Ok(Self {
            path,
            inner: Mutex::new(LedgerFile { file, rows: 0 }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends exactly one row for `record`.
    pub fn append(&self, record: &ApplicationRecord) -> Result<(), PipelineError> {
        let folder_id = record.folder_id();
        let line = format_row(&[
            record.job.title.as_str(),
            record.job.company.as_str(),
            record.job.link.as_str(),
            folder_id.as_str(),
        ]);

        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner
            .file
            .write_all(line.as_bytes())
            .and_then(|_| inner.file.sync_data())
            .map_err(|e| PipelineError::filesystem(&self.path, e))?;
        inner.rows += 1;

        debug!("Ledger row {} written for {}", inner.rows, folder_id);
        Ok(())
    }

    /// Data rows written since `init`, header excluded.
    pub fn rows(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .rows
    }
}

/// Formats one CSV line, newline-terminated.
fn format_row(fields: &[&str]) -> String {
    let mut line = fields
        .iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

/// Quotes a field when it contains a delimiter, quote or line break (RFC 4180).
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
