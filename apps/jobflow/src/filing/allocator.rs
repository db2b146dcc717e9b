//! Application Record Allocator: gives each tailored resume a fresh id and its own folder.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::errors::PipelineError;
use crate::models::{ApplicationRecord, TailoredResume};

pub const RESUME_FILE: &str = "resume.txt";
pub const MANIFEST_FILE: &str = "application.json";

pub struct ApplicationAllocator {
    root: PathBuf,
}

impl ApplicationAllocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deterministic folder location for an id: `<root>/<id>`.
    pub fn folder_for(&self, id: Uuid) -> PathBuf {
        self.root.join(id.to_string())
    }

    /// Creates the folder for `id` if absent. Safe to call repeatedly.
    pub fn ensure_folder(&self, id: Uuid) -> Result<PathBuf, PipelineError> {
        let folder = self.folder_for(id);
        std::fs::create_dir_all(&folder).map_err(|e| PipelineError::filesystem(&folder, e))?;
        Ok(folder)
    }

    /// Allocates a new record for `resume` and populates its folder.
    ///
    /// The id is a random v4 UUID; it is never derived from content, so filing the
    /// same posting twice yields two records.
    pub fn allocate(&self, resume: TailoredResume) -> Result<ApplicationRecord, PipelineError> {
        let id = Uuid::new_v4();
        let folder_path = self.ensure_folder(id)?;

        let record = ApplicationRecord {
            id,
            job: resume.source_job.clone(),
            resume,
            folder_path,
            created_at: Utc::now(),
        };

        write_atomic(&record.folder_path, RESUME_FILE, record.resume.text.as_bytes())?;

        let manifest = serde_json::to_vec_pretty(&record.manifest()).map_err(|e| {
            PipelineError::filesystem(
                record.folder_path.join(MANIFEST_FILE),
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })?;
        write_atomic(&record.folder_path, MANIFEST_FILE, &manifest)?;

        info!(
            "Allocated application {} for {}",
            record.id,
            record.job.label()
        );
        Ok(record)
    }
}

/// Writes `contents` to `dir/name` via a temp file in the same directory, then renames it.
fn write_atomic(dir: &Path, name: &str, contents: &[u8]) -> Result<(), PipelineError> {
    let target = dir.join(name);
    let mut tmp =
        tempfile::NamedTempFile::new_in(dir).map_err(|e| PipelineError::filesystem(dir, e))?;
    tmp.write_all(contents)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| PipelineError::filesystem(tmp.path(), e))?;
    tmp.persist(&target)
        .map_err(|e| PipelineError::filesystem(&target, e.error))?;
    Ok(())
}
