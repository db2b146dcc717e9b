use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::job::{JobPosting, TailoredResume};

/// A filed application: one per tailored resume, with its own folder.
#[derive(Debug, Clone)]
pub struct ApplicationRecord {
    pub id: Uuid,
    pub job: JobPosting,
    pub resume: TailoredResume,
    pub folder_path: PathBuf,
    pub created_at: DateTime<Utc>,
}

impl ApplicationRecord {
    /// Value written to the ledger's `Folder ID` column.
    pub fn folder_id(&self) -> String {
        self.id.to_string()
    }

    pub fn manifest(&self) -> ApplicationManifest {
        ApplicationManifest {
            id: self.id,
            job: self.job.clone(),
            created_at: self.created_at,
        }
    }
}

/// Contents of `application.json` inside each application folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationManifest {
    pub id: Uuid,
    pub job: JobPosting,
    pub created_at: DateTime<Utc>,
}
