pub mod application;
pub mod job;

pub use application::{ApplicationManifest, ApplicationRecord};
pub use job::{JobPosting, TailoredResume};
