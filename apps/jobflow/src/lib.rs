//! jobflow finds job postings, tailors a resume for each, and files every
//! application under its own id with a CSV ledger.
//!
//! The programmatic entry point is [`pipeline::Orchestrator::run`].

pub mod cli;
pub mod config;
pub mod errors;
pub mod filing;
pub mod llm_client;
pub mod models;
pub mod pipeline;
pub mod resume;
pub mod search;
pub mod tailoring;
