//! End-to-end runs against mock search and generation backends.
//!
//! Real adapters, real filesystem; only the two HTTP services are mocked.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jobflow::filing::allocator::{MANIFEST_FILE, RESUME_FILE};
use jobflow::filing::ApplicationAllocator;
use jobflow::llm_client::LlmClient;
use jobflow::models::ApplicationManifest;
use jobflow::pipeline::{Orchestrator, RunOptions, RunParams, Stage};
use jobflow::search::serper::SerperClient;
use jobflow::search::PortalJobSource;
use jobflow::tailoring::LlmResumeTailor;

const TAILORED: &str = "Jane Doe\nAgentic AI Engineer\n- Built multi-agent LLM pipelines in Rust";

/// A 500-word plain-text resume.
fn resume_500_words() -> String {
    let mut words = vec!["Jane", "Doe", "Software", "Engineer"];
    let filler = ["built", "scalable", "Rust", "services", "for", "agentic", "workflows"];
    while words.len() < 500 {
        words.push(filler[words.len() % filler.len()]);
    }
    words.join(" ")
}

async fn mock_gemini() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/models/.+:generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": TAILORED}]}}],
            "usageMetadata": {"promptTokenCount": 900, "candidatesTokenCount": 400}
        })))
        .mount(&server)
        .await;
    server
}

fn orchestrator(serper: &MockServer, gemini: &MockServer, root: &Path) -> Orchestrator {
    let search =
        SerperClient::new("serper-key".to_string(), serper.uri(), Duration::from_secs(5)).unwrap();
    let llm = LlmClient::new("gemini-key".to_string(), gemini.uri(), Duration::from_secs(5))
        .unwrap()
        .with_backoff(Duration::from_millis(1));

    Orchestrator::new(
        Arc::new(PortalJobSource::new(search)),
        Arc::new(LlmResumeTailor::new(llm)),
        ApplicationAllocator::new(root),
        root.join("jobs.csv"),
        RunOptions::default(),
    )
}

fn params(dir: &Path, resume: &str) -> RunParams {
    let resume_path = dir.join("res.txt");
    std::fs::write(&resume_path, resume).unwrap();
    RunParams {
        topic: "Agentic AI".to_string(),
        location: "Gurugram".to_string(),
        resume_path,
    }
}

fn ledger_lines(root: &Path) -> Vec<String> {
    std::fs::read_to_string(root.join("jobs.csv"))
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

fn folders(root: &Path) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(root)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.is_dir())
        .collect()
}

#[tokio::test]
async fn test_three_postings_produce_three_folders_and_rows() {
    let serper = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic": [
                {"title": "Agentic AI Engineer - Acme - LinkedIn", "link": "https://in.linkedin.com/jobs/view/101", "snippet": "Design LLM agents."},
                {"title": "Globex hiring GenAI Developer in Gurugram, Haryana | LinkedIn", "link": "https://in.linkedin.com/jobs/view/102"},
                {"title": "AI Research Engineer - Initech - Naukri.com", "link": "https://www.naukri.com/job-listings-103"}
            ]
        })))
        .expect(1)
        .mount(&serper)
        .await;
    let gemini = mock_gemini().await;

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("applications");
    let resume = resume_500_words();

    let report = orchestrator(&serper, &gemini, &root)
        .run(&params(dir.path(), &resume))
        .await
        .unwrap();

    assert_eq!(report.records.len(), 3);
    assert_eq!(report.ledger_rows, 3);
    assert!(!report.used_fallback);

    let lines = ledger_lines(&root);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Job Title,Company,Job Link,Folder ID");
    assert!(lines[1].starts_with("Agentic AI Engineer,Acme,https://in.linkedin.com/jobs/view/101,"));
    assert!(lines[2].starts_with("GenAI Developer,Globex,"));
    assert!(lines[3].starts_with("AI Research Engineer,Initech,"));

    assert_eq!(folders(&root).len(), 3);
    for record in &report.records {
        assert!(!record.resume.text.is_empty());
        assert_ne!(record.resume.text, resume);

        let text = std::fs::read_to_string(record.folder_path.join(RESUME_FILE)).unwrap();
        assert_eq!(text, TAILORED);
        let manifest: ApplicationManifest =
            serde_json::from_slice(&std::fs::read(record.folder_path.join(MANIFEST_FILE)).unwrap())
                .unwrap();
        assert_eq!(manifest.id, record.id);
    }
}

#[tokio::test]
async fn test_search_failure_still_files_one_placeholder_application() {
    let serper = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&serper)
        .await;
    let gemini = mock_gemini().await;

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("applications");

    let report = orchestrator(&serper, &gemini, &root)
        .run(&params(dir.path(), &resume_500_words()))
        .await
        .unwrap();

    assert!(report.used_fallback);
    assert_eq!(report.postings_found, 1);
    assert_eq!(report.records.len(), 1);
    assert!(report.records[0].job.is_placeholder());

    let lines = ledger_lines(&root);
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("Sample Job Title,[placeholder] Tech Corp,"));
    assert_eq!(folders(&root).len(), 1);
}

#[tokio::test]
async fn test_generation_outage_aborts_in_tailor_and_names_the_job() {
    let serper = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic": [
                {"title": "Agentic AI Engineer - Acme - LinkedIn", "link": "https://in.linkedin.com/jobs/view/101"}
            ]
        })))
        .mount(&serper)
        .await;
    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&gemini)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("applications");

    let err = orchestrator(&serper, &gemini, &root)
        .run(&params(dir.path(), &resume_500_words()))
        .await
        .unwrap_err();

    assert_eq!(err.stage, Stage::Tailor);
    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().contains("'Agentic AI Engineer' at Acme"));
    assert_eq!(ledger_lines(&root).len(), 1);
    assert!(folders(&root).is_empty());
}

#[tokio::test]
async fn test_second_run_truncates_previous_ledger() {
    let serper = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic": [
                {"title": "Agentic AI Engineer - Acme - LinkedIn", "link": "https://in.linkedin.com/jobs/view/101"},
                {"title": "ML Engineer - Globex - LinkedIn", "link": "https://in.linkedin.com/jobs/view/102"}
            ]
        })))
        .mount(&serper)
        .await;
    let gemini = mock_gemini().await;

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("applications");
    let params = params(dir.path(), &resume_500_words());
    let orchestrator = orchestrator(&serper, &gemini, &root);

    let first = orchestrator.run(&params).await.unwrap();
    let second = orchestrator.run(&params).await.unwrap();

    // The ledger only describes the latest run; folders from both runs remain.
    assert_eq!(ledger_lines(&root).len(), 3);
    assert_eq!(folders(&root).len(), 4);
    assert!(first
        .records
        .iter()
        .all(|a| second.records.iter().all(|b| a.id != b.id)));
}
