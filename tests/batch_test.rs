//! Batch orchestration integration tests
//!
//! A batch is best effort: it must attempt the whole roll sequence and
//! always leave artifacts behind, even when the portal yields nothing.

use parinaam::batch::BatchRunner;
use parinaam::config::{Config, PacingConfig};
use std::fs;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESULT_PAGE: &str = include_str!("fixtures/html/full_result.html");

fn test_config(base_url: &str, output_dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.fetch.base_url = base_url.to_string();
    config.fetch.request_timeout_secs = 5;
    config.fetch.max_retries = 1;
    config.fetch.base_delay_ms = 1;
    config.fetch.requests_per_second = 1000;
    config.pacing = PacingConfig::none();
    config.output.dir = output_dir.to_path_buf();
    config
}

#[tokio::test]
async fn test_all_failures_still_produce_artifacts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/scheme21/studentresult/result.asp"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&mock_server.uri(), dir.path());

    let mut runner = BatchRunner::new(config, Some(1)).unwrap();
    let stats = runner.run_department("21", "BAR").await.unwrap();

    assert_eq!(stats.attempted, 150);
    assert_eq!(stats.fetched, 0);
    assert_eq!(stats.extracted, 0);

    // JSON artifact holds an empty array
    let json = fs::read_to_string(dir.path().join("results_21BAR.json")).unwrap();
    let records: Vec<parinaam::StudentRecord> = serde_json::from_str(&json).unwrap();
    assert!(records.is_empty());

    // CSV lists all 150 attempted rolls
    let csv = fs::read_to_string(dir.path().join("roll_numbers.csv")).unwrap();
    let rolls: Vec<&str> = csv.trim().split(',').collect();
    assert_eq!(rolls.len(), 150);
    assert_eq!(rolls[0], "\"21BAR001\"");
    assert_eq!(rolls[149], "\"21BAR150\"");
}

#[tokio::test]
async fn test_successful_rolls_are_collected_in_order() {
    let mock_server = MockServer::start().await;

    // Two rolls have result pages; everything else is missing
    for roll in ["21BCS002", "21BCS007"] {
        Mock::given(method("POST"))
            .and(path("/scheme21/studentresult/result.asp"))
            .and(body_string_contains(format!("RollNumber={roll}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(RESULT_PAGE.replace("21BCS005", roll)),
            )
            .mount(&mock_server)
            .await;
    }

    Mock::given(method("POST"))
        .and(path("/scheme21/studentresult/result.asp"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&mock_server.uri(), dir.path());

    let mut runner = BatchRunner::new(config, Some(42)).unwrap();
    let stats = runner.run_department("21", "BCS").await.unwrap();

    assert_eq!(stats.attempted, 150);
    assert_eq!(stats.fetched, 2);
    assert_eq!(stats.extracted, 2);

    let json = fs::read_to_string(dir.path().join("results_21BCS.json")).unwrap();
    let records: Vec<parinaam::StudentRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].roll_number, "21BCS002");
    assert_eq!(records[1].roll_number, "21BCS007");
    assert_eq!(records[0].semesters.len(), 2);
}

#[tokio::test]
async fn test_template_mismatch_counts_as_fetched_not_extracted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>wrong page</html>"))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&mock_server.uri(), dir.path());

    let mut runner = BatchRunner::new(config, None).unwrap();
    let stats = runner.run_department("21", "BPH").await.unwrap();

    assert_eq!(stats.attempted, 150);
    assert_eq!(stats.fetched, 150);
    assert_eq!(stats.extracted, 0);
}

#[tokio::test]
async fn test_single_student_writes_named_artifact() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/scheme21/studentresult/result.asp"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULT_PAGE))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&mock_server.uri(), dir.path());

    let mut runner = BatchRunner::new(config, None).unwrap();
    let path = runner.run_student("21BCS005").await.unwrap().unwrap();

    assert_eq!(path.file_name().unwrap(), "21BCS005_result.json");
    let record: parinaam::StudentRecord =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(record.roll_number, "21BCS005");
}

#[tokio::test]
async fn test_single_student_no_data_writes_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&mock_server.uri(), dir.path());

    let mut runner = BatchRunner::new(config, None).unwrap();
    let result = runner.run_student("21BCS005").await.unwrap();

    assert!(result.is_none());
    assert!(!dir.path().join("21BCS005_result.json").exists());
}
