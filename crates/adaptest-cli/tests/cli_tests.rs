//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Run the binary in an isolated directory so no user config is picked up.
fn adaptest(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("adaptest").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("ADAPTEST_GATEWAY_URL")
        .env_remove("RUST_LOG");
    cmd
}

fn question_body(correct: &str) -> serde_json::Value {
    serde_json::json!({
        "status": "success",
        "question": {
            "Topic": "Data Structures",
            "Difficulty_Level": 3,
            "Question_Text": "Which data structure uses LIFO?\\nPick one.",
            "Option_A": "Stack",
            "Option_B": "Queue",
            "Option_C": "Linked List",
            "Option_D": "Tree",
            "Correct_Option": correct,
            "Explanation": "A stack pops the most recently pushed item."
        }
    })
}

async fn question_service() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/start-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(question_body("A")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/submit-answer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(question_body("A")))
        .mount(&server)
        .await;
    server
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    adaptest(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Adaptive skills assessment"));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    adaptest(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("adaptest"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    adaptest(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created adaptest.toml"));

    assert!(dir.path().join("adaptest.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    adaptest(&dir).arg("init").assert().success();

    adaptest(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn profile_shows_config_from_current_directory() {
    let dir = TempDir::new().unwrap();
    adaptest(&dir).arg("init").assert().success();

    adaptest(&dir)
        .arg("profile")
        .assert()
        .success()
        .stdout(predicate::str::contains("Harish (Intermediate)"))
        .stdout(predicate::str::contains("Data Structures"))
        .stdout(predicate::str::contains("85%"));
}

#[test]
fn profile_rejects_duplicate_skills() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("custom.toml");
    std::fs::write(
        &config,
        r#"
[student]
name = "Sam"
skills = [{ name = "Python", mastery = 10 }, { name = "Python", mastery = 20 }]
"#,
    )
    .unwrap();

    adaptest(&dir)
        .arg("profile")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate skill"));
}

#[test]
fn missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    adaptest(&dir)
        .arg("profile")
        .arg("--config")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn run_rejects_unknown_format() {
    let dir = TempDir::new().unwrap();
    adaptest(&dir)
        .arg("run")
        .arg("--format")
        .arg("yaml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn run_rejects_zero_length() {
    let dir = TempDir::new().unwrap();
    adaptest(&dir)
        .arg("run")
        .arg("--length")
        .arg("0")
        .write_stdin("q\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("session length"));
}

#[test]
fn run_quits_from_dashboard() {
    let dir = TempDir::new().unwrap();
    adaptest(&dir)
        .arg("run")
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Learner"))
        .stdout(predicate::str::contains("Tests completed: 0"));
}

#[tokio::test(flavor = "multi_thread")]
async fn run_full_session_against_service() {
    let server = question_service().await;
    let dir = TempDir::new().unwrap();

    adaptest(&dir)
        .arg("run")
        .arg("--gateway-url")
        .arg(server.uri())
        .arg("--length")
        .arg("2")
        .write_stdin("s\nn\nA\nn\nB\nn\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Which data structure uses LIFO?\nPick one."))
        .stdout(predicate::str::contains("Select an option before submitting."))
        .stdout(predicate::str::contains("Score: 1/2 (50%)"))
        .stdout(predicate::str::contains("Lifetime accuracy: 50% over 1 test(s)"))
        .stdout(predicate::str::contains("A stack pops the most recently pushed item."));
}

#[tokio::test(flavor = "multi_thread")]
async fn run_json_report() {
    let server = question_service().await;
    let dir = TempDir::new().unwrap();

    adaptest(&dir)
        .arg("run")
        .arg("--gateway-url")
        .arg(server.uri())
        .arg("--length")
        .arg("1")
        .arg("--format")
        .arg("json")
        .write_stdin("s\nA\nn\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"score\": 1"))
        .stdout(predicate::str::contains("\"session_length\": 1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn run_surfaces_service_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/start-test"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = dir.path().join("adaptest.toml");
    std::fs::write(&config, "[retry]\nmax_retries = 0\n").unwrap();

    adaptest(&dir)
        .arg("run")
        .arg("--gateway-url")
        .arg(server.uri())
        .write_stdin("s\nd\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Could not load the next question"))
        .stdout(predicate::str::contains("HTTP 503"));
}

#[tokio::test(flavor = "multi_thread")]
async fn check_prints_question() {
    let server = question_service().await;
    let dir = TempDir::new().unwrap();

    adaptest(&dir)
        .arg("check")
        .arg("--gateway-url")
        .arg(server.uri())
        .assert()
        .success()
        .stdout(predicate::str::contains("TOPIC: Data Structures"))
        .stdout(predicate::str::contains("Answer: A"))
        .stdout(predicate::str::contains("Question service OK"));
}

#[tokio::test(flavor = "multi_thread")]
async fn check_rejects_incomplete_question() {
    let server = MockServer::start().await;
    let mut body = question_body("A");
    body["question"]
        .as_object_mut()
        .unwrap()
        .remove("Correct_Option");
    Mock::given(method("GET"))
        .and(path("/api/start-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    adaptest(&dir)
        .arg("check")
        .arg("--gateway-url")
        .arg(server.uri())
        .assert()
        .failure()
        .stderr(predicate::str::contains("question service check failed"))
        .stderr(predicate::str::contains("Correct_Option"));
}
