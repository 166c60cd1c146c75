use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

const PAYLOAD: &str = r##"{
  "clips": [
    {"id": "c1", "title": "Opening hook", "startSec": 3, "endSec": 14, "hashtags": ["#hook", "#intro"]},
    {"title": "", "startSec": 20, "endSec": 30},
    {"id": "c2", "title": "Key insight", "start": 35, "duration": 17}
  ]
}"##;

fn payload_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

/// `reel` with every REEL_* variable cleared
fn reel() -> Command {
    let mut cmd = Command::cargo_bin("reel").unwrap();
    for var in [
        "REEL_MOCK",
        "REEL_ENDPOINT",
        "REEL_API_KEY",
        "REEL_MAX_CLIPS",
        "REEL_REQUEST_TIMEOUT_SECS",
        "REEL_MOCK_DELAY_MS",
        "REEL_ENRICH_HASHTAGS",
        "REEL_USE_FRAGMENTS",
        "REEL_LOG_LEVEL",
        "REEL_LOG_FORMAT",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_normalize_text_output() {
    let payload = payload_file(PAYLOAD);
    reel()
        .args(["normalize", "--payload"])
        .arg(payload.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[c1] Opening hook  0:03-0:14  #hook #intro"))
        .stdout(predicate::str::contains("[c2] Key insight  0:35-0:52"));
}

#[test]
fn test_normalize_json_from_stdin() {
    reel()
        .args(["normalize", "--payload", "-", "--format", "json"])
        .write_stdin(PAYLOAD)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"endSec\": 52.0"))
        .stdout(predicate::str::contains("\"id\": \"c2\""));
}

#[test]
fn test_normalize_nothing_usable() {
    let payload = payload_file(r#"[{"title": ""}]"#);
    reel()
        .args(["normalize", "--payload"])
        .arg(payload.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No highlights detected."));
}

#[test]
fn test_analyze_requires_input() {
    reel().arg("analyze").assert().failure();
}

#[test]
fn test_analyze_mock_mode() {
    reel()
        .args(["analyze", "--url", "https://example.com/talk.mp4", "--mock", "--max-clips", "2"])
        .env("REEL_MOCK_DELAY_MS", "0")
        .assert()
        .success()
        .stdout(predicate::str::contains("Key insight"))
        .stdout(predicate::str::contains("Final takeaway").not());
}

#[test]
fn test_analyze_rejects_non_http_url() {
    reel()
        .args(["analyze", "--url", "ftp://example.com/talk.mp4", "--mock"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Enter a valid http(s) URL."));
}

#[test]
fn test_analyze_without_endpoint() {
    reel()
        .args(["analyze", "--url", "https://example.com/talk.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("REEL_ENDPOINT"));
}

#[test]
fn test_preview_stops_at_clip_end() {
    let payload = payload_file(PAYLOAD);
    reel()
        .args([
            "preview",
            "--source",
            "https://example.com/talk.mp4",
            "--clip",
            "c2",
            "--tick-ms",
            "1",
            "--speed",
            "1000",
            "--duration",
            "120",
            "--payload",
        ])
        .arg(payload.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Clip c2 stopped at 0:52"));
}

#[test]
fn test_config_file_enables_mock_mode() {
    let config = payload_file("[reel]\nmock_mode = true\nmock_delay_ms = 0\n");
    reel()
        .args(["analyze", "--url", "https://example.com/talk.mp4", "--format", "yaml", "--config"])
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("title: Final takeaway"));
}
