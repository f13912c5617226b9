//! Integration tests for the essay-eval CLI
//!
//! These tests run the actual binary against recorded linguistic facts in
//! `tests/fixtures` to verify:
//! - Evaluation of files and stdin produces the expected scores
//! - JSON output matches the evaluation result shape
//! - The JSON-RPC server answers evaluate, health and shutdown
//! - Errors exit non-zero without printing a partial result
//!
//! Each test runs in its own temp directory with an isolated config home.

use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn essay_eval(workdir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_essay-eval"));
    cmd.current_dir(workdir)
        .env("XDG_CONFIG_HOME", workdir.join(".config"))
        .env("HOME", workdir)
        .env_remove("ESSAY_EVAL_PROVIDER_URL")
        .env_remove("ESSAY_EVAL_TIMEOUT_SECS")
        .env_remove("RUST_LOG");
    cmd
}

fn run(workdir: &Path, args: &[&str], stdin: Option<&str>) -> Output {
    let mut child = essay_eval(workdir)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute essay-eval binary");
    {
        let mut pipe = child.stdin.take().expect("stdin");
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).expect("write stdin");
        }
    }
    child.wait_with_output().expect("wait for essay-eval")
}

fn stdout_json(output: &Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({e}):\n{stdout}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stderr)
        )
    })
}

fn evaluate_json(dir: &TempDir, essay: &str, facts: &str, extra: &[&str]) -> Output {
    let essay = fixture(essay);
    let facts = fixture(facts);
    let mut args = vec![
        "evaluate",
        essay.to_str().unwrap(),
        "--facts",
        facts.to_str().unwrap(),
        "--format",
        "json",
    ];
    args.extend(extra);
    run(dir.path(), &args, None)
}

#[test]
fn test_evaluate_file_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = evaluate_json(&dir, "cats_and_dogs.txt", "cats_and_dogs.json", &[]);
    assert!(output.status.success());

    let result = stdout_json(&output);
    assert_eq!(result["overall_score"], 0.7);
    assert_eq!(result["cefr_level"], "B2");
    assert_eq!(result["letter_grade"], "C");
    assert_eq!(result["detailed_analysis"]["grammar"]["score"], 1.0);
    assert_eq!(
        result["detailed_analysis"]["vocabulary"]["feedback"]["metrics"]["unique_words"],
        5
    );
    assert_eq!(
        result["detailed_analysis"]["coherence"]["feedback"]["metrics"]["topic_consistency"],
        0.0
    );
    assert_eq!(
        result["feedback"]["strengths"],
        serde_json::json!(["Strong grammatical foundation"])
    );
}

#[test]
fn test_evaluate_stdin_matches_file() {
    let dir = tempfile::tempdir().unwrap();
    let from_file = stdout_json(&evaluate_json(
        &dir,
        "cats_and_dogs.txt",
        "cats_and_dogs.json",
        &[],
    ));

    let facts = fixture("cats_and_dogs.json");
    let essay = std::fs::read_to_string(fixture("cats_and_dogs.txt")).unwrap();
    let output = run(
        dir.path(),
        &[
            "evaluate",
            "-",
            "--facts",
            facts.to_str().unwrap(),
            "--format",
            "json",
        ],
        Some(&essay),
    );
    assert!(output.status.success());
    assert_eq!(stdout_json(&output), from_file);
}

#[test]
fn test_two_paragraph_essay() {
    let dir = tempfile::tempdir().unwrap();
    let output = evaluate_json(
        &dir,
        "two_paragraphs.txt",
        "two_paragraphs.json",
        &["--essay-type", "academic"],
    );
    assert!(output.status.success());
    let result = stdout_json(&output);

    let grammar = &result["detailed_analysis"]["grammar"];
    assert_eq!(grammar["feedback"]["metrics"]["error_count"], 1);
    assert_eq!(grammar["feedback"]["metrics"]["word_count"], 9);
    assert_eq!(
        grammar["feedback"]["analysis"]["error_details"][0]["rule_id"],
        "UPPERCASE_SENTENCE_START"
    );
    assert_eq!(
        grammar["feedback"]["suggestions"][0],
        "Ensure all sentences start with a capital letter"
    );

    let coherence = &result["detailed_analysis"]["coherence"]["feedback"];
    assert_eq!(coherence["metrics"]["transition_score"], 1.0);
    assert_eq!(coherence["metrics"]["topic_consistency"], 0.5);
    assert_eq!(coherence["analysis"]["paragraph_structure"]["total_paragraphs"], 2);
    assert_eq!(coherence["analysis"]["transitions"]["contrast"], 1);
    assert_eq!(coherence["analysis"]["transitions"]["sequence"], 1);
    assert_eq!(coherence["analysis"]["topic_flow"]["topic_shifts"], 0);
}

#[test]
fn test_text_output_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("report.txt");
    let essay = fixture("cats_and_dogs.txt");
    let facts = fixture("cats_and_dogs.json");
    let output = run(
        dir.path(),
        &[
            "evaluate",
            essay.to_str().unwrap(),
            "--facts",
            facts.to_str().unwrap(),
            "--output",
            report.to_str().unwrap(),
        ],
        None,
    );
    assert!(output.status.success());
    let text = std::fs::read_to_string(&report).unwrap();
    assert!(text.contains("Essay Evaluation"));
    assert!(text.contains("Strong grammatical foundation"));
}

#[test]
fn test_unrecorded_text_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let facts = fixture("cats_and_dogs.json");
    let output = run(
        dir.path(),
        &["evaluate", "--facts", facts.to_str().unwrap(), "--format", "json"],
        Some("An essay nobody recorded."),
    );
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Evaluation failed"), "stderr: {stderr}");
}

#[test]
fn test_unreachable_provider_fails() {
    let dir = tempfile::tempdir().unwrap();
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let url = format!("http://127.0.0.1:{}", port);
    let output = run(
        dir.path(),
        &["evaluate", "--provider-url", &url, "--timeout", "2"],
        Some("I like cats."),
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unavailable"));
}

#[test]
fn test_any_essay_type_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let general = stdout_json(&evaluate_json(
        &dir,
        "cats_and_dogs.txt",
        "cats_and_dogs.json",
        &[],
    ));
    let output = evaluate_json(
        &dir,
        "cats_and_dogs.txt",
        "cats_and_dogs.json",
        &["--essay-type", "narrative"],
    );
    assert!(output.status.success());
    assert_eq!(stdout_json(&output), general);
}

#[test]
fn test_non_utf8_essay_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let essay = dir.path().join("essay.bin");
    std::fs::write(&essay, [0x49u8, 0xff, 0xfe, 0x0a]).unwrap();
    let facts = fixture("cats_and_dogs.json");
    let output = run(
        dir.path(),
        &[
            "evaluate",
            essay.to_str().unwrap(),
            "--facts",
            facts.to_str().unwrap(),
        ],
        None,
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("malformed input"));
}

#[test]
fn test_project_config_sets_format() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("essay-eval.toml"),
        "[output]\nformat = \"json\"\n",
    )
    .unwrap();
    let essay = fixture("cats_and_dogs.txt");
    let facts = fixture("cats_and_dogs.json");
    let output = run(
        dir.path(),
        &[
            "evaluate",
            essay.to_str().unwrap(),
            "--facts",
            facts.to_str().unwrap(),
        ],
        None,
    );
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["letter_grade"], "C");
}

#[test]
fn test_breakdown() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(
        dir.path(),
        &["breakdown", "0.9", "0.9", "0.9", "--format", "json"],
        None,
    );
    assert!(output.status.success());
    let breakdown = stdout_json(&output);
    assert_eq!(breakdown["overall"]["score"], 0.9);
    assert_eq!(breakdown["overall"]["cefr_level"], "C2");
    assert_eq!(breakdown["overall"]["letter_grade"], "A");

    let invalid = run(dir.path(), &["breakdown", "0.5", "1.5", "0.5"], None);
    assert!(!invalid.status.success());
}

#[test]
fn test_serve_jsonrpc() {
    let dir = tempfile::tempdir().unwrap();
    let facts = fixture("cats_and_dogs.json");
    let essay = std::fs::read_to_string(fixture("cats_and_dogs.txt")).unwrap();
    let requests = [
        serde_json::json!({"jsonrpc": "2.0", "id": 1, "method": "health"}),
        serde_json::json!({"jsonrpc": "2.0", "id": 2, "method": "evaluate", "params": {"text": essay}}),
        serde_json::json!({"jsonrpc": "2.0", "id": 3, "method": "evaluate", "params": {"text": "Unrecorded."}}),
        serde_json::json!({"jsonrpc": "2.0", "id": 4, "method": "shutdown"}),
    ]
    .iter()
    .map(|r| r.to_string())
    .collect::<Vec<_>>()
    .join("\n");

    let output = run(
        dir.path(),
        &["serve", "--facts", facts.to_str().unwrap()],
        Some(&format!("{}\n", requests)),
    );
    assert!(output.status.success());

    let responses: Vec<Value> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|l| serde_json::from_str(l).expect("one JSON response per line"))
        .collect();
    assert_eq!(responses.len(), 4);
    assert_eq!(responses[0]["result"]["status"], "healthy");
    assert_eq!(responses[1]["result"]["cefr_level"], "B2");
    assert_eq!(responses[2]["error"]["code"], -32603);
    assert!(responses[2].get("result").is_none());
    assert!(responses[3]["result"].is_null());
}

#[test]
fn test_init_creates_config() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["init"], None);
    assert!(output.status.success());
    let config = std::fs::read_to_string(dir.path().join("essay-eval.toml")).unwrap();
    assert!(config.contains("[provider]"));
    assert!(config.contains("essay_type"));
}
