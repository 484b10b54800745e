use std::fs;
use std::process::{Command, Output};
use std::{env, path::PathBuf};

use tempfile::tempdir;

fn cli_bin_path() -> PathBuf {
    if let Ok(path) = env::var("CARGO_BIN_EXE_reftag") {
        return PathBuf::from(path);
    }

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .map(PathBuf::from)
        .expect("workspace root");
    let bin_name = if cfg!(windows) { "reftag.exe" } else { "reftag" };
    let fallback = workspace_root.join("target").join("debug").join(bin_name);
    assert!(
        fallback.exists(),
        "reftag binary not found at {}",
        fallback.display()
    );
    fallback
}

fn run(root: &std::path::Path, args: &[&str]) -> Output {
    Command::new(cli_bin_path())
        .arg("--root")
        .arg(root)
        .args(args)
        .output()
        .expect("run reftag")
}

#[test]
fn search_without_vocabulary_exits_non_zero_with_error_payload() {
    // Given a fresh root with no vocabulary
    // When running `reftag search retro`
    // Then the response is printed and the process fails with the error code.
    let root = tempdir().expect("tempdir");
    let output = run(root.path(), &["search", "retro"]);

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"error_code\": \"CONFIGURATION_MISSING\""));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("CONFIGURATION_MISSING"));
}

#[test]
fn import_tag_and_search_process_contract() {
    // Given an imported vocabulary and one tagged image
    // When running `reftag search retro`
    // Then the image comes back with its score.
    let root = tempdir().expect("tempdir");
    let vocab = root.path().join("vocab.toml");
    fs::write(
        &vocab,
        r#"
[[categories]]
key = "style"
storage_path = "tags.style"
storage_type = "array"
search_weight = 2
"#,
    )
    .expect("write vocab");

    let output = run(
        root.path(),
        &["vocab", "import", vocab.to_str().expect("vocab path"), "--activate"],
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let output = run(
        root.path(),
        &[
            "image",
            "add",
            "--id",
            "img-1",
            "--file-name",
            "chair.jpg",
            "--status",
            "tagged",
            "--fields",
            r#"{"tags":{"style":["retro"]}}"#,
        ],
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let output = run(root.path(), &["search", "retro"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let response: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("search json");
    assert_eq!(response["results"][0]["id"], "img-1");
    assert_eq!(response["results"][0]["score"], 2);
}

#[test]
fn failed_merge_prints_error_payload_and_exits_non_zero() {
    // Given a fresh root with no tags
    // When running `reftag tag merge --source missing --target other`
    // Then stdout carries the structured error and the process fails.
    let root = tempdir().expect("tempdir");
    let output = run(
        root.path(),
        &["tag", "merge", "--source", "missing", "--target", "other"],
    );

    assert!(!output.status.success());
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("error payload json");
    assert_eq!(payload["code"], "NOT_FOUND");
    assert_eq!(payload["operation"], "tag.merge");
    assert_eq!(payload["retryable"], false);
    assert!(payload["trace_id"].as_str().is_some_and(|id| !id.is_empty()));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"));
}
