//! Integration tests that run the CLI binary.

fn bin() -> std::process::Command {
    let mut cmd = std::process::Command::new(env!("CARGO_BIN_EXE_nala-tutor"));
    cmd.env_remove("NALA_MODEL_API_KEY");
    cmd
}

#[test]
fn cli_help_succeeds_and_outputs_usage() {
    let output = bin()
        .arg("--help")
        .output()
        .expect("binary not found - run cargo build first");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.is_empty());
    assert!(
        stdout.contains("nala-tutor") || stdout.contains("prompt"),
        "expected usage text in output"
    );
}

#[test]
fn cli_version_succeeds() {
    let output = bin()
        .arg("--version")
        .output()
        .expect("binary not found - run cargo build first");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("nala-tutor"));
}

#[test]
fn cli_prompt_without_api_key_exits_with_error() {
    // Run from a temp dir so dotenv() won't load .env from the project root.
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin()
        .arg("-p")
        .arg("what is a relation?")
        .current_dir(tmp.path())
        .output()
        .expect("binary not found - run cargo build first");

    assert!(
        !output.status.success(),
        "expected failure when NALA_MODEL_API_KEY is not set"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("NALA_MODEL_API_KEY"),
        "expected API key error message, got: {}",
        stderr
    );
}

#[test]
fn cli_set_style_rejects_unknown_style() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin()
        .arg("--set-style")
        .arg("wizard")
        .current_dir(tmp.path())
        .env("NALA_TEST_DATA_DIR", tmp.path())
        .output()
        .expect("binary not found - run cargo build first");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown learning style"));
}

#[test]
fn cli_set_style_persists_profile() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin()
        .arg("--set-style")
        .arg("architect")
        .current_dir(tmp.path())
        .env("NALA_TEST_DATA_DIR", tmp.path())
        .output()
        .expect("binary not found - run cargo build first");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("The Architect"));

    let profile = std::fs::read_to_string(tmp.path().join("profile.json")).expect("profile saved");
    assert!(profile.contains("architect"));
}
