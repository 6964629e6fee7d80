mod common;

use common::{run_recap, TestEnv};

#[test]
fn summarize_subcommand_is_available() {
    let output = run_recap(&["summarize", "--help"]);

    assert!(
        output.status.success(),
        "summarize --help should succeed\nstdout:\n{}\nstderr:\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn summarize_requires_an_api_key() {
    let env = TestEnv::new();
    let transcript = env.write_transcript("talk.txt", "Hello world. This is a test.");

    let output = env.run(&["summarize", transcript.to_str().unwrap()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Gemini API key is missing"),
        "expected missing key error, got:\n{}",
        stderr
    );
}

#[test]
fn summarize_reports_missing_transcript() {
    let output = run_recap(&["summarize", "does-not-exist.txt"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Failed to read transcript"),
        "expected missing transcript error, got:\n{}",
        stderr
    );
}

#[test]
fn segments_dumps_labeled_sentence_aware_cuts() {
    let env = TestEnv::new();
    let transcript = env.write_transcript(
        "talk.txt",
        "Hello world. This is a test. Another sentence here.",
    );

    let output = env.run(&[
        "segments",
        transcript.to_str().unwrap(),
        "--max-characters",
        "25",
    ]);

    assert!(
        output.status.success(),
        "segments should succeed\nstderr:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Segment 1:\nHello world."), "got:\n{stdout}");
    assert!(stdout.contains("Segment 2:\nThis is a test."), "got:\n{stdout}");
    assert!(
        stdout.contains("Segment 3:\nAnother sentence here."),
        "got:\n{stdout}"
    );
}

#[test]
fn zero_budget_flag_falls_back_to_the_derived_budget() {
    let env = TestEnv::new();
    let transcript = env.write_transcript("talk.txt", "Some text.");

    let output = env.run(&[
        "segments",
        transcript.to_str().unwrap(),
        "--max-characters",
        "0",
    ]);

    // 0 means "derive from instructions", which succeeds with the default
    // instructions; the segments land within the derived budget.
    assert!(
        output.status.success(),
        "stderr:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn segments_fixed_mode_ignores_boundaries() {
    let env = TestEnv::new();
    let transcript = env.write_transcript("talk.txt", "abcdefghij");

    let output = env.run(&[
        "segments",
        transcript.to_str().unwrap(),
        "--max-characters",
        "4",
        "--fixed",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Segment 1:\nabcd"), "got:\n{stdout}");
    assert!(stdout.contains("Segment 2:\nefgh"), "got:\n{stdout}");
    assert!(stdout.contains("Segment 3:\nij"), "got:\n{stdout}");
}

#[test]
fn config_path_points_at_a_toml_file() {
    let env = TestEnv::new();
    let path = env.config_path();
    assert!(path.ends_with("config.toml"), "got: {}", path.display());
}
