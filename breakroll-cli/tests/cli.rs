use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn temp_path(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "breakroll-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn run(state: &Path, args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_breakroll");
    Command::new(exe)
        .arg("--no-color")
        .arg("--state")
        .arg(state)
        .args(args)
        .env_remove("BREAKROLL_STATE")
        .env_remove("RUST_LOG")
        .output()
        .expect("run cli")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn read_snapshot(state: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(state).expect("read state");
    serde_json::from_str(&text).expect("state is json")
}

#[test]
fn draw_persists_assignment_and_history() {
    let state = temp_path("draw").join("state.json");
    let output = run(&state, &["--seed", "9", "draw", "Sam", "Lee"]);
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("Sam Lee \u{2192}"));
    assert!(stdout_of(&output).contains("31 of 32 items remain."));

    let snapshot = read_snapshot(&state);
    assert_eq!(snapshot["version"], 2);
    assert_eq!(snapshot["history"].as_array().map(Vec::len), Some(1));
    let taken: Vec<_> = snapshot["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|item| item["taken"] == true)
        .collect();
    assert_eq!(taken.len(), 1);
    assert_eq!(taken[0]["takenBy"], "Sam Lee");
}

#[test]
fn exhausted_catalog_reports_and_keeps_history() {
    let dir = temp_path("exhaust");
    std::fs::create_dir_all(&dir).unwrap();
    let catalog = dir.join("catalog.json");
    std::fs::write(
        &catalog,
        r#"[{"id":"a","displayName":"Alpha","shortLabel":"A"},{"id":"b","displayName":"Beta","shortLabel":"B"}]"#,
    )
    .unwrap();
    let state = dir.join("state.json");
    let catalog_arg = catalog.to_string_lossy().into_owned();

    for name in ["one", "two"] {
        assert!(run(&state, &["--catalog", &catalog_arg, "draw", name]).status.success());
    }
    let output = run(&state, &["--catalog", &catalog_arg, "draw", "X"]);
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("all items have already been taken"));
    assert_eq!(
        read_snapshot(&state)["history"].as_array().map(Vec::len),
        Some(2)
    );
}

#[test]
fn reset_requires_confirmation_and_keeps_theme() {
    let state = temp_path("reset").join("state.json");
    assert!(run(&state, &["set", "label", "Friday", "Rips"]).status.success());
    assert!(run(&state, &["set", "color", "primary", "rgb(37,99,235)"]).status.success());
    assert!(run(&state, &["draw", "kit"]).status.success());

    let refused = run(&state, &["reset"]);
    assert!(!refused.status.success());
    assert_eq!(read_snapshot(&state)["history"].as_array().map(Vec::len), Some(1));

    assert!(run(&state, &["reset", "--yes"]).status.success());
    let snapshot = read_snapshot(&state);
    assert_eq!(snapshot["history"].as_array().map(Vec::len), Some(0));
    assert_eq!(snapshot["settings"]["label"], "Friday Rips");
    assert_eq!(snapshot["settings"]["colors"]["--primary"], "#2563eb");
}

#[test]
fn corrupt_state_recovers_to_fresh_board() {
    let dir = temp_path("corrupt");
    std::fs::create_dir_all(&dir).unwrap();
    let state = dir.join("state.json");
    std::fs::write(&state, "{ definitely not json").unwrap();

    let output = run(&state, &["grid"]);
    assert!(output.status.success());
    let text = stdout_of(&output);
    assert!(text.contains("ARI"));
    assert!(text.contains("32/32 left"));
}

#[test]
fn show_follows_view_mode() {
    let state = temp_path("view").join("state.json");
    assert!(run(&state, &["draw", "ana"]).status.success());
    assert!(run(&state, &["set", "view", "summary"]).status.success());
    let text = stdout_of(&run(&state, &["show"]));
    assert!(text.contains("Participant"));
    assert!(text.contains("ana"));
}
