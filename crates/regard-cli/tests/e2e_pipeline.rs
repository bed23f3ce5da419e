//! E2E CLI workflow tests for the engagement pipeline.
//!
//! Each test runs `rgd` as a subprocess in an isolated temp directory:
//! analyze over a captured snapshot, then list/show/post/confirm against
//! the resulting store.

use assert_cmd::Command;
use regard_core::model::Timestamp;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

/// Build a Command targeting the rgd binary, rooted in `dir`.
fn rgd_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rgd"));
    cmd.current_dir(dir);
    // Suppress tracing output that goes to stderr
    cmd.env("REGARD_LOG", "error");
    cmd
}

/// Timestamp `secs_ago` seconds in the past, in the feed's string format.
fn ts_ago(secs_ago: i64) -> String {
    Timestamp::now().plus_seconds(-secs_ago).to_string()
}

/// Write a snapshot of recent notifications for two users.
fn write_snapshot(dir: &Path) {
    let snapshot = serde_json::json!([
        {
            "display_name": "みか",
            "action_text": "スニーカーをいいねしました",
            "timestamp": ts_ago(600),
            "avatar_url": "https://img.example.com/avatar/mika123.jpg",
            "profile_url": "https://example.com/room/mika123"
        },
        {
            "display_name": "みか",
            "action_text": "あなたをフォローしました",
            "timestamp": ts_ago(540),
            "is_following": true,
            "avatar_url": "https://img.example.com/avatar/mika123.jpg",
            "profile_url": "https://example.com/room/mika123"
        },
        {
            "display_name": "はな",
            "action_text": "バッグをいいねしました",
            "timestamp": ts_ago(300),
            "avatar_url": "https://img.example.com/avatar/hana456.jpg"
        }
    ]);
    std::fs::write(
        dir.join("snapshot.json"),
        serde_json::to_string_pretty(&snapshot).expect("serialize snapshot"),
    )
    .expect("write snapshot");
}

/// Write a template file covering every category via the fallback list.
fn write_templates(dir: &Path) {
    std::fs::create_dir_all(dir.join(".regard")).expect("mkdir .regard");
    let templates = serde_json::json!({
        "new-follow-and-like thanks": ["{name}さん、フォローといいねありがとうございます！"],
        "uncategorized": ["ご訪問ありがとうございます！"]
    });
    std::fs::write(
        dir.join(".regard/templates.json"),
        serde_json::to_string(&templates).expect("serialize templates"),
    )
    .expect("write templates");
}

/// Write a project config whose outreach command always succeeds.
fn write_config(dir: &Path) {
    std::fs::create_dir_all(dir.join(".regard")).expect("mkdir .regard");
    std::fs::write(
        dir.join(".regard/config.toml"),
        r#"
[outreach]
command = ["true", "{url}", "{comment}"]
"#,
    )
    .expect("write config");
}

/// Run `rgd analyze --json` against the standard snapshot, return the report.
fn analyze_json(dir: &Path) -> Value {
    let output = rgd_cmd(dir)
        .args(["analyze", "--input", "snapshot.json", "--json"])
        .output()
        .expect("analyze should not crash");
    assert!(
        output.status.success(),
        "analyze failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("analyze --json should produce valid JSON")
}

/// Run `rgd list --json` and return the parsed record array.
fn list_json(dir: &Path) -> Vec<Value> {
    let output = rgd_cmd(dir)
        .args(["list", "--json"])
        .output()
        .expect("list should not crash");
    assert!(
        output.status.success(),
        "list failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let value: Value =
        serde_json::from_slice(&output.stdout).expect("list --json should produce valid JSON");
    value.as_array().cloned().expect("list --json is an array")
}

/// Run `rgd show <id> --json` and return the parsed record.
fn show_json(dir: &Path, user_id: &str) -> Value {
    let output = rgd_cmd(dir)
        .args(["show", user_id, "--json"])
        .output()
        .expect("show should not crash");
    assert!(
        output.status.success(),
        "show {} failed: {}",
        user_id,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("show --json should produce valid JSON")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn analyze_selects_classifies_and_merges() {
    let dir = TempDir::new().expect("tempdir");
    write_snapshot(dir.path());
    write_templates(dir.path());

    let report = analyze_json(dir.path());
    assert_eq!(report["summary_collected"], 3);
    assert_eq!(report["summary_aggregated"], 2);
    assert_eq!(report["summary_selected"], 2);
    assert_eq!(report["comments_bound"], 2);
    assert_eq!(report["store_total"], 2);
    assert!(report.get("template_error").is_none());

    // A new follower who also liked outranks a plain like.
    let batch = report["batch"].as_array().expect("batch array");
    assert_eq!(batch[0]["user_id"], "mika123");
    assert_eq!(batch[0]["category"], "new-follow-and-like thanks");
    assert_eq!(
        batch[0]["comment_text"],
        "みかさん、フォローといいねありがとうございます！"
    );
    assert_eq!(
        batch[0]["profile_url"],
        "https://example.com/room/mika123"
    );
    assert_eq!(batch[1]["user_id"], "hana456");
    // No profile in the snapshot, so resolution records the sentinel.
    assert_eq!(batch[1]["profile_url"], "unreachable");

    assert!(dir.path().join(".regard/engagement.json").exists());
}

#[test]
fn repeat_analyze_does_not_reselect_absorbed_activity() {
    let dir = TempDir::new().expect("tempdir");
    write_snapshot(dir.path());
    write_templates(dir.path());

    let first = analyze_json(dir.path());
    assert_eq!(first["summary_selected"], 2);

    // Same snapshot again: everything is at or before the store's newest
    // timestamp, so nothing is selected and the store is unchanged.
    let second = analyze_json(dir.path());
    assert_eq!(second["summary_selected"], 0);
    assert_eq!(second["store_total"], 2);
}

#[test]
fn analyze_without_templates_records_the_failure() {
    let dir = TempDir::new().expect("tempdir");
    write_snapshot(dir.path());

    let report = analyze_json(dir.path());
    assert_eq!(report["summary_selected"], 2);
    assert_eq!(report["comments_bound"], 0);
    assert!(report["template_error"].is_string());

    let record = show_json(dir.path(), "mika123");
    assert!(record.get("comment_text").is_none());
}

#[test]
fn list_filters_by_category_and_status() {
    let dir = TempDir::new().expect("tempdir");
    write_snapshot(dir.path());
    write_templates(dir.path());
    analyze_json(dir.path());

    let all = list_json(dir.path());
    assert_eq!(all.len(), 2);

    let output = rgd_cmd(dir.path())
        .args(["list", "--category", "new-follow-and-like thanks", "--json"])
        .output()
        .expect("list should not crash");
    let filtered: Vec<Value> =
        serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["user_id"], "mika123");

    let output = rgd_cmd(dir.path())
        .args(["list", "--status", "confirmed", "--json"])
        .output()
        .expect("list should not crash");
    let none: Vec<Value> = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert!(none.is_empty());
}

#[test]
fn post_then_confirm_walks_the_lifecycle() {
    let dir = TempDir::new().expect("tempdir");
    write_snapshot(dir.path());
    write_templates(dir.path());
    write_config(dir.path());
    analyze_json(dir.path());

    rgd_cmd(dir.path())
        .args(["post", "mika123"])
        .assert()
        .success();
    let record = show_json(dir.path(), "mika123");
    assert_eq!(record["post_status"], "dispatched");

    rgd_cmd(dir.path())
        .args(["confirm", "mika123"])
        .assert()
        .success();
    let record = show_json(dir.path(), "mika123");
    assert_eq!(record["post_status"], "confirmed");
}

#[test]
fn post_skips_already_dispatched_users_and_continues() {
    let dir = TempDir::new().expect("tempdir");
    // Two users with reachable profiles so both are postable.
    let snapshot = serde_json::json!([
        {
            "display_name": "みか",
            "action_text": "スニーカーをいいねしました",
            "timestamp": ts_ago(600),
            "avatar_url": "https://img.example.com/avatar/mika123.jpg",
            "profile_url": "https://example.com/room/mika123"
        },
        {
            "display_name": "はな",
            "action_text": "バッグをいいねしました",
            "timestamp": ts_ago(300),
            "avatar_url": "https://img.example.com/avatar/hana456.jpg",
            "profile_url": "https://example.com/room/hana456"
        }
    ]);
    std::fs::write(
        dir.path().join("snapshot.json"),
        serde_json::to_string_pretty(&snapshot).expect("serialize snapshot"),
    )
    .expect("write snapshot");
    write_templates(dir.path());
    write_config(dir.path());
    analyze_json(dir.path());

    rgd_cmd(dir.path())
        .args(["post", "mika123"])
        .assert()
        .success();

    // mika123 is already dispatched. The batch logs and moves on rather than
    // aborting before hana456.
    rgd_cmd(dir.path())
        .args(["post", "mika123", "hana456"])
        .assert()
        .success();

    let record = show_json(dir.path(), "mika123");
    assert_eq!(record["post_status"], "dispatched");
    let record = show_json(dir.path(), "hana456");
    assert_eq!(record["post_status"], "dispatched");
}

#[test]
fn post_without_configured_command_fails_cleanly() {
    let dir = TempDir::new().expect("tempdir");
    write_snapshot(dir.path());
    write_templates(dir.path());
    analyze_json(dir.path());

    rgd_cmd(dir.path())
        .args(["post", "mika123"])
        .assert()
        .failure();

    // Nothing was flipped before the command check failed.
    let record = show_json(dir.path(), "mika123");
    assert_eq!(record["post_status"], "unposted");
}

#[test]
fn show_unknown_user_reports_error_code() {
    let dir = TempDir::new().expect("tempdir");
    write_snapshot(dir.path());
    write_templates(dir.path());
    analyze_json(dir.path());

    let output = rgd_cmd(dir.path())
        .args(["show", "nobody"])
        .output()
        .expect("show should not crash");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("E2001"), "stderr was: {stderr}");
}
