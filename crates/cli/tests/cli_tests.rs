// End-to-end tests for the fscope binary: output contracts and exit codes.
//
// Run with: cargo test -p followscope-cli --test cli_tests

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use zip::write::SimpleFileOptions;

const FOLLOWERS: &str = r#"[
  {"title": "", "media_list_data": [], "string_list_data": [{"href": "https://www.instagram.com/alice", "value": "alice", "timestamp": 1700000000}]},
  {"title": "", "media_list_data": [], "string_list_data": [{"href": "https://www.instagram.com/Bob", "value": "Bob", "timestamp": 1700000100}]}
]"#;

const FOLLOWING: &str = r#"{
  "relationships_following": [
    {"title": "bob", "string_list_data": [{"href": "https://www.instagram.com/_u/bob", "timestamp": 1700000200}]},
    {"title": "carol", "string_list_data": [{"href": "https://www.instagram.com/_u/carol", "timestamp": 1700000300}]},
    {"title": "dave", "string_list_data": [{"href": "https://www.instagram.com/_u/dave", "timestamp": 1700000400}]}
  ]
}"#;

/// A scratch directory holding input files and an isolated settings dir.
struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// followers_1.json + following.json on disk
    fn loose_export(&self) -> Vec<PathBuf> {
        vec![self.write("followers_1.json", FOLLOWERS), self.write("following.json", FOLLOWING)]
    }

    fn fscope(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_fscope"));
        cmd.env("FOLLOWSCOPE_CONFIG_DIR", self.path("config"));
        cmd.env_remove("RUST_LOG");
        cmd
    }

    fn run(&self, args: &[&str], files: &[PathBuf]) -> Output {
        self.fscope()
            .args(args)
            .args(files)
            .output()
            .expect("spawn fscope")
    }
}

fn build_zip(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in files {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(data.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn assert_exit(output: &Output, code: i32) {
    assert_eq!(
        output.status.code(),
        Some(code),
        "stdout:\n{}\nstderr:\n{}",
        stdout(output),
        stderr(output)
    );
}

fn json(output: &Output) -> serde_json::Value {
    serde_json::from_str(stdout(output).trim())
        .unwrap_or_else(|e| panic!("stdout must be one JSON value: {e}\n{}", stdout(output)))
}

// ===========================================================================
// summary
// ===========================================================================

#[test]
fn summary_json_reports_counts() {
    let ws = Workspace::new();
    let out = ws.run(&["summary", "--json"], &ws.loose_export());
    assert_exit(&out, 0);

    let val = json(&out);
    assert_eq!(val["status"], "ready");
    assert_eq!(val["progress"]["parsedFiles"], 2);
    assert_eq!(val["progress"]["totalFiles"], 2);
    assert_eq!(val["progress"]["followersCount"], 2);
    assert_eq!(val["progress"]["followingCount"], 3);
    assert_eq!(val["warnings"].as_array().unwrap().len(), 0);
    assert_eq!(val["relationships"]["fans"], 1);
    assert_eq!(val["relationships"]["dontFollowBack"], 2);
    assert_eq!(val["relationships"]["mutuals"], 1);
    assert_eq!(val["relationships"]["total"], 4);
}

#[test]
fn summary_reads_zip_archives() {
    let ws = Workspace::new();
    let zip = ws.write(
        "instagram-export.zip",
        build_zip(&[
            ("connections/followers_and_following/followers_1.json", FOLLOWERS),
            ("connections/followers_and_following/following.json", FOLLOWING),
        ]),
    );
    let out = ws.run(&["summary"], &[zip]);
    assert_exit(&out, 0);

    let text = stdout(&out);
    assert!(text.contains("status:            ready"), "{text}");
    assert!(text.contains("dont follow back:  2"), "{text}");
}

#[test]
fn first_run_writes_default_settings() {
    let ws = Workspace::new();
    let out = ws.run(&["summary"], &ws.loose_export());
    assert_exit(&out, 0);
    assert!(ws.path("config").join("settings.json").exists());
}

// ===========================================================================
// list
// ===========================================================================

#[test]
fn list_category_prints_sorted_rows() {
    let ws = Workspace::new();
    let out = ws.run(&["list", "-c", "dont-follow-back"], &ws.loose_export());
    assert_exit(&out, 0);

    let lines: Vec<String> = stdout(&out).lines().map(str::to_string).collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("dontFollowBack"));
    assert!(lines[0].contains(" carol "));
    assert!(lines[1].contains(" dave "));
    assert!(stderr(&out).contains("2 of 2 dont-follow-back accounts"));
}

#[test]
fn list_query_and_desc_sort() {
    let ws = Workspace::new();
    let files = ws.loose_export();

    let out = ws.run(&["list", "-q", "BO", "--json"], &files);
    assert_exit(&out, 0);
    let rows = json(&out);
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["username"], "bob");
    assert_eq!(rows[0]["relationship"], "mutuals");

    let out = ws.run(&["list", "--sort", "followed-date", "--desc", "--json"], &files);
    assert_exit(&out, 0);
    let names: Vec<String> = json(&out)
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["username"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["dave", "carol", "bob", "alice"]);
}

#[test]
fn list_recent_excludes_old_follows() {
    let ws = Workspace::new();
    let out = ws.run(&["list", "--recent", "--json"], &ws.loose_export());
    assert_exit(&out, 0);
    assert_eq!(json(&out), serde_json::json!([]));
}

#[test]
fn settings_supply_default_sort() {
    let ws = Workspace::new();
    std::fs::create_dir_all(ws.path("config")).unwrap();
    ws.write(
        "config/settings.json",
        r#"{ "view.sortField": "followedDate", "view.sortDirection": "desc" }"#,
    );
    let out = ws.run(&["list", "-c", "dont-follow-back", "--json"], &ws.loose_export());
    assert_exit(&out, 0);
    let rows = json(&out);
    assert_eq!(rows[0]["username"], "dave");
    assert_eq!(rows[1]["username"], "carol");
}

#[test]
fn all_dates_overrides_recent_setting() {
    let ws = Workspace::new();
    std::fs::create_dir_all(ws.path("config")).unwrap();
    ws.write("config/settings.json", r#"{ "view.recentOnly": true }"#);
    let files = ws.loose_export();

    let out = ws.run(&["list", "--json"], &files);
    assert_exit(&out, 0);
    assert_eq!(json(&out), serde_json::json!([]));

    let out = ws.run(&["list", "--all-dates", "--json"], &files);
    assert_exit(&out, 0);
    assert_eq!(json(&out).as_array().unwrap().len(), 4);

    let out = ws.run(&["list", "--all-dates", "--recent"], &files);
    assert_exit(&out, 2);
}

#[test]
fn config_dir_flag_beats_environment() {
    let ws = Workspace::new();
    let custom = ws.path("custom");
    let out = ws
        .fscope()
        .args(["--config-dir", custom.to_str().unwrap(), "summary"])
        .args(ws.loose_export())
        .output()
        .unwrap();
    assert_exit(&out, 0);
    assert!(custom.join("settings.json").exists());
    assert!(!ws.path("config").join("settings.json").exists());
}

// ===========================================================================
// export
// ===========================================================================

#[test]
fn export_usernames_to_stdout() {
    let ws = Workspace::new();
    let out = ws.run(&["export", "-c", "dont-follow-back", "-f", "usernames"], &ws.loose_export());
    assert_exit(&out, 0);
    assert_eq!(stdout(&out), "carol\ndave\n");
}

#[test]
fn export_csv_to_file() {
    let ws = Workspace::new();
    let target = ws.path("out.csv");
    let out = ws.run(
        &["export", "-c", "mutuals", "-f", "csv", "-o", target.to_str().unwrap()],
        &ws.loose_export(),
    );
    assert_exit(&out, 0);
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("wrote"));

    let text = std::fs::read_to_string(&target).unwrap();
    let mut lines = text.split('\n');
    assert_eq!(
        lines.next(),
        Some("\"username\",\"full_name\",\"user_id\",\"relationship\",\"followed_date\"")
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("\"bob\",\"\",\"\",\"mutuals\",\"2023-11-14T"), "{row}");
    assert_eq!(lines.next(), None);
}

#[test]
fn export_into_directory_uses_default_name() {
    let ws = Workspace::new();
    let dir = ws.path("out");
    std::fs::create_dir_all(&dir).unwrap();
    let out = ws.run(&["export", "-c", "fans", "-f", "json", "-o", dir.to_str().unwrap()], &ws.loose_export());
    assert_exit(&out, 0);

    let written = dir.join("followscope-fans.json");
    let val: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(written).unwrap()).unwrap();
    assert_eq!(val[0]["username"], "alice");
    assert_eq!(val[0]["relationship"], "fans");
}

#[test]
fn export_write_failure_exit_code() {
    let ws = Workspace::new();
    let target = ws.path("missing-dir/out.csv");
    let out = ws.run(&["export", "-o", target.to_str().unwrap()], &ws.loose_export());
    assert_exit(&out, 10);
    assert!(stderr(&out).contains("error: cannot write"));
}

// ===========================================================================
// Exit codes
// ===========================================================================

#[test]
fn nothing_recognized_exits_4() {
    let ws = Workspace::new();
    let file = ws.write("profile.json", "{}");
    let out = ws.run(&["list"], &[file]);
    assert_exit(&out, 4);
    let err = stderr(&out);
    assert!(err.contains("warning: Could not recognize profile.json"));
    assert!(err.contains("warning: Could not infer list type for profile.json"));
}

#[test]
fn strict_fails_on_warnings_after_output() {
    let ws = Workspace::new();
    let mut files = ws.loose_export();
    files.push(ws.write("notes.txt", "hello"));

    let out = ws.run(&["summary", "--json"], &files);
    assert_exit(&out, 0);

    let out = ws.run(&["summary", "--json", "--strict"], &files);
    assert_exit(&out, 5);
    let val = json(&out);
    assert_eq!(val["warnings"][0], "Skipped unsupported file: notes.txt");
}

#[test]
fn fatal_read_still_reports_partial_state() {
    let ws = Workspace::new();
    let followers = ws.write("followers_1.json", FOLLOWERS);
    let missing = ws.path("following.json");

    let out = ws.run(&["summary", "--json"], &[followers, missing]);
    assert_exit(&out, 3);

    let val = json(&out);
    assert_eq!(val["status"], "error");
    assert!(val["error"].as_str().unwrap().contains("following.json"));
    assert_eq!(val["progress"]["parsedFiles"], 1);
    assert_eq!(val["progress"]["totalFiles"], 2);
    assert_eq!(val["progress"]["followersCount"], 2);
    assert_eq!(val["relationships"]["fans"], 2);
}

#[test]
fn missing_file_exits_3() {
    let ws = Workspace::new();
    let missing: PathBuf = Path::new(ws.dir.path()).join("following.json");
    let out = ws.run(&["summary"], &[missing]);
    assert_exit(&out, 3);
    assert!(stderr(&out).contains("error:"));
    assert!(stderr(&out).contains("hint:"));
}

#[test]
fn no_command_is_usage_error() {
    let ws = Workspace::new();
    let out = ws.fscope().output().unwrap();
    assert_exit(&out, 2);
}
