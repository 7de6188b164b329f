use rusqlite::{params, Connection};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// 2015-03-01 12:00 UTC, in milliseconds
const MARCH_2015_MS: i64 = 1_425_211_200_000;

struct CliTestEnv {
    _temp_dir: TempDir,
    base: PathBuf,
    config_path: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();

        seed_database(&base.join("decrypted.db"));

        let config_path = base.join("config.toml");
        let config = format!(
            r#"
[report]
year = 2015

[paths]
database = "{db}"
userdata = "{userdata}"
aliases = "{aliases}"
output = "{output}"
"#,
            db = toml_path(&base.join("decrypted.db")),
            userdata = toml_path(&base.join("userdata.json")),
            aliases = toml_path(&base.join("group_chat_aliases.json")),
            output = toml_path(&base.join("chart.html")),
        );
        fs::write(&config_path, config).expect("failed to write config");

        Self {
            _temp_dir: temp_dir,
            base,
            config_path,
        }
    }

    fn userdata_path(&self) -> PathBuf {
        self.base.join("userdata.json")
    }

    fn output_path(&self) -> PathBuf {
        self.base.join("chart.html")
    }
}

fn toml_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "\\\\")
}

/// One busy friend, one quiet friend, and a group chat.
fn seed_database(path: &Path) {
    let conn = Connection::open(path).expect("failed to create database");
    conn.execute_batch(
        "CREATE TABLE rcontact (username TEXT, nickname TEXT, conRemark TEXT);
         CREATE TABLE message (msgId INTEGER PRIMARY KEY, talker TEXT, isSend INTEGER,
                               createTime INTEGER, content TEXT);",
    )
    .expect("failed to create tables");

    for (username, nickname, remark) in [
        ("wxid_mom", "Lin", "Mom"),
        ("wxid_pal", "Pal", ""),
        ("42@chatroom", "Book Club", ""),
    ] {
        conn.execute(
            "INSERT INTO rcontact VALUES (?1, ?2, ?3)",
            params![username, nickname, remark],
        )
        .expect("failed to insert contact");
    }

    let mut insert = |talker: &str, is_send: i64, offset_minutes: i64| {
        conn.execute(
            "INSERT INTO message (talker, isSend, createTime, content) VALUES (?1, ?2, ?3, 'hi')",
            params![talker, is_send, MARCH_2015_MS + offset_minutes * 60_000],
        )
        .expect("failed to insert message");
    };
    for i in 0..40 {
        insert("wxid_mom", i % 2, i);
    }
    insert("wxid_pal", 1, 100);
    insert("42@chatroom", 1, 200);
    insert("42@chatroom", 0, 201);
}

fn run_wxwrapped(env: &CliTestEnv, args: &[&str], stdin: &str) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("wxwrapped"));

    let mut child = Command::new(bin_path)
        .arg("--config")
        .arg(&env.config_path)
        .args(args)
        .env("HOME", &env.base)
        .env("XDG_STATE_HOME", env.base.join("state"))
        .env("XDG_CONFIG_HOME", env.base.join("config"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap_or_else(|e| panic!("failed to execute wxwrapped: {e}"));

    child
        .stdin
        .take()
        .expect("stdin not piped")
        .write_all(stdin.as_bytes())
        .expect("failed to write stdin");

    child.wait_with_output().expect("failed to wait for wxwrapped")
}

fn assert_success(args: &[&str], output: &Output) {
    assert!(
        output.status.success(),
        "wxwrapped {:?} failed\nstdout:\n{}\nstderr:\n{}",
        args,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn classifies_busiest_chat_and_writes_report() {
    let env = CliTestEnv::new();

    let output = run_wxwrapped(&env, &[], "Family\n");
    assert_success(&[], &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Mom"), "prompt should name the chat: {stdout}");
    assert!(stdout.contains("Enter a number or name a new category"));
    assert!(stdout.contains("Report written to"));
    assert!(stdout.contains("Logs in"), "log location missing: {stdout}");

    let userdata = fs::read_to_string(env.userdata_path()).expect("userdata missing");
    assert!(userdata.contains("\"family\""));
    assert!(userdata.contains("\"display_name\": \"Family\""));
    assert!(userdata.contains("wxid_mom"));

    let html = fs::read_to_string(env.output_path()).expect("report missing");
    assert!(html.contains("2015 Top Contacts"));
    assert!(html.contains("Top Group Chats (2015)"));
    assert!(html.contains("Book Club"));
    assert!(html.contains("\"name\":\"family\""));
}

#[test]
fn second_run_does_not_ask_again() {
    let env = CliTestEnv::new();

    let first = run_wxwrapped(&env, &[], "Family\n");
    assert_success(&[], &first);

    // No input at all: nothing left to ask about
    let second = run_wxwrapped(&env, &[], "");
    assert_success(&[], &second);
    let stdout = String::from_utf8_lossy(&second.stdout);
    assert!(!stdout.contains("Enter a number"), "unexpected prompt: {stdout}");
}

#[test]
fn no_classify_skips_prompts() {
    let env = CliTestEnv::new();

    let output = run_wxwrapped(&env, &["--no-classify"], "");
    assert_success(&["--no-classify"], &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Enter a number"));
    assert!(!env.userdata_path().exists());
    assert!(env.output_path().exists());
}

#[test]
fn missing_database_fails_cleanly() {
    let env = CliTestEnv::new();
    fs::remove_file(env.base.join("decrypted.db")).expect("failed to remove database");

    let output = run_wxwrapped(&env, &["--no-classify"], "");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to open"), "stderr: {stderr}");
}
