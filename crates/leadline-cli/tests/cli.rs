use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn run_cmd(db_path: &Path, args: &[&str]) -> String {
    let output = cargo_bin_cmd!("leadline")
        .args(["--db-path", db_path.to_str().expect("db path")])
        .args(args)
        .output()
        .expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8(output.stdout).expect("utf8")
}

fn run_cmd_json(db_path: &Path, args: &[&str]) -> Value {
    let output = cargo_bin_cmd!("leadline")
        .args(["--db-path", db_path.to_str().expect("db path"), "--json"])
        .args(args)
        .output()
        .expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("parse json")
}

fn run_cmd_expect_code(db_path: &Path, args: &[&str], code: i32) {
    let output = cargo_bin_cmd!("leadline")
        .args(["--db-path", db_path.to_str().expect("db path")])
        .args(args)
        .output()
        .expect("run command");
    assert!(!output.status.success(), "command unexpectedly passed");
    assert_eq!(output.status.code(), Some(code), "wrong exit: {:?}", output);
}

fn seed_directory(db_path: &Path) {
    run_cmd(db_path, &["agent", "add", "boss", "--role", "admin"]);
    run_cmd(db_path, &["agent", "add", "asha"]);
    run_cmd(db_path, &["agent", "add", "kiran"]);
}

#[test]
fn cli_intake_assignment_and_edit_flow() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("leadline.sqlite3");

    seed_directory(&db_path);

    run_cmd(
        &db_path,
        &[
            "--actor",
            "boss",
            "add-lead",
            "--mobile",
            "+91 98765 43210",
            "--status",
            "Site Visited",
            "--remarks",
            "liked the layout",
        ],
    );

    let list = run_cmd_json(&db_path, &["--actor", "boss", "list"]);
    let items = list.as_array().expect("array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["mobile"], "9876543210");
    assert_eq!(items[0]["assigned_to"], "asha");
    let id = items[0]["id"].as_str().expect("id").to_string();

    // Second intake rotates to the next agent in the pool.
    run_cmd(
        &db_path,
        &["--actor", "boss", "add-lead", "--mobile", "9123456789"],
    );
    let list = run_cmd_json(&db_path, &["--actor", "boss", "list"]);
    let items = list.as_array().expect("array");
    let owners: Vec<&str> = items
        .iter()
        .map(|item| item["assigned_to"].as_str().expect("owner"))
        .collect();
    assert!(owners.contains(&"asha"));
    assert!(owners.contains(&"kiran"));
    let dateless_id = items
        .iter()
        .find(|item| item["mobile"] == "9123456789")
        .and_then(|item| item["id"].as_str())
        .expect("second lead id")
        .to_string();

    // An agent only sees their own leads.
    let mine = run_cmd_json(&db_path, &["--actor", "asha", "list"]);
    assert_eq!(mine.as_array().expect("array").len(), 1);

    // A visit needs an explicit date; this lead has none stored.
    run_cmd_expect_code(
        &db_path,
        &[
            "--actor",
            "boss",
            "edit-lead",
            &dateless_id,
            "--status",
            "Visit Scheduled",
        ],
        3,
    );

    run_cmd(
        &db_path,
        &[
            "--actor",
            "asha",
            "edit-lead",
            &id,
            "--status",
            "Booked",
            "--remarks",
            "token received",
        ],
    );

    let detail = run_cmd_json(&db_path, &["--actor", "asha", "show", &id]);
    assert_eq!(detail["status"], "Booked");
    let events = detail["recent_events"].as_array().expect("events");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["status"], "Booked");
}

#[test]
fn cli_duplicate_mobile_is_a_conflict() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("leadline.sqlite3");

    seed_directory(&db_path);

    run_cmd(
        &db_path,
        &["--actor", "boss", "add-lead", "--mobile", "+91 98765 43210"],
    );
    run_cmd_expect_code(
        &db_path,
        &["--actor", "boss", "add-lead", "--mobile", "09876543210"],
        4,
    );
}

#[test]
fn cli_import_reports_per_row_outcomes() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("leadline.sqlite3");

    seed_directory(&db_path);
    run_cmd(
        &db_path,
        &["--actor", "boss", "add-lead", "--mobile", "9876543210"],
    );

    let file = temp.path().join("leads.json");
    std::fs::write(
        &file,
        r#"{"leads": [
            {"mobile": "9000000001", "status": "Busy", "remarks": "call back"},
            {"mobile": "12345"},
            {"mobile": "09876543210"}
        ]}"#,
    )
    .expect("write import file");

    let report = run_cmd_json(
        &db_path,
        &["--actor", "boss", "import", file.to_str().expect("path")],
    );
    assert_eq!(report["received"], 3);
    assert_eq!(report["valid"], 2);
    assert_eq!(report["inserted"], 1);
    assert_eq!(report["skipped_existing"], 1);
    assert_eq!(report["invalid"].as_array().expect("invalid").len(), 1);
    assert_eq!(report["invalid"][0]["row"], 2);
}

#[test]
fn cli_requires_a_known_actor() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("leadline.sqlite3");

    run_cmd_expect_code(&db_path, &["list"], 3);
    run_cmd_expect_code(&db_path, &["--actor", "ghost", "list"], 2);
}
