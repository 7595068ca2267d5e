use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

/// Helper to create a temp directory that is cleaned up on drop.
struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(name: &str) -> Self {
        let path =
            std::env::temp_dir().join(format!("txkit_cli_test_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("failed to create temp dir");
        Self { path }
    }

    fn path(&self) -> &PathBuf {
        &self.path
    }

    fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

const ALERTS: &str = r#"
tags: [sqlite, monitoring]
tables:
  - type: Alert
    table: alerts
    key: id
    comment: A raised alert.
    columns:
      - { name: id, type: integer }
      - { name: title, type: text }
      - { name: active, type: bool }
      - { name: updated_at, type: timestamp, nullable: true }
"#;

const USERS: &str = r#"
tags: [sqlite]
tables:
  - type: User
    table: users
    key: id
    columns:
      - { name: id, type: integer }
      - { name: email, type: text }
"#;

/// Writes the two schema fixtures into `dir`.
fn write_schemas(dir: &TempDir) {
    fs::write(dir.join("alerts.yaml"), ALERTS).expect("failed to write alerts schema");
    fs::write(dir.join("users.yaml"), USERS).expect("failed to write users schema");
}

fn txkit_gen(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_txkit-gen"))
        .args(args)
        .output()
        .expect("failed to run txkit-gen")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// Successful generation
// ---------------------------------------------------------------------------

#[test]
fn generates_default_output_in_schema_directory() {
    let dir = TempDir::new("default_output");
    write_schemas(&dir);

    let output = txkit_gen(&["--type", "Alert", dir.path().to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let generated = fs::read_to_string(dir.join("alert_gen.rs")).unwrap();
    let expected_header = format!(
        "// Code generated by \"txkit-gen --type Alert {}\"; DO NOT EDIT.\n",
        dir.path().display()
    );
    assert!(generated.starts_with(&expected_header));
    assert!(generated.contains("pub struct Alert {"));
    assert!(generated.contains("pub fn register_alert("));
    assert!(generated.contains("UPDATE alerts SET `active` = 0"));
}

#[test]
fn generates_multiple_types_into_explicit_output() {
    let dir = TempDir::new("explicit_output");
    write_schemas(&dir);
    let out = dir.join("models.rs");

    let output = txkit_gen(&[
        "--type",
        "Alert,User",
        "--output",
        out.to_str().unwrap(),
        dir.path().to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let generated = fs::read_to_string(&out).unwrap();
    assert!(generated.contains("pub struct Alert {"));
    assert!(generated.contains("pub struct User {"));
    assert!(generated.contains("DELETE FROM users WHERE `id`=:id"));
    assert!(!dir.join("alert_gen.rs").exists());
}

#[test]
fn file_arguments_write_next_to_first_file() {
    let dir = TempDir::new("file_args");
    write_schemas(&dir);

    let output = txkit_gen(&[
        "--type",
        "User",
        dir.join("users.yaml").to_str().unwrap(),
        dir.join("alerts.yaml").to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(dir.join("user_gen.rs").exists());
}

#[test]
fn inputs_default_to_current_directory() {
    let dir = TempDir::new("cwd");
    write_schemas(&dir);

    let output = Command::new(env!("CARGO_BIN_EXE_txkit-gen"))
        .args(["--type", "User"])
        .current_dir(dir.path())
        .output()
        .expect("failed to run txkit-gen");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(dir.join("user_gen.rs").exists());
}

#[test]
fn flags_shape_generated_code() {
    let dir = TempDir::new("flags");
    write_schemas(&dir);

    let output = txkit_gen(&[
        "--type",
        "Alert",
        "--table",
        "alert_log",
        "--trim-prefix",
        "Al",
        "--line-comment",
        "--tags",
        "monitoring",
        dir.path().to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let generated = fs::read_to_string(dir.join("alert_gen.rs")).unwrap();
    assert!(generated.contains(r#"pub const ERT_TITLE: &str = "`alert_log`.`title`";"#));
    assert!(generated.contains("QUERY_ERT_SELECT"));
    assert!(generated.contains("/// A raised alert."));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn missing_type_flag_is_usage_error() {
    let dir = TempDir::new("missing_type");
    write_schemas(&dir);

    let output = txkit_gen(&[dir.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("--type"));
}

#[test]
fn empty_type_list_is_usage_error() {
    let dir = TempDir::new("empty_type");
    write_schemas(&dir);

    let output = txkit_gen(&["--type", " , ", dir.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn unknown_type_exits_with_error() {
    let dir = TempDir::new("unknown_type");
    write_schemas(&dir);

    let output = txkit_gen(&["--type", "Missing", dir.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("error: type Missing not found"));
    assert!(!dir.join("missing_gen.rs").exists());
}

#[test]
fn type_filtered_out_by_tags_is_not_found() {
    let dir = TempDir::new("tag_filter");
    write_schemas(&dir);

    let output = txkit_gen(&[
        "--type",
        "User",
        "--tags",
        "monitoring",
        dir.path().to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("type User not found"));
}

#[test]
fn ambiguous_type_exits_with_error() {
    let dir = TempDir::new("ambiguous");
    write_schemas(&dir);
    fs::write(dir.join("more_users.yml"), USERS).unwrap();

    let output = txkit_gen(&["--type", "User", dir.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("declared more than once"));
}

#[test]
fn tags_with_files_exits_with_error() {
    let dir = TempDir::new("tags_files");
    write_schemas(&dir);

    let output = txkit_gen(&[
        "--type",
        "User",
        "--tags",
        "sqlite",
        dir.join("users.yaml").to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr(&output)
            .contains("error: --tags applies only to directories, not when files are specified")
    );
}

#[test]
fn bad_key_override_exits_with_error() {
    let dir = TempDir::new("bad_key");
    write_schemas(&dir);

    let output = txkit_gen(&[
        "--type",
        "User",
        "--key",
        "uuid",
        dir.path().to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("invalid declaration for type User"));
}
