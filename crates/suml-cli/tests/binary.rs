//! Tests that drive the built `suml` binary

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn suml(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_suml"))
        .args(args)
        .env("SUML_LOG_LEVEL", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn suml");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn test_convert_class_from_stdin() {
    let output = suml(&["convert", "--kind", "class"], "[Customer]<>-[Order]\n");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("digraph G {\n"));
    assert!(stdout.contains("    A000 -> A001\n"));
}

#[test]
fn test_convert_sequence_with_prelude() {
    let output = suml(
        &["convert", "--kind", "sequence", "--prelude", "/usr/share/sequence.pic"],
        "[Patron]order food>[Waiter]",
    );
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("copy \"/usr/share/sequence.pic\";"));
    assert!(stdout.contains("message(A000,A001,\"order food\");"));
}

#[test]
fn test_convert_sequence_inlines_bundled_macros() {
    let workdir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_suml"))
        .args(["convert", "--kind", "sequence", "-i", "-"])
        .current_dir(workdir.path())
        .env("SUML_LOG_LEVEL", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .and_then(|mut child| {
            child.stdin.take().unwrap().write_all(b"[A]hi>[B]")?;
            child.wait_with_output()
        })
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("define object3 {"));
    assert!(!stdout.contains("copy "));
    assert!(stdout.contains("message(A000,A001,\"hi\");"));
}

#[test]
fn test_validate_exit_codes() {
    let good = suml(&["validate", "--kind", "class"], "[A]->[B]");
    assert!(good.status.success());
    assert!(String::from_utf8_lossy(&good.stdout).contains("✓ Valid class diagram"));

    let bad = suml(&["validate", "--kind", "class"], "[A]-");
    assert!(!bad.status.success());
    assert!(String::from_utf8_lossy(&bad.stdout).contains("✗ Invalid class diagram"));
}

#[test]
fn test_types_json() {
    let output = suml(&["types", "--json"], "");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["total"], 2);
    assert_eq!(value["supported_types"][0]["name"], "class");
    assert_eq!(value["supported_types"][1]["markup"], "pic");
}
