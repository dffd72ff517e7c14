use anyhow::Result;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, run};

const MAGIC: &str = "class Widget {\n    int mSize = 42;\n}\n";
const BAD_CONSTANT: &str = "class Limits {\n    static final int max = 1;\n}\n";

#[test]
fn test_clean_file() -> Result<()> {
    let test = CliTest::with_file("src/Clean.java", "class Clean {\n    int mCount = 0;\n}\n")?;

    let (code, stdout, stderr) = run(test.check_command().arg("src"))?;
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert_eq!(stdout, "✓ Checked 1 file - no problems found\n");

    Ok(())
}

#[test]
fn test_warnings_do_not_fail() -> Result<()> {
    let test = CliTest::with_file("src/Widget.java", MAGIC)?;

    let (code, stdout, _) = run(test.check_command().arg("src/Widget.java"))?;
    assert_eq!(code, 0);
    assert!(stdout.contains("warning: magic number 42; declare it as a named constant  magic-number"));
    assert!(stdout.contains("--> src/Widget.java:2:17"));
    assert!(stdout.contains("2 |     int mSize = 42;"));
    assert!(stdout.contains("✘ 1 problem (0 errors, 1 warning, 0 infos)"));

    Ok(())
}

#[test]
fn test_error_finding_exits_with_failure() -> Result<()> {
    let test = CliTest::with_file("src/Limits.java", BAD_CONSTANT)?;

    let (code, stdout, _) = run(test.check_command().arg("src"))?;
    assert_eq!(code, 1);
    assert!(stdout.contains("error: constant `max` does not match"));
    assert!(stdout.contains("naming-constant"));

    Ok(())
}

#[test]
fn test_plain_format() -> Result<()> {
    let test = CliTest::with_file("src/Widget.java", MAGIC)?;

    let (code, stdout, _) = run(test
        .check_command()
        .args(["--format", "plain", "src/Widget.java"]))?;
    assert_eq!(code, 0);
    assert_snapshot!(stdout, @"src/Widget.java:2:17: warning: magic number 42; declare it as a named constant [magic-number]");

    Ok(())
}

#[test]
fn test_json_format() -> Result<()> {
    let test = CliTest::with_file("src/Limits.java", BAD_CONSTANT)?;
    test.write_file("src/Widget.java", MAGIC)?;

    let (code, stdout, _) = run(test.check_command().args(["--format", "json", "src"]))?;
    assert_eq!(code, 1);

    let reports: Value = serde_json::from_str(&stdout)?;
    let reports = reports.as_array().cloned().unwrap_or_default();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["path"], "src/Limits.java");
    assert_eq!(reports[0]["summary"]["error"], 1);
    assert_eq!(reports[0]["findings"][0]["ruleId"], "naming-constant");
    assert_eq!(reports[1]["path"], "src/Widget.java");
    assert_eq!(reports[1]["findings"][0]["line"], 2);
    assert_eq!(reports[1]["findings"][0]["column"], 17);
    assert_eq!(reports[1]["suppressed"], 0);

    Ok(())
}

#[test]
fn test_explicit_config_params() -> Result<()> {
    let test = CliTest::with_file("src/Widget.java", MAGIC)?;
    test.write_file(
        "conf/strict.json",
        r#"{ "rules": { "line-length": { "params": { "maxChars": 16 } } } }"#,
    )?;

    let (code, stdout, _) = run(test.check_command().args([
        "--config",
        "conf/strict.json",
        "--format",
        "plain",
        "src/Widget.java",
    ]))?;
    assert_eq!(code, 1);
    assert!(stdout.contains(
        "src/Widget.java:2:17: error: line is 19 characters long, maximum is 16 [line-length]"
    ));

    Ok(())
}

#[test]
fn test_disabled_rule_is_not_reported() -> Result<()> {
    let test = CliTest::with_file("src/Widget.java", MAGIC)?;
    test.write_file(
        ".stylecheckrc.json",
        r#"{ "rules": { "magic-number": { "enabled": false } } }"#,
    )?;

    let (code, stdout, _) = run(&mut test.check_command())?;
    assert_eq!(code, 0);
    assert_eq!(stdout, "✓ Checked 1 file - no problems found\n");

    Ok(())
}

#[test]
fn test_severity_override() -> Result<()> {
    let test = CliTest::with_file("src/Widget.java", MAGIC)?;
    test.write_file(
        ".stylecheckrc.json",
        r#"{ "rules": { "magic-number": { "severity": "error" } } }"#,
    )?;

    let (code, stdout, _) = run(&mut test.check_command())?;
    assert_eq!(code, 1);
    assert!(stdout.contains("error: magic number 42"));

    Ok(())
}

#[test]
fn test_unknown_rule_id_is_a_config_error() -> Result<()> {
    let test = CliTest::with_file("src/Widget.java", MAGIC)?;
    test.write_file(".stylecheckrc.json", r#"{ "rules": { "no-tabs": {} } }"#)?;

    let (code, stdout, stderr) = run(&mut test.check_command())?;
    assert_eq!(code, 2);
    assert!(stdout.is_empty());
    assert!(stderr.contains("unknown rule `no-tabs`"), "{}", stderr);

    Ok(())
}

#[test]
fn test_invalid_params_are_a_config_error() -> Result<()> {
    let test = CliTest::with_file("src/Widget.java", MAGIC)?;
    test.write_file(
        ".stylecheckrc.json",
        r#"{ "rules": { "parameter-count": { "params": { "maxArgs": 3 } } } }"#,
    )?;

    let (code, _, stderr) = run(&mut test.check_command())?;
    assert_eq!(code, 2);
    assert!(
        stderr.contains("invalid params for rule `parameter-count`"),
        "{}",
        stderr
    );

    Ok(())
}

#[test]
fn test_malformed_config_is_an_error() -> Result<()> {
    let test = CliTest::with_file("src/Widget.java", MAGIC)?;
    test.write_file(".stylecheckrc.json", "{ not json")?;

    let (code, _, _) = run(&mut test.check_command())?;
    assert_eq!(code, 2);

    Ok(())
}

#[test]
fn test_malformed_input_is_reported() -> Result<()> {
    let test = CliTest::new()?;
    test.write_bytes("src/Bad.java", &[0x63, 0x6c, 0xc3, 0x28])?;
    test.write_file("src/Good.java", "class Good {}\n")?;

    let (code, stdout, stderr) = run(test.check_command().args(["--format", "plain", "src"]))?;
    assert_eq!(code, 1);
    assert!(
        stderr.contains("warning: 1 file could not be read and was not checked"),
        "{}",
        stderr
    );

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("src/Bad.java:1:1: error: "));
    assert!(lines[0].ends_with("[malformed-input]"));

    Ok(())
}

#[test]
fn test_suppression_directives() -> Result<()> {
    let test = CliTest::with_file(
        "src/Widget.java",
        "class Widget {\n    // stylecheck-disable-next-line magic-number\n    int mSize = 42;\n    int mArea = 7;\n}\n",
    )?;

    let (code, stdout, _) = run(test
        .check_command()
        .args(["--format", "plain", "src/Widget.java"]))?;
    assert_eq!(code, 0);
    assert_eq!(
        stdout,
        "src/Widget.java:4:17: warning: magic number 7; declare it as a named constant [magic-number]\n"
    );

    let (_, pretty, _) = run(test.check_command().arg("src"))?;
    assert!(pretty.contains("note: 1 finding suppressed by directives"));

    Ok(())
}

#[test]
fn test_config_ignores() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".stylecheckrc.json",
        r#"{ "ignores": ["**/generated/**"] }"#,
    )?;
    test.write_file("src/Widget.java", "class Widget {}\n")?;
    test.write_file("src/generated/Gen.java", MAGIC)?;

    let (code, stdout, _) = run(&mut test.check_command())?;
    assert_eq!(code, 0);
    assert_eq!(stdout, "✓ Checked 1 file - no problems found\n");

    Ok(())
}

#[test]
fn test_only_configured_extensions_are_scanned() -> Result<()> {
    let test = CliTest::with_file("src/notes.txt", "int x = 42;")?;
    test.write_file("src/Widget.java", "class Widget {}\n")?;

    let (code, stdout, _) = run(test.check_command().arg("src"))?;
    assert_eq!(code, 0);
    assert_eq!(stdout, "✓ Checked 1 file - no problems found\n");

    Ok(())
}

#[test]
fn test_nonexistent_path() -> Result<()> {
    let test = CliTest::new()?;

    let (code, _, stderr) = run(test.check_command().arg("missing"))?;
    assert_eq!(code, 2);
    assert!(stderr.contains("Path does not exist: missing"), "{}", stderr);

    Ok(())
}

#[test]
fn test_no_command_prints_help() -> Result<()> {
    let test = CliTest::new()?;

    let (code, stdout, _) = run(&mut test.command())?;
    assert_eq!(code, 0);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("check"));

    Ok(())
}
