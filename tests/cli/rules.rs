use anyhow::Result;

use crate::{CliTest, run};

#[test]
fn test_rules_lists_builtins() -> Result<()> {
    let test = CliTest::new()?;

    let (code, stdout, _) = run(test.command().arg("rules"))?;
    assert_eq!(code, 0);

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "Using default configuration");
    assert_eq!(lines.len(), 13);
    assert!(lines[1].starts_with("naming-constant "));
    assert!(lines.iter().any(|l| l.starts_with("return-spacing") && l.contains(" info ")));

    Ok(())
}

#[test]
fn test_rules_reflects_config() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".stylecheckrc.json",
        r#"{ "rules": { "magic-number": { "enabled": false, "severity": "error" } } }"#,
    )?;

    let (code, stdout, _) = run(test.command().arg("rules"))?;
    assert_eq!(code, 0);

    let row = stdout
        .lines()
        .find(|l| l.starts_with("magic-number"))
        .unwrap_or_default();
    assert!(row.contains(" off "), "{}", row);
    assert!(row.contains(" error "), "{}", row);

    Ok(())
}

#[test]
fn test_rules_rejects_unknown_rule_id() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".stylecheckrc.json", r#"{ "rules": { "no-such-rule": {} } }"#)?;

    let (code, _, stderr) = run(test.command().arg("rules"))?;
    assert_eq!(code, 2);
    assert!(stderr.contains("unknown rule `no-such-rule`"), "{}", stderr);

    Ok(())
}
