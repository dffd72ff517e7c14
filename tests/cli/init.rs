use anyhow::{Context, Result};
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, run};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let (code, stdout, _) = run(test.command().arg("init"))?;
    assert_eq!(code, 0);
    assert_eq!(stdout, "✓ Created .stylecheckrc.json\n");

    let content = test.read_file(".stylecheckrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["extensions"], serde_json::json!(["java"]));
    assert_eq!(parsed["rules"]["line-length"]["enabled"], Value::Bool(true));
    assert_eq!(
        parsed["rules"].as_object().map(|rules| rules.len()),
        Some(12)
    );

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".stylecheckrc.json", "{}")?;

    let (code, _, stderr) = run(test.command().arg("init"))?;
    assert_eq!(code, 2);
    assert!(stderr.contains(".stylecheckrc.json already exists"), "{}", stderr);
    assert_eq!(test.read_file(".stylecheckrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    run(test.command().arg("init"))?;
    test.write_file("src/Clean.java", "class Clean {\n    int mCount = 0;\n}\n")?;

    let (code, stdout, stderr) = run(&mut test.check_command())?;
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert_eq!(stdout, "✓ Checked 1 file - no problems found\n");

    Ok(())
}
