use anyhow::Result;
use pretty_assertions::assert_eq;
use stylecheck::{
    engine,
    findings::{Finding, Severity},
    registry::RuleRegistry,
    report::{OutputStyle, parse_structured, render},
    rules::{
        BUILTIN_RULE_IDS, ExternalRule, LineLengthRule, NamingPatternRule, NamingScope,
        ParameterCountRule, RuleFault,
    },
    source::SourceUnit,
};

const MESSY: &str = r#"public class order_service {
    static final int max_items = 10;
    private int Count = 3;
    // TODO fix this later
    public int TOTAL(int A, int b, int c, int d, int e, int f, int g, int h) {
        return (a + 200 + 0xFF);
    }

}
"#;

fn positions(findings: &[Finding]) -> Vec<(usize, usize, &str)> {
    findings
        .iter()
        .map(|f| (f.line, f.column, f.rule_id.as_str()))
        .collect()
}

#[test]
fn test_constant_scope_is_classified_not_just_matched() -> Result<()> {
    let mut registry = RuleRegistry::new();
    registry.register(NamingPatternRule::from_config(NamingScope::Constant, None)?)?;

    let unit = SourceUnit::from_text("Fields.java", "int x=1;\nint MAX=100;");
    let report = engine::check(&unit, &registry);
    assert_eq!(positions(report.findings()), vec![(2, 5, "naming-constant")]);

    let unit = SourceUnit::from_text(
        "Fields.java",
        "class F {\n    int x=1;\n    static final int MAX=100;\n}",
    );
    assert!(engine::check(&unit, &registry).findings().is_empty());

    Ok(())
}

#[test]
fn test_long_line_reported_once_past_limit() -> Result<()> {
    let mut registry = RuleRegistry::new();
    registry.register(LineLengthRule::new(132, Severity::Error))?;

    let text = format!("class A {{}}\n{}\n", "x".repeat(200));
    let report = engine::check(&SourceUnit::from_text("A.java", &text), &registry);
    assert_eq!(positions(report.findings()), vec![(2, 133, "line-length")]);

    Ok(())
}

#[test]
fn test_too_many_parameters_at_declaration_line() -> Result<()> {
    let mut registry = RuleRegistry::new();
    registry.register(ParameterCountRule::new(7, Severity::Warning))?;

    let src = "class A {\n    void run(int a, int b, int c, int d,\n             int e, int f, int g, int h) {\n    }\n}\n";
    let report = engine::check(&SourceUnit::from_text("A.java", src), &registry);
    assert_eq!(report.findings().len(), 1);
    assert_eq!(report.findings()[0].line, 2);

    Ok(())
}

#[test]
fn test_all_rules_disabled_yields_nothing() -> Result<()> {
    let mut registry = RuleRegistry::with_defaults()?;
    for id in BUILTIN_RULE_IDS {
        registry.set_enabled(id, false)?;
    }

    let report = engine::check(&SourceUnit::from_text("Messy.java", MESSY), &registry);
    assert!(report.findings().is_empty());
    assert_eq!(report.summary().total(), 0);

    Ok(())
}

#[test]
fn test_defaults_cover_messy_source() -> Result<()> {
    let registry = RuleRegistry::with_defaults()?;
    let report = engine::check(&SourceUnit::from_text("Messy.java", MESSY), &registry);

    let mut ids: Vec<&str> = report.findings().iter().map(|f| f.rule_id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    for expected in [
        "magic-number",
        "naming-constant",
        "naming-instance-var",
        "naming-method",
        "naming-parameter",
        "naming-type",
        "parameter-count",
        "return-spacing",
        "task-tag",
    ] {
        assert!(ids.contains(&expected), "missing {} in {:?}", expected, ids);
    }
    assert!(report.has_errors());

    Ok(())
}

#[test]
fn test_check_is_deterministic() -> Result<()> {
    let registry = RuleRegistry::with_defaults()?;
    let unit = SourceUnit::from_text("Messy.java", MESSY);

    let first = engine::check(&unit, &registry);
    for _ in 0..10 {
        assert_eq!(engine::check(&unit, &registry), first);
    }
    assert!(first.findings().is_sorted());

    Ok(())
}

#[test]
fn test_faulty_rule_does_not_affect_others() -> Result<()> {
    let unit = SourceUnit::from_text("Messy.java", MESSY);
    let baseline = engine::check(&unit, &RuleRegistry::with_defaults()?);

    let mut registry = RuleRegistry::with_defaults()?;
    registry.register(ExternalRule::new(
        "always-fails",
        Severity::Info,
        "fails on every unit",
        |_| Err(RuleFault::new("cannot continue")),
    ))?;
    let report = engine::check(&unit, &registry);

    let (faults, rest): (Vec<Finding>, Vec<Finding>) = report
        .findings()
        .iter()
        .cloned()
        .partition(|f| f.rule_id == "always-fails");
    assert_eq!(rest, baseline.findings());
    assert_eq!(faults.len(), 1);
    assert_eq!((faults[0].line, faults[0].column), (1, 1));
    assert_eq!(faults[0].severity, Severity::Error);

    Ok(())
}

#[test]
fn test_structured_report_round_trips() -> Result<()> {
    let registry = RuleRegistry::with_defaults()?;
    let report = engine::check(&SourceUnit::from_text("Messy.java", MESSY), &registry);

    let parsed = parse_structured(&render(&report, OutputStyle::Structured))?;
    assert_eq!(parsed, report);

    Ok(())
}

#[test]
fn test_plain_report_has_one_line_per_finding() -> Result<()> {
    let registry = RuleRegistry::with_defaults()?;
    let report = engine::check(&SourceUnit::from_text("Messy.java", MESSY), &registry);

    let plain = render(&report, OutputStyle::Plain);
    assert_eq!(plain.lines().count(), report.findings().len());
    assert!(plain.lines().all(|l| l.starts_with("Messy.java:")));

    Ok(())
}
