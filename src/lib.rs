//! Stylecheck - rule-based style checker for Java source files
//!
//! Stylecheck loads a source file into an immutable [`source::SourceUnit`]
//! (lines, tokens, comments and a lazily built declaration outline), runs
//! every active rule of a [`registry::RuleRegistry`] over it and collects
//! the findings into a sorted [`report::Report`].
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (argument parsing, commands, output)
//! - `config`: `.stylecheckrc.json` loading and validation
//! - `directives`: In-source suppression comments
//! - `engine`: Runs rules over units with fault isolation
//! - `findings`: Finding and severity types
//! - `registry`: Ordered, keyed rule registry
//! - `report`: Per-file reports and their plain/structured rendering
//! - `rules`: The built-in rules and the `Rule` trait
//! - `source`: Tokenizer, source units and declaration outline
//!
//! ## Example
//!
//! ```
//! use stylecheck::{engine, registry::RuleRegistry, source::SourceUnit};
//!
//! let registry = RuleRegistry::with_defaults().unwrap();
//! let unit = SourceUnit::from_text("A.java", "class A { int x = 42; }");
//! let report = engine::check(&unit, &registry);
//! assert!(report.findings().iter().any(|f| f.rule_id == "magic-number"));
//! ```

pub mod cli;
pub mod config;
pub mod directives;
pub mod engine;
pub mod findings;
pub mod registry;
pub mod report;
pub mod rules;
pub mod source;
