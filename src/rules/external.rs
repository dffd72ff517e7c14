use std::{fmt, sync::Arc};

use super::{Rule, RuleFault};
use crate::{
    findings::{Finding, Severity},
    source::SourceUnit,
};

type CheckFn = dyn Fn(&SourceUnit) -> Result<Vec<Finding>, RuleFault> + Send + Sync;

/// A rule backed by a caller-supplied closure.
///
/// Lets library users register project-specific checks next to the built-in
/// ones. The closure is held behind an `Arc`, so clones share it.
#[derive(Clone)]
pub struct ExternalRule {
    id: String,
    severity: Severity,
    description: String,
    check: Arc<CheckFn>,
}

impl ExternalRule {
    pub fn new<F>(
        id: impl Into<String>,
        severity: Severity,
        description: impl Into<String>,
        check: F,
    ) -> Self
    where
        F: Fn(&SourceUnit) -> Result<Vec<Finding>, RuleFault> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            severity,
            description: description.into(),
            check: Arc::new(check),
        }
    }
}

impl fmt::Debug for ExternalRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalRule")
            .field("id", &self.id)
            .field("severity", &self.severity)
            .finish_non_exhaustive()
    }
}

impl Rule for ExternalRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn evaluate(&self, unit: &SourceUnit) -> Result<Vec<Finding>, RuleFault> {
        (self.check)(unit)
    }
}
