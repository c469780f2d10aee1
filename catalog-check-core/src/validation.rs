use crate::domain::{Catalog, ProductRecord, RuleId, Violation};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule: RuleId,
    pub passed: bool,
    pub inspected: usize,
    pub violations: Vec<Violation>,
    /// Assertion-style summary, set only when the rule failed.
    pub message: Option<String>,
}

impl RuleOutcome {
    pub fn violating_ids(&self) -> Vec<serde_json::Value> {
        self.violations.iter().map(|v| v.id.clone()).collect()
    }
}

/// A field-level rule over a single product record.
///
/// `inspect` must not depend on other records or on previous calls, so rules
/// can run in any order against the same catalog and yield the same result.
pub trait Validator: Send + Sync {
    fn id(&self) -> &str;

    /// Plural noun phrase used in failure messages, e.g. `invalid prices`.
    fn label(&self) -> &str;

    /// Returns a defect description when the record breaks the rule.
    fn inspect(&self, record: &ProductRecord) -> Option<String>;

    /// How an offending record is listed in the failure message.
    fn offender(&self, record: &ProductRecord) -> String {
        record.id().to_string()
    }

    fn validate(&self, catalog: &Catalog) -> RuleOutcome {
        let mut violations = Vec::new();
        let mut offenders = Vec::new();
        for record in catalog.iter() {
            if let Some(defect) = self.inspect(record) {
                violations.push(Violation::new(record.id(), defect));
                offenders.push(self.offender(record));
            }
        }
        let message = if violations.is_empty() {
            None
        } else {
            Some(format!(
                "Found {} products with {}: [{}]",
                violations.len(),
                self.label(),
                offenders.join(", ")
            ))
        };
        RuleOutcome {
            rule: self.id().to_string(),
            passed: violations.is_empty(),
            inspected: catalog.len(),
            violations,
            message,
        }
    }
}
