use crate::domain::{Catalog, Violation};
use crate::validation::Validator;
use crate::validators::default_validators;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

const SEPARATOR: &str = "-------------";

/// Per-record union of every rule failure. Clean records are omitted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DefectReport {
    pub inspected: usize,
    pub defective: Vec<Violation>,
}

impl DefectReport {
    pub fn build(catalog: &Catalog, validators: &[Box<dyn Validator>]) -> Self {
        let defective = catalog
            .iter()
            .filter_map(|record| {
                let defects: Vec<String> = validators
                    .iter()
                    .filter_map(|v| v.inspect(record))
                    .collect();
                if defects.is_empty() {
                    None
                } else {
                    Some(Violation {
                        id: record.id(),
                        defects,
                    })
                }
            })
            .collect();
        Self {
            inspected: catalog.len(),
            defective,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.defective.is_empty()
    }

    /// Human-readable listing. Empty when no record is defective.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        if self.is_clean() {
            return out;
        }
        let _ = writeln!(out, "Defect Report:");
        let _ = writeln!(out, "{SEPARATOR}");
        for entry in &self.defective {
            let _ = writeln!(out, "Product ID: {}", entry.id);
            let _ = writeln!(out, "Defects: {}", entry.defects.join(", "));
            let _ = writeln!(out, "{SEPARATOR}");
        }
        out
    }
}

pub fn generate_defect_report(catalog: &Catalog) -> DefectReport {
    DefectReport::build(catalog, &default_validators())
}
