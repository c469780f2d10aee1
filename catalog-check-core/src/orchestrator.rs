use crate::domain::{Catalog, FetchResult};
use crate::logging::{LogEvent, LogLevel, SharedEventLogger};
use crate::metrics::Metrics;
use crate::report::DefectReport;
use crate::source::{CatalogSource, FetchError};
use crate::validation::{RuleOutcome, Validator};
use crate::validators::default_validators;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub outcomes: Vec<RuleOutcome>,
    pub report: DefectReport,
}

impl ValidationSummary {
    /// True when every rule passed. The defect report is informational and
    /// never counts against the run.
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &RuleOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }

    pub fn outcome(&self, rule: &str) -> Option<&RuleOutcome> {
        self.outcomes.iter().find(|o| o.rule == rule)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub status: u16,
    pub location: String,
    pub records: usize,
    pub validation: ValidationSummary,
}

impl RunSummary {
    pub fn passed(&self) -> bool {
        (200..300).contains(&self.status) && self.validation.passed()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

pub struct CatalogValidator {
    pub source: Box<dyn CatalogSource>,
    pub validators: Vec<Box<dyn Validator>>,
    pub logger: SharedEventLogger,
    pub metrics: Arc<dyn Metrics>,
    run_id: String,
}

impl CatalogValidator {
    pub fn new(
        source: Box<dyn CatalogSource>,
        logger: SharedEventLogger,
        metrics: Arc<dyn Metrics>,
    ) -> Self {
        Self {
            source,
            validators: default_validators(),
            logger,
            metrics,
            run_id: format!("run-{}", chrono::Utc::now().format("%Y%m%dT%H%M%S%3f")),
        }
    }

    pub fn with_validators(mut self, validators: Vec<Box<dyn Validator>>) -> Self {
        self.validators = validators;
        self
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Performs the single network fetch of a run.
    pub async fn fetch(&self) -> Result<FetchResult, FetchError> {
        let meta = self.source.metadata();
        self.logger.log(
            LogEvent::new(LogLevel::Info, "fetch.start")
                .with_run(self.run_id.clone())
                .with_field("source", meta.name)
                .with_field("location", meta.location),
        );
        match self.source.fetch().await {
            Ok(result) => {
                self.metrics.inc_fetch_ok();
                self.logger.log(
                    LogEvent::new(LogLevel::Info, "fetch.ok")
                        .with_run(self.run_id.clone())
                        .with_field("status", result.status.to_string())
                        .with_field("records", result.catalog.len().to_string())
                        .with_field("latency_ms", result.latency.as_millis().to_string()),
                );
                Ok(result)
            }
            Err(e) => {
                self.metrics.inc_fetch_failed();
                let mut ev = LogEvent::new(LogLevel::Error, "fetch.failed")
                    .with_run(self.run_id.clone())
                    .with_field("error", e.to_string());
                if let Some(status) = e.status() {
                    ev = ev.with_field("status", status.to_string());
                }
                self.logger.log(ev);
                Err(e)
            }
        }
    }

    /// Runs every rule against the same snapshot. Never fetches.
    pub fn validate(&self, catalog: &Catalog) -> ValidationSummary {
        self.metrics.add_records_inspected(catalog.len() as u64);
        let mut outcomes = Vec::with_capacity(self.validators.len());
        for validator in &self.validators {
            let outcome = validator.validate(catalog);
            if outcome.passed {
                self.metrics.record_rule_pass();
                self.logger.log(
                    LogEvent::new(LogLevel::Info, "rule.passed")
                        .with_run(self.run_id.clone())
                        .with_rule(outcome.rule.clone())
                        .with_field("inspected", outcome.inspected.to_string()),
                );
            } else {
                self.metrics
                    .record_rule_fail(outcome.violations.len() as u64);
                self.logger.log(
                    LogEvent::new(LogLevel::Warn, "rule.failed")
                        .with_run(self.run_id.clone())
                        .with_rule(outcome.rule.clone())
                        .with_field("violations", outcome.violations.len().to_string()),
                );
            }
            outcomes.push(outcome);
        }

        let report = DefectReport::build(catalog, &self.validators);
        self.logger.log(
            LogEvent::new(LogLevel::Debug, "report.generated")
                .with_run(self.run_id.clone())
                .with_field("defective", report.defective.len().to_string()),
        );

        ValidationSummary { outcomes, report }
    }

    /// Fetch followed by validation. A fetch failure short-circuits: no rule
    /// runs without a catalog.
    pub async fn run(&self) -> Result<RunSummary, RunError> {
        let fetched = self.fetch().await?;
        let validation = self.validate(&fetched.catalog);
        let summary = RunSummary {
            run_id: self.run_id.clone(),
            status: fetched.status,
            location: fetched.location,
            records: fetched.catalog.len(),
            validation,
        };
        self.logger.log(
            LogEvent::new(
                if summary.passed() {
                    LogLevel::Info
                } else {
                    LogLevel::Warn
                },
                "run.finished",
            )
            .with_run(self.run_id.clone())
            .with_field("passed", summary.passed().to_string()),
        );
        Ok(summary)
    }
}
