use catalog_check_core::domain::{Catalog, ProductRecord};
use catalog_check_core::logging::{BufferedEventLogger, NoopEventLogger};
use catalog_check_core::metrics::{InMemoryMetrics, Metrics};
use catalog_check_core::orchestrator::{CatalogValidator, RunError, ValidationSummary};
use catalog_check_core::report::generate_defect_report;
use catalog_check_core::source::FetchError;
use catalog_check_core::sources::{HttpCatalogSource, StaticCatalogSource};
use catalog_check_core::validation::Validator;
use catalog_check_core::validators::TitleValidator;
use httpmock::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;

fn fixture() -> Value {
    serde_json::from_str(include_str!("fixtures/products.json")).unwrap()
}

fn http_validator(
    url: String,
    logger: Arc<BufferedEventLogger>,
    metrics: Arc<InMemoryMetrics>,
) -> CatalogValidator {
    let source =
        HttpCatalogSource::new("http".to_string(), url, Some(5_000), logger.clone()).unwrap();
    CatalogValidator::new(Box::new(source), logger, metrics)
}

#[tokio::test]
async fn well_formed_catalog_passes() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/products");
            then.status(200).json_body(fixture());
        })
        .await;

    let logger = Arc::new(BufferedEventLogger::new(100));
    let metrics = Arc::new(InMemoryMetrics::new());
    let validator = http_validator(server.url("/products"), logger.clone(), metrics.clone());

    let summary = validator.run().await.unwrap();
    assert!(summary.passed());
    assert_eq!(summary.status, 200);
    assert_eq!(summary.records, 20);
    assert_eq!(summary.validation.outcomes.len(), 3);
    assert!(summary.validation.report.is_clean());

    let snap = metrics.snapshot();
    assert_eq!(snap.fetches_ok, 1);
    assert_eq!(snap.rules_passed, 3);
    assert_eq!(snap.rules_failed, 0);
    assert_eq!(snap.records_inspected, 20);

    let messages = logger.messages();
    assert_eq!(messages.first().map(String::as_str), Some("fetch.start"));
    assert!(messages.iter().any(|m| m == "fetch.ok"));
    assert_eq!(messages.last().map(String::as_str), Some("run.finished"));
}

#[tokio::test]
async fn server_error_short_circuits_before_any_rule() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/products");
            then.status(500);
        })
        .await;

    let logger = Arc::new(BufferedEventLogger::new(100));
    let metrics = Arc::new(InMemoryMetrics::new());
    let validator = http_validator(server.url("/products"), logger.clone(), metrics.clone());

    let err = validator.run().await.unwrap_err();
    let RunError::Fetch(fetch) = err;
    assert!(matches!(fetch, FetchError::Status { status: 500, .. }));

    let snap = metrics.snapshot();
    assert_eq!(snap.fetches_failed, 1);
    assert_eq!(snap.records_inspected, 0);
    assert_eq!(snap.rules_passed + snap.rules_failed, 0);

    let messages = logger.messages();
    assert!(messages.iter().any(|m| m == "fetch.failed"));
    assert!(!messages.iter().any(|m| m.starts_with("rule.")));
}

#[tokio::test]
async fn repeated_validation_reuses_the_fetched_catalog() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/products");
            then.status(200).json_body(fixture());
        })
        .await;

    let validator = http_validator(
        server.url("/products"),
        Arc::new(BufferedEventLogger::new(100)),
        Arc::new(InMemoryMetrics::new()),
    );

    let fetched = validator.fetch().await.unwrap();
    let first = validator.validate(&fetched.catalog);
    let second = validator.validate(&fetched.catalog);

    assert_eq!(mock.hits_async().await, 1);
    assert_eq!(first.outcomes, second.outcomes);
    assert_eq!(first.report, second.report);
}

#[tokio::test]
async fn records_are_counted_once_per_pass() {
    let catalog: Vec<Value> = serde_json::from_str(include_str!("fixtures/products.json")).unwrap();
    let catalog = Catalog::new(catalog.into_iter().map(ProductRecord::new).collect());

    let metrics = Arc::new(InMemoryMetrics::new());
    let validator = CatalogValidator::new(
        Box::new(StaticCatalogSource::new("static".to_string(), catalog)),
        Arc::new(NoopEventLogger),
        metrics.clone(),
    );
    let fetched = validator.fetch().await.unwrap();
    validator.validate(&fetched.catalog);
    assert_eq!(metrics.snapshot().records_inspected, 20);
    assert_eq!(metrics.snapshot().rules_passed, 3);

    validator.validate(&fetched.catalog);
    assert_eq!(metrics.snapshot().records_inspected, 40);
}

#[tokio::test]
async fn each_rule_reports_its_own_offenders() {
    let mut records: Vec<Value> = serde_json::from_str(include_str!("fixtures/products.json")).unwrap();
    records[0]["title"] = json!("");
    records[3]["price"] = json!(-5);
    records[3]["rating"]["rate"] = json!(5.1);
    records[7]["rating"]["rate"] = json!(5.0);
    let catalog = Catalog::new(records.into_iter().map(ProductRecord::new).collect());

    let metrics = Arc::new(InMemoryMetrics::new());
    let validator = CatalogValidator::new(
        Box::new(StaticCatalogSource::new("static".to_string(), catalog)),
        Arc::new(NoopEventLogger),
        metrics.clone(),
    );

    let summary = validator.run().await.unwrap();
    assert!(!summary.passed());

    let v = &summary.validation;
    assert_eq!(v.outcome("title").unwrap().violating_ids(), vec![json!(1)]);
    assert_eq!(v.outcome("price").unwrap().violating_ids(), vec![json!(4)]);
    assert_eq!(v.outcome("rating").unwrap().violating_ids(), vec![json!(4)]);
    assert_eq!(v.failures().count(), 3);

    let ids: Vec<Value> = v.report.defective.iter().map(|d| d.id.clone()).collect();
    assert_eq!(ids, vec![json!(1), json!(4)]);
    assert_eq!(v.report.defective[1].defects.len(), 2);

    let snap = metrics.snapshot();
    assert_eq!(snap.rules_failed, 3);
    assert_eq!(snap.violations_found, 3);
}

#[test]
fn defect_report_never_decides_the_outcome() {
    let mut records: Vec<Value> = serde_json::from_str(include_str!("fixtures/products.json")).unwrap();
    records[2]["price"] = json!(-1);
    let catalog = Catalog::new(records.into_iter().map(ProductRecord::new).collect());

    let summary = ValidationSummary {
        outcomes: vec![TitleValidator::new().validate(&catalog)],
        report: generate_defect_report(&catalog),
    };
    assert!(!summary.report.is_clean());
    assert!(summary.passed());
}
