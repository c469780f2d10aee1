use crate::domain::{render_value, Catalog, ProductRecord, Violation};
use crate::validation::Validator;
use serde_json::Value;

pub const RATE_MIN: f64 = 0.0;
pub const RATE_MAX: f64 = 5.0;

fn as_number(value: Option<&Value>) -> Option<f64> {
    value.filter(|v| v.is_number()).and_then(Value::as_f64)
}

pub struct TitleValidator;

impl TitleValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TitleValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for TitleValidator {
    fn id(&self) -> &str {
        "title"
    }

    fn label(&self) -> &str {
        "empty or invalid titles"
    }

    fn inspect(&self, record: &ProductRecord) -> Option<String> {
        match record.title().and_then(Value::as_str) {
            Some(title) if !title.is_empty() => None,
            _ => Some("Empty or invalid title".to_string()),
        }
    }
}

pub struct PriceValidator;

impl PriceValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PriceValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for PriceValidator {
    fn id(&self) -> &str {
        "price"
    }

    fn label(&self) -> &str {
        "invalid prices"
    }

    fn inspect(&self, record: &ProductRecord) -> Option<String> {
        match as_number(record.price()) {
            Some(price) if price >= 0.0 => None,
            _ => Some(format!("Invalid price: {}", render_value(record.price()))),
        }
    }

    fn offender(&self, record: &ProductRecord) -> String {
        format!("({}, {})", record.id(), render_value(record.price()))
    }
}

pub struct RatingValidator;

impl RatingValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RatingValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for RatingValidator {
    fn id(&self) -> &str {
        "rating"
    }

    fn label(&self) -> &str {
        "invalid ratings"
    }

    fn inspect(&self, record: &ProductRecord) -> Option<String> {
        match as_number(record.rate()) {
            Some(rate) if (RATE_MIN..=RATE_MAX).contains(&rate) => None,
            _ => Some(format!("Invalid rating: {}", render_value(record.rate()))),
        }
    }

    fn offender(&self, record: &ProductRecord) -> String {
        format!("({}, {})", record.id(), render_value(record.rate()))
    }
}

/// The rule set every run applies, in report order.
pub fn default_validators() -> Vec<Box<dyn Validator>> {
    vec![
        Box::new(TitleValidator::new()),
        Box::new(PriceValidator::new()),
        Box::new(RatingValidator::new()),
    ]
}

pub fn check_titles(catalog: &Catalog) -> Vec<Violation> {
    TitleValidator::new().validate(catalog).violations
}

pub fn check_prices(catalog: &Catalog) -> Vec<Violation> {
    PriceValidator::new().validate(catalog).violations
}

pub fn check_ratings(catalog: &Catalog) -> Vec<Violation> {
    RatingValidator::new().validate(catalog).violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> ProductRecord {
        ProductRecord::new(v)
    }

    #[test]
    fn numeric_strings_are_not_prices() {
        let r = record(json!({"id": 1, "price": "9.99"}));
        assert_eq!(
            PriceValidator::new().inspect(&r).as_deref(),
            Some("Invalid price: \"9.99\"")
        );
    }

    #[test]
    fn missing_rating_object_renders_null() {
        let r = record(json!({"id": 1}));
        assert_eq!(
            RatingValidator::new().inspect(&r).as_deref(),
            Some("Invalid rating: null")
        );
    }

    #[test]
    fn booleans_are_not_numbers() {
        let r = record(json!({"id": 1, "price": true, "rating": {"rate": false}}));
        assert!(PriceValidator::new().inspect(&r).is_some());
        assert!(RatingValidator::new().inspect(&r).is_some());
    }

    #[test]
    fn non_object_record_fails_every_rule() {
        let r = record(json!("not a product"));
        assert_eq!(r.id(), Value::Null);
        for v in default_validators() {
            assert!(v.inspect(&r).is_some(), "{} accepted a string record", v.id());
        }
    }
}
