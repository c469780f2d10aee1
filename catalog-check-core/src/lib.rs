pub mod config;
pub mod domain;
pub mod logging;
pub mod metrics;
pub mod orchestrator;
pub mod report;
pub mod source;
pub mod sources;
pub mod validation;
pub mod validators;
