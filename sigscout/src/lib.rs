pub mod config;
pub mod errors;
pub mod filters;
pub mod metrics;
pub mod results;
pub mod rules;
pub mod search;

pub use config::{CliOverrides, ReadMode, ScanConfig};
pub use errors::{SigError, SigResult};
pub use results::{ClassificationReport, ClassificationResult, Outcome};
pub use rules::{load_rules, Rule, RuleSet};
pub use search::{classify_directory, Algorithm, Classifier};
