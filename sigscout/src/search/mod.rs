//! File classification.
//!
//! [`matcher`] holds the substring search algorithms, [`classifier`] applies
//! an ordered rule set to one file, and [`engine`] lists a directory and
//! fans the files out to a fixed-size worker pool.
//!
//! ```rust,no_run
//! use sigscout::{classify_directory, ScanConfig};
//!
//! let config = ScanConfig::new("files", "patterns.db");
//! let report = classify_directory(&config)?;
//! for line in report.lines() {
//!     println!("{}", line);
//! }
//! # Ok::<(), sigscout::SigError>(())
//! ```
pub mod classifier;
pub mod engine;
pub mod matcher;
pub mod processor;

pub use classifier::Classifier;
pub use engine::{classify_directory, classify_paths, list_directory};
pub use matcher::Algorithm;
pub use processor::FileProcessor;
