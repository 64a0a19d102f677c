//! Output formatters for sweep results.
//!
//! This module provides different renderings of a finished sweep:
//! - Plain text for interactive use (the default)
//! - JSON for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::config::SweepConfig;
//! use dupesweep::output::{JsonOutput, TextOutput};
//! use dupesweep::sweep::sweep;
//!
//! let config = SweepConfig::for_dir("/home/user/Downloads");
//! let report = sweep(&config, None);
//!
//! print!("{}", TextOutput::new(&report).render());
//! println!("{}", JsonOutput::new(&report).to_json_pretty().unwrap());
//! ```

pub mod json;
pub mod text;

// Re-export main types
pub use json::JsonOutput;
pub use text::TextOutput;
