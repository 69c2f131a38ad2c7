use std::collections::HashMap;

use crate::Company;

pub mod candidates;
pub mod config;
pub mod pipeline;
pub mod scoring;
pub mod selector;

pub use config::{MatchConfig, ScoringPolicy, TemporalWindow};
pub use pipeline::{MatchOutcome, MatchingEngine};

/// Company records indexed by id, built once per batch and read-only while
/// matching runs.
pub type CompanyLookup<'a> = HashMap<&'a str, &'a Company>;
