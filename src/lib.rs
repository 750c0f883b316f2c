//! Operator tools for the energia monitor project.
//!
//! `energia-launch` runs the data-processing step and, if it succeeds, the
//! monitor GUI. `energia-cleanup` removes build artifacts, stale reports and
//! deprecated files after an explicit confirmation.

pub mod cleanup;
pub mod cli;
pub mod config;
pub mod launcher;
pub mod model;
pub mod notify;
pub mod observability;
pub mod text_summary;
