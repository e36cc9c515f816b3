//! # Engine Module
//!
//! The stateful side of the library: how a curated dataset becomes a finalized table.
//!
//! - **Configuration** ([`config`]) - Experimental conditions, titrant error settings and the
//!   input files of a tabulation run, with a validating builder
//! - **Derivation** ([`derive`]) - The per-system pipeline and the consistency check
//! - **Progress** ([`progress`]) - Callback-based progress reporting for front ends
//! - **Errors** ([`error`]) - The error type returned by every engine entry point

pub mod config;
pub mod derive;
pub mod error;
pub mod progress;
