//! Umber Core - Foundational types for the umber import pipeline
//!
//! This crate provides the types that all other umber crates depend on:
//! - `UmberError` and the `Result` alias
//! - `Diagnostic` / `Diagnostics` - non-fatal issues collected during a run
//! - `AxisConversion` - coordinate axis flips applied on import
//! - Per-run settings structs (`ModelSettings`, `ActionFilters`)

mod axis;
mod diag;
mod error;
mod settings;

pub use axis::AxisConversion;
pub use diag::{Diagnostic, Diagnostics};
pub use error::{Result, UmberError};
pub use settings::{ActionFilters, ArmatureLink, ArmatureLinks, ModelSettings, RootHandling};
