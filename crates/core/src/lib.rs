//! # pedsynth core
//!
//! Deterministic generation of a synthetic pediatric hospital dataset.
//!
//! - [`config`]: validated run settings
//! - [`catalog`]: static clinical reference tables
//! - [`generators`]: structured records, one module per entity
//! - [`documents`]: clinical notes and radiology reports
//! - [`output`]: CSV, text and metadata writers
//! - [`pipeline`]: batch orchestration of a full run
//!
//! All randomness flows through [`sampling::SamplingContext`], so a run is a pure
//! function of its configuration.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod documents;
pub mod error;
pub mod formats;
pub mod generators;
pub mod output;
pub mod pipeline;
pub mod records;
pub mod sampling;

pub use config::{GenerationConfig, GenerationSettings, RunProfile};
pub use error::{SynthError, SynthResult};
pub use pipeline::{run, RunSummary};
