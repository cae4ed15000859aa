//! # conjugacy-core
//!
//! **Does y fall or rise as x grows? Rank it and compare the ends.**
//!
//! `conjugacy-core` computes the monotonic conjugacy index of a paired sample.
//! Pairs are ordered by x, the y values are ranked in descending order with
//! fractional (average) tie-ranks, and the rank sums of the leading and
//! trailing thirds are compared.
//!
//! ## Quick Start
//!
//! ```
//! use conjugacy_core::{Observation, compute, format_plain};
//!
//! let pairs: Vec<Observation> = (1..=9)
//!     .map(|i| Observation::new(i as f64, (10 - i) as f64))
//!     .collect();
//!
//! let result = compute(&pairs).unwrap();
//! assert_eq!(format_plain(&result), "-18.00 6.72 -1.00");
//! ```
//!
//! ## Architecture
//!
//! PairSource (text/file) → Engine (sort, rank, partition) → ResultSink (plain/JSON)
//!
//! The engine only ever sees in-memory [`Observation`] slices. Reading columns
//! from text lives in [`dataset`] behind the [`PairSource`] trait, writing the
//! three numbers lives in [`report`] behind the [`ResultSink`] trait, and
//! [`batch`] runs many independent datasets in parallel.

pub mod batch;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod rank;
pub mod report;

pub use batch::{BatchSummary, DatasetOutcome, evaluate, evaluate_all};
pub use dataset::{
    Dataset, Delimiter, FileSource, PairSource, ParseOptions, TextSource, parse_pairs,
};
pub use engine::{
    Conjugacy, ConjugacyEngine, EngineConfig, MIN_OBSERVATIONS, Observation, TieBreak, compute,
    partition_size,
};
pub use error::{Axis, ConjugacyError, Error, InputFormatError, OutputWriteError};
pub use rank::{ascending_ranks, descending_ranks};
pub use report::{
    FileSink, OutputFormat, ResultSink, WriterSink, format_plain, parse_plain, render,
};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
