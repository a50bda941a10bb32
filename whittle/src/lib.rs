#![allow(clippy::type_complexity)]

//! # Whittle - generation and shrinking for property-based testing
//!
//! Whittle turns declarative value specifications ([`Arbitrary`]) into
//! randomized or exhaustive samples, runs a property over them, and whittles
//! the first falsifying sample down to a small counterexample.
//!
//! ## Quick Start
//!
//! ```rust
//! use whittle::arbitraries::integers;
//! use whittle::{PropertyConfig, for_all};
//!
//! let config = PropertyConfig::default().with_seed(42);
//! let report = for_all(config, integers::<u32>().between(0, 1000), |n| *n < 100).unwrap();
//!
//! let shrunk = report.shrunk_parameters().unwrap();
//! assert_eq!(shrunk[0].downcast_ref::<u32>(), Some(&100));
//! ```
//!
//! ## Building blocks
//!
//! - [`Shrinkable`]: a value with a lazy tree of strictly smaller candidates
//! - [`RandomGenerator`] and [`ExhaustiveGenerator`]: random draws and
//!   bounded enumerations
//! - [`PropertyShrinker`]: the search for a local-minimum counterexample

pub mod arbitraries;
pub mod arbitrary;
pub mod config;
pub mod distance;
pub mod error;
pub mod exhaustive;
pub mod falsifier;
pub mod generator;
pub mod parallel;
pub mod parameter;
pub mod property;
pub mod reporting;
pub mod rng;
pub mod sample;
pub mod shrinkable;
pub mod shrinker;

// Re-export the main public API
pub use arbitrary::{Arbitrary, BoxedArbitrary, Elements, from_generator};
pub use config::{ConfigError, GenerationMode, PropertyConfig, ShrinkingMode};
pub use distance::ShrinkingDistance;
pub use error::{GenerationError, Result, WhittleError};
pub use exhaustive::ExhaustiveGenerator;
pub use falsifier::{Falsifier, TrialResult};
pub use generator::RandomGenerator;
pub use parallel::{ParallelConfig, run_all};
pub use parameter::Parameter;
pub use property::{CheckReport, Falsification, Property, for_all, for_all2};
pub use reporting::{NoopReporter, Reporter, TracingReporter};
pub use sample::{FalsifiedSample, Failure, PropertyShrinkingResult};
pub use shrinkable::{Shrink, Shrinkable};
pub use shrinker::{PropertyShrinker, ShrinkingState};
