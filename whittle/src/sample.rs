//! Falsified samples and shrinking results.

use std::any::{Any, type_name};
use std::fmt;

use crate::distance::ShrinkingDistance;
use crate::parameter::Parameter;
use crate::shrinkable::Shrinkable;

/// What went wrong when a trial was falsified
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Failure {
    /// Kind of failure, e.g. an error type name or `"panic"`
    pub kind: String,
    pub message: String,
}

impl Failure {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Record an error value, using its type name as the kind
    pub fn from_error<E: fmt::Display>(error: &E) -> Self {
        Self::new(type_name::<E>(), error.to_string())
    }

    /// Record a panic payload caught while running a falsifier
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|message| message.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        Self::new("panic", message)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// The parameters of a falsified trial along with their shrink trees.
///
/// `parameters` are the values the falsifier actually saw, which may differ
/// from the shrinkables' values when the falsifier mutates its input.
#[derive(Debug, Clone)]
pub struct FalsifiedSample {
    parameters: Vec<Parameter>,
    shrinkables: Vec<Shrinkable<Parameter>>,
    failure: Option<Failure>,
}

impl FalsifiedSample {
    pub fn new(shrinkables: Vec<Shrinkable<Parameter>>, failure: Option<Failure>) -> Self {
        let parameters = shrinkables.iter().map(Shrinkable::value).collect();
        Self {
            parameters,
            shrinkables,
            failure,
        }
    }

    /// A sample whose parameters were observed after running the falsifier
    pub fn with_parameters(
        parameters: Vec<Parameter>,
        shrinkables: Vec<Shrinkable<Parameter>>,
        failure: Option<Failure>,
    ) -> Self {
        Self {
            parameters,
            shrinkables,
            failure,
        }
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn shrinkables(&self) -> &[Shrinkable<Parameter>] {
        &self.shrinkables
    }

    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    /// Number of shrinkable parameters
    pub fn size(&self) -> usize {
        self.shrinkables.len()
    }

    /// Sum of the parameters' distances
    pub fn distance(&self) -> ShrinkingDistance {
        let distances: Vec<ShrinkingDistance> =
            self.shrinkables.iter().map(Shrinkable::distance).collect();
        ShrinkingDistance::combine(&distances)
    }
}

/// Outcome of shrinking a falsified sample
#[derive(Debug, Clone)]
pub struct PropertyShrinkingResult {
    sample: FalsifiedSample,
    steps: usize,
}

impl PropertyShrinkingResult {
    pub fn new(sample: FalsifiedSample, steps: usize) -> Self {
        Self { sample, steps }
    }

    pub fn sample(&self) -> &FalsifiedSample {
        &self.sample
    }

    /// Number of accepted shrinking steps; zero if nothing was shrunk
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn into_sample(self) -> FalsifiedSample {
        self.sample
    }
}
