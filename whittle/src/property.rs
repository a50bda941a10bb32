//! Property execution: generate parameters, run the falsifier, shrink the
//! first falsified sample.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::arbitrary::{Arbitrary, BoxedArbitrary};
use crate::config::{GenerationMode, PropertyConfig};
use crate::error::{Result, WhittleError};
use crate::exhaustive::{self, ExhaustiveGenerator};
use crate::falsifier::{Falsifier, TrialResult, execute_catching};
use crate::parameter::Parameter;
use crate::reporting::{Reporter, TracingReporter};
use crate::rng::create_rng;
use crate::sample::{FalsifiedSample, PropertyShrinkingResult};
use crate::shrinker::PropertyShrinker;
use crate::shrinkable::Shrinkable;

/// Label under which the shrunk sample of a failed property is published
pub const FALSIFIED_LABEL: &str = "falsified sample";

/// A falsified trial and what shrinking made of it
#[derive(Debug, Clone)]
pub struct Falsification {
    /// Number of the trial that falsified the property, starting at 1
    pub check: usize,
    pub original: FalsifiedSample,
    pub shrunk: PropertyShrinkingResult,
}

/// Outcome of checking a property
#[derive(Debug, Clone)]
pub struct CheckReport {
    /// Seed of the random source, for replaying the run
    pub seed: u64,
    pub tries: usize,
    /// Trials that were not invalid
    pub checks: usize,
    pub invalid: usize,
    /// `Randomized` or `Exhaustive`, whichever was used
    pub generation: GenerationMode,
    pub falsification: Option<Falsification>,
}

impl CheckReport {
    pub fn is_success(&self) -> bool {
        self.falsification.is_none()
    }

    /// Parameters of the shrunk sample, if the property was falsified
    pub fn shrunk_parameters(&self) -> Option<&[Parameter]> {
        self.falsification
            .as_ref()
            .map(|falsification| falsification.shrunk.sample().parameters())
    }
}

/// A property over a fixed list of parameters.
///
/// ```ignore
/// let report = Property::new(PropertyConfig::default())
///     .for_all(integers::<i32>())
///     .check(|parameters: &mut Vec<Parameter>| {
///         let value = parameters[0].downcast_ref::<i32>().unwrap();
///         TrialResult::from(value.wrapping_mul(2) % 2 == 0)
///     })?;
/// ```
pub struct Property {
    config: PropertyConfig,
    parameters: Vec<BoxedArbitrary<Parameter>>,
    reporter: Rc<dyn Reporter>,
    sample_reporter: RefCell<Box<dyn FnMut(&[Parameter])>>,
}

impl Property {
    pub fn new(config: PropertyConfig) -> Self {
        Self {
            config,
            parameters: Vec::new(),
            reporter: Rc::new(TracingReporter),
            sample_reporter: RefCell::new(Box::new(|_| {})),
        }
    }

    /// Add a parameter drawn from `arbitrary`
    pub fn for_all<A>(mut self, arbitrary: A) -> Self
    where
        A: Arbitrary + 'static,
        A::Value: Clone + fmt::Debug + PartialEq,
    {
        self.parameters.push(arbitrary.erased());
        self
    }

    pub fn with_reporter<R: Reporter + 'static>(mut self, reporter: R) -> Self {
        self.reporter = Rc::new(reporter);
        self
    }

    /// Called with the parameters of every accepted shrinking step
    pub fn with_sample_reporter<S>(mut self, sample_reporter: S) -> Self
    where
        S: FnMut(&[Parameter]) + 'static,
    {
        self.sample_reporter = RefCell::new(Box::new(sample_reporter));
        self
    }

    pub fn config(&self) -> &PropertyConfig {
        &self.config
    }

    /// Run the property.
    ///
    /// A falsified property is not an error: it is reported through
    /// [`CheckReport::falsification`]. Errors are reserved for invalid
    /// configuration, failed generation and too many invalid trials.
    pub fn check<F: Falsifier>(&self, mut falsifier: F) -> Result<CheckReport> {
        self.config.validate()?;
        let (mut rng, seed) = create_rng(self.config.seed);

        let mut run = Run::new(&self.config, seed);
        match self.exhaustive_generator() {
            Some(generator) => {
                run.generation = GenerationMode::Exhaustive;
                debug!(seed, count = generator.max_count(), "checking property exhaustively");
                for values in generator.iter() {
                    let shrinkables = values.into_iter().map(Shrinkable::unshrinkable).collect();
                    if run.trial(shrinkables, &mut falsifier)? {
                        break;
                    }
                }
            }
            None => {
                debug!(seed, tries = self.config.tries, "checking property");
                let generators: Vec<_> = self
                    .parameters
                    .iter()
                    .map(|arbitrary| {
                        arbitrary.generator_with_edge_cases(
                            self.config.tries,
                            self.config.edge_case_probability,
                        )
                    })
                    .collect();
                while run.checks < self.config.tries {
                    let shrinkables = generators
                        .iter()
                        .map(|generator| generator.next(&mut rng))
                        .collect::<std::result::Result<Vec<_>, _>>()?;
                    if run.trial(shrinkables, &mut falsifier)? {
                        break;
                    }
                }
            }
        }

        let Some(original) = run.falsified.take() else {
            debug!(checks = run.checks, invalid = run.invalid, "property satisfied");
            return Ok(run.into_report(None));
        };

        let mut sample_reporter = self.sample_reporter.borrow_mut();
        let mut shrinker = PropertyShrinker::new(
            original.clone(),
            self.config.shrinking,
            self.reporter.as_ref(),
            |parameters: &[Parameter]| (*sample_reporter)(parameters),
        )
        .with_shrinking_bound(self.config.shrinking_bound);
        let shrunk = shrinker.shrink(|parameters: &mut Vec<Parameter>| falsifier.execute(parameters));

        self.reporter.publish_value(
            FALSIFIED_LABEL,
            &format!(
                "{:?} after {} shrinking steps (seed {})",
                shrunk.sample().parameters(),
                shrunk.steps(),
                seed
            ),
        );

        let check = run.checks;
        Ok(run.into_report(Some(Falsification {
            check,
            original,
            shrunk,
        })))
    }

    /// Cartesian product of the parameters' exhaustive generators, if the
    /// configuration asks for exhaustive generation and one is available
    fn exhaustive_generator(&self) -> Option<ExhaustiveGenerator<Vec<Parameter>>> {
        let ceiling = self.config.max_exhaustive_count;
        match self.config.generation {
            GenerationMode::Randomized => None,
            GenerationMode::Auto => self
                .product(ceiling)
                .filter(|generator| generator.max_count() <= self.config.tries as u64),
            GenerationMode::Exhaustive => {
                let generator = self.product(ceiling);
                if generator.is_none() {
                    warn!(ceiling, "no exhaustive generator available, generating randomly");
                }
                generator
            }
        }
    }

    fn product(&self, ceiling: u64) -> Option<ExhaustiveGenerator<Vec<Parameter>>> {
        let mut product = exhaustive::values(vec![Vec::new()], ceiling)?;
        for arbitrary in &self.parameters {
            product = product
                .zip(arbitrary.exhaustive_with(ceiling)?, ceiling)?
                .map(|(mut values, value)| {
                    values.push(value);
                    values
                });
        }
        Some(product)
    }
}

/// Bookkeeping of a single run
struct Run<'c> {
    config: &'c PropertyConfig,
    seed: u64,
    generation: GenerationMode,
    checks: usize,
    invalid: usize,
    falsified: Option<FalsifiedSample>,
}

impl<'c> Run<'c> {
    fn new(config: &'c PropertyConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            generation: GenerationMode::Randomized,
            checks: 0,
            invalid: 0,
            falsified: None,
        }
    }

    /// Run one trial; returns true once the property is falsified
    fn trial<F: Falsifier>(
        &mut self,
        shrinkables: Vec<Shrinkable<Parameter>>,
        falsifier: &mut F,
    ) -> Result<bool> {
        let mut parameters: Vec<Parameter> = shrinkables.iter().map(Shrinkable::value).collect();
        match execute_catching(falsifier, &mut parameters) {
            TrialResult::Satisfied => {
                self.checks += 1;
                Ok(false)
            }
            TrialResult::Invalid => {
                self.invalid += 1;
                let max_invalid = self.config.max_discard_ratio.saturating_mul(self.config.tries);
                if self.invalid > max_invalid {
                    return Err(WhittleError::TooManyInvalidTrials {
                        invalid: self.invalid,
                        tries: self.config.tries,
                    });
                }
                Ok(false)
            }
            TrialResult::Falsified(failure) => {
                self.checks += 1;
                debug!(check = self.checks, ?failure, "property falsified: {:?}", parameters);
                self.falsified = Some(FalsifiedSample::with_parameters(
                    parameters,
                    shrinkables,
                    failure,
                ));
                Ok(true)
            }
        }
    }

    fn into_report(self, falsification: Option<Falsification>) -> CheckReport {
        CheckReport {
            seed: self.seed,
            tries: self.config.tries,
            checks: self.checks,
            invalid: self.invalid,
            generation: self.generation,
            falsification,
        }
    }
}

fn typed<'p, T: 'static>(parameters: &'p [Parameter], index: usize) -> Option<&'p T> {
    parameters.get(index)?.downcast_ref::<T>()
}

/// Check a predicate over values of one arbitrary
pub fn for_all<A, P>(config: PropertyConfig, arbitrary: A, mut property: P) -> Result<CheckReport>
where
    A: Arbitrary + 'static,
    A::Value: Clone + fmt::Debug + PartialEq,
    P: FnMut(&A::Value) -> bool,
{
    Property::new(config)
        .for_all(arbitrary)
        .check(|parameters: &mut Vec<Parameter>| {
            match typed::<A::Value>(parameters, 0) {
                Some(value) => TrialResult::from(property(value)),
                None => TrialResult::Invalid,
            }
        })
}

/// Check a predicate over pairs of values
pub fn for_all2<A, B, P>(
    config: PropertyConfig,
    first: A,
    second: B,
    mut property: P,
) -> Result<CheckReport>
where
    A: Arbitrary + 'static,
    A::Value: Clone + fmt::Debug + PartialEq,
    B: Arbitrary + 'static,
    B::Value: Clone + fmt::Debug + PartialEq,
    P: FnMut(&A::Value, &B::Value) -> bool,
{
    Property::new(config)
        .for_all(first)
        .for_all(second)
        .check(|parameters: &mut Vec<Parameter>| {
            match (
                typed::<A::Value>(parameters, 0),
                typed::<B::Value>(parameters, 1),
            ) {
                (Some(first), Some(second)) => TrialResult::from(property(first, second)),
                _ => TrialResult::Invalid,
            }
        })
}
