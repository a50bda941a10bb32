//! Shrinking of falsified samples.
//!
//! [`PropertyShrinker`] repeatedly replaces the current sample with a
//! smaller one that still falsifies the property, until no candidate does
//! (a local minimum) or the step budget of [`ShrinkingMode::Bounded`] runs
//! out.
//!
//! Each step collects the candidates of one pass: every candidate of every
//! single parameter with the other parameters unchanged, then candidates
//! that shrink equal parameters in lockstep. Candidates are tried in order
//! of increasing aggregate distance. A candidate that fails the same way as
//! the current sample is accepted immediately; a candidate that fails
//! differently is accepted only if no candidate of the pass fails the same
//! way.

use tracing::{debug, trace, warn};

use crate::config::{DEFAULT_SHRINKING_BOUND, ShrinkingMode};
use crate::distance::ShrinkingDistance;
use crate::falsifier::{Falsifier, TrialResult, execute_catching};
use crate::parameter::Parameter;
use crate::reporting::Reporter;
use crate::sample::{FalsifiedSample, Failure, PropertyShrinkingResult};
use crate::shrinkable::Shrinkable;

/// Label under which reaching the step budget is published
pub const BOUND_REACHED_LABEL: &str = "shrinking bound reached";

/// Progress of a shrinker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShrinkingState {
    NotStarted,
    Searching,
    /// The step budget ran out before a local minimum was found
    BoundReached,
    /// No candidate of the last pass falsified the property
    LocalMinimum,
    Done,
}

/// One candidate sample of a pass
struct Candidate {
    distance: ShrinkingDistance,
    shrinkables: Vec<Shrinkable<Parameter>>,
}

/// Shrinks a falsified sample to a local minimum.
pub struct PropertyShrinker<'a> {
    original: FalsifiedSample,
    mode: ShrinkingMode,
    bound: usize,
    reporter: &'a dyn Reporter,
    sample_reporter: Box<dyn FnMut(&[Parameter]) + 'a>,
    state: ShrinkingState,
    stopped_by: Option<ShrinkingState>,
}

impl<'a> PropertyShrinker<'a> {
    /// `sample_reporter` is called with the parameters of every accepted
    /// step
    pub fn new<R>(
        original: FalsifiedSample,
        mode: ShrinkingMode,
        reporter: &'a dyn Reporter,
        sample_reporter: R,
    ) -> Self
    where
        R: FnMut(&[Parameter]) + 'a,
    {
        Self {
            original,
            mode,
            bound: DEFAULT_SHRINKING_BOUND,
            reporter,
            sample_reporter: Box::new(sample_reporter),
            state: ShrinkingState::NotStarted,
            stopped_by: None,
        }
    }

    /// Maximum number of accepted steps in [`ShrinkingMode::Bounded`]
    pub fn with_shrinking_bound(mut self, bound: usize) -> Self {
        self.bound = bound;
        self
    }

    pub fn state(&self) -> ShrinkingState {
        self.state
    }

    /// How the last search ended: [`ShrinkingState::BoundReached`] or
    /// [`ShrinkingState::LocalMinimum`]
    pub fn stopped_by(&self) -> Option<ShrinkingState> {
        self.stopped_by
    }

    /// Shrink the original sample. Every call starts over from the
    /// original sample.
    pub fn shrink<F: Falsifier>(&mut self, mut falsifier: F) -> PropertyShrinkingResult {
        if self.mode == ShrinkingMode::Off {
            self.state = ShrinkingState::Done;
            return PropertyShrinkingResult::new(self.original.clone(), 0);
        }

        self.state = ShrinkingState::Searching;
        let mut current = self.original.clone();
        let mut steps = 0;

        loop {
            if self.mode == ShrinkingMode::Bounded && steps >= self.bound {
                self.report_bound_reached(steps, &current);
                self.state = ShrinkingState::BoundReached;
                break;
            }

            match self.next_step(&current, &mut falsifier) {
                Some(next) => {
                    steps += 1;
                    debug!(
                        step = steps,
                        distance = %next.distance(),
                        "shrinking step accepted: {:?}",
                        next.parameters()
                    );
                    (self.sample_reporter)(next.parameters());
                    current = next;
                }
                None => {
                    self.state = ShrinkingState::LocalMinimum;
                    break;
                }
            }
        }

        debug!(steps, "shrinking finished in state {:?}", self.state);
        self.stopped_by = Some(self.state);
        self.state = ShrinkingState::Done;
        PropertyShrinkingResult::new(current, steps)
    }

    fn report_bound_reached(&self, steps: usize, current: &FalsifiedSample) {
        warn!(bound = self.bound, "shrinking bound reached");
        let value = format!(
            "after {} steps\n  original parameters: {:?}\n  shrunk parameters: {:?}\n\
             You can raise the bound or switch to full shrinking.",
            steps,
            self.original.parameters(),
            current.parameters()
        );
        self.reporter.publish_value(BOUND_REACHED_LABEL, &value);
    }

    /// Find the next accepted sample, if any
    fn next_step<F: Falsifier>(
        &self,
        current: &FalsifiedSample,
        falsifier: &mut F,
    ) -> Option<FalsifiedSample> {
        let mut different: Option<FalsifiedSample> = None;

        for candidate in candidates(current) {
            let mut parameters: Vec<Parameter> =
                candidate.shrinkables.iter().map(Shrinkable::value).collect();
            let result = execute_catching(falsifier, &mut parameters);
            trace!(distance = %candidate.distance, ?result, "shrinking candidate evaluated");

            let TrialResult::Falsified(failure) = result else {
                continue;
            };
            if is_same_failure(current.failure(), failure.as_ref()) {
                return Some(FalsifiedSample::with_parameters(
                    parameters,
                    candidate.shrinkables,
                    failure.or_else(|| current.failure().cloned()),
                ));
            }
            if different.is_none() {
                different = Some(FalsifiedSample::with_parameters(
                    parameters,
                    candidate.shrinkables,
                    failure,
                ));
            }
        }

        if let Some(sample) = &different {
            debug!(failure = ?sample.failure(), "accepting differently failing candidate");
        }
        different
    }
}

/// A candidate reproduces the current failure if nothing was captured for
/// the current sample, or if both captured failures are equal
fn is_same_failure(current: Option<&Failure>, candidate: Option<&Failure>) -> bool {
    match (current, candidate) {
        (None, _) => true,
        (Some(current), Some(candidate)) => current == candidate,
        (Some(_), None) => false,
    }
}

/// All candidates of one pass, smallest aggregate distance first.
///
/// Candidates that do not reduce the aggregate distance are dropped so that
/// every accepted step strictly decreases it.
fn candidates(current: &FalsifiedSample) -> Vec<Candidate> {
    let shrinkables = current.shrinkables();
    let current_distance = current.distance();
    let mut candidates = Vec::new();

    for (position, shrinkable) in shrinkables.iter().enumerate() {
        for smaller in shrinkable.shrink() {
            let mut replaced = shrinkables.to_vec();
            replaced[position] = smaller;
            candidates.push(replaced);
        }
    }

    for group in duplicate_groups(shrinkables) {
        for smaller in shrinkables[group[0]].shrink() {
            let mut replaced = shrinkables.to_vec();
            for &position in &group {
                replaced[position] = smaller.clone();
            }
            candidates.push(replaced);
        }
    }

    let mut candidates: Vec<Candidate> = candidates
        .into_iter()
        .map(|shrinkables| {
            let distances: Vec<ShrinkingDistance> =
                shrinkables.iter().map(Shrinkable::distance).collect();
            Candidate {
                distance: ShrinkingDistance::combine(&distances),
                shrinkables,
            }
        })
        .filter(|candidate| candidate.distance < current_distance)
        .collect();
    candidates.sort_by(|a, b| a.distance.cmp(&b.distance));
    candidates
}

/// Positions holding equal shrinkables, in groups of at least two
fn duplicate_groups(shrinkables: &[Shrinkable<Parameter>]) -> Vec<Vec<usize>> {
    let mut grouped = vec![false; shrinkables.len()];
    let mut groups = Vec::new();
    for first in 0..shrinkables.len() {
        if grouped[first] {
            continue;
        }
        let group: Vec<usize> = (first..shrinkables.len())
            .filter(|&other| shrinkables[other] == shrinkables[first])
            .collect();
        if group.len() > 1 {
            for &position in &group {
                grouped[position] = true;
            }
            groups.push(group);
        }
    }
    groups
}
