//! The falsifier boundary: re-running a property on candidate parameters.

use std::panic::{self, AssertUnwindSafe};

use crate::parameter::Parameter;
use crate::sample::Failure;

/// Outcome of running a property once
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialResult {
    /// The property held
    Satisfied,
    /// The property did not hold, optionally with a captured failure
    Falsified(Option<Failure>),
    /// The parameters violated an assumption; the trial does not count
    Invalid,
}

impl TrialResult {
    pub fn falsified(failure: Failure) -> Self {
        TrialResult::Falsified(Some(failure))
    }

    /// Map an `Err` to a falsification carrying the error
    pub fn from_result<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => TrialResult::Satisfied,
            Err(error) => TrialResult::falsified(Failure::from_error(&error)),
        }
    }

    pub fn is_falsified(&self) -> bool {
        matches!(self, TrialResult::Falsified(_))
    }
}

impl From<bool> for TrialResult {
    fn from(holds: bool) -> Self {
        if holds {
            TrialResult::Satisfied
        } else {
            TrialResult::Falsified(None)
        }
    }
}

/// A re-runnable property check.
///
/// The falsifier may mutate the parameters it is given; the values it leaves
/// behind are the ones recorded for a falsified trial.
pub trait Falsifier {
    fn execute(&mut self, parameters: &mut Vec<Parameter>) -> TrialResult;
}

impl<F> Falsifier for F
where
    F: FnMut(&mut Vec<Parameter>) -> TrialResult,
{
    fn execute(&mut self, parameters: &mut Vec<Parameter>) -> TrialResult {
        self(parameters)
    }
}

/// Falsifier from a predicate over the parameters
pub fn predicate<P>(mut predicate: P) -> impl Falsifier
where
    P: FnMut(&[Parameter]) -> bool,
{
    move |parameters: &mut Vec<Parameter>| TrialResult::from(predicate(parameters.as_slice()))
}

/// Run the falsifier, recording a panic as a falsification
pub fn execute_catching<F>(falsifier: &mut F, parameters: &mut Vec<Parameter>) -> TrialResult
where
    F: Falsifier + ?Sized,
{
    match panic::catch_unwind(AssertUnwindSafe(|| falsifier.execute(parameters))) {
        Ok(result) => result,
        Err(payload) => TrialResult::falsified(Failure::from_panic(payload.as_ref())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_falsifier() {
        let mut falsifier = |parameters: &mut Vec<Parameter>| {
            TrialResult::from(parameters[0].downcast_ref::<i32>() == Some(&1))
        };
        assert_eq!(
            falsifier.execute(&mut vec![Parameter::new(1)]),
            TrialResult::Satisfied
        );
        assert_eq!(
            falsifier.execute(&mut vec![Parameter::new(2)]),
            TrialResult::Falsified(None)
        );
    }

    #[test]
    fn test_predicate() {
        let mut falsifier = predicate(|parameters| parameters.len() < 2);
        assert!(!falsifier.execute(&mut vec![Parameter::new(1)]).is_falsified());
        assert!(
            falsifier
                .execute(&mut vec![Parameter::new(1), Parameter::new(2)])
                .is_falsified()
        );
    }

    #[test]
    fn test_from_result() {
        assert_eq!(TrialResult::from_result::<String>(Ok(())), TrialResult::Satisfied);
        match TrialResult::from_result(Err("bad".to_string())) {
            TrialResult::Falsified(Some(failure)) => {
                assert!(failure.kind.ends_with("String"));
                assert_eq!(failure.message, "bad");
            }
            other => panic!("expected a falsification, got {:?}", other),
        }
    }

    #[test]
    fn test_panics_are_captured() {
        let mut falsifier = |_: &mut Vec<Parameter>| -> TrialResult { panic!("boom") };
        assert_eq!(
            execute_catching(&mut falsifier, &mut Vec::new()),
            TrialResult::falsified(Failure::new("panic", "boom"))
        );
    }

    #[test]
    fn test_mutations_are_visible() {
        let mut falsifier = |parameters: &mut Vec<Parameter>| {
            parameters.push(Parameter::new(42));
            TrialResult::Falsified(None)
        };
        let mut parameters = vec![Parameter::new(1)];
        execute_catching(&mut falsifier, &mut parameters);
        assert_eq!(parameters.len(), 2);
    }
}
