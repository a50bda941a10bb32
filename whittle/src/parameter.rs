//! Type-erased property parameters.

use std::any::{Any, type_name};
use std::fmt;

/// Object-safe view of a parameter value
trait AnyValue: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn clone_boxed(&self) -> Box<dyn AnyValue>;
    fn eq_dyn(&self, other: &dyn Any) -> bool;
    fn fmt_dyn(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
    fn type_name(&self) -> &'static str;
}

impl<T> AnyValue for T
where
    T: Clone + fmt::Debug + PartialEq + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn clone_boxed(&self) -> Box<dyn AnyValue> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| self == other)
    }

    fn fmt_dyn(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

/// A single property parameter of any supported type.
///
/// Parameters are what a falsifier receives. They can be cloned, compared
/// (values of different types are never equal) and downcast back to their
/// concrete type.
pub struct Parameter {
    value: Box<dyn AnyValue>,
}

impl Parameter {
    pub fn new<T>(value: T) -> Self
    where
        T: Clone + fmt::Debug + PartialEq + 'static,
    {
        Self {
            value: Box::new(value),
        }
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.value.as_any_mut().downcast_mut::<T>()
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.value.as_any().is::<T>()
    }

    /// Name of the concrete type held
    pub fn type_name(&self) -> &'static str {
        self.value.type_name()
    }
}

impl Clone for Parameter {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone_boxed(),
        }
    }
}

impl PartialEq for Parameter {
    fn eq(&self, other: &Self) -> bool {
        self.value.eq_dyn(other.value.as_any())
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt_dyn(f)
    }
}

/// Compare a parameter list against plain values of one type
pub fn parameters_eq<T>(parameters: &[Parameter], expected: &[T]) -> bool
where
    T: PartialEq + 'static,
{
    parameters.len() == expected.len()
        && parameters
            .iter()
            .zip(expected)
            .all(|(parameter, value)| parameter.downcast_ref::<T>() == Some(value))
}
