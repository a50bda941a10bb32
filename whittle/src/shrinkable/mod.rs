//! Generated values paired with their lazy trees of smaller candidates.
//!
//! A [`Shrinkable`] is a cheap handle around a [`Shrink`] implementation.
//! Each kind of value brings its own implementation: integers approach a
//! target, containers lose elements before their elements shrink, and
//! combinators (map, filter, flat map, zip) shrink through the trees they
//! were built from.
//!
//! Every candidate yielded by [`Shrinkable::shrink`] has a strictly smaller
//! [`ShrinkingDistance`] than its parent, so any chain of accepted
//! candidates is finite.

use std::fmt;
use std::rc::Rc;

use crate::distance::ShrinkingDistance;
use crate::parameter::Parameter;

mod combinators;
mod container;
mod integral;

pub use combinators::{FlatMapped, Zipped};
pub use container::ContainerShrinkable;
pub use integral::{IntegralShrinkable, Integral, shrink_towards};

/// Lazy sequence of shrink candidates
pub type Candidates<T> = Box<dyn Iterator<Item = Shrinkable<T>>>;

/// Capability interface for shrinkable values.
///
/// `shrink` must be restartable: calling it twice yields the same candidates
/// and has no side effects.
pub trait Shrink<T> {
    /// The value this node represents
    fn value(&self) -> T;

    /// Magnitude used to order candidates
    fn distance(&self) -> ShrinkingDistance;

    /// Smaller candidates, most aggressive first
    fn shrink(&self) -> Candidates<T>;
}

/// A generated value together with its shrink tree.
pub struct Shrinkable<T> {
    inner: Rc<dyn Shrink<T>>,
}

impl<T: 'static> Shrinkable<T> {
    pub fn new<S>(shrink: S) -> Self
    where
        S: Shrink<T> + 'static,
    {
        Self {
            inner: Rc::new(shrink),
        }
    }

    /// A value without any smaller candidates
    pub fn unshrinkable(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(Unshrinkable { value })
    }

    pub fn value(&self) -> T {
        self.inner.value()
    }

    pub fn distance(&self) -> ShrinkingDistance {
        self.inner.distance()
    }

    pub fn shrink(&self) -> Candidates<T> {
        self.inner.shrink()
    }

    /// Transform the value; the tree is shrunk through the source
    pub fn map<U, F>(self, mapper: F) -> Shrinkable<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        Shrinkable::new(Mapped {
            source: self,
            mapper: Rc::new(mapper),
        })
    }

    /// Restrict the tree to values accepted by `predicate`.
    ///
    /// The current value is assumed to pass; candidates that do not are
    /// discarded.
    pub fn filter<F>(self, predicate: F) -> Shrinkable<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        Shrinkable::new(Filtered {
            source: self,
            predicate: Rc::new(predicate),
        })
    }

    /// Erase the value type so the shrinkable can stand for a property
    /// parameter
    pub fn erase(self) -> Shrinkable<Parameter>
    where
        T: Clone + fmt::Debug + PartialEq,
    {
        self.map(Parameter::new)
    }
}

impl<T> Clone for Shrinkable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Shrinkable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shrinkable")
            .field("value", &self.value())
            .field("distance", &self.distance())
            .finish()
    }
}

impl<T: PartialEq + 'static> PartialEq for Shrinkable<T> {
    /// Shrinkables are equal when they hold equal values at equal distance
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value() && self.distance() == other.distance()
    }
}

struct Unshrinkable<T> {
    value: T,
}

impl<T: Clone + 'static> Shrink<T> for Unshrinkable<T> {
    fn value(&self) -> T {
        self.value.clone()
    }

    fn distance(&self) -> ShrinkingDistance {
        ShrinkingDistance::zero()
    }

    fn shrink(&self) -> Candidates<T> {
        Box::new(std::iter::empty())
    }
}

struct Mapped<T, U> {
    source: Shrinkable<T>,
    mapper: Rc<dyn Fn(T) -> U>,
}

impl<T: 'static, U: 'static> Shrink<U> for Mapped<T, U> {
    fn value(&self) -> U {
        (self.mapper)(self.source.value())
    }

    fn distance(&self) -> ShrinkingDistance {
        self.source.distance()
    }

    fn shrink(&self) -> Candidates<U> {
        let mapper = Rc::clone(&self.mapper);
        Box::new(self.source.shrink().map(move |candidate| {
            Shrinkable::new(Mapped {
                source: candidate,
                mapper: Rc::clone(&mapper),
            })
        }))
    }
}

struct Filtered<T> {
    source: Shrinkable<T>,
    predicate: Rc<dyn Fn(&T) -> bool>,
}

impl<T: 'static> Shrink<T> for Filtered<T> {
    fn value(&self) -> T {
        self.source.value()
    }

    fn distance(&self) -> ShrinkingDistance {
        self.source.distance()
    }

    fn shrink(&self) -> Candidates<T> {
        let predicate = Rc::clone(&self.predicate);
        Box::new(
            self.source
                .shrink()
                .filter({
                    let predicate = Rc::clone(&predicate);
                    move |candidate| predicate(&candidate.value())
                })
                .map(move |candidate| {
                    Shrinkable::new(Filtered {
                        source: candidate,
                        predicate: Rc::clone(&predicate),
                    })
                }),
        )
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_unshrinkable() {
        let shrinkable = Shrinkable::unshrinkable("hello");
        assert_eq!(shrinkable.value(), "hello");
        assert!(shrinkable.distance().is_zero());
        assert_eq!(shrinkable.shrink().count(), 0);
    }

    #[test]
    fn test_map_shrinks_through_source() {
        let shrinkable = one_step(3).map(|v| format!("#{}", v));
        assert_eq!(shrinkable.value(), "#3");

        let candidates: Vec<String> = shrinkable.shrink().map(|c| c.value()).collect();
        assert_eq!(candidates, vec!["#2".to_string()]);
        assert_eq!(shrinkable.distance(), ShrinkingDistance::of(3));
    }

    #[test]
    fn test_filter_discards_rejected_candidates() {
        let shrinkable = Shrinkable::new(IntegralShrinkable::new(10i32, 0, 100))
            .filter(|v| v % 2 == 0);

        let candidates: Vec<i32> = shrinkable.shrink().map(|c| c.value()).collect();
        assert!(!candidates.is_empty());
        assert!(candidates.iter().all(|v| v % 2 == 0));
        assert_strictly_decreasing(&shrinkable, 4);
    }

    #[test]
    fn test_shrink_is_restartable() {
        let shrinkable = Shrinkable::new(IntegralShrinkable::new(100i64, -1000, 1000));
        let first: Vec<i64> = shrinkable.shrink().map(|c| c.value()).collect();
        let second: Vec<i64> = shrinkable.shrink().map(|c| c.value()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_erase() {
        let erased = one_step(5).erase();
        assert_eq!(erased.value().downcast_ref::<u64>(), Some(&5));
        let candidate = erased.shrink().next().unwrap();
        assert_eq!(candidate.value().downcast_ref::<u64>(), Some(&4));
    }

    #[test]
    fn test_equality_uses_value_and_distance() {
        assert_eq!(one_step(3), one_step(3));
        assert_ne!(one_step(3), one_step(4));
        assert_ne!(one_step(0), Shrinkable::unshrinkable(1u64));
    }
}
