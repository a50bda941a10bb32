use std::rc::Rc;

use super::{Candidates, Shrink, Shrinkable};
use crate::distance::ShrinkingDistance;

type Regenerate<T, U> = Rc<dyn Fn(&T) -> Option<Shrinkable<U>>>;

/// A value generated from an arbitrary that was itself chosen by a source
/// value.
///
/// Shrinking first shrinks the source and regenerates the dependent value
/// from the recorded seed, then shrinks the dependent value on its own.
pub struct FlatMapped<T, U> {
    source: Shrinkable<T>,
    inner: Shrinkable<U>,
    regenerate: Regenerate<T, U>,
}

impl<T: 'static, U: 'static> FlatMapped<T, U> {
    /// `regenerate` must be deterministic: the same source value always
    /// produces the same inner shrinkable.
    pub fn new<F>(source: Shrinkable<T>, inner: Shrinkable<U>, regenerate: F) -> Self
    where
        F: Fn(&T) -> Option<Shrinkable<U>> + 'static,
    {
        Self {
            source,
            inner,
            regenerate: Rc::new(regenerate),
        }
    }
}

impl<T: 'static, U: 'static> Shrink<U> for FlatMapped<T, U> {
    fn value(&self) -> U {
        self.inner.value()
    }

    fn distance(&self) -> ShrinkingDistance {
        self.source.distance().append(&self.inner.distance())
    }

    fn shrink(&self) -> Candidates<U> {
        let regenerate = Rc::clone(&self.regenerate);
        let by_source = self.source.shrink().filter_map(move |source| {
            let inner = regenerate(&source.value())?;
            Some(Shrinkable::new(FlatMapped {
                source,
                inner,
                regenerate: Rc::clone(&regenerate),
            }))
        });

        let source = self.source.clone();
        let regenerate = Rc::clone(&self.regenerate);
        let by_inner = self.inner.shrink().map(move |inner| {
            Shrinkable::new(FlatMapped {
                source: source.clone(),
                inner,
                regenerate: Rc::clone(&regenerate),
            })
        });

        Box::new(by_source.chain(by_inner))
    }
}

/// A pair of independently generated values
pub struct Zipped<A, B> {
    left: Shrinkable<A>,
    right: Shrinkable<B>,
}

impl<A: Clone + 'static, B: Clone + 'static> Zipped<A, B> {
    pub fn new(left: Shrinkable<A>, right: Shrinkable<B>) -> Self {
        Self { left, right }
    }
}

impl<A: Clone + 'static, B: Clone + 'static> Shrink<(A, B)> for Zipped<A, B> {
    fn value(&self) -> (A, B) {
        (self.left.value(), self.right.value())
    }

    fn distance(&self) -> ShrinkingDistance {
        self.left.distance().plus(&self.right.distance())
    }

    fn shrink(&self) -> Candidates<(A, B)> {
        let right = self.right.clone();
        let lefts = self
            .left
            .shrink()
            .map(move |left| Shrinkable::new(Zipped::new(left, right.clone())));

        let left = self.left.clone();
        let rights = self
            .right
            .shrink()
            .map(move |right| Shrinkable::new(Zipped::new(left.clone(), right)));

        Box::new(lefts.chain(rights))
    }
}
