use std::collections::HashSet;
use std::hash::Hash;
use std::rc::Rc;

use super::{Candidates, Shrink, Shrinkable};
use crate::distance::ShrinkingDistance;

type Collector<E, C> = Rc<dyn Fn(Vec<E>) -> C>;
type Validator<E> = Rc<dyn Fn(&[E]) -> bool>;

/// A sized container built from individually shrinkable elements.
///
/// Candidates reduce the element count first (cutting down to the minimum
/// size, then removing chunks of halving length, trailing chunk first) and
/// only then shrink single elements in place. A container never shrinks
/// below its minimum size.
pub struct ContainerShrinkable<E, C> {
    elements: Vec<Shrinkable<E>>,
    min_size: usize,
    collector: Collector<E, C>,
    validator: Option<Validator<E>>,
}

impl<E: Clone + 'static, C: 'static> ContainerShrinkable<E, C> {
    pub fn new<F>(elements: Vec<Shrinkable<E>>, min_size: usize, collector: F) -> Self
    where
        F: Fn(Vec<E>) -> C + 'static,
    {
        Self {
            elements,
            min_size,
            collector: Rc::new(collector),
            validator: None,
        }
    }

    /// Discard candidates containing equal elements
    pub fn unique(mut self) -> Self
    where
        E: Eq + Hash,
    {
        self.validator = Some(Rc::new(|values: &[E]| {
            let mut seen = HashSet::with_capacity(values.len());
            values.iter().all(|value| seen.insert(value))
        }));
        self
    }

    pub fn elements(&self) -> &[Shrinkable<E>] {
        &self.elements
    }

    fn with_elements(&self, elements: Vec<Shrinkable<E>>) -> Self {
        Self {
            elements,
            min_size: self.min_size,
            collector: Rc::clone(&self.collector),
            validator: self.validator.clone(),
        }
    }

    /// Element lists with fewer elements, largest cut first
    fn shrink_size(&self) -> Vec<Vec<Shrinkable<E>>> {
        let len = self.elements.len();
        if len <= self.min_size {
            return Vec::new();
        }

        let mut candidates = vec![self.elements[..self.min_size].to_vec()];
        let mut chunk = (len - self.min_size) / 2;
        while chunk > 0 {
            let trailing = len - chunk;
            candidates.push(self.without(trailing, chunk));
            for start in (0..trailing).step_by(chunk) {
                candidates.push(self.without(start, chunk));
            }
            chunk /= 2;
        }
        candidates
    }

    fn without(&self, start: usize, count: usize) -> Vec<Shrinkable<E>> {
        self.elements[..start]
            .iter()
            .chain(&self.elements[start + count..])
            .cloned()
            .collect()
    }
}

impl<E: Clone + 'static, C: 'static> Shrink<C> for ContainerShrinkable<E, C> {
    fn value(&self) -> C {
        (self.collector)(self.elements.iter().map(Shrinkable::value).collect())
    }

    fn distance(&self) -> ShrinkingDistance {
        let distances: Vec<ShrinkingDistance> =
            self.elements.iter().map(Shrinkable::distance).collect();
        ShrinkingDistance::for_collection(self.elements.len(), &distances)
    }

    fn shrink(&self) -> Candidates<C> {
        let fewer = self.shrink_size().into_iter();

        let elements = self.elements.clone();
        let smaller = (0..elements.len()).flat_map(move |index| {
            let elements = elements.clone();
            elements[index].shrink().map(move |candidate| {
                let mut replaced = elements.clone();
                replaced[index] = candidate;
                replaced
            })
        });

        let template = self.with_elements(Vec::new());
        let validator = self.validator.clone();
        Box::new(
            fewer
                .chain(smaller)
                .filter(move |elements| match &validator {
                    Some(is_valid) => {
                        let values: Vec<E> = elements.iter().map(Shrinkable::value).collect();
                        is_valid(&values)
                    }
                    None => true,
                })
                .map(move |elements| Shrinkable::new(template.with_elements(elements))),
        )
    }
}
