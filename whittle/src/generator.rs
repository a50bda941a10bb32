//! Random generators: one [`Shrinkable`] per invocation.

use std::collections::HashSet;
use std::hash::Hash;
use std::rc::Rc;

use rand::{Rng, RngCore};

use crate::config::{DEFAULT_COLLECTION_SIZE, MAX_FILTER_MISSES};
use crate::error::GenerationError;
use crate::rng::seeded_rng;
use crate::shrinkable::{
    ContainerShrinkable, FlatMapped, Integral, IntegralShrinkable, Shrinkable, Zipped,
};

type GenerateFn<T> = Rc<dyn Fn(&mut dyn RngCore) -> Result<Shrinkable<T>, GenerationError>>;

/// Produces shrinkable values from a random source.
///
/// Invocations are independent: the generator holds no state that changes
/// between calls, so the value produced depends only on the random source.
/// A generator may carry a bank of edge cases which are drawn instead of a
/// fresh value with a configurable probability.
pub struct RandomGenerator<T> {
    generate: GenerateFn<T>,
    edge_cases: Rc<[Shrinkable<T>]>,
    edge_case_probability: f64,
}

impl<T> Clone for RandomGenerator<T> {
    fn clone(&self) -> Self {
        Self {
            generate: Rc::clone(&self.generate),
            edge_cases: Rc::clone(&self.edge_cases),
            edge_case_probability: self.edge_case_probability,
        }
    }
}

impl<T: 'static> RandomGenerator<T> {
    pub fn new<F>(generate: F) -> Self
    where
        F: Fn(&mut dyn RngCore) -> Result<Shrinkable<T>, GenerationError> + 'static,
    {
        Self {
            generate: Rc::new(generate),
            edge_cases: Rc::from(Vec::new()),
            edge_case_probability: 0.0,
        }
    }

    /// Generate the next value
    pub fn next(&self, rng: &mut dyn RngCore) -> Result<Shrinkable<T>, GenerationError> {
        if !self.edge_cases.is_empty()
            && self.edge_case_probability > 0.0
            && rng.gen_bool(self.edge_case_probability)
        {
            let index = rng.gen_range(0..self.edge_cases.len());
            return Ok(self.edge_cases[index].clone());
        }
        (self.generate)(rng)
    }

    /// Attach edge cases that are drawn with the given probability
    pub fn with_edge_cases(mut self, edge_cases: Vec<Shrinkable<T>>, probability: f64) -> Self {
        self.edge_cases = Rc::from(edge_cases);
        self.edge_case_probability = probability.clamp(0.0, 1.0);
        self
    }

    pub fn edge_cases(&self) -> &[Shrinkable<T>] {
        &self.edge_cases
    }

    pub fn map<U, F>(self, mapper: F) -> RandomGenerator<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        let mapper = Rc::new(mapper);
        RandomGenerator::new(move |rng| {
            let mapper = Rc::clone(&mapper);
            Ok(self.next(rng)?.map(move |value| mapper(value)))
        })
    }

    /// Keep only values accepted by `predicate`, giving up after
    /// [`MAX_FILTER_MISSES`] consecutive rejections
    pub fn filter<F>(self, predicate: F) -> RandomGenerator<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        let predicate = Rc::new(predicate);
        RandomGenerator::new(move |rng| {
            for _ in 0..MAX_FILTER_MISSES {
                let shrinkable = self.next(rng)?;
                if predicate(&shrinkable.value()) {
                    let predicate = Rc::clone(&predicate);
                    return Ok(shrinkable.filter(move |value| predicate(value)));
                }
            }
            Err(GenerationError::TooManyFilterMisses {
                misses: MAX_FILTER_MISSES,
            })
        })
    }

    /// Generate a value, then a dependent value from the generator it
    /// selects. The dependent value is drawn from its own seeded source so
    /// that shrinking can regenerate it for smaller source values.
    pub fn flat_map<U, F>(self, mapper: F) -> RandomGenerator<U>
    where
        T: Clone,
        U: 'static,
        F: Fn(T) -> RandomGenerator<U> + 'static,
    {
        let mapper = Rc::new(mapper);
        RandomGenerator::new(move |rng| {
            let source = self.next(rng)?;
            let seed = rng.next_u64();
            let inner = mapper(source.value()).next(&mut seeded_rng(seed))?;

            let mapper = Rc::clone(&mapper);
            let regenerate = move |value: &T| {
                mapper(value.clone())
                    .next(&mut seeded_rng(seed))
                    .ok()
            };
            Ok(Shrinkable::new(FlatMapped::new(source, inner, regenerate)))
        })
    }

    pub fn zip<U>(self, other: RandomGenerator<U>) -> RandomGenerator<(T, U)>
    where
        T: Clone,
        U: Clone + 'static,
    {
        RandomGenerator::new(move |rng| {
            let left = self.next(rng)?;
            let right = other.next(rng)?;
            Ok(Shrinkable::new(Zipped::new(left, right)))
        })
    }
}

/// Integers uniformly distributed in `[min, max]`
pub fn integers<T: Integral>(min: T, max: T) -> RandomGenerator<T> {
    RandomGenerator::new(move |rng| {
        if min > max {
            return Err(GenerationError::invalid_range(min, max));
        }
        let value = rng.gen_range(min..=max);
        Ok(Shrinkable::new(IntegralShrinkable::new(value, min, max)))
    })
}

/// One of `values`, shrinking towards the front of the list
pub fn choose<T: Clone + 'static>(values: Vec<T>) -> RandomGenerator<T> {
    let values: Rc<[T]> = Rc::from(values);
    RandomGenerator::new(move |rng| {
        if values.is_empty() {
            return Err(GenerationError::EmptyChoice);
        }
        let max_index = values.len() - 1;
        let index = rng.gen_range(0..=max_index);
        let values = Rc::clone(&values);
        Ok(
            Shrinkable::new(IntegralShrinkable::new(index, 0, max_index))
                .map(move |index| values[index].clone()),
        )
    })
}

/// Default upper size for containers generated with `tries` tries.
///
/// Grows with the square root of the number of tries, never below 10 nor
/// above [`DEFAULT_COLLECTION_SIZE`].
pub fn default_max_size(tries: usize) -> usize {
    ((tries as f64).sqrt().round() as usize).clamp(10, DEFAULT_COLLECTION_SIZE)
}

fn check_size(min_size: usize, max_size: usize) -> Result<(), GenerationError> {
    if min_size > max_size {
        return Err(GenerationError::InvalidSize {
            min: min_size,
            max: max_size,
        });
    }
    Ok(())
}

/// Containers of independently generated elements with a size in
/// `[min_size, max_size]`
pub fn container<E, C, F>(
    element: RandomGenerator<E>,
    min_size: usize,
    max_size: usize,
    collector: F,
) -> RandomGenerator<C>
where
    E: Clone + 'static,
    C: 'static,
    F: Fn(Vec<E>) -> C + 'static,
{
    let collector = Rc::new(collector);
    RandomGenerator::new(move |rng| {
        check_size(min_size, max_size)?;
        let size = rng.gen_range(min_size..=max_size);
        let elements = (0..size)
            .map(|_| element.next(rng))
            .collect::<Result<Vec<_>, _>>()?;
        let collector = Rc::clone(&collector);
        Ok(Shrinkable::new(ContainerShrinkable::new(
            elements,
            min_size,
            move |values| collector(values),
        )))
    })
}

/// Containers of distinct elements.
///
/// Duplicate draws are discarded and resampled until the chosen size is
/// reached or `10 * size + 100` draws have been made. Falling short of the
/// chosen size is fine as long as `min_size` is met.
pub fn unique_container<E, C, F>(
    element: RandomGenerator<E>,
    min_size: usize,
    max_size: usize,
    collector: F,
) -> RandomGenerator<C>
where
    E: Clone + Eq + Hash + 'static,
    C: 'static,
    F: Fn(Vec<E>) -> C + 'static,
{
    let collector = Rc::new(collector);
    RandomGenerator::new(move |rng| {
        check_size(min_size, max_size)?;
        let size = rng.gen_range(min_size..=max_size);
        let max_draws = 10 * size + 100;

        let mut seen = HashSet::with_capacity(size);
        let mut elements = Vec::with_capacity(size);
        let mut draws = 0;
        while elements.len() < size && draws < max_draws {
            draws += 1;
            let shrinkable = element.next(rng)?;
            if seen.insert(shrinkable.value()) {
                elements.push(shrinkable);
            }
        }
        if elements.len() < min_size {
            return Err(GenerationError::NotEnoughUniqueElements {
                generated: elements.len(),
                required: min_size,
            });
        }

        let collector = Rc::clone(&collector);
        Ok(Shrinkable::new(
            ContainerShrinkable::new(elements, min_size, move |values| collector(values)).unique(),
        ))
    })
}
