//! Exhaustive generators: finite, ordered and restartable enumerations.
//!
//! Every constructor and combinator takes a ceiling and returns `None` when
//! the enumeration could exceed it. Exhaustive generation is only ever used
//! when the value space is known to be small, so absence is the normal way
//! of saying "generate randomly instead".

use std::collections::HashSet;
use std::hash::Hash;
use std::rc::Rc;

use crate::shrinkable::Integral;

type Enumerate<T> = Rc<dyn Fn() -> Box<dyn Iterator<Item = T>>>;

/// A finite enumeration of values with a known upper bound on its length
pub struct ExhaustiveGenerator<T> {
    max_count: u64,
    enumerate: Enumerate<T>,
}

impl<T> Clone for ExhaustiveGenerator<T> {
    fn clone(&self) -> Self {
        Self {
            max_count: self.max_count,
            enumerate: Rc::clone(&self.enumerate),
        }
    }
}

impl<T: 'static> ExhaustiveGenerator<T> {
    /// Wrap an enumeration yielding at most `max_count` values
    pub fn new<F, I>(max_count: u64, enumerate: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: Iterator<Item = T> + 'static,
    {
        Self {
            max_count,
            enumerate: Rc::new(move || Box::new(enumerate()) as Box<dyn Iterator<Item = T>>),
        }
    }

    /// Upper bound on the number of values; exact unless filtered
    pub fn max_count(&self) -> u64 {
        self.max_count
    }

    /// Start the enumeration from the beginning
    pub fn iter(&self) -> Box<dyn Iterator<Item = T>> {
        (self.enumerate)()
    }

    pub fn map<U, F>(self, mapper: F) -> ExhaustiveGenerator<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        let mapper = Rc::new(mapper);
        ExhaustiveGenerator::new(self.max_count, move || {
            let mapper = Rc::clone(&mapper);
            self.iter().map(move |value| mapper(value))
        })
    }

    /// Keep accepted values; the count stays an upper bound
    pub fn filter<F>(self, predicate: F) -> ExhaustiveGenerator<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        let predicate = Rc::new(predicate);
        ExhaustiveGenerator::new(self.max_count, move || {
            let predicate = Rc::clone(&predicate);
            self.iter().filter(move |value| predicate(value))
        })
    }

    /// Concatenate the enumerations selected by every source value.
    ///
    /// `None` if any selected generator is unavailable or the summed count
    /// exceeds `ceiling`.
    pub fn flat_map<U, F>(self, mapper: F, ceiling: u64) -> Option<ExhaustiveGenerator<U>>
    where
        U: 'static,
        F: Fn(T) -> Option<ExhaustiveGenerator<U>>,
    {
        let mut generators = Vec::new();
        let mut total: u64 = 0;
        for value in self.iter() {
            let generator = mapper(value)?;
            total = total.checked_add(generator.max_count())?;
            if total > ceiling {
                return None;
            }
            generators.push(generator);
        }

        let generators: Rc<[ExhaustiveGenerator<U>]> = Rc::from(generators);
        Some(ExhaustiveGenerator::new(total, move || {
            let generators = Rc::clone(&generators);
            (0..generators.len()).flat_map(move |index| generators[index].iter())
        }))
    }

    /// Every pair of values, left values varying slowest
    pub fn zip<U>(self, other: ExhaustiveGenerator<U>, ceiling: u64) -> Option<ExhaustiveGenerator<(T, U)>>
    where
        T: Clone,
        U: 'static,
    {
        let count = within(self.max_count.checked_mul(other.max_count)?, ceiling)?;
        Some(ExhaustiveGenerator::new(count, move || {
            let other = other.clone();
            self.iter()
                .flat_map(move |left| other.iter().map(move |right| (left.clone(), right)))
        }))
    }
}

fn within(count: u64, ceiling: u64) -> Option<u64> {
    (count <= ceiling).then_some(count)
}

/// Every integer in `[min, max]` in ascending order; `None` for an empty range
pub fn integers<T: Integral>(min: T, max: T, ceiling: u64) -> Option<ExhaustiveGenerator<T>> {
    let (low, high) = (min.to_i128()?, max.to_i128()?);
    if low > high {
        return None;
    }
    let count = within(u64::try_from(high - low + 1).ok()?, ceiling)?;
    Some(ExhaustiveGenerator::new(count, move || {
        (low..=high).filter_map(T::from_i128)
    }))
}

/// The given values in order
pub fn values<T: Clone + 'static>(values: Vec<T>, ceiling: u64) -> Option<ExhaustiveGenerator<T>> {
    let count = within(values.len() as u64, ceiling)?;
    let values: Rc<[T]> = Rc::from(values);
    Some(ExhaustiveGenerator::new(count, move || {
        let values = Rc::clone(&values);
        (0..values.len()).map(move |index| values[index].clone())
    }))
}

/// Every list of the element's values with a length in `[min_size, max_size]`,
/// shorter lists first
pub fn list<E: Clone + 'static>(
    element: &ExhaustiveGenerator<E>,
    min_size: usize,
    max_size: usize,
    ceiling: u64,
) -> Option<ExhaustiveGenerator<Vec<E>>> {
    if min_size > max_size {
        return None;
    }
    let elements: Rc<[E]> = element.iter().collect::<Vec<_>>().into();
    let count = list_count(elements.len() as u64, min_size, max_size, ceiling)?;
    Some(ExhaustiveGenerator::new(count, move || {
        let elements = Rc::clone(&elements);
        (min_size..=max_size).flat_map(move |size| Tuples::new(Rc::clone(&elements), size))
    }))
}

/// Every set of distinct element values with a size in `[min_size, max_size]`,
/// smaller sets first. Sets are enumerated as vectors in element order.
pub fn set<E: Clone + Eq + Hash + 'static>(
    element: &ExhaustiveGenerator<E>,
    min_size: usize,
    max_size: usize,
    ceiling: u64,
) -> Option<ExhaustiveGenerator<Vec<E>>> {
    if min_size > max_size {
        return None;
    }
    let mut seen = HashSet::new();
    let elements: Vec<E> = element
        .iter()
        .filter(|value| seen.insert(value.clone()))
        .collect();
    let max_size = max_size.min(elements.len());
    if min_size > max_size {
        return None;
    }
    let count = set_count(elements.len() as u64, min_size, max_size, ceiling)?;

    let elements: Rc<[E]> = Rc::from(elements);
    Some(ExhaustiveGenerator::new(count, move || {
        let elements = Rc::clone(&elements);
        (min_size..=max_size).flat_map(move |size| Combinations::new(Rc::clone(&elements), size))
    }))
}

/// Σ k^n for n in [min, max], or `None` above the ceiling
fn list_count(k: u64, min_size: usize, max_size: usize, ceiling: u64) -> Option<u64> {
    match k {
        0 => Some(u64::from(min_size == 0)),
        1 => within(u64::try_from(max_size - min_size).ok()?.checked_add(1)?, ceiling),
        _ => {
            let mut total: u64 = 0;
            for size in min_size..=max_size {
                let count = k.checked_pow(u32::try_from(size).ok()?)?;
                total = within(total.checked_add(count)?, ceiling)?;
            }
            Some(total)
        }
    }
}

/// Σ C(k, n) for n in [min, max], or `None` above the ceiling
fn set_count(k: u64, min_size: usize, max_size: usize, ceiling: u64) -> Option<u64> {
    let mut total: u64 = 0;
    // C(k, n) built incrementally from C(k, n - 1)
    let mut binomial: u128 = 1;
    for size in 0..=max_size as u64 {
        if size > 0 {
            binomial = binomial.checked_mul(u128::from(k - size + 1))? / u128::from(size);
        }
        if size >= min_size as u64 {
            let count = u64::try_from(binomial).ok()?;
            total = within(total.checked_add(count)?, ceiling)?;
        }
    }
    Some(total)
}

/// All `size`-tuples over `elements`, last position varying fastest
struct Tuples<E> {
    elements: Rc<[E]>,
    indices: Vec<usize>,
    exhausted: bool,
}

impl<E> Tuples<E> {
    fn new(elements: Rc<[E]>, size: usize) -> Self {
        let exhausted = elements.is_empty() && size > 0;
        Self {
            elements,
            indices: vec![0; size],
            exhausted,
        }
    }
}

impl<E: Clone> Iterator for Tuples<E> {
    type Item = Vec<E>;

    fn next(&mut self) -> Option<Vec<E>> {
        if self.exhausted {
            return None;
        }
        let current = self.indices.iter().map(|&i| self.elements[i].clone()).collect();

        self.exhausted = true;
        for index in self.indices.iter_mut().rev() {
            *index += 1;
            if *index < self.elements.len() {
                self.exhausted = false;
                break;
            }
            *index = 0;
        }
        Some(current)
    }
}

/// All `size`-combinations of `elements` in lexicographic index order
struct Combinations<E> {
    elements: Rc<[E]>,
    indices: Vec<usize>,
    exhausted: bool,
}

impl<E> Combinations<E> {
    fn new(elements: Rc<[E]>, size: usize) -> Self {
        let exhausted = size > elements.len();
        Self {
            elements,
            indices: (0..size).collect(),
            exhausted,
        }
    }
}

impl<E: Clone> Iterator for Combinations<E> {
    type Item = Vec<E>;

    fn next(&mut self) -> Option<Vec<E>> {
        if self.exhausted {
            return None;
        }
        let current = self.indices.iter().map(|&i| self.elements[i].clone()).collect();

        let n = self.elements.len();
        let k = self.indices.len();
        match (0..k).rev().find(|&i| self.indices[i] < n - k + i) {
            Some(i) => {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
            }
            None => self.exhausted = true,
        }
        Some(current)
    }
}
