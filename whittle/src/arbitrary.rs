//! The [`Arbitrary`] trait and its combinator algebra.
//!
//! An arbitrary is a value specification. It can hand out a random
//! generator for a given trial budget, possibly an exhaustive generator
//! when its value space is small enough, and a list of edge cases.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::rc::Rc;
use std::vec;

use crate::config::{DEFAULT_COLLECTION_SIZE, DEFAULT_MAX_EXHAUSTIVE_COUNT};
use crate::exhaustive::{self, ExhaustiveGenerator};
use crate::generator::{self, RandomGenerator, default_max_size};
use crate::parameter::Parameter;
use crate::shrinkable::{ContainerShrinkable, Shrinkable, Zipped};

/// A specification of how to produce values of one type
pub trait Arbitrary {
    type Value: 'static;

    /// Random generator for a run with `tries` trials.
    ///
    /// `tries` scales default sizes: larger runs explore larger containers.
    fn generator(&self, tries: usize) -> RandomGenerator<Self::Value>;

    /// Exhaustive generator, or `None` if there is none or it would yield
    /// more than `max_count` values
    fn exhaustive_with(&self, max_count: u64) -> Option<ExhaustiveGenerator<Self::Value>> {
        let _ = max_count;
        None
    }

    /// Values worth trying regardless of randomness
    fn edge_cases(&self) -> Vec<Shrinkable<Self::Value>> {
        Vec::new()
    }

    fn exhaustive(&self) -> Option<ExhaustiveGenerator<Self::Value>> {
        self.exhaustive_with(DEFAULT_MAX_EXHAUSTIVE_COUNT)
    }

    /// Random generator that also draws from [`edge_cases`](Self::edge_cases)
    fn generator_with_edge_cases(&self, tries: usize, probability: f64) -> RandomGenerator<Self::Value> {
        self.generator(tries)
            .with_edge_cases(self.edge_cases(), probability)
    }

    fn map<U, F>(self, mapper: F) -> Map<Self, U>
    where
        Self: Sized,
        U: 'static,
        F: Fn(Self::Value) -> U + 'static,
    {
        Map {
            source: self,
            mapper: Rc::new(mapper),
        }
    }

    fn filter<F>(self, predicate: F) -> Filter<Self>
    where
        Self: Sized,
        F: Fn(&Self::Value) -> bool + 'static,
    {
        Filter {
            source: self,
            predicate: Rc::new(predicate),
        }
    }

    /// Use each generated value to choose the arbitrary of a dependent value
    fn flat_map<B, F>(self, mapper: F) -> FlatMap<Self, B>
    where
        Self: Sized,
        Self::Value: Clone,
        B: Arbitrary + 'static,
        F: Fn(Self::Value) -> B + 'static,
    {
        FlatMap {
            source: self,
            mapper: Rc::new(mapper),
        }
    }

    fn zip<B>(self, other: B) -> Zip<Self, B>
    where
        Self: Sized,
        Self::Value: Clone,
        B: Arbitrary,
        B::Value: Clone,
    {
        Zip { left: self, right: other }
    }

    fn list(self) -> Container<Self, Vec<Self::Value>>
    where
        Self: Sized,
        Self::Value: Clone,
    {
        Container::new(self, |elements| elements)
    }

    fn array(self) -> Container<Self, Box<[Self::Value]>>
    where
        Self: Sized,
        Self::Value: Clone,
    {
        Container::new(self, Vec::into_boxed_slice)
    }

    /// Single-pass sequences of elements
    fn iter(self) -> Container<Self, Elements<Self::Value>>
    where
        Self: Sized,
        Self::Value: Clone,
    {
        Container::new(self, |elements: Vec<Self::Value>| Elements(elements.into_iter()))
    }

    /// Any container that can be collected from its elements
    fn collect<C>(self) -> Container<Self, C>
    where
        Self: Sized,
        Self::Value: Clone,
        C: FromIterator<Self::Value> + 'static,
    {
        Container::new(self, |elements: Vec<Self::Value>| elements.into_iter().collect())
    }

    fn set(self) -> SetArbitrary<Self>
    where
        Self: Sized,
        Self::Value: Clone + Eq + Hash,
    {
        SetArbitrary {
            element: self,
            min_size: 0,
            max_size: None,
        }
    }

    fn boxed(self) -> BoxedArbitrary<Self::Value>
    where
        Self: Sized + 'static,
    {
        Rc::new(self)
    }

    /// Erase the value type so the arbitrary can supply a property parameter
    fn erased(self) -> BoxedArbitrary<Parameter>
    where
        Self: Sized + 'static,
        Self::Value: Clone + fmt::Debug + PartialEq,
    {
        self.map(Parameter::new).boxed()
    }
}

/// Shared, type-erased arbitrary
pub type BoxedArbitrary<T> = Rc<dyn Arbitrary<Value = T>>;

impl<T: 'static> Arbitrary for Rc<dyn Arbitrary<Value = T>> {
    type Value = T;

    fn generator(&self, tries: usize) -> RandomGenerator<T> {
        (**self).generator(tries)
    }

    fn exhaustive_with(&self, max_count: u64) -> Option<ExhaustiveGenerator<T>> {
        (**self).exhaustive_with(max_count)
    }

    fn edge_cases(&self) -> Vec<Shrinkable<T>> {
        (**self).edge_cases()
    }
}

pub struct Map<A: Arbitrary, U> {
    source: A,
    mapper: Rc<dyn Fn(A::Value) -> U>,
}

impl<A: Arbitrary, U: 'static> Arbitrary for Map<A, U> {
    type Value = U;

    fn generator(&self, tries: usize) -> RandomGenerator<U> {
        let mapper = Rc::clone(&self.mapper);
        self.source.generator(tries).map(move |value| mapper(value))
    }

    fn exhaustive_with(&self, max_count: u64) -> Option<ExhaustiveGenerator<U>> {
        let mapper = Rc::clone(&self.mapper);
        Some(
            self.source
                .exhaustive_with(max_count)?
                .map(move |value| mapper(value)),
        )
    }

    fn edge_cases(&self) -> Vec<Shrinkable<U>> {
        self.source
            .edge_cases()
            .into_iter()
            .map(|edge_case| {
                let mapper = Rc::clone(&self.mapper);
                edge_case.map(move |value| mapper(value))
            })
            .collect()
    }
}

pub struct Filter<A: Arbitrary> {
    source: A,
    predicate: Rc<dyn Fn(&A::Value) -> bool>,
}

impl<A: Arbitrary> Arbitrary for Filter<A> {
    type Value = A::Value;

    fn generator(&self, tries: usize) -> RandomGenerator<A::Value> {
        let predicate = Rc::clone(&self.predicate);
        self.source
            .generator(tries)
            .filter(move |value| predicate(value))
    }

    fn exhaustive_with(&self, max_count: u64) -> Option<ExhaustiveGenerator<A::Value>> {
        let predicate = Rc::clone(&self.predicate);
        Some(
            self.source
                .exhaustive_with(max_count)?
                .filter(move |value| predicate(value)),
        )
    }

    fn edge_cases(&self) -> Vec<Shrinkable<A::Value>> {
        self.source
            .edge_cases()
            .into_iter()
            .filter(|edge_case| (self.predicate)(&edge_case.value()))
            .map(|edge_case| {
                let predicate = Rc::clone(&self.predicate);
                edge_case.filter(move |value| predicate(value))
            })
            .collect()
    }
}

pub struct FlatMap<A: Arbitrary, B> {
    source: A,
    mapper: Rc<dyn Fn(A::Value) -> B>,
}

impl<A, B> Arbitrary for FlatMap<A, B>
where
    A: Arbitrary,
    A::Value: Clone,
    B: Arbitrary + 'static,
{
    type Value = B::Value;

    fn generator(&self, tries: usize) -> RandomGenerator<B::Value> {
        let mapper = Rc::clone(&self.mapper);
        self.source
            .generator(tries)
            .flat_map(move |value| mapper(value).generator(tries))
    }

    fn exhaustive_with(&self, max_count: u64) -> Option<ExhaustiveGenerator<B::Value>> {
        self.source
            .exhaustive_with(max_count)?
            .flat_map(|value| (self.mapper)(value).exhaustive_with(max_count), max_count)
    }
}

pub struct Zip<A, B> {
    left: A,
    right: B,
}

impl<A, B> Arbitrary for Zip<A, B>
where
    A: Arbitrary,
    A::Value: Clone,
    B: Arbitrary,
    B::Value: Clone,
{
    type Value = (A::Value, B::Value);

    fn generator(&self, tries: usize) -> RandomGenerator<Self::Value> {
        self.left.generator(tries).zip(self.right.generator(tries))
    }

    fn exhaustive_with(&self, max_count: u64) -> Option<ExhaustiveGenerator<Self::Value>> {
        self.left
            .exhaustive_with(max_count)?
            .zip(self.right.exhaustive_with(max_count)?, max_count)
    }

    fn edge_cases(&self) -> Vec<Shrinkable<Self::Value>> {
        let rights = self.right.edge_cases();
        self.left
            .edge_cases()
            .into_iter()
            .flat_map(|left| {
                rights
                    .iter()
                    .map(move |right| Shrinkable::new(Zipped::new(left.clone(), right.clone())))
            })
            .collect()
    }
}

/// Edge cases shared by sized containers: the empty container and
/// single-element containers of the element's edge cases
fn container_edge_cases<E, C>(
    element_edge_cases: Vec<Shrinkable<E>>,
    min_size: usize,
    max_size: Option<usize>,
    collector: Rc<dyn Fn(Vec<E>) -> C>,
) -> Vec<Shrinkable<C>>
where
    E: Clone + 'static,
    C: 'static,
{
    let build = |elements: Vec<Shrinkable<E>>| {
        let collector = Rc::clone(&collector);
        Shrinkable::new(ContainerShrinkable::new(elements, min_size, move |values| {
            collector(values)
        }))
    };

    let mut edge_cases = Vec::new();
    if min_size == 0 {
        edge_cases.push(build(Vec::new()));
    }
    if min_size <= 1 && max_size.is_none_or(|max| max >= 1) {
        edge_cases.extend(element_edge_cases.into_iter().map(|element| build(vec![element])));
    }
    edge_cases
}

/// Containers with a size in `[min_size, max_size]` whose elements are
/// generated independently
pub struct Container<A: Arbitrary, C> {
    element: A,
    min_size: usize,
    max_size: Option<usize>,
    collector: Rc<dyn Fn(Vec<A::Value>) -> C>,
}

impl<A, C> Container<A, C>
where
    A: Arbitrary,
    A::Value: Clone,
    C: 'static,
{
    fn new<F>(element: A, collector: F) -> Self
    where
        F: Fn(Vec<A::Value>) -> C + 'static,
    {
        Self {
            element,
            min_size: 0,
            max_size: None,
            collector: Rc::new(collector),
        }
    }

    pub fn of_min_size(mut self, min_size: usize) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn of_max_size(mut self, max_size: usize) -> Self {
        self.max_size = Some(max_size);
        self
    }

    pub fn of_size(self, size: usize) -> Self {
        self.of_min_size(size).of_max_size(size)
    }

    fn effective_max_size(&self, tries: usize) -> usize {
        self.max_size
            .unwrap_or_else(|| default_max_size(tries).max(self.min_size))
    }
}

impl<A, C> Arbitrary for Container<A, C>
where
    A: Arbitrary,
    A::Value: Clone,
    C: 'static,
{
    type Value = C;

    fn generator(&self, tries: usize) -> RandomGenerator<C> {
        let collector = Rc::clone(&self.collector);
        generator::container(
            self.element.generator(tries),
            self.min_size,
            self.effective_max_size(tries),
            move |values| collector(values),
        )
    }

    fn exhaustive_with(&self, max_count: u64) -> Option<ExhaustiveGenerator<C>> {
        let element = self.element.exhaustive_with(max_count)?;
        let max_size = self
            .max_size
            .unwrap_or_else(|| DEFAULT_COLLECTION_SIZE.max(self.min_size));
        let collector = Rc::clone(&self.collector);
        Some(
            exhaustive::list(&element, self.min_size, max_size, max_count)?
                .map(move |values| collector(values)),
        )
    }

    fn edge_cases(&self) -> Vec<Shrinkable<C>> {
        container_edge_cases(
            self.element.edge_cases(),
            self.min_size,
            self.max_size,
            Rc::clone(&self.collector),
        )
    }
}

/// Sets of distinct elements
pub struct SetArbitrary<A> {
    element: A,
    min_size: usize,
    max_size: Option<usize>,
}

impl<A> SetArbitrary<A>
where
    A: Arbitrary,
    A::Value: Clone + Eq + Hash,
{
    pub fn of_min_size(mut self, min_size: usize) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn of_max_size(mut self, max_size: usize) -> Self {
        self.max_size = Some(max_size);
        self
    }

    pub fn of_size(self, size: usize) -> Self {
        self.of_min_size(size).of_max_size(size)
    }

    /// The default maximum never exceeds the number of distinct element
    /// values when that number is known
    fn effective_max_size(&self, tries: usize) -> usize {
        if let Some(max_size) = self.max_size {
            return max_size;
        }
        let mut max_size = default_max_size(tries);
        if let Some(element) = self.element.exhaustive_with(DEFAULT_COLLECTION_SIZE as u64) {
            max_size = max_size.min(element.max_count() as usize);
        }
        max_size.max(self.min_size)
    }
}

fn to_set<E: Eq + Hash>(values: Vec<E>) -> HashSet<E> {
    values.into_iter().collect()
}

impl<A> Arbitrary for SetArbitrary<A>
where
    A: Arbitrary,
    A::Value: Clone + Eq + Hash,
{
    type Value = HashSet<A::Value>;

    fn generator(&self, tries: usize) -> RandomGenerator<Self::Value> {
        generator::unique_container(
            self.element.generator(tries),
            self.min_size,
            self.effective_max_size(tries),
            to_set,
        )
    }

    fn exhaustive_with(&self, max_count: u64) -> Option<ExhaustiveGenerator<Self::Value>> {
        let element = self.element.exhaustive_with(max_count)?;
        let max_size = self
            .max_size
            .unwrap_or_else(|| DEFAULT_COLLECTION_SIZE.max(self.min_size));
        Some(exhaustive::set(&element, self.min_size, max_size, max_count)?.map(to_set))
    }

    fn edge_cases(&self) -> Vec<Shrinkable<Self::Value>> {
        container_edge_cases(
            self.element.edge_cases(),
            self.min_size,
            self.max_size,
            Rc::new(to_set::<A::Value>),
        )
    }
}

/// A generated single-pass sequence of elements.
///
/// Comparison and debug output look at the elements not yet consumed.
#[derive(Clone)]
pub struct Elements<T>(vec::IntoIter<T>);

impl<T> Iterator for Elements<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<T> ExactSizeIterator for Elements<T> {}

impl<T: PartialEq> PartialEq for Elements<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_slice() == other.0.as_slice()
    }
}

impl<T: fmt::Debug> fmt::Debug for Elements<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.as_slice()).finish()
    }
}

/// Arbitrary for a type known only through its generator functions.
///
/// Useful for ad-hoc arbitraries in tests and for wrapping a hand-built
/// [`RandomGenerator`].
pub struct FromGenerator<T, F> {
    generate: F,
    _marker: PhantomData<T>,
}

/// Build an arbitrary from a function producing its random generator
pub fn from_generator<T, F>(generate: F) -> FromGenerator<T, F>
where
    T: 'static,
    F: Fn(usize) -> RandomGenerator<T>,
{
    FromGenerator {
        generate,
        _marker: PhantomData,
    }
}

impl<T, F> Arbitrary for FromGenerator<T, F>
where
    T: 'static,
    F: Fn(usize) -> RandomGenerator<T>,
{
    type Value = T;

    fn generator(&self, tries: usize) -> RandomGenerator<T> {
        (self.generate)(tries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitraries::{integers, just};
    use crate::error::GenerationError;
    use crate::rng::seeded_rng;

    fn sample<A: Arbitrary>(arbitrary: &A, tries: usize, seed: u64) -> Vec<A::Value> {
        let generator = arbitrary.generator(tries);
        let mut rng = seeded_rng(seed);
        (0..100)
            .map(|_| generator.next(&mut rng).unwrap().value())
            .collect()
    }

    #[test]
    fn test_map() {
        let arbitrary = integers::<i32>().between(1, 10).map(|v| v * 2);
        assert!(sample(&arbitrary, 100, 1).iter().all(|v| v % 2 == 0 && (2..=20).contains(v)));

        let exhaustive: Vec<i32> = arbitrary.exhaustive().unwrap().iter().collect();
        assert_eq!(exhaustive, (1..=10).map(|v| v * 2).collect::<Vec<_>>());
        assert!(arbitrary.edge_cases().iter().any(|e| e.value() == 2));
    }

    #[test]
    fn test_filter() {
        let arbitrary = integers::<u32>().between(0, 20).filter(|v| v % 3 == 0);
        assert!(sample(&arbitrary, 100, 2).iter().all(|v| v % 3 == 0));
        assert!(arbitrary.edge_cases().iter().all(|e| e.value() % 3 == 0));
        assert_eq!(arbitrary.exhaustive().unwrap().iter().count(), 7);
    }

    #[test]
    fn test_list_sizes_scale_with_tries() {
        let small = integers::<u8>().list();
        assert!(sample(&small, 100, 3).iter().all(|v| v.len() <= 10));

        let large = integers::<u8>().list();
        assert!(sample(&large, 1_000_000, 3).iter().any(|v| v.len() > 10));

        let bounded = integers::<u8>().list().of_min_size(2).of_max_size(4);
        assert!(sample(&bounded, 100, 4).iter().all(|v| (2..=4).contains(&v.len())));
    }

    #[test]
    fn test_list_edge_cases() {
        let arbitrary = integers::<i32>().between(-5, 5).list();
        let edge_cases: Vec<Vec<i32>> = arbitrary.edge_cases().iter().map(|e| e.value()).collect();
        assert_eq!(edge_cases[0], Vec::<i32>::new());
        assert!(edge_cases.contains(&vec![0]));
        assert!(edge_cases[1..].iter().all(|e| e.len() == 1));

        let non_empty = integers::<i32>().list().of_min_size(2);
        assert!(non_empty.edge_cases().is_empty());
    }

    #[test]
    fn test_list_exhaustive() {
        let arbitrary = integers::<u8>().between(0, 2).list().of_max_size(2);
        assert_eq!(arbitrary.exhaustive().unwrap().max_count(), 13);
        assert!(integers::<u8>().between(0, 2).list().exhaustive().is_none());
    }

    #[test]
    fn test_set_max_is_narrowed_to_element_cardinality() {
        let arbitrary = integers::<u8>().between(0, 3).set();
        for set in sample(&arbitrary, 10_000, 5) {
            assert!(set.len() <= 4);
            assert!(set.iter().all(|v| *v <= 3));
        }
    }

    #[test]
    fn test_set_with_too_few_distinct_values() {
        let arbitrary = integers::<u8>().between(0, 3).set().of_min_size(5);
        let mut rng = seeded_rng(6);
        assert_eq!(
            arbitrary.generator(100).next(&mut rng).unwrap_err(),
            GenerationError::NotEnoughUniqueElements {
                generated: 4,
                required: 5
            }
        );
    }

    #[test]
    fn test_set_exhaustive() {
        let arbitrary = integers::<u8>().between(1, 3).set();
        let sets: Vec<HashSet<u8>> = arbitrary.exhaustive().unwrap().iter().collect();
        assert_eq!(sets.len(), 8);
        assert!(sets.contains(&HashSet::from([1, 3])));
    }

    #[test]
    fn test_array_iter_and_collect() {
        let array = integers::<i64>().list().of_size(3);
        let array = array.map(Vec::into_boxed_slice);
        assert!(sample(&array, 10, 7).iter().all(|a| a.len() == 3));

        let boxed = integers::<i64>().array().of_size(2);
        assert!(sample(&boxed, 10, 7).iter().all(|a| a.len() == 2));

        let iterators = integers::<i64>().between(0, 9).iter().of_size(4);
        for elements in sample(&iterators, 10, 8) {
            assert_eq!(elements.len(), 4);
            assert!(elements.clone().all(|v| (0..=9).contains(&v)));
        }

        let strings = just('a').collect::<String>().of_size(3);
        assert_eq!(sample(&strings, 10, 9)[0], "aaa");
    }

    #[test]
    fn test_elements() {
        let mut elements = Elements(vec![1, 2, 3].into_iter());
        assert_eq!(format!("{:?}", elements), "[1, 2, 3]");
        assert_eq!(elements.next(), Some(1));
        assert_eq!(elements, Elements(vec![2, 3].into_iter()));
    }

    #[test]
    fn test_flat_map() {
        let arbitrary = integers::<usize>()
            .between(1, 4)
            .flat_map(|size| integers::<u8>().list().of_size(size));
        assert!(sample(&arbitrary, 100, 10).iter().all(|v| (1..=4).contains(&v.len())));

        let exhaustive = integers::<usize>()
            .between(0, 2)
            .flat_map(|n| integers::<u8>().between(0, 1).list().of_size(n));
        // 1 + 2 + 4
        assert_eq!(exhaustive.exhaustive().unwrap().max_count(), 7);
    }

    #[test]
    fn test_zip() {
        let arbitrary = integers::<u8>().between(0, 1).zip(just("x"));
        let pairs: Vec<(u8, &str)> = arbitrary.exhaustive().unwrap().iter().collect();
        assert_eq!(pairs, vec![(0, "x"), (1, "x")]);
        assert!(!arbitrary.edge_cases().is_empty());
    }

    #[test]
    fn test_boxed_and_erased() {
        let boxed: BoxedArbitrary<i32> = integers::<i32>().between(3, 5).boxed();
        assert_eq!(boxed.exhaustive().unwrap().max_count(), 3);

        let erased = integers::<i32>().between(3, 5).erased();
        let first = erased.exhaustive().unwrap().iter().next().unwrap();
        assert_eq!(first.downcast_ref::<i32>(), Some(&3));
    }

    #[test]
    fn test_from_generator() {
        let arbitrary = from_generator(|_| generator::integers(7, 7));
        assert_eq!(sample(&arbitrary, 10, 11), vec![7; 100]);
        assert!(arbitrary.exhaustive().is_none());
    }
}
