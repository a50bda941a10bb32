//! Entry points for the built-in arbitraries.

use std::rc::Rc;

use crate::arbitrary::Arbitrary;
use crate::config::DEFAULT_COLLECTION_SIZE;
use crate::error::GenerationError;
use crate::exhaustive::{self, ExhaustiveGenerator};
use crate::generator::{self, RandomGenerator, default_max_size};
use crate::shrinkable::{ContainerShrinkable, Integral, IntegralShrinkable, Shrinkable};

/// Integers of type `T`, the full range unless restricted
pub fn integers<T: Integral>() -> IntegralArbitrary<T> {
    IntegralArbitrary {
        min: T::min_value(),
        max: T::max_value(),
    }
}

/// Characters, any Unicode scalar value unless restricted
pub fn chars() -> CharArbitrary {
    CharArbitrary {
        min: '\0',
        max: char::MAX,
    }
}

/// Strings of printable ASCII characters unless configured otherwise
pub fn strings() -> StringArbitrary {
    StringArbitrary {
        chars: chars().ascii(),
        min_length: 0,
        max_length: None,
    }
}

pub fn booleans() -> Choice<bool> {
    of(vec![false, true])
}

/// Always the same value, which cannot shrink
pub fn just<T: Clone + 'static>(value: T) -> Just<T> {
    Just { value }
}

/// One of the given values, shrinking towards the first
pub fn of<T: Clone + 'static>(values: Vec<T>) -> Choice<T> {
    Choice {
        values: Rc::from(values),
    }
}

#[derive(Debug, Clone)]
pub struct IntegralArbitrary<T> {
    min: T,
    max: T,
}

impl<T: Integral> IntegralArbitrary<T> {
    pub fn between(mut self, min: T, max: T) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn greater_or_equal(mut self, min: T) -> Self {
        self.min = min;
        self
    }

    pub fn less_or_equal(mut self, max: T) -> Self {
        self.max = max;
        self
    }

    fn shrinkable(&self, value: T) -> Shrinkable<T> {
        Shrinkable::new(IntegralShrinkable::new(value, self.min, self.max))
    }
}

impl<T: Integral> Arbitrary for IntegralArbitrary<T> {
    type Value = T;

    fn generator(&self, _tries: usize) -> RandomGenerator<T> {
        generator::integers(self.min, self.max)
    }

    fn exhaustive_with(&self, max_count: u64) -> Option<ExhaustiveGenerator<T>> {
        exhaustive::integers(self.min, self.max, max_count)
    }

    /// The bounds, their neighbours and the shrinking target
    fn edge_cases(&self) -> Vec<Shrinkable<T>> {
        let (min, max) = (self.min, self.max);
        if min > max {
            return Vec::new();
        }
        let target = IntegralShrinkable::new(min, min, max).target();
        let candidates = [
            Some(min),
            min.checked_add(&T::one()),
            Some(target),
            max.checked_sub(&T::one()),
            Some(max),
        ];

        let mut values: Vec<T> = Vec::new();
        for value in candidates.into_iter().flatten() {
            if value >= min && value <= max && !values.contains(&value) {
                values.push(value);
            }
        }
        values.into_iter().map(|value| self.shrinkable(value)).collect()
    }
}

/// Characters in an inclusive code point range, shrinking towards the
/// lowest one. Surrogate code points are skipped.
#[derive(Debug, Clone, Copy)]
pub struct CharArbitrary {
    min: char,
    max: char,
}

impl CharArbitrary {
    pub fn with_range(mut self, min: char, max: char) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Printable ASCII, space through tilde
    pub fn ascii(self) -> Self {
        self.with_range(' ', '~')
    }

    fn codes(&self) -> (u32, u32) {
        (u32::from(self.min), u32::from(self.max))
    }

    fn shrinkable(&self, c: char) -> Shrinkable<char> {
        let (min, max) = self.codes();
        Shrinkable::new(IntegralShrinkable::new(u32::from(c), min, max))
            .filter(|code| char::from_u32(*code).is_some())
            .map(to_char)
    }
}

fn to_char(code: u32) -> char {
    char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
}

impl Arbitrary for CharArbitrary {
    type Value = char;

    fn generator(&self, _tries: usize) -> RandomGenerator<char> {
        let (min, max) = self.codes();
        generator::integers(min, max)
            .filter(|code| char::from_u32(*code).is_some())
            .map(to_char)
    }

    fn exhaustive_with(&self, max_count: u64) -> Option<ExhaustiveGenerator<char>> {
        let (min, max) = self.codes();
        Some(
            exhaustive::integers(min, max, max_count)?
                .filter(|code| char::from_u32(*code).is_some())
                .map(to_char),
        )
    }

    fn edge_cases(&self) -> Vec<Shrinkable<char>> {
        if self.min > self.max {
            return Vec::new();
        }
        let mut edge_cases = vec![self.min, self.max];
        if (self.min..=self.max).contains(&' ') {
            edge_cases.insert(1, ' ');
        }
        edge_cases.dedup();
        edge_cases
            .into_iter()
            .map(|c| self.shrinkable(c))
            .collect()
    }
}

/// Strings with a length in `[min_length, max_length]`
#[derive(Debug, Clone, Copy)]
pub struct StringArbitrary {
    chars: CharArbitrary,
    min_length: usize,
    max_length: Option<usize>,
}

impl StringArbitrary {
    pub fn with_char_range(mut self, min: char, max: char) -> Self {
        self.chars = self.chars.with_range(min, max);
        self
    }

    pub fn with_chars(mut self, chars: CharArbitrary) -> Self {
        self.chars = chars;
        self
    }

    pub fn of_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    pub fn of_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn of_length(self, length: usize) -> Self {
        self.of_min_length(length).of_max_length(length)
    }
}

fn to_string(chars: Vec<char>) -> String {
    chars.into_iter().collect()
}

impl Arbitrary for StringArbitrary {
    type Value = String;

    fn generator(&self, tries: usize) -> RandomGenerator<String> {
        let max_length = self
            .max_length
            .unwrap_or_else(|| default_max_size(tries).max(self.min_length));
        generator::container(
            self.chars.generator(tries),
            self.min_length,
            max_length,
            to_string,
        )
    }

    fn exhaustive_with(&self, max_count: u64) -> Option<ExhaustiveGenerator<String>> {
        let max_length = self
            .max_length
            .unwrap_or_else(|| DEFAULT_COLLECTION_SIZE.max(self.min_length));
        let chars = self.chars.exhaustive_with(max_count)?;
        Some(exhaustive::list(&chars, self.min_length, max_length, max_count)?.map(to_string))
    }

    /// The empty string and single-character strings of the character
    /// edge cases, where the length bounds allow
    fn edge_cases(&self) -> Vec<Shrinkable<String>> {
        let min_length = self.min_length;
        let build = |chars: Vec<Shrinkable<char>>| {
            Shrinkable::new(ContainerShrinkable::new(chars, min_length, to_string))
        };

        let mut edge_cases = Vec::new();
        if min_length == 0 {
            edge_cases.push(build(Vec::new()));
        }
        if min_length <= 1 && self.max_length.is_none_or(|max| max >= 1) {
            edge_cases.extend(self.chars.edge_cases().into_iter().map(|c| build(vec![c])));
        }
        edge_cases
    }
}

#[derive(Debug, Clone)]
pub struct Just<T> {
    value: T,
}

impl<T: Clone + 'static> Arbitrary for Just<T> {
    type Value = T;

    fn generator(&self, _tries: usize) -> RandomGenerator<T> {
        let value = self.value.clone();
        RandomGenerator::new(move |_| Ok(Shrinkable::unshrinkable(value.clone())))
    }

    fn exhaustive_with(&self, max_count: u64) -> Option<ExhaustiveGenerator<T>> {
        exhaustive::values(vec![self.value.clone()], max_count)
    }

    fn edge_cases(&self) -> Vec<Shrinkable<T>> {
        vec![Shrinkable::unshrinkable(self.value.clone())]
    }
}

/// A choice among fixed values
#[derive(Debug, Clone)]
pub struct Choice<T> {
    values: Rc<[T]>,
}

impl<T: Clone + 'static> Choice<T> {
    fn shrinkable(&self, index: usize) -> Shrinkable<T> {
        let values = Rc::clone(&self.values);
        Shrinkable::new(IntegralShrinkable::new(index, 0, self.values.len() - 1))
            .map(move |index| values[index].clone())
    }

    /// Fail up front instead of on the first draw
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.values.is_empty() {
            return Err(GenerationError::EmptyChoice);
        }
        Ok(())
    }
}

impl<T: Clone + 'static> Arbitrary for Choice<T> {
    type Value = T;

    fn generator(&self, _tries: usize) -> RandomGenerator<T> {
        generator::choose(self.values.to_vec())
    }

    fn exhaustive_with(&self, max_count: u64) -> Option<ExhaustiveGenerator<T>> {
        exhaustive::values(self.values.to_vec(), max_count)
    }

    /// The first and the last value
    fn edge_cases(&self) -> Vec<Shrinkable<T>> {
        match self.values.len() {
            0 => Vec::new(),
            1 => vec![self.shrinkable(0)],
            len => vec![self.shrinkable(0), self.shrinkable(len - 1)],
        }
    }
}
