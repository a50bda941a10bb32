use std::fmt;

use num_traits::{FromPrimitive, PrimInt, ToPrimitive};
use rand::distributions::uniform::SampleUniform;

use super::{Candidates, Shrink, Shrinkable};
use crate::distance::ShrinkingDistance;

/// Primitive integers up to 64 bits wide.
///
/// Arithmetic for shrinking happens in `i128`, which holds the difference
/// between any two values of these types.
pub trait Integral:
    PrimInt + ToPrimitive + FromPrimitive + SampleUniform + fmt::Debug + fmt::Display + 'static
{
}

impl<T> Integral for T where
    T: PrimInt + ToPrimitive + FromPrimitive + SampleUniform + fmt::Debug + fmt::Display + 'static
{
}

/// Candidates moving `value` towards `target`.
///
/// The target itself comes first, followed by values that halve the
/// remaining gap ever less aggressively, ending one step from `value`.
pub fn shrink_towards(value: i128, target: i128) -> Vec<i128> {
    if value == target {
        return Vec::new();
    }
    let gap = (value - target).abs();
    let direction = (value - target).signum();

    let mut candidates = vec![target];
    let mut step = gap / 2;
    while step > 0 {
        let candidate = value - direction * step;
        if candidates.last() != Some(&candidate) {
            candidates.push(candidate);
        }
        step /= 2;
    }
    candidates
}

/// An integer in `[min, max]`, shrinking towards the value of that range
/// closest to zero.
#[derive(Debug, Clone)]
pub struct IntegralShrinkable<T> {
    value: T,
    min: T,
    max: T,
}

impl<T: Integral> IntegralShrinkable<T> {
    pub fn new(value: T, min: T, max: T) -> Self {
        Self { value, min, max }
    }

    /// The value of the range closest to zero
    pub fn target(&self) -> T {
        if self.min > T::zero() {
            self.min
        } else if self.max < T::zero() {
            self.max
        } else {
            T::zero()
        }
    }

    fn wide(value: T) -> i128 {
        value.to_i128().unwrap_or_default()
    }
}

impl<T: Integral> Shrink<T> for IntegralShrinkable<T> {
    fn value(&self) -> T {
        self.value
    }

    fn distance(&self) -> ShrinkingDistance {
        let gap = (Self::wide(self.value) - Self::wide(self.target())).unsigned_abs();
        ShrinkingDistance::of(u64::try_from(gap).unwrap_or(u64::MAX))
    }

    fn shrink(&self) -> Candidates<T> {
        let (min, max) = (self.min, self.max);
        let candidates = shrink_towards(Self::wide(self.value), Self::wide(self.target()));
        Box::new(
            candidates
                .into_iter()
                .filter_map(T::from_i128)
                .map(move |value| Shrinkable::new(IntegralShrinkable::new(value, min, max))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::assert_strictly_decreasing;
    use super::*;

    #[test]
    fn test_shrink_towards_halves_the_gap() {
        assert_eq!(shrink_towards(100, 0), vec![0, 50, 75, 88, 94, 97, 99]);
        assert_eq!(shrink_towards(100, 3), vec![3, 52, 76, 88, 94, 97, 99]);
        assert_eq!(shrink_towards(-10, 0), vec![0, -5, -8, -9]);
        assert_eq!(shrink_towards(1, 0), vec![0]);
        assert!(shrink_towards(7, 7).is_empty());
    }

    #[test]
    fn test_target_is_closest_to_zero() {
        assert_eq!(IntegralShrinkable::new(50, 1, 100).target(), 1);
        assert_eq!(IntegralShrinkable::new(-50, -100, -10).target(), -10);
        assert_eq!(IntegralShrinkable::new(5, -100, 100).target(), 0);
        assert_eq!(IntegralShrinkable::new(5u8, 0, 255).target(), 0);
    }

    #[test]
    fn test_candidates_stay_in_range() {
        let shrinkable = Shrinkable::new(IntegralShrinkable::new(50, 7, 100));
        let candidates: Vec<i32> = shrinkable.shrink().map(|c| c.value()).collect();
        assert_eq!(candidates.first(), Some(&7));
        assert!(candidates.iter().all(|v| (7..50).contains(v)));
    }

    #[test]
    fn test_distance() {
        let shrinkable = Shrinkable::new(IntegralShrinkable::new(-30i64, -100, 100));
        assert_eq!(shrinkable.distance(), ShrinkingDistance::of(30));

        let extreme = Shrinkable::new(IntegralShrinkable::new(i64::MIN, i64::MIN, i64::MAX));
        assert_eq!(extreme.distance(), ShrinkingDistance::of(1u64 << 63));

        let unsigned = Shrinkable::new(IntegralShrinkable::new(u64::MAX, 0, u64::MAX));
        assert_eq!(unsigned.distance(), ShrinkingDistance::of(u64::MAX));
    }

    #[test]
    fn test_strict_decrease() {
        assert_strictly_decreasing(&Shrinkable::new(IntegralShrinkable::new(1000, -5000, 5000)), 3);
        assert_strictly_decreasing(&Shrinkable::new(IntegralShrinkable::new(-77i8, i8::MIN, i8::MAX)), 3);
        assert_strictly_decreasing(&Shrinkable::new(IntegralShrinkable::new(u64::MAX, 0, u64::MAX)), 2);
    }

    #[test]
    fn test_repeated_shrinking_reaches_target() {
        let mut current = Shrinkable::new(IntegralShrinkable::new(999u32, 3, 1000));
        let mut steps = 0;
        while let Some(last) = current.shrink().last() {
            current = last;
            steps += 1;
        }
        assert_eq!(current.value(), 3);
        assert_eq!(steps, 996);
    }
}
