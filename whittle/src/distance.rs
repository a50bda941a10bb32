//! Shrinking distance: the magnitude used to order shrink candidates.

use std::cmp::Ordering;
use std::fmt;

/// A non-negative, possibly multi-dimensional magnitude.
///
/// Distances compare lexicographically, treating missing trailing
/// dimensions as zero. Scalars are one-dimensional; containers use
/// `[size, sum of element distances]`.
///
/// Magnitudes are at most `u64::MAX`; dimensions are kept in `u128` so
/// that summing them stays exact.
///
/// Distances only order candidates and bound the search. Two values with
/// the same distance are not considered equal.
#[derive(Debug, Clone, Default)]
pub struct ShrinkingDistance {
    dimensions: Vec<u128>,
}

impl ShrinkingDistance {
    /// The distance of a value that cannot shrink
    pub fn zero() -> Self {
        Self::default()
    }

    /// A one-dimensional distance
    pub fn of(magnitude: u64) -> Self {
        Self {
            dimensions: vec![u128::from(magnitude)],
        }
    }

    /// Build a distance from explicit dimensions
    pub fn from_dimensions(dimensions: Vec<u128>) -> Self {
        Self { dimensions }
    }

    /// The distance of a container: its size first, then its contents
    pub fn for_collection<'a>(
        size: usize,
        elements: impl IntoIterator<Item = &'a ShrinkingDistance>,
    ) -> Self {
        let contents = elements
            .into_iter()
            .fold(Self::zero(), |total, element| total.plus(element));
        Self::of(size as u64).append(&contents)
    }

    /// Component-wise sum
    pub fn plus(&self, other: &ShrinkingDistance) -> Self {
        let len = self.dimensions.len().max(other.dimensions.len());
        let dimensions = (0..len)
            .map(|i| self.dimension(i).saturating_add(other.dimension(i)))
            .collect();
        Self { dimensions }
    }

    /// Concatenate `other`'s dimensions after this one's
    pub fn append(&self, other: &ShrinkingDistance) -> Self {
        let mut dimensions = self.dimensions.clone();
        dimensions.extend_from_slice(&other.dimensions);
        Self { dimensions }
    }

    /// Sum a sequence of distances
    pub fn combine<'a>(distances: impl IntoIterator<Item = &'a ShrinkingDistance>) -> Self {
        distances
            .into_iter()
            .fold(Self::zero(), |total, distance| total.plus(distance))
    }

    pub fn dimensions(&self) -> &[u128] {
        &self.dimensions
    }

    /// True if every dimension is zero
    pub fn is_zero(&self) -> bool {
        self.dimensions.iter().all(|&d| d == 0)
    }

    fn dimension(&self, index: usize) -> u128 {
        self.dimensions.get(index).copied().unwrap_or(0)
    }
}

impl Ord for ShrinkingDistance {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.dimensions.len().max(other.dimensions.len());
        (0..len)
            .map(|i| self.dimension(i).cmp(&other.dimension(i)))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for ShrinkingDistance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ShrinkingDistance {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ShrinkingDistance {}

impl From<u64> for ShrinkingDistance {
    fn from(magnitude: u64) -> Self {
        Self::of(magnitude)
    }
}

impl fmt::Display for ShrinkingDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, dimension) in self.dimensions.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", dimension)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicographic_order_with_padding() {
        assert!(ShrinkingDistance::of(3) < ShrinkingDistance::of(4));
        assert!(
            ShrinkingDistance::from_dimensions(vec![1, 100])
                < ShrinkingDistance::from_dimensions(vec![2, 0])
        );
        assert_eq!(
            ShrinkingDistance::from_dimensions(vec![5, 0]),
            ShrinkingDistance::of(5)
        );
        assert_eq!(ShrinkingDistance::zero(), ShrinkingDistance::of(0));
        assert!(ShrinkingDistance::zero().is_zero());
    }

    #[test]
    fn test_plus_preserves_order() {
        let smaller = ShrinkingDistance::from_dimensions(vec![1, 9]);
        let larger = ShrinkingDistance::from_dimensions(vec![2, 0]);
        let offset = ShrinkingDistance::from_dimensions(vec![7, 3, 1]);

        assert!(smaller.plus(&offset) < larger.plus(&offset));
        assert_eq!(
            smaller.plus(&offset).dimensions(),
            &[8, 12, 1]
        );
    }

    #[test]
    fn test_collection_distance() {
        let elements = [ShrinkingDistance::of(3), ShrinkingDistance::of(4)];
        let distance = ShrinkingDistance::for_collection(2, elements.iter());
        assert_eq!(distance.dimensions(), &[2, 7]);

        let shorter = ShrinkingDistance::for_collection(1, [ShrinkingDistance::of(100)].iter());
        assert!(shorter < distance);
    }

    #[test]
    fn test_plus_of_large_magnitudes_is_exact() {
        let max = ShrinkingDistance::of(u64::MAX);
        let total = max.plus(&max);
        assert_eq!(total.dimensions(), &[2 * u128::from(u64::MAX)]);

        let smaller = ShrinkingDistance::of(u64::MAX - 1).plus(&max);
        assert!(smaller < total);
    }

    #[test]
    fn test_collection_of_large_elements_orders_by_contents() {
        let max = ShrinkingDistance::of(u64::MAX);
        let parent = ShrinkingDistance::for_collection(2, [max.clone(), max.clone()].iter());
        let candidate =
            ShrinkingDistance::for_collection(2, [ShrinkingDistance::zero(), max].iter());
        assert!(candidate < parent);
    }

    #[test]
    fn test_display() {
        let distance = ShrinkingDistance::from_dimensions(vec![2, 7]);
        assert_eq!(distance.to_string(), "[2, 7]");
    }
}
