/// Species mass fractions of a mixture, in species-table order.
///
/// The storage is generic so a solver can hand over a borrowed slice of its
/// cell data (`MassFractions<&[f64]>`), a fixed array, or an owned vector
/// without copying.
/// No range check is applied: solver overshoot can produce slightly negative
/// values, and the evaluation policy decides how those are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MassFractions<Y>(Y);

impl<Y: AsRef<[f64]>> MassFractions<Y> {
    /// Wraps mass fraction storage.
    #[must_use]
    pub fn new(values: Y) -> Self {
        Self(values)
    }

    /// Returns the mass fractions as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        self.0.as_ref()
    }

    /// Returns the number of species.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns `true` if no species are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Returns the sum of all mass fractions.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.as_slice().iter().sum()
    }

    /// Copies the mass fractions into an owned vector.
    #[must_use]
    pub fn to_vec(&self) -> MassFractions<Vec<f64>> {
        MassFractions(self.as_slice().to_vec())
    }

    /// Consumes the wrapper and returns the storage.
    pub fn into_inner(self) -> Y {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn borrowed_and_owned_storage() {
        let cell = [0.5, 0.45, 0.0, 0.05];
        let borrowed = MassFractions::new(&cell[..]);
        assert_eq!(borrowed.len(), 4);
        assert_relative_eq!(borrowed.total(), 1.0);

        let owned = borrowed.to_vec();
        assert_eq!(owned.as_slice(), &cell);
        assert_eq!(owned.into_inner(), cell.to_vec());
    }
}
