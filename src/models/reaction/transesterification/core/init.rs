//! Initial composition of a reactor zone.

use log::info;

use crate::support::{constraint::UnitInterval, thermo::MassFractions};

use super::{KineticsError, Mechanism};

/// Allowed deviation of the initial mass fractions from a unit sum.
const SUM_TOLERANCE: f64 = 1e-6;

/// Validated initial mass fractions, in species-table order.
///
/// # Example
///
/// ```
/// use twine_transesterification::models::reaction::transesterification::{
///     InitialComposition, Mechanism,
/// };
///
/// let mechanism = Mechanism::single_step();
/// let feed = InitialComposition::new(&mechanism, &[("TG", 0.5), ("MeOH", 0.45), ("GL", 0.05)])
///     .unwrap();
///
/// let mut cells = vec![vec![0.0; 4]; 3];
/// assert_eq!(feed.seed(&mut cells).unwrap(), 3);
/// assert_eq!(cells[2], [0.5, 0.45, 0.0, 0.05]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InitialComposition {
    mass_fractions: Vec<f64>,
}

impl InitialComposition {
    /// Creates an initial composition from `(species name, mass fraction)` pairs.
    ///
    /// Species that are not listed start at zero.
    ///
    /// # Errors
    ///
    /// Returns [`KineticsError::Configuration`] if a name is unknown or
    /// repeated, a fraction lies outside `[0, 1]`, or the fractions do not sum
    /// to one within `1e-6`.
    pub fn new<S: AsRef<str>>(
        mechanism: &Mechanism,
        fractions: &[(S, f64)],
    ) -> Result<Self, KineticsError> {
        let mut mass_fractions = vec![0.0; mechanism.species().len()];
        let mut seen = vec![false; mass_fractions.len()];

        for (name, y) in fractions {
            let name = name.as_ref();
            let id = mechanism
                .species_id(name)
                .map_err(|err| KineticsError::configuration(format!("initial composition: {err}")))?;
            if std::mem::replace(&mut seen[id.index()], true) {
                return Err(KineticsError::configuration(format!(
                    "initial composition lists {name:?} more than once"
                )));
            }
            mass_fractions[id.index()] = UnitInterval::new(*y)
                .map_err(|err| {
                    KineticsError::configuration(format!(
                        "initial mass fraction of {name:?} ({y}): {err}"
                    ))
                })?
                .into_inner();
        }

        let total: f64 = mass_fractions.iter().sum();
        if (total - 1.0).abs() > SUM_TOLERANCE {
            return Err(KineticsError::configuration(format!(
                "initial mass fractions sum to {total}, expected 1"
            )));
        }

        Ok(Self { mass_fractions })
    }

    #[must_use]
    pub fn mass_fractions(&self) -> MassFractions<&[f64]> {
        MassFractions::new(self.mass_fractions.as_slice())
    }

    /// Writes the composition into every cell of a zone and returns the cell count.
    ///
    /// # Errors
    ///
    /// Returns [`KineticsError::Configuration`] if a cell's storage does not
    /// hold exactly one value per species; cells before it have been written.
    pub fn seed<C: AsMut<[f64]>>(&self, cells: &mut [C]) -> Result<usize, KineticsError> {
        for (i, cell) in cells.iter_mut().enumerate() {
            let cell = cell.as_mut();
            if cell.len() != self.mass_fractions.len() {
                return Err(KineticsError::configuration(format!(
                    "cell {i} has {} mass fractions, expected {}",
                    cell.len(),
                    self.mass_fractions.len()
                )));
            }
            cell.copy_from_slice(&self.mass_fractions);
        }
        info!("seeded initial composition into {} cells", cells.len());
        Ok(cells.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn unlisted_species_start_at_zero() {
        let mechanism = Mechanism::three_step();
        let feed = InitialComposition::new(&mechanism, &[("TG", 0.75), ("MeOH", 0.25)]).unwrap();
        assert_eq!(feed.mass_fractions().as_slice(), &[0.75, 0.25, 0.0, 0.0, 0.0, 0.0]);
        assert_relative_eq!(feed.mass_fractions().total(), 1.0);
    }

    #[test]
    fn tolerates_rounding_in_the_sum() {
        let mechanism = Mechanism::three_step();
        let feed = [("TG", 0.333_333_3), ("MeOH", 0.333_333_3), ("FAME", 0.333_333_3)];
        assert!(InitialComposition::new(&mechanism, &feed).is_ok());
    }

    #[test]
    fn rejects_invalid_compositions() {
        let mechanism = Mechanism::three_step();
        let cases: [&[(&str, f64)]; 5] = [
            &[("TG", 0.7), ("MeOH", 0.25)],
            &[("TG", 1.2), ("MeOH", -0.2)],
            &[("TG", 0.5), ("TG", 0.5)],
            &[("Water", 0.5), ("TG", 0.5)],
            &[("TG", f64::NAN), ("MeOH", 1.0)],
        ];
        for fractions in cases {
            assert!(matches!(
                InitialComposition::new(&mechanism, fractions),
                Err(KineticsError::Configuration { .. })
            ));
        }
    }

    #[test]
    fn seeds_every_cell_of_a_zone() {
        let mechanism = Mechanism::single_step();
        let feed =
            InitialComposition::new(&mechanism, &[("TG", 0.5), ("MeOH", 0.45), ("GL", 0.05)])
                .unwrap();

        let mut zone = vec![[0.1, 0.2, 0.3, 0.4]; 5];
        assert_eq!(feed.seed(&mut zone).unwrap(), 5);
        assert!(zone.iter().all(|cell| cell == &[0.5, 0.45, 0.0, 0.05]));
    }

    #[test]
    fn seed_rejects_mismatched_cells() {
        let mechanism = Mechanism::single_step();
        let feed = InitialComposition::new(&mechanism, &[("TG", 1.0)]).unwrap();
        let mut zone = vec![vec![0.0; 4], vec![0.0; 6]];
        assert!(matches!(
            feed.seed(&mut zone),
            Err(KineticsError::Configuration { .. })
        ));
    }
}
