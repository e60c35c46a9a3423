use super::SpeciesId;

/// Signed stoichiometric coefficients, one row per reaction and one column per species.
///
/// Reactants are negative, products positive, and a species that does not
/// take part in a reaction has a zero coefficient.
/// Every species source term is derived from this matrix,
/// so no per-species formula is ever written by hand.
#[derive(Debug, Clone, PartialEq)]
pub struct StoichiometricMatrix {
    reactions: usize,
    species: usize,
    coefficients: Vec<f64>,
}

impl StoichiometricMatrix {
    pub(crate) fn zeros(reactions: usize, species: usize) -> Self {
        Self {
            reactions,
            species,
            coefficients: vec![0.0; reactions * species],
        }
    }

    pub(crate) fn set(&mut self, reaction: usize, species: SpeciesId, nu: f64) {
        self.coefficients[reaction * self.species + species.index()] = nu;
    }

    /// Number of reactions (rows).
    #[must_use]
    pub fn reactions(&self) -> usize {
        self.reactions
    }

    /// Number of species (columns).
    #[must_use]
    pub fn species(&self) -> usize {
        self.species
    }

    /// Returns `ν` of a species in a reaction.
    ///
    /// # Panics
    ///
    /// Panics if the reaction or species is outside the matrix.
    #[must_use]
    pub fn coefficient(&self, reaction: usize, species: SpeciesId) -> f64 {
        assert!(species.index() < self.species, "species outside the matrix");
        self.row(reaction)[species.index()]
    }

    /// Returns the coefficients of one reaction, in species-table order.
    ///
    /// # Panics
    ///
    /// Panics if the reaction is outside the matrix.
    #[must_use]
    pub fn row(&self, reaction: usize) -> &[f64] {
        let start = reaction * self.species;
        &self.coefficients[start..start + self.species]
    }

    /// Returns the coefficients of one species across all reactions.
    pub fn column(&self, species: SpeciesId) -> impl Iterator<Item = f64> + '_ {
        self.coefficients
            .iter()
            .skip(species.index())
            .step_by(self.species)
            .copied()
    }

    /// Returns `Σⱼ νᵢⱼ·rⱼ` for one species.
    #[must_use]
    pub fn production(&self, species: SpeciesId, rates: &[f64]) -> f64 {
        self.column(species).zip(rates).map(|(nu, r)| nu * r).sum()
    }

    /// Returns `Σⱼ νᵢⱼ·rⱼ` for every species, in species-table order.
    #[must_use]
    pub fn production_all(&self, rates: &[f64]) -> Vec<f64> {
        let mut production = vec![0.0; self.species];
        for (row, &r) in self.coefficients.chunks_exact(self.species).zip(rates) {
            for (p, nu) in production.iter_mut().zip(row) {
                *p += nu * r;
            }
        }
        production
    }

    /// Returns `Σᵢ νᵢⱼ·MWᵢ` for one reaction, zero when the reaction conserves mass.
    #[must_use]
    pub fn mass_imbalance(&self, reaction: usize, molar_masses: &[f64]) -> f64 {
        self.row(reaction)
            .iter()
            .zip(molar_masses)
            .map(|(nu, mw)| nu * mw)
            .sum()
    }

    /// Returns the reactant mass consumed per unit extent of one reaction.
    #[must_use]
    pub fn mass_throughput(&self, reaction: usize, molar_masses: &[f64]) -> f64 {
        self.row(reaction)
            .iter()
            .zip(molar_masses)
            .filter(|&(nu, _)| *nu < 0.0)
            .map(|(nu, mw)| -nu * mw)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::models::reaction::transesterification::core::{Mechanism, Species};

    #[test]
    fn three_step_table() {
        let mechanism = Mechanism::three_step();
        let matrix = mechanism.stoichiometry();

        #[rustfmt::skip]
        let expected = [
            // TG   MeOH   DG    MG   FAME   GL
            [-1.0, -1.0,  1.0,  0.0, 1.0, 0.0],
            [ 0.0, -1.0, -1.0,  1.0, 1.0, 0.0],
            [ 0.0, -1.0,  0.0, -1.0, 1.0, 1.0],
        ];
        assert_eq!(matrix.reactions(), 3);
        assert_eq!(matrix.species(), 6);
        for (j, row) in expected.iter().enumerate() {
            assert_eq!(matrix.row(j), row);
        }

        let meoh = mechanism.species_id("MeOH").unwrap();
        assert_eq!(matrix.column(meoh).collect::<Vec<_>>(), [-1.0, -1.0, -1.0]);
    }

    #[test]
    fn production_matches_per_species_formulas() {
        let mechanism = Mechanism::three_step();
        let matrix = mechanism.stoichiometry();
        let (r1, r2, r3) = (0.3, -0.02, 0.11);
        let rates = [r1, r2, r3];

        let expected = [-r1, -r1 - r2 - r3, r1 - r2, r2 - r3, r1 + r2 + r3, r3];
        let all = matrix.production_all(&rates);
        for (i, want) in expected.into_iter().enumerate() {
            let id = mechanism.species_at(i).unwrap();
            assert_relative_eq!(matrix.production(id, &rates), want, epsilon = 1e-15);
            assert_relative_eq!(all[i], want, epsilon = 1e-15);
        }
    }

    #[test]
    fn produced_mass_is_zero_for_any_rates() {
        let mechanism = Mechanism::three_step();
        let matrix = mechanism.stoichiometry();
        let molar_masses: Vec<f64> = mechanism.species().iter().map(Species::molar_mass_si).collect();

        let values = [-2.5, -1e-3, 0.0, 0.7, 40.0];
        for &r1 in &values {
            for &r2 in &values {
                for &r3 in &values {
                    let production = matrix.production_all(&[r1, r2, r3]);
                    let mass: f64 = production.iter().zip(&molar_masses).map(|(p, mw)| p * mw).sum();
                    let scale = r1.abs() + r2.abs() + r3.abs() + 1.0;
                    assert_relative_eq!(mass / scale, 0.0, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn throughput_counts_reactants_only() {
        let mechanism = Mechanism::single_step();
        let molar_masses: Vec<f64> = mechanism.species().iter().map(Species::molar_mass_si).collect();
        let throughput = mechanism.stoichiometry().mass_throughput(0, &molar_masses);
        assert_relative_eq!(throughput, 0.885_43 + 3.0 * 0.032_04, max_relative = 1e-12);
    }
}
