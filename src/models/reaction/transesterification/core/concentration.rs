//! Mass fraction to molar concentration conversion.

use log::trace;
use serde::{Deserialize, Serialize};
use uom::si::{f64::MassDensity, mass_density::kilogram_per_cubic_meter};

use crate::support::constraint::StrictlyPositive;

use super::{KineticsError, Mechanism, Species};

/// How negative mass fractions from solver overshoot are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeConcentrationPolicy {
    /// Evaluate negative concentrations as zero.
    #[default]
    Clamp,
    /// Use negative concentrations as they are.
    Propagate,
    /// Fail with [`KineticsError::Domain`].
    Reject,
}

/// Molar concentrations of one cell, in the mechanism's concentration basis.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Concentrations {
    values: Vec<f64>,
    clamped: Vec<bool>,
}

impl Concentrations {
    /// Computes `Cᵢ = ρ·Yᵢ/MWᵢ/B` for every species.
    ///
    /// # Errors
    ///
    /// Fails if the mass fraction count differs from the species count, if the
    /// density is not strictly positive, if a mass fraction is not finite, or
    /// if a mass fraction is negative under [`NegativeConcentrationPolicy::Reject`].
    pub(crate) fn from_mass_fractions(
        mechanism: &Mechanism,
        density: MassDensity,
        mass_fractions: &[f64],
        policy: NegativeConcentrationPolicy,
    ) -> Result<Self, KineticsError> {
        let species = mechanism.species();
        if mass_fractions.len() != species.len() {
            return Err(KineticsError::configuration(format!(
                "expected {} mass fractions, got {}",
                species.len(),
                mass_fractions.len()
            )));
        }

        let rho = density.get::<kilogram_per_cubic_meter>();
        let rho = StrictlyPositive::new(rho)
            .map_err(|err| KineticsError::domain(format!("density {rho} kg/m³: {err}")))?
            .into_inner();
        let basis = mechanism.concentration_basis().mole_per_cubic_meter();

        let mut values = Vec::with_capacity(species.len());
        let mut clamped = vec![false; species.len()];
        for (i, (s, &y)) in species.iter().zip(mass_fractions).enumerate() {
            values.push(concentration(s, y, rho, basis, policy, &mut clamped[i])?);
        }
        Ok(Self { values, clamped })
    }

    /// Concentration values in basis units, in species-table order.
    pub(crate) fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns `true` if the concentration of a species was clamped to zero.
    pub(crate) fn is_clamped(&self, index: usize) -> bool {
        self.clamped[index]
    }
}

fn concentration(
    species: &Species,
    y: f64,
    rho: f64,
    basis: f64,
    policy: NegativeConcentrationPolicy,
    clamped: &mut bool,
) -> Result<f64, KineticsError> {
    if !y.is_finite() {
        return Err(KineticsError::domain(format!(
            "mass fraction of {} is {y}",
            species.name()
        )));
    }
    let c = rho * y / species.molar_mass_si() / basis;
    if y >= 0.0 {
        return Ok(c);
    }
    match policy {
        NegativeConcentrationPolicy::Clamp => {
            trace!("clamping mass fraction of {} ({y:e}) to zero", species.name());
            *clamped = true;
            Ok(0.0)
        }
        NegativeConcentrationPolicy::Propagate => Ok(c),
        NegativeConcentrationPolicy::Reject => Err(KineticsError::domain(format!(
            "mass fraction of {} is negative ({y:e})",
            species.name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn kg_per_m3(rho: f64) -> MassDensity {
        MassDensity::new::<kilogram_per_cubic_meter>(rho)
    }

    #[test]
    fn mole_per_liter_basis() {
        let mechanism = Mechanism::three_step();
        let c = Concentrations::from_mass_fractions(
            &mechanism,
            kg_per_m3(900.0),
            &[0.75, 0.25, 0.0, 0.0, 0.0, 0.0],
            NegativeConcentrationPolicy::Clamp,
        )
        .unwrap();

        assert_relative_eq!(c.values()[0], 900.0 * 0.75 / 0.885_43 / 1000.0, max_relative = 1e-14);
        assert_relative_eq!(c.values()[1], 900.0 * 0.25 / 0.032_04 / 1000.0, max_relative = 1e-14);
        assert!(c.values()[2..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn mole_per_cubic_meter_basis() {
        let mechanism = Mechanism::single_step();
        let c = Concentrations::from_mass_fractions(
            &mechanism,
            kg_per_m3(880.0),
            &[0.8, 0.2, 0.0, 0.0],
            NegativeConcentrationPolicy::Clamp,
        )
        .unwrap();
        assert_relative_eq!(c.values()[1], 880.0 * 0.2 / 0.032_04, max_relative = 1e-14);
    }

    #[test]
    fn negative_fractions_follow_policy() {
        let mechanism = Mechanism::three_step();
        let y = [0.75, 0.25, -1e-6, 0.0, 0.0, 0.0];
        let rho = kg_per_m3(900.0);

        let clamp =
            Concentrations::from_mass_fractions(&mechanism, rho, &y, NegativeConcentrationPolicy::Clamp)
                .unwrap();
        assert_eq!(clamp.values()[2], 0.0);
        assert!(clamp.is_clamped(2));
        assert!(!clamp.is_clamped(0));

        let propagate = Concentrations::from_mass_fractions(
            &mechanism,
            rho,
            &y,
            NegativeConcentrationPolicy::Propagate,
        )
        .unwrap();
        assert!(propagate.values()[2] < 0.0);
        assert!(!propagate.is_clamped(2));

        let reject =
            Concentrations::from_mass_fractions(&mechanism, rho, &y, NegativeConcentrationPolicy::Reject);
        assert!(matches!(reject, Err(KineticsError::Domain { .. })));
    }

    #[test]
    fn rejects_wrong_length_and_bad_density() {
        let mechanism = Mechanism::three_step();
        let policy = NegativeConcentrationPolicy::Clamp;

        let short = Concentrations::from_mass_fractions(&mechanism, kg_per_m3(900.0), &[1.0], policy);
        assert!(matches!(short, Err(KineticsError::Configuration { .. })));

        let y = [0.75, 0.25, 0.0, 0.0, 0.0, 0.0];
        for rho in [0.0, -1.0, f64::NAN] {
            let result = Concentrations::from_mass_fractions(&mechanism, kg_per_m3(rho), &y, policy);
            assert!(matches!(result, Err(KineticsError::Domain { .. })));
        }
    }

    #[test]
    fn rejects_non_finite_fractions() {
        let mechanism = Mechanism::three_step();
        let y = [f64::NAN, 0.25, 0.0, 0.0, 0.0, 0.0];
        let result = Concentrations::from_mass_fractions(
            &mechanism,
            kg_per_m3(900.0),
            &y,
            NegativeConcentrationPolicy::Clamp,
        );
        assert!(matches!(result, Err(KineticsError::Domain { .. })));
    }

    #[test]
    fn policy_uses_snake_case() {
        let policy: NegativeConcentrationPolicy = serde_json::from_str(r#""propagate""#).unwrap();
        assert_eq!(policy, NegativeConcentrationPolicy::Propagate);
    }
}
