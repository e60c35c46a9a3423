//! Species mass sources and their linearization.

use serde::{Deserialize, Serialize};
use uom::si::{f64::MassDensity, mass_density::kilogram_per_cubic_meter};

use crate::support::units::{
    VolumetricHeatRate, VolumetricMassRate, kilogram_per_cubic_meter_second,
};

use super::{
    Concentrations, KineticsError, NegativeConcentrationPolicy, NetworkState, SpeciesId,
};

/// How the derivative of a species source with respect to its own mass
/// fraction is computed.
///
/// Flow solvers use this derivative to linearize the source term and keep
/// stiff chemistry stable.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivativeStrategy {
    /// Always zero; the solver treats the source explicitly.
    Zero,
    /// Exact mass-action derivative, zero for a clamped concentration.
    #[default]
    Analytic,
    /// Central difference in the mass fraction with step
    /// `max(relative_step·|Y|, relative_step)`.
    ///
    /// A one-sided forward difference is used when the lower point would be
    /// negative, unless the policy is [`NegativeConcentrationPolicy::Propagate`].
    /// A negative mass fraction under `Clamp` has a zero derivative.
    FiniteDifference { relative_step: f64 },
}

/// Source term of one species in one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesSource {
    pub species: SpeciesId,

    /// Net mass production rate, negative when the species is consumed.
    pub rate: VolumetricMassRate,

    /// Derivative of `rate` with respect to the species' own mass fraction.
    pub derivative: VolumetricMassRate,
}

/// Source terms of every species in one cell, plus the reaction heat.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTerms {
    pub species: Vec<SpeciesSource>,
    pub heat: VolumetricHeatRate,
}

impl SourceTerms {
    /// Returns the source of one species, `None` if it is not in the table.
    #[must_use]
    pub fn get(&self, species: SpeciesId) -> Option<&SpeciesSource> {
        self.species.get(species.index())
    }

    /// Sum of all species mass sources; zero up to rounding.
    #[must_use]
    pub fn net_mass_rate(&self) -> VolumetricMassRate {
        self.species
            .iter()
            .fold(kilogram_per_cubic_meter_second(0.0), |sum, s| sum + s.rate)
    }
}

/// Assembles species sources from an evaluated network.
pub(crate) struct SourceAssembler<'n, 'a> {
    pub(crate) network: &'n NetworkState<'a>,
    pub(crate) density: MassDensity,
    pub(crate) mass_fractions: &'n [f64],
    pub(crate) policy: NegativeConcentrationPolicy,
    pub(crate) strategy: DerivativeStrategy,
}

impl SourceAssembler<'_, '_> {
    /// Mass source of one species in kg/(m³·s).
    pub(crate) fn mass_rate(&self, species: SpeciesId) -> Result<f64, KineticsError> {
        mass_rate(self.network, species)
    }

    pub(crate) fn species(&self, species: SpeciesId) -> Result<SpeciesSource, KineticsError> {
        let rate = self.mass_rate(species)?;
        let derivative = match self.strategy {
            DerivativeStrategy::Zero => 0.0,
            DerivativeStrategy::Analytic => self.analytic_derivative(species),
            DerivativeStrategy::FiniteDifference { relative_step } => {
                self.finite_difference(species, relative_step)?
            }
        };
        Ok(SpeciesSource {
            species,
            rate: kilogram_per_cubic_meter_second(rate),
            derivative: kilogram_per_cubic_meter_second(derivative),
        })
    }

    pub(crate) fn all(&self) -> Result<Vec<SpeciesSource>, KineticsError> {
        (0..self.network.mechanism().species().len())
            .map(|i| self.species(self.network.mechanism().species_at(i)?))
            .collect()
    }

    /// `ρ/T_b · Σⱼ νᵢⱼ·∂rⱼ/∂Cᵢ`
    fn analytic_derivative(&self, species: SpeciesId) -> f64 {
        if self.network.concentrations().is_clamped(species.index()) {
            return 0.0;
        }
        let mechanism = self.network.mechanism();
        let slope: f64 = mechanism
            .stoichiometry()
            .column(species)
            .enumerate()
            .filter(|&(_, nu)| nu != 0.0)
            .map(|(j, nu)| nu * self.network.rate_slope(j, species))
            .sum();
        self.density.get::<kilogram_per_cubic_meter>() / mechanism.time_basis().seconds() * slope
    }

    fn finite_difference(&self, species: SpeciesId, relative_step: f64) -> Result<f64, KineticsError> {
        let y = self.mass_fractions[species.index()];
        let bounded = self.policy != NegativeConcentrationPolicy::Propagate;
        if bounded && y < 0.0 {
            return Ok(0.0);
        }
        let h = (relative_step * y.abs()).max(relative_step);

        let lower = if bounded && y - h < 0.0 { y } else { y - h };
        let upper = y + h;

        let at = |value: f64| -> Result<f64, KineticsError> {
            let mut perturbed = self.mass_fractions.to_vec();
            perturbed[species.index()] = value;
            let mechanism = self.network.mechanism();
            let concentrations =
                Concentrations::from_mass_fractions(mechanism, self.density, &perturbed, self.policy)?;
            let network = NetworkState::new(mechanism, self.network.constants().clone(), concentrations);
            mass_rate(&network, species)
        };
        Ok((at(upper)? - at(lower)?) / (upper - lower))
    }
}

fn mass_rate(network: &NetworkState<'_>, species: SpeciesId) -> Result<f64, KineticsError> {
    let mechanism = network.mechanism();
    let molar_mass = mechanism.species_entry(species)?.molar_mass_si();
    let production = mechanism.stoichiometry().production(species, network.rates());
    Ok(production * mechanism.si_rate_factor() * molar_mass)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::models::reaction::transesterification::core::{
        EvaluationOptions, Kinetics, Mechanism,
        test_support::{FEED, cell},
    };

    fn kinetics(strategy: DerivativeStrategy) -> Kinetics {
        Kinetics::new(
            Mechanism::three_step(),
            EvaluationOptions {
                derivative: strategy,
                ..EvaluationOptions::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn analytic_derivative_matches_finite_difference() {
        let state = cell(338.0, 900.0, [0.4, 0.15, 0.12, 0.08, 0.2, 0.05]);
        let analytic = kinetics(DerivativeStrategy::Analytic);
        let numeric = kinetics(DerivativeStrategy::FiniteDifference {
            relative_step: 1e-6,
        });

        for i in 0..6 {
            let a = analytic.equation_source(&state, i).unwrap();
            let n = numeric.equation_source(&state, i).unwrap();
            assert_eq!(a.rate, n.rate);
            assert_relative_eq!(a.derivative.value, n.derivative.value, max_relative = 1e-5);
        }
    }

    #[test]
    fn finite_difference_is_one_sided_at_zero_mass_fraction() {
        let state = cell(333.0, 900.0, FEED);
        let analytic = kinetics(DerivativeStrategy::Analytic);
        let numeric = kinetics(DerivativeStrategy::FiniteDifference {
            relative_step: 1e-6,
        });

        let dg = analytic.equation_source(&state, 2).unwrap();
        assert!(dg.derivative.value < 0.0);

        for i in 2..6 {
            let a = analytic.equation_source(&state, i).unwrap();
            let n = numeric.equation_source(&state, i).unwrap();
            assert_relative_eq!(a.derivative.value, n.derivative.value, max_relative = 1e-5);
        }
    }

    #[test]
    fn clamped_species_have_zero_finite_difference() {
        let state = cell(333.0, 900.0, [0.75, 0.25, -1e-8, 0.0, 0.0, 0.0]);
        let source = kinetics(DerivativeStrategy::FiniteDifference {
            relative_step: 1e-6,
        })
        .equation_source(&state, 2)
        .unwrap();
        assert_eq!(source.derivative.value, 0.0);
    }

    #[test]
    fn consumed_species_have_negative_self_derivative() {
        let state = cell(333.0, 900.0, [0.75, 0.25, 0.0, 0.0, 0.0, 0.0]);
        let kinetics = kinetics(DerivativeStrategy::Analytic);
        let tg = kinetics.equation_source(&state, 0).unwrap();
        let meoh = kinetics.equation_source(&state, 1).unwrap();
        assert!(tg.derivative.value < 0.0);
        assert!(meoh.derivative.value < 0.0);
    }

    #[test]
    fn zero_strategy_reports_zero() {
        let state = cell(333.0, 900.0, [0.75, 0.25, 0.0, 0.0, 0.0, 0.0]);
        let source = kinetics(DerivativeStrategy::Zero)
            .equation_source(&state, 0)
            .unwrap();
        assert!(source.rate.value < 0.0);
        assert_eq!(source.derivative.value, 0.0);
    }

    #[test]
    fn clamped_species_have_zero_analytic_derivative() {
        let state = cell(333.0, 900.0, [0.75, 0.25, -1e-8, 0.0, 0.0, 0.0]);
        let source = kinetics(DerivativeStrategy::Analytic)
            .equation_source(&state, 2)
            .unwrap();
        assert_eq!(source.derivative.value, 0.0);
    }

    #[test]
    fn finite_difference_stays_in_domain_under_reject() {
        let kinetics = Kinetics::new(
            Mechanism::three_step(),
            EvaluationOptions {
                negative_concentrations: NegativeConcentrationPolicy::Reject,
                derivative: DerivativeStrategy::FiniteDifference {
                    relative_step: 1e-6,
                },
                ..EvaluationOptions::default()
            },
        )
        .unwrap();
        let state = cell(333.0, 900.0, [0.75, 0.25, 0.0, 0.0, 0.0, 0.0]);
        let dg = kinetics.equation_source(&state, 2).unwrap();
        assert!(dg.derivative.value.is_finite());
    }

    #[test]
    fn strategy_serializes_with_snake_case_tags() {
        let json = r#"{ "finite_difference": { "relative_step": 1e-7 } }"#;
        let strategy: DerivativeStrategy = serde_json::from_str(json).unwrap();
        assert_eq!(
            strategy,
            DerivativeStrategy::FiniteDifference {
                relative_step: 1e-7
            }
        );
        let analytic: DerivativeStrategy = serde_json::from_str(r#""analytic""#).unwrap();
        assert_eq!(analytic, DerivativeStrategy::Analytic);
    }
}
