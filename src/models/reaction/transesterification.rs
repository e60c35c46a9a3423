//! Transesterification of triglycerides with methanol.
//!
//! Computes volumetric species sources and reaction heat for a flow solver,
//! given the temperature, density, and mass fractions of a cell.
//! Two mechanisms are built in:
//!
//! - [`Mechanism::three_step`]: reversible `TG ⇄ DG ⇄ MG ⇄ GL` chain with one
//!   FAME released and one methanol consumed per step.
//! - [`Mechanism::single_step`]: irreversible `TG + 3 MeOH → 3 FAME + GL`.
//!
//! Any other mass-action mechanism can be described with a [`MechanismConfig`].
//!
//! [`TransesterificationModel`] is the [`twine_core::Model`] adapter; the
//! [`Kinetics`] engine behind it exposes per-equation entry points for
//! solvers that request one species at a time.

pub(crate) mod core;

use std::marker::PhantomData;

use twine_core::Model;

pub use self::core::{
    Arrhenius, BatchReactor, BatchTrajectory, CellState, ConcentrationBasis, DerivativeStrategy,
    EquilibriumConfig, EquilibriumError, EvaluationOptions, GAS_CONSTANT, HeatSourceMode,
    InitialComposition, Kinetics, KineticsConfig, KineticsError, Mechanism, MechanismConfig,
    NegativeConcentrationPolicy, NetRates, RateConstants, RateLaw, RateLawConfig, Reaction,
    ReactionConfig, SourceTerms, Species, SpeciesConfig, SpeciesId, SpeciesSource,
    StepEquilibrium, StoichiometricMatrix, TimeBasis, equilibrium_extent, names,
};

/// Cell source terms as a [`Model`].
///
/// The input is a [`CellState`] whose mass-fraction storage is `Y`
/// (an owned `Vec<f64>` by default), and the output is the [`SourceTerms`]
/// of every species plus the heat source.
///
/// # Example
///
/// ```
/// use twine_core::Model;
/// use twine_transesterification::{
///     models::reaction::transesterification::{
///         EvaluationOptions, Kinetics, Mechanism, TransesterificationModel,
///     },
///     support::thermo::{MassFractions, State},
/// };
/// use uom::si::{
///     f64::{MassDensity, ThermodynamicTemperature},
///     mass_density::kilogram_per_cubic_meter,
///     thermodynamic_temperature::kelvin,
/// };
///
/// let kinetics = Kinetics::new(Mechanism::single_step(), EvaluationOptions::default()).unwrap();
/// let model = TransesterificationModel::new(kinetics);
///
/// let cell = State::new(
///     ThermodynamicTemperature::new::<kelvin>(333.0),
///     MassDensity::new::<kilogram_per_cubic_meter>(880.0),
///     MassFractions::new(vec![0.5, 0.45, 0.0, 0.05]),
/// );
/// let terms = model.call(&cell).unwrap();
/// assert!(terms.species[2].rate.value > 0.0); // FAME
/// ```
#[derive(Debug, Clone)]
pub struct TransesterificationModel<Y = Vec<f64>> {
    kinetics: Kinetics,
    _mixture: PhantomData<fn(Y)>,
}

impl<Y> TransesterificationModel<Y> {
    /// Wraps a kinetics engine.
    #[must_use]
    pub fn new(kinetics: Kinetics) -> Self {
        Self {
            kinetics,
            _mixture: PhantomData,
        }
    }

    /// Builds the engine from a configuration and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`KineticsError::Configuration`] if the configuration is invalid.
    pub fn from_config(config: &KineticsConfig) -> Result<Self, KineticsError> {
        Kinetics::from_config(config).map(Self::new)
    }

    #[must_use]
    pub fn kinetics(&self) -> &Kinetics {
        &self.kinetics
    }
}

impl<Y: AsRef<[f64]>> Model for TransesterificationModel<Y> {
    type Input = CellState<Y>;
    type Output = SourceTerms;
    type Error = KineticsError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.kinetics.source_terms(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        f64::{MassDensity, ThermodynamicTemperature},
        mass_density::kilogram_per_cubic_meter,
        thermodynamic_temperature::kelvin,
    };

    use crate::support::thermo::{MassFractions, State};

    #[test]
    fn model_delegates_to_the_engine() {
        let kinetics = Kinetics::new(Mechanism::three_step(), EvaluationOptions::default()).unwrap();
        let model: TransesterificationModel<[f64; 6]> = TransesterificationModel::new(kinetics);

        let cell = State::new(
            ThermodynamicTemperature::new::<kelvin>(335.0),
            MassDensity::new::<kilogram_per_cubic_meter>(895.0),
            MassFractions::new([0.6, 0.2, 0.1, 0.02, 0.07, 0.01]),
        );
        let from_model = model.call(&cell).unwrap();
        let from_engine = model.kinetics().source_terms(&cell).unwrap();
        assert_eq!(from_model, from_engine);
        assert_relative_eq!(from_model.net_mass_rate().value, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn model_surfaces_domain_errors() {
        let config = KineticsConfig {
            mechanism: MechanismConfig::single_step(),
            options: EvaluationOptions {
                negative_concentrations: NegativeConcentrationPolicy::Reject,
                ..EvaluationOptions::default()
            },
        };
        let model: TransesterificationModel = TransesterificationModel::from_config(&config).unwrap();

        let overshoot = State::new(
            ThermodynamicTemperature::new::<kelvin>(333.0),
            MassDensity::new::<kilogram_per_cubic_meter>(880.0),
            MassFractions::new(vec![0.5, 0.5, -1e-9, 0.0]),
        );
        assert!(matches!(
            model.call(&overshoot),
            Err(KineticsError::Domain { .. })
        ));
    }
}
