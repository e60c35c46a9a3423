//! Transesterification kinetics engine.
//!
//! [`Kinetics`] turns the local state of a cell (temperature, density, and
//! species mass fractions) into volumetric species mass sources, their
//! linearization, and the reaction heat source.
//! It holds a validated [`Mechanism`] and [`EvaluationOptions`], keeps no
//! per-cell state, and is `Send + Sync`, so any number of threads can
//! evaluate distinct cells at once.

mod arrhenius;
mod batch;
mod concentration;
mod equilibrium;
mod error;
mod heat;
mod init;
mod mechanism;
mod network;
mod source;
mod stoichiometry;

#[cfg(test)]
mod test_support;

pub use arrhenius::{Arrhenius, GAS_CONSTANT};
pub use batch::{BatchReactor, BatchTrajectory};
pub use concentration::NegativeConcentrationPolicy;
pub use equilibrium::{EquilibriumConfig, EquilibriumError, StepEquilibrium, equilibrium_extent};
pub use error::KineticsError;
pub use heat::HeatSourceMode;
pub use init::InitialComposition;
pub use mechanism::{
    ConcentrationBasis, Mechanism, MechanismConfig, RateLaw, RateLawConfig, Reaction,
    ReactionConfig, Species, SpeciesConfig, SpeciesId, TimeBasis, names,
};
pub use network::{NetRates, RateConstants};
pub use source::{DerivativeStrategy, SourceTerms, SpeciesSource};
pub use stoichiometry::StoichiometricMatrix;

use log::info;
use serde::{Deserialize, Serialize};
use uom::si::f64::MolarConcentration;

use crate::support::{
    constraint::StrictlyPositive,
    thermo::{MassFractions, State},
    units::VolumetricHeatRate,
};

use concentration::Concentrations;
use network::NetworkState;
use source::SourceAssembler;

/// Local state of one cell: temperature, density, and mass fractions in
/// species-table order.
pub type CellState<Y = Vec<f64>> = State<MassFractions<Y>>;

/// Policies applied when evaluating source terms.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvaluationOptions {
    pub negative_concentrations: NegativeConcentrationPolicy,
    pub derivative: DerivativeStrategy,
    pub heat: HeatSourceMode,
}

/// Complete kinetics configuration: a mechanism and its evaluation options.
///
/// # Example
///
/// ```
/// use twine_transesterification::models::reaction::transesterification::{
///     DerivativeStrategy, Kinetics, KineticsConfig, MechanismConfig,
/// };
///
/// let mut config = KineticsConfig::from_json(&format!(
///     r#"{{ "mechanism": {}, "options": {{ "derivative": "zero" }} }}"#,
///     MechanismConfig::single_step().to_json().unwrap(),
/// ))
/// .unwrap();
/// assert_eq!(config.options.derivative, DerivativeStrategy::Zero);
///
/// config.options.derivative = DerivativeStrategy::Analytic;
/// let kinetics = Kinetics::from_config(&config).unwrap();
/// assert_eq!(kinetics.mechanism().species().len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KineticsConfig {
    pub mechanism: MechanismConfig,
    #[serde(default)]
    pub options: EvaluationOptions,
}

impl KineticsConfig {
    /// Parses a kinetics configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`KineticsError::Configuration`] if the text is not a valid configuration.
    pub fn from_json(json: &str) -> Result<Self, KineticsError> {
        serde_json::from_str(json).map_err(|err| {
            KineticsError::configuration(format!(
                "kinetics JSON (line {}, column {}): {err}",
                err.line(),
                err.column()
            ))
        })
    }
}

/// The source-term engine.
///
/// # Example
///
/// ```
/// use twine_transesterification::{
///     models::reaction::transesterification::{CellState, EvaluationOptions, Kinetics, Mechanism},
///     support::thermo::{MassFractions, State},
/// };
/// use uom::si::{
///     f64::{MassDensity, ThermodynamicTemperature},
///     mass_density::kilogram_per_cubic_meter,
///     thermodynamic_temperature::kelvin,
/// };
///
/// let kinetics = Kinetics::new(Mechanism::three_step(), EvaluationOptions::default()).unwrap();
///
/// let cell: CellState<&[f64]> = State::new(
///     ThermodynamicTemperature::new::<kelvin>(333.0),
///     MassDensity::new::<kilogram_per_cubic_meter>(900.0),
///     MassFractions::new(&[0.75, 0.25, 0.0, 0.0, 0.0, 0.0][..]),
/// );
///
/// let terms = kinetics.source_terms(&cell).unwrap();
/// assert!(terms.species[0].rate.value < 0.0); // TG consumed
/// assert!(terms.species[4].rate.value > 0.0); // FAME produced
/// assert!(terms.net_mass_rate().value.abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Kinetics {
    mechanism: Mechanism,
    options: EvaluationOptions,
}

impl Kinetics {
    /// Creates an engine from a validated mechanism.
    ///
    /// # Errors
    ///
    /// Returns [`KineticsError::Configuration`] if the finite-difference step
    /// is not a finite, strictly positive number.
    pub fn new(mechanism: Mechanism, options: EvaluationOptions) -> Result<Self, KineticsError> {
        if let DerivativeStrategy::FiniteDifference { relative_step } = options.derivative {
            if !relative_step.is_finite() {
                return Err(KineticsError::configuration(format!(
                    "finite-difference step must be finite, got {relative_step}"
                )));
            }
            StrictlyPositive::new(relative_step).map_err(|err| {
                KineticsError::configuration(format!("finite-difference step {relative_step}: {err}"))
            })?;
        }

        info!(
            "kinetics ready: {} species, {} reactions, {:?} concentrations, {:?} time basis, {:?}",
            mechanism.species().len(),
            mechanism.reactions().len(),
            mechanism.concentration_basis(),
            mechanism.time_basis(),
            options,
        );
        Ok(Self { mechanism, options })
    }

    /// Validates a configuration and creates an engine from it.
    ///
    /// # Errors
    ///
    /// Returns [`KineticsError::Configuration`] if the mechanism or options are invalid.
    pub fn from_config(config: &KineticsConfig) -> Result<Self, KineticsError> {
        Self::new(Mechanism::from_config(&config.mechanism)?, config.options)
    }

    #[must_use]
    pub fn mechanism(&self) -> &Mechanism {
        &self.mechanism
    }

    #[must_use]
    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    /// Rate constants of every reaction at the cell temperature.
    ///
    /// # Errors
    ///
    /// Returns [`KineticsError::Domain`] if the temperature is not strictly positive.
    pub fn rate_constants<Y: AsRef<[f64]>>(
        &self,
        state: &CellState<Y>,
    ) -> Result<RateConstants, KineticsError> {
        RateConstants::evaluate(&self.mechanism, state.temperature)
    }

    /// Molar concentrations of every species, after the negative-concentration policy.
    ///
    /// # Errors
    ///
    /// Returns a [`KineticsError`] if the mass fractions or density are invalid.
    pub fn concentrations<Y: AsRef<[f64]>>(
        &self,
        state: &CellState<Y>,
    ) -> Result<Vec<MolarConcentration>, KineticsError> {
        let basis = self.mechanism.concentration_basis();
        let concentrations = self.cell_concentrations(state)?;
        Ok(concentrations
            .values()
            .iter()
            .map(|&c| basis.concentration(c))
            .collect())
    }

    /// Net rate of every reaction.
    ///
    /// # Errors
    ///
    /// Returns a [`KineticsError`] if the cell state is invalid.
    pub fn net_rates<Y: AsRef<[f64]>>(&self, state: &CellState<Y>) -> Result<NetRates, KineticsError> {
        Ok(self.network(state)?.into_rates())
    }

    /// Source term of one species.
    ///
    /// # Errors
    ///
    /// Returns [`KineticsError::UnknownSpecies`] if the id is outside the
    /// species table, or another [`KineticsError`] if the cell state is invalid.
    pub fn species_source<Y: AsRef<[f64]>>(
        &self,
        state: &CellState<Y>,
        species: SpeciesId,
    ) -> Result<SpeciesSource, KineticsError> {
        self.mechanism.species_entry(species)?;
        let network = self.network(state)?;
        self.assembler(&network, state).species(species)
    }

    /// Source term of the solver's species equation `index`.
    ///
    /// This is the per-(cell, equation) entry point a flow solver calls.
    ///
    /// # Errors
    ///
    /// Returns [`KineticsError::UnknownSpecies`] if `index` is outside the
    /// species table, or another [`KineticsError`] if the cell state is invalid.
    pub fn equation_source<Y: AsRef<[f64]>>(
        &self,
        state: &CellState<Y>,
        index: usize,
    ) -> Result<SpeciesSource, KineticsError> {
        self.species_source(state, self.mechanism.species_at(index)?)
    }

    /// Source terms of every species and the heat source, from one network evaluation.
    ///
    /// # Errors
    ///
    /// Returns a [`KineticsError`] if the cell state is invalid.
    pub fn source_terms<Y: AsRef<[f64]>>(&self, state: &CellState<Y>) -> Result<SourceTerms, KineticsError> {
        let network = self.network(state)?;
        Ok(SourceTerms {
            species: self.assembler(&network, state).all()?,
            heat: heat::heat_source(&network, self.options.heat),
        })
    }

    /// Reaction heat source.
    ///
    /// # Errors
    ///
    /// Returns a [`KineticsError`] if the cell state is invalid.
    pub fn heat_source<Y: AsRef<[f64]>>(
        &self,
        state: &CellState<Y>,
    ) -> Result<VolumetricHeatRate, KineticsError> {
        let network = self.network(state)?;
        Ok(heat::heat_source(&network, self.options.heat))
    }

    /// Species mass sources in kg/(m³·s), without derivatives.
    pub(crate) fn mass_rates<Y: AsRef<[f64]>>(&self, state: &CellState<Y>) -> Result<Vec<f64>, KineticsError> {
        let network = self.network(state)?;
        let assembler = self.assembler(&network, state);
        (0..self.mechanism.species().len())
            .map(|i| assembler.mass_rate(self.mechanism.species_at(i)?))
            .collect()
    }

    fn cell_concentrations<Y: AsRef<[f64]>>(
        &self,
        state: &CellState<Y>,
    ) -> Result<Concentrations, KineticsError> {
        Concentrations::from_mass_fractions(
            &self.mechanism,
            state.density,
            state.mixture.as_slice(),
            self.options.negative_concentrations,
        )
    }

    fn network<Y: AsRef<[f64]>>(&self, state: &CellState<Y>) -> Result<NetworkState<'_>, KineticsError> {
        let constants = self.rate_constants(state)?;
        let concentrations = self.cell_concentrations(state)?;
        Ok(NetworkState::new(&self.mechanism, constants, concentrations))
    }

    fn assembler<'n, 'a, Y: AsRef<[f64]>>(
        &self,
        network: &'n NetworkState<'a>,
        state: &'n CellState<Y>,
    ) -> SourceAssembler<'n, 'a> {
        SourceAssembler {
            network,
            density: state.density,
            mass_fractions: state.mixture.as_slice(),
            policy: self.options.negative_concentrations,
            strategy: self.options.derivative,
        }
    }
}
