//! Mass-action net rates of the reaction network.

use uom::si::f64::ThermodynamicTemperature;

use super::{Concentrations, KineticsError, Mechanism, SpeciesId, arrhenius::absolute_kelvin};

/// Forward and reverse rate constants of every reaction at one temperature.
///
/// Values are in the mechanism's concentration and time bases.
#[derive(Debug, Clone, PartialEq)]
pub struct RateConstants {
    forward: Vec<f64>,
    reverse: Vec<Option<f64>>,
}

impl RateConstants {
    /// Evaluates every rate constant of a mechanism.
    ///
    /// # Errors
    ///
    /// Returns [`KineticsError::Domain`] if the temperature is not strictly positive.
    pub fn evaluate(
        mechanism: &Mechanism,
        temperature: ThermodynamicTemperature,
    ) -> Result<Self, KineticsError> {
        let t = absolute_kelvin(temperature)?;

        let reactions = mechanism.reactions();
        Ok(Self {
            forward: reactions
                .iter()
                .map(|r| r.forward().arrhenius().at_kelvin(t))
                .collect(),
            reverse: reactions
                .iter()
                .map(|r| r.reverse().map(|law| law.arrhenius().at_kelvin(t)))
                .collect(),
        })
    }

    /// Forward rate constant of a reaction.
    ///
    /// # Panics
    ///
    /// Panics if the reaction index is out of range.
    #[must_use]
    pub fn forward(&self, reaction: usize) -> f64 {
        self.forward[reaction]
    }

    /// Reverse rate constant of a reaction, `None` if it is irreversible.
    ///
    /// # Panics
    ///
    /// Panics if the reaction index is out of range.
    #[must_use]
    pub fn reverse(&self, reaction: usize) -> Option<f64> {
        self.reverse[reaction]
    }
}

/// Net rate of every reaction, positive in the forward direction.
///
/// Rates are in the mechanism's concentration basis per its time basis
/// (mol/(L·s) for the three-step chain).
#[derive(Debug, Clone, PartialEq)]
pub struct NetRates(Vec<f64>);

impl NetRates {
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Net rate of one reaction, `None` if the index is out of range.
    #[must_use]
    pub fn get(&self, reaction: usize) -> Option<f64> {
        self.0.get(reaction).copied()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

/// Rate constants, concentrations, and net rates of one cell.
#[derive(Debug, Clone)]
pub(crate) struct NetworkState<'a> {
    mechanism: &'a Mechanism,
    constants: RateConstants,
    concentrations: Concentrations,
    rates: Vec<f64>,
}

impl<'a> NetworkState<'a> {
    pub(crate) fn new(
        mechanism: &'a Mechanism,
        constants: RateConstants,
        concentrations: Concentrations,
    ) -> Self {
        let rates = net_rates(mechanism, &constants, concentrations.values());
        Self {
            mechanism,
            constants,
            concentrations,
            rates,
        }
    }

    pub(crate) fn mechanism(&self) -> &'a Mechanism {
        self.mechanism
    }

    pub(crate) fn constants(&self) -> &RateConstants {
        &self.constants
    }

    pub(crate) fn concentrations(&self) -> &Concentrations {
        &self.concentrations
    }

    pub(crate) fn rates(&self) -> &[f64] {
        &self.rates
    }

    pub(crate) fn into_rates(self) -> NetRates {
        NetRates(self.rates)
    }

    /// Forward rate `k_f·Π Cᵢ^orderᵢ` of one reaction.
    pub(crate) fn forward_rate(&self, reaction: usize) -> f64 {
        let law = self.mechanism.reactions()[reaction].forward();
        self.constants.forward(reaction) * law.concentration_product(self.concentrations.values())
    }

    /// Partial derivative `∂rⱼ/∂Cᵢ` of a net rate.
    pub(crate) fn rate_slope(&self, reaction: usize, species: SpeciesId) -> f64 {
        let c = self.concentrations.values();
        let r = &self.mechanism.reactions()[reaction];

        let forward =
            self.constants.forward(reaction) * r.forward().concentration_product_slope(species, c);
        let reverse = match (r.reverse(), self.constants.reverse(reaction)) {
            (Some(law), Some(kr)) => kr * law.concentration_product_slope(species, c),
            _ => 0.0,
        };
        forward - reverse
    }
}

fn net_rates(mechanism: &Mechanism, constants: &RateConstants, c: &[f64]) -> Vec<f64> {
    mechanism
        .reactions()
        .iter()
        .enumerate()
        .map(|(j, r)| {
            let forward = constants.forward(j) * r.forward().concentration_product(c);
            let reverse = match (r.reverse(), constants.reverse(j)) {
                (Some(law), Some(kr)) => kr * law.concentration_product(c),
                _ => 0.0,
            };
            forward - reverse
        })
        .collect()
}
