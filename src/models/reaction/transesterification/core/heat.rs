//! Reaction heat release.

use serde::{Deserialize, Serialize};
use uom::si::molar_energy::joule_per_mole;

use crate::support::units::{VolumetricHeatRate, watt_per_cubic_meter};

use super::NetworkState;

/// Which reactions contribute to the heat source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatSourceMode {
    /// `q = −Σⱼ ΔHⱼ·rⱼ` over the net rates of every reaction.
    #[default]
    AllReactions,
    /// `q = −ΔH₁·k₁f·Π Cᵢ^orderᵢ`, the forward rate of the first reaction only.
    ///
    /// Kept for comparison with solvers that estimate heat release from the
    /// leading step.
    LeadingForwardRate,
}

/// Heat source of an evaluated network, in W/m³.
pub(crate) fn heat_source(network: &NetworkState<'_>, mode: HeatSourceMode) -> VolumetricHeatRate {
    let mechanism = network.mechanism();
    let reactions = mechanism.reactions();

    let per_basis: f64 = match mode {
        HeatSourceMode::AllReactions => reactions
            .iter()
            .zip(network.rates())
            .map(|(r, rate)| -r.enthalpy().get::<joule_per_mole>() * rate)
            .sum(),
        HeatSourceMode::LeadingForwardRate => {
            -reactions[0].enthalpy().get::<joule_per_mole>() * network.forward_rate(0)
        }
    };
    watt_per_cubic_meter(per_basis * mechanism.si_rate_factor())
}
