use twine_solvers::equation::bisection;
use uom::si::{f64::MolarConcentration, molar_concentration::mole_per_cubic_meter};

use crate::{
    models::reaction::transesterification::core::Mechanism,
    support::units::{VolumetricMolarRate, mole_per_cubic_meter_second},
};

/// Solver configuration for the step equilibrium search.
#[derive(Debug, Clone, Copy)]
pub struct EquilibriumConfig {
    /// Maximum iteration count for the bisection solve.
    pub max_iters: usize,

    /// Absolute tolerance on the reaction extent.
    pub extent_tol: MolarConcentration,

    /// Absolute tolerance on the net rate of the reaction.
    pub rate_tol: VolumetricMolarRate,
}

impl Default for EquilibriumConfig {
    fn default() -> Self {
        Self {
            max_iters: 200,
            extent_tol: MolarConcentration::new::<mole_per_cubic_meter>(1e-9),
            rate_tol: mole_per_cubic_meter_second(1e-12),
        }
    }
}

impl EquilibriumConfig {
    /// Converts this configuration into a bisection solver configuration in
    /// the mechanism's bases.
    pub(super) fn bisection(&self, mechanism: &Mechanism) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: mechanism.concentration_basis().value_of(self.extent_tol),
            x_rel_tol: 0.0,
            residual_tol: self.rate_tol.value / mechanism.si_rate_factor(),
        }
    }
}
