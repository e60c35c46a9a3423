//! Arrhenius rate constants.

use uom::si::{
    f64::{MolarEnergy, ThermodynamicTemperature},
    molar_energy::joule_per_mole,
    thermodynamic_temperature::kelvin,
};

use crate::support::constraint::{Constrained, ConstraintError, StrictlyPositive};

use super::KineticsError;

/// Universal gas constant, J/(mol·K).
pub const GAS_CONSTANT: f64 = 8.314;

/// Arrhenius parameters of one reaction direction.
///
/// The pre-exponential factor carries whatever units the rate law needs
/// (L/(mol·s) for a second-order step on a mol/L basis, min⁻¹ for a pseudo
/// first-order step on a per-minute basis).
/// The activation energy is a [`MolarEnergy`], so kJ/mol inputs are converted
/// on construction rather than by convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrhenius {
    pre_exponential: Constrained<f64, StrictlyPositive>,
    activation_energy: Constrained<MolarEnergy, StrictlyPositive>,
}

impl Arrhenius {
    /// Creates Arrhenius parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if either parameter is not strictly positive.
    pub fn new(
        pre_exponential: f64,
        activation_energy: MolarEnergy,
    ) -> Result<Self, ConstraintError> {
        Ok(Self {
            pre_exponential: StrictlyPositive::new(pre_exponential)?,
            activation_energy: StrictlyPositive::new(activation_energy)?,
        })
    }

    /// Returns the pre-exponential factor `A`.
    #[must_use]
    pub fn pre_exponential(&self) -> f64 {
        self.pre_exponential.get()
    }

    /// Returns the activation energy `Ea`.
    #[must_use]
    pub fn activation_energy(&self) -> MolarEnergy {
        self.activation_energy.get()
    }

    /// Evaluates `k = A·exp(−Ea/(R·T))`.
    ///
    /// # Errors
    ///
    /// Returns [`KineticsError::Domain`] if the temperature is not strictly
    /// positive (including `NaN`).
    pub fn rate_constant(&self, temperature: ThermodynamicTemperature) -> Result<f64, KineticsError> {
        Ok(self.at_kelvin(absolute_kelvin(temperature)?))
    }

    /// Evaluates the rate constant at an absolute temperature already known to be positive.
    pub(crate) fn at_kelvin(&self, t: f64) -> f64 {
        let ea = self.activation_energy.get().get::<joule_per_mole>();
        self.pre_exponential.get() * (-ea / (GAS_CONSTANT * t)).exp()
    }
}

/// Absolute temperature in kelvin, checked to be strictly positive.
pub(crate) fn absolute_kelvin(temperature: ThermodynamicTemperature) -> Result<f64, KineticsError> {
    let t = temperature.get::<kelvin>();
    StrictlyPositive::new(t)
        .map(|t| t.into_inner())
        .map_err(|err| KineticsError::domain(format!("temperature {t} K: {err}")))
}
