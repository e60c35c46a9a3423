use uom::si::{
    f64::{MassDensity, ThermodynamicTemperature},
    mass_density::kilogram_per_cubic_meter,
    thermodynamic_temperature::kelvin,
};

use crate::support::thermo::{MassFractions, State};

use super::CellState;

/// Builds a cell state from kelvin, kg/m³, and mass fractions.
pub(super) fn cell<const N: usize>(t: f64, rho: f64, y: [f64; N]) -> CellState<[f64; N]> {
    State::new(
        ThermodynamicTemperature::new::<kelvin>(t),
        MassDensity::new::<kilogram_per_cubic_meter>(rho),
        MassFractions::new(y),
    )
}

/// Pure oil and methanol at 3:1 mass ratio, before any conversion.
pub(super) const FEED: [f64; 6] = [0.75, 0.25, 0.0, 0.0, 0.0, 0.0];

/// A partially converted mixture with every species present.
pub(super) const MID_CONVERSION: [f64; 6] = [0.4, 0.15, 0.12, 0.08, 0.2, 0.05];
