//! Extensions to [`uom`].
//!
//! This crate uses [`uom`] for all physical units at its public boundary
//! (temperature, density, molar mass, activation energy, concentration).
//! Chemical source terms are volumetric rates, which [`uom`] does not name,
//! so this module defines them along with SI constructors:
//!
//! ```
//! use twine_transesterification::support::units::{
//!     VolumetricMassRate, kilogram_per_cubic_meter_second,
//! };
//!
//! let rate: VolumetricMassRate = kilogram_per_cubic_meter_second(-0.84);
//! assert_eq!(rate.value, -0.84);
//! ```

mod quantities;

pub use quantities::{
    VolumetricHeatRate, VolumetricMassRate, VolumetricMolarRate, kilogram_per_cubic_meter_second,
    mole_per_cubic_meter_second, watt_per_cubic_meter,
};
