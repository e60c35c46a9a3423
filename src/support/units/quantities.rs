use uom::{
    si::{
        ISQ, Quantity, SI,
        f64::{MassDensity, MolarConcentration, Power, Time, Volume},
        mass_density::kilogram_per_cubic_meter,
        molar_concentration::mole_per_cubic_meter,
        power::watt,
        time::second,
        volume::cubic_meter,
    },
    typenum::{N1, N3, P1, Z0},
};

/// Volumetric mass source, kg/m³·s in SI.
pub type VolumetricMassRate = Quantity<ISQ<N3, P1, N1, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Volumetric molar source, mol/m³·s in SI.
pub type VolumetricMolarRate = Quantity<ISQ<N3, Z0, N1, Z0, Z0, P1, Z0>, SI<f64>, f64>;

/// Volumetric heat source, W/m³ in SI.
pub type VolumetricHeatRate = Quantity<ISQ<N1, P1, N3, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Creates a [`VolumetricMassRate`] from a value in kg/m³·s.
#[must_use]
pub fn kilogram_per_cubic_meter_second(value: f64) -> VolumetricMassRate {
    MassDensity::new::<kilogram_per_cubic_meter>(value) / Time::new::<second>(1.0)
}

/// Creates a [`VolumetricMolarRate`] from a value in mol/m³·s.
#[must_use]
pub fn mole_per_cubic_meter_second(value: f64) -> VolumetricMolarRate {
    MolarConcentration::new::<mole_per_cubic_meter>(value) / Time::new::<second>(1.0)
}

/// Creates a [`VolumetricHeatRate`] from a value in W/m³.
#[must_use]
pub fn watt_per_cubic_meter(value: f64) -> VolumetricHeatRate {
    Power::new::<watt>(value) / Volume::new::<cubic_meter>(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{f64::MolarMass, molar_mass::kilogram_per_mole};

    #[test]
    fn molar_rate_times_molar_mass_is_mass_rate() {
        let molar = mole_per_cubic_meter_second(2.0);
        let mw = MolarMass::new::<kilogram_per_mole>(0.032_04);
        let mass: VolumetricMassRate = molar * mw;
        assert_relative_eq!(mass.value, 0.064_08);
    }

    #[test]
    fn si_constructors_store_base_units() {
        assert_relative_eq!(kilogram_per_cubic_meter_second(1.5).value, 1.5);
        assert_relative_eq!(mole_per_cubic_meter_second(-3.0).value, -3.0);
        assert_relative_eq!(watt_per_cubic_meter(250.0).value, 250.0);
    }
}
