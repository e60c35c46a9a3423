use uom::si::{f64::MolarMass, molar_mass::kilogram_per_mole};

use crate::support::constraint::{Constrained, StrictlyPositive};

use crate::models::reaction::transesterification::core::KineticsError;

/// Position of a species in a mechanism's species table.
///
/// The species table order is also the order of the solver's mass-fraction
/// array, so an id doubles as the solver's species equation index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpeciesId(usize);

impl SpeciesId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the index into the species table.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A chemical species tracked by the kinetics.
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    name: String,
    molar_mass: Constrained<MolarMass, StrictlyPositive>,
}

impl Species {
    /// Creates a species.
    ///
    /// # Errors
    ///
    /// Returns [`KineticsError::Configuration`] if the name is empty or the
    /// molar mass is not strictly positive.
    pub fn new(name: impl Into<String>, molar_mass: MolarMass) -> Result<Self, KineticsError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(KineticsError::configuration("species name must not be empty"));
        }
        let molar_mass = StrictlyPositive::new(molar_mass).map_err(|err| {
            KineticsError::configuration(format!(
                "molar mass of {name} ({} kg/mol): {err}",
                molar_mass.get::<kilogram_per_mole>()
            ))
        })?;
        Ok(Self { name, molar_mass })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn molar_mass(&self) -> MolarMass {
        self.molar_mass.get()
    }

    /// Molar mass in kg/mol.
    pub(crate) fn molar_mass_si(&self) -> f64 {
        self.molar_mass.get().get::<kilogram_per_mole>()
    }
}
