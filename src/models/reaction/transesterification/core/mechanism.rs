//! Reaction mechanism: species table, reactions, and unit bases.
//!
//! A [`Mechanism`] is validated once, when it is built from a
//! [`MechanismConfig`], and is immutable afterwards.
//! Evaluation code relies on these checks and never repeats them per cell:
//!
//! - species names are unique and molar masses strictly positive,
//! - every species named by a reaction exists,
//! - every reaction has at least one reactant and one product,
//! - Arrhenius parameters are strictly positive and orders non-negative,
//! - every reaction conserves mass (`Σ νᵢ·MWᵢ = 0`).

mod config;
mod presets;
mod species;

pub use config::{MechanismConfig, RateLawConfig, ReactionConfig, SpeciesConfig};
pub use presets::names;
pub use species::{Species, SpeciesId};

use std::collections::{BTreeMap, HashMap};

use log::debug;
use serde::{Deserialize, Serialize};
use uom::si::{
    f64::{MolarConcentration, MolarEnergy, MolarMass},
    molar_concentration::mole_per_cubic_meter,
    molar_energy::joule_per_mole,
    molar_mass::kilogram_per_mole,
};

use crate::support::constraint::NonNegative;

use super::{Arrhenius, KineticsError, StoichiometricMatrix};

/// Relative tolerance on `Σ νᵢ·MWᵢ`, scaled by the mass turned over per unit extent.
const MASS_BALANCE_TOLERANCE: f64 = 1e-6;

/// Concentration units the kinetic parameters are expressed in.
///
/// The same basis converts mass fractions to concentrations and molar rates
/// back to mass rates, so the conversion factor exists in exactly one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcentrationBasis {
    /// mol/L, the usual basis for second-order rate constants in L/(mol·s).
    #[default]
    MolePerLiter,
    /// mol/m³.
    MolePerCubicMeter,
}

impl ConcentrationBasis {
    /// Number of mol/m³ in one basis unit.
    #[must_use]
    pub fn mole_per_cubic_meter(self) -> f64 {
        match self {
            Self::MolePerLiter => 1000.0,
            Self::MolePerCubicMeter => 1.0,
        }
    }

    /// Converts a concentration to a value in this basis.
    #[must_use]
    pub fn value_of(self, concentration: MolarConcentration) -> f64 {
        concentration.get::<mole_per_cubic_meter>() / self.mole_per_cubic_meter()
    }

    /// Converts a value in this basis to a concentration.
    #[must_use]
    pub fn concentration(self, value: f64) -> MolarConcentration {
        MolarConcentration::new::<mole_per_cubic_meter>(value * self.mole_per_cubic_meter())
    }
}

/// Time units the kinetic parameters are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBasis {
    #[default]
    PerSecond,
    /// Rate constants per minute; rates are divided by 60 to reach SI.
    PerMinute,
}

impl TimeBasis {
    /// Number of seconds in one basis time unit.
    #[must_use]
    pub fn seconds(self) -> f64 {
        match self {
            Self::PerSecond => 1.0,
            Self::PerMinute => 60.0,
        }
    }
}

/// One direction of a reaction: Arrhenius parameters and concentration orders.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLaw {
    arrhenius: Arrhenius,
    orders: Vec<(SpeciesId, f64)>,
}

impl RateLaw {
    #[must_use]
    pub fn arrhenius(&self) -> &Arrhenius {
        &self.arrhenius
    }

    /// Concentration orders, in species-table order.
    #[must_use]
    pub fn orders(&self) -> &[(SpeciesId, f64)] {
        &self.orders
    }

    /// Returns `Π Cᵢ^orderᵢ`.
    pub(crate) fn concentration_product(&self, concentrations: &[f64]) -> f64 {
        self.orders
            .iter()
            .map(|&(id, order)| power(concentrations[id.index()], order))
            .product()
    }

    /// Returns `∂(Π Cₖ^orderₖ)/∂Cᵢ`.
    pub(crate) fn concentration_product_slope(&self, species: SpeciesId, concentrations: &[f64]) -> f64 {
        let Some(&(_, order_i)) = self.orders.iter().find(|(id, _)| *id == species) else {
            return 0.0;
        };
        if order_i == 0.0 {
            return 0.0;
        }
        self.orders
            .iter()
            .map(|&(id, order)| {
                let c = concentrations[id.index()];
                if id == species {
                    order_i * power(c, order - 1.0)
                } else {
                    power(c, order)
                }
            })
            .product()
    }
}

/// `c^order`, exact for integral orders and defined for negative `c`.
#[allow(clippy::cast_possible_truncation)]
fn power(c: f64, order: f64) -> f64 {
    if order.fract() == 0.0 && order.abs() <= f64::from(i32::MAX) {
        c.powi(order as i32)
    } else {
        c.powf(order)
    }
}

/// A reaction step with its rate laws and enthalpy.
#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    name: String,
    forward: RateLaw,
    reverse: Option<RateLaw>,
    enthalpy: MolarEnergy,
}

impl Reaction {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn forward(&self) -> &RateLaw {
        &self.forward
    }

    /// Reverse rate law, `None` for an irreversible step.
    #[must_use]
    pub fn reverse(&self) -> Option<&RateLaw> {
        self.reverse.as_ref()
    }

    /// Reaction enthalpy per unit extent (negative when exothermic).
    #[must_use]
    pub fn enthalpy(&self) -> MolarEnergy {
        self.enthalpy
    }
}

/// A validated, immutable reaction mechanism.
///
/// # Example
///
/// ```
/// use twine_transesterification::models::reaction::transesterification::Mechanism;
///
/// let mechanism = Mechanism::three_step();
/// let fame = mechanism.species_id("FAME").unwrap();
///
/// // FAME is produced by every step.
/// let produced: Vec<f64> = (0..3)
///     .map(|j| mechanism.stoichiometry().coefficient(j, fame))
///     .collect();
/// assert_eq!(produced, [1.0, 1.0, 1.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Mechanism {
    species: Vec<Species>,
    reactions: Vec<Reaction>,
    stoichiometry: StoichiometricMatrix,
    concentration_basis: ConcentrationBasis,
    time_basis: TimeBasis,
}

impl Mechanism {
    /// Builds and validates a mechanism from its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`KineticsError::Configuration`] describing the first problem found.
    pub fn from_config(config: &MechanismConfig) -> Result<Self, KineticsError> {
        if config.species.is_empty() {
            return Err(KineticsError::configuration("mechanism has no species"));
        }
        if config.reactions.is_empty() {
            return Err(KineticsError::configuration("mechanism has no reactions"));
        }

        let mut species = Vec::with_capacity(config.species.len());
        let mut index = HashMap::with_capacity(config.species.len());
        for (i, entry) in config.species.iter().enumerate() {
            let molar_mass = MolarMass::new::<kilogram_per_mole>(entry.molar_mass_kg_per_mol);
            species.push(Species::new(entry.name.clone(), molar_mass)?);
            if index.insert(entry.name.clone(), SpeciesId::new(i)).is_some() {
                return Err(KineticsError::configuration(format!(
                    "species {:?} is listed more than once",
                    entry.name
                )));
            }
        }

        let molar_masses: Vec<f64> = species.iter().map(Species::molar_mass_si).collect();
        let mut stoichiometry = StoichiometricMatrix::zeros(config.reactions.len(), species.len());
        let mut reactions = Vec::with_capacity(config.reactions.len());
        for (j, entry) in config.reactions.iter().enumerate() {
            let coefficients = resolve_coefficients(&entry.name, &entry.stoichiometry, &index)?;
            for &(id, nu) in &coefficients {
                stoichiometry.set(j, id, nu);
            }

            let imbalance = stoichiometry.mass_imbalance(j, &molar_masses);
            let throughput = stoichiometry.mass_throughput(j, &molar_masses);
            debug!(
                "reaction {:?}: mass imbalance {imbalance:e} kg/mol of {throughput:e} kg/mol turned over",
                entry.name
            );
            if imbalance.abs() > MASS_BALANCE_TOLERANCE * throughput {
                return Err(KineticsError::configuration(format!(
                    "reaction {:?} does not conserve mass: sum of coefficient * molar mass is {imbalance:e} kg/mol",
                    entry.name
                )));
            }

            reactions.push(Reaction {
                name: entry.name.clone(),
                forward: resolve_rate_law(&entry.name, "forward", &entry.forward, &index)?,
                reverse: entry
                    .reverse
                    .as_ref()
                    .map(|law| resolve_rate_law(&entry.name, "reverse", law, &index))
                    .transpose()?,
                enthalpy: MolarEnergy::new::<joule_per_mole>(finite(
                    &entry.name,
                    "enthalpy",
                    entry.enthalpy_j_per_mol,
                )?),
            });
        }

        Ok(Self {
            species,
            reactions,
            stoichiometry,
            concentration_basis: config.concentration_basis,
            time_basis: config.time_basis,
        })
    }

    /// The three-step reversible transesterification chain.
    ///
    /// See [`MechanismConfig::three_step`].
    #[must_use]
    pub fn three_step() -> Self {
        Self::from_config(&MechanismConfig::three_step())
            .expect("three-step preset should always be a valid mechanism")
    }

    /// The single-step irreversible transesterification.
    ///
    /// See [`MechanismConfig::single_step`].
    #[must_use]
    pub fn single_step() -> Self {
        Self::from_config(&MechanismConfig::single_step())
            .expect("single-step preset should always be a valid mechanism")
    }

    #[must_use]
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    #[must_use]
    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    #[must_use]
    pub fn stoichiometry(&self) -> &StoichiometricMatrix {
        &self.stoichiometry
    }

    #[must_use]
    pub fn concentration_basis(&self) -> ConcentrationBasis {
        self.concentration_basis
    }

    #[must_use]
    pub fn time_basis(&self) -> TimeBasis {
        self.time_basis
    }

    /// Factor `B/T_b` taking a rate in basis units to mol/(m³·s).
    pub(crate) fn si_rate_factor(&self) -> f64 {
        self.concentration_basis.mole_per_cubic_meter() / self.time_basis.seconds()
    }

    /// Looks up a species by name.
    ///
    /// # Errors
    ///
    /// Returns [`KineticsError::UnknownSpeciesName`] if no species has this name.
    pub fn species_id(&self, name: &str) -> Result<SpeciesId, KineticsError> {
        self.species
            .iter()
            .position(|s| s.name() == name)
            .map(SpeciesId::new)
            .ok_or_else(|| KineticsError::UnknownSpeciesName {
                name: name.to_owned(),
            })
    }

    /// Resolves a solver species equation index.
    ///
    /// # Errors
    ///
    /// Returns [`KineticsError::UnknownSpecies`] if the index is outside the species table.
    pub fn species_at(&self, index: usize) -> Result<SpeciesId, KineticsError> {
        if index < self.species.len() {
            Ok(SpeciesId::new(index))
        } else {
            Err(KineticsError::UnknownSpecies {
                index,
                count: self.species.len(),
            })
        }
    }

    /// Returns the species for an id, failing for ids from a larger mechanism.
    pub(crate) fn species_entry(&self, id: SpeciesId) -> Result<&Species, KineticsError> {
        self.species.get(id.index()).ok_or(KineticsError::UnknownSpecies {
            index: id.index(),
            count: self.species.len(),
        })
    }

    /// Checks that a solver's species list matches the species table, name by name.
    ///
    /// A mismatch would otherwise go unnoticed and silently produce wrong
    /// source terms, so hosts should call this once at startup.
    ///
    /// # Errors
    ///
    /// Returns [`KineticsError::Configuration`] naming the first mismatch.
    pub fn check_species_order<S: AsRef<str>>(&self, solver_species: &[S]) -> Result<(), KineticsError> {
        if solver_species.len() != self.species.len() {
            return Err(KineticsError::configuration(format!(
                "solver has {} species, mechanism has {}",
                solver_species.len(),
                self.species.len()
            )));
        }
        for (i, (solver, own)) in solver_species.iter().zip(&self.species).enumerate() {
            if solver.as_ref() != own.name() {
                return Err(KineticsError::configuration(format!(
                    "species {i} is {:?} in the solver but {:?} in the mechanism",
                    solver.as_ref(),
                    own.name()
                )));
            }
        }
        Ok(())
    }
}

fn resolve_species(
    reaction: &str,
    name: &str,
    index: &HashMap<String, SpeciesId>,
) -> Result<SpeciesId, KineticsError> {
    index.get(name).copied().ok_or_else(|| {
        KineticsError::configuration(format!(
            "reaction {reaction:?} refers to unknown species {name:?}"
        ))
    })
}

fn finite(reaction: &str, what: &str, value: f64) -> Result<f64, KineticsError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(KineticsError::configuration(format!(
            "reaction {reaction:?}: {what} must be finite, got {value}"
        )))
    }
}

fn resolve_coefficients(
    reaction: &str,
    stoichiometry: &BTreeMap<String, f64>,
    index: &HashMap<String, SpeciesId>,
) -> Result<Vec<(SpeciesId, f64)>, KineticsError> {
    let mut coefficients = Vec::with_capacity(stoichiometry.len());
    for (name, &nu) in stoichiometry {
        let id = resolve_species(reaction, name, index)?;
        let nu = finite(reaction, "stoichiometric coefficient", nu)?;
        if nu == 0.0 {
            return Err(KineticsError::configuration(format!(
                "reaction {reaction:?}: coefficient of {name:?} is zero"
            )));
        }
        coefficients.push((id, nu));
    }

    let has_reactant = coefficients.iter().any(|&(_, nu)| nu < 0.0);
    let has_product = coefficients.iter().any(|&(_, nu)| nu > 0.0);
    if !has_reactant || !has_product {
        return Err(KineticsError::configuration(format!(
            "reaction {reaction:?} needs at least one reactant and one product"
        )));
    }
    Ok(coefficients)
}

fn resolve_rate_law(
    reaction: &str,
    direction: &str,
    config: &RateLawConfig,
    index: &HashMap<String, SpeciesId>,
) -> Result<RateLaw, KineticsError> {
    let arrhenius = Arrhenius::new(
        config.pre_exponential,
        MolarEnergy::new::<joule_per_mole>(config.activation_energy_j_per_mol),
    )
    .map_err(|err| {
        KineticsError::configuration(format!(
            "reaction {reaction:?}, {direction} Arrhenius parameters: {err}"
        ))
    })?;

    let mut orders = Vec::with_capacity(config.orders.len());
    for (name, &order) in &config.orders {
        let id = resolve_species(reaction, name, index)?;
        let order = NonNegative::new(finite(reaction, "reaction order", order)?)
            .map_err(|err| {
                KineticsError::configuration(format!(
                    "reaction {reaction:?}, {direction} order of {name:?}: {err}"
                ))
            })?
            .into_inner();
        orders.push((id, order));
    }
    orders.sort_by_key(|&(id, _)| id);

    Ok(RateLaw { arrhenius, orders })
}
