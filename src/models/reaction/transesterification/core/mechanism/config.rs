use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::reaction::transesterification::core::KineticsError;

use super::{ConcentrationBasis, TimeBasis};

/// Plain-data description of a reaction mechanism.
///
/// This is the configuration surface: it can be written by hand, loaded from
/// JSON, or started from a preset and edited (for example to run with a
/// synthetic parameter set in a test).
/// Nothing is checked until it is turned into a [`Mechanism`].
///
/// Units are part of the field names; all values are SI except the
/// pre-exponential factor, whose units follow the concentration and time bases.
///
/// # Example
///
/// ```
/// use twine_transesterification::models::reaction::transesterification::{
///     Mechanism, MechanismConfig,
/// };
///
/// let json = r#"{
///     "species": [
///         { "name": "A", "molar_mass_kg_per_mol": 0.1 },
///         { "name": "B", "molar_mass_kg_per_mol": 0.1 }
///     ],
///     "reactions": [{
///         "name": "A <=> B",
///         "stoichiometry": { "A": -1.0, "B": 1.0 },
///         "forward": {
///             "pre_exponential": 1.0e3,
///             "activation_energy_j_per_mol": 40000.0,
///             "orders": { "A": 1.0 }
///         }
///     }]
/// }"#;
///
/// let config = MechanismConfig::from_json(json).unwrap();
/// let mechanism = Mechanism::from_config(&config).unwrap();
/// assert_eq!(mechanism.species().len(), 2);
/// ```
///
/// [`Mechanism`]: super::Mechanism
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MechanismConfig {
    /// Species table, in the solver's species order.
    pub species: Vec<SpeciesConfig>,

    /// Reactions, in the order their net rates are reported.
    pub reactions: Vec<ReactionConfig>,

    /// Concentration basis the pre-exponential factors are expressed in.
    #[serde(default)]
    pub concentration_basis: ConcentrationBasis,

    /// Time basis the pre-exponential factors are expressed in.
    #[serde(default)]
    pub time_basis: TimeBasis,
}

/// One entry of the species table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeciesConfig {
    pub name: String,
    pub molar_mass_kg_per_mol: f64,
}

/// One reaction step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReactionConfig {
    pub name: String,

    /// Signed stoichiometric coefficients by species name:
    /// negative for reactants, positive for products.
    pub stoichiometry: BTreeMap<String, f64>,

    pub forward: RateLawConfig,

    /// Reverse rate law; `None` makes the step irreversible.
    #[serde(default)]
    pub reverse: Option<RateLawConfig>,

    /// Reaction enthalpy, J/mol of reaction extent (negative when exothermic).
    #[serde(default)]
    pub enthalpy_j_per_mol: f64,
}

/// Arrhenius parameters and concentration orders of one reaction direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLawConfig {
    pub pre_exponential: f64,
    pub activation_energy_j_per_mol: f64,

    /// Concentration orders by species name.
    ///
    /// Orders may differ from the stoichiometric coefficients.
    pub orders: BTreeMap<String, f64>,
}

impl MechanismConfig {
    /// Parses a mechanism description from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`KineticsError::Configuration`] if the text is not a valid
    /// mechanism description.
    pub fn from_json(json: &str) -> Result<Self, KineticsError> {
        serde_json::from_str(json).map_err(|err| {
            KineticsError::configuration(format!(
                "mechanism JSON (line {}, column {}): {err}",
                err.line(),
                err.column()
            ))
        })
    }

    /// Serializes the mechanism description to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`KineticsError::Configuration`] if serialization fails.
    pub fn to_json(&self) -> Result<String, KineticsError> {
        serde_json::to_string_pretty(self)
            .map_err(|err| KineticsError::configuration(format!("mechanism JSON: {err}")))
    }
}

impl RateLawConfig {
    /// Creates a rate law from Arrhenius parameters and `(species, order)` pairs.
    #[must_use]
    pub fn new(
        pre_exponential: f64,
        activation_energy_j_per_mol: f64,
        orders: &[(&str, f64)],
    ) -> Self {
        Self {
            pre_exponential,
            activation_energy_j_per_mol,
            orders: orders
                .iter()
                .map(|&(name, order)| (name.to_owned(), order))
                .collect(),
        }
    }
}
