use thiserror::Error;

/// Errors that can occur while configuring or evaluating the kinetics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KineticsError {
    /// The mechanism or the solver setup is inconsistent.
    ///
    /// For example, a non-positive molar mass, a reaction that does not
    /// conserve mass, or a species ordering that differs from the solver's.
    #[error("invalid configuration: {context}")]
    Configuration { context: String },

    /// An input lies outside the domain where the kinetics are defined.
    ///
    /// For example, a non-positive temperature or, under
    /// [`NegativeConcentrationPolicy::Reject`], a negative mass fraction.
    ///
    /// [`NegativeConcentrationPolicy::Reject`]: super::NegativeConcentrationPolicy::Reject
    #[error("out of domain: {context}")]
    Domain { context: String },

    /// A source term was requested for an index outside the species table.
    #[error("unknown species index {index}: species table has {count} entries")]
    UnknownSpecies { index: usize, count: usize },

    /// A species name was not found in the species table.
    #[error("unknown species name {name:?}")]
    UnknownSpeciesName { name: String },
}

impl KineticsError {
    /// Creates a configuration error with context.
    pub(crate) fn configuration(context: impl Into<String>) -> Self {
        Self::Configuration {
            context: context.into(),
        }
    }

    /// Creates a domain error with context.
    pub(crate) fn domain(context: impl Into<String>) -> Self {
        Self::Domain {
            context: context.into(),
        }
    }
}
