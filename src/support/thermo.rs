//! Local thermodynamic state of a reacting mixture.

mod mass_fractions;
mod state;

pub use mass_fractions::MassFractions;
pub use state::State;
