use uom::si::f64::{MassDensity, ThermodynamicTemperature};

/// The local thermodynamic state of a reacting mixture.
///
/// A `State<Mixture>` captures what a flow solver knows about one control
/// volume: its temperature, its bulk density, and the mixture composition.
///
/// The `Mixture` type parameter is usually [`MassFractions`], but any
/// structured composition type can be carried.
///
/// # Example
///
/// ```
/// use twine_transesterification::support::thermo::{MassFractions, State};
/// use uom::si::{
///     f64::{MassDensity, ThermodynamicTemperature},
///     mass_density::kilogram_per_cubic_meter,
///     thermodynamic_temperature::kelvin,
/// };
///
/// let state = State::new(
///     ThermodynamicTemperature::new::<kelvin>(333.0),
///     MassDensity::new::<kilogram_per_cubic_meter>(900.0),
///     MassFractions::new([0.75, 0.25, 0.0, 0.0, 0.0, 0.0]),
/// );
/// assert_eq!(state.mixture.len(), 6);
/// ```
///
/// [`MassFractions`]: super::MassFractions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State<Mixture> {
    pub temperature: ThermodynamicTemperature,
    pub density: MassDensity,
    pub mixture: Mixture,
}

impl<Mixture> State<Mixture> {
    /// Creates a new state with the given temperature, density, and mixture.
    #[must_use]
    pub fn new(
        temperature: ThermodynamicTemperature,
        density: MassDensity,
        mixture: Mixture,
    ) -> Self {
        Self {
            temperature,
            density,
            mixture,
        }
    }

    /// Returns a new state with the given temperature, keeping other fields unchanged.
    #[must_use]
    pub fn with_temperature(self, temperature: ThermodynamicTemperature) -> Self {
        Self {
            temperature,
            ..self
        }
    }

    /// Returns a new state with the given mixture, keeping other fields unchanged.
    #[must_use]
    pub fn with_mixture<Other>(self, mixture: Other) -> State<Other> {
        State {
            temperature: self.temperature,
            density: self.density,
            mixture,
        }
    }
}
