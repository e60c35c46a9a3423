//! Isothermal batch reactor.
//!
//! Integrates `dY/dt = S/ρ` at constant temperature and density with
//! explicit Euler steps, using the same source terms a flow solver receives.
//! This is the zero-dimensional check of a mechanism before it goes into a
//! CFD case.

use log::debug;
use uom::si::{
    f64::{MassDensity, ThermodynamicTemperature, Time},
    mass_density::kilogram_per_cubic_meter,
    thermodynamic_temperature::kelvin,
    time::second,
};

use crate::support::{
    constraint::StrictlyPositive,
    thermo::{MassFractions, State},
};

use super::{Kinetics, KineticsError, RateConstants, SpeciesId};

/// A well-mixed batch reactor held at constant temperature and density.
#[derive(Debug, Clone, Copy)]
pub struct BatchReactor<'k> {
    kinetics: &'k Kinetics,
    temperature: ThermodynamicTemperature,
    density: MassDensity,
}

impl<'k> BatchReactor<'k> {
    /// Creates a reactor.
    ///
    /// # Errors
    ///
    /// Returns [`KineticsError::Domain`] if the temperature or density is not
    /// strictly positive.
    pub fn new(
        kinetics: &'k Kinetics,
        temperature: ThermodynamicTemperature,
        density: MassDensity,
    ) -> Result<Self, KineticsError> {
        RateConstants::evaluate(kinetics.mechanism(), temperature)?;
        let rho = density.get::<kilogram_per_cubic_meter>();
        StrictlyPositive::new(rho)
            .map_err(|err| KineticsError::domain(format!("density {rho} kg/m³: {err}")))?;
        Ok(Self {
            kinetics,
            temperature,
            density,
        })
    }

    /// Advances the mass fractions by one explicit Euler step.
    ///
    /// # Errors
    ///
    /// Returns [`KineticsError::Domain`] if `dt` is not strictly positive, or
    /// any error from evaluating the source terms.
    pub fn step(&self, mass_fractions: &mut [f64], dt: Time) -> Result<(), KineticsError> {
        let dt = dt.get::<second>();
        let dt = StrictlyPositive::new(dt)
            .map_err(|err| KineticsError::domain(format!("time step {dt} s: {err}")))?
            .into_inner();

        let state = State::new(
            self.temperature,
            self.density,
            MassFractions::new(&*mass_fractions),
        );
        let rates = self.kinetics.mass_rates(&state)?;
        let rho = self.density.get::<kilogram_per_cubic_meter>();
        for (y, s) in mass_fractions.iter_mut().zip(rates) {
            *y += s / rho * dt;
        }
        Ok(())
    }

    /// Integrates `steps` Euler steps of size `dt` from an initial composition.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`BatchReactor::step`].
    #[allow(clippy::cast_precision_loss)]
    pub fn run(
        &self,
        initial: &[f64],
        dt: Time,
        steps: usize,
    ) -> Result<BatchTrajectory, KineticsError> {
        let mut times = Vec::with_capacity(steps + 1);
        let mut states = Vec::with_capacity(steps + 1);
        let mut y = initial.to_vec();

        times.push(Time::new::<second>(0.0));
        states.push(y.clone());
        for n in 1..=steps {
            self.step(&mut y, dt)?;
            times.push(dt * n as f64);
            states.push(y.clone());
        }

        debug!(
            "batch run: {steps} steps of {} s at {} K",
            dt.get::<second>(),
            self.temperature.get::<kelvin>()
        );
        Ok(BatchTrajectory { times, states })
    }
}

/// Mass fractions of a batch run, sampled after every step.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchTrajectory {
    times: Vec<Time>,
    states: Vec<Vec<f64>>,
}

impl BatchTrajectory {
    #[must_use]
    pub fn times(&self) -> &[Time] {
        &self.times
    }

    /// Mass fractions at each sample, starting with the initial composition.
    #[must_use]
    pub fn states(&self) -> &[Vec<f64>] {
        &self.states
    }

    /// Mass fractions at the end of the run.
    #[must_use]
    pub fn last(&self) -> &[f64] {
        self.states.last().map_or(&[][..], Vec::as_slice)
    }

    /// Conversion `X = 1 − Y/Y₀` of a key species at every sample.
    ///
    /// Density is constant, so this equals the conversion on a
    /// concentration basis.
    ///
    /// # Errors
    ///
    /// Returns [`KineticsError::UnknownSpecies`] if the species is not in the
    /// trajectory, or [`KineticsError::Domain`] if its initial mass fraction is
    /// not strictly positive.
    pub fn conversion(&self, species: SpeciesId) -> Result<Vec<f64>, KineticsError> {
        let count = self.states.first().map_or(0, Vec::len);
        if species.index() >= count {
            return Err(KineticsError::UnknownSpecies {
                index: species.index(),
                count,
            });
        }

        let y0 = self.states[0][species.index()];
        let y0 = StrictlyPositive::new(y0)
            .map_err(|err| KineticsError::domain(format!("initial mass fraction {y0}: {err}")))?
            .into_inner();
        Ok(self
            .states
            .iter()
            .map(|y| 1.0 - y[species.index()] / y0)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::time::minute;

    use crate::models::reaction::transesterification::core::{
        EvaluationOptions, Mechanism, names, test_support::FEED,
    };

    fn reactor(kinetics: &Kinetics) -> BatchReactor<'_> {
        BatchReactor::new(
            kinetics,
            ThermodynamicTemperature::new::<kelvin>(333.0),
            MassDensity::new::<kilogram_per_cubic_meter>(900.0),
        )
        .unwrap()
    }

    fn three_step() -> Kinetics {
        Kinetics::new(Mechanism::three_step(), EvaluationOptions::default()).unwrap()
    }

    #[test]
    fn one_second_euler_step() {
        let kinetics = three_step();
        let mut y = FEED;
        reactor(&kinetics)
            .step(&mut y, Time::new::<second>(1.0))
            .unwrap();

        assert!(y[0] < FEED[0], "TG should be consumed");
        assert!(y[2] > 0.0, "DG should appear");
        assert!(y[4] > 0.0, "FAME should appear");
        assert_relative_eq!(y.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn conversion_grows_over_a_run() {
        let kinetics = three_step();
        let trajectory = reactor(&kinetics)
            .run(&FEED, Time::new::<second>(10.0), 60)
            .unwrap();
        assert_eq!(trajectory.times().len(), 61);
        assert_relative_eq!(trajectory.times()[60].get::<minute>(), 10.0, max_relative = 1e-12);

        let tg = kinetics.mechanism().species_id(names::TG).unwrap();
        let conversion = trajectory.conversion(tg).unwrap();
        assert_eq!(conversion[0], 0.0);
        assert!(conversion.windows(2).all(|w| w[1] > w[0]));
        assert!(*conversion.last().unwrap() < 1.0);

        assert_relative_eq!(trajectory.last().iter().sum::<f64>(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn hotter_reactor_converts_faster() {
        let kinetics = three_step();
        let tg = kinetics.mechanism().species_id(names::TG).unwrap();
        let final_conversion = |t: f64| {
            BatchReactor::new(
                &kinetics,
                ThermodynamicTemperature::new::<kelvin>(t),
                MassDensity::new::<kilogram_per_cubic_meter>(900.0),
            )
            .unwrap()
            .run(&FEED, Time::new::<second>(5.0), 20)
            .unwrap()
            .conversion(tg)
            .unwrap()[20]
        };
        assert!(final_conversion(343.0) > final_conversion(323.0));
    }

    #[test]
    fn rejects_invalid_inputs() {
        let kinetics = three_step();
        let cold = BatchReactor::new(
            &kinetics,
            ThermodynamicTemperature::new::<kelvin>(0.0),
            MassDensity::new::<kilogram_per_cubic_meter>(900.0),
        );
        assert!(matches!(cold, Err(KineticsError::Domain { .. })));

        let mut y = FEED;
        let zero_step = reactor(&kinetics).step(&mut y, Time::new::<second>(0.0));
        assert!(matches!(zero_step, Err(KineticsError::Domain { .. })));

        let trajectory = reactor(&kinetics)
            .run(&FEED, Time::new::<second>(1.0), 1)
            .unwrap();
        let dg = kinetics.mechanism().species_id(names::DG).unwrap();
        assert!(matches!(
            trajectory.conversion(dg),
            Err(KineticsError::Domain { .. })
        ));
    }
}
