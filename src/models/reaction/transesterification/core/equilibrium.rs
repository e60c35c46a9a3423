//! Equilibrium extent of a single reversible step.
//!
//! Holds every other reaction frozen and advances one reaction from the cell
//! composition until its forward and reverse rates balance.
//! The extent is bracketed by the points where a reactant (forward) or a
//! product (backward) runs out, and solved with bisection.

mod config;
mod error;
mod problem;

pub use config::EquilibriumConfig;
pub use error::EquilibriumError;

use log::debug;
use twine_solvers::equation::bisection;
use uom::si::{f64::MolarConcentration, mass_density::kilogram_per_cubic_meter};

use crate::support::units::mole_per_cubic_meter_second;

use super::{CellState, Concentrations, Kinetics, NegativeConcentrationPolicy, RateConstants};

use problem::{ExtentState, StepModel, StepProblem};

/// Composition at which one reaction's net rate vanishes.
#[derive(Debug, Clone, PartialEq)]
pub struct StepEquilibrium {
    /// Reaction index in the mechanism.
    pub reaction: usize,

    /// Extent per unit volume, positive in the forward direction.
    pub extent: MolarConcentration,

    /// Species concentrations at equilibrium.
    pub concentrations: Vec<MolarConcentration>,

    /// Species mass fractions at equilibrium, at the cell density.
    pub mass_fractions: Vec<f64>,

    /// Bisection iterations performed; zero when an end of the bracket is the answer.
    pub iters: usize,
}

/// Solves for the extent at which a reaction's net rate is zero.
///
/// Negative mass fractions in the cell are treated as zero.
/// An irreversible step, or one whose reverse direction cannot proceed,
/// runs to the depletion of its limiting reactant.
///
/// # Errors
///
/// Returns [`EquilibriumError`] if the reaction index is unknown, the cell
/// state cannot be evaluated, or the solver fails to converge.
pub fn equilibrium_extent<Y: AsRef<[f64]>>(
    kinetics: &Kinetics,
    state: &CellState<Y>,
    reaction: usize,
    config: &EquilibriumConfig,
) -> Result<StepEquilibrium, EquilibriumError> {
    let mechanism = kinetics.mechanism();
    let count = mechanism.reactions().len();
    if reaction >= count {
        return Err(EquilibriumError::UnknownReaction {
            index: reaction,
            count,
        });
    }

    let constants = RateConstants::evaluate(mechanism, state.temperature)?;
    let initial = Concentrations::from_mass_fractions(
        mechanism,
        state.density,
        state.mixture.as_slice(),
        NegativeConcentrationPolicy::Clamp,
    )?;

    let model = StepModel::new(mechanism, &constants, reaction, initial.values());
    let [lo, hi] = model.bracket();

    let at_lo = model.at(lo);
    let at_hi = model.at(hi);
    let (solved, iters) = if at_hi.rate >= 0.0 {
        (at_hi, 0)
    } else if at_lo.rate <= 0.0 {
        (at_lo, 0)
    } else {
        let solution = bisection::solve(
            &model,
            &StepProblem,
            [lo, hi],
            &config.bisection(mechanism),
            |_event: &bisection::Event<'_, _, _>| -> Option<bisection::Action> { None },
        )?;

        if solution.status != bisection::Status::Converged {
            return Err(EquilibriumError::MaxIters {
                residual: mole_per_cubic_meter_second(
                    solution.residual.abs() * mechanism.si_rate_factor(),
                ),
                iters: solution.iters,
            });
        }
        (solution.snapshot.output, solution.iters)
    };

    debug!(
        "reaction {:?} equilibrium: extent {:e} after {iters} iterations in [{lo:e}, {hi:e}]",
        mechanism.reactions()[reaction].name(),
        solved.extent,
    );
    Ok(into_equilibrium(kinetics, state, reaction, solved, iters))
}

fn into_equilibrium<Y: AsRef<[f64]>>(
    kinetics: &Kinetics,
    state: &CellState<Y>,
    reaction: usize,
    solved: ExtentState,
    iters: usize,
) -> StepEquilibrium {
    let mechanism = kinetics.mechanism();
    let basis = mechanism.concentration_basis();
    let rho = state.density.get::<kilogram_per_cubic_meter>();

    let mass_fractions = solved
        .concentrations
        .iter()
        .zip(mechanism.species())
        .map(|(c, s)| c * basis.mole_per_cubic_meter() * s.molar_mass_si() / rho)
        .collect();

    StepEquilibrium {
        reaction,
        extent: basis.concentration(solved.extent),
        concentrations: solved
            .concentrations
            .iter()
            .map(|&c| basis.concentration(c))
            .collect(),
        mass_fractions,
        iters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::molar_concentration::mole_per_liter;

    use crate::{
        models::reaction::transesterification::core::{
            EvaluationOptions, KineticsError, Mechanism,
            test_support::{FEED, MID_CONVERSION, cell},
        },
        support::thermo::{MassFractions, State},
    };

    fn three_step() -> Kinetics {
        Kinetics::new(Mechanism::three_step(), EvaluationOptions::default()).unwrap()
    }

    #[test]
    fn first_step_balances_forward_and_reverse_rates() {
        let kinetics = three_step();
        let state = cell(333.0, 900.0, FEED);
        let eq = equilibrium_extent(&kinetics, &state, 0, &EquilibriumConfig::default()).unwrap();
        assert!(eq.iters > 0);

        let k = kinetics.rate_constants(&state).unwrap();
        let c: Vec<f64> = eq.concentrations.iter().map(|c| c.get::<mole_per_liter>()).collect();
        let forward = k.forward(0) * c[0] * c[1];
        let reverse = k.reverse(0).unwrap() * c[2] * c[4];
        assert_relative_eq!(forward, reverse, max_relative = 1e-6);

        // One mole of DG and FAME per mole of TG consumed.
        let xi = eq.extent.get::<mole_per_liter>();
        assert!(xi > 0.0);
        assert_relative_eq!(c[2], xi, max_relative = 1e-12);
        assert_relative_eq!(c[4], xi, max_relative = 1e-12);
        assert_relative_eq!(c[0], 900.0 * 0.75 / 0.885_43 / 1000.0 - xi, max_relative = 1e-12);

        // Mass is conserved and the engine agrees the step is at rest.
        assert_relative_eq!(eq.mass_fractions.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        let at_rest = State::new(state.temperature, state.density, MassFractions::new(eq.mass_fractions));
        let r = kinetics.net_rates(&at_rest).unwrap();
        assert!(r.get(0).unwrap().abs() <= 1e-6 * forward);
    }

    #[test]
    fn runs_backward_when_products_dominate() {
        let kinetics = three_step();
        let state = cell(333.0, 900.0, [0.01, 0.01, 0.4, 0.0, 0.58, 0.0]);
        let eq = equilibrium_extent(&kinetics, &state, 0, &EquilibriumConfig::default()).unwrap();
        assert!(eq.extent.get::<mole_per_liter>() < 0.0);
    }

    #[test]
    fn irreversible_step_runs_to_depletion() {
        let kinetics =
            Kinetics::new(Mechanism::single_step(), EvaluationOptions::default()).unwrap();
        let state = cell(333.0, 880.0, [0.95, 0.05, 0.0, 0.0]);
        let eq = equilibrium_extent(&kinetics, &state, 0, &EquilibriumConfig::default()).unwrap();

        // Methanol is limiting: 3 mol per mole of TG.
        assert_eq!(eq.iters, 0);
        assert!(eq.mass_fractions[1].abs() < 1e-12);
        assert!(eq.mass_fractions[0] > 0.0);
        assert_relative_eq!(eq.mass_fractions.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn absent_species_leave_the_step_at_rest() {
        let kinetics = three_step();
        // Step 3 needs MG or GL and FAME; none are present.
        let state = cell(333.0, 900.0, FEED);
        let eq = equilibrium_extent(&kinetics, &state, 2, &EquilibriumConfig::default()).unwrap();
        assert_eq!(eq.extent.value, 0.0);
        assert_eq!(eq.iters, 0);
    }

    #[test]
    fn every_step_of_a_mixed_state_converges() {
        let kinetics = three_step();
        let state = cell(338.0, 900.0, MID_CONVERSION);
        for j in 0..3 {
            let eq = equilibrium_extent(&kinetics, &state, j, &EquilibriumConfig::default()).unwrap();
            let r = kinetics
                .net_rates(&State::new(
                    state.temperature,
                    state.density,
                    MassFractions::new(eq.mass_fractions),
                ))
                .unwrap();
            let initial = kinetics.net_rates(&state).unwrap();
            assert!(r.get(j).unwrap().abs() < 1e-6 * initial.get(j).unwrap().abs());
        }
    }

    #[test]
    fn rejects_unknown_reactions_and_bad_states() {
        let kinetics = three_step();
        let config = EquilibriumConfig::default();
        assert!(matches!(
            equilibrium_extent(&kinetics, &cell(333.0, 900.0, FEED), 3, &config),
            Err(EquilibriumError::UnknownReaction { index: 3, count: 3 })
        ));
        assert!(matches!(
            equilibrium_extent(&kinetics, &cell(-1.0, 900.0, FEED), 0, &config),
            Err(EquilibriumError::Kinetics(KineticsError::Domain { .. }))
        ));
    }
}
