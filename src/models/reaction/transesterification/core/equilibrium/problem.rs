//! Problem formulation for the step equilibrium search.

use std::convert::Infallible;

use twine_core::{EquationProblem, Model};

use crate::models::reaction::transesterification::core::{Mechanism, RateConstants};

/// Concentrations and net rate of one reaction at a given extent.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ExtentState {
    pub(super) extent: f64,
    pub(super) concentrations: Vec<f64>,
    pub(super) rate: f64,
}

/// Advances one reaction by an extent from fixed initial concentrations.
///
/// Extents and concentrations are in the mechanism's concentration basis.
pub(super) struct StepModel<'a> {
    mechanism: &'a Mechanism,
    constants: &'a RateConstants,
    reaction: usize,
    initial: &'a [f64],
}

impl<'a> StepModel<'a> {
    pub(super) fn new(
        mechanism: &'a Mechanism,
        constants: &'a RateConstants,
        reaction: usize,
        initial: &'a [f64],
    ) -> Self {
        Self {
            mechanism,
            constants,
            reaction,
            initial,
        }
    }

    /// Evaluates the reaction at an extent.
    ///
    /// Concentrations are floored at zero to absorb rounding at the ends of
    /// the feasible bracket.
    pub(super) fn at(&self, extent: f64) -> ExtentState {
        let row = self.mechanism.stoichiometry().row(self.reaction);
        let concentrations: Vec<f64> = self
            .initial
            .iter()
            .zip(row)
            .map(|(c, nu)| (c + nu * extent).max(0.0))
            .collect();

        let r = &self.mechanism.reactions()[self.reaction];
        let forward =
            self.constants.forward(self.reaction) * r.forward().concentration_product(&concentrations);
        let reverse = match (r.reverse(), self.constants.reverse(self.reaction)) {
            (Some(law), Some(kr)) => kr * law.concentration_product(&concentrations),
            _ => 0.0,
        };

        ExtentState {
            extent,
            concentrations,
            rate: forward - reverse,
        }
    }

    /// Returns the extents at which the first reactant or product runs out.
    pub(super) fn bracket(&self) -> [f64; 2] {
        let row = self.mechanism.stoichiometry().row(self.reaction);
        let limit = |sign: f64| {
            self.initial
                .iter()
                .zip(row)
                .filter(|&(_, nu)| nu * sign < 0.0)
                .map(|(c, nu)| c / nu.abs())
                .fold(f64::INFINITY, f64::min)
        };
        [-limit(-1.0), limit(1.0)]
    }
}

impl Model for StepModel<'_> {
    type Input = f64;
    type Output = ExtentState;
    type Error = Infallible;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        Ok(self.at(*input))
    }
}

/// Equation problem whose residual is the net rate of the reaction.
pub(super) struct StepProblem;

impl EquationProblem<1> for StepProblem {
    type Input = f64;
    type Output = ExtentState;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(x[0])
    }

    fn residuals(&self, _input: &Self::Input, output: &Self::Output) -> Result<[f64; 1], Self::Error> {
        Ok([output.rate])
    }
}
