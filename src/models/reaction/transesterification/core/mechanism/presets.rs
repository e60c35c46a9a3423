//! Built-in transesterification mechanisms.
//!
//! Molar masses use triolein as the triglyceride and methyl oleate as the
//! ester, with the intermediate glycerides chosen so that every step balances
//! mass exactly.

use std::collections::BTreeMap;

use super::{
    ConcentrationBasis, MechanismConfig, RateLawConfig, ReactionConfig, SpeciesConfig, TimeBasis,
};

/// Species names used by the presets.
pub mod names {
    pub const TG: &str = "TG";
    pub const MEOH: &str = "MeOH";
    pub const DG: &str = "DG";
    pub const MG: &str = "MG";
    pub const FAME: &str = "FAME";
    pub const GL: &str = "GL";
}

use names::{DG, FAME, GL, MEOH, MG, TG};

const MW_TG: f64 = 0.885_43;
const MW_MEOH: f64 = 0.032_04;
const MW_DG: f64 = 0.620_98;
const MW_MG: f64 = 0.356_53;
const MW_FAME: f64 = 0.296_49;
const MW_GL: f64 = 0.092_08;

impl MechanismConfig {
    /// Three-step reversible chain `TG ⇄ DG ⇄ MG ⇄ GL`, one FAME per step.
    ///
    /// Species order: TG, MeOH, DG, MG, FAME, GL.
    /// Second-order mass-action rate laws with pre-exponential factors in
    /// L/(mol·s) on a mol/L basis.
    #[must_use]
    pub fn three_step() -> Self {
        Self {
            species: species(&[
                (TG, MW_TG),
                (MEOH, MW_MEOH),
                (DG, MW_DG),
                (MG, MW_MG),
                (FAME, MW_FAME),
                (GL, MW_GL),
            ]),
            reactions: vec![
                reversible_step(
                    "TG + MeOH <=> DG + FAME",
                    TG,
                    DG,
                    [(8.4e4, 55_300.0), (1.6e3, 41_600.0)],
                    -9.0e3,
                ),
                reversible_step(
                    "DG + MeOH <=> MG + FAME",
                    DG,
                    MG,
                    [(5.6e9, 83_100.0), (5.4e6, 61_300.0)],
                    -6.0e3,
                ),
                reversible_step(
                    "MG + MeOH <=> GL + FAME",
                    MG,
                    GL,
                    [(5.6e1, 26_900.0), (1.2e1, 40_100.0)],
                    -3.0e3,
                ),
            ],
            concentration_basis: ConcentrationBasis::MolePerLiter,
            time_basis: TimeBasis::PerSecond,
        }
    }

    /// Single irreversible step `TG + 3 MeOH → 3 FAME + GL`.
    ///
    /// Species order: TG, MeOH, FAME, GL.
    /// The rate law is `k·C_TG·C_MeOH` with `A` in per-minute units and
    /// concentrations on a mol/m³ basis.
    #[must_use]
    pub fn single_step() -> Self {
        Self {
            species: species(&[(TG, MW_TG), (MEOH, MW_MEOH), (FAME, MW_FAME), (GL, MW_GL)]),
            reactions: vec![ReactionConfig {
                name: "TG + 3 MeOH -> 3 FAME + GL".to_owned(),
                stoichiometry: coefficients(&[(TG, -1.0), (MEOH, -3.0), (FAME, 3.0), (GL, 1.0)]),
                forward: RateLawConfig::new(2.98e10, 51_900.0, &[(TG, 1.0), (MEOH, 1.0)]),
                reverse: None,
                enthalpy_j_per_mol: 0.0,
            }],
            concentration_basis: ConcentrationBasis::MolePerCubicMeter,
            time_basis: TimeBasis::PerMinute,
        }
    }
}

fn species(entries: &[(&str, f64)]) -> Vec<SpeciesConfig> {
    entries
        .iter()
        .map(|&(name, molar_mass_kg_per_mol)| SpeciesConfig {
            name: name.to_owned(),
            molar_mass_kg_per_mol,
        })
        .collect()
}

fn coefficients(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries
        .iter()
        .map(|&(name, nu)| (name.to_owned(), nu))
        .collect()
}

/// `glyceride + MeOH <=> next glyceride + FAME` with elementary orders.
fn reversible_step(
    name: &str,
    glyceride: &str,
    next: &str,
    [(a_f, ea_f), (a_r, ea_r)]: [(f64, f64); 2],
    enthalpy_j_per_mol: f64,
) -> ReactionConfig {
    ReactionConfig {
        name: name.to_owned(),
        stoichiometry: coefficients(&[(glyceride, -1.0), (MEOH, -1.0), (next, 1.0), (FAME, 1.0)]),
        forward: RateLawConfig::new(a_f, ea_f, &[(glyceride, 1.0), (MEOH, 1.0)]),
        reverse: Some(RateLawConfig::new(a_r, ea_r, &[(next, 1.0), (FAME, 1.0)])),
        enthalpy_j_per_mol,
    }
}
