//! # Twine Transesterification
//!
//! Reaction kinetics and CFD source terms for biodiesel transesterification,
//! built for [Twine](https://github.com/isentropic-dev/twine).
//!
//! Given the temperature, density, and species mass fractions of a cell, the
//! crate returns the volumetric mass source of every species, its derivative
//! with respect to the species' own mass fraction, and the reaction heat
//! source, ready to be handed to a flow solver's transport equations.
//!
//! ## Crate layout
//!
//! - [`models`]: The kinetics engine and its [`twine_core::Model`] adapter.
//! - [`support`]: Numeric constraints, unit aliases, and the cell state type.
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`] facade: `info` when an engine is
//! built or a zone is seeded, `debug` for mechanism validation and solver
//! summaries, and `trace` for per-cell clamping of negative mass fractions.
//! The host application chooses the logger.

pub mod models;
pub mod support;
