//! Public Twine models.
//!
//! Models are grouped by domain; chemistry lives under [`reaction`].
//!
//! Each model keeps its computation in an internal `core` submodule and
//! exposes it through a thin [`twine_core::Model`] adapter.
//! The engine types a CFD host needs directly (mechanism, kinetics, source
//! terms) are re-exported next to the adapter, so the `core` path itself
//! never appears in the public API.

pub mod reaction;
