//! Chemical reaction models.
//!
//! This module contains models that turn a local thermodynamic state into
//! chemical source terms for species and energy transport.

pub mod transesterification;
