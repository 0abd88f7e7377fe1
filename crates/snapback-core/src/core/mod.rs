//! # Core Module
//!
//! Stateless building blocks shared by every other layer.
//!
//! - **Sequences** ([`sequence`]) - Validation and base-wise transforms on raw DNA strings
//! - **Variants** ([`variant`]) - SNV sites and generic mismatch descriptors
//! - **Thermodynamic tables** ([`thermo`]) - Nearest-neighbor, dangling-end, terminal-mismatch
//!   and hairpin-loop parameter sets
//! - **Melting temperature** ([`melting`]) - The van't Hoff solver and snapback hairpin Tm
//! - **Constants** ([`constants`]) - Design limits shared by the calculator and the engine

pub mod constants;
pub mod melting;
pub mod sequence;
pub mod thermo;
pub mod variant;
