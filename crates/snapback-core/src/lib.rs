//! # Snapback Core Library
//!
//! A thermodynamics engine for designing snapback PCR primers: primers carrying a
//! self-complementary 5′ tail that, once extended, folds into a hairpin across a
//! single-nucleotide variant (SNV) so that the hairpin melts at measurably different
//! temperatures for the wild-type and variant alleles.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict layering so that each piece can be tested on its own.
//!
//! - **[`core`]: The Foundation.** Stateless sequence and variant utilities, the literal
//!   nearest-neighbor reference tables, and the van't Hoff melting-temperature calculator.
//!
//! - **[`gateway`]: The Thermodynamics Capability.** The [`gateway::ThermoGateway`] trait
//!   isolating the remote duplex-thermodynamics predictor, its response parsers, an HTTP
//!   client, and a deterministic local implementation backed by the reference tables.
//!
//! - **[`engine`]: The Logic Core.** Design configuration, error taxonomy, progress
//!   reporting, and the stem-search algorithms (strand choice, tail-base choice, stem
//!   growth, primer assembly, and melting-temperature difference reporting).
//!
//! - **[`workflows`]: The Public API.** [`workflows::design::create_snapback`] validates a
//!   design request and composes the engine into a complete [`workflows::design::SnapbackDesign`].

pub mod core;
pub mod engine;
pub mod gateway;
pub mod workflows;
