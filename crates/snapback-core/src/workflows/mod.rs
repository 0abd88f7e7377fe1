//! # Workflows Module
//!
//! Top-level entry points. A workflow validates its whole request up front, then drives the
//! engine through its phases while reporting progress, and returns a complete result or the
//! first error encountered.
//!
//! - **Snapback design** ([`design`]) - From an amplicon, primer lengths, an SNV and a target
//!   Tm to a finished snapback primer with its reporting temperatures.

pub mod design;
