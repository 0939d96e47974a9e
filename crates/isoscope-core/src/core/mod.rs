//! # Core Module
//!
//! Stateless data models and pure computations shared by every workflow.
//!
//! - **Structure Parsing** ([`io`]) - Reading PDB text and extracting per-atom pLDDT
//! - **Data Models** ([`models`]) - Confidence tiers and summaries, UniProt and AlphaFold schemas
//! - **Utilities** ([`utils`]) - Sequence cleaning/validation and the showcase gene catalog

pub mod io;
pub mod models;
pub mod utils;
