//! Provides input functionality for predicted structure files.
//!
//! AlphaFold-family predictors store a per-residue confidence (pLDDT) in the B-factor
//! column of their PDB output. This module reads such files and aggregates those values.

pub mod pdb;
pub mod traits;
