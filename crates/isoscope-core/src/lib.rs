//! # Isoscope Core Library
//!
//! Pure building blocks for a protein isoform research tool: confidence extraction from
//! predicted structures, validated schemas for the public services the tool talks to, and
//! the capability interface through which structures are handed to a molecular viewer.
//!
//! ## Architectural Philosophy
//!
//! The library performs no network I/O. Everything that talks to UniProt, the AlphaFold
//! Database, ESMFold or a translation service lives in the command-line crate; this crate
//! only consumes the payloads those services return.
//!
//! - **[`core`]: The Foundation.** Data models (`ConfidenceSummary`, `UniProtEntry`,
//!   `AlphaFoldEntry`), the PDB confidence extractor, and sequence utilities.
//!
//! - **[`render`]: The Viewer Seam.** The `StructureRenderer` trait and the pLDDT palette
//!   used to colour a structure by confidence.
//!
//! - **[`workflows`]: The Public API.** Higher-level procedures built on `core`, such as
//!   gene autocomplete and isoform ranking over already-fetched responses.

pub mod core;
pub mod render;
pub mod workflows;
