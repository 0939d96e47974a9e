//! The seam between confidence data and a molecular viewer.
//!
//! Rendering is delegated to a third-party viewer. Callers receive a [`StructureRenderer`]
//! by injection and never reach for a global viewer object.

pub mod palette;

use crate::core::io::traits::StructureFormat;
use crate::core::models::confidence::ConfidenceSummary;

/// How a loaded structure is coloured.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Colouring {
    /// Rainbow along the chain, for structures without meaningful B-factors.
    #[default]
    Spectrum,
    /// AlphaFold pLDDT palette keyed on the B-factor column, with a legend built from the
    /// given summary.
    Confidence(ConfidenceSummary),
}

/// Viewport dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 960,
            height: 600,
        }
    }
}

/// A viewer able to display a structure from its raw text.
pub trait StructureRenderer {
    /// Opaque reference to a displayed structure.
    type Handle;

    type Error: std::error::Error;

    /// Loads a structure and returns a handle to the display.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is empty or the display cannot be produced.
    fn load(
        &mut self,
        format: StructureFormat,
        text: &str,
        colouring: &Colouring,
    ) -> Result<Self::Handle, Self::Error>;

    /// Changes the size of an existing display.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is unknown to this renderer or the display cannot
    /// be updated.
    fn resize(&mut self, handle: &Self::Handle, viewport: Viewport) -> Result<(), Self::Error>;
}
