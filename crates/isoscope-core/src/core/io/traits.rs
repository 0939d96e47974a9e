use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

/// Text formats a structure payload may arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureFormat {
    Pdb,
    Cif,
}

impl StructureFormat {
    /// The format tag molecular viewers expect (`"pdb"` or `"cif"`).
    pub fn tag(self) -> &'static str {
        match self {
            StructureFormat::Pdb => "pdb",
            StructureFormat::Cif => "cif",
        }
    }

    /// Guesses the format from a file name or URL. Binary CIF is reported as `Cif`.
    pub fn from_location(location: &str) -> Option<Self> {
        let lower = location.to_ascii_lowercase();
        let path = lower.split(['?', '#']).next().unwrap_or_default();
        if path.ends_with(".pdb") || path.ends_with(".ent") {
            Some(StructureFormat::Pdb)
        } else if path.ends_with(".cif") || path.ends_with(".bcif") || path.ends_with(".mmcif") {
            Some(StructureFormat::Cif)
        } else {
            None
        }
    }
}

impl fmt::Display for StructureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for StructureFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdb" => Ok(StructureFormat::Pdb),
            "cif" | "mmcif" | "bcif" => Ok(StructureFormat::Cif),
            other => Err(format!("Unknown structure format '{}'", other)),
        }
    }
}

/// Defines the interface for reading a structure file format.
///
/// Implementors turn a complete, already-fetched payload into a parsed document. Streaming
/// or incremental parsing is not part of this contract.
pub trait StructureFile {
    /// The parsed representation produced by this format.
    type Document;

    /// The error type for read operations.
    type Error: Error + From<io::Error>;

    /// The format this implementation reads.
    fn format() -> StructureFormat;

    /// Reads a document from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be read or is unusable.
    fn read_from(reader: &mut impl BufRead) -> Result<Self::Document, Self::Error>;

    /// Reads a document from an in-memory payload.
    fn read_from_str(text: &str) -> Result<Self::Document, Self::Error> {
        let mut reader = io::Cursor::new(text.as_bytes());
        Self::read_from(&mut reader)
    }

    /// Reads a document from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the payload is unusable.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self::Document, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}
