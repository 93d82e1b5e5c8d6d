use crate::core::models::system::{ModelError, MolecularSystem};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading molecular file formats.
///
/// Implementors parse one structure (topology plus a single coordinate frame); multi-frame
/// systems are assembled by appending the frames of further files that share the topology.
pub trait MolecularFile {
    /// The error type for I/O and parsing failures.
    type Error: Error + From<io::Error> + From<ModelError>;

    /// Reads a molecular system from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<MolecularSystem, Self::Error>;

    /// Reads a molecular system from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<MolecularSystem, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Reads `topology_path` and appends the coordinates of every `frame_paths` entry as
    /// additional frames, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if any file fails to parse or holds a different number of atoms
    /// than the topology.
    fn read_trajectory<P: AsRef<Path>, Q: AsRef<Path>>(
        topology_path: P,
        frame_paths: &[Q],
    ) -> Result<MolecularSystem, Self::Error> {
        let mut system = Self::read_from_path(topology_path)?;
        for path in frame_paths {
            let frame_system = Self::read_from_path(path)?;
            system.append_frames_from(&frame_system)?;
        }
        Ok(system)
    }
}
