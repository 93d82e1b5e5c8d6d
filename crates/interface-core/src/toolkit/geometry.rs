use super::error::ToolkitError;
use crate::core::models::system::MolecularSystem;
use crate::core::units::{Length, LengthUnit};
use nalgebra::Point3;
use ndarray::Array3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub(crate) fn check_atom_indices(system: &MolecularSystem, atoms: &[usize]) -> Result<(), ToolkitError> {
    let len = system.n_atoms();
    match atoms.iter().find(|&&i| i >= len) {
        Some(&index) => Err(ToolkitError::IndexOutOfRange {
            kind: "Atom",
            index,
            len,
        }),
        None => Ok(()),
    }
}

/// Evaluates `f` for every (frame, atom of `atoms_1`, atom of `atoms_2`) triple, laid out
/// row-major as `[frame, i, j]`.
fn pairwise_over_frames<T, F>(
    system: &MolecularSystem,
    atoms_1: &[usize],
    atoms_2: &[usize],
    f: F,
) -> Result<Array3<T>, ToolkitError>
where
    T: Send,
    F: Fn(&Point3<f64>, &Point3<f64>) -> T + Sync,
{
    check_atom_indices(system, atoms_1)?;
    check_atom_indices(system, atoms_2)?;

    let n_frames = system.n_frames();
    let evaluate_frame = |frame: usize| -> Vec<T> {
        let coords = system.frame(frame).unwrap_or(&[]);
        let mut values = Vec::with_capacity(atoms_1.len() * atoms_2.len());
        for &i in atoms_1 {
            for &j in atoms_2 {
                values.push(f(&coords[i], &coords[j]));
            }
        }
        values
    };

    #[cfg(feature = "parallel")]
    let per_frame: Vec<Vec<T>> = (0..n_frames).into_par_iter().map(evaluate_frame).collect();

    #[cfg(not(feature = "parallel"))]
    let per_frame: Vec<Vec<T>> = (0..n_frames).map(evaluate_frame).collect();

    let flat: Vec<T> = per_frame.into_iter().flatten().collect();
    Array3::from_shape_vec((n_frames, atoms_1.len(), atoms_2.len()), flat)
        .map_err(|e| ToolkitError::Internal(format!("pairwise tensor shape: {}", e)))
}

/// Euclidean distances in Angstroms, indexed `[frame, i, j]`.
pub fn distance_tensor(
    system: &MolecularSystem,
    atoms_1: &[usize],
    atoms_2: &[usize],
) -> Result<Array3<f64>, ToolkitError> {
    pairwise_over_frames(system, atoms_1, atoms_2, |a, b| nalgebra::distance(a, b))
}

/// Contacts at or below `threshold`, indexed `[frame, i, j]`.
pub fn contact_tensor(
    system: &MolecularSystem,
    atoms_1: &[usize],
    atoms_2: &[usize],
    threshold: Length,
) -> Result<Array3<bool>, ToolkitError> {
    let cutoff = threshold.value_in(LengthUnit::Angstrom);
    let cutoff_sq = cutoff * cutoff;
    pairwise_over_frames(system, atoms_1, atoms_2, |a, b| {
        nalgebra::distance_squared(a, b) <= cutoff_sq
    })
}
