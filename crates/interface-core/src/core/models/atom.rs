use crate::core::utils::identifiers::infer_element;

/// Represents an atom of a molecular system.
///
/// Coordinates are not stored on the atom; they live in the system's frames so that
/// topology is shared across every frame of a trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Zero-based position of the atom in its system.
    pub index: usize,
    /// Serial number from the source file.
    pub serial: usize,
    /// The name of the atom (e.g., "CA", "N", "O").
    pub name: String,
    /// Chemical element symbol, normalized to title case (e.g., "C", "Cl").
    pub element: String,
    /// Position of the parent residue in the system.
    pub residue_index: usize,
    /// Position of the parent chain in the system.
    pub chain_index: usize,
    /// The force field atom type (e.g., "C_3", "N_R").
    pub force_field_type: String,
    /// The partial atomic charge in elementary charge units.
    pub partial_charge: f64,
}

impl Atom {
    /// Creates an atom whose element is inferred from its force field type or name.
    pub fn new(
        index: usize,
        serial: usize,
        name: &str,
        force_field_type: &str,
        residue_index: usize,
        chain_index: usize,
    ) -> Self {
        Self {
            index,
            serial,
            name: name.to_string(),
            element: infer_element(name, force_field_type),
            residue_index,
            chain_index,
            force_field_type: force_field_type.to_string(),
            partial_charge: 0.0,
        }
    }

    pub fn is_hydrogen(&self) -> bool {
        self.element == "H"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_infers_element_from_force_field_type() {
        let atom = Atom::new(0, 1, "CA", "C_3", 0, 0);
        assert_eq!(atom.element, "C");
        assert_eq!(atom.partial_charge, 0.0);
        assert!(!atom.is_hydrogen());
    }

    #[test]
    fn new_atom_falls_back_to_name_when_type_is_missing() {
        let atom = Atom::new(3, 4, "HB1", "", 1, 0);
        assert_eq!(atom.element, "H");
        assert!(atom.is_hydrogen());
        assert_eq!(atom.residue_index, 1);
    }
}
