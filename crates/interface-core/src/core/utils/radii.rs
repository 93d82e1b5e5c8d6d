use phf::{Map, phf_map};

/// Bondi van der Waals radii in Angstroms, keyed by title-case element symbol.
static VDW_RADII_ANGSTROM: Map<&'static str, f64> = phf_map! {
    "H" => 1.20, "He" => 1.40,
    "Li" => 1.82, "Be" => 1.53, "B" => 1.92, "C" => 1.70, "N" => 1.55, "O" => 1.52,
    "F" => 1.47, "Ne" => 1.54,
    "Na" => 2.27, "Mg" => 1.73, "Al" => 1.84, "Si" => 2.10, "P" => 1.80, "S" => 1.80,
    "Cl" => 1.75, "Ar" => 1.88,
    "K" => 2.75, "Ca" => 2.31, "Mn" => 1.97, "Fe" => 1.94, "Co" => 1.92, "Ni" => 1.63,
    "Cu" => 1.40, "Zn" => 1.39, "Ga" => 1.87, "Ge" => 2.11, "As" => 1.85, "Se" => 1.90,
    "Br" => 1.85, "Kr" => 2.02,
    "Rb" => 3.03, "Sr" => 2.49, "Cd" => 1.58, "I" => 1.98, "Xe" => 2.16,
    "Cs" => 3.43, "Ba" => 2.68, "Pt" => 1.75, "Au" => 1.66, "Hg" => 1.55, "Pb" => 2.02,
};

/// Returns the tabulated van der Waals radius of `element` in Angstroms.
pub fn vdw_radius_angstrom(element: &str) -> Option<f64> {
    VDW_RADII_ANGSTROM.get(element).copied()
}
