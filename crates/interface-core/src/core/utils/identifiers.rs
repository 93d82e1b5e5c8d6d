use phf::{Set, phf_set};

/// Name of the atom defining a residue in alpha-carbon contact maps.
pub const ALPHA_CARBON_ATOM_NAME: &str = "CA";

/// Element symbol assigned when neither the force field type nor the name is usable.
pub const UNKNOWN_ELEMENT: &str = "X";

static ELEMENT_SYMBOLS: Set<&'static str> = phf_set! {
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne",
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar", "K", "Ca",
    "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se",
    "Br", "Kr", "Rb", "Sr", "Cd", "I", "Xe", "Cs", "Ba", "Hg",
    "Pt", "Au", "Pb",
};

pub fn is_element_symbol(symbol: &str) -> bool {
    ELEMENT_SYMBOLS.contains(symbol)
}

/// Normalizes a symbol to title case ("CL" -> "Cl").
pub fn normalize_element(symbol: &str) -> String {
    let mut chars = symbol.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Infers the chemical element of an atom.
///
/// Force field types carry the element before the first underscore (`C_3`, `Cl`, `Zn2+`
/// style types are reduced to their leading letters). When the type is empty or not an
/// element, the first letter of the atom name is used, skipping leading digits
/// (`1HB` -> H).
pub fn infer_element(atom_name: &str, force_field_type: &str) -> String {
    let type_prefix: String = force_field_type
        .trim()
        .split('_')
        .next()
        .unwrap_or("")
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    let candidate = normalize_element(&type_prefix);
    if is_element_symbol(&candidate) {
        return candidate;
    }

    atom_name
        .trim()
        .chars()
        .find(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase().to_string())
        .filter(|symbol| is_element_symbol(symbol))
        .unwrap_or_else(|| UNKNOWN_ELEMENT.to_string())
}
