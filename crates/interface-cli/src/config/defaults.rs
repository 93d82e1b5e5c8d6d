use openinterface::core::units::LengthUnit;
use openinterface::engine::config::{
    ContactType, DEFAULT_COARSE_CUTOFF, DEFAULT_CONTACT_THRESHOLD, DEFAULT_VDW_TOLERANCE,
    FineFilterFrame,
};
use openinterface::toolkit::provider::Target;
use openinterface::toolkit::selection::SelectionSyntax;
use openinterface::toolkit::surface::{DEFAULT_PROBE_RADIUS, DEFAULT_SPHERE_POINTS};

pub struct DefaultsConfig {
    pub syntax: SelectionSyntax,
    pub contact_type: ContactType,
    pub threshold_nm: f64,
    pub sasa_target: Target,
    pub buried_target: Target,
    pub probe_radius: f64,
    pub sphere_points: usize,
    pub coarse_cutoff: f64,
    pub tolerance: f64,
    pub fine_filter_frame: FineFilterFrame,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            syntax: SelectionSyntax::default(),
            contact_type: ContactType::default(),
            threshold_nm: DEFAULT_CONTACT_THRESHOLD.value_in(LengthUnit::Nanometer),
            sasa_target: Target::Group,
            buried_target: Target::Group,
            probe_radius: DEFAULT_PROBE_RADIUS.value_in(LengthUnit::Angstrom),
            sphere_points: DEFAULT_SPHERE_POINTS,
            coarse_cutoff: DEFAULT_COARSE_CUTOFF.value_in(LengthUnit::Angstrom),
            tolerance: DEFAULT_VDW_TOLERANCE.value_in(LengthUnit::Angstrom),
            fine_filter_frame: FineFilterFrame::default(),
        }
    }
}
