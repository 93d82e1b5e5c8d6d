use openinterface::engine::config::{ContactMapConfig, InterfaceCriteria};
use openinterface::toolkit::provider::Target;
use openinterface::toolkit::selection::SelectionSyntax;
use openinterface::toolkit::system::SystemToolkit;

/// Fully resolved settings of one CLI invocation.
pub struct AppConfig {
    pub syntax: SelectionSyntax,
    pub contact_map: ContactMapConfig,
    pub sasa_target: Target,
    pub buried_target: Target,
    pub criteria: InterfaceCriteria,
    pub toolkit: SystemToolkit,
}
