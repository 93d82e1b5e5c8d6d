use super::progress::ProgressReporter;
use crate::toolkit::provider::StructureProvider;

/// Binds a structure provider and a progress reporter for a series of workflow calls.
pub struct AnalysisContext<'a, P>
where
    P: StructureProvider,
{
    pub provider: &'a P,
    pub reporter: &'a ProgressReporter<'a>,
}

impl<'a, P> AnalysisContext<'a, P>
where
    P: StructureProvider,
{
    pub fn new(provider: &'a P, reporter: &'a ProgressReporter<'a>) -> Self {
        Self { provider, reporter }
    }
}

impl<P: StructureProvider> Clone for AnalysisContext<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: StructureProvider> Copy for AnalysisContext<'_, P> {}
