use crate::core::units::Area;
use crate::engine::config::SasaOptions;
use crate::engine::context::AnalysisContext;
use crate::engine::error::EngineError;
use crate::engine::labels::{ElementLabel, LabeledSeries};
use crate::toolkit::provider::{FrameSelection, SasaArray, StructureProvider, Target};
use crate::toolkit::selection::Selection;
use ndarray::{Array2, Axis};
use tracing::{debug, info, instrument};

/// Fraction of each element's isolated surface that the partner covers, per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct BuriedFactors {
    pub receptor: LabeledSeries<f64>,
    pub ligand: LabeledSeries<f64>,
}

/// Per-frame SASA of the elements covered by `options.selection`.
#[instrument(skip_all, name = "sasa_workflow")]
pub fn sasa<P: StructureProvider>(
    context: &AnalysisContext<P>,
    item: &P::Handle,
    options: &SasaOptions,
) -> Result<SasaArray, EngineError> {
    let selection = Selection::parse(&options.selection, options.syntax)?;
    debug!(selection = %selection, target = %options.target, "Computing SASA.");
    Ok(context
        .provider
        .sasa(item, &selection, &options.frames, options.target)?)
}

/// Buried factor of every receptor and ligand element at granularity `target`.
///
/// Each side is extracted into its own structure and its SASA compared with the SASA of the
/// same elements inside the complex. Elements with no isolated surface get a factor of 0.
#[instrument(skip_all, name = "buried_factors_workflow")]
pub fn buried_factors<P: StructureProvider>(
    context: &AnalysisContext<P>,
    item: &P::Handle,
    receptor: &Selection,
    ligand: &Selection,
    target: Target,
) -> Result<BuriedFactors, EngineError> {
    let provider = context.provider;
    info!(target = %target, "Computing buried factors.");

    let complex = context
        .reporter
        .stage("Complex SASA", || {
            provider.sasa(item, &Selection::All, &FrameSelection::All, target)
        })?;

    let receptor = side_factors(context, item, receptor, target, &complex, Side::Receptor)?;
    let ligand = side_factors(context, item, ligand, target, &complex, Side::Ligand)?;

    Ok(BuriedFactors { receptor, ligand })
}

/// Per-frame buried SASA of the interface: `receptor + ligand - complex`, from atom-level
/// areas.
#[instrument(skip_all, name = "sasa_buried_workflow")]
pub fn sasa_buried<P: StructureProvider>(
    context: &AnalysisContext<P>,
    item: &P::Handle,
    receptor: &Selection,
    ligand: &Selection,
) -> Result<Vec<Area>, EngineError> {
    let provider = context.provider;

    let complex = context.reporter.stage("Complex SASA", || {
        provider.sasa(item, &Selection::All, &FrameSelection::All, Target::Atom)
    })?;
    let unit = complex.unit;
    let total = |array: &SasaArray| array.to(unit).values.sum_axis(Axis(1));

    let receptor_item = provider.extract(item, receptor)?;
    let receptor_sasa = context.reporter.stage("Receptor SASA", || {
        provider.sasa(&receptor_item, &Selection::All, &FrameSelection::All, Target::Atom)
    })?;
    let ligand_item = provider.extract(item, ligand)?;
    let ligand_sasa = context.reporter.stage("Ligand SASA", || {
        provider.sasa(&ligand_item, &Selection::All, &FrameSelection::All, Target::Atom)
    })?;

    check_frames(&complex, &receptor_sasa, "receptor SASA frames")?;
    check_frames(&complex, &ligand_sasa, "ligand SASA frames")?;

    let buried = total(&receptor_sasa) + total(&ligand_sasa) - total(&complex);
    info!(frames = buried.len(), "Buried SASA computed.");
    Ok(buried.iter().map(|&value| Area::new(value, unit)).collect())
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Receptor,
    Ligand,
}

impl Side {
    fn stage_name(self) -> &'static str {
        match self {
            Side::Receptor => "Receptor SASA",
            Side::Ligand => "Ligand SASA",
        }
    }

    fn mapping_context(self) -> &'static str {
        match self {
            Side::Receptor => "receptor element mapping",
            Side::Ligand => "ligand element mapping",
        }
    }

    fn frames_context(self) -> &'static str {
        match self {
            Side::Receptor => "receptor SASA frames",
            Side::Ligand => "ligand SASA frames",
        }
    }

    fn labels_context(self) -> &'static str {
        match self {
            Side::Receptor => "receptor labels",
            Side::Ligand => "ligand labels",
        }
    }
}

fn side_factors<P: StructureProvider>(
    context: &AnalysisContext<P>,
    item: &P::Handle,
    selection: &Selection,
    target: Target,
    complex: &SasaArray,
    side: Side,
) -> Result<LabeledSeries<f64>, EngineError> {
    let provider = context.provider;

    let isolated_item = provider.extract(item, selection)?;
    let isolated = context
        .reporter
        .stage(side.stage_name(), || {
            provider.sasa(&isolated_item, &Selection::All, &FrameSelection::All, target)
        })?
        .to(complex.unit);

    // Isolated element k corresponds to complex element mapping[k].
    let mapping = provider.get_indices(item, selection, target)?;
    if mapping.len() != isolated.n_elements() {
        return Err(EngineError::ShapeMismatch {
            context: side.mapping_context(),
            expected: isolated.n_elements(),
            found: mapping.len(),
        });
    }
    if let Some(&out_of_range) = mapping.iter().find(|&&m| m >= complex.n_elements()) {
        return Err(EngineError::ShapeMismatch {
            context: side.mapping_context(),
            expected: complex.n_elements(),
            found: out_of_range,
        });
    }
    check_frames(complex, &isolated, side.frames_context())?;

    let values = Array2::from_shape_fn((isolated.n_frames(), mapping.len()), |(frame, k)| {
        let alone = isolated.values[[frame, k]];
        if alone > 0.0 {
            (alone - complex.values[[frame, mapping[k]]]) / alone
        } else {
            0.0
        }
    });
    debug!(
        side = ?side,
        elements = mapping.len(),
        frames = values.nrows(),
        "Buried factors computed."
    );

    let labels = ElementLabel::zip(
        &mapping,
        provider.labels(item, target, &mapping)?,
        side.labels_context(),
    )?;
    Ok(LabeledSeries::new(labels, values)?)
}

fn check_frames(
    complex: &SasaArray,
    isolated: &SasaArray,
    context: &'static str,
) -> Result<(), EngineError> {
    if complex.n_frames() != isolated.n_frames() {
        return Err(EngineError::ShapeMismatch {
            context,
            expected: complex.n_frames(),
            found: isolated.n_frames(),
        });
    }
    Ok(())
}
