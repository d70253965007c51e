use crate::core::faces;
use crate::core::models::residue::Residue;
use crate::core::models::structure::Structure;
use crate::core::utils::geometry::distance;
use crate::engine::config::AnnotationConfig;
use crate::engine::error::EngineError;
use crate::engine::labels::AnnotationMask;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::relation::Relation;
use itertools::Itertools;
use nalgebra::Point3;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone)]
pub struct AnnotationResult {
    /// Relations in residue-pair order, each oriented from the earlier residue
    /// to the later one.
    pub relations: Vec<Relation>,
    /// Number of pairs that passed the neighbor prefilter and were annotated.
    pub pairs_examined: usize,
}

/// Point used to prefilter residue pairs: the reference-frame origin, or the
/// atom centroid when no frame can be built.
fn anchor(residue: &Residue) -> Option<Point3<f64>> {
    residue
        .reference_frame()
        .map(|frame| Point3::from(frame.translation.vector))
        .ok()
        .or_else(|| residue.centroid())
}

/// Annotates every unordered residue pair of a structure.
///
/// # Arguments
///
/// * `structure` - The residues to annotate; pairs are visited in insertion order.
/// * `config` - Analyses to run, their cutoffs and the neighbor prefilter.
/// * `reporter` - Receives progress events; may be called from worker threads.
///
/// # Return
///
/// The relations that carry at least one label (or every examined relation
/// when `keep_empty` is set), together with the number of pairs examined.
///
/// # Errors
///
/// Returns [`EngineError::Config`] when the criteria are inconsistent.
#[instrument(skip_all, name = "annotation_workflow", fields(residues = structure.len()))]
pub fn run(
    structure: &Structure,
    config: &AnnotationConfig,
    reporter: &ProgressReporter,
) -> Result<AnnotationResult, EngineError> {
    config.criteria.validate()?;
    faces::initialize();

    let residues: Vec<(&Residue, Option<Point3<f64>>)> = structure
        .residues_iter()
        .map(|(_, residue)| (residue, anchor(residue)))
        .collect();

    let pairs: Vec<(&Residue, &Residue)> = residues
        .iter()
        .tuple_combinations()
        .filter(|((_, a), (_, b))| match (config.neighbor_cutoff, a, b) {
            (Some(cutoff), Some(a), Some(b)) => distance(a, b) <= cutoff,
            _ => true,
        })
        .map(|((a, _), (b, _))| (*a, *b))
        .collect();

    info!(
        pairs = pairs.len(),
        mask = ?config.mask,
        "Annotating residue pairs."
    );
    reporter.report(Progress::ScanStart {
        total_pairs: pairs.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = pairs.iter();

    #[cfg(feature = "parallel")]
    let iterator = pairs.par_iter();

    let relations: Vec<Relation> = iterator
        .filter_map(|&(reference, residue)| {
            let mut relation = Relation::new(reference.id(), residue.id());
            let labelled =
                relation.annotate_residues(reference, residue, config.mask, &config.criteria);
            reporter.report(Progress::PairExamined);
            if labelled {
                reporter.report(Progress::RelationFound {
                    reference: relation.reference(),
                    residue: relation.residue(),
                    labels: relation.labels().len(),
                });
            }
            (labelled || config.keep_empty).then_some(relation)
        })
        .collect();

    reporter.report(Progress::ScanFinish {
        relations: relations.len(),
    });

    let paired = relations
        .iter()
        .filter(|r| r.mask().contains(AnnotationMask::PAIRING))
        .count();
    debug!(paired, "Pairing relations found.");
    info!(
        relations = relations.len(),
        pairs_examined = pairs.len(),
        "Annotation complete."
    );

    Ok(AnnotationResult {
        relations,
        pairs_examined: pairs.len(),
    })
}
