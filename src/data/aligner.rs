//! Dataset alignment
//!
//! Joins the roster (keyed by full name) to historical features (keyed by
//! short code) through the identity map. Training rows are restricted to the
//! common entrants and take their label by short-code lookup; the prediction
//! table keeps every roster entrant and fills missing sectors with the
//! historical cross-driver mean.

use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use crate::data::features::HistoricalFeatures;
use crate::data::identity::IdentityMap;
use crate::data::roster::Roster;
use crate::error::{PredictError, Result};
use crate::models::{
    AlignedTrainingRow, AlignmentSummary, PredictionRow, UpcomingEntrantRow, NUM_SECTORS,
};

/// Roster entrant after the left join, sectors None where history is absent
#[derive(Debug, Clone)]
pub struct JoinedRow {
    pub entrant: UpcomingEntrantRow,
    pub sector_means: [Option<f64>; NUM_SECTORS],
}

/// Output of alignment: training table, prediction table, and coverage summary
#[derive(Debug, Clone)]
pub struct AlignedDataset {
    pub training: Vec<AlignedTrainingRow>,
    pub prediction: Vec<PredictionRow>,
    pub summary: AlignmentSummary,
}

/// Left join of reconciled roster rows onto historical features
pub fn left_join(entrants: Vec<UpcomingEntrantRow>, features: &HistoricalFeatures) -> Vec<JoinedRow> {
    entrants
        .into_iter()
        .map(|entrant| {
            let sector_means = entrant
                .code
                .as_deref()
                .and_then(|code| features.get(code))
                .map(|row| row.sector_means.map(Some))
                .unwrap_or([None; NUM_SECTORS]);
            JoinedRow {
                entrant,
                sector_means,
            }
        })
        .collect()
}

/// Short codes present both in history and in the reconciled roster
pub fn common_entrants(joined: &[JoinedRow], features: &HistoricalFeatures) -> BTreeSet<String> {
    joined
        .iter()
        .filter_map(|j| j.entrant.code.as_deref())
        .filter(|code| features.contains(code))
        .map(str::to_string)
        .collect()
}

/// Reconcile, join, restrict and impute
///
/// Fails with `FeatureFallbackExhausted` when no historical driver survived
/// extraction, since there is then no mean to impute from.
pub fn align(
    roster: Roster,
    identity: &IdentityMap,
    features: &HistoricalFeatures,
) -> Result<AlignedDataset> {
    let fallback = features
        .sector_averages()
        .ok_or_else(|| PredictError::FeatureFallbackExhausted {
            total_records: features.summary().total_records,
            discarded: features.summary().discarded_records,
        })?;

    let mut entrants = roster.into_entries();
    let unmapped = identity.reconcile(&mut entrants);
    for name in &unmapped {
        warn!("No driver code mapping for {}; excluded from training", name);
    }

    let reachable = identity.codes();
    for code in features.codes().filter(|code| !reachable.contains(code)) {
        debug!("Historical driver {} has no full-name mapping", code);
    }

    let joined = left_join(entrants, features);
    let common = common_entrants(&joined, features);
    for code in &common {
        let names = identity.names_for(code);
        if names.len() > 1 {
            warn!("Driver code {} is mapped from several names: {:?}", code, names);
        }
    }
    info!(
        "Training on {} common driver(s): {:?}",
        common.len(),
        common
    );

    let training = training_rows(&joined, &common, features);

    let mut imputed = Vec::new();
    let prediction: Vec<PredictionRow> = joined
        .into_iter()
        .map(|row| {
            let was_imputed = row.sector_means.iter().any(Option::is_none);
            if was_imputed {
                debug!("Imputing sector means for {}", row.entrant.driver);
                imputed.push(row.entrant.driver.clone());
            }
            let mut sector_means = fallback;
            for (slot, value) in sector_means.iter_mut().zip(row.sector_means) {
                if let Some(v) = value {
                    *slot = v;
                }
            }
            PredictionRow {
                driver: row.entrant.driver,
                code: row.entrant.code,
                qualifying_time: row.entrant.qualifying_time,
                sector_means,
                imputed: was_imputed,
            }
        })
        .collect();

    Ok(AlignedDataset {
        training,
        prediction,
        summary: AlignmentSummary {
            unmapped,
            imputed,
            common_entrants: common.into_iter().collect(),
        },
    })
}

/// Training rows for common entrants, in roster order
///
/// The label is looked up by short code, never by row position.
fn training_rows(
    joined: &[JoinedRow],
    common: &BTreeSet<String>,
    features: &HistoricalFeatures,
) -> Vec<AlignedTrainingRow> {
    joined
        .iter()
        .filter_map(|row| {
            let code = row.entrant.code.as_deref()?;
            if !common.contains(code) {
                return None;
            }
            let history = features.get(code)?;
            let label = features.label(code)?;
            Some(AlignedTrainingRow {
                driver: row.entrant.driver.clone(),
                code: code.to_string(),
                qualifying_time: row.entrant.qualifying_time,
                sector_means: history.sector_means,
                label,
            })
        })
        .collect()
}
