//! Reconciling the containment answers
//!
//! The zoning-district dataset and the parcel dataset can disagree on
//! coverage near district boundaries. The dedicated zoning answer always
//! wins; the parcel's embedded zoning is used only when it is absent.

use crate::types::{ParcelRecord, ZoningDistrictRecord};

/// First present candidate, in priority order
pub fn first_present<T>(candidates: impl IntoIterator<Item = Option<T>>) -> Option<T> {
    candidates.into_iter().flatten().next()
}

/// Effective zoning for a point
pub fn merge_zoning(
    dedicated: Option<ZoningDistrictRecord>,
    parcel: Option<&ParcelRecord>,
) -> Option<ZoningDistrictRecord> {
    first_present([dedicated, parcel.and_then(ParcelRecord::embedded_zoning)])
}
