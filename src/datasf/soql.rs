//! SoQL query construction for point-in-polygon lookups

use url::Url;

use crate::types::Coordinate;

/// `$where` predicate: the stored polygon contains the point.
///
/// SoQL points are written longitude first.
pub fn contains_point(geometry_column: &str, at: Coordinate) -> String {
    format!(
        "intersects({}, 'POINT({} {})')",
        geometry_column, at.lng, at.lat
    )
}

/// Full request URL asking for at most one containing feature
pub fn containment_url(
    endpoint: &str,
    geometry_column: &str,
    at: Coordinate,
) -> Result<Url, url::ParseError> {
    Url::parse_with_params(
        endpoint,
        &[
            ("$where", contains_point(geometry_column, at)),
            ("$limit", "1".to_string()),
        ],
    )
}
