//! Coordinate → parcel, zoning and height/bulk resolution
//!
//! ```text
//! Coordinate
//!     │
//!     ├─► parcels      ─┐
//!     ├─► zoning       ─┼─► merge_zoning (dedicated answer, else parcel's embedded code)
//!     └─► height/bulk  ─┘
//!                          └─► ResolvedFeatures
//! ```

pub mod merge;
pub mod resolver;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Coordinate;

pub use merge::{first_present, merge_zoning};
pub use resolver::Resolver;

/// A dataset that can say which of its features contains a point.
///
/// `Ok(None)` is the normal miss. `Err` means the source failed to settle
/// at all and aborts the resolution.
#[async_trait]
pub trait ContainmentSource<R>: Send + Sync {
    fn dataset(&self) -> &str;

    async fn find_containing(&self, at: Coordinate) -> Result<Option<R>>;
}
