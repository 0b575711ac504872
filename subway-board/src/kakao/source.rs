//! The seam between the refresh core and the network.

use std::future::Future;

use crate::domain::StationId;

use super::error::FetchError;

/// Something that can fetch the raw place document for a station.
///
/// Implementations perform exactly one request per call and never retry.
/// Transport failures and non-success statuses are reported as
/// network-class [`FetchError`]s; the body is returned unparsed.
pub trait ArrivalSource: Send + Sync {
    fn fetch(&self, station: &StationId) -> impl Future<Output = Result<String, FetchError>> + Send;
}
