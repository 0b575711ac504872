//! Kakao place API client.
//!
//! The mobile place endpoint returns a large JSON document describing a
//! place. For subway stations it includes `basicInfo.timeInfo`, holding the
//! next arrivals in each direction:
//! - `upTimeInfo` / `downTimeInfo` are ordered lists, soonest first
//! - each item carries `endStationName` and `afterMinute`
//! - either list may be missing (terminus, off-hours)

mod client;
mod convert;
mod error;
mod mock;
mod source;
mod types;

pub use client::{KakaoClient, KakaoConfig};
pub use convert::{ParsedArrivals, parse_document};
pub use error::{FailureKind, FetchError};
pub use mock::{MockArrivalSource, MockResponse};
pub use source::ArrivalSource;
pub use types::{AfterMinute, TimeInfo, TimeInfoItem};
