//! Subway arrival board.
//!
//! Polls the Kakao place endpoint for one subway station and keeps the
//! latest arrivals in each direction available to consumers, even while a
//! refresh is in flight or the upstream API is failing.

pub mod accessor;
pub mod config;
pub mod domain;
pub mod kakao;
pub mod refresh;
pub mod sensor;
pub mod web;
