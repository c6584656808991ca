//! fxpulse: forex/OTC indicator fusion, sentiment blending and rate-limited
//! signal history.

pub mod common;
pub mod config;
pub mod core;
pub mod display;
pub mod history;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod sentiment;
pub mod services;
pub mod session;
pub mod signals;
