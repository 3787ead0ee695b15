//! courier-planner core
//!
//! Forecasts cauldron fill rates, computes shortest travel times over the
//! road network, and assigns couriers deadline-aware routes from the market.

pub mod config;
pub mod drain;
pub mod error;
pub mod forecast;
pub mod graph;
pub mod model;
pub mod overflow;
pub mod planner;
pub mod reconcile;
pub mod refresh;
pub mod schedule;
pub mod solver;
pub mod source;
pub mod traits;
