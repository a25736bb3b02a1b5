//! Mealshare recipe API service
//!
//! Users publish recipes composed of tagged ingredients with quantities;
//! other users favorite recipes, collect them in a shopping cart, and
//! subscribe to authors. The shopping cart aggregates into a downloadable
//! ingredient report.

pub mod auth;
pub mod error;
pub mod middleware;
pub mod models;
pub mod report;
pub mod repositories;
pub mod routes;
pub mod settings;
pub mod state;
pub mod validation;
