//! Common library for the Mealshare application
//!
//! This crate provides the infrastructure shared by Mealshare services:
//! PostgreSQL connection pooling and the database error types used
//! throughout the workspace.

pub mod database;
pub mod error;
