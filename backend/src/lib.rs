//! NutriGen Backend Library
//!
//! HTTP API over PostgreSQL for the NutriGen nutrition tracker. Exposed as a
//! library so integration tests can build the router directly.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
