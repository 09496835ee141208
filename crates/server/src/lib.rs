//! Vertebra CMS server library.
//!
//! Public blog, admin panel, and the stores behind them. Exposed as a library
//! so the CLI and router tests can reuse it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
