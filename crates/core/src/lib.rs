//! Vertebra Core - Shared domain types.
//!
//! This crate provides the types shared by the Vertebra components:
//! - `server` - Public blog and admin panel
//! - `cli` - Operator commands (account management, seeding)
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids plus validated usernames and slugs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
