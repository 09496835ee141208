//! Core types for Vertebra.
//!
//! This module provides type-safe wrappers for the CMS domain concepts.

pub mod id;
pub mod slug;
pub mod username;

pub use id::*;
pub use slug::{Slug, SlugError};
pub use username::{Username, UsernameError};
