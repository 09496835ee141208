//! Domain models for the CMS.
//!
//! These are validated domain objects, separate from database row types.

pub mod account;
pub mod post;
pub mod session;

pub use account::Account;
pub use post::{NewPost, Post, PostValidationError};
pub use session::{CurrentAdmin, keys as session_keys};
