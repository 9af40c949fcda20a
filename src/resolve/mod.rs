//! Resolution layer on top of [`crate::version`]
//!
//! # Modules
//!
//! - [`resolver`]: Single component resolution, compatibility pre-check and project validation
//! - [`aggregate`]: All built-in components plus extra projects for one release
//! - [`matrix`]: Per-loader versions across components and releases

pub mod aggregate;
pub mod matrix;
pub mod resolver;

pub use resolver::{VersionResolver, cache_key};
