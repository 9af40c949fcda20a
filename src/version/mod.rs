//! Version resolution layer for Minecraft toolchain components
//!
//! This module provides the core functionality for fetching, caching and ordering
//! component versions across upstream sources (Forge, NeoForged Maven, Fabric meta,
//! Parchment, Modrinth).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────▶│   Facade    │────▶│    Cache    │
//! │ (dispatch)  │     │(get-or-fetch│     │  (storage)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Registries  │────▶│  Metadata   │────▶│   Semver    │
//! │(forge,maven)│     │ (XML read)  │     │(version cmp)│
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: SQLite-based key-value store with per-entry expiry
//! - [`catalog`]: Minecraft release catalog from the version manifest
//! - [`compat`]: Minimum-release gate per component
//! - [`facade`]: Read-through caching over a store
//! - [`fallback`]: Candidate releases for sources that lag behind
//! - [`http`]: HTTP fetch abstraction
//! - [`metadata`]: Maven metadata reader
//! - [`registry`]: Source trait and name-to-source dispatch
//! - [`registries`]: Concrete sources (Forge, NeoForge, Fabric, Parchment, Modrinth, ...)
//! - [`error`]: Error types for cache and registry operations
//! - [`semver`]: Version ordering shared by every source
//! - [`types`]: Common types like `VersionRecord`

pub mod cache;
pub mod catalog;
pub mod compat;
pub mod error;
pub mod facade;
pub mod fallback;
pub mod http;
pub mod metadata;
pub mod registries;
pub mod registry;
pub mod semver;
pub mod types;
