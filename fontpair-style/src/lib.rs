//! Style derivation and injection for the fontpair playground.
//!
//! This crate provides:
//! - `derive`: the pure mapping from a selection and a catalog to font-face
//!   rules and per-role style variables
//! - `inject`: the `StyleSurface` seam, an in-memory `Document`, and the
//!   `StyleInjector` that keeps exactly one marked rule block applied
//! - `install`: copyable npm, import, usage and CDN snippets for the
//!   current selection

pub mod derive;
pub mod inject;
pub mod install;

pub use derive::{DEFAULT_CDN_BASE, DerivedStyle, RoleVariables, derive, derive_with_cdn};
pub use inject::{Document, SharedDocument, StyleBlock, StyleInjector, StyleSurface};
pub use install::{InstallSnippets, weight_name};
