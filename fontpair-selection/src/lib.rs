//! Selection model for the fontpair playground.
//!
//! This crate provides:
//! - `Role` and the per-role `RoleSettings` (font id, weight, size)
//! - `SelectionState`, the three-role unit of "current design", with the
//!   single-field update operation and closest-weight snapping
//! - Preset matching (`preset::equals`, `preset::pick_random`) and the
//!   built-in preset list
//! - `SelectionStore`, which owns the live state and notifies observers on
//!   every transition

pub mod error;
pub mod preset;
pub mod role;
pub mod state;
pub mod store;

pub use error::SelectionError;
pub use preset::{Preset, Randomizer, builtin_presets};
pub use role::Role;
pub use state::{FieldUpdate, RoleSettings, SelectionState, resolve_weight};
pub use store::{SelectionObserver, SelectionStore, SubscriptionId};
