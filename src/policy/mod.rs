//! Scope and access policy for events
//!
//! Pure functions deciding at which tier an actor works, what scope a new
//! event gets, and whether an actor may manage an existing event. Callers pass
//! an explicit [`ActorContext`]; nothing here touches storage except through
//! the [`DistrictLookup`] seam.

pub mod access;
pub mod classifier;
pub mod context;
pub mod scope;

pub use access::{can_edit, Scoped};
pub use classifier::{classify, has_management_role};
pub use context::ActorContext;
pub use scope::{resolve_actor_scope, resolve_creation_scope, CreationScope, DistrictLookup};
