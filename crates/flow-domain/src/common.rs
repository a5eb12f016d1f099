//! Shared traits for finance primitives.

use uuid::Uuid;

/// Exposes a stable identifier for entities held by the store.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}
