//! Sidebar navigation: entries partitioned into Pinned, Sorted and Hidden
//! zones, reordered by pointer drags and persisted in a key-value store.

pub mod config;
pub mod drag;
pub mod entry;
pub mod events;
pub mod manager;
pub mod ordering;
pub mod persistence;
pub mod selection;
pub mod store;
pub mod surface;
pub mod zones;

#[cfg(test)]
mod test_support;

pub use config::SidebarConfig;
pub use drag::{DragState, DropOutcome};
pub use entry::{Entry, EntryId, IconRef, NoContent, PanelContent};
pub use events::{PointerEvent, RegistryEvent, SidebarEvent};
pub use manager::NavigationManager;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};
pub use surface::{RenderSurface, SurfaceError, VisibleButton};
pub use zones::{FeatureFlags, Zone};
