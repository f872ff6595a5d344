use std::fmt;
use std::rc::Rc;

/// Stable identity of a navigation entry. Persisted order and hidden set
/// are keyed by this value, never by the label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identity for registries that cannot supply one. Stored data written
    /// by older shells keyed entries this way.
    pub fn from_label(label: &str) -> Self {
        Self(label.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Opaque icon handle; resolving it to pixels is the presentation layer's job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct IconRef(pub String);

/// Lifecycle hooks of the panel an entry reveals. All hooks are
/// fire-and-forget.
pub trait PanelContent {
    fn on_attach(&self) {}
    fn on_detach(&self) {}
    fn on_activate(&self);
    fn on_deactivate(&self);
}

/// Content with no lifecycle behavior.
pub struct NoContent;

impl PanelContent for NoContent {
    fn on_activate(&self) {}
    fn on_deactivate(&self) {}
}

pub struct Entry {
    pub id: EntryId,
    pub priority: i32,
    pub label: String,
    pub icon: IconRef,
    pub content: Rc<dyn PanelContent>,
}

impl Entry {
    pub fn new(
        id: EntryId,
        priority: i32,
        label: impl Into<String>,
        icon: IconRef,
        content: Rc<dyn PanelContent>,
    ) -> Self {
        let label = Some(label.into())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "<untitled>".to_string());

        Self {
            id,
            priority,
            label,
            icon,
            content,
        }
    }

    /// Entry without icon or content hooks, keyed by its label.
    pub fn labeled(label: &str, priority: i32) -> Self {
        Self::new(
            EntryId::from_label(label),
            priority,
            label,
            IconRef::default(),
            Rc::new(NoContent),
        )
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_label_falls_back_to_placeholder() {
        let entry = Entry::new(
            EntryId::new("x"),
            0,
            "   ",
            IconRef::default(),
            Rc::new(NoContent),
        );
        assert_eq!(entry.label, "<untitled>");
        assert_eq!(entry.id.as_str(), "x");
    }

    #[test]
    fn labeled_entry_uses_label_identity() {
        let entry = Entry::labeled("Notes", 3);
        assert_eq!(entry.id, EntryId::from("Notes"));
        assert_eq!(entry.priority, 3);
    }
}
