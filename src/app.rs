mod state;
mod style;
mod ui;

use crossbeam_channel::{unbounded, Receiver, Sender};
use eframe::egui;
use log::info;
use sidebar_nav::{
    Entry, EntryId, IconRef, JsonFileStore, NavigationManager, PointerEvent, RegistryEvent,
    SidebarConfig, SidebarEvent,
};
use state::{DemoPanel, EguiSurface};
use std::rc::Rc;

pub const WINDOW_WIDTH: f32 = 260.0;
pub const WINDOW_HEIGHT: f32 = 560.0;
pub const MIN_WINDOW_WIDTH: f32 = 200.0;
pub const MIN_WINDOW_HEIGHT: f32 = 320.0;

/// Entry the demo registry can remove and add back at runtime.
const TRANSIENT_ENTRY: &str = "downloads";

struct DemoItem {
    id: &'static str,
    label: &'static str,
    icon: &'static str,
    priority: i32,
}

const DEMO_ENTRIES: &[DemoItem] = &[
    DemoItem {
        id: "notes",
        label: "Notes",
        icon: "notes",
        priority: 10,
    },
    DemoItem {
        id: "world-map",
        label: "World Map",
        icon: "map",
        priority: 20,
    },
    DemoItem {
        id: "timers",
        label: "Timers",
        icon: "clock",
        priority: 20,
    },
    DemoItem {
        id: "calculator",
        label: "Calculator",
        icon: "calc",
        priority: 30,
    },
    DemoItem {
        id: "music",
        label: "Music",
        icon: "music",
        priority: 40,
    },
    DemoItem {
        id: "downloads",
        label: "Downloads",
        icon: "arrow",
        priority: 50,
    },
    DemoItem {
        id: "settings",
        label: "Settings",
        icon: "gear",
        priority: 90,
    },
];

fn demo_entry(item: &DemoItem) -> Rc<Entry> {
    Rc::new(Entry::new(
        EntryId::new(item.id),
        item.priority,
        item.label,
        IconRef(item.icon.to_string()),
        Rc::new(DemoPanel { name: item.label }),
    ))
}

pub struct DockApp {
    manager: NavigationManager<JsonFileStore>,
    surface: EguiSurface,
    config: SidebarConfig,
    pointer_tx: Sender<PointerEvent>,
    pointer_rx: Receiver<PointerEvent>,
    registry_tx: Sender<RegistryEvent>,
    registry_rx: Receiver<RegistryEvent>,
    sidebar_events: Receiver<SidebarEvent>,
    status: Option<String>,
    last_geometry: Option<(egui::Pos2, egui::Vec2)>,
}

impl DockApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = SidebarConfig::load();
        if let Some((x, y)) = config.last_pos {
            cc.egui_ctx
                .send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(x, y)));
        }

        let store = JsonFileStore::open_default();
        info!("Sidebar state at {}", store.path().display());
        let mut manager = NavigationManager::from_config(store, &config);
        let sidebar_events = manager.subscribe();
        let (pointer_tx, pointer_rx) = unbounded();
        let (registry_tx, registry_rx) = unbounded();
        for item in DEMO_ENTRIES {
            let _ = registry_tx.send(RegistryEvent::Added(demo_entry(item)));
        }

        Self {
            manager,
            surface: EguiSurface::default(),
            config,
            pointer_tx,
            pointer_rx,
            registry_tx,
            registry_rx,
            sidebar_events,
            status: None,
            last_geometry: None,
        }
    }

    fn drain_registry(&mut self) {
        while let Ok(event) = self.registry_rx.try_recv() {
            self.manager.handle_registry_event(event, &mut self.surface);
        }
    }

    /// Pointer input gathered while painting, applied against this frame's layout.
    fn drain_pointer(&mut self) {
        while let Ok(event) = self.pointer_rx.try_recv() {
            self.manager.handle_pointer(event, &mut self.surface);
        }
    }

    fn drain_sidebar_events(&mut self) {
        while let Ok(SidebarEvent::SelectionChanged { current, .. }) =
            self.sidebar_events.try_recv()
        {
            self.status = current
                .and_then(|id| self.manager.entry(&id).map(|entry| entry.label.clone()));
        }
    }

    fn toggle_transient_entry(&mut self) {
        let id = EntryId::new(TRANSIENT_ENTRY);
        let event = if self.manager.entry(&id).is_some() {
            RegistryEvent::Removed(id)
        } else {
            match DEMO_ENTRIES.iter().find(|item| item.id == TRANSIENT_ENTRY) {
                Some(item) => RegistryEvent::Added(demo_entry(item)),
                None => return,
            }
        };
        let _ = self.registry_tx.send(event);
    }

    fn apply_settings(&mut self) {
        self.manager.apply_feature_flags(
            self.config.plugin_enabled,
            self.config.allow_pinning,
            self.config.allow_hiding,
            &mut self.surface,
        );
        self.config.save();
    }

    fn save_window_geometry(&mut self, pos: egui::Pos2, size: egui::Vec2) {
        let size = sanitize_window_size(size);
        self.config.last_pos = Some((pos.x, pos.y));
        self.config.last_size = Some((size.x, size.y));
        self.config.save();
    }
}

pub(super) fn sanitize_window_size(size: egui::Vec2) -> egui::Vec2 {
    let width = if size.x.is_finite() {
        size.x
    } else {
        WINDOW_WIDTH
    };
    let height = if size.y.is_finite() {
        size.y
    } else {
        WINDOW_HEIGHT
    };
    egui::vec2(width.max(MIN_WINDOW_WIDTH), height.max(MIN_WINDOW_HEIGHT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_size_is_clamped_and_finite() {
        let size = sanitize_window_size(egui::vec2(f32::NAN, 10.0));
        assert_eq!(size, egui::vec2(WINDOW_WIDTH, MIN_WINDOW_HEIGHT));
    }

    #[test]
    fn demo_registry_has_unique_ids() {
        let mut ids: Vec<_> = DEMO_ENTRIES.iter().map(|item| item.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), DEMO_ENTRIES.len());
        assert!(ids.contains(&TRANSIENT_ENTRY));
    }
}
