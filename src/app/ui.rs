use super::style::{
    icon_tint, section_title, SidebarTheme, CONTENT_PADDING, DROP_SHADOW, EMPTY_PINNED_HEIGHT,
    EMPTY_ZONE_HEIGHT, HEADER_HEIGHT, ICON_SIDE, PANEL_ROUNDING, ROW_GAP, ROW_HEIGHT,
    SECTION_GAP,
};
use super::DockApp;
use eframe::egui;
use log::info;
use sidebar_nav::{DragState, EntryId, PointerEvent, Zone};

const SECTION_TITLE_HEIGHT: f32 = 16.0;
const STATUS_HEIGHT: f32 = 22.0;

#[derive(Debug, Clone, PartialEq, Eq)]
enum RowAction {
    Pin(EntryId),
    Unpin(EntryId),
    Hide(EntryId),
    Unhide(EntryId),
}

impl eframe::App for DockApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0, 0.0, 0.0, 0.0]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_registry();
        self.drain_sidebar_events();

        self.surface.begin_frame();
        self.draw_main_panel(ctx);
        self.route_pointer(ctx);
        self.drain_pointer();
        self.draw_ghost_overlay(ctx);
        self.track_window_geometry(ctx);

        if self.manager.drag_state() != DragState::Idle {
            ctx.request_repaint();
        }
    }
}

impl DockApp {
    fn draw_main_panel(&mut self, ctx: &egui::Context) {
        let theme = SidebarTheme::default();
        let panel_frame = egui::Frame::none()
            .fill(egui::Color32::TRANSPARENT)
            .stroke(egui::Stroke::NONE);

        egui::CentralPanel::default()
            .frame(panel_frame)
            .show(ctx, |ui| {
                let response = ui.allocate_response(ui.available_size(), egui::Sense::hover());
                let panel = response.rect;

                ui.painter().rect_filled(
                    panel.expand(10.0),
                    PANEL_ROUNDING + 10.0,
                    theme.panel_shadow,
                );
                ui.painter()
                    .rect_filled(panel, PANEL_ROUNDING, theme.panel_bg);
                ui.painter().rect_stroke(
                    panel,
                    PANEL_ROUNDING,
                    egui::Stroke::new(1.0, theme.panel_border),
                );

                let header_rect = egui::Rect::from_min_size(
                    panel.min,
                    egui::vec2(panel.width(), HEADER_HEIGHT),
                );
                ui.painter()
                    .rect_filled(header_rect, PANEL_ROUNDING, theme.header_bg);
                ui.painter().text(
                    egui::pos2(header_rect.min.x + 12.0, header_rect.center().y),
                    egui::Align2::LEFT_CENTER,
                    crate::APP_DISPLAY_NAME,
                    egui::FontId::proportional(15.0),
                    theme.title_color,
                );
                let handle = ui.interact(
                    header_rect,
                    egui::Id::new("sidebar_header"),
                    egui::Sense::click_and_drag(),
                );
                if handle.drag_started_by(egui::PointerButton::Primary) {
                    ctx.send_viewport_cmd(egui::ViewportCommand::StartDrag);
                }
                handle.context_menu(|ui| self.draw_context_menu(ui));

                let content_rect = egui::Rect::from_min_max(
                    egui::pos2(panel.min.x, panel.min.y + HEADER_HEIGHT),
                    egui::pos2(panel.max.x, panel.max.y - STATUS_HEIGHT),
                );
                self.draw_zones(ui, content_rect, &theme);
                self.draw_status(ui, panel, &theme);
            });
    }

    fn draw_zones(&mut self, ui: &mut egui::Ui, content_rect: egui::Rect, theme: &SidebarTheme) {
        let left = content_rect.min.x + CONTENT_PADDING;
        let width = (content_rect.width() - CONTENT_PADDING * 2.0).max(120.0);
        let mut y = content_rect.min.y + CONTENT_PADDING;
        let mut action = None;

        if self.manager.pinned_zone_visible() {
            self.draw_zone(ui, Zone::Pinned, left, width, &mut y, theme, &mut action);
        }
        self.draw_zone(ui, Zone::Sorted, left, width, &mut y, theme, &mut action);
        if self.manager.hidden_zone_visible() {
            self.draw_zone(ui, Zone::Hidden, left, width, &mut y, theme, &mut action);
        }

        if let Some(action) = action {
            self.apply_row_action(action);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_zone(
        &mut self,
        ui: &mut egui::Ui,
        zone: Zone,
        left: f32,
        width: f32,
        y: &mut f32,
        theme: &SidebarTheme,
        action: &mut Option<RowAction>,
    ) {
        let painter = ui.painter().clone();
        let title = match zone {
            Zone::Hidden => format!("{} ({})", section_title(zone), self.manager.hidden_count()),
            _ => section_title(zone).to_string(),
        };
        painter.text(
            egui::pos2(left, *y + SECTION_TITLE_HEIGHT * 0.5),
            egui::Align2::LEFT_CENTER,
            title,
            egui::FontId::proportional(11.0),
            theme.muted_text,
        );
        *y += SECTION_TITLE_HEIGHT;

        let top = *y;
        let entries = self.manager.zones().list(zone).to_vec();
        let placeholder = self.surface.placeholder_in(zone);
        let flags = self.manager.flags();
        let mut slot = 0usize;

        for entry in &entries {
            if self.surface.is_detached(&entry.id) {
                continue;
            }
            if placeholder == Some(slot) {
                paint_placeholder(&painter, left, width, y, theme);
            }

            let row = egui::Rect::from_min_size(
                egui::pos2(left, *y),
                egui::vec2(width, ROW_HEIGHT),
            );
            self.surface.record_button(zone, entry.id.clone(), row);
            let resp = ui.interact(
                row,
                egui::Id::new(("sidebar_row", entry.id.as_str())),
                egui::Sense::click(),
            );

            let is_selected = self
                .manager
                .selected()
                .is_some_and(|selected| selected.id == entry.id);
            let fill = if is_selected {
                theme.row_selected
            } else if resp.hovered() {
                theme.row_hover
            } else {
                theme.row_bg
            };
            paint_row(
                &painter,
                row,
                &entry.label,
                &entry.icon.0,
                fill,
                (is_selected || resp.hovered()).then_some(theme.row_border),
                theme,
            );

            let id = entry.id.clone();
            resp.context_menu(|ui| {
                style_compact_menu(ui);
                let can_pin = zone == Zone::Sorted && flags.pinning_enabled;
                let can_hide = zone != Zone::Hidden && flags.hiding_enabled;
                let items: &[(&str, RowAction, bool)] = &[
                    ("Pin", RowAction::Pin(id.clone()), can_pin),
                    ("Unpin", RowAction::Unpin(id.clone()), zone == Zone::Pinned),
                    ("Hide", RowAction::Hide(id.clone()), can_hide),
                    ("Unhide", RowAction::Unhide(id.clone()), zone == Zone::Hidden),
                ];
                for (label, item, enabled) in items {
                    if *enabled && ui.button(*label).clicked() {
                        *action = Some(item.clone());
                        ui.close_menu();
                    }
                }
            });

            *y += ROW_HEIGHT + ROW_GAP;
            slot += 1;
        }
        if placeholder == Some(slot) {
            paint_placeholder(&painter, left, width, y, theme);
        }

        let reserved = empty_zone_height(zone, slot, placeholder.is_some());
        if let Some(height) = reserved {
            let area = egui::Rect::from_min_size(egui::pos2(left, *y), egui::vec2(width, height));
            // Outside a drag the hint follows the model; during one the
            // controller decides.
            let show_hint = zone == Zone::Pinned
                && match self.manager.drag_state() {
                    DragState::Dragging => self.surface.empty_pinned_hint,
                    _ => true,
                };
            if show_hint {
                painter.rect_stroke(area, 8.0, egui::Stroke::new(1.0, theme.drop_hint));
                painter.text(
                    area.center(),
                    egui::Align2::CENTER_CENTER,
                    "Drop here to pin",
                    egui::FontId::proportional(12.0),
                    theme.muted_text,
                );
            }
            *y += height + ROW_GAP;
        }

        let zone_rect = egui::Rect::from_min_max(
            egui::pos2(left, top),
            egui::pos2(left + width, (*y - ROW_GAP).max(top + ROW_GAP)),
        );
        self.surface.record_zone(zone, zone_rect);
        if self.surface.highlight == Some(zone) {
            painter.rect_filled(zone_rect.expand(3.0), 8.0, theme.zone_highlight);
            painter.rect_stroke(
                zone_rect.expand(3.0),
                8.0,
                egui::Stroke::new(1.0, theme.drop_hint),
            );
        }
        *y += SECTION_GAP;
    }

    fn draw_status(&self, ui: &egui::Ui, panel: egui::Rect, theme: &SidebarTheme) {
        let text = match &self.status {
            Some(label) => format!("Open: {label}"),
            None => "No panel open".to_string(),
        };
        ui.painter().text(
            egui::pos2(panel.min.x + 12.0, panel.max.y - STATUS_HEIGHT * 0.5),
            egui::Align2::LEFT_CENTER,
            text,
            egui::FontId::proportional(12.0),
            theme.muted_text,
        );
    }

    fn draw_context_menu(&mut self, ui: &mut egui::Ui) {
        style_compact_menu(ui);
        let mut changed = ui
            .checkbox(&mut self.config.plugin_enabled, "Enable sidebar")
            .changed();
        changed |= ui
            .checkbox(&mut self.config.allow_pinning, "Allow pinning")
            .changed();
        changed |= ui
            .checkbox(&mut self.config.allow_hiding, "Allow hiding")
            .changed();
        if changed {
            self.apply_settings();
        }

        ui.separator();
        if ui.button("Toggle Downloads panel").clicked() {
            self.toggle_transient_entry();
            ui.close_menu();
        }
        if ui.button("Reset layout").clicked() {
            info!("Resetting sidebar layout");
            self.manager.reset_state();
            ui.close_menu();
        }

        ui.separator();
        if ui.button("Quit").clicked() {
            info!("Exiting via context menu...");
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn apply_row_action(&mut self, action: RowAction) {
        match action {
            RowAction::Pin(id) => self.manager.pin(&id),
            RowAction::Unpin(id) => self.manager.unpin(&id),
            RowAction::Hide(id) => self.manager.hide(&id),
            RowAction::Unhide(id) => self.manager.unhide(&id),
        }
    }

    /// Turns this frame's raw pointer state into manager input. Runs after
    /// painting so hit tests see the current layout.
    fn route_pointer(&mut self, ctx: &egui::Context) {
        let (pressed, released, moving, origin, latest) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.is_moving(),
                i.pointer.press_origin(),
                i.pointer.latest_pos(),
            )
        });

        if pressed {
            if let Some(point) = origin {
                if let Some(entry) = self.manager.entry_at_point(point, &self.surface) {
                    let _ = self.pointer_tx.send(PointerEvent::Press { entry, point });
                }
            }
        }
        if moving && self.manager.drag_state() != DragState::Idle {
            if let Some(point) = latest {
                let _ = self.pointer_tx.send(PointerEvent::Move { point });
            }
        }
        if released {
            if let Some(point) = latest {
                let _ = self.pointer_tx.send(PointerEvent::Release { point });
            }
        }
    }

    fn draw_ghost_overlay(&self, ctx: &egui::Context) {
        let Some(ghost) = &self.surface.ghost else {
            return;
        };
        let theme = SidebarTheme::default();
        let width = (ctx.screen_rect().width() - CONTENT_PADDING * 2.0).max(120.0);
        let r = egui::Rect::from_min_size(ghost.top_left, egui::vec2(width, ROW_HEIGHT));
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("drag_ghost"),
        ));
        painter.rect_filled(
            r.expand(DROP_SHADOW),
            12.0 + DROP_SHADOW,
            egui::Color32::from_rgba_premultiplied(0, 0, 0, 32),
        );
        paint_row(
            &painter,
            r,
            &ghost.label,
            &ghost.icon,
            theme.row_selected,
            Some(theme.drop_hint),
            &theme,
        );
    }

    fn track_window_geometry(&mut self, ctx: &egui::Context) {
        let (outer, inner, pointer_down) = ctx.input(|i| {
            (
                i.viewport().outer_rect,
                i.viewport().inner_rect,
                i.pointer.any_down(),
            )
        });
        let (Some(outer), Some(inner)) = (outer, inner) else {
            return;
        };
        let geometry = (outer.min, inner.size());
        if pointer_down || self.last_geometry == Some(geometry) {
            return;
        }
        if self.last_geometry.is_some() {
            self.save_window_geometry(geometry.0, geometry.1);
        }
        self.last_geometry = Some(geometry);
    }
}

fn paint_row(
    painter: &egui::Painter,
    row: egui::Rect,
    label: &str,
    icon: &str,
    fill: egui::Color32,
    border: Option<egui::Color32>,
    theme: &SidebarTheme,
) {
    painter.rect_filled(row, 8.0, fill);
    if let Some(border) = border {
        painter.rect_stroke(row, 8.0, egui::Stroke::new(1.0, border));
    }
    let icon_rect = egui::Rect::from_center_size(
        egui::pos2(row.min.x + 12.0 + ICON_SIDE * 0.5, row.center().y),
        egui::vec2(ICON_SIDE, ICON_SIDE),
    );
    painter.rect_filled(icon_rect, 5.0, icon_tint(icon, theme.icon_placeholder));
    painter.text(
        egui::pos2(icon_rect.max.x + 9.0, row.center().y),
        egui::Align2::LEFT_CENTER,
        label,
        egui::FontId::proportional(14.0),
        theme.title_color,
    );
}

fn paint_placeholder(
    painter: &egui::Painter,
    left: f32,
    width: f32,
    y: &mut f32,
    theme: &SidebarTheme,
) {
    let r = egui::Rect::from_min_size(egui::pos2(left, *y), egui::vec2(width, ROW_HEIGHT));
    painter.rect_stroke(r, 8.0, egui::Stroke::new(1.0, theme.drop_hint));
    *y += ROW_HEIGHT + ROW_GAP;
}

fn style_compact_menu(ui: &mut egui::Ui) {
    let visuals = ui.visuals_mut();
    visuals.window_fill = egui::Color32::from_rgba_premultiplied(246, 248, 252, 252);
    visuals.panel_fill = egui::Color32::from_rgba_premultiplied(246, 248, 252, 252);
    visuals.widgets.noninteractive.fg_stroke.color = egui::Color32::from_rgb(10, 16, 24);
    visuals.widgets.inactive.bg_fill = egui::Color32::TRANSPARENT;
    visuals.widgets.inactive.fg_stroke.color = egui::Color32::from_rgb(10, 16, 24);
    visuals.widgets.hovered.bg_fill = egui::Color32::from_rgba_premultiplied(205, 225, 242, 230);
    visuals.widgets.hovered.fg_stroke.color = egui::Color32::from_rgb(5, 10, 18);
    visuals.widgets.active.bg_fill = egui::Color32::from_rgba_premultiplied(188, 214, 235, 245);
    visuals.widgets.active.fg_stroke.color = egui::Color32::from_rgb(5, 10, 18);

    let style = ui.style_mut();
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 7.0);
}

/// Space kept open under a zone with no rows so it stays a drop target.
fn empty_zone_height(zone: Zone, rows: usize, placeholder: bool) -> Option<f32> {
    if rows > 0 || placeholder {
        return None;
    }
    Some(match zone {
        Zone::Pinned => EMPTY_PINNED_HEIGHT,
        Zone::Sorted | Zone::Hidden => EMPTY_ZONE_HEIGHT,
    })
}
