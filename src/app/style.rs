use eframe::egui::Color32;
use sidebar_nav::Zone;

pub const HEADER_HEIGHT: f32 = 28.0;
pub const ROW_HEIGHT: f32 = 34.0;
pub const ROW_GAP: f32 = 4.0;
pub const SECTION_GAP: f32 = 10.0;
pub const CONTENT_PADDING: f32 = 9.0;
pub const ICON_SIDE: f32 = 18.0;
pub const DROP_SHADOW: f32 = 8.0;
pub const PANEL_ROUNDING: f32 = 12.0;
/// Drop area kept open for an empty Pinned zone.
pub const EMPTY_PINNED_HEIGHT: f32 = 26.0;
/// Drop area kept open for an empty Sorted or Hidden zone.
pub const EMPTY_ZONE_HEIGHT: f32 = 26.0;

#[derive(Clone, Copy)]
pub struct SidebarTheme {
    pub panel_bg: Color32,
    pub panel_border: Color32,
    pub panel_shadow: Color32,
    pub header_bg: Color32,
    pub title_color: Color32,
    pub muted_text: Color32,
    pub row_bg: Color32,
    pub row_hover: Color32,
    pub row_selected: Color32,
    pub row_border: Color32,
    pub icon_placeholder: Color32,
    pub drop_hint: Color32,
    pub zone_highlight: Color32,
}

impl Default for SidebarTheme {
    fn default() -> Self {
        Self {
            panel_bg: Color32::from_rgba_premultiplied(14, 20, 31, 230),
            panel_border: Color32::from_rgba_premultiplied(161, 179, 201, 36),
            panel_shadow: Color32::from_rgba_premultiplied(3, 8, 16, 75),
            header_bg: Color32::from_rgba_premultiplied(21, 32, 48, 230),
            title_color: Color32::from_rgb(242, 248, 255),
            muted_text: Color32::from_rgb(150, 166, 186),
            row_bg: Color32::from_rgba_premultiplied(24, 36, 50, 154),
            row_hover: Color32::from_rgba_premultiplied(35, 53, 74, 184),
            row_selected: Color32::from_rgba_premultiplied(45, 104, 114, 192),
            row_border: Color32::from_rgba_premultiplied(147, 169, 194, 78),
            icon_placeholder: Color32::from_rgba_premultiplied(205, 221, 238, 108),
            drop_hint: Color32::from_rgba_premultiplied(93, 214, 189, 186),
            zone_highlight: Color32::from_rgba_premultiplied(75, 197, 165, 26),
        }
    }
}

pub fn section_title(zone: Zone) -> &'static str {
    match zone {
        Zone::Pinned => "Pinned",
        Zone::Sorted => "Panels",
        Zone::Hidden => "Hidden",
    }
}

/// Stable placeholder tint derived from the icon name.
pub fn icon_tint(icon: &str, fallback: Color32) -> Color32 {
    if icon.is_empty() {
        return fallback;
    }
    let hash = icon
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)));
    let [r, g, b, _] = hash.to_le_bytes();
    Color32::from_rgb(96 + r / 3, 96 + g / 3, 96 + b / 3)
}
