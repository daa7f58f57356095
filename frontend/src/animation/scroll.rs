pub const HEADER_SCROLLED_AT: f64 = 50.0;
pub const BACK_TO_TOP_AFTER: f64 = 300.0;
pub const ANCHOR_GAP: f64 = 20.0;
pub const ACTIVE_SECTION_LEAD: f64 = 50.0;
/// Widest viewport still laid out as mobile.
pub const MOBILE_MAX_WIDTH: f64 = 768.0;
const ABOUT_HERO_RATE: f64 = 0.3;

pub fn is_mobile(viewport_width: f64) -> bool {
    viewport_width <= MOBILE_MAX_WIDTH
}

pub fn header_scrolled(scroll_y: f64) -> bool {
    scroll_y >= HEADER_SCROLLED_AT
}

pub fn back_to_top_visible(scroll_y: f64) -> bool {
    scroll_y > BACK_TO_TOP_AFTER
}

/// Share of the page already scrolled, in percent.
pub fn progress_percent(scroll_y: f64, document_height: f64, viewport_height: f64) -> f64 {
    let scrollable = document_height - viewport_height;
    if scrollable <= 0.0 {
        return 0.0;
    }
    (scroll_y / scrollable * 100.0).clamp(0.0, 100.0)
}

#[derive(Clone, Debug, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

/// The section under the header line, if any. Later sections win when they
/// overlap.
pub fn active_section(sections: &[SectionBounds], scroll_y: f64, header_height: f64) -> Option<&str> {
    let line = scroll_y + header_height + ACTIVE_SECTION_LEAD;
    sections
        .iter()
        .rev()
        .find(|s| line >= s.top && line < s.top + s.height)
        .map(|s| s.id.as_str())
}

/// Where to scroll so an anchored section clears the fixed header.
pub fn anchor_target(section_top: f64, header_height: f64) -> f64 {
    (section_top - header_height - ANCHOR_GAP).max(0.0)
}

/// Vertical offset for the n-th hero child; deeper children drift further.
pub fn hero_parallax(scroll_y: f64, index: usize) -> f64 {
    scroll_y * -0.5 * (index as f64 + 1.0) * 0.1
}

/// Offset for the about page hero. Desktop only, and only while the hero
/// can still be on screen.
pub fn about_hero_offset(scroll_y: f64, viewport_width: f64, viewport_height: f64) -> Option<f64> {
    if is_mobile(viewport_width) || scroll_y >= viewport_height {
        return None;
    }
    Some(-(scroll_y * ABOUT_HERO_RATE))
}
