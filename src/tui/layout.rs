use ratatui::layout::{Constraint, Direction, Layout, Rect};

use super::preview::PreviewMode;

/// Rows above the list: search prompt and info line
pub const HEADER_HEIGHT: u16 = 2;
/// Smallest list band, in rows
pub const MIN_LIST_HEIGHT: u16 = 3;
/// Share of the terminal height given to the list band
const LIST_HEIGHT_PERCENT: u32 = 40;
/// Preview bands shorter than this render messages in compact mode
const COMPACT_PREVIEW_ROWS: u16 = 20;
/// Rows consumed by a bordered block
const BORDER_ROWS: u16 = 2;

/// Height of the list band for a terminal `height` rows tall
pub fn list_height_for(height: u16) -> u16 {
    let share = (u32::from(height) * LIST_HEIGHT_PERCENT / 100) as u16;
    share.max(MIN_LIST_HEIGHT)
}

/// Band of the screen a pointer row falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Header,
    List,
    Preview,
}

/// Classify `row` against the band heights used by [`AppLayout`]
pub fn region_at(row: u16, list_height: u16) -> Region {
    if row < HEADER_HEIGHT {
        Region::Header
    } else if row < HEADER_HEIGHT.saturating_add(list_height) {
        Region::List
    } else {
        Region::Preview
    }
}

/// Stacked layout:
/// - Search prompt: top row
/// - Info line: counts, hints, status messages
/// - Conversation list: `list_height` rows
/// - Preview: remaining rows
pub struct AppLayout {
    pub search_area: Rect,
    pub info_area: Rect,
    pub list_area: Rect,
    pub preview_area: Rect,
}

impl AppLayout {
    pub fn new(area: Rect, list_height: u16) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(HEADER_HEIGHT - 1),
                Constraint::Length(list_height),
                Constraint::Min(0),
            ])
            .split(area);

        Self {
            search_area: chunks[0],
            info_area: chunks[1],
            list_area: chunks[2],
            preview_area: chunks[3],
        }
    }
}

/// Text rows available inside the bordered preview block of a terminal
/// `height` rows tall
pub fn preview_rows_for(height: u16, list_height: u16) -> u16 {
    height
        .saturating_sub(HEADER_HEIGHT)
        .saturating_sub(list_height)
        .saturating_sub(BORDER_ROWS)
}

pub fn preview_mode_for(preview_rows: u16) -> PreviewMode {
    if preview_rows < COMPACT_PREVIEW_ROWS { PreviewMode::Compact } else { PreviewMode::Full }
}
