//! Banner layout presets, slot geometry and pagination
//!
//! A layout fixes the canvas size and an ordered list of slots. Candidates are
//! assigned to slots page by page in their natural order: slot `i` of page `p`
//! always holds candidate `p * slots + i` of the full list.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::candidate::Candidate;

/// Grid banner canvas (square post)
pub const GRID_CANVAS_WIDTH: u32 = 1365;
pub const GRID_CANVAS_HEIGHT: u32 = 1365;

/// Story banner canvas (portrait)
pub const STORY_CANVAS_WIDTH: u32 = 768;
pub const STORY_CANVAS_HEIGHT: u32 = 1365;

/// Step used when shrinking text to fit its box
pub const FONT_SIZE_STEP: f32 = 2.0;

/// Top-left corner of a candidate cell on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub x: u32,
    pub y: u32,
}

const fn slot(x: u32, y: u32) -> Slot {
    Slot { x, y }
}

const GRID_SLOTS: [Slot; 9] = [
    slot(86, 150), slot(512, 150), slot(938, 150),
    slot(86, 550), slot(512, 550), slot(938, 550),
    slot(86, 950), slot(512, 950), slot(938, 950),
];

const STORY_SLOTS: [Slot; 6] = [
    slot(56, 230), slot(412, 230),
    slot(56, 605), slot(412, 605),
    slot(56, 980), slot(412, 980),
];

/// Banner variant requested by the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BannerLayout {
    /// 3x3 grid on a 1365x1365 canvas
    #[default]
    Grid,
    /// 2x3 grid on a 768x1365 canvas
    Story,
}

impl BannerLayout {
    pub fn preset(self) -> &'static LayoutPreset {
        match self {
            BannerLayout::Grid => &GRID_PRESET,
            BannerLayout::Story => &STORY_PRESET,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BannerLayout::Grid => "grid",
            BannerLayout::Story => "story",
        }
    }
}

/// Font size search range, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontRange {
    pub start: f32,
    pub min: f32,
}

/// Complete geometry of one banner variant
#[derive(Debug)]
pub struct LayoutPreset {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub photo_width: u32,
    pub photo_height: u32,
    /// Height of the name band drawn beneath each photo
    pub name_bar_height: u32,
    pub slots: &'static [Slot],
    /// Top offset of the title text
    pub title_y: u32,
    /// Horizontal margin kept free on each side of the title
    pub title_margin: u32,
    pub title_font: FontRange,
    pub title_bold_strength: u32,
    /// Horizontal padding kept free on each side of a name label
    pub name_padding: u32,
    pub name_font: FontRange,
    pub name_bold_strength: u32,
}

pub static GRID_PRESET: LayoutPreset = LayoutPreset {
    canvas_width: GRID_CANVAS_WIDTH,
    canvas_height: GRID_CANVAS_HEIGHT,
    photo_width: 340,
    photo_height: 340,
    name_bar_height: 60,
    slots: &GRID_SLOTS,
    title_y: 36,
    title_margin: 60,
    title_font: FontRange { start: 76.0, min: 28.0 },
    title_bold_strength: 2,
    name_padding: 12,
    name_font: FontRange { start: 30.0, min: 12.0 },
    name_bold_strength: 1,
};

pub static STORY_PRESET: LayoutPreset = LayoutPreset {
    canvas_width: STORY_CANVAS_WIDTH,
    canvas_height: STORY_CANVAS_HEIGHT,
    photo_width: 300,
    photo_height: 300,
    name_bar_height: 56,
    slots: &STORY_SLOTS,
    title_y: 110,
    title_margin: 40,
    title_font: FontRange { start: 60.0, min: 24.0 },
    title_bold_strength: 2,
    name_padding: 12,
    name_font: FontRange { start: 28.0, min: 12.0 },
    name_bold_strength: 1,
};

impl LayoutPreset {
    pub fn slots_per_page(&self) -> usize {
        self.slots.len()
    }

    /// Size of a frame fragment: photo plus name bar
    pub fn cell_size(&self) -> (u32, u32) {
        (self.photo_width, self.photo_height + self.name_bar_height)
    }

    pub fn name_max_width(&self) -> u32 {
        self.photo_width.saturating_sub(self.name_padding * 2)
    }

    pub fn title_max_width(&self) -> u32 {
        self.canvas_width.saturating_sub(self.title_margin * 2)
    }

    /// Position of a rendered name label of `text_width` x `text_height`,
    /// centered in the name bar beneath the photo of `slot`.
    pub fn name_position(&self, slot: Slot, text_width: u32, text_height: u32) -> (i64, i64) {
        let x = slot.x as i64 + (self.photo_width as i64 - text_width as i64) / 2;
        let band_top = (slot.y + self.photo_height) as i64;
        let y = band_top + (self.name_bar_height as i64 - text_height as i64).max(0) / 2;
        (x, y)
    }

    /// Position of a rendered title, centered horizontally
    pub fn title_position(&self, text_width: u32) -> (i64, i64) {
        let x = (self.canvas_width as i64 - text_width as i64) / 2;
        (x, self.title_y as i64)
    }
}

/// Split `items` into consecutive pages of at most `per_page` entries.
pub fn paginate<T>(items: &[T], per_page: usize) -> Vec<&[T]> {
    items.chunks(per_page.max(1)).collect()
}

/// 1-based position of a candidate across the whole run.
pub fn global_candidate_number(page_index: usize, slot_index: usize, per_page: usize) -> usize {
    page_index * per_page + slot_index + 1
}

/// A candidate placed in a slot of a page
#[derive(Debug, Clone, Copy)]
pub struct SlotAssignment<'a> {
    pub slot_index: usize,
    pub slot: Slot,
    pub global_number: usize,
    pub candidate: &'a Candidate,
}

/// One banner worth of slot assignments
#[derive(Debug, Clone)]
pub struct PagePlan<'a> {
    /// 0-based page index
    pub index: usize,
    pub entries: Vec<SlotAssignment<'a>>,
}

impl PagePlan<'_> {
    /// 1-based page number used in output file names
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

/// Assign every candidate to a page and slot of `preset`.
pub fn plan_pages<'a>(candidates: &'a [Candidate], preset: &LayoutPreset) -> Vec<PagePlan<'a>> {
    let per_page = preset.slots_per_page();

    paginate(candidates, per_page)
        .into_iter()
        .enumerate()
        .map(|(index, page)| PagePlan {
            index,
            entries: page
                .iter()
                .zip(preset.slots.iter())
                .enumerate()
                .map(|(slot_index, (candidate, slot))| SlotAssignment {
                    slot_index,
                    slot: *slot,
                    global_number: global_candidate_number(index, slot_index, per_page),
                    candidate,
                })
                .collect(),
        })
        .collect()
}
