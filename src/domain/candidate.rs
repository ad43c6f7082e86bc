//! Candidate and category records as read from the data store

/// A contestant within an event category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub event_id: i64,
    pub category_id: i64,
    /// Candidate number within the category (`id_candidate`)
    pub candidate_number: i64,
    pub display_name: String,
}

/// A category of an event, used for the banner title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub event_id: i64,
    pub category_id: i64,
    pub display_name: String,
}

/// Object key of a candidate photo in storage.
pub fn candidate_photo_key(event_id: i64, category_id: i64, candidate_number: i64) -> String {
    format!(
        "event_{}_category_{}_candidate_{}.jpg",
        event_id, category_id, candidate_number
    )
}

/// Object key of a generated banner; `page_number` is 1-based.
pub fn banner_key(event_id: i64, category_id: i64, page_number: usize) -> String {
    format!(
        "event_{}_category_{}_banner_{}.png",
        event_id, category_id, page_number
    )
}

/// Name-bar label: `"{number} {name}"`, uppercased.
pub fn name_label(global_number: usize, display_name: &str) -> String {
    format!("{} {}", global_number, display_name.trim()).to_uppercase()
}
