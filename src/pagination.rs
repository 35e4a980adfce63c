use serde::Serialize;

/// Upstream refuses to serve pages past this one.
pub const MAX_PAGES: u32 = 500;
const WINDOW: u32 = 5;

pub fn max_pages(total_pages: u32) -> u32 {
    total_pages.min(MAX_PAGES)
}

/// Up to five consecutive page numbers around `current`, shifted to stay
/// five wide near either end.
pub fn page_window(current: u32, total_pages: u32) -> Vec<u32> {
    let max = max_pages(total_pages);
    if max == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, max);
    let mut start = current.saturating_sub(2).max(1);
    let end = (start + WINDOW - 1).min(max);
    if end - start < WINDOW - 1 {
        start = end.saturating_sub(WINDOW - 1).max(1);
    }
    (start..=end).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationControls {
    pub current: u32,
    pub last: u32,
    pub pages: Vec<u32>,
    pub first_enabled: bool,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub last_enabled: bool,
}

impl PaginationControls {
    pub fn new(current: u32, total_pages: u32) -> Self {
        let last = max_pages(total_pages);
        let has_pages = last > 0;
        Self {
            current,
            last,
            pages: page_window(current, total_pages),
            first_enabled: has_pages && current > 1,
            prev_enabled: has_pages && current > 1,
            next_enabled: has_pages && current < last,
            last_enabled: has_pages && current < last,
        }
    }
}
