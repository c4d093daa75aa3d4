//! Page-button model for classic paginated tables.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub current: u32,
    pub total_pages: u32,
    pub total_items: usize,
}

impl Pager {
    pub fn can_prev(&self) -> bool {
        self.current > 1
    }

    pub fn can_next(&self) -> bool {
        self.current < self.total_pages
    }

    /// First, last, and the pages adjacent to the current one.
    pub fn buttons(&self) -> Vec<u32> {
        (1..=self.total_pages)
            .filter(|&p| {
                p == 1
                    || p == self.total_pages
                    || (p + 1 >= self.current && p <= self.current + 1)
            })
            .collect()
    }

    pub fn summary(&self, item_name: &str) -> String {
        format!(
            "Showing page {} of {} ({} {} total)",
            self.current, self.total_pages, self.total_items, item_name
        )
    }
}
