use serde::Serialize;

/// Pagination cursor for a result list: zero-based page `index`, fixed
/// `size`, and the `total` hit count last reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageState {
    pub index: u32,
    pub size: u32,
    pub total: u64,
}

impl PageState {
    /// First page, nothing known yet. A zero size is bumped to 1.
    pub fn new(size: u32) -> Self {
        Self {
            index: 0,
            size: size.max(1),
            total: 0,
        }
    }

    pub fn can_next(&self) -> bool {
        (u64::from(self.index) + 1) * u64::from(self.size) < self.total
    }

    pub fn can_previous(&self) -> bool {
        self.index > 0
    }

    /// Advance one page if more results exist. Returns whether it moved.
    pub fn next(&mut self) -> bool {
        if !self.can_next() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Go back one page unless already on the first. Returns whether it moved.
    pub fn previous(&mut self) -> bool {
        if !self.can_previous() {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Jump to `index`, clamped to the last known page. Returns whether it moved.
    pub fn go_to(&mut self, index: u32) -> bool {
        let last = u32::try_from(self.total_pages() - 1).unwrap_or(u32::MAX);
        let index = index.min(last);
        if index == self.index {
            return false;
        }
        self.index = index;
        true
    }

    /// At least 1, even with no results.
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.size)).max(1)
    }

    /// 1-based page number for display.
    pub fn current_page(&self) -> u64 {
        u64::from(self.index) + 1
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(index: u32, size: u32, total: u64) -> PageState {
        PageState { index, size, total }
    }

    #[test]
    fn next_is_noop_on_last_page() {
        let mut p = page(0, 20, 5);
        assert!(!p.can_next());
        assert!(!p.next());
        assert_eq!(p.index, 0);

        let mut p = page(1, 20, 40);
        assert!(!p.next());
        assert_eq!(p.index, 1);
    }

    #[test]
    fn next_advances_while_results_remain() {
        let mut p = page(0, 20, 41);
        assert!(p.next());
        assert!(p.next());
        assert_eq!(p.index, 2);
        assert!(!p.next());
    }

    #[test]
    fn previous_is_noop_on_first_page() {
        let mut p = page(0, 20, 100);
        assert!(!p.can_previous());
        assert!(!p.previous());
        assert_eq!(p.index, 0);

        let mut p = page(3, 20, 100);
        assert!(p.previous());
        assert_eq!(p.index, 2);
    }

    #[test]
    fn total_pages_is_at_least_one() {
        assert_eq!(page(0, 20, 0).total_pages(), 1);
        assert_eq!(page(0, 20, 5).total_pages(), 1);
        assert_eq!(page(0, 20, 20).total_pages(), 1);
        assert_eq!(page(0, 20, 21).total_pages(), 2);
    }

    #[test]
    fn zero_size_is_clamped() {
        let p = PageState::new(0);
        assert_eq!(p.size, 1);
        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn go_to_clamps_to_last_page() {
        let mut p = page(0, 20, 95);
        assert!(p.go_to(3));
        assert_eq!(p.index, 3);
        assert!(!p.go_to(3));
        assert!(p.go_to(40));
        assert_eq!(p.index, 4);
        assert!(p.go_to(0));
        assert_eq!(p.index, 0);

        let mut p = page(0, 20, 0);
        assert!(!p.go_to(2));
        assert_eq!(p.index, 0);
    }

    #[test]
    fn reset_returns_to_first_page() {
        let mut p = page(4, 10, 100);
        p.reset();
        assert_eq!(p.index, 0);
        assert_eq!(p.total, 100);
    }
}
