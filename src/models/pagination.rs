//! Page clamping and slicing

use std::ops::Range;

/// A page request resolved against a known total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Effective page, 1-based, always within `1..=total_pages`
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    /// Never below 1, even for an empty result
    pub total_pages: u64,
}

impl Pagination {
    /// Clamp `requested_page` into the valid range for `total_count` items
    pub fn clamp(requested_page: u32, page_size: u32, total_count: u64) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_count.div_ceil(page_size as u64).max(1);
        let page = (requested_page.max(1) as u64).min(total_pages) as u32;

        Self {
            page,
            page_size,
            total_count,
            total_pages,
        }
    }

    /// Zero-based offset of the first item on the page
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }

    /// Index range of the page within a candidate list of length `len`
    pub fn window(&self, len: usize) -> Range<usize> {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX).min(len);
        let end = start.saturating_add(self.page_size as usize).min(len);
        start..end
    }

    /// The visible slice of `items`
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.window(items.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_page_beyond_total_is_clamped_to_last_page() {
        let p = Pagination::clamp(10, 20, 45);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.page, 3);
    }

    #[test]
    fn test_empty_total_clamps_to_first_page() {
        let p = Pagination::clamp(7, 20, 0);
        assert_eq!(p.total_pages, 1);
        assert_eq!(p.page, 1);
        assert_eq!(p.window(0), 0..0);
    }

    #[test]
    fn test_zero_inputs_are_raised_to_one() {
        let p = Pagination::clamp(0, 0, 5);
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 1);
        assert_eq!(p.total_pages, 5);
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_page() {
        let p = Pagination::clamp(99, 10, 40);
        assert_eq!(p.total_pages, 4);
        assert_eq!(p.page, 4);
    }

    #[test]
    fn test_slice_returns_partial_last_page() {
        let items: Vec<u32> = (1..=45).collect();
        let p = Pagination::clamp(3, 20, items.len() as u64);
        assert_eq!(p.offset(), 40);
        assert_eq!(p.slice(&items), &[41, 42, 43, 44, 45]);
    }

    proptest! {
        #[test]
        fn prop_window_stays_in_bounds(
            total in 0u64..5_000,
            size in 0u32..200,
            requested in 0u32..500
        ) {
            let p = Pagination::clamp(requested, size, total);
            prop_assert!(p.page >= 1);
            prop_assert!(u64::from(p.page) <= p.total_pages);

            let w = p.window(total as usize);
            prop_assert!(w.end <= total as usize);
            prop_assert!(w.len() <= p.page_size as usize);
            if total > 0 {
                prop_assert!(!w.is_empty());
            }
        }
    }
}
