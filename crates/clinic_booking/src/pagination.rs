// --- File: crates/clinic_booking/src/pagination.rs ---

/// How many page numbers a pager shows at once.
pub const PAGE_WINDOW: u32 = 5;

/// Page numbers to show around `current`, starting two before it.
///
/// Pages are zero-based here; callers with one-based pages shift before and
/// after. The window never runs past `total_pages`.
pub fn page_window(current: u32, total_pages: u32) -> Vec<u32> {
    let start = current.saturating_sub(2);
    let end = start.saturating_add(PAGE_WINDOW).min(total_pages);
    (start..end).collect()
}

/// Number of pages needed for `items`, never less than one.
pub fn page_count(items: usize, page_size: usize) -> u32 {
    if page_size == 0 {
        return 1;
    }
    let pages = items.div_ceil(page_size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_at_start() {
        assert_eq!(page_window(0, 10), vec![0, 1, 2, 3, 4]);
        assert_eq!(page_window(1, 10), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_window_slides() {
        assert_eq!(page_window(5, 10), vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_window_clamped_to_total() {
        assert_eq!(page_window(9, 10), vec![7, 8, 9]);
        assert_eq!(page_window(0, 2), vec![0, 1]);
        assert_eq!(page_window(0, 0), Vec::<u32>::new());
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 6), 1);
        assert_eq!(page_count(6, 6), 1);
        assert_eq!(page_count(7, 6), 2);
        assert_eq!(page_count(13, 6), 3);
    }
}
