/// Pagination parameter handling shared by every listing endpoint.
///
/// `page` defaults to 1, `limit` to the route's default, and both are
/// clamped so a hostile query cannot request page 0 or a 10k-row page.
pub fn page_param(page: Option<u64>) -> u64 {
    page.filter(|p| *p >= 1).unwrap_or(1)
}

pub fn limit_param(limit: Option<u64>, default: u64) -> u64 {
    limit.filter(|l| (1..=100).contains(l)).unwrap_or(default)
}

/// `(total_pages, has_next, has_prev)` for a listing response.
pub fn page_window(total: u64, page: u64, per_page: u64) -> (u64, bool, bool) {
    let total_pages = total.div_ceil(per_page.max(1));
    (total_pages, page < total_pages, page > 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_and_limit_fall_back_to_defaults() {
        assert_eq!(page_param(None), 1);
        assert_eq!(page_param(Some(0)), 1);
        assert_eq!(page_param(Some(3)), 3);

        assert_eq!(limit_param(None, 10), 10);
        assert_eq!(limit_param(Some(0), 10), 10);
        assert_eq!(limit_param(Some(500), 10), 10);
        assert_eq!(limit_param(Some(25), 10), 25);
    }

    #[test]
    fn page_window_matches_offset_arithmetic() {
        assert_eq!(page_window(0, 1, 10), (0, false, false));
        assert_eq!(page_window(10, 1, 10), (1, false, false));
        assert_eq!(page_window(11, 1, 10), (2, true, false));
        assert_eq!(page_window(11, 2, 10), (2, false, true));
    }
}
