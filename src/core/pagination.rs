use super::utils::parse_leading_int;

pub const DEFAULT_PAGE_SIZE: u32 = 6;
pub const MAX_PAGE_SIZE: u32 = 23;

/// Effective paging for the list endpoints, derived from raw query strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub size: u32,
    /// Both `page` and `size` were supplied by the caller.
    pub explicit: bool,
}

impl Pagination {
    /// Lenient: unparsable or out-of-range values fall back to the defaults
    /// instead of rejecting the request.
    pub fn from_query(page: Option<&str>, size: Option<&str>) -> Self {
        // a page past u32 still addresses past the data, not the first page
        let page_value = page
            .and_then(parse_leading_int)
            .filter(|x| *x > 0)
            .map(|x| u32::try_from(x).unwrap_or(u32::MAX))
            .unwrap_or(0);
        let size_value = size
            .and_then(parse_leading_int)
            .filter(|x| *x >= 1 && *x <= MAX_PAGE_SIZE as i64)
            .map(|x| x as u32)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let supplied = |x: Option<&str>| x.is_some_and(|x| !x.is_empty());
        Self {
            page: page_value,
            size: size_value,
            explicit: supplied(page) && supplied(size),
        }
    }

    pub fn limit(&self) -> u32 {
        self.size
    }

    pub fn offset(&self) -> u32 {
        self.page.saturating_mul(self.size)
    }

    pub fn total_pages(&self, count: u32) -> u32 {
        count.div_ceil(self.size)
    }
}
