//! This module defines the common functionality for paging data.

/// The config for pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of transactions per page when not specified in a request.
    pub default_page_size: u64,
    /// The largest page size a client may request.
    pub max_page_size: u64,
    /// The number of rows per page in the dashboard table.
    pub table_page_size: u64,
    /// The maximum number of pages to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 20,
            max_page_size: 100,
            table_page_size: 10,
            max_pages: 5,
        }
    }
}

impl PaginationConfig {
    /// Resolve the requested page number, clamping anything below one to one.
    pub fn page(&self, requested: Option<u64>) -> u64 {
        requested.unwrap_or(self.default_page).max(1)
    }

    /// Resolve the requested page size.
    ///
    /// A size below one falls back to the default and sizes above
    /// [PaginationConfig::max_page_size] are capped.
    pub fn limit(&self, requested: Option<u64>) -> u64 {
        match requested {
            Some(limit) if limit >= 1 => limit.min(self.max_page_size),
            _ => self.default_page_size,
        }
    }
}

/// The number of items to skip to reach `page` when pages hold `limit` items.
///
/// Pages are numbered from one.
pub fn offset(page: u64, limit: u64) -> u64 {
    page.max(1).saturating_sub(1).saturating_mul(limit)
}

/// The number of pages needed to show `total` items, `limit` at a time.
///
/// There is always at least one page, even if it is empty.
pub fn page_count(total: u64, limit: u64) -> u64 {
    total.div_ceil(limit.max(1)).max(1)
}

/// An element of the page navigation bar.
#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    Page(u64),
    CurrPage(u64),
    Ellipsis,
    NextButton(u64),
    BackButton(u64),
}

/// Lay out the navigation bar for `curr_page` out of `page_count` pages,
/// showing at most `max_pages` page numbers around the current page.
pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let map_page = |page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    };

    let half_window = max_pages / 2;

    let mut indicators: Vec<PaginationIndicator> = if page_count <= max_pages {
        (1..=page_count).map(map_page).collect()
    } else if curr_page <= half_window {
        (1..=max_pages).map(map_page).collect()
    } else if curr_page > page_count - half_window {
        ((page_count - max_pages + 1)..=page_count)
            .map(map_page)
            .collect()
    } else {
        ((curr_page - half_window)..=(curr_page + half_window))
            .map(map_page)
            .collect()
    };

    if page_count > max_pages {
        if curr_page > half_window + 1 {
            indicators.insert(0, PaginationIndicator::Page(1));
            indicators.insert(1, PaginationIndicator::Ellipsis);
        }

        if curr_page < page_count - half_window {
            indicators.push(PaginationIndicator::Ellipsis);
            indicators.push(PaginationIndicator::Page(page_count));
        }
    }

    if curr_page > 1 {
        indicators.insert(0, PaginationIndicator::BackButton(curr_page - 1));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}
