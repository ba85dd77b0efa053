//! Paging through lists of rows, plus the indicators shown under a paged table.
//!
//! Page indices are zero-based everywhere in code and in query strings, only
//! the rendered labels count from one.

/// The page sizes a user can pick from.
pub const PAGE_SIZE_OPTIONS: [u64; 3] = [10, 20, 50];

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The number of rows per page when the request does not pick one.
    pub default_page_size: u64,
    /// The maximum number of page links to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_pages: 5,
        }
    }
}

impl PaginationConfig {
    /// Use `requested` if it is one of [PAGE_SIZE_OPTIONS], otherwise the
    /// default page size.
    pub fn page_size_or_default(&self, requested: Option<u64>) -> u64 {
        requested
            .filter(|size| PAGE_SIZE_OPTIONS.contains(size))
            .unwrap_or(self.default_page_size)
    }
}

/// The rows `[page_index * page_size, page_index * page_size + page_size)`.
///
/// Yields `min(page_size, total - page_index * page_size)` rows and an empty
/// slice once the page starts past the end.
pub fn paginate<T>(rows: &[T], page_index: u64, page_size: u64) -> &[T] {
    let start = page_index.saturating_mul(page_size);
    let Ok(start) = usize::try_from(start) else {
        return &[];
    };

    if start >= rows.len() {
        return &[];
    }

    let end = start.saturating_add(page_size as usize).min(rows.len());

    &rows[start..end]
}

/// The number of pages needed for `total_rows`, never less than one so that
/// an empty list still has a (blank) first page.
pub fn page_count(total_rows: usize, page_size: u64) -> u64 {
    if page_size == 0 {
        return 1;
    }

    (total_rows as u64).div_ceil(page_size).max(1)
}

/// Pull `page_index` back onto the last page when it points past the end,
/// e.g. after a filter shrinks the result set.
pub fn clamp_page_index(page_index: u64, total_rows: usize, page_size: u64) -> u64 {
    page_index.min(page_count(total_rows, page_size) - 1)
}

#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    Page(u64),
    CurrPage(u64),
    Ellipsis,
    NextButton(u64),
    BackButton(u64),
}

/// Build the indicators for a pager showing at most `max_pages` page links
/// around the current page, with links to the first and last page and
/// back/next buttons when they lead somewhere.
pub fn create_pagination_indicators(
    curr_index: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let window_size = max_pages.clamp(1, page_count.max(1));
    let window_start = curr_index
        .saturating_sub(max_pages / 2)
        .min(page_count.saturating_sub(window_size));
    let window_end = window_start + window_size;

    let mut indicators = Vec::new();

    if curr_index > 0 {
        indicators.push(PaginationIndicator::BackButton(curr_index - 1));
    }

    if window_start > 0 {
        indicators.push(PaginationIndicator::Page(0));
    }

    if window_start > 1 {
        indicators.push(PaginationIndicator::Ellipsis);
    }

    indicators.extend((window_start..window_end).map(|index| {
        if index == curr_index {
            PaginationIndicator::CurrPage(index)
        } else {
            PaginationIndicator::Page(index)
        }
    }));

    if window_end + 1 < page_count {
        indicators.push(PaginationIndicator::Ellipsis);
    }

    if window_end < page_count {
        indicators.push(PaginationIndicator::Page(page_count - 1));
    }

    if curr_index + 1 < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_index + 1));
    }

    indicators
}
