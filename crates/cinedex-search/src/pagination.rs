//! Page arithmetic.

/// Fixed number of results the directory returns per page.
///
/// The directory does not report its page size, so this is assumed.
pub const RESULTS_PER_PAGE: u32 = 10;

/// Number of pages needed for `total_results` matches.
#[must_use]
pub const fn total_pages(total_results: u32) -> u32 {
    total_results.div_ceil(RESULTS_PER_PAGE)
}

/// Clamps a requested page into `[1, total_pages]`.
///
/// With no known pages the result is 1.
#[must_use]
pub fn clamp_page(requested: u32, total_pages: u32) -> u32 {
    requested.min(total_pages).max(1)
}
