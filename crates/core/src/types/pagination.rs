//! Page-number pagination.

use core::ops::Range;

/// Errors that can occur when constructing [`Pagination`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationError {
    /// Page number below 1.
    #[error("Page must be >= 1")]
    InvalidPage(i64),
    /// Page size outside `1..=MAX_PER_PAGE`.
    #[error("Per page must be between 1 and {max}")]
    InvalidPerPage {
        /// Maximum page size.
        max: u32,
        /// Requested page size.
        got: i64,
    },
}

/// A validated page request.
///
/// ## Constraints
///
/// - `page` is 1-based and at least 1
/// - `per_page` is between 1 and [`Pagination::MAX_PER_PAGE`]
///
/// ## Examples
///
/// ```
/// use roastery_core::Pagination;
///
/// let p = Pagination::new(3, 2).unwrap();
/// assert_eq!(p.window(5), 4..5);
/// assert_eq!(Pagination::new(4, 2).unwrap().window(5), 5..5);
///
/// assert!(Pagination::new(0, 12).is_err());
/// assert!(Pagination::new(1, 51).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    per_page: u32,
}

impl Pagination {
    /// Default page number.
    pub const DEFAULT_PAGE: u32 = 1;
    /// Default page size.
    pub const DEFAULT_PER_PAGE: u32 = 12;
    /// Largest page size a client may request.
    pub const MAX_PER_PAGE: u32 = 50;

    /// Validate a page request.
    ///
    /// # Errors
    ///
    /// Returns an error if `page < 1` or `per_page` is outside `1..=50`.
    pub fn new(page: i64, per_page: i64) -> Result<Self, PaginationError> {
        let page = u32::try_from(page)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or(PaginationError::InvalidPage(page))?;
        let per_page = u32::try_from(per_page)
            .ok()
            .filter(|n| (1..=Self::MAX_PER_PAGE).contains(n))
            .ok_or(PaginationError::InvalidPerPage {
                max: Self::MAX_PER_PAGE,
                got: per_page,
            })?;
        Ok(Self { page, per_page })
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// The page size.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Zero-based index of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.per_page as usize)
    }

    /// Index range of this page within a list of `total` items.
    ///
    /// Pages past the end yield an empty range rather than an error.
    #[must_use]
    pub fn window(&self, total: usize) -> Range<usize> {
        let start = self.offset().min(total);
        let end = start.saturating_add(self.per_page as usize).min(total);
        start..end
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            per_page: Self::DEFAULT_PER_PAGE,
        }
    }
}
