//! Page arithmetic
//!
//! Splits a counted collection into consecutive, non-overlapping pages. An
//! empty collection still has one (empty) first page. Pages carry sizes
//! only; the runner locates each one by the last primary key of the page
//! before it.

use crate::domain::{HattoriError, Result};

/// A slice of the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number
    pub number: usize,

    /// Records on this page
    pub len: usize,
}

/// Splits `count` records into pages of `per_page`
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    count: usize,
    per_page: usize,
}

impl Paginator {
    /// Creates a paginator
    ///
    /// # Errors
    ///
    /// Returns a validation error if `per_page` is zero.
    pub fn new(count: usize, per_page: usize) -> Result<Self> {
        if per_page == 0 {
            return Err(HattoriError::Validation(
                "batch size must be a positive integer".to_string(),
            ));
        }
        Ok(Self { count, per_page })
    }

    /// Number of pages, at least one
    pub fn num_pages(&self) -> usize {
        if self.count == 0 {
            1
        } else {
            self.count.div_ceil(self.per_page)
        }
    }

    /// Returns a page by its 1-based number
    pub fn page(&self, number: usize) -> Result<Page> {
        if number == 0 || number > self.num_pages() {
            return Err(HattoriError::Validation(format!(
                "page {number} is out of range 1..={}",
                self.num_pages()
            )));
        }
        let before = (number - 1) * self.per_page;
        let len = self.per_page.min(self.count.saturating_sub(before));
        Ok(Page { number, len })
    }

    /// All pages in order
    pub fn pages(&self) -> impl Iterator<Item = Page> + '_ {
        (1..=self.num_pages()).filter_map(move |number| self.page(number).ok())
    }
}
