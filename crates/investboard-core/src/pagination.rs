//! Fixed-size pages over an already filtered list

use serde::Serialize;

/// Page size used by the statement list
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page of items, 1-indexed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub number: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<'a, T> Page<'a, T> {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Splits slices into pages of a configured size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    /// A page size of 0 is treated as 1
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `ceil(total / page_size)`, never less than 1
    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size).max(1)
    }

    /// Page `number`, clamped into `1..=total_pages`
    pub fn page<'a, T>(&self, items: &'a [T], number: usize) -> Page<'a, T> {
        let total_pages = self.total_pages(items.len());
        let number = number.clamp(1, total_pages);
        let start = ((number - 1) * self.page_size).min(items.len());
        let end = (start + self.page_size).min(items.len());

        Page {
            items: &items[start..end],
            number,
            page_size: self.page_size,
            total_items: items.len(),
            total_pages,
        }
    }

    /// Every page in order
    pub fn pages<'a, T>(&self, items: &'a [T]) -> impl Iterator<Item = Page<'a, T>> + 'a
    where
        T: 'a,
    {
        let paginator = *self;
        (1..=paginator.total_pages(items.len())).map(move |n| paginator.page(items, n))
    }
}

/// Convenience wrapper around [`Paginator::page`]
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    Paginator::new(page_size).page(items, page)
}
