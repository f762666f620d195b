// Copyright 2025 Cowboy AI, LLC.

//! Paging support for store searches

use serde::{Deserialize, Serialize};

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    /// Oldest first
    #[default]
    Ascending,
    /// Newest first
    Descending,
}

/// One page of a search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Index of the first item of the page in the whole result
    pub offset: usize,
    /// Number of items in the whole result
    pub total: usize,
    /// Items of the page
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Cut the page `[offset, offset + limit)` out of `all`
    pub fn from_all(all: Vec<T>, offset: usize, limit: usize) -> Self {
        let total = all.len();
        let items = all.into_iter().skip(offset).take(limit).collect();
        Self {
            offset,
            total,
            items,
        }
    }

    /// Page without items
    pub fn empty(offset: usize) -> Self {
        Self {
            offset,
            total: 0,
            items: Vec::new(),
        }
    }

    /// Whether items exist after this page
    pub fn has_more(&self) -> bool {
        self.offset + self.items.len() < self.total
    }

    /// Map the items to a different type
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            offset: self.offset,
            total: self.total,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_from_all() {
        let page = Page::from_all((0..25).collect(), 20, 10);
        assert_eq!(page.items, vec![20, 21, 22, 23, 24]);
        assert_eq!(page.total, 25);
        assert!(!page.has_more());

        let first = Page::from_all((0..25).collect(), 0, 10);
        assert!(first.has_more());
        assert_eq!(first.map(|x| x * 2).items[1], 2);
    }

    #[test]
    fn test_offset_beyond_total() {
        let page: Page<i32> = Page::from_all(vec![1, 2], 5, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 2);
        assert_eq!(Page::<i32>::empty(3).offset, 3);
    }
}
