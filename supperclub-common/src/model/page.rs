//! Offset pagination with has-more detection.
//!
//! Every paginated query fetches one row beyond the requested page size and
//! drops it again; the presence of that probe row is what `hasMore` reports.
//! No count queries.

use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};

/// 1-based page index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize)]
#[serde(transparent)]
pub struct PageNumber(u32);

impl PageNumber {
    pub const FIRST: Self = Self(1);

    #[must_use]
    pub fn new(page: u32) -> Option<Self> {
        (page >= 1).then_some(Self(page))
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }

    /// The number of rows skipped before this page starts.
    #[must_use]
    pub fn offset(self, limit: PageSize) -> i64 {
        i64::from(self.0 - 1) * i64::from(limit.get())
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl<'de> Deserialize<'de> for PageNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = u32::deserialize(deserializer)?;
        PageNumber::new(inner).ok_or_else(|| {
            Error::invalid_value(Unexpected::Unsigned(u64::from(inner)), &"a page number >= 1")
        })
    }
}

/// Rows per page, between 1 and [`PageSize::MAX`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize)]
#[serde(transparent)]
pub struct PageSize(u32);

impl PageSize {
    pub const DEFAULT: Self = Self(20);
    pub const MAX: Self = Self(100);

    #[must_use]
    pub fn new(limit: u32) -> Option<Self> {
        (limit >= 1).then_some(Self(limit))
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Clamp to [`PageSize::MAX`]; oversized limits degrade instead of
    /// erroring.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self(self.0.min(Self::MAX.0))
    }

    /// The row count to actually fetch: one beyond the page.
    #[must_use]
    pub fn probe(self) -> i64 {
        i64::from(self.0) + 1
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = u32::deserialize(deserializer)?;
        PageSize::new(inner).ok_or_else(|| {
            Error::invalid_value(Unexpected::Unsigned(u64::from(inner)), &"a page size >= 1")
        })
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: PageNumber,
    pub limit: PageSize,
    pub has_more: bool,
}

/// One page of results plus its pagination metadata.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Build a page from rows fetched with [`PageSize::probe`]: everything
    /// past `limit` proves further pages exist and is discarded.
    #[must_use]
    pub fn from_probe(mut items: Vec<T>, page: PageNumber, limit: PageSize) -> Self {
        let limit_len = usize::try_from(limit.get()).unwrap_or(usize::MAX);
        let has_more = items.len() > limit_len;
        items.truncate(limit_len);

        Self {
            items,
            pagination: Pagination {
                page,
                limit,
                has_more,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::page::{Page, PageNumber, PageSize};

    fn page(n: u32) -> PageNumber {
        PageNumber::new(n).unwrap()
    }

    fn limit(n: u32) -> PageSize {
        PageSize::new(n).unwrap()
    }

    #[test]
    fn rejects_zero() {
        assert!(PageNumber::new(0).is_none());
        assert!(PageSize::new(0).is_none());
        assert_eq!(PageNumber::new(1), Some(PageNumber::FIRST));
    }

    #[test]
    fn clamps_oversized_limits() {
        assert_eq!(limit(500).clamped(), PageSize::MAX);
        assert_eq!(limit(20).clamped(), limit(20));
    }

    #[test]
    fn offsets_tile_the_result_set() {
        assert_eq!(page(1).offset(limit(10)), 0);
        assert_eq!(page(2).offset(limit(10)), 10);
        assert_eq!(page(7).offset(limit(25)), 150);
    }

    #[test]
    fn consecutive_pages_are_disjoint() {
        let rows: Vec<u32> = (0..45).collect();
        let size = limit(10);

        let mut seen = Vec::new();
        for n in 1..=5 {
            let page_number = page(n);
            let start = usize::try_from(page_number.offset(size)).unwrap();
            let fetched: Vec<u32> = rows
                .iter()
                .skip(start)
                .take(usize::try_from(size.probe()).unwrap())
                .copied()
                .collect();
            let result = Page::from_probe(fetched, page_number, size);

            for item in &result.items {
                assert!(!seen.contains(item), "pages must not overlap");
            }
            seen.extend(result.items);
        }

        assert_eq!(seen, rows);
    }

    #[test]
    fn probe_row_sets_has_more_and_is_dropped() {
        let size = limit(3);

        let full = Page::from_probe(vec![1, 2, 3, 4], page(1), size);
        assert!(full.pagination.has_more);
        assert_eq!(full.items, vec![1, 2, 3]);

        let last = Page::from_probe(vec![1, 2, 3], page(2), size);
        assert!(!last.pagination.has_more);
        assert_eq!(last.items, vec![1, 2, 3]);

        let short = Page::from_probe(vec![1], page(2), size);
        assert!(!short.pagination.has_more);

        let past_the_end = Page::from_probe(Vec::new(), page(99), size);
        assert!(!past_the_end.pagination.has_more);
        assert!(past_the_end.items.is_empty());
    }
}
