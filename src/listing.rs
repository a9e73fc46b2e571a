//! Pagination and search over list pages.
//!
//! The payment service paginates with `limit`/`offset`. Searching is done
//! locally over the page that was fetched, not server-side.

use serde::Deserialize;
use unicode_normalization::UnicodeNormalization;

use crate::models::{Payment, Refund, Subscription};

const MAX_PAGE_LINKS: u64 = 5;

/// Pagination numbers for one page of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

impl PageInfo {
    pub fn new(total: u64, limit: u32, offset: u64) -> Self {
        Self {
            total,
            limit: u64::from(limit.max(1)),
            offset,
        }
    }

    /// 1-based.
    pub fn current_page(&self) -> u64 {
        self.offset / self.limit + 1
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.limit)
    }

    pub fn should_paginate(&self) -> bool {
        self.total_pages() > 1
    }

    pub fn has_previous(&self) -> bool {
        self.current_page() > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page() < self.total_pages()
    }

    pub fn previous_offset(&self) -> Option<u64> {
        self.has_previous()
            .then(|| (self.current_page() - 2) * self.limit)
    }

    pub fn next_offset(&self) -> Option<u64> {
        self.has_next().then(|| self.current_page() * self.limit)
    }

    pub fn offset_for_page(&self, page: u64) -> u64 {
        page.saturating_sub(1) * self.limit
    }

    /// Up to five page numbers around the current page.
    pub fn page_links(&self) -> Vec<u64> {
        let total = self.total_pages();
        if total == 0 {
            return Vec::new();
        }
        let current = self.current_page().min(total);
        let mut start = current.saturating_sub(MAX_PAGE_LINKS / 2).max(1);
        let end = (start + MAX_PAGE_LINKS - 1).min(total);
        start = end.saturating_sub(MAX_PAGE_LINKS - 1).max(1);
        (start..=end).collect()
    }

    /// `Showing 21 to 40 of 57 payments`
    pub fn range_label(&self, noun: &str) -> String {
        format!(
            "Showing {} to {} of {} {}",
            self.offset + 1,
            (self.offset + self.limit).min(self.total),
            self.total,
            noun
        )
    }
}

/// Query string accepted by every list page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub offset: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notice: Option<String>,
}

impl ListQuery {
    /// Garbage or negative offsets fall back to the first page.
    pub fn offset(&self) -> u64 {
        self.offset
            .as_deref()
            .and_then(|o| o.trim().parse().ok())
            .unwrap_or(0)
    }

    pub fn search(&self) -> &str {
        self.q.as_deref().map(str::trim).unwrap_or("")
    }

    pub fn status_filter(&self) -> Option<&str> {
        self.status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Something a list page can search through.
pub trait Searchable {
    /// Status string used by the status filter.
    fn status(&self) -> &str;

    /// Text fields matched against the search box.
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for Payment {
    fn status(&self) -> &str {
        self.status.as_str()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.id.as_str(),
            self.customer_id.as_str(),
            self.provider_payment_id.as_str(),
            self.provider.as_ref(),
            self.currency.as_ref(),
            self.status.as_str(),
        ];
        fields.extend(self.description.as_deref());
        fields.extend(self.statement_descriptor.as_deref());
        fields.extend(self.subscription_id.as_deref());
        fields
    }
}

impl Searchable for Subscription {
    fn status(&self) -> &str {
        self.status.as_str()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.id.as_str(),
            self.customer_id.as_str(),
            self.provider_subscription_id.as_str(),
            self.provider.as_ref(),
            self.product_name.as_str(),
            self.interval.as_str(),
            self.status.as_str(),
        ];
        fields.extend(self.product_description.as_deref());
        fields
    }
}

impl Searchable for Refund {
    fn status(&self) -> &str {
        self.status.as_str()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.id.as_str(),
            self.payment_id.as_str(),
            self.provider_refund_id.as_str(),
            self.provider.as_ref(),
            self.status.as_str(),
        ];
        fields.extend(self.reason.as_deref());
        fields.extend(self.notes.as_deref());
        fields
    }
}

fn normalize(s: &str) -> String {
    s.trim().nfkc().collect::<String>().to_lowercase()
}

pub fn matches_search<T: Searchable>(item: &T, query: &str) -> bool {
    let needle = normalize(query);
    if needle.is_empty() {
        return true;
    }
    item.search_fields()
        .into_iter()
        .any(|field| normalize(field).contains(&needle))
}

/// Filter an already-loaded page, keeping its order. The status match is exact.
pub fn filter_page<'a, T: Searchable>(
    items: &'a [T],
    query: &str,
    status: Option<&str>,
) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| status.is_none_or(|s| item.status() == s))
        .filter(|item| matches_search(*item, query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        status: &'static str,
        fields: Vec<&'static str>,
    }

    impl Searchable for Row {
        fn status(&self) -> &str {
            self.status
        }

        fn search_fields(&self) -> Vec<&str> {
            self.fields.clone()
        }
    }

    #[test]
    fn test_page_math_middle_page() {
        let page = PageInfo::new(57, 20, 20);
        assert_eq!(page.current_page(), 2);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.previous_offset(), Some(0));
        assert_eq!(page.next_offset(), Some(40));
        assert_eq!(page.range_label("payments"), "Showing 21 to 40 of 57 payments");
    }

    #[test]
    fn test_page_math_edges() {
        let last = PageInfo::new(57, 20, 40);
        assert!(!last.has_next());
        assert_eq!(last.range_label("refunds"), "Showing 41 to 57 of 57 refunds");

        let first = PageInfo::new(57, 20, 0);
        assert!(!first.has_previous());
        assert_eq!(first.previous_offset(), None);

        let single = PageInfo::new(20, 20, 0);
        assert!(!single.should_paginate());

        let empty = PageInfo::new(0, 20, 0);
        assert_eq!(empty.total_pages(), 0);
        assert!(empty.page_links().is_empty());
    }

    #[test]
    fn test_zero_limit_does_not_divide_by_zero() {
        let page = PageInfo::new(3, 0, 0);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn test_page_links_window() {
        assert_eq!(PageInfo::new(200, 20, 0).page_links(), vec![1, 2, 3, 4, 5]);
        assert_eq!(PageInfo::new(200, 20, 100).page_links(), vec![4, 5, 6, 7, 8]);
        assert_eq!(PageInfo::new(200, 20, 180).page_links(), vec![6, 7, 8, 9, 10]);
        assert_eq!(PageInfo::new(50, 20, 0).page_links(), vec![1, 2, 3]);
    }

    #[test]
    fn test_list_query_offset_parsing() {
        let q = |o: &str| ListQuery {
            offset: Some(o.to_string()),
            ..Default::default()
        };
        assert_eq!(q("40").offset(), 40);
        assert_eq!(q("-5").offset(), 0);
        assert_eq!(q("abc").offset(), 0);
        assert_eq!(ListQuery::default().offset(), 0);
    }

    #[test]
    fn test_filter_page_search_and_status() {
        let rows = vec![
            Row { status: "succeeded", fields: vec!["pay_1", "Coffee beans"] },
            Row { status: "failed", fields: vec!["pay_2", "Coffee grinder"] },
            Row { status: "succeeded", fields: vec!["pay_3", "Tea"] },
        ];

        assert_eq!(filter_page(&rows, "", None).len(), 3);
        assert_eq!(filter_page(&rows, "  COFFEE ", None).len(), 2);

        let hits = filter_page(&rows, "coffee", Some("succeeded"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].fields[0], "pay_1");

        assert!(filter_page(&rows, "espresso", None).is_empty());
    }

    #[test]
    fn test_status_filter_is_exact() {
        let rows = vec![Row { status: "succeeded", fields: vec!["pay_1"] }];
        assert_eq!(filter_page(&rows, "", Some("succeeded")).len(), 1);
        assert!(filter_page(&rows, "", Some("Succeeded")).is_empty());
        assert!(filter_page(&rows, "", Some("succeed")).is_empty());
    }

    #[test]
    fn test_search_normalizes_unicode() {
        let rows = vec![Row { status: "active", fields: vec!["Ｐｒｅｍｉｕｍ plan"] }];
        assert_eq!(filter_page(&rows, "premium", None).len(), 1);
    }
}
