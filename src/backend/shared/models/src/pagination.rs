use serde::{Deserialize, Serialize};

/// Default and maximum page size for one listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl PageLimits {
    pub const fn new(default_limit: i64, max_limit: i64) -> Self {
        Self {
            default_limit,
            max_limit,
        }
    }
}

/// A window over an ordered, filtered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub limit: i64,
    pub offset: i64,
}

impl PageRequest {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }

    /// Builds a page from raw caller input.
    ///
    /// A missing or zero limit falls back to the default, anything above the
    /// cap is clamped to it, and negative offsets become zero.
    pub fn clamped(limit: Option<i64>, offset: Option<i64>, limits: PageLimits) -> Self {
        let limit = match limit {
            Some(l) if l > 0 => l.min(limits.max_limit),
            Some(l) if l < 0 => 1,
            _ => limits.default_limit,
        };
        let offset = offset.unwrap_or(0).max(0);

        Self { limit, offset }
    }

    /// The page that follows this one.
    pub fn next(&self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset + self.limit,
        }
    }

    pub fn has_more(&self, total: i64) -> bool {
        total > self.offset + self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

impl PaginationMeta {
    pub fn new(page: PageRequest, total: i64) -> Self {
        Self {
            total,
            limit: page.limit,
            offset: page.offset,
            has_more: page.has_more(total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: PageLimits = PageLimits::new(50, 100);

    #[test]
    fn test_clamped_defaults() {
        let page = PageRequest::clamped(None, None, LIMITS);
        assert_eq!(page, PageRequest::new(50, 0));
    }

    #[test]
    fn test_clamped_caps_limit_and_offset() {
        assert_eq!(PageRequest::clamped(Some(500), Some(-3), LIMITS), PageRequest::new(100, 0));
        assert_eq!(PageRequest::clamped(Some(0), Some(10), LIMITS), PageRequest::new(50, 10));
        assert_eq!(PageRequest::clamped(Some(-5), None, LIMITS), PageRequest::new(1, 0));
    }

    #[test]
    fn test_has_more() {
        let page = PageRequest::new(2, 0);
        assert!(page.has_more(3));
        assert!(!page.next().has_more(3));
        assert!(!PageRequest::new(2, 1).has_more(3));
    }

    #[test]
    fn test_meta_serializes_camel_case() {
        let meta = PaginationMeta::new(PageRequest::new(10, 0), 25);
        let json = serde_json::to_value(meta).unwrap();
        assert_eq!(json["hasMore"], true);
        assert_eq!(json["total"], 25);
    }
}
