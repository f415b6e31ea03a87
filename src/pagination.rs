pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// A resolved page window, ready to bind into a LIMIT/OFFSET query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: i64,
    pub offset: i64,
}

/// Normalizes untrusted `page`/`limit` values.
///
/// Missing, unparseable or non-positive values fall back to page 1 and a
/// limit of 10. No upper bound is applied to `limit`.
pub fn resolve_page(page: Option<&str>, limit: Option<&str>) -> PageWindow {
    let page = parse_positive(page).unwrap_or(DEFAULT_PAGE);
    let limit = parse_positive(limit).unwrap_or(DEFAULT_LIMIT);
    PageWindow {
        limit,
        offset: (page - 1).saturating_mul(limit),
    }
}

fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw?.parse::<i64>().ok().filter(|n| *n >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_missing_or_bad() {
        let w = resolve_page(None, None);
        assert_eq!(w, PageWindow { limit: 10, offset: 0 });

        let w = resolve_page(Some("zero"), Some("-4"));
        assert_eq!(w, PageWindow { limit: 10, offset: 0 });

        let w = resolve_page(Some("0"), Some("0"));
        assert_eq!(w, PageWindow { limit: 10, offset: 0 });
    }

    #[test]
    fn offset_from_page_and_limit() {
        assert_eq!(
            resolve_page(Some("3"), Some("25")),
            PageWindow { limit: 25, offset: 50 }
        );
        assert_eq!(
            resolve_page(Some("2"), None),
            PageWindow { limit: 10, offset: 10 }
        );
    }

    #[test]
    fn huge_values_saturate() {
        let w = resolve_page(Some(i64::MAX.to_string().as_str()), Some("1000"));
        assert_eq!(w.limit, 1000);
        assert_eq!(w.offset, i64::MAX);
    }
}
