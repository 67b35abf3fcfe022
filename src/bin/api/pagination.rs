use serde::{Deserialize, Serialize};

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub results: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::PageQuery;

    #[test]
    fn defaults_apply_when_absent() {
        let page = PageQuery::default();

        assert_eq!(page.limit(), 10);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let page = PageQuery {
            limit: Some(100_000),
            offset: Some(-5),
        };
        assert_eq!(page.limit(), 100);
        assert_eq!(page.offset(), 0);

        let page = PageQuery {
            limit: Some(0),
            offset: Some(30),
        };
        assert_eq!(page.limit(), 1);
        assert_eq!(page.offset(), 30);
    }
}
