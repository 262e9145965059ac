use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::validate_not_empty;

pub const DEFAULT_LIMIT: i64 = 100;
pub const MAX_LIMIT: i64 = 1000;

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

// Parámetros de paginación ?skip=&limit=
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct PaginationParams {
    #[serde(default)]
    #[validate(range(min = 0))]
    pub skip: i64,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 1000))]
    pub limit: i64,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

// Búsqueda por texto ?q=
#[derive(Debug, Deserialize, Validate)]
pub struct SearchQuery {
    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub q: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let params: PaginationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.skip, 0);
        assert_eq!(params.limit, DEFAULT_LIMIT);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_pagination_bounds() {
        let params = PaginationParams { skip: -1, limit: 10 };
        assert!(params.validate().is_err());

        let params = PaginationParams { skip: 0, limit: 0 };
        assert!(params.validate().is_err());

        let params = PaginationParams { skip: 0, limit: MAX_LIMIT + 1 };
        assert!(params.validate().is_err());

        let params = PaginationParams { skip: 500, limit: MAX_LIMIT };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_search_query_rejects_blank() {
        assert!(SearchQuery { q: "   ".to_string() }.validate().is_err());
        assert!(SearchQuery { q: String::new() }.validate().is_err());
        assert!(SearchQuery { q: "dup".to_string() }.validate().is_ok());
    }
}
