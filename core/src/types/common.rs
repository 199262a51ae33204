use serde::{Deserialize, Serialize};

/// The `{success, data, message?, pagination?}` envelope most endpoints use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub start: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Query parameters accepted by every list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl PaginationParams {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_without_optional_fields() {
        let parsed: ApiResponse<Vec<u32>> =
            serde_json::from_value(json!({"success": true, "data": [1, 2]})).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.data, vec![1, 2]);
        assert!(parsed.message.is_none());
        assert!(parsed.pagination.is_none());
    }

    #[test]
    fn envelope_with_pagination() {
        let parsed: ApiResponse<Vec<u32>> = serde_json::from_value(json!({
            "success": true,
            "data": [],
            "message": "ok",
            "pagination": {"total": 42, "start": 20, "limit": 20}
        }))
        .unwrap();
        assert_eq!(parsed.pagination.map(|p| p.total), Some(42));
    }

    #[test]
    fn pagination_params_skip_unset_fields() {
        let params = PaginationParams {
            order: Some(SortOrder::Desc),
            ..PaginationParams::search("web")
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"search": "web", "order": "desc"})
        );
        assert_eq!(serde_json::to_value(PaginationParams::default()).unwrap(), json!({}));
    }
}
