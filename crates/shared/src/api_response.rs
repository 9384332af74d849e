//! # API レスポンスエンベロープ
//!
//! イベント受付 API の統一レスポンス形式 `{ "data": T }` を提供する。

use serde::{Deserialize, Serialize};

/// 統一レスポンス型
///
/// ## 使用例
///
/// ```
/// use comment_notifier_shared::ApiResponse;
///
/// let response = ApiResponse::new("hello");
/// assert_eq!(response.data, "hello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// 新しい `ApiResponse` を作成する
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializeを正しいjson形状にする() {
        let response = ApiResponse::new("hello");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json, serde_json::json!({ "data": "hello" }));
    }

    #[test]
    fn test_deserializeでjsonからオブジェクトに変換する() {
        let json = r#"{"data": {"received": 2}}"#;
        let response: ApiResponse<serde_json::Value> = serde_json::from_str(json).unwrap();

        assert_eq!(response.data["received"], 2);
    }
}
