//! # Notifier Service エラー定義
//!
//! ビヘイビア実行時のエラーと、イベント受付 API の HTTP レスポンスへの変換を定義する。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use comment_notifier_domain::{node::NodeRef, notification::NotificationError};
use comment_notifier_infra::InfraError;
use comment_notifier_shared::event_log::error::{category, kind};
use serde::Serialize;
use thiserror::Error;

/// ビヘイビアの実行エラー
///
/// いずれもイベント単位のハード失敗で、そのイベントの通知は 1 通も送られない。
/// 受信者ごとの送信失敗はここに含まれない（ログに残して次の受信者へ進む）。
#[derive(Debug, Error)]
pub enum BehaviourError {
    /// リポジトリとの通信に失敗
    #[error("リポジトリアクセスに失敗: {0}")]
    Repository(#[from] InfraError),

    /// 存在するはずの親・プロパティ・コンテンツがない
    #[error("リポジトリの状態が不整合です ({node_ref}): {detail}")]
    Inconsistent { node_ref: NodeRef, detail: String },

    /// 通知テンプレートを用意できない
    #[error("通知テンプレートエラー: {0}")]
    Template(#[from] NotificationError),
}

impl BehaviourError {
    pub fn inconsistent(node_ref: &NodeRef, detail: impl Into<String>) -> Self {
        Self::Inconsistent {
            node_ref: node_ref.clone(),
            detail:   detail.into(),
        }
    }

    /// ログの `error.category` / `error.kind`
    pub fn log_fields(&self) -> (&'static str, &'static str) {
        match self {
            Self::Repository(_) => (category::REPOSITORY, kind::REPOSITORY_ACCESS),
            Self::Inconsistent { .. } => (category::REPOSITORY, kind::INCONSISTENT_STATE),
            Self::Template(NotificationError::TemplateNotFound(_)) => {
                (category::CONFIGURATION, kind::TEMPLATE_MISSING)
            }
            Self::Template(NotificationError::TemplateFailed(_)) => {
                (category::CONFIGURATION, kind::TEMPLATE_RENDER)
            }
            Self::Template(NotificationError::SendFailed(_)) => (category::MAIL, kind::SEND),
        }
    }
}

/// エラーレスポンス（RFC 7807 Problem Details）
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title:      String,
    pub status:     u16,
    pub detail:     String,
}

/// イベント受付 API のエラー
#[derive(Debug, Error)]
pub enum ServiceError {
    /// 不正なリクエスト
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, error_type, title, detail) = match self {
            ServiceError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "https://comment-notifier.example.com/errors/bad-request",
                "Bad Request",
                msg,
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error_type: error_type.to_string(),
                title: title.to_string(),
                status: status.as_u16(),
                detail,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_テンプレート不在は設定エラーとして分類される() {
        let err = BehaviourError::Template(NotificationError::TemplateNotFound("x".to_string()));

        assert_eq!(
            err.log_fields(),
            (category::CONFIGURATION, kind::TEMPLATE_MISSING)
        );
    }

    #[test]
    fn test_不整合エラーはノード参照をメッセージに含む() {
        let node = NodeRef::in_spaces_store("post-1");

        let err = BehaviourError::inconsistent(&node, "作成者がありません");

        assert_eq!(
            err.to_string(),
            "リポジトリの状態が不整合です (workspace://SpacesStore/post-1): 作成者がありません"
        );
        assert_eq!(
            err.log_fields(),
            (category::REPOSITORY, kind::INCONSISTENT_STATE)
        );
    }

    #[tokio::test]
    async fn test_bad_requestはproblem_detailsで400を返す() {
        let response = ServiceError::BadRequest("nodeRef が不正です".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["title"], "Bad Request");
        assert_eq!(json["status"], 400);
        assert_eq!(json["detail"], "nodeRef が不正です");
    }
}
