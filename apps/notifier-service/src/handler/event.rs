//! # イベント受付ハンドラ
//!
//! リポジトリでコミットされたトランザクション 1 件分のコンテンツ更新イベントを受け取り、
//! 1 つの [`TransactionScope`](crate::usecase::TransactionScope) に流してからコミットする。
//!
//! ## エンドポイント
//!
//! - `POST /internal/events/content-update`
//!
//! ```json
//! {"events":[{"nodeRef":"workspace://SpacesStore/<id>","nodeType":"fm:post","newContent":true}]}
//! ```
//!
//! ノード参照・QName が 1 件でも不正なら、どのイベントも配送せずに 400 を返す。

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use comment_notifier_domain::{node::NodeRef, qname::QName};
use comment_notifier_shared::ApiResponse;
use serde::{Deserialize, Serialize};

use crate::{error::ServiceError, usecase::PolicyComponent};

/// イベント受付ハンドラの共有状態
#[derive(Clone)]
pub struct EventState {
    pub policy: Arc<PolicyComponent>,
}

// --- リクエスト/レスポンス型 ---

/// コンテンツ更新イベント
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentUpdateEventDto {
    pub node_ref:    String,
    pub node_type:   String,
    pub new_content: bool,
}

/// イベント受付リクエスト
#[derive(Debug, Deserialize)]
pub struct ContentUpdateRequest {
    pub events: Vec<ContentUpdateEventDto>,
}

/// イベント受付レスポンス
#[derive(Debug, Serialize)]
pub struct ContentUpdateResponse {
    /// 受け付けたイベント数
    pub received: usize,
    /// 呼び出したビヘイビア数
    pub invoked:  usize,
    /// 失敗したビヘイビア数
    pub failed:   usize,
}

struct ParsedEvent {
    node_ref:    NodeRef,
    node_type:   QName,
    new_content: bool,
}

impl TryFrom<&ContentUpdateEventDto> for ParsedEvent {
    type Error = ServiceError;

    fn try_from(dto: &ContentUpdateEventDto) -> Result<Self, Self::Error> {
        Ok(Self {
            node_ref:    dto
                .node_ref
                .parse()
                .map_err(|e| ServiceError::BadRequest(format!("nodeRef が不正です: {e}")))?,
            node_type:   dto
                .node_type
                .parse()
                .map_err(|e| ServiceError::BadRequest(format!("nodeType が不正です: {e}")))?,
            new_content: dto.new_content,
        })
    }
}

// --- ハンドラ ---

/// POST /internal/events/content-update
#[tracing::instrument(skip_all)]
pub async fn receive_content_updates(
    State(state): State<EventState>,
    payload: Result<Json<ContentUpdateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let Json(req) = payload.map_err(|e| ServiceError::BadRequest(e.body_text()))?;

    let events = req
        .events
        .iter()
        .map(ParsedEvent::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let received = events.len();

    let mut tx = state.policy.begin();
    for event in events {
        tx.on_content_update(event.node_type, event.node_ref, event.new_content)
            .await;
    }
    let report = tx.commit().await;

    tracing::info!(
        received,
        invoked = report.invoked,
        failed = report.failed,
        "コンテンツ更新イベントを処理しました"
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::new(ContentUpdateResponse {
            received,
            invoked: report.invoked,
            failed: report.failed,
        })),
    ))
}
