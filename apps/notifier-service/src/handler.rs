//! # HTTP リクエストハンドラ
//!
//! コミット済みトランザクションのイベントを受け付ける内部 API。
//!
//! ## ハンドラ一覧
//!
//! - `health`: ヘルスチェック
//! - `event`: コンテンツ更新イベントの受付

pub mod event;
pub mod health;

use axum::{
    Router,
    routing::{get, post},
};
pub use event::{EventState, receive_content_updates};
pub use health::health_check;

/// ルーターを構築する
pub fn router(state: EventState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/internal/events/content-update", post(receive_content_updates))
        .with_state(state)
}
