//! # ヘルスチェックハンドラ
//!
//! レスポンス型は [`comment_notifier_shared::HealthResponse`] を参照。

use axum::Json;
use comment_notifier_shared::HealthResponse;

/// Notifier Service のヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}
