//! # コメント通知 共有ユーティリティ
//!
//! このクレートは、コメント通知プロジェクト全体で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain を除く）から依存される
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - 外部クレートへの依存は最小限に抑える（tracing 系は `observability` feature）

pub mod api_response;
pub mod event_log;
pub mod health;
pub mod observability;

pub use api_response::ApiResponse;
pub use health::HealthResponse;
