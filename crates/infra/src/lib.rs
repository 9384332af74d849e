//! # コメント通知 インフラ層
//!
//! リポジトリプラットフォームとメール送信基盤への接続を担当する。
//!
//! ## 設計方針
//!
//! コメント通知ビヘイビアが依存する協調者（ノード・サイト・権限・人物・検索・
//! コンテンツ）を async トレイトとして定義し、その具体実装を提供する。
//! 外部システムの詳細をカプセル化し、ビヘイビアをインフラの変更から保護する。
//!
//! ## 責務
//!
//! - **協調者トレイト**: [`platform`] の 6 トレイトと [`platform::PlatformServices`]
//! - **REST アダプタ**: Alfresco 互換 REST API v1 の呼び出し
//! - **メール送信**: SMTP / SES / Noop
//! - **テスト用モック**: `test-utils` feature で公開
//!
//! ## 依存関係
//!
//! ```text
//! notifier-service → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`error`] - インフラ層エラー定義
//! - [`platform`] - 協調者トレイトと REST アダプタ
//! - [`notification`] - メール送信
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use comment_notifier_infra::platform::{PlatformServices, alfresco::AlfrescoRestClient};
//!
//! let client = AlfrescoRestClient::new("http://localhost:8080/alfresco", "admin", "admin");
//! let services = PlatformServices::from_shared(Arc::new(client));
//! ```

pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod notification;
pub mod platform;

pub use error::{InfraError, InfraErrorKind};
pub use notification::NotificationSender;
pub use platform::PlatformServices;
