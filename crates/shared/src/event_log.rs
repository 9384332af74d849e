//! # ビジネスイベントログとエラーコンテキストの構造化ヘルパー
//!
//! 通知の送信結果を `jq` で追跡できるよう、ログフィールドの命名規約と
//! ヘルパーマクロを提供する。
//!
//! ## ビジネスイベント
//!
//! [`log_business_event!`] マクロで出力する。`event.kind = "business_event"` マーカーが
//! 自動付与され、`jq 'select(.["event.kind"] == "business_event")'` でフィルタできる。
//!
//! ## エラーコンテキスト
//!
//! `tracing::error!` に `error.category` + `error.kind` フィールドを直接追加する。
//! 定数は [`error`] モジュールで提供。
//!
//! ## フィールド命名規約
//!
//! ドット記法（`event.category`、`error.kind`）を使用。tracing の
//! `$($field:ident).+` パターンでサポートされ、JSON 出力でフラットなキーになる。

/// ビジネスイベントを構造化ログとして出力する。
///
/// `event.kind = "business_event"` マーカーを自動付与し、
/// `tracing::info!` レベルで出力する。
///
/// ## 必須フィールド（慣例）
///
/// - `event.category`: イベントカテゴリ（[`event::category`] の定数を使用）
/// - `event.action`: アクション名（[`event::action`] の定数を使用）
/// - `event.result`: 結果（[`event::result`] の定数を使用）
///
/// ## 推奨フィールド
///
/// - `event.entity_type`: エンティティ種別（[`event::entity_type`] の定数を使用）
/// - `event.entity_id`: エンティティ ID（ノード参照）
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const NOTIFICATION: &str = "notification";
    }

    /// イベントアクション
    pub mod action {
        pub const NOTIFICATION_SENT: &str = "notification.sent";
        pub const NOTIFICATION_FAILED: &str = "notification.failed";
        pub const NOTIFICATION_SKIPPED: &str = "notification.skipped";
    }

    /// エンティティ種別
    pub mod entity_type {
        pub const FORUM_POST: &str = "forum_post";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    /// エラーカテゴリ
    pub mod category {
        /// 外部リポジトリ（ノード・サイト・人物の参照）
        pub const REPOSITORY: &str = "repository";
        /// メール送信基盤
        pub const MAIL: &str = "mail";
        /// 設定・テンプレート
        pub const CONFIGURATION: &str = "configuration";
    }

    /// エラー種別
    pub mod kind {
        pub const INCONSISTENT_STATE: &str = "inconsistent_state";
        pub const REPOSITORY_ACCESS: &str = "repository_access";
        pub const TEMPLATE_MISSING: &str = "template_missing";
        pub const TEMPLATE_RENDER: &str = "template_render";
        pub const SEND: &str = "send";
    }
}
