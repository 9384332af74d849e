//! # 通知送信
//!
//! コメント通知メールの送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationSender` trait でメール送信を抽象化
//! - **3 つの実装**: SMTP（ローカル開発・リレー）、SES（本番）、Noop（送信無効化）
//! - **環境変数切替**: `NOTIFICATION_BACKEND` でランタイム選択
//! - **fire-and-forget**: 送信結果は呼び出し元がログに残すだけで、再送しない

mod noop;
mod ses;
mod smtp;

use async_trait::async_trait;
use comment_notifier_domain::notification::{EmailMessage, NotificationError};
pub use noop::NoopNotificationSender;
pub use ses::SesNotificationSender;
pub use smtp::SmtpNotificationSender;

/// メール送信トレイト
///
/// 1 回の呼び出しで 1 宛先に 1 通を送る。
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// メールを送信する
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError>;
}
