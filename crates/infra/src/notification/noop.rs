//! Noop 通知送信実装
//!
//! メールを実際に送信せず、ログ出力のみ行う。
//! `NOTIFICATION_BACKEND` 未設定時の既定値。

use async_trait::async_trait;
use comment_notifier_domain::notification::{EmailMessage, NotificationError};

use super::NotificationSender;

/// Noop 通知送信（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct NoopNotificationSender;

#[async_trait]
impl NotificationSender for NoopNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        tracing::info!(
            subject = %email.subject,
            html = email.body.is_html(),
            body_len = email.body.as_str().len(),
            "Noop: メール送信をスキップ"
        );
        Ok(())
    }
}
