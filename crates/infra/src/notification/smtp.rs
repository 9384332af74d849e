//! SMTP 通知送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//! 開発環境ではローカルの SMTP キャッチャー（Mailpit 等）に接続する。

use async_trait::async_trait;
use comment_notifier_domain::notification::{EmailMessage, MailBody, NotificationError};
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Message, SinglePart, header::ContentType},
};

use super::NotificationSender;

/// SMTP 通知送信
///
/// `lettre::AsyncSmtpTransport<Tokio1Executor>` をラップする。
pub struct SmtpNotificationSender {
    transport:    AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpNotificationSender {
    /// 新しい SMTP 送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `host`: SMTP サーバーのホスト名（例: "localhost"）
    /// - `port`: SMTP サーバーのポート番号（例: 1025）
    /// - `from_address`: 送信元メールアドレス
    pub fn new(host: &str, port: u16, from_address: String) -> Self {
        // builder_dangerous: TLS なしで接続（ローカル SMTP 向け）
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();

        Self {
            transport,
            from_address,
        }
    }

    fn build_message(&self, email: &EmailMessage) -> Result<Message, NotificationError> {
        let content_type = match email.body {
            MailBody::Html(_) => ContentType::TEXT_HTML,
            MailBody::Text(_) => ContentType::TEXT_PLAIN,
        };

        Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|e| NotificationError::SendFailed(format!("送信元アドレス不正: {e}")))?,
            )
            .to(email
                .to
                .parse()
                .map_err(|e| NotificationError::SendFailed(format!("宛先アドレス不正: {e}")))?)
            .subject(&email.subject)
            .singlepart(
                SinglePart::builder()
                    .header(content_type)
                    .body(email.body.as_str().to_string()),
            )
            .map_err(|e| NotificationError::SendFailed(format!("メッセージ構築失敗: {e}")))
    }
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::SendFailed(format!("SMTP 送信失敗: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> SmtpNotificationSender {
        SmtpNotificationSender::new("localhost", 1025, "noreply@example.com".to_string())
    }

    #[test]
    fn test_トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SmtpNotificationSender>();
    }

    #[tokio::test]
    async fn test_宛先アドレスが不正なら送信前にエラーになる() {
        let email = EmailMessage {
            to:      "not an address".to_string(),
            subject: "New comment for document a.txt".to_string(),
            body:    MailBody::Text("hi".to_string()),
        };

        let result = sender().send_email(&email).await;

        assert!(matches!(result, Err(NotificationError::SendFailed(msg)) if msg.contains("宛先")));
    }

    #[test]
    fn test_html本文はtext_htmlで組み立てられる() {
        let email = EmailMessage {
            to:      "manager@example.com".to_string(),
            subject: "New comment for document a.txt".to_string(),
            body:    MailBody::Html("<p>hi</p>".to_string()),
        };

        let message = sender().build_message(&email).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("Content-Type: text/html"));
    }
}
