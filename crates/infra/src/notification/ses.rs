//! SES 通知送信実装
//!
//! AWS SES v2 API を使用してメールを送信する。
//! 本番環境で使用する。

use async_trait::async_trait;
use aws_sdk_sesv2::{
    Client,
    types::{Body, Content, Destination, EmailContent, Message},
};
use comment_notifier_domain::notification::{EmailMessage, MailBody, NotificationError};

use super::NotificationSender;

/// SES 通知送信
///
/// `aws_sdk_sesv2::Client` をラップする。
pub struct SesNotificationSender {
    client:       Client,
    from_address: String,
}

impl SesNotificationSender {
    /// 新しい SES 送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `client`: AWS SES v2 クライアント
    /// - `from_address`: 送信元メールアドレス（SES で検証済みであること）
    pub fn new(client: Client, from_address: String) -> Self {
        Self {
            client,
            from_address,
        }
    }
}

fn content(data: &str, label: &str) -> Result<Content, NotificationError> {
    Content::builder()
        .data(data)
        .charset("UTF-8")
        .build()
        .map_err(|e| NotificationError::SendFailed(format!("{label}構築失敗: {e}")))
}

fn body(mail_body: &MailBody) -> Result<Body, NotificationError> {
    let body = match mail_body {
        MailBody::Html(html) => Body::builder().html(content(html, "HTML 本文")?),
        MailBody::Text(text) => Body::builder().text(content(text, "テキスト本文")?),
    };
    Ok(body.build())
}

#[async_trait]
impl NotificationSender for SesNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let destination = Destination::builder().to_addresses(&email.to).build();

        let message = Message::builder()
            .subject(content(&email.subject, "件名")?)
            .body(body(&email.body)?)
            .build();

        self.client
            .send_email()
            .from_email_address(&self.from_address)
            .destination(destination)
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("SES 送信失敗: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SesNotificationSender>();
    }

    #[test]
    fn test_本文の種別に応じてhtmlかtextを設定する() {
        let html = body(&MailBody::Html("<p>x</p>".to_string())).unwrap();
        let text = body(&MailBody::Text("x".to_string())).unwrap();

        assert!(html.html().is_some() && html.text().is_none());
        assert!(text.text().is_some() && text.html().is_none());
    }
}
