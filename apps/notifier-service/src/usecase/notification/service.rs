//! # 通知ディスパッチャー
//!
//! 受信者ごとにテンプレートレンダリング → メール送信を行い、結果をビジネスイベントとして記録する。
//!
//! ## 設計方針
//!
//! - **fire-and-forget**: 送信失敗はログに残すだけで、再送も配信確認もしない
//! - **受信者単位の隔離**: ある受信者のレンダリング失敗・送信失敗は、
//!   残りの受信者への送信を止めない
//! - **依存性注入**: `NotificationSender` は trait で抽象化

use std::sync::Arc;

use comment_notifier_domain::{
    node::NodeRef,
    notification::CommentNotification,
    person::EmailAddress,
};
use comment_notifier_infra::notification::NotificationSender;
use comment_notifier_shared::{
    event_log::{error as log_error, event},
    log_business_event,
};
use serde::Serialize;

use super::{NotificationTemplate, TemplateRenderer};

/// 1 イベント分の送信結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    /// 送信に成功した数
    pub sent:    usize,
    /// 送信に失敗した数
    pub failed:  usize,
    /// レンダリングに失敗して送らなかった数
    pub skipped: usize,
}

/// 通知ディスパッチャー
pub struct NotificationDispatcher {
    sender:   Arc<dyn NotificationSender>,
    renderer: TemplateRenderer,
}

impl NotificationDispatcher {
    pub fn new(sender: Arc<dyn NotificationSender>) -> Self {
        Self {
            sender,
            renderer: TemplateRenderer::new(),
        }
    }

    /// 受信者ごとに 1 通ずつ送信する
    ///
    /// 失敗してもエラーを返さない（結果は [`DispatchReport`] とログに残る）。
    pub async fn dispatch(
        &self,
        comment: &NodeRef,
        template: &NotificationTemplate,
        notification: &CommentNotification,
        recipients: &[EmailAddress],
    ) -> DispatchReport {
        let mut report = DispatchReport::default();

        for recipient in recipients {
            let email = match self.renderer.render(template, notification, recipient) {
                Ok(email) => email,
                Err(e) => {
                    report.skipped += 1;
                    log_business_event!(
                        event.category = event::category::NOTIFICATION,
                        event.action = event::action::NOTIFICATION_SKIPPED,
                        event.entity_type = event::entity_type::FORUM_POST,
                        event.entity_id = %comment,
                        event.result = event::result::FAILURE,
                        error.category = log_error::category::CONFIGURATION,
                        error.kind = log_error::kind::TEMPLATE_RENDER,
                        notification.recipient = recipient.as_str(),
                        error = %e,
                        "通知テンプレートのレンダリングに失敗したため送信をスキップ"
                    );
                    continue;
                }
            };

            match self.sender.send_email(&email).await {
                Ok(()) => {
                    report.sent += 1;
                    log_business_event!(
                        event.category = event::category::NOTIFICATION,
                        event.action = event::action::NOTIFICATION_SENT,
                        event.entity_type = event::entity_type::FORUM_POST,
                        event.entity_id = %comment,
                        event.result = event::result::SUCCESS,
                        notification.recipient = recipient.as_str(),
                        notification.subject = %email.subject,
                        "コメント通知メール送信成功"
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    log_business_event!(
                        event.category = event::category::NOTIFICATION,
                        event.action = event::action::NOTIFICATION_FAILED,
                        event.entity_type = event::entity_type::FORUM_POST,
                        event.entity_id = %comment,
                        event.result = event::result::FAILURE,
                        error.category = log_error::category::MAIL,
                        error.kind = log_error::kind::SEND,
                        notification.recipient = recipient.as_str(),
                        error = %e,
                        "コメント通知メール送信失敗"
                    );
                }
            }
        }

        report
    }
}
