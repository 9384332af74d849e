//! # テンプレートレンダラー
//!
//! リポジトリから読み出した通知テンプレートを tera でレンダリングし、
//! 受信者ごとの [`EmailMessage`] を生成する。
//!
//! ## 設計方針
//!
//! - **ワンオフ描画**: テンプレートは管理者が差し替えうるため、登録せずに
//!   `Tera::one_off` で毎回描画する
//! - **autoescape**: HTML テンプレートのみ有効。URL は `| safe` で出力する
//! - **`args` 名前空間**: 変数はすべて `args` の下に置く（`{{ args.comment }}` など）
//! - **件名は固定パターン**: `New comment for document {文書名}`

use comment_notifier_domain::{
    notification::{CommentNotification, EmailMessage, MailBody, NotificationError},
    person::EmailAddress,
};
use tera::{Context, Tera};

use super::NotificationTemplate;

/// 既定の通知テンプレート（リポジトリへの初期配置用）
pub const DEFAULT_TEMPLATE: &str =
    include_str!("../../../templates/notify_email_templates/template_comments.html.tera");

/// テンプレートレンダラー
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    pub fn new() -> Self {
        Self
    }

    /// 1 受信者分のメールを生成する
    pub fn render(
        &self,
        template: &NotificationTemplate,
        notification: &CommentNotification,
        to: &EmailAddress,
    ) -> Result<EmailMessage, NotificationError> {
        let mut context = Context::new();
        context.insert("args", notification);

        let rendered = Tera::one_off(&template.source, &context, template.html)
            .map_err(|e| NotificationError::TemplateFailed(format!("{}: {e}", template.path)))?;

        let body = if template.html {
            MailBody::Html(rendered)
        } else {
            MailBody::Text(rendered)
        };

        Ok(EmailMessage {
            to:      to.as_str().to_string(),
            subject: notification.subject(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn make_notification() -> CommentNotification {
        CommentNotification {
            comment:            "Please review <the numbers>".to_string(),
            comment_creator:    "Ana Gomez ".to_string(),
            document_name:      "budget.xlsx".to_string(),
            site_name:          "Marketing".to_string(),
            share_url:          "http://localhost:8080/share".to_string(),
            document_share_url: "http://localhost:8080/share/page/site/marketing/document-details?nodeRef=workspace://SpacesStore/doc-1".to_string(),
        }
    }

    fn template(source: &str, html: bool) -> NotificationTemplate {
        NotificationTemplate {
            path:   "/app:company_home/cm:template_comments.html.tera".to_string(),
            source: source.to_string(),
            html,
        }
    }

    fn to() -> EmailAddress {
        EmailAddress::new("manager@example.com").unwrap()
    }

    #[test]
    fn test_既定テンプレートで文書名とサイト名とコメントが本文に含まれる() {
        let renderer = TemplateRenderer::new();

        let email = renderer
            .render(&template(DEFAULT_TEMPLATE, true), &make_notification(), &to())
            .unwrap();

        assert_eq!(email.to, "manager@example.com");
        assert_eq!(email.subject, "New comment for document budget.xlsx");
        assert!(email.body.is_html());
        let body = email.body.as_str();
        assert!(body.contains("budget.xlsx"));
        assert!(body.contains("Marketing"));
        assert!(body.contains("Ana Gomez"));
        assert!(body.contains("document-details?nodeRef=workspace://SpacesStore/doc-1"));
    }

    #[test]
    fn test_html本文ではエスケープされる() {
        let email = TemplateRenderer::new()
            .render(&template("{{ args.comment }}", true), &make_notification(), &to())
            .unwrap();

        assert_eq!(email.body.as_str(), "Please review &lt;the numbers&gt;");
    }

    #[test]
    fn test_テキストテンプレートはtext本文になる() {
        let email = TemplateRenderer::new()
            .render(
                &template("{{ args.commentCreator }}commented on {{ args.documentName }}", false),
                &make_notification(),
                &to(),
            )
            .unwrap();

        assert_eq!(
            email.body,
            MailBody::Text("Ana Gomez commented on budget.xlsx".to_string())
        );
    }

    #[test]
    fn test_テキスト本文では記号をエスケープしない() {
        let notification = CommentNotification {
            comment:       "Tom & Jerry don't split 1/2".to_string(),
            document_name: "Q&A O'Brien.docx".to_string(),
            ..make_notification()
        };

        let email = TemplateRenderer::new()
            .render(
                &template("{{ args.documentName }}: {{ args.comment }}", false),
                &notification,
                &to(),
            )
            .unwrap();

        assert_eq!(
            email.body,
            MailBody::Text("Q&A O'Brien.docx: Tom & Jerry don't split 1/2".to_string())
        );
    }

    #[test]
    fn test_未定義の変数を参照するとtemplate_failed() {
        let result = TemplateRenderer::new().render(
            &template("{{ args.unknown }}", true),
            &make_notification(),
            &to(),
        );

        assert!(matches!(result, Err(NotificationError::TemplateFailed(_))));
    }
}
