//! # 通知
//!
//! コメント通知メールに関するドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 備考 |
//! |---|------------|------|
//! | [`CommentNotification`] | コメント通知 | テンプレートに渡す文脈。受信者に依存しない |
//! | [`EmailMessage`] | メールメッセージ | 受信者ごとに組み立て、送信後に破棄する |
//!
//! ## 設計方針
//!
//! - **fire-and-forget**: 受信者ごとの送信失敗は他の受信者への送信に影響しない
//! - **テンプレート分離**: 通知の文脈とメール生成は分離（TemplateRenderer は notifier-service）

use serde::Serialize;
use thiserror::Error;

use crate::{
    comment::strip_markup,
    document::document_details_url,
    node::NodeRef,
    person::PersonInfo,
    site::SiteInfo,
};

/// 件名の固定プレフィックス
pub const SUBJECT_PREFIX: &str = "New comment for document ";

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// メール送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),

    /// テンプレートがリポジトリに存在しない
    #[error("通知テンプレートが見つかりません: {0}")]
    TemplateNotFound(String),
}

/// メール本文
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailBody {
    /// HTML 本文
    Html(String),
    /// プレーンテキスト本文
    Text(String),
}

impl MailBody {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Html(body) | Self::Text(body) => body,
        }
    }

    pub fn is_html(&self) -> bool {
        matches!(self, Self::Html(_))
    }
}

/// メールメッセージ
///
/// テンプレートレンダリングの出力。NotificationSender に渡される。
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// 送信先メールアドレス
    pub to:      String,
    /// 件名
    pub subject: String,
    /// 本文
    pub body:    MailBody,
}

/// コメント通知
///
/// テンプレートの `args` にそのまま渡せるよう、キー名はテンプレート側の
/// 変数名（camelCase）でシリアライズする。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentNotification {
    /// タグ除去済みのコメント本文
    pub comment:            String,
    /// 投稿者の表示名
    pub comment_creator:    String,
    /// 文書名
    pub document_name:      String,
    /// サイトタイトル
    pub site_name:          String,
    /// Web UI のベース URL
    pub share_url:          String,
    /// 文書詳細ページの URL
    pub document_share_url: String,
}

/// [`CommentNotification::compose`] の入力
pub struct NewCommentNotification<'a> {
    pub document_name: &'a str,
    pub document:      &'a NodeRef,
    pub raw_comment:   &'a str,
    pub creator:       &'a PersonInfo,
    pub site:          &'a SiteInfo,
    pub share_url:     &'a str,
}

impl CommentNotification {
    /// 生のコメントと周辺情報から通知の文脈を組み立てる
    pub fn compose(input: NewCommentNotification<'_>) -> Self {
        Self {
            comment:            strip_markup(input.raw_comment),
            comment_creator:    input.creator.display_name(),
            document_name:      input.document_name.to_string(),
            site_name:          input.site.title().to_string(),
            share_url:          input.share_url.trim_end_matches('/').to_string(),
            document_share_url: document_details_url(
                input.share_url,
                input.site.short_name(),
                input.document,
            ),
        }
    }

    /// 件名: `New comment for document {文書名}`
    pub fn subject(&self) -> String {
        format!("{SUBJECT_PREFIX}{}", self.document_name)
    }
}
