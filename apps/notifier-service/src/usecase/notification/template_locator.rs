//! # テンプレートロケーター
//!
//! 通知テンプレートはリポジトリ上の固定パスに置かれた 1 ファイルで、
//! 管理者が差し替えられる。イベントごとにパス検索してコンテンツを読み出す。
//!
//! ファイル名が `.html` または `.html.<拡張子>` で終わるテンプレートは HTML メールになる。

use std::sync::Arc;

use comment_notifier_domain::{node::StoreRef, notification::NotificationError, qname::content_model};
use comment_notifier_infra::platform::{ContentService, QueryLanguage, SearchService};

use crate::error::BehaviourError;

/// 読み出したテンプレート
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationTemplate {
    /// リポジトリ上のパス
    pub path:   String,
    /// テンプレート本体
    pub source: String,
    /// HTML メールとして送るか
    pub html:   bool,
}

/// テンプレートロケーター
pub struct TemplateLocator {
    search:  Arc<dyn SearchService>,
    content: Arc<dyn ContentService>,
    path:    String,
}

impl TemplateLocator {
    pub fn new(
        search: Arc<dyn SearchService>,
        content: Arc<dyn ContentService>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            search,
            content,
            path: path.into(),
        }
    }

    /// テンプレートを取得する
    ///
    /// パスに一致するノードがない、またはコンテンツが空の場合は
    /// [`NotificationError::TemplateNotFound`]。
    pub async fn locate(&self) -> Result<NotificationTemplate, BehaviourError> {
        let query = format!("PATH:\"{}\"", self.path);
        let hits = self
            .search
            .query(&StoreRef::spaces_store(), QueryLanguage::Lucene, &query)
            .await?;

        let Some(node) = hits.into_iter().next() else {
            return Err(NotificationError::TemplateNotFound(self.path.clone()).into());
        };

        let source = self
            .content
            .read_content_string(&node, &content_model::PROP_CONTENT)
            .await?
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                NotificationError::TemplateNotFound(format!("{} (コンテンツが空)", self.path))
            })?;

        Ok(NotificationTemplate {
            path: self.path.clone(),
            source,
            html: is_html_template(&self.path),
        })
    }
}

/// パス末尾のファイル名が `.html` / `.html.<拡張子>` か
fn is_html_template(path: &str) -> bool {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    file_name.ends_with(".html")
        || file_name
            .rsplit_once('.')
            .is_some_and(|(stem, _)| stem.ends_with(".html"))
}
