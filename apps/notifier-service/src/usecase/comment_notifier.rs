//! # コメント通知ビヘイビア
//!
//! サイト内の文書に新しいコメント（`fm:post`）が付いたとき、
//! サイトマネージャー全員にコメント本文と文書リンクをメールで知らせる。
//!
//! ## 処理の流れ
//!
//! ```text
//! コメント検知 → 受信者解決 → テンプレート取得・文脈の組み立て → 受信者ごとに送信
//! ```
//!
//! ## 失敗の扱い
//!
//! | 状況 | 扱い |
//! |------|------|
//! | 新規コンテンツでない / ノード削除済み / サイト外 | 何もしない（debug ログ） |
//! | 親・作成者・本文が取れない | イベント全体を失敗させる |
//! | テンプレートがない | 送信前にイベント全体を失敗させる |
//! | 受信者がいない | 何も送らずに正常終了 |
//! | 受信者ごとのレンダリング・送信失敗 | ログに残して次の受信者へ |
//!
//! 同じイベントが 2 回届けば 2 回送る（重複排除はしない）。

mod recipient_resolver;

use std::sync::Arc;

use async_trait::async_trait;
use comment_notifier_domain::{
    authority::AuthorityName,
    node::NodeRef,
    notification::{CommentNotification, NewCommentNotification},
    person::PersonInfo,
    policy::{ContentUpdateEvent, NotificationFrequency, PolicyName},
    qname::{content_model, forum_model},
    site::{SiteInfo, SiteRole},
};
use comment_notifier_infra::{NotificationSender, PlatformServices};
pub use recipient_resolver::RecipientResolver;

use super::{
    notification::{DispatchReport, NotificationDispatcher, TemplateLocator},
    policy::{ContentUpdateBehaviour, PolicyComponent},
};
use crate::error::BehaviourError;

/// 通知先のサイトロール
pub const RECIPIENT_ROLE: SiteRole = SiteRole::Manager;

/// 通知しなかった理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    /// 既存コンテンツの更新
    NotNewContent,
    /// ノードが削除済み
    NodeDeleted,
    /// サイトに属さないディスカッション
    OutsideSite,
}

/// 1 イベントの処理結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// 通知対象外
    Skipped(SkipReason),
    /// 受信者への送信を行った（受信者 0 人を含む）
    Dispatched(DispatchReport),
}

/// 通知対象と判定されたコメント
struct DetectedComment {
    site:          SiteInfo,
    document:      NodeRef,
    document_name: String,
    creator:       PersonInfo,
    raw_comment:   String,
}

/// コメント通知ビヘイビア
pub struct CommentNotifierBehaviour {
    services:   PlatformServices,
    recipients: RecipientResolver,
    templates:  TemplateLocator,
    dispatcher: NotificationDispatcher,
    share_url:  String,
}

impl CommentNotifierBehaviour {
    /// 新しいビヘイビアを作成する
    ///
    /// # 引数
    ///
    /// - `services`: リポジトリの協調者一式
    /// - `sender`: メール送信
    /// - `share_url`: Web UI のベース URL（メール内リンク用）
    /// - `template_path`: 通知テンプレートのリポジトリ上のパス
    pub fn new(
        services: PlatformServices,
        sender: Arc<dyn NotificationSender>,
        share_url: impl Into<String>,
        template_path: impl Into<String>,
    ) -> Self {
        Self {
            recipients: RecipientResolver::new(
                services.sites.clone(),
                services.authorities.clone(),
                services.people.clone(),
            ),
            templates: TemplateLocator::new(
                services.search.clone(),
                services.content.clone(),
                template_path,
            ),
            dispatcher: NotificationDispatcher::new(sender),
            share_url: share_url.into(),
            services,
        }
    }

    /// ポリシーコンポーネントに登録する
    ///
    /// `fm:post` のコンテンツ更新を、トランザクションのコミット後に受け取る。
    pub fn init(self: Arc<Self>, policy: &PolicyComponent) {
        policy.bind_class_behaviour(
            PolicyName::OnContentUpdate,
            forum_model::TYPE_POST,
            self,
            NotificationFrequency::TransactionCommit,
        );
    }

    /// コメントのコンテンツ更新を処理する
    #[tracing::instrument(skip_all, fields(comment = %comment, new_content = new_content))]
    pub async fn on_content_changed(
        &self,
        comment: &NodeRef,
        new_content: bool,
    ) -> Result<NotificationOutcome, BehaviourError> {
        let detected = match self.detect(comment, new_content).await? {
            Ok(detected) => detected,
            Err(reason) => {
                tracing::debug!(%reason, "通知対象外のイベントです");
                return Ok(NotificationOutcome::Skipped(reason));
            }
        };

        let recipients = self
            .recipients
            .resolve(detected.site.short_name(), RECIPIENT_ROLE)
            .await?;
        if recipients.is_empty() {
            tracing::info!(
                site = detected.site.short_name().as_str(),
                "通知先のサイトマネージャーがいません"
            );
            return Ok(NotificationOutcome::Dispatched(DispatchReport::default()));
        }

        let template = self.templates.locate().await?;

        let notification = CommentNotification::compose(NewCommentNotification {
            document_name: &detected.document_name,
            document:      &detected.document,
            raw_comment:   &detected.raw_comment,
            creator:       &detected.creator,
            site:          &detected.site,
            share_url:     &self.share_url,
        });

        let report = self
            .dispatcher
            .dispatch(comment, &template, &notification, &recipients)
            .await;

        tracing::info!(
            sent = report.sent,
            failed = report.failed,
            skipped = report.skipped,
            "コメント通知を処理しました"
        );

        Ok(NotificationOutcome::Dispatched(report))
    }

    /// 通知対象のコメントかを判定し、文書・サイト・作成者・本文を集める
    ///
    /// 外側の `Err` はリポジトリ不整合などのハード失敗、
    /// 内側の `Err` は通知対象外であることを表す。
    async fn detect(
        &self,
        comment: &NodeRef,
        new_content: bool,
    ) -> Result<Result<DetectedComment, SkipReason>, BehaviourError> {
        if !new_content {
            return Ok(Err(SkipReason::NotNewContent));
        }
        if !self.services.nodes.exists(comment).await? {
            return Ok(Err(SkipReason::NodeDeleted));
        }
        let Some(site) = self.services.sites.get_site(comment).await? else {
            return Ok(Err(SkipReason::OutsideSite));
        };

        // コメント → トピック → フォーラム → 文書
        let topic = self.require_parent(comment).await?;
        let forum = self.require_parent(&topic).await?;
        let document = self.require_parent(&forum).await?;

        let document_name = self
            .services
            .nodes
            .get_property(&document, &content_model::PROP_NAME)
            .await?
            .ok_or_else(|| BehaviourError::inconsistent(&document, "文書名がありません"))?;

        let creator_name = self
            .services
            .nodes
            .get_property(comment, &content_model::PROP_CREATOR)
            .await?
            .ok_or_else(|| BehaviourError::inconsistent(comment, "作成者がありません"))?;
        let creator = self
            .services
            .people
            .get_person(&AuthorityName::new(creator_name.as_str()))
            .await?
            .ok_or_else(|| {
                BehaviourError::inconsistent(
                    comment,
                    format!("作成者 {creator_name} の人物情報がありません"),
                )
            })?;

        let raw_comment = self
            .services
            .content
            .read_content_string(comment, &content_model::PROP_CONTENT)
            .await?
            .ok_or_else(|| BehaviourError::inconsistent(comment, "コメント本文がありません"))?;

        Ok(Ok(DetectedComment {
            site,
            document,
            document_name,
            creator,
            raw_comment,
        }))
    }

    async fn require_parent(&self, node: &NodeRef) -> Result<NodeRef, BehaviourError> {
        self.services
            .nodes
            .get_primary_parent(node)
            .await?
            .ok_or_else(|| BehaviourError::inconsistent(node, "親ノードがありません"))
    }
}

#[async_trait]
impl ContentUpdateBehaviour for CommentNotifierBehaviour {
    fn name(&self) -> &'static str {
        "comment_notifier"
    }

    async fn on_content_update(&self, event: &ContentUpdateEvent) -> Result<(), BehaviourError> {
        match self
            .on_content_changed(&event.node_ref, event.new_content)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                let (category, kind) = e.log_fields();
                tracing::error!(
                    error.category = category,
                    error.kind = kind,
                    node_ref = %event.node_ref,
                    "コメント通知に失敗: {}",
                    e
                );
                Err(e)
            }
        }
    }
}
