//! # テスト用シナリオ
//!
//! サイト → 文書 → フォーラム → トピック → コメント の階層と、
//! 作成者・サイトマネージャー・通知テンプレートをインメモリプラットフォームに組み立てる。
//!
//! `test-utils` feature を有効にすることで、統合テストからも利用可能。

use std::sync::Arc;

use comment_notifier_domain::{
    authority::AuthorityName,
    node::NodeRef,
    person::PersonInfo,
    qname::content_model,
    site::{SiteInfo, SiteShortName},
};
use comment_notifier_infra::{
    PlatformServices,
    mock::{InMemoryPlatform, MockNotificationSender},
};

use crate::{
    config::DEFAULT_TEMPLATE_PATH,
    usecase::{
        CommentNotifierBehaviour,
        comment_notifier::RECIPIENT_ROLE,
        notification::template_renderer::DEFAULT_TEMPLATE,
    },
};

/// テンプレートの配置パス
pub const TEMPLATE_PATH: &str = DEFAULT_TEMPLATE_PATH;

/// Web UI のベース URL
pub const SHARE_URL: &str = "http://localhost:8080/share";

/// コメント 1 件分のリポジトリ状態
pub struct CommentScenario {
    pub platform: InMemoryPlatform,
    pub sender:   MockNotificationSender,
    pub site:     SiteInfo,
    pub document: NodeRef,
    pub topic:    NodeRef,
    pub comment:  NodeRef,
    pub template: NodeRef,
}

impl CommentScenario {
    /// マネージャーのいないサイト `marketing` に、`agomez` のコメントが 1 件付いた状態
    pub fn new() -> Self {
        let platform = InMemoryPlatform::new();

        let site = SiteInfo::new(
            SiteShortName::new("marketing").unwrap(),
            "Marketing",
            NodeRef::in_spaces_store("site-marketing"),
        );
        platform.add_site(site.clone());

        let library = NodeRef::in_spaces_store("documentLibrary");
        let document = NodeRef::in_spaces_store("doc-1");
        let forum = NodeRef::in_spaces_store("forum-1");
        let topic = NodeRef::in_spaces_store("topic-1");
        let comment = NodeRef::in_spaces_store("post-1");

        platform.add_node(&library, Some(site.node_ref()));
        platform.add_node(&document, Some(&library));
        platform.set_property(&document, content_model::PROP_NAME, "budget.xlsx");
        platform.add_node(&forum, Some(&document));
        platform.add_node(&topic, Some(&forum));
        platform.add_node(&comment, Some(&topic));
        platform.set_property(&comment, content_model::PROP_CREATOR, "agomez");
        platform.set_content(
            &comment,
            content_model::PROP_CONTENT,
            "<p>Please <b>review</b> the numbers</p>",
        );

        platform.add_person(PersonInfo::new(
            AuthorityName::new("agomez"),
            Some("Ana".to_string()),
            Some("Gomez".to_string()),
            Some("ana@example.com".to_string()),
        ));

        let template = NodeRef::in_spaces_store("template-comments");
        platform.add_node(&template, None);
        platform.set_content(&template, content_model::PROP_CONTENT, DEFAULT_TEMPLATE);
        platform.register_path(TEMPLATE_PATH, &template);

        Self {
            platform,
            sender: MockNotificationSender::new(),
            site,
            document,
            topic,
            comment,
            template,
        }
    }

    /// サイトマネージャーのグループ名
    pub fn managers_group(&self) -> AuthorityName {
        self.site.role_group(RECIPIENT_ROLE)
    }

    /// メールアドレス付きのサイトマネージャーを追加する
    pub fn add_manager(&self, user: &str, email: &str) {
        self.platform
            .add_member(&self.managers_group(), AuthorityName::new(user));
        self.platform.add_person(PersonInfo::new(
            AuthorityName::new(user),
            Some(user.to_string()),
            None,
            Some(email.to_string()),
        ));
    }

    /// 同じトピックに別のコメントを追加する
    pub fn add_comment(&self, id: &str, creator: &str, body: &str) -> NodeRef {
        let comment = NodeRef::in_spaces_store(id);
        self.platform.add_node(&comment, Some(&self.topic));
        self.platform
            .set_property(&comment, content_model::PROP_CREATOR, creator);
        self.platform
            .set_content(&comment, content_model::PROP_CONTENT, body);
        comment
    }

    pub fn services(&self) -> PlatformServices {
        PlatformServices::from_shared(Arc::new(self.platform.clone()))
    }

    /// このシナリオのプラットフォームと送信モックでビヘイビアを組み立てる
    pub fn behaviour(&self) -> CommentNotifierBehaviour {
        CommentNotifierBehaviour::new(
            self.services(),
            Arc::new(self.sender.clone()),
            SHARE_URL,
            TEMPLATE_PATH,
        )
    }
}

impl Default for CommentScenario {
    fn default() -> Self {
        Self::new()
    }
}
