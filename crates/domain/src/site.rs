//! # サイト
//!
//! 文書とディスカッションを収めるコラボレーション空間と、そのロール定義。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 備考 |
//! |---|------------|------|
//! | [`SiteInfo`] | サイト | 短縮名は URL 構築に、タイトルはメール本文に使う |
//! | [`SiteRole`] | サイトロール | ロールごとにバックエンドの権限グループを持つ |
//!
//! ## ロールグループ命名規約
//!
//! サイト `marketing` の `SiteManager` ロールは
//! `GROUP_site_marketing_SiteManager` というグループで表現される。

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::{authority::AuthorityName, node::NodeRef};

define_validated_string! {
    /// サイト短縮名（URL セーフな識別子）
    pub struct SiteShortName {
        label: "サイト短縮名",
        max_length: 72,
    }
}

/// サイトロール
///
/// `strum::Display` はプラットフォーム上のロール名（`SiteManager` など）を返す。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
pub enum SiteRole {
    /// サイト管理者: コメント通知の受信者
    #[strum(serialize = "SiteManager")]
    Manager,
    #[strum(serialize = "SiteCollaborator")]
    Collaborator,
    #[strum(serialize = "SiteContributor")]
    Contributor,
    #[strum(serialize = "SiteConsumer")]
    Consumer,
}

/// サイト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteInfo {
    short_name: SiteShortName,
    title:      String,
    node_ref:   NodeRef,
}

impl SiteInfo {
    pub fn new(short_name: SiteShortName, title: impl Into<String>, node_ref: NodeRef) -> Self {
        Self {
            short_name,
            title: title.into(),
            node_ref,
        }
    }

    pub fn short_name(&self) -> &SiteShortName {
        &self.short_name
    }

    /// 表示用タイトル
    pub fn title(&self) -> &str {
        &self.title
    }

    /// サイトコンテナのノード参照
    pub fn node_ref(&self) -> &NodeRef {
        &self.node_ref
    }

    /// ロールを裏付ける権限グループ名を返す
    pub fn role_group(&self, role: SiteRole) -> AuthorityName {
        role_group_name(&self.short_name, role)
    }
}

/// サイト短縮名とロールから権限グループ名を組み立てる
pub fn role_group_name(short_name: &SiteShortName, role: SiteRole) -> AuthorityName {
    let role: &'static str = role.into();
    AuthorityName::group(format!("site_{}_{}", short_name.as_str(), role))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use crate::authority::AuthorityType;

    use super::*;

    #[test]
    fn test_サイトロールの文字列変換がプラットフォームのロール名と一致する() {
        assert_eq!(SiteRole::Manager.to_string(), "SiteManager");
        assert_eq!(SiteRole::Consumer.to_string(), "SiteConsumer");
        assert_eq!(
            SiteRole::from_str("SiteCollaborator").unwrap(),
            SiteRole::Collaborator
        );
    }

    #[test]
    fn test_管理者ロールグループ名が命名規約に従う() {
        let site = SiteInfo::new(
            SiteShortName::new("marketing").unwrap(),
            "Marketing",
            NodeRef::in_spaces_store("site-node"),
        );

        let group = site.role_group(SiteRole::Manager);

        assert_eq!(group.as_str(), "GROUP_site_marketing_SiteManager");
        assert_eq!(group.authority_type(), AuthorityType::Group);
    }

    #[test]
    fn test_空のサイト短縮名はエラーになる() {
        assert!(SiteShortName::new("   ").is_err());
    }
}
