//! # リポジトリプラットフォーム
//!
//! コメント通知がリポジトリへ問い合わせる際の協調者トレイトを定義する。
//!
//! ## 設計方針
//!
//! - **読み取り専用**: いずれのトレイトもリポジトリの状態を変更しない
//! - **不在は `None` / 空**: ノード・人物・サイトの不在はエラーではなく値で表す。
//!   通信失敗や契約違反のレスポンスだけが [`InfraError`] になる
//! - **サービス単位の分割**: ノード・コンテンツ・検索・サイト・権限・人物の
//!   6 トレイトに分け、テストでは必要なものだけ差し替えられるようにする
//!
//! ## 実装
//!
//! - [`alfresco::AlfrescoRestClient`] - Alfresco 互換 REST API v1 アダプタ
//! - `mock::InMemoryPlatform` - テスト用インメモリ実装（`test-utils` feature）

pub mod alfresco;

use std::sync::Arc;

use async_trait::async_trait;
use comment_notifier_domain::{
    authority::{AuthorityName, AuthorityType},
    node::{NodeRef, StoreRef},
    person::PersonInfo,
    qname::QName,
    site::{SiteInfo, SiteRole, SiteShortName},
};
use strum::IntoStaticStr;

use crate::error::InfraError;

/// 検索クエリ言語
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr, strum::Display)]
pub enum QueryLanguage {
    /// Lucene 構文（`PATH:"..."` 検索に使う）
    #[strum(serialize = "lucene")]
    Lucene,
}

/// ノードの存在確認・プロパティ・親子関係
#[async_trait]
pub trait NodeService: Send + Sync {
    /// ノードが存在するか
    async fn exists(&self, node: &NodeRef) -> Result<bool, InfraError>;

    /// プロパティ値を文字列で取得する
    ///
    /// ノードまたはプロパティが存在しない場合は `None`。
    async fn get_property(
        &self,
        node: &NodeRef,
        property: &QName,
    ) -> Result<Option<String>, InfraError>;

    /// 主親ノードを取得する
    ///
    /// ルートノードまたは存在しないノードの場合は `None`。
    async fn get_primary_parent(&self, node: &NodeRef) -> Result<Option<NodeRef>, InfraError>;
}

/// ノードのコンテンツ読み出し
#[async_trait]
pub trait ContentService: Send + Sync {
    /// コンテンツプロパティを UTF-8 文字列として読み出す
    ///
    /// コンテンツがない場合は `None`。
    async fn read_content_string(
        &self,
        node: &NodeRef,
        property: &QName,
    ) -> Result<Option<String>, InfraError>;
}

/// パス式などによるノード検索
#[async_trait]
pub trait SearchService: Send + Sync {
    /// クエリに一致するノードを返す
    async fn query(
        &self,
        store: &StoreRef,
        language: QueryLanguage,
        query: &str,
    ) -> Result<Vec<NodeRef>, InfraError>;
}

/// サイト情報とロールグループ
#[async_trait]
pub trait SiteService: Send + Sync {
    /// ノードが属するサイトを返す
    ///
    /// サイト外のノードは `None`。
    async fn get_site(&self, node: &NodeRef) -> Result<Option<SiteInfo>, InfraError>;

    /// サイトのロールを担うグループ名を返す
    ///
    /// グループが存在しない場合は `None`。
    async fn get_site_role_group(
        &self,
        site: &SiteShortName,
        role: SiteRole,
    ) -> Result<Option<AuthorityName>, InfraError>;
}

/// 権限主体（ユーザー / グループ）
#[async_trait]
pub trait AuthorityService: Send + Sync {
    /// グループの直接のメンバーのうち、指定した種別のものを返す
    ///
    /// サブグループの中はたどらない。存在しないグループは空リスト。
    async fn get_immediate_members(
        &self,
        authority_type: AuthorityType,
        group: &AuthorityName,
    ) -> Result<Vec<AuthorityName>, InfraError>;
}

/// 人物情報
#[async_trait]
pub trait PersonService: Send + Sync {
    /// ユーザー名から人物を取得する
    async fn get_person(&self, user_name: &AuthorityName)
    -> Result<Option<PersonInfo>, InfraError>;
}

/// プラットフォームの協調者一式
///
/// ビヘイビアのコンストラクタに渡して注入する。
#[derive(Clone)]
pub struct PlatformServices {
    pub nodes:       Arc<dyn NodeService>,
    pub content:     Arc<dyn ContentService>,
    pub search:      Arc<dyn SearchService>,
    pub sites:       Arc<dyn SiteService>,
    pub authorities: Arc<dyn AuthorityService>,
    pub people:      Arc<dyn PersonService>,
}

impl PlatformServices {
    /// 全トレイトを実装する 1 つの実体から協調者一式を作る
    pub fn from_shared<P>(platform: Arc<P>) -> Self
    where
        P: NodeService
            + ContentService
            + SearchService
            + SiteService
            + AuthorityService
            + PersonService
            + 'static,
    {
        Self {
            nodes:       platform.clone(),
            content:     platform.clone(),
            search:      platform.clone(),
            sites:       platform.clone(),
            authorities: platform.clone(),
            people:      platform,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_クエリ言語は検索api向けの名前で表示される() {
        let name: &'static str = QueryLanguage::Lucene.into();

        assert_eq!(QueryLanguage::Lucene.to_string(), "lucene");
        assert_eq!(name, "lucene");
    }
}
