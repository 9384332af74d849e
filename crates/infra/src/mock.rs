//! # テスト用モック
//!
//! ビヘイビアのテストで使用するインメモリのプラットフォームとメール送信。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! comment-notifier-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use comment_notifier_domain::{
    authority::{AuthorityName, AuthorityType},
    node::{NodeRef, StoreRef},
    notification::{EmailMessage, NotificationError},
    person::PersonInfo,
    qname::QName,
    site::{SiteInfo, SiteRole, SiteShortName, role_group_name},
};

use crate::{
    error::InfraError,
    notification::NotificationSender,
    platform::{
        AuthorityService,
        ContentService,
        NodeService,
        PersonService,
        QueryLanguage,
        SearchService,
        SiteService,
    },
};

// ===== InMemoryPlatform =====

#[derive(Debug, Default)]
struct StoredNode {
    parent:     Option<NodeRef>,
    properties: HashMap<QName, String>,
    content:    HashMap<QName, String>,
}

#[derive(Debug, Default)]
struct PlatformState {
    nodes:  HashMap<NodeRef, StoredNode>,
    sites:  HashMap<NodeRef, SiteInfo>,
    groups: HashMap<AuthorityName, Vec<AuthorityName>>,
    people: HashMap<AuthorityName, PersonInfo>,
    paths:  HashMap<String, NodeRef>,
}

/// インメモリのリポジトリプラットフォーム
///
/// 協調者トレイトをすべて実装する。`Clone` しても状態は共有される。
/// パス検索は `PATH:"<path>"` 形式の Lucene クエリだけを解釈する。
#[derive(Clone, Default)]
pub struct InMemoryPlatform {
    state: Arc<Mutex<PlatformState>>,
}

impl InMemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// ノードを追加する（親なしならルート）
    pub fn add_node(&self, node: &NodeRef, parent: Option<&NodeRef>) {
        self.state.lock().unwrap().nodes.insert(
            node.clone(),
            StoredNode {
                parent: parent.cloned(),
                ..Default::default()
            },
        );
    }

    pub fn set_property(&self, node: &NodeRef, property: QName, value: impl Into<String>) {
        if let Some(stored) = self.state.lock().unwrap().nodes.get_mut(node) {
            stored.properties.insert(property, value.into());
        }
    }

    pub fn set_content(&self, node: &NodeRef, property: QName, content: impl Into<String>) {
        if let Some(stored) = self.state.lock().unwrap().nodes.get_mut(node) {
            stored.content.insert(property, content.into());
        }
    }

    /// ノードを削除する（子ノードはそのまま残る）
    pub fn remove_node(&self, node: &NodeRef) {
        self.state.lock().unwrap().nodes.remove(node);
    }

    /// サイトを追加する。サイトノードもルートノードとして登録する
    pub fn add_site(&self, site: SiteInfo) {
        self.add_node(site.node_ref(), None);
        self.state
            .lock()
            .unwrap()
            .sites
            .insert(site.node_ref().clone(), site);
    }

    /// 空のグループを追加する
    pub fn add_group(&self, group: AuthorityName) {
        self.state
            .lock()
            .unwrap()
            .groups
            .entry(group)
            .or_default();
    }

    /// グループにメンバーを追加する（グループがなければ作成する）
    pub fn add_member(&self, group: &AuthorityName, member: AuthorityName) {
        self.state
            .lock()
            .unwrap()
            .groups
            .entry(group.clone())
            .or_default()
            .push(member);
    }

    pub fn add_person(&self, person: PersonInfo) {
        self.state
            .lock()
            .unwrap()
            .people
            .insert(person.user_name().clone(), person);
    }

    /// パス検索で返すノードを登録する
    pub fn register_path(&self, path: impl Into<String>, node: &NodeRef) {
        self.state
            .lock()
            .unwrap()
            .paths
            .insert(path.into(), node.clone());
    }
}

#[async_trait]
impl NodeService for InMemoryPlatform {
    async fn exists(&self, node: &NodeRef) -> Result<bool, InfraError> {
        Ok(self.state.lock().unwrap().nodes.contains_key(node))
    }

    async fn get_property(
        &self,
        node: &NodeRef,
        property: &QName,
    ) -> Result<Option<String>, InfraError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .nodes
            .get(node)
            .and_then(|n| n.properties.get(property).cloned()))
    }

    async fn get_primary_parent(&self, node: &NodeRef) -> Result<Option<NodeRef>, InfraError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .nodes
            .get(node)
            .and_then(|n| n.parent.clone()))
    }
}

#[async_trait]
impl ContentService for InMemoryPlatform {
    async fn read_content_string(
        &self,
        node: &NodeRef,
        property: &QName,
    ) -> Result<Option<String>, InfraError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .nodes
            .get(node)
            .and_then(|n| n.content.get(property).cloned()))
    }
}

#[async_trait]
impl SearchService for InMemoryPlatform {
    async fn query(
        &self,
        _store: &StoreRef,
        _language: QueryLanguage,
        query: &str,
    ) -> Result<Vec<NodeRef>, InfraError> {
        let path = query
            .strip_prefix("PATH:\"")
            .and_then(|rest| rest.strip_suffix('"'));

        let state = self.state.lock().unwrap();
        Ok(path
            .and_then(|p| state.paths.get(p))
            .filter(|node| state.nodes.contains_key(*node))
            .cloned()
            .into_iter()
            .collect())
    }
}

#[async_trait]
impl SiteService for InMemoryPlatform {
    async fn get_site(&self, node: &NodeRef) -> Result<Option<SiteInfo>, InfraError> {
        let state = self.state.lock().unwrap();
        let mut current = state.nodes.get(node).and_then(|n| n.parent.clone());

        while let Some(ancestor) = current {
            if let Some(site) = state.sites.get(&ancestor) {
                return Ok(Some(site.clone()));
            }
            current = state.nodes.get(&ancestor).and_then(|n| n.parent.clone());
        }

        Ok(None)
    }

    async fn get_site_role_group(
        &self,
        site: &SiteShortName,
        role: SiteRole,
    ) -> Result<Option<AuthorityName>, InfraError> {
        let group = role_group_name(site, role);
        let exists = self.state.lock().unwrap().groups.contains_key(&group);
        Ok(exists.then_some(group))
    }
}

#[async_trait]
impl AuthorityService for InMemoryPlatform {
    async fn get_immediate_members(
        &self,
        authority_type: AuthorityType,
        group: &AuthorityName,
    ) -> Result<Vec<AuthorityName>, InfraError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .groups
            .get(group)
            .into_iter()
            .flatten()
            .filter(|m| m.authority_type() == authority_type)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PersonService for InMemoryPlatform {
    async fn get_person(
        &self,
        user_name: &AuthorityName,
    ) -> Result<Option<PersonInfo>, InfraError> {
        Ok(self.state.lock().unwrap().people.get(user_name).cloned())
    }
}

// ===== MockNotificationSender =====

/// 送信内容を記録するメール送信
///
/// `fail_for` で指定した宛先への送信は失敗させる。
#[derive(Clone, Default)]
pub struct MockNotificationSender {
    sent:     Arc<Mutex<Vec<EmailMessage>>>,
    attempts: Arc<Mutex<Vec<String>>>,
    failing:  Arc<Mutex<HashSet<String>>>,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定した宛先への送信を失敗させる
    pub fn fail_for(&self, address: impl Into<String>) {
        self.failing.lock().unwrap().insert(address.into());
    }

    /// 送信に成功したメール
    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// 送信を試みた宛先（失敗分を含む、試行順）
    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        self.attempts.lock().unwrap().push(email.to.clone());

        if self.failing.lock().unwrap().contains(&email.to) {
            return Err(NotificationError::SendFailed(format!(
                "モック: {} への送信を失敗させました",
                email.to
            )));
        }

        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}
