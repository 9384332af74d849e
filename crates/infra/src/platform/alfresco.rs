//! # Alfresco REST アダプタ
//!
//! Alfresco 互換リポジトリの公開 REST API v1 と検索 API を呼び出し、
//! [`super`] の協調者トレイトを実装する。
//!
//! ## エンドポイント
//!
//! | 操作 | エンドポイント |
//! |------|--------------|
//! | ノード存在・プロパティ | `GET nodes/{id}?include=properties,path` |
//! | 主親 | `GET nodes/{id}/parents?where=(isPrimary=true)` |
//! | コンテンツ | `GET nodes/{id}/content` |
//! | サイト | `GET sites/{id}` |
//! | ロールグループ | `GET groups/{id}` |
//! | グループメンバー | `GET groups/{id}/members` |
//! | 人物 | `GET people/{id}` |
//! | パス検索 | `POST search/versions/1/search` |
//!
//! 作業ストア（`workspace://SpacesStore`）以外のノードは REST API v1 で
//! 扱えないため入力エラーにする。

mod response;

use async_trait::async_trait;
use comment_notifier_domain::{
    authority::{AuthorityName, AuthorityType},
    node::{NodeRef, StoreRef},
    person::PersonInfo,
    qname::{QName, content_model},
    site::{SiteInfo, SiteRole, SiteShortName, role_group_name},
};
use response::{
    Entry,
    GroupDto,
    GroupMemberDto,
    NodeDto,
    NodeIdDto,
    Paged,
    PersonDto,
    SearchPaging,
    SearchQuery,
    SearchRequest,
    SiteDto,
    handle_content_response,
    handle_response,
};

use super::{
    AuthorityService,
    ContentService,
    NodeService,
    PersonService,
    QueryLanguage,
    SearchService,
    SiteService,
};
use crate::error::InfraError;

const CORE_API_PATH: &str = "/api/-default-/public/alfresco/versions/1";
const SEARCH_API_PATH: &str = "/api/-default-/public/search/versions/1/search";
const PAGE_SIZE: u32 = 100;

/// Alfresco REST クライアント
#[derive(Clone)]
pub struct AlfrescoRestClient {
    base_url: String,
    username: String,
    password: String,
    client:   reqwest::Client,
}

impl AlfrescoRestClient {
    /// 新しいクライアントを作成する
    ///
    /// # 引数
    ///
    /// - `base_url`: リポジトリのベース URL（例: `http://localhost:8080/alfresco`）
    /// - `username` / `password`: Basic 認証の資格情報
    pub fn new(base_url: &str, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            client:   reqwest::Client::new(),
        }
    }

    fn core_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, CORE_API_PATH, path)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.core_url(path))
            .basic_auth(&self.username, Some(&self.password))
    }

    async fn fetch_node(&self, node: &NodeRef, include: &str) -> Result<Option<NodeDto>, InfraError> {
        let id = node_id(node)?;
        let response = self
            .get(&format!("/nodes/{}", urlencoding::encode(id)))
            .query(&[("include", include)])
            .send()
            .await?;

        let entry: Option<Entry<NodeDto>> = handle_response(response).await?;
        Ok(entry.map(|e| e.entry))
    }

    /// グループの直接メンバーを種別で絞り込んで全ページ取得する
    async fn fetch_members(
        &self,
        group: &AuthorityName,
        authority_type: AuthorityType,
    ) -> Result<Vec<GroupMemberDto>, InfraError> {
        let path = format!("/groups/{}/members", urlencoding::encode(group.as_str()));
        let filter = member_filter(authority_type);
        let mut members = Vec::new();
        let mut skip_count = 0;

        loop {
            let response = self
                .get(&path)
                .query(&[
                    ("skipCount", skip_count.to_string()),
                    ("maxItems", PAGE_SIZE.to_string()),
                    ("where", filter.clone()),
                ])
                .send()
                .await?;
            let Some(page): Option<Paged<GroupMemberDto>> = handle_response(response).await?
            else {
                return Ok(members);
            };

            let next = page.list.pagination.next_skip();
            members.extend(page.list.entries.into_iter().map(|e| e.entry));

            match next {
                Some(next) => skip_count = next,
                None => return Ok(members),
            }
        }
    }
}

/// REST API v1 で扱えるノード ID を取り出す
fn node_id(node: &NodeRef) -> Result<&str, InfraError> {
    ensure_spaces_store(node.store())?;
    Ok(node.id())
}

fn ensure_spaces_store(store: &StoreRef) -> Result<(), InfraError> {
    if *store != StoreRef::spaces_store() {
        return Err(InfraError::invalid_input(format!(
            "REST API は {store} を扱えません"
        )));
    }
    Ok(())
}

/// 権限種別で絞り込む `where` 句
fn member_filter(authority_type: AuthorityType) -> String {
    let member_type = match authority_type {
        AuthorityType::User => "PERSON",
        AuthorityType::Group => "GROUP",
    };
    format!("(memberType='{member_type}')")
}

#[async_trait]
impl NodeService for AlfrescoRestClient {
    async fn exists(&self, node: &NodeRef) -> Result<bool, InfraError> {
        Ok(self.fetch_node(node, "").await?.is_some())
    }

    async fn get_property(
        &self,
        node: &NodeRef,
        property: &QName,
    ) -> Result<Option<String>, InfraError> {
        Ok(self
            .fetch_node(node, "properties")
            .await?
            .and_then(|dto| dto.property(property)))
    }

    async fn get_primary_parent(&self, node: &NodeRef) -> Result<Option<NodeRef>, InfraError> {
        let id = node_id(node)?;
        let response = self
            .get(&format!("/nodes/{}/parents", urlencoding::encode(id)))
            .query(&[("where", "(isPrimary=true)")])
            .send()
            .await?;

        let page: Option<Paged<NodeIdDto>> = handle_response(response).await?;
        Ok(page
            .and_then(|p| p.list.entries.into_iter().next())
            .map(|e| e.entry.into_node_ref()))
    }
}

#[async_trait]
impl ContentService for AlfrescoRestClient {
    async fn read_content_string(
        &self,
        node: &NodeRef,
        property: &QName,
    ) -> Result<Option<String>, InfraError> {
        if *property != content_model::PROP_CONTENT {
            return Err(InfraError::invalid_input(format!(
                "REST API は {property} のコンテンツを読み出せません"
            )));
        }

        let id = node_id(node)?;
        let response = self
            .get(&format!("/nodes/{}/content", urlencoding::encode(id)))
            .send()
            .await?;

        handle_content_response(response).await
    }
}

#[async_trait]
impl SearchService for AlfrescoRestClient {
    /// 先頭 `PAGE_SIZE` 件までを返す
    async fn query(
        &self,
        store: &StoreRef,
        language: QueryLanguage,
        query: &str,
    ) -> Result<Vec<NodeRef>, InfraError> {
        ensure_spaces_store(store)?;

        let body = SearchRequest {
            query:  SearchQuery {
                query,
                language: language.into(),
            },
            paging: SearchPaging {
                max_items:  PAGE_SIZE,
                skip_count: 0,
            },
        };

        let response = self
            .client
            .post(format!("{}{}", self.base_url, SEARCH_API_PATH))
            .basic_auth(&self.username, Some(&self.password))
            .json(&body)
            .send()
            .await?;

        let page: Option<Paged<NodeIdDto>> = handle_response(response).await?;
        let page = page.ok_or_else(|| InfraError::invalid_response("検索 API が 404 を返しました"))?;

        Ok(page
            .list
            .entries
            .into_iter()
            .map(|e| e.entry.into_node_ref())
            .collect())
    }
}

#[async_trait]
impl SiteService for AlfrescoRestClient {
    async fn get_site(&self, node: &NodeRef) -> Result<Option<SiteInfo>, InfraError> {
        let Some(dto) = self.fetch_node(node, "path").await? else {
            return Ok(None);
        };
        let Some(short_name) = dto.site_short_name() else {
            return Ok(None);
        };

        let response = self
            .get(&format!("/sites/{}", urlencoding::encode(short_name)))
            .send()
            .await?;

        let entry: Option<Entry<SiteDto>> = handle_response(response).await?;
        entry.map(|e| SiteInfo::try_from(e.entry)).transpose()
    }

    async fn get_site_role_group(
        &self,
        site: &SiteShortName,
        role: SiteRole,
    ) -> Result<Option<AuthorityName>, InfraError> {
        let group = role_group_name(site, role);
        let response = self
            .get(&format!("/groups/{}", urlencoding::encode(group.as_str())))
            .send()
            .await?;

        let entry: Option<Entry<GroupDto>> = handle_response(response).await?;
        Ok(entry.map(|e| AuthorityName::new(e.entry.id)))
    }
}

#[async_trait]
impl AuthorityService for AlfrescoRestClient {
    async fn get_immediate_members(
        &self,
        authority_type: AuthorityType,
        group: &AuthorityName,
    ) -> Result<Vec<AuthorityName>, InfraError> {
        Ok(self
            .fetch_members(group, authority_type)
            .await?
            .into_iter()
            .map(|m| AuthorityName::new(m.id))
            .collect())
    }
}

#[async_trait]
impl PersonService for AlfrescoRestClient {
    async fn get_person(
        &self,
        user_name: &AuthorityName,
    ) -> Result<Option<PersonInfo>, InfraError> {
        let response = self
            .get(&format!("/people/{}", urlencoding::encode(user_name.as_str())))
            .send()
            .await?;

        let entry: Option<Entry<PersonDto>> = handle_response(response).await?;
        Ok(entry.map(|e| PersonInfo::from(e.entry)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::InfraErrorKind;

    #[test]
    fn test_ベースurl末尾のスラッシュを除去する() {
        let client = AlfrescoRestClient::new("http://localhost:8080/alfresco/", "admin", "admin");

        assert_eq!(
            client.core_url("/people/agomez"),
            "http://localhost:8080/alfresco/api/-default-/public/alfresco/versions/1/people/agomez"
        );
    }

    #[test]
    fn test_作業ストアのノードidを取り出す() {
        let node = NodeRef::in_spaces_store("abc-123");

        assert_eq!(node_id(&node).unwrap(), "abc-123");
    }

    #[test]
    fn test_作業ストア以外はinvalid_inputになる() {
        let node = NodeRef::new(StoreRef::new("archive", "SpacesStore"), "abc-123");

        let err = node_id(&node).unwrap_err();

        assert!(matches!(err.kind(), InfraErrorKind::InvalidInput(_)));
    }

    #[test]
    fn test_権限種別をmember_typeのwhere句に変換する() {
        assert_eq!(member_filter(AuthorityType::User), "(memberType='PERSON')");
        assert_eq!(member_filter(AuthorityType::Group), "(memberType='GROUP')");
    }

    #[tokio::test]
    async fn test_cm_content以外のコンテンツ読み出しはinvalid_inputになる() {
        let client = AlfrescoRestClient::new("http://localhost:8080/alfresco", "admin", "admin");

        let result = client
            .read_content_string(
                &NodeRef::in_spaces_store("abc-123"),
                &content_model::PROP_NAME,
            )
            .await;

        assert!(matches!(
            result.unwrap_err().kind(),
            InfraErrorKind::InvalidInput(_)
        ));
    }

    #[test]
    fn test_クライアントはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AlfrescoRestClient>();
    }
}
