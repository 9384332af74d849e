//! REST API v1 のレスポンス型と共通ハンドリング

use comment_notifier_domain::{
    authority::AuthorityName,
    node::NodeRef,
    person::PersonInfo,
    qname::{QName, content_model, site_model},
    site::{SiteInfo, SiteShortName},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::InfraError;

/// 単一エンティティのエンベロープ: `{"entry": {...}}`
#[derive(Debug, Deserialize)]
pub(super) struct Entry<T> {
    pub entry: T,
}

/// 一覧のエンベロープ: `{"list": {"pagination": {...}, "entries": [...]}}`
#[derive(Debug, Deserialize)]
pub(super) struct Paged<T> {
    pub list: PagedList<T>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PagedList<T> {
    pub pagination: Pagination,
    pub entries:    Vec<Entry<T>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Pagination {
    pub has_more_items: bool,
    pub skip_count:     u32,
    pub count:          u32,
}

impl Pagination {
    /// 次ページの skipCount。最終ページなら `None`
    pub fn next_skip(&self) -> Option<u32> {
        (self.has_more_items && self.count > 0).then_some(self.skip_count + self.count)
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct UserRefDto {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PathElementDto {
    pub name:      String,
    #[serde(default)]
    pub node_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PathDto {
    #[serde(default)]
    pub elements: Vec<PathElementDto>,
}

/// ノード
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct NodeDto {
    pub name:            String,
    #[serde(default)]
    pub created_by_user: Option<UserRefDto>,
    #[serde(default)]
    pub properties:      serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub path:            Option<PathDto>,
}

impl NodeDto {
    /// プロパティ値を文字列で取り出す
    ///
    /// `cm:name` と `cm:creator` はトップレベルのフィールドに、それ以外は
    /// `properties` に `prefix:localName` のキーで入っている。
    pub fn property(&self, property: &QName) -> Option<String> {
        if *property == content_model::PROP_NAME {
            return Some(self.name.clone());
        }
        if *property == content_model::PROP_CREATOR {
            return self.created_by_user.as_ref().map(|user| user.id.clone());
        }

        match self.properties.get(&property.to_string())? {
            serde_json::Value::Null => None,
            serde_json::Value::String(value) => Some(value.clone()),
            other => Some(other.to_string()),
        }
    }

    /// パス上のサイトノード名（= サイト短縮名）
    pub fn site_short_name(&self) -> Option<&str> {
        let site_type = site_model::TYPE_SITE.to_string();
        self.path
            .as_ref()?
            .elements
            .iter()
            .rev()
            .find(|element| element.node_type.as_deref() == Some(site_type.as_str()))
            .map(|element| element.name.as_str())
    }
}

/// 一覧エントリなど、ID だけを使うノード
#[derive(Debug, Deserialize)]
pub(super) struct NodeIdDto {
    pub id: String,
}

impl NodeIdDto {
    pub fn into_node_ref(self) -> NodeRef {
        NodeRef::in_spaces_store(self.id)
    }
}

/// サイト
#[derive(Debug, Deserialize)]
pub(super) struct SiteDto {
    pub id:    String,
    pub guid:  String,
    pub title: String,
}

impl TryFrom<SiteDto> for SiteInfo {
    type Error = InfraError;

    fn try_from(dto: SiteDto) -> Result<Self, Self::Error> {
        let short_name = SiteShortName::new(dto.id)
            .map_err(|e| InfraError::invalid_response(format!("サイト ID が不正: {e}")))?;
        Ok(SiteInfo::new(
            short_name,
            dto.title,
            NodeRef::in_spaces_store(dto.guid),
        ))
    }
}

/// グループ
#[derive(Debug, Deserialize)]
pub(super) struct GroupDto {
    pub id: String,
}

/// グループメンバー（`memberType` は `where` 句で絞り込み済み）
#[derive(Debug, Deserialize)]
pub(super) struct GroupMemberDto {
    pub id: String,
}

/// 人物
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PersonDto {
    pub id:         String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name:  Option<String>,
    #[serde(default)]
    pub email:      Option<String>,
}

impl From<PersonDto> for PersonInfo {
    fn from(dto: PersonDto) -> Self {
        PersonInfo::new(
            AuthorityName::new(dto.id),
            dto.first_name,
            dto.last_name,
            dto.email,
        )
    }
}

/// 検索 API のリクエストボディ
#[derive(Debug, Serialize)]
pub(super) struct SearchRequest<'a> {
    pub query:  SearchQuery<'a>,
    pub paging: SearchPaging,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchQuery<'a> {
    pub query:    &'a str,
    pub language: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SearchPaging {
    pub max_items:  u32,
    pub skip_count: u32,
}

/// JSON レスポンスの共通ハンドリング
///
/// - 2xx: ボディを `T` にデシリアライズして `Some`
/// - 404: `None`（不在は値で表す）
/// - その他: [`InfraError::unexpected_status`]
pub(super) async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<Option<T>, InfraError> {
    let status = response.status();

    if status == reqwest::StatusCode::NOT_FOUND {
        return Ok(None);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(InfraError::unexpected_status(status.as_u16(), body));
    }

    let body = response.text().await?;
    Ok(Some(serde_json::from_str(&body)?))
}

/// コンテンツ（生バイト列）レスポンスの共通ハンドリング
///
/// UTF-8 として解釈できない場合は不正レスポンスとする。
pub(super) async fn handle_content_response(
    response: reqwest::Response,
) -> Result<Option<String>, InfraError> {
    let status = response.status();

    if status == reqwest::StatusCode::NOT_FOUND {
        return Ok(None);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(InfraError::unexpected_status(status.as_u16(), body));
    }

    let bytes = response.bytes().await?;
    String::from_utf8(bytes.to_vec())
        .map(Some)
        .map_err(|e| InfraError::invalid_response(format!("コンテンツが UTF-8 ではありません: {e}")))
}
