//! # 文書リンク
//!
//! コメント対象の文書を Web UI で開くための URL を組み立てる。
//!
//! 形式: `{share_url}/page/site/{site}/document-details?nodeRef={protocol}://{store}/{id}`
//!
//! `nodeRef` パラメータはプラットフォームの文書詳細ページが受け付ける
//! 生の形式のまま埋め込む（パーセントエンコードしない）。

use crate::{node::NodeRef, site::SiteShortName};

/// 文書詳細ページの URL を組み立てる
///
/// `share_url` 末尾のスラッシュは取り除く。
///
/// ```rust
/// use comment_notifier_domain::{
///     document::document_details_url,
///     node::NodeRef,
///     site::SiteShortName,
/// };
///
/// let url = document_details_url(
///     "http://localhost:8080/share/",
///     &SiteShortName::new("marketing").unwrap(),
///     &NodeRef::in_spaces_store("d0c"),
/// );
/// assert_eq!(
///     url,
///     "http://localhost:8080/share/page/site/marketing/document-details?nodeRef=workspace://SpacesStore/d0c"
/// );
/// ```
pub fn document_details_url(
    share_url: &str,
    site_short_name: &SiteShortName,
    document: &NodeRef,
) -> String {
    format!(
        "{}/page/site/{}/document-details?nodeRef={}",
        share_url.trim_end_matches('/'),
        site_short_name.as_str(),
        document
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::node::StoreRef;

    #[test]
    fn test_urlにサイト短縮名とノード参照を埋め込む() {
        let url = document_details_url(
            "https://ecm.example.com/share",
            &SiteShortName::new("legal").unwrap(),
            &NodeRef::new(StoreRef::new("archive", "SpacesStore"), "1234-abcd"),
        );

        assert_eq!(
            url,
            "https://ecm.example.com/share/page/site/legal/document-details?nodeRef=archive://SpacesStore/1234-abcd"
        );
    }
}
