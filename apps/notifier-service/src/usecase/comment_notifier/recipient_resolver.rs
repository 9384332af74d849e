//! # 受信者解決
//!
//! サイトロールを担うグループの直接メンバーを、送信可能なメールアドレスに解決する。
//!
//! - グループが存在しない / メンバーがいない場合は空リスト（エラーではない）
//! - 人物情報が取れないユーザー、メールアドレスが空のユーザーは除外する
//! - 同じアドレスは最初の 1 件だけ残す（順序は保持）

use std::sync::Arc;

use comment_notifier_domain::{
    authority::AuthorityType,
    person::EmailAddress,
    site::{SiteRole, SiteShortName},
};
use comment_notifier_infra::{
    InfraError,
    platform::{AuthorityService, PersonService, SiteService},
};
use itertools::Itertools;

/// 受信者解決
pub struct RecipientResolver {
    sites:       Arc<dyn SiteService>,
    authorities: Arc<dyn AuthorityService>,
    people:      Arc<dyn PersonService>,
}

impl RecipientResolver {
    pub fn new(
        sites: Arc<dyn SiteService>,
        authorities: Arc<dyn AuthorityService>,
        people: Arc<dyn PersonService>,
    ) -> Self {
        Self {
            sites,
            authorities,
            people,
        }
    }

    /// サイトロールの受信者アドレスを解決する
    pub async fn resolve(
        &self,
        site: &SiteShortName,
        role: SiteRole,
    ) -> Result<Vec<EmailAddress>, InfraError> {
        let Some(group) = self.sites.get_site_role_group(site, role).await? else {
            tracing::debug!(site = site.as_str(), %role, "ロールグループが存在しません");
            return Ok(Vec::new());
        };

        let members = self
            .authorities
            .get_immediate_members(AuthorityType::User, &group)
            .await?;

        let mut addresses = Vec::with_capacity(members.len());
        for member in &members {
            let Some(person) = self.people.get_person(member).await? else {
                tracing::debug!(user = %member, "人物情報がないため受信者から除外");
                continue;
            };
            match person.email() {
                Some(email) => addresses.push(email.clone()),
                None => tracing::debug!(user = %member, "メールアドレスが空のため受信者から除外"),
            }
        }

        Ok(addresses.into_iter().unique().collect())
    }
}

#[cfg(test)]
mod tests {
    use comment_notifier_domain::{authority::AuthorityName, person::PersonInfo};
    use comment_notifier_infra::mock::InMemoryPlatform;
    use pretty_assertions::assert_eq;

    use super::*;

    const MANAGERS: &str = "GROUP_site_marketing_SiteManager";

    fn resolver(platform: &InMemoryPlatform) -> RecipientResolver {
        let shared = Arc::new(platform.clone());
        RecipientResolver::new(shared.clone(), shared.clone(), shared)
    }

    fn add_manager(platform: &InMemoryPlatform, user: &str, email: Option<&str>) {
        platform.add_member(&AuthorityName::new(MANAGERS), AuthorityName::new(user));
        platform.add_person(PersonInfo::new(
            AuthorityName::new(user),
            Some(user.to_string()),
            None,
            email.map(str::to_string),
        ));
    }

    fn short_name() -> SiteShortName {
        SiteShortName::new("marketing").unwrap()
    }

    fn as_strs(addresses: &[EmailAddress]) -> Vec<&str> {
        addresses.iter().map(EmailAddress::as_str).collect()
    }

    #[tokio::test]
    async fn test_マネージャーのアドレスをメンバー順に返す() {
        let platform = InMemoryPlatform::new();
        add_manager(&platform, "agomez", Some("ana@example.com"));
        add_manager(&platform, "bsato", Some("ben@example.com"));

        let recipients = resolver(&platform)
            .resolve(&short_name(), SiteRole::Manager)
            .await
            .unwrap();

        assert_eq!(as_strs(&recipients), vec!["ana@example.com", "ben@example.com"]);
    }

    #[tokio::test]
    async fn test_グループが存在しなければ空リスト() {
        let platform = InMemoryPlatform::new();

        let recipients = resolver(&platform)
            .resolve(&short_name(), SiteRole::Manager)
            .await
            .unwrap();

        assert!(recipients.is_empty());
    }

    #[tokio::test]
    async fn test_メンバーがいないグループは空リスト() {
        let platform = InMemoryPlatform::new();
        platform.add_group(AuthorityName::new(MANAGERS));

        let recipients = resolver(&platform)
            .resolve(&short_name(), SiteRole::Manager)
            .await
            .unwrap();

        assert!(recipients.is_empty());
    }

    #[tokio::test]
    async fn test_メールアドレスが空のユーザーと人物情報のないユーザーは除外する() {
        let platform = InMemoryPlatform::new();
        add_manager(&platform, "agomez", Some("ana@example.com"));
        add_manager(&platform, "noemail", Some("   "));
        add_manager(&platform, "absent", None);
        platform.add_member(&AuthorityName::new(MANAGERS), AuthorityName::new("ghost"));

        let recipients = resolver(&platform)
            .resolve(&short_name(), SiteRole::Manager)
            .await
            .unwrap();

        assert_eq!(as_strs(&recipients), vec!["ana@example.com"]);
    }

    #[tokio::test]
    async fn test_同じアドレスは最初の1件だけ残す() {
        let platform = InMemoryPlatform::new();
        add_manager(&platform, "agomez", Some("shared@example.com"));
        add_manager(&platform, "bsato", Some("ben@example.com"));
        add_manager(&platform, "csuzuki", Some("shared@example.com"));

        let recipients = resolver(&platform)
            .resolve(&short_name(), SiteRole::Manager)
            .await
            .unwrap();

        assert_eq!(
            as_strs(&recipients),
            vec!["shared@example.com", "ben@example.com"]
        );
    }

    #[tokio::test]
    async fn test_サブグループのメンバーは含めない() {
        let platform = InMemoryPlatform::new();
        add_manager(&platform, "agomez", Some("ana@example.com"));
        let nested = AuthorityName::new("GROUP_regional_leads");
        platform.add_member(&AuthorityName::new(MANAGERS), nested.clone());
        platform.add_member(&nested, AuthorityName::new("bsato"));
        platform.add_person(PersonInfo::new(
            AuthorityName::new("bsato"),
            None,
            None,
            Some("ben@example.com".to_string()),
        ));

        let recipients = resolver(&platform)
            .resolve(&short_name(), SiteRole::Manager)
            .await
            .unwrap();

        assert_eq!(as_strs(&recipients), vec!["ana@example.com"]);
    }
}
