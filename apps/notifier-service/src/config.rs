//! # Notifier Service 設定
//!
//! 環境変数から Notifier Service の設定を読み込む。
//!
//! 必須なのは `NOTIFIER_PORT` のみで、それ以外はローカル開発用の既定値を持つ。

use std::env;

use strum::EnumString;
use thiserror::Error;

/// 既定の通知テンプレートパス
pub const DEFAULT_TEMPLATE_PATH: &str = "/app:company_home/app:dictionary/app:email_templates/app:notify_email_templates/cm:template_comments.html.tera";

/// 設定エラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    #[error("{name} の値が不正です: {value}")]
    Invalid { name: &'static str, value: String },
}

/// メール送信バックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, strum::Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NotificationBackend {
    Smtp,
    Ses,
    Noop,
}

/// リポジトリ REST API の接続設定
#[derive(Debug, Clone)]
pub struct RepositoryConfig {
    pub url:      String,
    pub user:     String,
    pub password: String,
}

/// メール送信の設定
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub backend:      NotificationBackend,
    pub smtp_host:    String,
    pub smtp_port:    u16,
    pub from_address: String,
}

/// Notifier Service サーバーの設定
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// バインドアドレス
    pub host:          String,
    /// ポート番号
    pub port:          u16,
    /// Web UI のベース URL（メール内リンク用）
    pub share_url:     String,
    pub repository:    RepositoryConfig,
    /// 通知テンプレートのリポジトリ上のパス
    pub template_path: String,
    pub notification:  NotificationConfig,
}

impl NotifierConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の取得関数から設定を読み込む
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let or_default =
            |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        Ok(Self {
            host:          or_default("NOTIFIER_HOST", "0.0.0.0"),
            port:          parse(
                "NOTIFIER_PORT",
                lookup("NOTIFIER_PORT").ok_or(ConfigError::Missing("NOTIFIER_PORT"))?,
            )?,
            share_url:     or_default("SHARE_URL", "http://localhost:8080/share"),
            repository:    RepositoryConfig {
                url:      or_default("REPOSITORY_URL", "http://localhost:8080/alfresco"),
                user:     or_default("REPOSITORY_USER", "admin"),
                password: or_default("REPOSITORY_PASSWORD", "admin"),
            },
            template_path: or_default("NOTIFICATION_TEMPLATE_PATH", DEFAULT_TEMPLATE_PATH),
            notification:  NotificationConfig {
                backend:      parse(
                    "NOTIFICATION_BACKEND",
                    or_default("NOTIFICATION_BACKEND", "noop"),
                )?,
                smtp_host:    or_default("SMTP_HOST", "localhost"),
                smtp_port:    parse("SMTP_PORT", or_default("SMTP_PORT", "1025"))?,
                from_address: or_default(
                    "NOTIFICATION_FROM_ADDRESS",
                    "noreply@comment-notifier.example.com",
                ),
            },
        })
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<NotifierConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        NotifierConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_ポートだけ指定すれば既定値で起動できる() {
        let config = load(&[("NOTIFIER_PORT", "13010")]).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 13010);
        assert_eq!(config.share_url, "http://localhost:8080/share");
        assert_eq!(config.repository.url, "http://localhost:8080/alfresco");
        assert_eq!(config.repository.user, "admin");
        assert_eq!(config.template_path, DEFAULT_TEMPLATE_PATH);
        assert_eq!(config.notification.backend, NotificationBackend::Noop);
        assert_eq!(config.notification.smtp_host, "localhost");
        assert_eq!(config.notification.smtp_port, 1025);
    }

    #[test]
    fn test_ポートがなければmissing() {
        assert_eq!(
            load(&[]).unwrap_err(),
            ConfigError::Missing("NOTIFIER_PORT")
        );
    }

    #[test]
    fn test_ポートが数値でなければinvalid() {
        assert!(matches!(
            load(&[("NOTIFIER_PORT", "http")]),
            Err(ConfigError::Invalid {
                name: "NOTIFIER_PORT",
                ..
            })
        ));
    }

    #[rstest]
    #[case("smtp", NotificationBackend::Smtp)]
    #[case("SES", NotificationBackend::Ses)]
    #[case("noop", NotificationBackend::Noop)]
    fn test_送信バックエンドを選べる(#[case] value: &str, #[case] expected: NotificationBackend) {
        let config = load(&[("NOTIFIER_PORT", "13010"), ("NOTIFICATION_BACKEND", value)]).unwrap();

        assert_eq!(config.notification.backend, expected);
    }

    #[test]
    fn test_未知の送信バックエンドはinvalid() {
        assert!(matches!(
            load(&[("NOTIFIER_PORT", "13010"), ("NOTIFICATION_BACKEND", "pigeon")]),
            Err(ConfigError::Invalid {
                name: "NOTIFICATION_BACKEND",
                ..
            })
        ));
    }
}
