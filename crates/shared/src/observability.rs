//! # ログ出力の初期化
//!
//! Notifier Service の tracing subscriber を組み立てる。
//!
//! - `LOG_FORMAT=json` で 1 行 1 イベントの JSON、それ以外は人間向けの整形出力
//! - `RUST_LOG` が未設定なら自クレートのみ debug
//! - infra 層の `InfraError` が SpanTrace を取れるよう `ErrorLayer` を重ねる

/// 未設定時のフィルタ
pub const DEFAULT_FILTER: &str = "info,comment_notifier=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    /// `LOG_FORMAT` の値から決める
    ///
    /// 大文字小文字は区別しない。未知の値は stderr に警告して `Pretty` にする
    /// （subscriber 初期化前なので tracing には出せない）。
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" | "" => Self::Pretty,
            other => {
                eprintln!("WARNING: unknown LOG_FORMAT={other:?}, falling back to pretty");
                Self::Pretty
            }
        }
    }

    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }
}

/// tracing の初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// ルートスパンの `service` フィールド
    pub service_name: String,
    pub log_format:   LogFormat,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
        }
    }

    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::new(service_name, LogFormat::from_env())
    }
}

/// グローバル subscriber を登録し、サービス名を持つルートスパンを返す
///
/// 呼び出し側はルートスパンを `entered()` で保持する。
/// 2 回目以降の呼び出しはパニックする（`SubscriberInitExt::init`）。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) -> tracing::Span {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .init();

    tracing::info_span!("app", service = %config.service_name)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("json", LogFormat::Json)]
    #[case("JSON", LogFormat::Json)]
    #[case(" json ", LogFormat::Json)]
    #[case("pretty", LogFormat::Pretty)]
    #[case("", LogFormat::Pretty)]
    #[case("yaml", LogFormat::Pretty)]
    fn test_log_formatの値から出力形式を決める(#[case] value: &str, #[case] expected: LogFormat) {
        assert_eq!(LogFormat::parse(value), expected);
    }

    #[test]
    fn test_サービス名と出力形式を保持する() {
        let config = TracingConfig::new("notifier-service", LogFormat::Json);

        assert_eq!(config.service_name, "notifier-service");
        assert_eq!(config.log_format, LogFormat::Json);
    }
}
