//! # 通知ユースケース
//!
//! コメント通知メールのテンプレート取得・生成・送信を担当する。
//!
//! ## モジュール構成
//!
//! - [`template_locator`] - リポジトリ上の通知テンプレートをパス検索で取得
//! - [`template_renderer`] - tera によるメール本文の生成
//! - [`service`] - 受信者ごとのレンダリング + 送信 + ビジネスイベントログ

pub mod service;
pub mod template_locator;
pub mod template_renderer;

pub use service::{DispatchReport, NotificationDispatcher};
pub use template_locator::{NotificationTemplate, TemplateLocator};
pub use template_renderer::TemplateRenderer;
