//! # コメント通知 ドメイン層
//!
//! コンテンツリポジトリ上のコメント通知に関わるドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **借用された参照**: ノード・サイト・人物の実体は外部リポジトリが所有する。
//!   このクレートはそれらを指す値オブジェクトと、純粋な変換ロジックだけを持つ
//! - **I/O なし**: リポジトリ・メール送信への依存は infra 層のトレイトに閉じ込める
//!
//! ## 依存関係の方向
//!
//! ```text
//! notifier-service → infra → domain
//!        ↘                    ↑
//!          ───────────────────
//! ```
//!
//! ## モジュール構成
//!
//! - [`node`] - ノード参照・ストア参照
//! - [`qname`] - 修飾名とコンテンツモデル定数
//! - [`site`] - サイトとロールグループ
//! - [`authority`] - 権限主体（ユーザー / グループ）
//! - [`person`] - 人物情報と表示名
//! - [`comment`] - コメント本文のタグ除去
//! - [`document`] - 文書詳細ページ URL
//! - [`notification`] - 通知メッセージと通知エラー
//! - [`policy`] - イベント購読の記述子
//! - [`error`] - ドメイン層エラー
//!
//! ## 使用例
//!
//! ```rust
//! use comment_notifier_domain::{
//!     node::NodeRef,
//!     site::{SiteInfo, SiteRole, SiteShortName},
//! };
//!
//! let site = SiteInfo::new(
//!     SiteShortName::new("marketing").unwrap(),
//!     "Marketing",
//!     NodeRef::in_spaces_store("site-node"),
//! );
//! assert_eq!(
//!     site.role_group(SiteRole::Manager).as_str(),
//!     "GROUP_site_marketing_SiteManager"
//! );
//! ```

#[macro_use]
mod macros;

pub mod authority;
pub mod comment;
pub mod document;
pub mod error;
pub mod node;
pub mod notification;
pub mod person;
pub mod policy;
pub mod qname;
pub mod site;

pub use error::DomainError;
