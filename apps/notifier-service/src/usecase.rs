//! # ユースケース層
//!
//! コメント通知ビヘイビアと、それを駆動するポリシーコンポーネント。
//!
//! ## モジュール構成
//!
//! - [`policy`] - ビヘイビア登録とトランザクション単位の配送
//! - [`comment_notifier`] - コメント検知・受信者解決・通知の組み立て
//! - [`notification`] - テンプレート取得・レンダリング・送信

pub mod comment_notifier;
pub mod notification;
pub mod policy;

pub use comment_notifier::CommentNotifierBehaviour;
pub use policy::{CommitReport, ContentUpdateBehaviour, PolicyComponent, TransactionScope};
