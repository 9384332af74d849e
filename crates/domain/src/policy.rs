//! # ポリシー（イベント購読）
//!
//! リポジトリのコンテンツ変更イベントと、その購読条件を表す型。
//!
//! ビヘイビアは (ポリシー, 対象型, 通知タイミング) の組で登録される。
//! コメント通知は `(OnContentUpdate, fm:post, TransactionCommit)` で購読する。

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::{node::NodeRef, qname::QName};

define_uuid_id! {
    /// トランザクション ID
    ///
    /// 1 回のコミットにまとめて届いたイベント群をログ上で関連付けるための ID。
    pub struct TransactionId;
}

/// ポリシー名
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum PolicyName {
    /// ノードのコンテンツが更新された
    OnContentUpdate,
}

/// ビヘイビアの通知タイミング
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum NotificationFrequency {
    /// イベント発生の都度、即座に呼び出す
    EveryEvent,
    /// トランザクションのコミット後にまとめて呼び出す
    TransactionCommit,
}

/// コンテンツ更新イベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUpdateEvent {
    /// 更新されたノード
    pub node_ref:    NodeRef,
    /// ノードの型
    pub node_type:   QName,
    /// 新規コンテンツかどうか（既存コンテンツの書き換えは `false`）
    pub new_content: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ポリシー名はcamel_caseで表示される() {
        assert_eq!(PolicyName::OnContentUpdate.to_string(), "onContentUpdate");
    }

    #[test]
    fn test_通知タイミングはsnake_caseで表示される() {
        assert_eq!(
            NotificationFrequency::TransactionCommit.to_string(),
            "transaction_commit"
        );
    }
}
