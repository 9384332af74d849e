//! # 権限主体（Authority）
//!
//! 個人ユーザーまたはユーザーグループを指す識別子。
//! グループは `GROUP_` プレフィックスで区別される。

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

/// グループ権限主体のプレフィックス
pub const GROUP_PREFIX: &str = "GROUP_";

/// 権限主体の種別
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
#[strum(serialize_all = "snake_case")]
pub enum AuthorityType {
    /// 個人ユーザー
    User,
    /// ユーザーグループ
    Group,
}

/// 権限主体名
///
/// ユーザーの場合はユーザー名そのもの、グループの場合は `GROUP_` 付きの名前。
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("{_0}")]
pub struct AuthorityName(String);

impl AuthorityName {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// `GROUP_` プレフィックスを付けたグループ名を作成する
    ///
    /// 既にプレフィックスが付いている場合はそのまま使う。
    pub fn group(short_name: impl Into<String>) -> Self {
        let short_name = short_name.into();
        if short_name.starts_with(GROUP_PREFIX) {
            Self(short_name)
        } else {
            Self(format!("{GROUP_PREFIX}{short_name}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn authority_type(&self) -> AuthorityType {
        if self.0.starts_with(GROUP_PREFIX) {
            AuthorityType::Group
        } else {
            AuthorityType::User
        }
    }
}
