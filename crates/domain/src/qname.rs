//! # 修飾名（QName）
//!
//! 型名・プロパティ名を表す `prefix:localName` 形式の名前と、
//! コメント通知で参照するコンテンツモデルの定数。

use std::{borrow::Cow, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::DomainError;

/// 修飾名
///
/// 名前空間プレフィックスとローカル名の組。定数として宣言できるよう
/// `Cow<'static, str>` で保持する。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    prefix:     Cow<'static, str>,
    local_name: Cow<'static, str>,
}

impl QName {
    /// 静的文字列から修飾名を作成する（定数宣言用）
    pub const fn from_static(prefix: &'static str, local_name: &'static str) -> Self {
        Self {
            prefix:     Cow::Borrowed(prefix),
            local_name: Cow::Borrowed(local_name),
        }
    }

    pub fn new(prefix: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            prefix:     Cow::Owned(prefix.into()),
            local_name: Cow::Owned(local_name.into()),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.local_name)
    }
}

impl FromStr for QName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((prefix, local_name))
                if !prefix.is_empty() && !local_name.is_empty() && !local_name.contains(':') =>
            {
                Ok(Self::new(prefix, local_name))
            }
            _ => Err(DomainError::Validation(format!(
                "修飾名の形式が不正です: {s}"
            ))),
        }
    }
}

impl Serialize for QName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// コンテンツモデル（`cm:`）
pub mod content_model {
    use super::QName;

    pub const PROP_NAME: QName = QName::from_static("cm", "name");
    pub const PROP_CREATOR: QName = QName::from_static("cm", "creator");
    pub const PROP_CONTENT: QName = QName::from_static("cm", "content");
    pub const PROP_EMAIL: QName = QName::from_static("cm", "email");
    pub const PROP_FIRST_NAME: QName = QName::from_static("cm", "firstName");
    pub const PROP_LAST_NAME: QName = QName::from_static("cm", "lastName");
}

/// フォーラムモデル（`fm:`）
pub mod forum_model {
    use super::QName;

    /// ディスカッションの投稿（コメント本体）
    pub const TYPE_POST: QName = QName::from_static("fm", "post");
}

/// サイトモデル（`st:`）
pub mod site_model {
    use super::QName;

    pub const TYPE_SITE: QName = QName::from_static("st", "site");
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_定数とパース結果が等しい() {
        let parsed: QName = "fm:post".parse().unwrap();
        assert_eq!(parsed, forum_model::TYPE_POST);
        assert_eq!(content_model::PROP_FIRST_NAME.to_string(), "cm:firstName");
    }

    #[test]
    fn test_不正な修飾名はエラーになる() {
        assert!("post".parse::<QName>().is_err());
        assert!(":post".parse::<QName>().is_err());
        assert!("fm:".parse::<QName>().is_err());
        assert!("fm:a:b".parse::<QName>().is_err());
    }
}
