//! # ノード参照
//!
//! リポジトリ上のノード（文書、コメント、フォルダ、サイトコンテナ）を指す参照型。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 文字列表現 |
//! |---|------------|----------|
//! | [`StoreRef`] | ストア参照 | `workspace://SpacesStore` |
//! | [`NodeRef`] | ノード参照 | `workspace://SpacesStore/<node-id>` |
//!
//! ## 設計方針
//!
//! - **借用のみ**: ノードの実体はリポジトリが所有し、このクレートは参照だけを扱う
//! - **文字列往復**: `Display` と `FromStr` は同じ `<protocol>://<identifier>/<id>` 形式を使う

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::DomainError;

/// ストア参照
///
/// プロトコル（`workspace`, `archive` など）とストア識別子の組。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreRef {
    protocol:   String,
    identifier: String,
}

impl StoreRef {
    /// 作業領域プロトコル
    pub const PROTOCOL_WORKSPACE: &'static str = "workspace";
    /// 標準の作業ストア識別子
    pub const SPACES_STORE_ID: &'static str = "SpacesStore";

    pub fn new(protocol: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            protocol:   protocol.into(),
            identifier: identifier.into(),
        }
    }

    /// `workspace://SpacesStore` を返す
    pub fn spaces_store() -> Self {
        Self::new(Self::PROTOCOL_WORKSPACE, Self::SPACES_STORE_ID)
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl fmt::Display for StoreRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.protocol, self.identifier)
    }
}

/// ノード参照
///
/// ストア参照とストア内で一意なノード ID の組。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeRef {
    store: StoreRef,
    id:    String,
}

impl NodeRef {
    pub fn new(store: StoreRef, id: impl Into<String>) -> Self {
        Self {
            store,
            id: id.into(),
        }
    }

    /// `workspace://SpacesStore` 上のノード参照を作成する
    pub fn in_spaces_store(id: impl Into<String>) -> Self {
        Self::new(StoreRef::spaces_store(), id)
    }

    pub fn store(&self) -> &StoreRef {
        &self.store
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.store, self.id)
    }
}

impl FromStr for NodeRef {
    type Err = DomainError;

    /// `<protocol>://<identifier>/<id>` 形式をパースする
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::Validation(format!("ノード参照の形式が不正です: {s}"));

        let (protocol, rest) = s.split_once("://").ok_or_else(invalid)?;
        let (identifier, id) = rest.split_once('/').ok_or_else(invalid)?;

        if protocol.is_empty() || identifier.is_empty() || id.is_empty() || id.contains('/') {
            return Err(invalid());
        }

        Ok(Self::new(StoreRef::new(protocol, identifier), id))
    }
}

impl Serialize for NodeRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NodeRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
