//! # ドメイン層エラー定義
//!
//! 値オブジェクトの生成失敗を表現するエラー型。
//!
//! ## 設計方針
//!
//! - **型による分類**: エラーの種類を列挙型で明示し、パターンマッチで処理可能に
//! - **thiserror 活用**: `#[error(...)]` マクロでエラーメッセージを自動生成
//!
//! ## 使用例
//!
//! ```rust
//! use comment_notifier_domain::DomainError;
//!
//! fn validate_short_name(name: &str) -> Result<(), DomainError> {
//!     if name.is_empty() {
//!         return Err(DomainError::Validation("サイト短縮名は必須です".to_string()));
//!     }
//!     Ok(())
//! }
//!
//! let error = validate_short_name("").unwrap_err();
//! assert_eq!(error.to_string(), "バリデーションエラー: サイト短縮名は必須です");
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 文字列表現のパース失敗（NodeRef, QName）や必須値の欠落に使用する。
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
