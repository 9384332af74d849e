/// UUID v7 をラップした ID 型を定義する
///
/// 生成される型は `new()` で採番し、`Display` でハイフン区切りの UUID を出力する。
/// ログのフィールドに載せる相関 ID（[`TransactionId`](crate::policy::TransactionId)）用。
///
/// ```rust
/// use comment_notifier_domain::policy::TransactionId;
///
/// let first = TransactionId::new();
/// let second = TransactionId::new();
/// assert_ne!(first, second);
/// assert_eq!(first.to_string().len(), 36);
/// ```
macro_rules! define_uuid_id {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident;
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize,
            derive_more::Display,
        )]
        #[display("{_0}")]
        $vis struct $Name(uuid::Uuid);

        impl $Name {
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7())
            }
        }

        impl Default for $Name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

/// `new()` と `as_str()` を生成する。`define_validated_string!` の両アームから使う。
macro_rules! _validated_string_common {
    ($Name:ident, $label:expr, $max_length:expr) => {
        impl $Name {
            /// 前後の空白を除いて検証する
            pub fn new(value: impl Into<String>) -> Result<Self, $crate::DomainError> {
                let value = value.into().trim().to_string();

                if value.is_empty() {
                    return Err($crate::DomainError::Validation(format!(
                        "{}は必須です",
                        $label
                    )));
                }

                if value.chars().count() > $max_length {
                    return Err($crate::DomainError::Validation(format!(
                        "{}は {} 文字以内である必要があります",
                        $label, $max_length
                    )));
                }

                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}

/// 空でない String Newtype を定義する
///
/// サイト短縮名（[`SiteShortName`](crate::site::SiteShortName)）と
/// メールアドレス（[`EmailAddress`](crate::person::EmailAddress)）で使う。
///
/// `pii: true` のアームは `Debug` を `[REDACTED]` にし、`Display` を持たない。
/// 受信者アドレスをログに平文で出さないため。
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use comment_notifier_domain::{person::EmailAddress, site::SiteShortName};
///
/// let site = SiteShortName::new(" marketing ")?;
/// assert_eq!(site.to_string(), "marketing");
///
/// let email = EmailAddress::new("  manager@example.com ")?;
/// assert_eq!(email.as_str(), "manager@example.com");
/// assert!(format!("{:?}", email).contains("[REDACTED]"));
/// # Ok(())
/// # }
/// ```
macro_rules! define_validated_string {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident {
            label: $label:expr,
            max_length: $max_length:expr,
            pii: true $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        $vis struct $Name(String);

        impl std::fmt::Debug for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_tuple(stringify!($Name)).field(&"[REDACTED]").finish()
            }
        }

        _validated_string_common!($Name, $label, $max_length);
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident {
            label: $label:expr,
            max_length: $max_length:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        $vis struct $Name(String);

        _validated_string_common!($Name, $label, $max_length);

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}
