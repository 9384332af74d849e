//! # 個人（Person）
//!
//! ユーザーアカウントに紐づく人物情報。コメント投稿者の表示名と、
//! 通知受信者のメールアドレスの解決に使う。
//!
//! ## 表示名の規則
//!
//! 名・姓のうち空でないものを順に並べ、それぞれの直後に半角スペースを 1 つ置く。
//!
//! | 名 | 姓 | 表示名 |
//! |---|---|------|
//! | `Ana` | `Gomez` | `"Ana Gomez "` |
//! | `Ana` | なし | `"Ana "` |
//! | なし | なし | `"<ユーザー名> "` |

use crate::authority::AuthorityName;

define_validated_string! {
    /// メールアドレス
    ///
    /// 空文字・空白のみの値は生成できない。宛先として使えない人物を
    /// 受信者リストから除外するための型。
    pub struct EmailAddress {
        label: "メールアドレス",
        max_length: 255,
        pii: true,
    }
}

/// 人物情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonInfo {
    user_name:  AuthorityName,
    first_name: Option<String>,
    last_name:  Option<String>,
    email:      Option<EmailAddress>,
}

impl PersonInfo {
    pub fn new(
        user_name: AuthorityName,
        first_name: Option<String>,
        last_name: Option<String>,
        email: Option<String>,
    ) -> Self {
        Self {
            user_name,
            first_name,
            last_name,
            email: email.and_then(|e| EmailAddress::new(e).ok()),
        }
    }

    pub fn user_name(&self) -> &AuthorityName {
        &self.user_name
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    /// 宛先として使えるメールアドレス（空の場合は `None`）
    pub fn email(&self) -> Option<&EmailAddress> {
        self.email.as_ref()
    }

    /// メール本文に埋め込む表示名
    pub fn display_name(&self) -> String {
        let parts: String = [self.first_name(), self.last_name()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| format!("{part} "))
            .collect();

        if parts.is_empty() {
            format!("{} ", self.user_name)
        } else {
            parts
        }
    }
}
