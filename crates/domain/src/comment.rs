//! # コメント本文
//!
//! ディスカッション投稿の生テキストからメール本文用のテキストを作る。
//!
//! タグ除去は `<` から最短一致の `>` までを取り除くだけの軽量な処理で、
//! HTML パーサーではない。入れ子や閉じ忘れを含む入力でも同じ規則で削る。

use std::sync::LazyLock;

use regex::Regex;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<.*?>").expect("タグ除去パターンのコンパイルに失敗"));

/// タグ状の部分文字列をすべて取り除く
///
/// タグの外側のテキストは順序も含めてそのまま残る。
///
/// ```rust
/// use comment_notifier_domain::comment::strip_markup;
///
/// assert_eq!(strip_markup("Hello <b>world</b>!"), "Hello world!");
/// assert_eq!(strip_markup("no tags here"), "no tags here");
/// ```
pub fn strip_markup(raw: &str) -> String {
    TAG_PATTERN.replace_all(raw, "").into_owned()
}
