//! # インフラ層エラー定義
//!
//! リポジトリ REST API やメール送信基盤との通信で発生するエラーを表現する。
//!
//! ## 設計方針
//!
//! - **エラーの変換**: reqwest::Error, serde_json::Error をラップ
//! - **ドメインエラーとの分離**: インフラ固有のエラーを明示
//! - **SpanTrace 自動捕捉**: `From` 実装や convenience constructor で
//!   エラー生成時の呼び出し経路を自動記録する
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別（Http, UnexpectedStatus 等）

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// エラー種別（[`InfraErrorKind`]）と [`SpanTrace`]（呼び出し経路）を保持する。
///
/// ## パターンマッチ
///
/// ```ignore
/// match error.kind() {
///     InfraErrorKind::UnexpectedStatus { status, .. } => { /* ステータス別処理 */ }
///     _ => { /* その他 */ }
/// }
/// ```
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// HTTP 通信エラー
    ///
    /// 接続失敗、タイムアウト、レスポンスボディの読み取り失敗など。
    #[error("HTTP 通信エラー: {0}")]
    Http(#[source] reqwest::Error),

    /// シリアライズ/デシリアライズエラー
    #[error("シリアライズエラー: {0}")]
    Serialization(#[source] serde_json::Error),

    /// 想定外の HTTP ステータス
    #[error("想定外のステータス {status}: {body}")]
    UnexpectedStatus {
        /// HTTP ステータスコード
        status: u16,
        /// レスポンスボディ（診断用）
        body:   String,
    },

    /// レスポンスの内容が契約に合わない
    #[error("不正なレスポンス: {0}")]
    InvalidResponse(String),

    /// 呼び出し側の入力がこの実装で扱えない
    #[error("入力エラー: {0}")]
    InvalidInput(String),

    /// 予期しないエラー
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

// ===== InfraError のメソッド =====

impl InfraError {
    /// エラー種別を取得する
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    /// SpanTrace を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    fn with_kind(kind: InfraErrorKind) -> Self {
        Self {
            kind,
            span_trace: SpanTrace::capture(),
        }
    }

    // ===== Convenience constructors =====

    /// 想定外ステータスのエラーを生成する
    pub fn unexpected_status(status: u16, body: impl Into<String>) -> Self {
        Self::with_kind(InfraErrorKind::UnexpectedStatus {
            status,
            body: body.into(),
        })
    }

    /// 不正レスポンスのエラーを生成する
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::with_kind(InfraErrorKind::InvalidResponse(msg.into()))
    }

    /// 入力エラーを生成する
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::with_kind(InfraErrorKind::InvalidInput(msg.into()))
    }

    /// 予期しないエラーを生成する
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::with_kind(InfraErrorKind::Unexpected(msg.into()))
    }
}

// ===== トレイト実装 =====

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

// ===== From 実装（SpanTrace 自動キャプチャ） =====

impl From<reqwest::Error> for InfraError {
    fn from(source: reqwest::Error) -> Self {
        Self::with_kind(InfraErrorKind::Http(source))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(source: serde_json::Error) -> Self {
        Self::with_kind(InfraErrorKind::Serialization(source))
    }
}
