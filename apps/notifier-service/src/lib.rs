//! # Notifier Service ライブラリ
//!
//! コメント通知ビヘイビアとイベント受付ハンドラを公開する。
//! テスト用に内部モジュールへのアクセスを提供する。

pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;

// テストユーティリティ（内部実装、ドキュメントからは隠す）
#[cfg(any(test, feature = "test-utils"))]
#[doc(hidden)]
pub mod test_utils;
