//! # Notifier Service サーバー
//!
//! リポジトリのフォーラム投稿（コメント）作成を受けて、サイトマネージャーへ
//! 通知メールを送る内部サービス。
//!
//! ## 役割
//!
//! - **イベント受付**: コミット済みトランザクションのコンテンツ更新イベントを HTTP で受け取る
//! - **コメント通知**: `fm:post` の新規作成をサイトマネージャー全員にメールで知らせる
//!
//! ```text
//! ┌──────────────┐  events   ┌──────────────────┐  REST   ┌──────────────┐
//! │  Repository  │──────────▶│ Notifier Service │────────▶│  Repository  │
//! └──────────────┘           └──────────────────┘         └──────────────┘
//!                                     │ SMTP / SES
//!                                     ▼
//!                             サイトマネージャー
//! ```
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `NOTIFIER_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `NOTIFIER_PORT` | **Yes** | ポート番号 |
//! | `SHARE_URL` | No | メール内リンクのベース URL |
//! | `REPOSITORY_URL` | No | リポジトリ REST API のベース URL |
//! | `REPOSITORY_USER` / `REPOSITORY_PASSWORD` | No | REST API の Basic 認証 |
//! | `NOTIFICATION_TEMPLATE_PATH` | No | 通知テンプレートのリポジトリ上のパス |
//! | `NOTIFICATION_BACKEND` | No | `smtp` / `ses` / `noop`（デフォルト: `noop`） |
//! | `SMTP_HOST` / `SMTP_PORT` | No | SMTP 送信先 |
//! | `NOTIFICATION_FROM_ADDRESS` | No | 送信元アドレス |
//!
//! ## 起動方法
//!
//! ```bash
//! NOTIFIER_PORT=13010 cargo run -p comment-notifier-service
//! ```

use std::{net::SocketAddr, sync::Arc};

use comment_notifier_infra::{
    NotificationSender,
    PlatformServices,
    notification::{NoopNotificationSender, SesNotificationSender, SmtpNotificationSender},
    platform::alfresco::AlfrescoRestClient,
};
use comment_notifier_service::{
    config::{NotificationBackend, NotificationConfig, NotifierConfig},
    handler::{EventState, router},
    usecase::{CommentNotifierBehaviour, PolicyComponent},
};
use comment_notifier_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Notifier Service サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    let tracing_config = TracingConfig::from_env("notifier-service");
    let _tracing_guard = init_tracing(&tracing_config).entered();

    // 設定読み込み
    let config = NotifierConfig::from_env().expect("設定の読み込みに失敗しました");

    tracing::info!(
        "Notifier Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // 依存コンポーネントを初期化
    let repository = AlfrescoRestClient::new(
        &config.repository.url,
        config.repository.user.clone(),
        config.repository.password.clone(),
    );
    let services = PlatformServices::from_shared(Arc::new(repository));
    let sender = build_sender(&config.notification).await;
    tracing::info!(
        backend = %config.notification.backend,
        template_path = %config.template_path,
        "通知の送信設定を読み込みました"
    );

    // ビヘイビア登録
    let policy = Arc::new(PolicyComponent::new());
    Arc::new(CommentNotifierBehaviour::new(
        services,
        sender,
        config.share_url.clone(),
        config.template_path.clone(),
    ))
    .init(&policy);

    // ルーター構築
    let app = router(EventState { policy }).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("アドレスのパースに失敗しました");

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Notifier Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// `NOTIFICATION_BACKEND` に応じたメール送信を組み立てる
async fn build_sender(config: &NotificationConfig) -> Arc<dyn NotificationSender> {
    match config.backend {
        NotificationBackend::Smtp => Arc::new(SmtpNotificationSender::new(
            &config.smtp_host,
            config.smtp_port,
            config.from_address.clone(),
        )),
        NotificationBackend::Ses => {
            let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .load()
                .await;
            Arc::new(SesNotificationSender::new(
                aws_sdk_sesv2::Client::new(&aws_config),
                config.from_address.clone(),
            ))
        }
        NotificationBackend::Noop => Arc::new(NoopNotificationSender),
    }
}
