//! イベント受付 API からメール送信までの統合テスト
//!
//! CommentScenario のインメモリプラットフォームに対して、
//! HTTP で受け取ったイベントがコミット後に通知メールになることを確認する。

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use comment_notifier_domain::node::NodeRef;
use comment_notifier_service::{
    handler::{EventState, router},
    test_utils::{CommentScenario, SHARE_URL},
    usecase::PolicyComponent,
};
use pretty_assertions::assert_eq;
use tower::ServiceExt;

fn create_app(scenario: &CommentScenario) -> Router {
    let policy = Arc::new(PolicyComponent::new());
    Arc::new(scenario.behaviour()).init(&policy);
    router(EventState { policy })
}

fn content_update(events: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/internal/events/content-update")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({ "events": events }).to_string(),
        ))
        .unwrap()
}

fn post_created(node: &NodeRef) -> serde_json::Value {
    serde_json::json!({
        "nodeRef": node.to_string(),
        "nodeType": "fm:post",
        "newContent": true,
    })
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_新しいコメントでサイトマネージャー全員に通知メールが届く() {
    // Arrange
    let scenario = CommentScenario::new();
    scenario.add_manager("bsato", "ben@example.com");
    scenario.add_manager("csuzuki", "chika@example.com");
    let sut = create_app(&scenario);

    // Act
    let response = sut
        .oneshot(content_update(serde_json::json!([post_created(
            &scenario.comment
        )])))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(
        response_json(response).await,
        serde_json::json!({"data": {"received": 1, "invoked": 1, "failed": 0}})
    );

    let sent = scenario.sender.sent_emails();
    assert_eq!(sent.len(), 2);
    let document_url = format!(
        "{SHARE_URL}/page/site/marketing/document-details?nodeRef={}",
        scenario.document
    );
    for email in &sent {
        assert_eq!(email.subject, "New comment for document budget.xlsx");
        assert!(email.body.is_html());
        assert!(email.body.as_str().contains("Please review the numbers"));
        assert!(email.body.as_str().contains(&document_url));
    }
}

#[tokio::test]
async fn test_既存コメントの編集では通知しない() {
    let scenario = CommentScenario::new();
    scenario.add_manager("bsato", "ben@example.com");
    let sut = create_app(&scenario);

    let response = sut
        .oneshot(content_update(serde_json::json!([{
            "nodeRef": scenario.comment.to_string(),
            "nodeType": "fm:post",
            "newContent": false,
        }])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert!(scenario.sender.attempts().is_empty());
}

#[tokio::test]
async fn test_テンプレートがなければ失敗件数に数えて1通も送らない() {
    let scenario = CommentScenario::new();
    scenario.add_manager("bsato", "ben@example.com");
    scenario.platform.remove_node(&scenario.template);
    let sut = create_app(&scenario);

    let response = sut
        .oneshot(content_update(serde_json::json!([post_created(
            &scenario.comment
        )])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = response_json(response).await;
    assert_eq!(json["data"]["failed"], 1);
    assert!(scenario.sender.attempts().is_empty());
}

#[tokio::test]
async fn test_1トランザクション内の失敗は他のコメントの通知を止めない() {
    let scenario = CommentScenario::new();
    scenario.add_manager("bsato", "ben@example.com");
    let orphan = scenario.add_comment("post-2", "ghost", "who am I");
    let sut = create_app(&scenario);

    let response = sut
        .oneshot(content_update(serde_json::json!([
            post_created(&orphan),
            post_created(&scenario.comment),
        ])))
        .await
        .unwrap();

    let json = response_json(response).await;
    assert_eq!(
        json,
        serde_json::json!({"data": {"received": 2, "invoked": 2, "failed": 1}})
    );
    assert_eq!(scenario.sender.sent_emails().len(), 1);
}

#[tokio::test]
async fn test_同じイベントを2回受け取ると2回通知する() {
    let scenario = CommentScenario::new();
    scenario.add_manager("bsato", "ben@example.com");
    let sut = create_app(&scenario);

    for _ in 0..2 {
        let response = sut
            .clone()
            .oneshot(content_update(serde_json::json!([post_created(
                &scenario.comment
            )])))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    assert_eq!(scenario.sender.sent_emails().len(), 2);
}
