//! # ポリシーコンポーネント
//!
//! ビヘイビアを (ポリシー, 対象型, 通知タイミング) で登録し、
//! コンテンツ更新イベントを登録済みビヘイビアへ配送する。
//!
//! ## 設計方針
//!
//! - **明示的な初期化**: ビヘイビアは起動時の初期化ステップで
//!   [`PolicyComponent::bind_class_behaviour`] を呼んで登録する
//! - **トランザクション境界**: [`PolicyComponent::begin`] で開いた [`TransactionScope`] が
//!   コミット後配送のキューを持つ。`commit()` せずに破棄するとキューは捨てられる
//! - **完全一致**: 対象型は QName の完全一致で照合する（サブタイプは辿らない）
//!
//! ## 配送タイミング
//!
//! | タイミング | 呼び出し |
//! |-----------|---------|
//! | `EveryEvent` | `on_content_update` の中で即座に |
//! | `TransactionCommit` | `commit()` で登録順に |

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use comment_notifier_domain::{
    node::NodeRef,
    policy::{ContentUpdateEvent, NotificationFrequency, PolicyName, TransactionId},
    qname::QName,
};
use serde::Serialize;

use crate::error::BehaviourError;

/// コンテンツ更新ビヘイビア
#[async_trait]
pub trait ContentUpdateBehaviour: Send + Sync {
    /// ログに出すビヘイビア名
    fn name(&self) -> &'static str;

    async fn on_content_update(&self, event: &ContentUpdateEvent) -> Result<(), BehaviourError>;
}

struct Binding {
    policy:    PolicyName,
    class:     QName,
    frequency: NotificationFrequency,
    behaviour: Arc<dyn ContentUpdateBehaviour>,
}

/// コミット結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CommitReport {
    /// 呼び出したビヘイビアの数（即時配送分を含む）
    pub invoked: usize,
    /// エラーを返したビヘイビアの数
    pub failed:  usize,
}

/// ポリシーコンポーネント
#[derive(Default)]
pub struct PolicyComponent {
    bindings: RwLock<Vec<Binding>>,
}

impl PolicyComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// 対象型にビヘイビアを登録する
    pub fn bind_class_behaviour(
        &self,
        policy: PolicyName,
        class: QName,
        behaviour: Arc<dyn ContentUpdateBehaviour>,
        frequency: NotificationFrequency,
    ) {
        tracing::info!(
            %policy,
            %class,
            %frequency,
            behaviour = behaviour.name(),
            "ビヘイビアを登録しました"
        );

        self.bindings
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Binding {
                policy,
                class,
                frequency,
                behaviour,
            });
    }

    /// トランザクションを開始する
    pub fn begin(&self) -> TransactionScope<'_> {
        TransactionScope {
            component: self,
            id:        TransactionId::new(),
            queue:     Vec::new(),
            report:    CommitReport::default(),
        }
    }

    fn matching(
        &self,
        policy: PolicyName,
        class: &QName,
    ) -> Vec<(NotificationFrequency, Arc<dyn ContentUpdateBehaviour>)> {
        self.bindings
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .filter(|b| b.policy == policy && b.class == *class)
            .map(|b| (b.frequency, b.behaviour.clone()))
            .collect()
    }
}

/// 1 トランザクション分のイベント配送
pub struct TransactionScope<'a> {
    component: &'a PolicyComponent,
    id:        TransactionId,
    queue:     Vec<(Arc<dyn ContentUpdateBehaviour>, ContentUpdateEvent)>,
    report:    CommitReport,
}

impl TransactionScope<'_> {
    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    /// コンテンツ更新イベントを受け付ける
    ///
    /// `EveryEvent` のビヘイビアはこの場で呼び出し、`TransactionCommit` の
    /// ビヘイビアはコミットまで保留する。
    pub async fn on_content_update(&mut self, node_type: QName, node_ref: NodeRef, new_content: bool) {
        let event = ContentUpdateEvent {
            node_ref,
            node_type,
            new_content,
        };

        for (frequency, behaviour) in self
            .component
            .matching(PolicyName::OnContentUpdate, &event.node_type)
        {
            match frequency {
                NotificationFrequency::EveryEvent => self.invoke(behaviour.as_ref(), &event).await,
                NotificationFrequency::TransactionCommit => {
                    self.queue.push((behaviour, event.clone()));
                }
            }
        }
    }

    /// 保留中のビヘイビアを登録順に呼び出す
    ///
    /// 1 件の失敗で残りを止めない。
    pub async fn commit(mut self) -> CommitReport {
        let queue = std::mem::take(&mut self.queue);
        tracing::debug!(
            transaction_id = %self.id,
            queued = queue.len(),
            "トランザクションをコミットします"
        );

        for (behaviour, event) in queue {
            self.invoke(behaviour.as_ref(), &event).await;
        }

        self.report
    }

    async fn invoke(&mut self, behaviour: &dyn ContentUpdateBehaviour, event: &ContentUpdateEvent) {
        self.report.invoked += 1;

        if let Err(e) = behaviour.on_content_update(event).await {
            self.report.failed += 1;
            tracing::warn!(
                transaction_id = %self.id,
                behaviour = behaviour.name(),
                node_ref = %event.node_ref,
                error = %e,
                "ビヘイビアが失敗しました"
            );
        }
    }
}

impl Drop for TransactionScope<'_> {
    fn drop(&mut self) {
        if !self.queue.is_empty() {
            tracing::debug!(
                transaction_id = %self.id,
                discarded = self.queue.len(),
                "コミットされなかったイベントを破棄しました"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use comment_notifier_domain::qname::{forum_model, site_model};
    use pretty_assertions::assert_eq;

    use super::*;

    /// 呼び出しを記録するビヘイビア
    #[derive(Default)]
    struct Recorder {
        calls:      Mutex<Vec<String>>,
        fail_nodes: Vec<String>,
    }

    impl Recorder {
        fn failing_on(node_id: &str) -> Self {
            Self {
                fail_nodes: vec![node_id.to_string()],
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ContentUpdateBehaviour for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        async fn on_content_update(&self, event: &ContentUpdateEvent) -> Result<(), BehaviourError> {
            self.calls
                .lock()
                .unwrap()
                .push(event.node_ref.id().to_string());
            if self.fail_nodes.iter().any(|n| n == event.node_ref.id()) {
                return Err(BehaviourError::inconsistent(&event.node_ref, "テスト用の失敗"));
            }
            Ok(())
        }
    }

    fn post(id: &str) -> NodeRef {
        NodeRef::in_spaces_store(id)
    }

    #[tokio::test]
    async fn test_コミット時に登録順で呼び出される() {
        let policy = PolicyComponent::new();
        let recorder = Arc::new(Recorder::default());
        policy.bind_class_behaviour(
            PolicyName::OnContentUpdate,
            forum_model::TYPE_POST,
            recorder.clone(),
            NotificationFrequency::TransactionCommit,
        );

        let mut scope = policy.begin();
        scope
            .on_content_update(forum_model::TYPE_POST, post("a"), true)
            .await;
        scope
            .on_content_update(forum_model::TYPE_POST, post("b"), false)
            .await;
        assert!(recorder.calls().is_empty(), "コミット前は呼ばれないこと");

        let report = scope.commit().await;

        assert_eq!(recorder.calls(), vec!["a", "b"]);
        assert_eq!(
            report,
            CommitReport {
                invoked: 2,
                failed:  0,
            }
        );
    }

    #[tokio::test]
    async fn test_コミットせずに破棄するとビヘイビアは呼ばれない() {
        let policy = PolicyComponent::new();
        let recorder = Arc::new(Recorder::default());
        policy.bind_class_behaviour(
            PolicyName::OnContentUpdate,
            forum_model::TYPE_POST,
            recorder.clone(),
            NotificationFrequency::TransactionCommit,
        );

        {
            let mut scope = policy.begin();
            scope
                .on_content_update(forum_model::TYPE_POST, post("a"), true)
                .await;
        }

        assert!(recorder.calls().is_empty());
    }

    #[tokio::test]
    async fn test_every_eventは即座に呼び出される() {
        let policy = PolicyComponent::new();
        let recorder = Arc::new(Recorder::default());
        policy.bind_class_behaviour(
            PolicyName::OnContentUpdate,
            forum_model::TYPE_POST,
            recorder.clone(),
            NotificationFrequency::EveryEvent,
        );

        let mut scope = policy.begin();
        scope
            .on_content_update(forum_model::TYPE_POST, post("a"), true)
            .await;

        assert_eq!(recorder.calls(), vec!["a"]);
        assert_eq!(scope.commit().await.invoked, 1);
    }

    #[tokio::test]
    async fn test_対象型が一致しないイベントは配送されない() {
        let policy = PolicyComponent::new();
        let recorder = Arc::new(Recorder::default());
        policy.bind_class_behaviour(
            PolicyName::OnContentUpdate,
            forum_model::TYPE_POST,
            recorder.clone(),
            NotificationFrequency::TransactionCommit,
        );

        let mut scope = policy.begin();
        scope
            .on_content_update(QName::new("cm", "content"), post("doc"), true)
            .await;
        scope
            .on_content_update(site_model::TYPE_SITE, post("site"), true)
            .await;
        let report = scope.commit().await;

        assert!(recorder.calls().is_empty());
        assert_eq!(report, CommitReport::default());
    }

    #[tokio::test]
    async fn test_失敗しても残りのビヘイビアは呼び出される() {
        let policy = PolicyComponent::new();
        let recorder = Arc::new(Recorder::failing_on("a"));
        policy.bind_class_behaviour(
            PolicyName::OnContentUpdate,
            forum_model::TYPE_POST,
            recorder.clone(),
            NotificationFrequency::TransactionCommit,
        );

        let mut scope = policy.begin();
        scope
            .on_content_update(forum_model::TYPE_POST, post("a"), true)
            .await;
        scope
            .on_content_update(forum_model::TYPE_POST, post("b"), true)
            .await;
        let report = scope.commit().await;

        assert_eq!(recorder.calls(), vec!["a", "b"]);
        assert_eq!(
            report,
            CommitReport {
                invoked: 2,
                failed:  1,
            }
        );
    }

    #[test]
    fn test_トランザクションごとに異なるidが振られる() {
        let policy = PolicyComponent::new();

        let first = policy.begin();
        let second = policy.begin();

        assert_ne!(first.id(), second.id());
    }
}
