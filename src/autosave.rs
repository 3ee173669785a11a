//! 一定間隔の自動保存
//!
//! セッションを共有し、tokio のタスクで下書きを保存する。
//! ハンドルを止める（または破棄する）とタスクも止まる。

use product_wizard_common::{DraftSlot, FormSession, Notifier, SaveStatus};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub type SharedSession<S, N> = Arc<Mutex<FormSession<S, N>>>;

pub struct AutosaveHandle {
    task: JoinHandle<()>,
    status: watch::Receiver<SaveStatus>,
}

impl AutosaveHandle {
    /// 直近の保存状態
    pub fn status(&self) -> SaveStatus {
        self.status.borrow().clone()
    }

    /// 状態の変化を待つ
    pub async fn changed(&mut self) -> Option<SaveStatus> {
        self.status.changed().await.ok()?;
        Some(self.status.borrow().clone())
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for AutosaveHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// 自動保存を開始（最初の保存は1間隔後）
pub fn spawn<S, N>(session: SharedSession<S, N>, period: Duration) -> AutosaveHandle
where
    S: DraftSlot + Send + 'static,
    N: Notifier + Send + 'static,
{
    let (tx, rx) = watch::channel(SaveStatus::Idle);
    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // 処理が遅れた分は取り戻さない
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval.tick().await;

        loop {
            interval.tick().await;
            let status = {
                let Ok(mut session) = session.lock() else {
                    break;
                };
                if session.is_ended() {
                    break;
                }
                tx.send_replace(SaveStatus::Saving);
                session.autosave()
            };
            if let SaveStatus::Failed(message) = &status {
                eprintln!("⚠ 自動保存に失敗: {}", message);
            }
            tx.send_replace(status);
        }
    });

    AutosaveHandle { task, status: rx }
}
