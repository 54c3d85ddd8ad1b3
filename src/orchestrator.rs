//! Starts one worker per account and supervises them.
//!
//! Workers share nothing. A panic inside one worker is caught, logged and
//! reported as [`WorkerEvent::Crashed`]; its siblings keep running and the
//! crashed worker is not restarted.

use crate::config::BotConfig;
use crate::credentials::Account;
use crate::gateway::KlokGateway;
use crate::worker::{AccountWorker, WorkerSettings};
use futures_util::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinSet;

/// Lifecycle event for a supervised worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    Started { label: String },
    /// The worker future returned. Account workers never do this on their own.
    Stopped { label: String },
    Crashed { label: String, reason: String },
}

/// Log label for the account at zero-based `index`.
pub fn account_label(index: usize) -> String {
    format!("Account-{}", index + 1)
}

struct UnitExit {
    label: String,
    panic: Option<String>,
}

/// Set of independently running worker tasks.
pub struct Supervisor {
    units: JoinSet<UnitExit>,
    event_tx: Option<UnboundedSender<WorkerEvent>>,
}

impl Supervisor {
    /// Create an empty supervisor. Events are sent to `event_tx` if given.
    pub fn new(event_tx: Option<UnboundedSender<WorkerEvent>>) -> Self {
        Self {
            units: JoinSet::new(),
            event_tx,
        }
    }

    /// Spawn `unit` under `label`.
    pub fn spawn<F>(&mut self, label: impl Into<String>, unit: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let label = label.into();
        self.emit(WorkerEvent::Started {
            label: label.clone(),
        });
        tracing::info!(account = %label, "worker started");

        self.units.spawn(async move {
            let panic = AssertUnwindSafe(unit)
                .catch_unwind()
                .await
                .err()
                .map(panic_message);
            UnitExit { label, panic }
        });
    }

    /// Number of units still running.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Wait until every unit has exited, reporting each exit.
    pub async fn run(&mut self) {
        while let Some(joined) = self.units.join_next().await {
            match joined {
                Ok(UnitExit { label, panic: None }) => {
                    tracing::warn!(account = %label, "worker stopped");
                    self.emit(WorkerEvent::Stopped { label });
                }
                Ok(UnitExit {
                    label,
                    panic: Some(reason),
                }) => {
                    tracing::error!(account = %label, "worker crashed: {reason}");
                    self.emit(WorkerEvent::Crashed { label, reason });
                }
                Err(err) if err.is_cancelled() => {}
                Err(err) => tracing::error!("worker task failed: {err}"),
            }
        }
    }

    /// Cancel every unit and wait for them to finish.
    pub async fn shutdown(&mut self) {
        self.units.abort_all();
        while self.units.join_next().await.is_some() {}
    }

    fn emit(&self, event: WorkerEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(event);
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    }
}

/// Build a gateway per account and start its worker.
///
/// Gateways are all built before any worker starts, so a bad account leaves
/// nothing running.
///
/// # Errors
///
/// Returns the first client construction error.
pub fn start_workers(
    config: &BotConfig,
    accounts: &[Account],
    event_tx: Option<UnboundedSender<WorkerEvent>>,
) -> crate::error::Result<Supervisor> {
    let settings = WorkerSettings::from_config(&config.worker);

    let workers = accounts
        .iter()
        .enumerate()
        .map(|(index, account)| -> crate::error::Result<AccountWorker<KlokGateway>> {
            let label = account_label(index);
            let gateway = KlokGateway::new(label.clone(), account, config.api.clone())?;
            Ok(AccountWorker::new(label, gateway, settings.clone()))
        })
        .collect::<crate::error::Result<Vec<_>>>()?;

    tracing::info!("starting {} account workers", workers.len());

    let mut supervisor = Supervisor::new(event_tx);
    for worker in workers {
        let label = worker.label().to_owned();
        supervisor.spawn(label, worker.run());
    }
    Ok(supervisor)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::time::Duration;
    use tokio::sync::{mpsc, oneshot};

    async fn explode() {
        panic!("worker blew up")
    }

    #[test]
    fn labels_are_one_based() {
        assert_eq!(account_label(0), "Account-1");
        assert_eq!(account_label(9), "Account-10");
    }

    #[test]
    fn panic_message_reads_str_and_string_payloads() {
        assert_eq!(panic_message(Box::new("boom")), "boom");
        assert_eq!(panic_message(Box::new(String::from("bang"))), "bang");
        assert_eq!(panic_message(Box::new(42_u8)), "unknown panic");
    }

    #[tokio::test]
    async fn crashed_unit_does_not_stop_siblings() {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (release_tx, release_rx) = oneshot::channel::<()>();
        let mut supervisor = Supervisor::new(Some(event_tx));

        supervisor.spawn("Account-1", explode());
        supervisor.spawn("Account-2", async move {
            let _ = release_rx.await;
        });

        let run = tokio::spawn(async move {
            supervisor.run().await;
            supervisor
        });

        let mut seen = Vec::new();
        while seen.len() < 3 {
            seen.push(event_rx.recv().await.expect("event"));
        }
        assert!(seen.contains(&WorkerEvent::Started {
            label: "Account-1".to_owned()
        }));
        assert!(seen.contains(&WorkerEvent::Crashed {
            label: "Account-1".to_owned(),
            reason: "worker blew up".to_owned(),
        }));

        // The sibling is still parked on its channel.
        assert!(!release_tx.is_closed());
        release_tx.send(()).unwrap();

        let event = tokio::time::timeout(Duration::from_secs(5), event_rx.recv())
            .await
            .expect("stop event")
            .expect("channel open");
        assert_eq!(
            event,
            WorkerEvent::Stopped {
                label: "Account-2".to_owned()
            }
        );

        let supervisor = run.await.unwrap();
        assert!(supervisor.is_empty());
    }

    #[tokio::test]
    async fn shutdown_cancels_without_events() {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let mut supervisor = Supervisor::new(Some(event_tx));
        supervisor.spawn("Account-1", std::future::pending::<()>());
        assert_eq!(supervisor.len(), 1);

        supervisor.shutdown().await;

        assert!(supervisor.is_empty());
        assert!(matches!(
            event_rx.try_recv(),
            Ok(WorkerEvent::Started { .. })
        ));
        assert!(event_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn start_workers_labels_each_account() {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let config = BotConfig {
            api: klok_api::ApiConfig {
                base_url: "http://127.0.0.1:9/v1".to_owned(),
                ..Default::default()
            },
            ..Default::default()
        };
        let accounts = vec![Account::from_token("a"), Account::from_token("b")];

        let mut supervisor = start_workers(&config, &accounts, Some(event_tx)).unwrap();
        assert_eq!(supervisor.len(), 2);

        let first = event_rx.recv().await.unwrap();
        let second = event_rx.recv().await.unwrap();
        assert_eq!(
            first,
            WorkerEvent::Started {
                label: "Account-1".to_owned()
            }
        );
        assert_eq!(
            second,
            WorkerEvent::Started {
                label: "Account-2".to_owned()
            }
        );

        supervisor.shutdown().await;
    }

    #[test]
    fn bad_api_config_starts_nothing() {
        let config = BotConfig {
            api: klok_api::ApiConfig {
                base_url: "not a url".to_owned(),
                ..Default::default()
            },
            ..Default::default()
        };
        let result = start_workers(&config, &[Account::from_token("a")], None);
        assert!(matches!(result, Err(crate::error::BotError::Api(_))));
    }
}
