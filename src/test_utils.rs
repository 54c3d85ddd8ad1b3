//! Shared test utilities used across multiple test modules.
//!
//! [`ScriptedGateway`] stands in for the remote service in worker and
//! orchestrator tests. Responses are queued up front; once a queue runs dry
//! the configured default is returned. Every call is recorded in order.

#![allow(clippy::expect_used)]

use crate::gateway::Gateway;
use async_trait::async_trait;
use klok_api::{PointBalance, Thread};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A recorded gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Balance,
    ListThreads,
    CreateThread(String),
    Send { thread_id: String, text: String },
}

#[derive(Default)]
struct Script {
    threads: Vec<Thread>,
    balances: VecDeque<Option<PointBalance>>,
    default_balance: Option<PointBalance>,
    created: VecDeque<Option<String>>,
    sends: VecDeque<bool>,
    default_send: bool,
    send_delay: Duration,
    sends_in_flight: usize,
    max_sends_in_flight: usize,
    calls: Vec<GatewayCall>,
}

/// In-memory [`Gateway`] with queued responses. Clones share the script.
#[derive(Clone, Default)]
pub struct ScriptedGateway {
    inner: Arc<Mutex<Script>>,
}

/// Balance whose three fields all equal `total`.
pub fn balance(total: i64) -> PointBalance {
    PointBalance {
        points: total,
        referral_points: 0,
        total_points: total,
    }
}

/// Thread with the given id and nothing else.
pub fn thread(id: &str) -> Thread {
    Thread {
        id: id.to_owned(),
        title: None,
        messages: Vec::new(),
    }
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> std::sync::MutexGuard<'_, Script> {
        self.inner.lock().expect("script lock poisoned")
    }

    /// Threads returned by every `list_threads` call.
    pub fn with_threads(self, ids: &[&str]) -> Self {
        self.script().threads = ids.iter().map(|id| thread(id)).collect();
        self
    }

    pub fn with_balances(self, balances: &[Option<PointBalance>]) -> Self {
        self.script().balances.extend(balances.iter().copied());
        self
    }

    pub fn with_default_balance(self, balance: Option<PointBalance>) -> Self {
        self.script().default_balance = balance;
        self
    }

    /// Queued `create_thread` results; `None` entries fail. Creation fails
    /// once the queue is empty.
    pub fn with_created(self, ids: &[Option<&str>]) -> Self {
        self.script()
            .created
            .extend(ids.iter().map(|id| id.map(str::to_owned)));
        self
    }

    pub fn with_sends(self, results: &[bool]) -> Self {
        self.script().sends.extend(results.iter().copied());
        self
    }

    pub fn with_default_send(self, accepted: bool) -> Self {
        self.script().default_send = accepted;
        self
    }

    /// Make every send take `delay` (on the tokio clock) before it returns.
    pub fn with_send_delay(self, delay: Duration) -> Self {
        self.script().send_delay = delay;
        self
    }

    /// Highest number of sends that were running at the same time.
    pub fn max_sends_in_flight(&self) -> usize {
        self.script().max_sends_in_flight
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.script().calls.clone()
    }

    pub fn create_calls(&self) -> usize {
        self.count(|c| matches!(c, GatewayCall::CreateThread(_)))
    }

    pub fn send_calls(&self) -> usize {
        self.count(|c| matches!(c, GatewayCall::Send { .. }))
    }

    fn count(&self, pred: impl Fn(&GatewayCall) -> bool) -> usize {
        self.script().calls.iter().filter(|c| pred(c)).count()
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn get_balance(&self) -> Option<PointBalance> {
        let mut script = self.script();
        script.calls.push(GatewayCall::Balance);
        match script.balances.pop_front() {
            Some(next) => next,
            None => script.default_balance,
        }
    }

    async fn list_threads(&self) -> Vec<Thread> {
        let mut script = self.script();
        script.calls.push(GatewayCall::ListThreads);
        script.threads.clone()
    }

    async fn create_thread(&self, seed_message: &str) -> Option<Thread> {
        let mut script = self.script();
        script
            .calls
            .push(GatewayCall::CreateThread(seed_message.to_owned()));
        script.created.pop_front().flatten().map(|id| thread(&id))
    }

    async fn send_message(&self, thread_id: &str, text: &str) -> bool {
        let (accepted, delay) = {
            let mut script = self.script();
            script.calls.push(GatewayCall::Send {
                thread_id: thread_id.to_owned(),
                text: text.to_owned(),
            });
            script.sends_in_flight += 1;
            script.max_sends_in_flight = script.max_sends_in_flight.max(script.sends_in_flight);
            let default = script.default_send;
            (script.sends.pop_front().unwrap_or(default), script.send_delay)
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.script().sends_in_flight -= 1;
        accepted
    }
}
