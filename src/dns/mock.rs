//! Scripted resolver for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::resolver::TxtResolver;
use crate::error_handling::ProbeFailure;

#[derive(Debug, Clone)]
enum Answer {
    Text(String),
    Fail(ProbeFailure),
    Hang,
}

#[derive(Debug, Default)]
struct State {
    answers: Mutex<HashMap<String, Answer>>,
    delays: Mutex<HashMap<String, Duration>>,
    default_delay: Mutex<Duration>,
    queried: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Resolver answering from a script instead of the network.
///
/// Names without a scripted answer resolve to `ProbeFailure::NxDomain`.
/// Clones share the same script and counters.
#[derive(Debug, Clone, Default)]
pub struct MockResolver {
    state: Arc<State>,
}

struct InFlight<'a>(&'a State);

impl<'a> InFlight<'a> {
    fn enter(state: &'a State) -> Self {
        let now = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        state.max_in_flight.fetch_max(now, Ordering::SeqCst);
        InFlight(state)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockResolver {
    /// An empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `name` with raw TXT answer text.
    pub fn add_txt(&self, name: &str, text: &str) -> &Self {
        self.set_answer(name, Answer::Text(text.to_string()))
    }

    /// Fails lookups of `name` with `failure`.
    pub fn add_failure(&self, name: &str, failure: ProbeFailure) -> &Self {
        self.set_answer(name, Answer::Fail(failure))
    }

    /// Never answers `name`.
    pub fn add_hang(&self, name: &str) -> &Self {
        self.set_answer(name, Answer::Hang)
    }

    /// Delays the answer for `name`.
    pub fn set_delay(&self, name: &str, delay: Duration) -> &Self {
        if let Ok(mut delays) = self.state.delays.lock() {
            delays.insert(name.to_string(), delay);
        }
        self
    }

    /// Delays every answer without a specific delay.
    pub fn set_default_delay(&self, delay: Duration) -> &Self {
        if let Ok(mut default_delay) = self.state.default_delay.lock() {
            *default_delay = delay;
        }
        self
    }

    /// Names queried so far, in call order.
    pub fn queried(&self) -> Vec<String> {
        self.state
            .queried
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }

    /// Highest number of lookups that were in flight at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.state.max_in_flight.load(Ordering::SeqCst)
    }

    fn set_answer(&self, name: &str, answer: Answer) -> &Self {
        if let Ok(mut answers) = self.state.answers.lock() {
            answers.insert(name.to_string(), answer);
        }
        self
    }
}

impl TxtResolver for MockResolver {
    async fn query_txt(&self, name: &str) -> Result<String, ProbeFailure> {
        if let Ok(mut queried) = self.state.queried.lock() {
            queried.push(name.to_string());
        }
        let answer = self
            .state
            .answers
            .lock()
            .ok()
            .and_then(|answers| answers.get(name).cloned());
        let delay = self
            .state
            .delays
            .lock()
            .ok()
            .and_then(|delays| delays.get(name).copied())
            .or_else(|| self.state.default_delay.lock().ok().map(|d| *d))
            .unwrap_or_default();

        let _in_flight = InFlight::enter(&self.state);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match answer {
            Some(Answer::Text(text)) => Ok(text),
            Some(Answer::Fail(failure)) => Err(failure),
            Some(Answer::Hang) => {
                std::future::pending::<()>().await;
                Err(ProbeFailure::Transport("unreachable".to_string()))
            }
            None => Err(ProbeFailure::NxDomain),
        }
    }
}
