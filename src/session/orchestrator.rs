use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::config::SessionConfig;
use super::session::StreamSession;
use super::stats::SessionReport;
use crate::error::{ClientError, Result};
use crate::rpc::Connector;

/// How one session of a run terminated.
#[derive(Debug)]
pub struct SessionOutcome {
    pub session_id: usize,
    pub result: Result<SessionReport>,
}

/// Outcomes of every session of a run, ordered by session id.
#[derive(Debug)]
pub struct RunSummary {
    pub outcomes: Vec<SessionOutcome>,
}

impl RunSummary {
    pub fn num_sessions(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failures(&self) -> impl Iterator<Item = (usize, &ClientError)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().err().map(|e| (outcome.session_id, e)))
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Launches `num_clients` independent sessions and waits for all of them.
///
/// Sessions share nothing but a read-only copy of the configuration; a failed
/// session never cancels its siblings.
pub struct SessionOrchestrator<C: Connector> {
    config: SessionConfig,
    num_clients: usize,
    connector: Arc<C>,
}

impl<C: Connector> SessionOrchestrator<C> {
    pub fn new(config: SessionConfig, num_clients: usize, connector: C) -> Self {
        Self {
            config,
            num_clients,
            connector: Arc::new(connector),
        }
    }

    pub async fn run(&self) -> RunSummary {
        info!("Launching {} sessions", self.num_clients);

        let handles: Vec<(usize, JoinHandle<Result<SessionReport>>)> = (0..self.num_clients)
            .map(|id| {
                let session = StreamSession::new(id, self.config.clone());
                let connector = Arc::clone(&self.connector);
                let handle = tokio::spawn(async move { session.run(connector.as_ref()).await });
                (id, handle)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (session_id, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(ClientError::Aborted(e.to_string())),
            };

            if let Err(e) = &result {
                error!("Session {} failed ({}): {}", session_id, e.kind(), e);
            }
            outcomes.push(SessionOutcome { session_id, result });
        }

        info!("All {} sessions finished", outcomes.len());

        RunSummary { outcomes }
    }
}
