use crate::command::extract_metadata;
use crate::config::{AppConfig, ExecutorKind};
use crate::error::ExecError;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use ureq::Agent;

/// Runs a dispatch command somewhere and returns its captured output.
pub trait CommandExecutor: Send + Sync {
    fn execute(&self, command: &str) -> Result<String, ExecError>;
}

#[derive(Debug, Serialize)]
struct ExecuteRequest<'a> {
    command: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    output: String,
}

/// Posts commands to a relay service that runs them (`POST /execute`).
pub struct HttpExecutor {
    endpoint: String,
    agent: Agent,
}

impl HttpExecutor {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let config = ureq::config::Config::builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            endpoint: endpoint.into(),
            agent: config.new_agent(),
        }
    }

    fn connectivity(&self, err: impl std::fmt::Display) -> ExecError {
        ExecError::Connectivity {
            endpoint: self.endpoint.clone(),
            reason: err.to_string(),
        }
    }
}

impl CommandExecutor for HttpExecutor {
    fn execute(&self, command: &str) -> Result<String, ExecError> {
        let payload = serde_json::to_string(&ExecuteRequest { command })?;
        tracing::info!(endpoint = %self.endpoint, "posting command to execution backend");
        let response = self
            .agent
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .send(payload.as_bytes())
            .map_err(|e| self.connectivity(e))?;
        let status = response.status();
        let text = response
            .into_body()
            .read_to_string()
            .map_err(|e| self.connectivity(e))?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), body = %text, "execution backend rejected command");
            return Err(ExecError::RemoteExecution {
                status: status.as_u16(),
                body: text,
            });
        }
        let body: ExecuteResponse = serde_json::from_str(&text)?;
        tracing::debug!(output = %body.output, "command executed");
        Ok(body.output)
    }
}

/// Stand-in backend that never leaves the process; reports what would have run.
pub struct SimulatedExecutor {
    delay: Duration,
}

impl SimulatedExecutor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl CommandExecutor for SimulatedExecutor {
    fn execute(&self, command: &str) -> Result<String, ExecError> {
        if let Some(meta) = extract_metadata(command) {
            tracing::info!(phone = %meta.phone_number, candidate = %meta.candidate_name, "simulating dispatch");
        }
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        Ok(format!(
            "Command simulation: \"{command}\" would be executed on a server"
        ))
    }
}

pub fn executor_from_config(cfg: &AppConfig) -> Arc<dyn CommandExecutor> {
    match cfg.executor {
        ExecutorKind::Http => Arc::new(HttpExecutor::new(
            cfg.endpoint.clone(),
            Duration::from_secs(cfg.timeout_secs),
        )),
        ExecutorKind::Simulate => Arc::new(SimulatedExecutor::new(Duration::from_millis(
            cfg.simulate_delay_ms,
        ))),
    }
}

pub struct ExecMsg {
    pub outcome: Result<String, ExecError>,
}

/// Run `command` on a worker thread; the outcome arrives on `tx` as one [`ExecMsg`].
pub fn spawn_execute(executor: Arc<dyn CommandExecutor>, command: String, tx: Sender<ExecMsg>) {
    thread::spawn(move || {
        let outcome = executor.execute(&command);
        if let Err(e) = &outcome {
            tracing::error!(error = %e, "command execution failed");
        }
        let _ = tx.send(ExecMsg { outcome });
    });
}

#[cfg(test)]
mod executor_tests;
