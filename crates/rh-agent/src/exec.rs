//! The `exec` reactor: an external agent program.
//!
//! The request is written to the program's stdin as one JSON document and
//! the program must print one `AgentResponse` JSON document on stdout:
//!
//! ```text
//! stdin : {"period":3,"commitments":[..],"blocks":[{"stratum":"S0","product":"sawlog","ub_vol":70.0}]}
//! stdout: {"period":3,"status":"partial","realized_flow":52.5,"cost":120.0,"note":"crew short"}
//! ```
//!
//! `cost` and `note` may be omitted.  A program that cannot be started,
//! exits non-zero, or prints something other than a response is an `Err`,
//! which stops the run; "cannot deliver" must be reported as
//! `"status":"infeasible"` instead.

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

use tracing::debug;

use rh_core::{AgentBehaviorConfig, SimRng};

use crate::{AgentReactor, AgentRequest, AgentResponse, ReactorContext, ReactorError, ReactorResult};

pub struct ExecReactor {
    command: String,
    args:    Vec<String>,
}

impl ExecReactor {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self { command: command.into(), args }
    }

    /// Reads `agent_behavior.command` (required) and `agent_behavior.args`.
    pub fn from_config(config: &AgentBehaviorConfig) -> ReactorResult<Self> {
        let command = config
            .command
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ReactorError::param("command", "required by the `exec` reactor"))?;
        Ok(Self::new(command, config.args.clone()))
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn spawn_error(&self, source: std::io::Error) -> ReactorError {
        ReactorError::Spawn { command: self.command.clone(), source }
    }
}

impl AgentReactor for ExecReactor {
    fn name(&self) -> &str {
        "exec"
    }

    fn react(
        &self,
        request: &AgentRequest,
        _ctx:    &ReactorContext<'_>,
        _rng:    &mut SimRng,
    ) -> ReactorResult<AgentResponse> {
        let payload = serde_json::to_vec(request)
            .map_err(|e| ReactorError::Failed(format!("could not encode request: {e}")))?;

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        // Dropping stdin closes the pipe so the program sees EOF.
        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(&payload) {
                // The program stopped reading; its exit status says why.
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {}
                other => other.map_err(|e| self.spawn_error(e))?,
            }
        }

        let output = child.wait_with_output().map_err(|e| self.spawn_error(e))?;
        if !output.status.success() {
            return Err(ReactorError::ExitStatus {
                command: self.command.clone(),
                status:  output.status.to_string(),
                stderr:  String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let response: AgentResponse = serde_json::from_slice(&output.stdout)
            .map_err(|source| ReactorError::Response { command: self.command.clone(), source })?;
        debug!(
            period = request.period.0,
            command = %self.command,
            status = %response.status,
            realized = response.realized_flow,
            "external agent answered"
        );
        Ok(response)
    }
}
