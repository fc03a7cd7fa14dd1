//! The `RollingHorizonSimulator` and its period loop.

use tracing::{debug, error, info, warn};

use rh_agent::{AgentReactor, AgentRequest, AgentResponse, ReactorContext, ResponseStatus};
use rh_core::{Period, RunConfig, SimRng, Window};
use rh_data::ProblemData;
use rh_principal::{AllocationModel, CommitmentExtractor};

use crate::{
    BilevelHook, NoopObserver, PeriodRecord, Plugins, RunOutcome, SimBuilder, SimError, SimObserver,
    SimResult, SimulationState,
};

/// The main simulation runner.
///
/// Drives one build → solve → extract → react → apply → advance step per
/// period, strictly in order; the next window is built only after the
/// current period's state update.  The simulator is the sole owner of the
/// [`SimulationState`].
///
/// Create via [`SimBuilder`].
pub struct RollingHorizonSimulator {
    config:    RunConfig,
    data:      ProblemData,
    model:     AllocationModel,
    extractor: CommitmentExtractor,
    reactor:   Box<dyn AgentReactor>,
    hook:      Option<Box<dyn BilevelHook>>,
    state:     SimulationState,
    records:   Vec<PeriodRecord>,
}

impl RollingHorizonSimulator {
    pub(crate) fn from_parts(
        config:    RunConfig,
        data:      ProblemData,
        model:     AllocationModel,
        extractor: CommitmentExtractor,
        reactor:   Box<dyn AgentReactor>,
        hook:      Option<Box<dyn BilevelHook>>,
        state:     SimulationState,
    ) -> Self {
        Self { config, data, model, extractor, reactor, hook, state, records: Vec::new() }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn data(&self) -> &ProblemData {
        &self.data
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Records of every completed period, in order.
    pub fn records(&self) -> &[PeriodRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<PeriodRecord> {
        self.records
    }

    pub fn policy_name(&self) -> &str {
        self.model.policy_name()
    }

    pub fn reactor_name(&self) -> &str {
        self.reactor.name()
    }

    pub fn solver_name(&self) -> &str {
        self.model.solver_name()
    }

    /// `true` once the current period has reached `end_period`.
    pub fn is_finished(&self) -> bool {
        self.state.period() >= self.config.horizon.end()
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current period to `end_period`.
    ///
    /// A fatal period stops the loop: `on_run_end` receives
    /// [`RunOutcome::Aborted`] and the error is returned.  Records of the
    /// periods completed before it stay available through
    /// [`records`][Self::records].
    pub fn run<O: SimObserver + ?Sized>(&mut self, observer: &mut O) -> SimResult<()> {
        info!(
            start = self.state.period().0,
            end = self.config.horizon.end_period,
            horizon = self.config.horizon.horizon_periods,
            step = self.config.horizon.replanning_step,
            policy = self.model.policy_name(),
            reactor = self.reactor.name(),
            strata = self.data.stratum_count(),
            "rolling-horizon run started"
        );
        observer.on_run_start(&self.config, &self.data);

        loop {
            match self.step_observed(observer) {
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(err) => {
                    observer.on_run_end(&RunOutcome::Aborted { period: err.period(), reason: err.to_string() });
                    return Err(err);
                }
            }
        }

        let outcome = RunOutcome::Completed { periods: self.records.len() };
        info!(
            periods = self.records.len(),
            remaining_area = self.state.total_remaining_area(),
            delivered = self.state.delivered_volume(),
            backlog = self.state.backlog(),
            "rolling-horizon run finished"
        );
        observer.on_run_end(&outcome);
        Ok(())
    }

    /// Advance exactly one period.
    ///
    /// Returns `Ok(None)` once the run is finished.
    pub fn step(&mut self) -> SimResult<Option<PeriodRecord>> {
        self.step_observed(&mut NoopObserver)
    }

    /// [`step`][Self::step] with observer callbacks.
    pub fn step_observed<O: SimObserver + ?Sized>(
        &mut self,
        observer: &mut O,
    ) -> SimResult<Option<PeriodRecord>> {
        let t = self.state.period();
        let horizon = &self.config.horizon;
        let Some(window) = Window::clipped(t, horizon.horizon_periods, horizon.end()) else {
            return Ok(None);
        };
        observer.on_period_start(t, window);

        // ── ② Solve ───────────────────────────────────────────────────────
        let solution = self
            .model
            .build_and_solve(&self.data, self.state.remaining_area(), window)
            .map_err(|e| {
                let err = SimError::from_model(t, e);
                error!(period = t.0, window = %window, error = %err, "window solve failed; aborting run");
                err
            })?;

        // ── ③ Extract ─────────────────────────────────────────────────────
        let mut commitment = self.extractor.extract(&solution, t);
        if let Some(hook) = &self.hook {
            commitment = hook.refine(&solution, commitment);
        }
        debug!(
            period = t.0,
            window = %window,
            objective = solution.objective(),
            entries = commitment.len(),
            volume = commitment.total_volume(),
            area = commitment.total_area(),
            "commitment extracted"
        );

        // ── ④ React ───────────────────────────────────────────────────────
        let request = AgentRequest::from_commitment(&commitment);
        let response = {
            let ctx = ReactorContext::new(t, &self.data, self.state.remaining_area());
            let mut rng = SimRng::for_period(self.config.run.random_seed, t);
            self.reactor
                .react(&request, &ctx, &mut rng)
                .map_err(|source| SimError::ReactorFailed { period: t, source })
                .and_then(|r| check_response(t, r))
                .inspect_err(|err| error!(period = t.0, error = %err, "agent reactor failed; aborting run"))?
        };

        let degraded = response.status == ResponseStatus::Infeasible;
        let realized_flow = if degraded { 0.0 } else { response.realized_flow };

        // ── ⑤ Apply ───────────────────────────────────────────────────────
        let consumed = self.state.apply(&commitment, realized_flow);

        let record = PeriodRecord {
            period:           t,
            window_start:     window.start(),
            window_end:       window.end(),
            objective:        solution.objective(),
            committed_volume: commitment.total_volume(),
            committed_area:   consumed,
            commitments:      request.commitments,
            agent_status:     response.status,
            realized_flow,
            agent_cost:       response.cost,
            degraded,
            remaining_area:   self.state.total_remaining_area(),
            backlog:          self.state.backlog(),
            note:             response.note,
        };

        observer.on_period_end(&record);
        if degraded {
            warn!(
                period = t.0,
                committed = record.committed_volume,
                note = record.note.as_deref().unwrap_or(""),
                "agent infeasible; realized flow set to zero"
            );
            observer.on_degraded(&record);
        }
        self.records.push(record.clone());

        // ── ⑥ Advance ─────────────────────────────────────────────────────
        self.state.advance(self.config.horizon.replanning_step);
        Ok(Some(record))
    }
}

/// Reject responses the state update cannot trust.
fn check_response(period: Period, response: AgentResponse) -> SimResult<AgentResponse> {
    let violation = |reason: String| SimError::ReactorContract { period, reason };
    if response.period != period {
        return Err(violation(format!("response names period {}", response.period.0)));
    }
    if response.status != ResponseStatus::Infeasible
        && !(response.realized_flow.is_finite() && response.realized_flow >= 0.0)
    {
        return Err(violation(format!("realized flow {} is not a non-negative number", response.realized_flow)));
    }
    if !response.cost.is_finite() {
        return Err(violation(format!("cost {} is not finite", response.cost)));
    }
    Ok(response)
}

/// Build a simulator from `config`, run it to the end, and return the
/// records.
pub fn run_simulation(data: ProblemData, config: &RunConfig, plugins: &Plugins) -> SimResult<Vec<PeriodRecord>> {
    let mut sim = SimBuilder::new(config.clone(), data).plugins(plugins).build()?;
    sim.run(&mut NoopObserver)?;
    Ok(sim.into_records())
}
