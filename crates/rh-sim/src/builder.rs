//! Fluent builder for constructing a [`RollingHorizonSimulator`].

use tracing::debug;

use rh_agent::{AgentReactor, ReactorRegistry};
use rh_core::{CoreError, RunConfig};
use rh_data::ProblemData;
use rh_principal::{AllocationModel, CommitmentExtractor, PolicyParams, PolicyRegistry, PrincipalPolicy};
use rh_solver::{LpSolver, SolveOptions, solver_for};

use crate::{BilevelHook, DecompositionStub, Plugins, RollingHorizonSimulator, SimResult, SimulationState};

/// Fluent builder for [`RollingHorizonSimulator`].
///
/// # Required inputs
///
/// - [`RunConfig`] — validated again by [`build`][Self::build]
/// - [`ProblemData`] — owned by the simulator for the whole run
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                                              |
/// |----------------------|------------------------------------------------------|
/// | `.plugins(p)`        | `Plugins::builtin()`                                 |
/// | `.policies(reg)`     | built-in policies                                    |
/// | `.reactors(reg)`     | built-in reactors                                    |
/// | `.policy(b)`         | `principal_policy.name` resolved in the registry     |
/// | `.reactor(b)`        | `agent_behavior.name` resolved in the registry       |
/// | `.solver(b)`         | `solver_for(solver.driver)`                          |
/// | `.extractor(e)`      | `CommitmentExtractor::default()`                     |
/// | `.bilevel_hook(b)`   | `DecompositionStub` (only when `bilevel.enabled`)    |
///
/// # Example
///
/// ```rust,ignore
/// let plugins = Plugins::builtin();
/// let mut sim = SimBuilder::new(config, data)
///     .plugins(&plugins)
///     .extractor(CommitmentExtractor::new(1e-4, "pulp"))
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<'a> {
    config:    RunConfig,
    data:      ProblemData,
    policies:  Option<&'a PolicyRegistry>,
    reactors:  Option<&'a ReactorRegistry>,
    policy:    Option<Box<dyn PrincipalPolicy>>,
    reactor:   Option<Box<dyn AgentReactor>>,
    solver:    Option<Box<dyn LpSolver>>,
    extractor: CommitmentExtractor,
    hook:      Option<Box<dyn BilevelHook>>,
}

impl<'a> SimBuilder<'a> {
    pub fn new(config: RunConfig, data: ProblemData) -> Self {
        Self {
            config,
            data,
            policies:  None,
            reactors:  None,
            policy:    None,
            reactor:   None,
            solver:    None,
            extractor: CommitmentExtractor::default(),
            hook:      None,
        }
    }

    /// Resolve both policy and reactor names against `plugins`.
    pub fn plugins(mut self, plugins: &'a Plugins) -> Self {
        self.policies = Some(&plugins.policies);
        self.reactors = Some(&plugins.reactors);
        self
    }

    pub fn policies(mut self, registry: &'a PolicyRegistry) -> Self {
        self.policies = Some(registry);
        self
    }

    pub fn reactors(mut self, registry: &'a ReactorRegistry) -> Self {
        self.reactors = Some(registry);
        self
    }

    /// Use `policy` instead of resolving `principal_policy.name`.
    pub fn policy(mut self, policy: Box<dyn PrincipalPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Use `reactor` instead of resolving `agent_behavior.name`.
    pub fn reactor(mut self, reactor: Box<dyn AgentReactor>) -> Self {
        self.reactor = Some(reactor);
        self
    }

    pub fn solver(mut self, solver: Box<dyn LpSolver>) -> Self {
        self.solver = Some(solver);
        self
    }

    pub fn extractor(mut self, extractor: CommitmentExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Hook run after extraction.  Ignored unless `bilevel.enabled`.
    pub fn bilevel_hook(mut self, hook: Box<dyn BilevelHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Validate the configuration, resolve every plugin, and return a
    /// simulator positioned at `horizon.start_period`.
    pub fn build(self) -> SimResult<RollingHorizonSimulator> {
        self.config.validate()?;

        let builtin = Plugins::builtin();
        let policies = self.policies.unwrap_or(&builtin.policies);
        let reactors = self.reactors.unwrap_or(&builtin.reactors);

        // ── Resolve plugins ───────────────────────────────────────────────
        let params = PolicyParams::from_params(&self.config.principal_policy.params)?;
        let policy = match self.policy {
            Some(p) => p,
            None => policies.create(&self.config.principal_policy.name, &self.config.principal_policy.params)?,
        };
        let reactor = match self.reactor {
            Some(r) => r,
            None => reactors.create(&self.config.agent_behavior)?,
        };
        let solver = match self.solver {
            Some(s) => s,
            None => solver_for(self.config.solver.driver)
                .map_err(|e| CoreError::invalid("solver.driver", e.to_string()))?,
        };
        let options = SolveOptions::from_config(&self.config.solver);

        let hook = if self.config.bilevel.enabled {
            Some(self.hook.unwrap_or_else(|| Box::new(DecompositionStub)))
        } else {
            if let Some(h) = &self.hook {
                debug!(hook = h.name(), "bilevel disabled; hook ignored");
            }
            None
        };

        debug!(
            policy = policy.name(),
            reactor = reactor.name(),
            solver = solver.name(),
            bilevel = hook.is_some(),
            "simulator built"
        );

        let state = SimulationState::new(&self.data, self.config.horizon.start());
        let model = AllocationModel::new(policy, params, solver, options);
        Ok(RollingHorizonSimulator::from_parts(
            self.config,
            self.data,
            model,
            self.extractor,
            reactor,
            hook,
            state,
        ))
    }
}
