//! The `AgentReactor` trait and the name-keyed reactor registry.

use std::collections::BTreeMap;

use rh_core::{AgentBehaviorConfig, Params, SimRng};

use crate::builtin::{AcceptAll, CapacityLimited, ProfitMaxFlowStub, RandomShortfall};
use crate::exec::ExecReactor;
use crate::{AgentRequest, AgentResponse, ReactorContext, ReactorError, ReactorResult};

/// Pluggable lower-level behavior.
///
/// Called once per period with the request built from that period's
/// commitment.  The response must name the request's period; the simulator
/// treats anything else as a broken reactor and stops the run.
///
/// `rng` is seeded from the run seed and the period, so stochastic reactors
/// reproduce exactly across runs.  Deterministic reactors ignore it.
pub trait AgentReactor: Send + Sync {
    fn name(&self) -> &str;

    fn react(
        &self,
        request: &AgentRequest,
        ctx:     &ReactorContext<'_>,
        rng:     &mut SimRng,
    ) -> ReactorResult<AgentResponse>;
}

/// Builds a reactor from the `agent_behavior` config section.
pub type ReactorFactory =
    Box<dyn Fn(&AgentBehaviorConfig) -> ReactorResult<Box<dyn AgentReactor>> + Send + Sync>;

/// Name → reactor factory, passed explicitly to the simulator.
#[derive(Default)]
pub struct ReactorRegistry {
    factories: BTreeMap<String, ReactorFactory>,
}

impl ReactorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in reactor.
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        reg.register("accept_all", |_| Ok(Box::new(AcceptAll)));
        reg.register("profit_max_flow_stub", |c| Ok(Box::new(ProfitMaxFlowStub::from_params(&c.params)?)));
        reg.register("capacity_limited", |c| Ok(Box::new(CapacityLimited::from_params(&c.params)?)));
        reg.register("random_shortfall", |c| Ok(Box::new(RandomShortfall::from_params(&c.params)?)));
        reg.register("exec", |c| Ok(Box::new(ExecReactor::from_config(c)?)));
        reg
    }

    /// Add or replace the factory for `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&AgentBehaviorConfig) -> ReactorResult<Box<dyn AgentReactor>> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Build the reactor named by `config.name`.
    pub fn create(&self, config: &AgentBehaviorConfig) -> ReactorResult<Box<dyn AgentReactor>> {
        let factory = self
            .factories
            .get(&config.name)
            .ok_or_else(|| ReactorError::UnknownReactor(config.name.clone()))?;
        factory(config)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }
}

/// Read an optional non-negative parameter.
pub(crate) fn non_negative(params: &Params, name: &str) -> ReactorResult<Option<f64>> {
    match params.get(name).copied() {
        None => Ok(None),
        Some(v) if v >= 0.0 => Ok(Some(v)),
        Some(_) => Err(ReactorError::param(name, "must be non-negative")),
    }
}

/// Read an optional parameter in `[0, 1]`.
pub(crate) fn fraction(params: &Params, name: &str) -> ReactorResult<Option<f64>> {
    match params.get(name).copied() {
        None => Ok(None),
        Some(v) if (0.0..=1.0).contains(&v) => Ok(Some(v)),
        Some(_) => Err(ReactorError::param(name, "must be in [0, 1]")),
    }
}
