//! Run configuration.
//!
//! Loaded from a TOML document by the application crate, validated once, and
//! passed read-only to the simulator.  Every section has explicit defaults so
//! a minimal document only names what it changes; unknown keys are rejected
//! so a typo fails at load time instead of silently falling back.
//!
//! ```toml
//! data_path = "data"
//!
//! [horizon]
//! horizon_periods = 12
//! end_period      = 24
//!
//! [principal_policy]
//! name   = "even_flow"
//! params = { min_flow = 500.0 }
//!
//! [solver]
//! time_limit = 30
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult, Period};

/// Name → numeric parameter map used by policies and reactors.
///
/// Ordered so iteration (and anything derived from it) is deterministic.
pub type Params = BTreeMap<String, f64>;

// ── Sections ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HorizonConfig {
    /// Days per planning period.  Only used by age-bin yield expansion.
    pub period_length: u32,
    /// Number of periods in the optimization window (`H`).
    pub horizon_periods: u32,
    /// Periods to advance between re-plans.
    pub replanning_step: u32,
    pub start_period: u32,
    /// Exclusive upper bound of the simulated range.
    pub end_period: u32,
}

impl Default for HorizonConfig {
    fn default() -> Self {
        Self {
            period_length:   7,
            horizon_periods: 12,
            replanning_step: 1,
            start_period:    0,
            end_period:      52,
        }
    }
}

impl HorizonConfig {
    #[inline]
    pub fn start(&self) -> Period {
        Period(self.start_period)
    }

    #[inline]
    pub fn end(&self) -> Period {
        Period(self.end_period)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrincipalPolicyConfig {
    pub name:   String,
    pub params: Params,
}

impl Default for PrincipalPolicyConfig {
    fn default() -> Self {
        Self { name: "max_volume".into(), params: Params::new() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentBehaviorConfig {
    pub name:    String,
    /// Program run by the `exec` reactor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Arguments passed to `command`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args:    Vec<String>,
    pub params:  Params,
}

impl AgentBehaviorConfig {
    /// A named reactor with no parameters.
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }
}

impl Default for AgentBehaviorConfig {
    fn default() -> Self {
        Self {
            name:    "profit_max_flow_stub".into(),
            command: None,
            args:    Vec::new(),
            params:  Params::new(),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reformulation {
    Kkt,
    #[serde(alias = "big_m")]
    Bigm,
    #[default]
    Decomposition,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BilevelConfig {
    pub enabled:       bool,
    pub reformulation: Reformulation,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverDriver {
    /// Pick the best available backend.
    #[default]
    Auto,
    /// The embedded simplex solver, called in-process.
    #[serde(alias = "appsi")]
    InProcess,
    /// An external solver executable.  Parsed so such configs get a clear
    /// error, but no exec backend ships; validation rejects it.
    Exec,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    pub driver: SolverDriver,
    /// Wall-clock limit per window solve, in seconds.  `None` = unlimited.
    pub time_limit: Option<f64>,
    /// Relative MIP gap.  Accepted for compatibility; LP backends ignore it.
    pub mip_gap: Option<f64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self { driver: SolverDriver::Auto, time_limit: Some(120.0), mip_gap: None }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[serde(alias = "DEBUG")]
    Debug,
    #[default]
    #[serde(alias = "INFO")]
    Info,
    #[serde(alias = "WARNING", alias = "warning", alias = "WARN")]
    Warn,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info  => "info",
            LogLevel::Warn  => "warn",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunSection {
    /// Seed for stochastic reactors.  The same seed always reproduces a run.
    pub random_seed: u64,
    pub log_level:   LogLevel,
    pub out_dir:     String,
}

impl Default for RunSection {
    fn default() -> Self {
        Self { random_seed: 42, log_level: LogLevel::Info, out_dir: "runs/default".into() }
    }
}

// ── RunConfig ─────────────────────────────────────────────────────────────────

/// Top-level, validated run configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Directory holding `problem.json` or the CSV tables.
    pub data_path:        String,
    pub horizon:          HorizonConfig,
    pub principal_policy: PrincipalPolicyConfig,
    pub agent_behavior:   AgentBehaviorConfig,
    pub bilevel:          BilevelConfig,
    pub solver:           SolverConfig,
    pub run:              RunSection,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_path:        "data".into(),
            horizon:          HorizonConfig::default(),
            principal_policy: PrincipalPolicyConfig::default(),
            agent_behavior:   AgentBehaviorConfig::default(),
            bilevel:          BilevelConfig::default(),
            solver:           SolverConfig::default(),
            run:              RunSection::default(),
        }
    }
}

impl RunConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        let config: RunConfig =
            toml::from_str(text).map_err(|e| CoreError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    ///
    /// A relative `data_path` is resolved against the config file's directory.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&text)?;
        let data_path = Path::new(&config.data_path);
        if data_path.is_relative() {
            if let Some(parent) = path.parent() {
                config.data_path = parent.join(data_path).to_string_lossy().into_owned();
            }
        }
        Ok(config)
    }

    /// Serialize back to TOML (used by `init` and the run manifest).
    pub fn to_toml_string(&self) -> CoreResult<String> {
        toml::to_string_pretty(self).map_err(|e| CoreError::Parse(e.to_string()))
    }

    /// Check every recognised field, failing on the first bad one.
    pub fn validate(&self) -> CoreResult<()> {
        let h = &self.horizon;
        if h.period_length == 0 {
            return Err(CoreError::invalid("horizon.period_length", "must be at least 1 day"));
        }
        if h.horizon_periods == 0 {
            return Err(CoreError::invalid("horizon.horizon_periods", "must be at least 1"));
        }
        if h.replanning_step == 0 {
            return Err(CoreError::invalid("horizon.replanning_step", "must be at least 1"));
        }
        if h.end_period <= h.start_period {
            return Err(CoreError::invalid(
                "horizon.end_period",
                format!("must be greater than start_period ({})", h.start_period),
            ));
        }

        validate_named("principal_policy", &self.principal_policy.name, &self.principal_policy.params)?;
        validate_named("agent_behavior", &self.agent_behavior.name, &self.agent_behavior.params)?;

        if self.bilevel.enabled && self.bilevel.reformulation != Reformulation::Decomposition {
            return Err(CoreError::invalid(
                "bilevel.reformulation",
                "only `decomposition` is supported",
            ));
        }

        if self.solver.driver == SolverDriver::Exec {
            return Err(CoreError::invalid(
                "solver.driver",
                "`exec` is not available; use `auto` or `in_process`",
            ));
        }
        if let Some(limit) = self.solver.time_limit {
            if !(limit.is_finite() && limit > 0.0) {
                return Err(CoreError::invalid("solver.time_limit", "must be a positive number of seconds"));
            }
        }
        if let Some(gap) = self.solver.mip_gap {
            if !(0.0..1.0).contains(&gap) {
                return Err(CoreError::invalid("solver.mip_gap", "must be in [0, 1)"));
            }
        }
        Ok(())
    }
}

fn validate_named(section: &str, name: &str, params: &Params) -> CoreResult<()> {
    if name.trim().is_empty() {
        return Err(CoreError::invalid(format!("{section}.name"), "must not be empty"));
    }
    for (key, value) in params {
        if !value.is_finite() {
            return Err(CoreError::invalid(
                format!("{section}.params.{key}"),
                "must be a finite number",
            ));
        }
    }
    Ok(())
}
