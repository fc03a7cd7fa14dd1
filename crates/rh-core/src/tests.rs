//! Unit tests for rh-core primitives.

#[cfg(test)]
mod ids {
    use crate::StratumIdx;

    #[test]
    fn index_roundtrip() {
        let id = StratumIdx(42);
        assert_eq!(id.index(), 42);
        assert_eq!(StratumIdx::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn display() {
        assert_eq!(StratumIdx(7).to_string(), "StratumIdx(7)");
    }
}

#[cfg(test)]
mod period {
    use crate::{Period, Window};

    #[test]
    fn period_arithmetic() {
        let p = Period(10);
        assert_eq!(p + 5, Period(15));
        assert_eq!(p.offset(3), Period(13));
        assert_eq!(Period(15) - Period(10), 5);
        assert_eq!(Period(3).to_string(), "P3");
    }

    #[test]
    fn window_unclipped() {
        let w = Window::clipped(Period(4), 3, Period(100)).unwrap();
        assert_eq!(w.start(), Period(4));
        assert_eq!(w.end(), Period(6));
        assert_eq!(w.len(), 3);
        let periods: Vec<_> = w.periods().collect();
        assert_eq!(periods, vec![Period(4), Period(5), Period(6)]);
    }

    #[test]
    fn window_clipped_at_end_period() {
        let w = Window::clipped(Period(0), 3, Period(2)).unwrap();
        assert_eq!(w.end(), Period(1));
        assert_eq!(w.len(), 2);

        let last = Window::clipped(Period(1), 3, Period(2)).unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last.start(), last.end());
    }

    #[test]
    fn window_none_past_end_or_zero_horizon() {
        assert!(Window::clipped(Period(2), 3, Period(2)).is_none());
        assert!(Window::clipped(Period(0), 0, Period(10)).is_none());
    }

    #[test]
    fn window_offsets() {
        let w = Window::clipped(Period(5), 4, Period(50)).unwrap();
        assert_eq!(w.offset_of(Period(5)), Some(0));
        assert_eq!(w.offset_of(Period(8)), Some(3));
        assert_eq!(w.offset_of(Period(9)), None);
        assert_eq!(w.offset_of(Period(4)), None);
        assert_eq!(w.to_string(), "[5, 8]");
    }
}

#[cfg(test)]
mod commitment {
    use crate::{Commitment, CommitmentKey, Period, StratumIdx};

    #[test]
    fn totals_and_lookup() {
        let mut c = Commitment::empty(Period(3));
        assert!(c.is_empty());
        c.volumes.insert(CommitmentKey::new("S1", "sawlog"), 250.0);
        c.volumes.insert(CommitmentKey::new("S0", "sawlog"), 100.0);
        c.areas.insert(StratumIdx(0), 10.0);
        c.areas.insert(StratumIdx(1), 25.0);

        assert_eq!(c.len(), 2);
        assert_eq!(c.total_volume(), 350.0);
        assert_eq!(c.total_area(), 35.0);
        assert_eq!(c.get("S1", "sawlog"), Some(250.0));
        assert_eq!(c.get("S1", "pulp"), None);

        // Entries come out in key order regardless of insertion order.
        let entries = c.entries();
        assert_eq!(entries[0].stratum, "S0");
        assert_eq!(entries[1].stratum, "S1");
    }

    #[test]
    fn aggregate_key() {
        assert!(CommitmentKey::new("ALL", "sawlog").is_aggregate());
        assert!(!CommitmentKey::new("S0", "sawlog").is_aggregate());
        assert_eq!(CommitmentKey::new("S0", "sawlog").to_string(), "(S0, sawlog)");
    }
}

#[cfg(test)]
mod config {
    use crate::{CoreError, LogLevel, Reformulation, RunConfig, SolverDriver};

    fn field_of(err: CoreError) -> String {
        match err {
            CoreError::InvalidField { field, .. } => field,
            other => panic!("expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        let config = RunConfig::default();
        config.validate().unwrap();
        assert_eq!(config.horizon.horizon_periods, 12);
        assert_eq!(config.horizon.replanning_step, 1);
        assert_eq!(config.principal_policy.name, "max_volume");
        assert_eq!(config.solver.time_limit, Some(120.0));
        assert_eq!(config.run.random_seed, 42);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = RunConfig::from_toml_str("").unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn parses_full_document() {
        let text = r#"
            data_path = "my/data"

            [horizon]
            period_length   = 7
            horizon_periods = 3
            replanning_step = 2
            start_period    = 1
            end_period      = 9

            [principal_policy]
            name   = "even_flow"
            params = { min_flow = 500, deviation_penalty = 1.5 }

            [agent_behavior]
            name = "accept_all"

            [bilevel]
            enabled       = true
            reformulation = "decomposition"

            [solver]
            driver     = "appsi"
            time_limit = 30
            mip_gap    = 0.01

            [run]
            random_seed = 7
            log_level   = "WARNING"
            out_dir     = "runs/x"
        "#;
        let config = RunConfig::from_toml_str(text).unwrap();
        assert_eq!(config.data_path, "my/data");
        assert_eq!(config.horizon.horizon_periods, 3);
        assert_eq!(config.horizon.replanning_step, 2);
        assert_eq!(config.principal_policy.params["min_flow"], 500.0);
        assert_eq!(config.agent_behavior.name, "accept_all");
        assert!(config.bilevel.enabled);
        assert_eq!(config.bilevel.reformulation, Reformulation::Decomposition);
        assert_eq!(config.solver.driver, SolverDriver::InProcess);
        assert_eq!(config.solver.time_limit, Some(30.0));
        assert_eq!(config.run.log_level, LogLevel::Warn);
    }

    #[test]
    fn unknown_field_rejected() {
        let err = RunConfig::from_toml_str("[horizon]\nhorizon = 3\n").unwrap_err();
        assert!(matches!(err, CoreError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn exec_driver_parses_but_is_rejected() {
        let err = RunConfig::from_toml_str("[solver]\ndriver = \"exec\"\n").unwrap_err();
        assert_eq!(field_of(err), "solver.driver");
    }

    #[test]
    fn agent_command_round_trips() {
        let text = r#"
            [agent_behavior]
            name    = "exec"
            command = "my-agent"
            args    = ["--profile", "fast"]
        "#;
        let config = RunConfig::from_toml_str(text).unwrap();
        assert_eq!(config.agent_behavior.command.as_deref(), Some("my-agent"));
        assert_eq!(config.agent_behavior.args, vec!["--profile", "fast"]);

        let again = RunConfig::from_toml_str(&config.to_toml_string().unwrap()).unwrap();
        assert_eq!(again, config);
    }

    #[test]
    fn zero_horizon_names_field() {
        let err = RunConfig::from_toml_str("[horizon]\nhorizon_periods = 0\n").unwrap_err();
        assert_eq!(field_of(err), "horizon.horizon_periods");
    }

    #[test]
    fn zero_replanning_step_names_field() {
        let err = RunConfig::from_toml_str("[horizon]\nreplanning_step = 0\n").unwrap_err();
        assert_eq!(field_of(err), "horizon.replanning_step");
    }

    #[test]
    fn end_before_start_names_field() {
        let err = RunConfig::from_toml_str("[horizon]\nstart_period = 5\nend_period = 5\n").unwrap_err();
        assert_eq!(field_of(err), "horizon.end_period");
    }

    #[test]
    fn unsupported_reformulation_rejected_when_enabled() {
        let text = "[bilevel]\nenabled = true\nreformulation = \"kkt\"\n";
        let err = RunConfig::from_toml_str(text).unwrap_err();
        assert_eq!(field_of(err), "bilevel.reformulation");

        // Disabled bilevel ignores the reformulation choice.
        let text = "[bilevel]\nenabled = false\nreformulation = \"bigm\"\n";
        RunConfig::from_toml_str(text).unwrap();
    }

    #[test]
    fn bad_solver_fields_rejected() {
        let err = RunConfig::from_toml_str("[solver]\ntime_limit = -1\n").unwrap_err();
        assert_eq!(field_of(err), "solver.time_limit");
        let err = RunConfig::from_toml_str("[solver]\nmip_gap = 1.5\n").unwrap_err();
        assert_eq!(field_of(err), "solver.mip_gap");
    }

    #[test]
    fn empty_policy_name_rejected() {
        let err = RunConfig::from_toml_str("[principal_policy]\nname = \" \"\n").unwrap_err();
        assert_eq!(field_of(err), "principal_policy.name");
    }

    #[test]
    fn toml_roundtrip() {
        let mut config = RunConfig::default();
        config.principal_policy.params.insert("min_flow".into(), 10.0);
        let text = config.to_toml_string().unwrap();
        let back = RunConfig::from_toml_str(&text).unwrap();
        assert_eq!(back, config);
    }
}

#[cfg(test)]
mod rng {
    use crate::{Period, SimRng};

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SimRng::for_period(42, Period(3));
        let mut b = SimRng::for_period(42, Period(3));
        let xs: Vec<u64> = (0..8).map(|_| a.random()).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.random()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn periods_get_distinct_streams() {
        let mut a = SimRng::for_period(42, Period(0));
        let mut b = SimRng::for_period(42, Period(1));
        let x: u64 = a.random();
        let y: u64 = b.random();
        assert_ne!(x, y);
    }

    #[test]
    fn gen_bool_clamps() {
        let mut rng = SimRng::new(1);
        assert!(rng.gen_bool(2.0));
        assert!(!rng.gen_bool(-1.0));
    }
}
