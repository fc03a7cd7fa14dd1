//! Unit tests for rh-agent.

#[cfg(test)]
mod fixtures {
    use rh_core::{AgentBehaviorConfig, Commitment, CommitmentKey, Params, Period};
    use rh_data::{ProblemData, Stratum};

    pub fn data(price: f64, harvest: f64) -> ProblemData {
        let mut b = ProblemData::builder();
        b.add_stratum(Stratum::new("S0", 100.0))
            .add_stratum(Stratum::new("S1", 50.0).with_species("SPRUCE"));
        b.set_price("PINE", price);
        b.set_price("SPRUCE", 20.0);
        b.set_cost("harvest", harvest);
        b.build().unwrap()
    }

    pub fn commitment(entries: &[(&str, f64)]) -> Commitment {
        let mut c = Commitment::empty(Period(3));
        for &(s, v) in entries {
            c.volumes.insert(CommitmentKey::new(s, "sawlog"), v);
        }
        c
    }

    pub fn params(pairs: &[(&str, f64)]) -> Params {
        pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    pub fn behavior(name: &str, pairs: &[(&str, f64)]) -> AgentBehaviorConfig {
        AgentBehaviorConfig { params: params(pairs), ..AgentBehaviorConfig::named(name) }
    }
}

#[cfg(test)]
mod request_tests {
    use rh_core::Period;

    use super::fixtures::commitment;
    use crate::{AgentRequest, AgentResponse, ResponseStatus};

    #[test]
    fn request_mirrors_commitment() {
        let req = AgentRequest::from_commitment(&commitment(&[("S1", 30.0), ("S0", 70.0)]));
        assert_eq!(req.period, Period(3));
        assert_eq!(req.blocks.len(), 2);
        assert_eq!(req.blocks[0].stratum, "S0");
        assert_eq!(req.blocks[0].ub_vol, 70.0);
        assert_eq!(req.committed_volume(), 100.0);
    }

    #[test]
    fn infeasible_response_has_zero_flow() {
        let r = AgentResponse::infeasible(Period(1), "nope");
        assert_eq!(r.status, ResponseStatus::Infeasible);
        assert_eq!(r.realized_flow, 0.0);
        assert_eq!(r.note.as_deref(), Some("nope"));
        assert_eq!(r.status.to_string(), "infeasible");
    }
}

#[cfg(test)]
mod builtin_tests {
    use rh_core::{Period, SimRng};

    use super::fixtures::{commitment, data, params};
    use crate::{
        AcceptAll, AgentReactor, AgentRequest, CapacityLimited, ProfitMaxFlowStub, RandomShortfall,
        ReactorContext, ResponseStatus,
    };

    fn react(reactor: &dyn AgentReactor, entries: &[(&str, f64)], price: f64) -> crate::AgentResponse {
        let data = data(price, 50.0);
        let remaining = [100.0, 50.0];
        let ctx = ReactorContext::new(Period(3), &data, &remaining);
        let req = AgentRequest::from_commitment(&commitment(entries));
        reactor.react(&req, &ctx, &mut SimRng::for_period(42, Period(3))).unwrap()
    }

    #[test]
    fn accept_all_delivers_everything() {
        let r = react(&AcceptAll, &[("S0", 40.0), ("S1", 10.0)], 100.0);
        assert_eq!(r.status, ResponseStatus::Feasible);
        assert_eq!(r.realized_flow, 50.0);
        assert_eq!(r.period, Period(3));
    }

    #[test]
    fn profit_stub_accepts_profitable_blocks() {
        let r = react(&ProfitMaxFlowStub::new(None), &[("S0", 40.0)], 100.0);
        assert_eq!(r.status, ResponseStatus::Feasible);
        assert_eq!(r.realized_flow, 40.0);
        assert_eq!(r.cost, 40.0 * 50.0);
    }

    #[test]
    fn profit_stub_partial_and_infeasible() {
        // SPRUCE at 20 does not cover the 50 harvest cost.
        let r = react(&ProfitMaxFlowStub::new(None), &[("S0", 40.0), ("S1", 10.0)], 100.0);
        assert_eq!(r.status, ResponseStatus::Partial);
        assert_eq!(r.realized_flow, 40.0);

        let r = react(&ProfitMaxFlowStub::new(None), &[("S0", 40.0)], 30.0);
        assert_eq!(r.status, ResponseStatus::Infeasible);
        assert_eq!(r.realized_flow, 0.0);
    }

    #[test]
    fn profit_stub_unit_cost_param_overrides_data() {
        let reactor = ProfitMaxFlowStub::from_params(&params(&[("unit_cost", 10.0)])).unwrap();
        let r = react(&reactor, &[("S1", 10.0)], 100.0);
        assert_eq!(r.status, ResponseStatus::Feasible);
        assert_eq!(r.cost, 100.0);
    }

    #[test]
    fn profit_stub_prices_aggregate_at_lowest_price() {
        let r = react(&ProfitMaxFlowStub::new(Some(10.0)), &[("ALL", 5.0)], 100.0);
        assert_eq!(r.status, ResponseStatus::Feasible);
        let r = react(&ProfitMaxFlowStub::new(Some(30.0)), &[("ALL", 5.0)], 100.0);
        assert_eq!(r.status, ResponseStatus::Infeasible);
    }

    #[test]
    fn empty_commitment_is_feasible() {
        let r = react(&ProfitMaxFlowStub::new(None), &[], 1.0);
        assert_eq!(r.status, ResponseStatus::Feasible);
        assert_eq!(r.realized_flow, 0.0);
    }

    #[test]
    fn capacity_limited_caps_flow() {
        let r = react(&CapacityLimited::new(30.0, 2.0), &[("S0", 40.0)], 100.0);
        assert_eq!(r.status, ResponseStatus::Partial);
        assert_eq!(r.realized_flow, 30.0);
        assert_eq!(r.cost, 60.0);

        let r = react(&CapacityLimited::new(0.0, 2.0), &[("S0", 40.0)], 100.0);
        assert_eq!(r.status, ResponseStatus::Infeasible);

        let r = react(&CapacityLimited::new(100.0, 0.0), &[("S0", 40.0)], 100.0);
        assert_eq!(r.status, ResponseStatus::Feasible);
    }

    #[test]
    fn random_shortfall_is_reproducible() {
        let reactor = RandomShortfall::new(0.5, 0.5);
        let a: Vec<_> = (0..20).map(|_| react(&reactor, &[("S0", 100.0)], 100.0)).collect();
        let b: Vec<_> = (0..20).map(|_| react(&reactor, &[("S0", 100.0)], 100.0)).collect();
        assert_eq!(a, b);
        assert!(a[0].realized_flow >= 50.0 && a[0].realized_flow <= 100.0);
    }

    #[test]
    fn random_shortfall_certain_hit() {
        let r = react(&RandomShortfall::new(1.0, 1.0), &[("S0", 100.0)], 100.0);
        assert!(r.realized_flow < 100.0);
        assert_ne!(r.status, ResponseStatus::Feasible);
    }

    #[test]
    fn random_shortfall_never_without_probability() {
        let r = react(&RandomShortfall::new(0.0, 1.0), &[("S0", 100.0)], 100.0);
        assert_eq!(r.status, ResponseStatus::Feasible);
        assert_eq!(r.realized_flow, 100.0);
    }
}

#[cfg(test)]
mod registry_tests {
    use super::fixtures::behavior;
    use crate::{ReactorError, ReactorRegistry};

    #[test]
    fn builtins_registered() {
        let reg = ReactorRegistry::with_builtins();
        assert_eq!(
            reg.names(),
            vec!["accept_all", "capacity_limited", "exec", "profit_max_flow_stub", "random_shortfall"]
        );
        let r = reg.create(&behavior("profit_max_flow_stub", &[])).unwrap();
        assert_eq!(r.name(), "profit_max_flow_stub");
    }

    #[test]
    fn unknown_name_rejected() {
        let err = ReactorRegistry::with_builtins().create(&behavior("fhops", &[])).err().unwrap();
        assert!(matches!(err, ReactorError::UnknownReactor(name) if name == "fhops"));
    }

    #[test]
    fn bad_params_rejected() {
        let reg = ReactorRegistry::with_builtins();
        let err = reg.create(&behavior("random_shortfall", &[("shortfall_prob", 2.0)])).err().unwrap();
        assert!(matches!(err, ReactorError::InvalidParam { .. }));
        let err = reg.create(&behavior("capacity_limited", &[("capacity", -5.0)])).err().unwrap();
        assert!(matches!(err, ReactorError::InvalidParam { .. }));
    }

    #[test]
    fn exec_requires_a_command() {
        let reg = ReactorRegistry::with_builtins();
        let err = reg.create(&behavior("exec", &[])).err().unwrap();
        assert!(matches!(err, ReactorError::InvalidParam { name, .. } if name == "command"));

        let mut config = behavior("exec", &[]);
        config.command = Some("  ".into());
        assert!(reg.create(&config).is_err());

        config.command = Some("my-agent".into());
        assert_eq!(reg.create(&config).unwrap().name(), "exec");
    }
}

#[cfg(all(test, unix))]
mod exec_tests {
    use rh_core::{Period, SimRng};

    use super::fixtures::{commitment, data};
    use crate::{
        AgentReactor, AgentRequest, AgentResponse, ExecReactor, ReactorContext, ReactorError,
        ReactorResult, ResponseStatus,
    };

    fn sh(script: &str) -> ExecReactor {
        ExecReactor::new("sh", vec!["-c".into(), script.into()])
    }

    fn react(reactor: &ExecReactor) -> ReactorResult<AgentResponse> {
        let data = data(100.0, 50.0);
        let remaining = [100.0, 50.0];
        let ctx = ReactorContext::new(Period(3), &data, &remaining);
        let req = AgentRequest::from_commitment(&commitment(&[("S0", 70.0)]));
        reactor.react(&req, &ctx, &mut SimRng::for_period(1, Period(3)))
    }

    #[test]
    fn parses_the_program_response() {
        let reactor = sh(r#"cat > /dev/null; printf '{"period":3,"status":"partial","realized_flow":52.5,"cost":12.0,"note":"crew short"}'"#);
        let r = react(&reactor).unwrap();
        assert_eq!(r.period, Period(3));
        assert_eq!(r.status, ResponseStatus::Partial);
        assert_eq!(r.realized_flow, 52.5);
        assert_eq!(r.cost, 12.0);
        assert_eq!(r.note.as_deref(), Some("crew short"));
    }

    #[test]
    fn request_is_written_to_stdin() {
        // Answers feasible only if the block for S0 arrived on stdin.
        let reactor = sh(
            r#"if grep -q '"stratum":"S0"'; then printf '{"period":3,"status":"feasible","realized_flow":70.0}'; else exit 7; fi"#,
        );
        let r = react(&reactor).unwrap();
        assert_eq!(r.status, ResponseStatus::Feasible);
        assert_eq!(r.realized_flow, 70.0);
        assert_eq!(r.cost, 0.0);
        assert_eq!(r.note, None);
    }

    #[test]
    fn missing_program_is_an_error() {
        let reactor = ExecReactor::new("rh-agent-no-such-program", Vec::new());
        let err = react(&reactor).unwrap_err();
        assert!(matches!(err, ReactorError::Spawn { .. }), "got {err:?}");
    }

    #[test]
    fn non_zero_exit_is_an_error() {
        let err = react(&sh("cat > /dev/null; echo boom >&2; exit 3")).unwrap_err();
        match err {
            ReactorError::ExitStatus { stderr, .. } => assert_eq!(stderr, "boom"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn garbage_output_is_an_error() {
        let err = react(&sh("cat > /dev/null; echo not json")).unwrap_err();
        assert!(matches!(err, ReactorError::Response { .. }), "got {err:?}");
    }
}
