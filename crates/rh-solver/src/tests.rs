//! Unit tests for rh-solver.

#[cfg(test)]
mod program_tests {
    use crate::{Cmp, LinearProgram, Sense, SolverError};

    #[test]
    fn rows_and_violations() {
        let mut lp = LinearProgram::new(Sense::Maximize);
        let x = lp.add_var("x", 0.0, 10.0, 1.0);
        let y = lp.add_var("y", 0.0, f64::INFINITY, 2.0);
        lp.add_row("cap", vec![(x, 1.0), (y, 1.0)], Cmp::Le, 4.0);

        assert_eq!(lp.num_vars(), 2);
        assert_eq!(lp.num_rows(), 1);
        assert_eq!(lp.objective_at(&[1.0, 2.0]), 5.0);
        assert_eq!(lp.first_violation(&[1.0, 2.0], 1e-9), None);
        assert_eq!(lp.first_violation(&[3.0, 2.0], 1e-9), Some("cap"));
        assert_eq!(lp.first_violation(&[11.0, 0.0], 1e-9), Some("x"));
    }

    #[test]
    fn invalid_models_rejected() {
        let mut lp = LinearProgram::new(Sense::Maximize);
        lp.add_var("x", 1.0, 0.0, 1.0);
        assert!(matches!(lp.validate(), Err(SolverError::InvalidModel(_))));

        let mut lp = LinearProgram::new(Sense::Maximize);
        let x = lp.add_var("x", 0.0, 1.0, 1.0);
        lp.add_row("bad", vec![(x, f64::NAN)], Cmp::Le, 1.0);
        assert!(matches!(lp.validate(), Err(SolverError::InvalidModel(_))));
    }

    #[test]
    fn clear_objective_zeroes_columns() {
        let mut lp = LinearProgram::new(Sense::Maximize);
        let x = lp.add_var("x", 0.0, 1.0, 3.0);
        lp.clear_objective();
        assert_eq!(lp.var(x).objective, 0.0);
    }
}

#[cfg(test)]
mod simplex_tests {
    use std::time::Duration;

    use rh_core::SolverDriver;

    use crate::{
        Cmp, LinearProgram, LpSolver, MinilpSolver, Sense, SolveOptions, SolverError,
        check_deadline, solver_for,
    };

    const TOL: f64 = 1e-6;

    #[test]
    fn solves_small_max_problem() {
        let mut lp = LinearProgram::new(Sense::Maximize);
        let x = lp.add_var("x", 0.0, f64::INFINITY, 3.0);
        let y = lp.add_var("y", 0.0, f64::INFINITY, 2.0);
        lp.add_row("r1", vec![(x, 1.0), (y, 1.0)], Cmp::Le, 4.0);
        lp.add_row("r2", vec![(x, 1.0), (y, 3.0)], Cmp::Le, 6.0);
        lp.add_row("r3", vec![(x, 1.0)], Cmp::Le, 3.0);

        let sol = MinilpSolver::new().solve(&lp, &SolveOptions::default()).unwrap();
        assert!((sol.objective - 11.0).abs() < TOL);
        assert!((sol.value(x) - 3.0).abs() < TOL);
        assert!((sol.value(y) - 1.0).abs() < TOL);
        assert_eq!(lp.first_violation(&sol.values, TOL), None);
    }

    #[test]
    fn solves_min_problem_with_ge_rows() {
        let mut lp = LinearProgram::new(Sense::Minimize);
        let x = lp.add_var("x", 0.0, f64::INFINITY, 1.0);
        let y = lp.add_var("y", 0.0, f64::INFINITY, 1.0);
        lp.add_row("cover", vec![(x, 1.0), (y, 2.0)], Cmp::Ge, 4.0);
        lp.add_row("fix", vec![(x, 1.0)], Cmp::Eq, 0.0);
        let sol = MinilpSolver::new().solve(&lp, &SolveOptions::default()).unwrap();
        assert!((sol.objective - 2.0).abs() < TOL);
    }

    #[test]
    fn infeasible_reported() {
        let mut lp = LinearProgram::new(Sense::Maximize);
        let x = lp.add_var("x", 0.0, 1.0, 1.0);
        lp.add_row("lo", vec![(x, 1.0)], Cmp::Ge, 2.0);
        let err = MinilpSolver::new().solve(&lp, &SolveOptions::default()).unwrap_err();
        assert!(matches!(err, SolverError::Infeasible), "got {err:?}");
    }

    #[test]
    fn unbounded_reported() {
        let mut lp = LinearProgram::new(Sense::Maximize);
        let x = lp.add_var("x", 0.0, f64::INFINITY, 1.0);
        lp.add_row("lo", vec![(x, 1.0)], Cmp::Ge, 0.0);
        let err = MinilpSolver::new().solve(&lp, &SolveOptions::default()).unwrap_err();
        assert!(matches!(err, SolverError::Unbounded), "got {err:?}");
    }

    #[test]
    fn empty_program_is_trivially_optimal() {
        let lp = LinearProgram::new(Sense::Maximize);
        let sol = MinilpSolver::new().solve(&lp, &SolveOptions::default()).unwrap();
        assert_eq!(sol.objective, 0.0);
        assert!(sol.values.is_empty());
    }

    #[test]
    fn deadline_overrun_is_time_limit() {
        let limit = Some(Duration::from_millis(10));
        assert!(check_deadline(Duration::from_millis(5), limit).is_ok());
        assert!(check_deadline(Duration::from_secs(100), None).is_ok());
        match check_deadline(Duration::from_millis(11), limit) {
            Err(SolverError::TimeLimit { elapsed, limit }) => {
                assert_eq!(elapsed, Duration::from_millis(11));
                assert_eq!(limit, Duration::from_millis(10));
            }
            other => panic!("expected TimeLimit, got {other:?}"),
        }
    }

    #[test]
    fn options_from_config() {
        let config = rh_core::SolverConfig { time_limit: Some(1.5), mip_gap: Some(0.01), ..Default::default() };
        let opts = SolveOptions::from_config(&config);
        assert_eq!(opts.time_limit, Some(Duration::from_millis(1500)));
        assert_eq!(opts.mip_gap, Some(0.01));
    }

    #[test]
    fn every_driver_has_a_backend() {
        assert_eq!(solver_for(SolverDriver::Auto).unwrap().name(), "minilp");
        assert_eq!(solver_for(SolverDriver::InProcess).unwrap().name(), "minilp");
        assert!(matches!(
            solver_for(SolverDriver::Exec).err(),
            Some(SolverError::UnsupportedDriver("exec"))
        ));
    }
}
