//! End-to-end OLS and GD runs across worker groups.
//!
//! These tests generate seeded synthetic problems, run both estimators on
//! groups of 1, 2, 4 and 8 in-process workers, and compare against the
//! single-process baselines and the ground truth.

#![cfg(feature = "rayon")]

use approx::assert_abs_diff_eq;
use parareg::regression::{gd_serial, ols_serial};
use parareg::utils::{residual_mse, timed, vector_diff_norm};
use parareg::{
    Comm, Dataset, GdEngine, GdOptions, OlsEngine, ProblemShape, RayonComm, RegError, Role,
    SyntheticData,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn ols_on(workers: usize, data: &SyntheticData) -> Result<Vec<f64>, RegError> {
    let outcomes = RayonComm::run(workers, |comm| {
        let dataset = (comm.rank() == 0).then(|| data.dataset()).transpose()?;
        OlsEngine::new().run(comm, data.shape, dataset.as_ref())
    })?;
    let mut beta = None;
    for outcome in outcomes {
        if let Some(b) = outcome? {
            beta = Some(b);
        }
    }
    beta.ok_or_else(|| RegError::Protocol("no coordinator result".into()))
}

fn gd_on(workers: usize, data: &SyntheticData, opts: GdOptions) -> Vec<f64> {
    let engine = GdEngine::new(opts).unwrap();
    let outcomes = RayonComm::run(workers, |comm| {
        let dataset = (comm.rank() == 0).then(|| data.dataset().unwrap());
        engine.run(comm, data.shape, dataset.as_ref()).unwrap()
    })
    .unwrap();
    outcomes.into_iter().flatten().next().unwrap()
}

/// n=100, d=5, seed=42: serial and distributed OLS agree and reruns are exact.
#[test]
fn ols_reference_scenario() {
    init_logging();
    let data = SyntheticData::generate(ProblemShape::new(100, 5).unwrap(), 42).unwrap();
    let serial = ols_serial(&data.dataset().unwrap()).unwrap();
    assert_eq!(serial, ols_serial(&data.dataset().unwrap()).unwrap());

    for workers in [1, 2, 4, 8] {
        let dist = ols_on(workers, &data).unwrap();
        assert!(vector_diff_norm(&serial, &dist) < 1e-6, "workers = {workers}");
        assert_eq!(dist, ols_on(workers, &data).unwrap(), "rerun with {workers} workers");
    }
    // noise is small relative to the signal
    assert!(vector_diff_norm(&serial, &data.beta_true) < 1.0);
}

/// GD results agree across worker counts and with the serial loop.
#[test]
fn gd_worker_count_invariance() {
    init_logging();
    let data = SyntheticData::generate(ProblemShape::new(150, 6).unwrap(), 7).unwrap();
    let opts = GdOptions::new(200, 0.05).unwrap();
    let serial = gd_serial(&data.dataset().unwrap(), opts).unwrap();
    for workers in [1, 2, 4, 8] {
        let dist = gd_on(workers, &data, opts);
        for (a, b) in dist.iter().zip(&serial) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-6);
        }
    }
}

/// Noiseless data: GD approaches the truth and the residual never grows.
#[test]
fn gd_converges_monotonically_on_exact_data() {
    init_logging();
    let shape = ProblemShape::new(100, 5).unwrap();
    let data = SyntheticData::noiseless(shape, 42).unwrap();
    let dataset = data.dataset().unwrap();
    let opts = GdOptions::new(1000, 0.01).unwrap();

    let comm = parareg::SerialComm::new();
    let Role::Coordinator(coord) = Role::of(&comm).unwrap() else {
        panic!("single rank must coordinate");
    };
    let mut history = vec![residual_mse(&dataset, &[0.0; 5]).unwrap()];
    let beta = GdEngine::new(opts)
        .unwrap()
        .coordinate_observed(&coord, &dataset, |_, b| {
            history.push(residual_mse(&dataset, b).unwrap());
        })
        .unwrap();

    assert_eq!(history.len(), 1001);
    for pair in history.windows(2) {
        assert!(pair[1] <= pair[0], "residual grew: {} -> {}", pair[0], pair[1]);
    }
    assert!(vector_diff_norm(&beta, &data.beta_true) < 0.5);
    assert_eq!(beta, gd_serial(&dataset, opts).unwrap());
}

/// Uneven partitions still normalize by the global sample count.
#[test]
fn gd_step_uses_global_sample_count() {
    let shape = ProblemShape::new(7, 1).unwrap();
    let x = vec![1.0; 7];
    let y = vec![2.0; 7];
    let data = SyntheticData { shape, x, y, beta_true: vec![2.0] };
    // one step from zero: beta = lr / n * sum(x*y) = lr * 2
    let beta = gd_on(3, &data, GdOptions::new(1, 0.5).unwrap());
    assert_abs_diff_eq!(beta[0], 1.0, epsilon = 1e-12);
}

/// A singular system fails at the coordinator while workers finish cleanly.
#[test]
fn singular_ols_fails_only_at_coordinator() {
    init_logging();
    let n = 40;
    let shape = ProblemShape::new(n, 3).unwrap();
    // third column duplicates the first
    let x: Vec<f64> = (0..n)
        .flat_map(|i| {
            let a = (i as f64 * 0.37).sin();
            [a, (i as f64).cos(), a]
        })
        .collect();
    let y: Vec<f64> = (0..n).map(|i| i as f64).collect();

    let outcomes = RayonComm::run(4, |comm| {
        let dataset = (comm.rank() == 0).then(|| Dataset::new(&x, &y, shape).unwrap());
        OlsEngine::new().run(comm, shape, dataset.as_ref())
    })
    .unwrap();
    assert!(matches!(outcomes[0], Err(RegError::SingularMatrix { .. })), "{:?}", outcomes[0]);
    for outcome in &outcomes[1..] {
        assert_eq!(outcome, &Ok(None));
    }
}

/// Precondition failures surface before any collective starts.
#[test]
fn invalid_shapes_are_rejected() {
    assert!(matches!(ProblemShape::new(4, 5), Err(RegError::Precondition(_))));
    assert!(matches!(ProblemShape::new(0, 0), Err(RegError::Precondition(_))));
    assert!(matches!(RayonComm::run(0, |_| ()), Err(RegError::Precondition(_))));
}

/// Element counts beyond `usize` are refused instead of overflowing.
#[test]
fn overflowing_element_count_is_rejected() {
    assert!(matches!(ProblemShape::new(1 << 33, 1 << 31), Err(RegError::Precondition(_))));
    let unchecked = ProblemShape { samples: usize::MAX / 2, features: 4 };
    assert!(matches!(SyntheticData::generate(unchecked, 1), Err(RegError::Precondition(_))));
}

/// The coordinator failing before the first collective releases the workers.
#[test]
fn coordinator_failure_before_timing_releases_workers() {
    init_logging();
    let shape = ProblemShape { samples: usize::MAX / 2, features: 4 };
    let outcomes = RayonComm::run(4, |comm| {
        let data = if comm.rank() == 0 {
            Some(SyntheticData::generate(shape, 3)?)
        } else {
            None
        };
        let dataset = data.as_ref().map(|s| s.dataset()).transpose()?;
        let (beta, _) = timed(comm, || OlsEngine::new().run(comm, shape, dataset.as_ref()))?;
        beta
    })
    .unwrap();
    assert!(matches!(outcomes[0], Err(RegError::Precondition(_))), "{:?}", outcomes[0]);
    for outcome in &outcomes[1..] {
        assert_eq!(outcome, &Err(RegError::PeerLost { rank: 0 }));
    }
}
