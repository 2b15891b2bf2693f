use criterion::{black_box, Criterion, criterion_group, criterion_main};
use faer::Mat;
use faer::linalg::solvers::SolveCore;
use parareg::solver::{GaussSolver, LinearSolver};
use parareg::{ols_serial, OlsEngine, ProblemShape, RayonComm, SyntheticData};

fn bench_gauss_vs_faer(c: &mut Criterion) {
    let n = 200;
    let data: Vec<f64> = (0..n*n).map(|i| (i as f64).sin()).collect();
    let a = Mat::from_fn(n, n, |i, j| data[j * n + i] + if i == j { n as f64 } else { 0.0 });
    let b: Vec<f64> = (0..n).map(|i| (i as f64).cos()).collect();
    let mut x = vec![0.0; n];

    c.bench_function("parareg Gauss", |ben| {
        let mut solver = GaussSolver::new();
        ben.iter(|| {
            let _stats = solver.solve(black_box(&a), black_box(&b), black_box(&mut x)).unwrap();
        })
    });

    c.bench_function("faer raw LU", |ben| {
        ben.iter(|| {
            let factor = faer::linalg::solvers::FullPivLu::new(a.as_ref());
            let mut y = b.clone();
            let n = y.len();
            let y_mat = faer::MatMut::from_column_major_slice_mut(&mut y, n, 1);
            factor.solve_in_place_with_conj(faer::Conj::No, y_mat);
        })
    });
}

fn bench_ols_serial_vs_group(c: &mut Criterion) {
    let shape = ProblemShape::new(20_000, 32).unwrap();
    let problem = SyntheticData::generate(shape, 42).unwrap();

    c.bench_function("OLS serial", |ben| {
        ben.iter(|| ols_serial(black_box(&problem.dataset().unwrap())).unwrap())
    });

    c.bench_function("OLS 4 workers", |ben| {
        ben.iter(|| {
            RayonComm::run(4, |comm| {
                let dataset = (parareg::Comm::rank(comm) == 0).then(|| problem.dataset().unwrap());
                OlsEngine::new().run(comm, shape, dataset.as_ref()).unwrap()
            })
            .unwrap()
        })
    });
}

criterion_group!(benches, bench_gauss_vs_faer, bench_ols_serial_vs_group);
criterion_main!(benches);
