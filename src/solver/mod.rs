//! Direct solver interface.

/// Outcome of a solve.
#[derive(Clone, Debug)]
pub struct SolveStats<T> {
    /// ‖b − A·x‖₂ against the caller's unmodified `A` and `b`.
    pub final_residual: T,
}

/// Common interface for any direct solver.
pub trait LinearSolver<M, V> {
    type Error;
    type Scalar: Copy + PartialOrd;
    /// Solve A·x = b, writing result into `x`.
    /// `a` and `b` are never modified.
    fn solve(
        &mut self,
        a: &M,
        b: &V,
        x: &mut V,
    ) -> Result<SolveStats<<Self as LinearSolver<M, V>>::Scalar>, Self::Error>;
}

pub mod gauss;
pub use gauss::GaussSolver;
