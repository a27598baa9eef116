//! Path evaluator trait for scoring playouts.
//!
//! The evaluator turns a complete goal path into a scalar cost. Lower scores
//! are better. Evaluation is typically the expensive part of a search, which
//! is why the engine caches every score by path.

use search_core::SearchPath;
use thiserror::Error;

/// Errors that can occur during evaluation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// The path could not be scored; the search records a penalty instead.
    #[error("Evaluation failed: {0}")]
    Failed(String),

    /// The evaluator was interrupted before it produced a score.
    #[error("Evaluation was interrupted")]
    Interrupted,
}

/// Trait for path evaluators.
///
/// Implementations must be callable many times with distinct paths. The
/// search guarantees that one path value is scored at most once.
pub trait PathEvaluator<N, A>: Send + Sync {
    fn evaluate(&self, path: &SearchPath<N, A>) -> Result<f64, EvaluationError>;
}

/// Evaluator backed by a closure.
#[derive(Clone)]
pub struct FnEvaluator<F> {
    f: F,
}

impl<F> FnEvaluator<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> std::fmt::Debug for FnEvaluator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnEvaluator")
    }
}

impl<N, A, F> PathEvaluator<N, A> for FnEvaluator<F>
where
    F: Fn(&SearchPath<N, A>) -> Result<f64, EvaluationError> + Send + Sync,
{
    fn evaluate(&self, path: &SearchPath<N, A>) -> Result<f64, EvaluationError> {
        (self.f)(path)
    }
}

/// Scores every path by its number of arcs. Handy for smoke tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathLengthEvaluator;

impl<N, A> PathEvaluator<N, A> for PathLengthEvaluator {
    fn evaluate(&self, path: &SearchPath<N, A>) -> Result<f64, EvaluationError> {
        Ok(path.depth() as f64)
    }
}

impl<N, A, E: PathEvaluator<N, A> + ?Sized> PathEvaluator<N, A> for &E {
    fn evaluate(&self, path: &SearchPath<N, A>) -> Result<f64, EvaluationError> {
        (**self).evaluate(path)
    }
}
