//! Offline weight learning for PASTEL models.
//!
//! Labelled sentences are answered by the scorer, stacked into a design matrix and fitted
//! by least squares starting from all-ones weights. Training does not retry at the batch
//! level: bad data is for the operator to fix.

pub mod learner;
pub mod solver;


pub use learner::{
    EvaluationReport, TrainingExample, evaluate_weights, learn_weights, load_examples,
    sum_squared_error, train_model,
};
pub use solver::{SolverOptions, SolverReport, least_squares, solve_linear_system};
