//! Policy/value collaborator contract.
//!
//! The search core only needs, for a state, one prior per available move
//! (same order as `GameState::available_moves`) and optionally a value
//! estimate that can stand in for a random rollout. Model loading,
//! training and inference live outside this crate.
//!
//! Implementations are called synchronously on the search worker thread;
//! a slow `predict` slows the whole search down.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::GameState;

/// Failures reported by a policy/value collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("inference failed: {0}")]
    Inference(String),

    #[error("policy shape mismatch: expected {expected} values, got {got}")]
    ShapeMismatch { expected: usize, got: usize },
}

/// Encoded game state as a flat tensor for network input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodedState {
    /// Flattened tensor data (row-major order).
    pub tensor: Vec<f32>,

    /// Shape of the tensor.
    pub shape: Vec<usize>,
}

impl EncodedState {
    pub fn new(tensor: Vec<f32>, shape: Vec<usize>) -> Self {
        debug_assert_eq!(
            tensor.len(),
            shape.iter().product::<usize>(),
            "Tensor length must match shape product"
        );
        Self { tensor, shape }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tensor.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tensor.is_empty()
    }
}

/// Output of one collaborator call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Prediction {
    /// One prior per available move, in move-list order. Expected to sum
    /// to at most 1; not enforced.
    pub priors: Vec<f32>,

    /// Optional value in `[-1, 1]` from the perspective of the side to
    /// move. When present it replaces the random rollout for this state.
    pub value: Option<f32>,
}

/// A policy (and optionally value) model consulted by the search.
pub trait PolicyNetwork: Send {
    fn predict(&self, state: &GameState) -> Result<Prediction, NetworkError>;
}

/// Equal priors over the available moves, no value (baseline for testing).
#[derive(Clone, Debug, Default)]
pub struct UniformPolicy;

impl PolicyNetwork for UniformPolicy {
    fn predict(&self, state: &GameState) -> Result<Prediction, NetworkError> {
        let n = state.available_moves().len();
        let priors = if n == 0 { Vec::new() } else { vec![1.0 / n as f32; n] };
        Ok(Prediction { priors, value: None })
    }
}
