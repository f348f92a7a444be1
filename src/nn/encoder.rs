//! Board encoding and grid-shaped policy adapters.
//!
//! Networks for this game see the board as a `(size+1)^3` cube of cell
//! codes and answer with a policy over the same cube. `GridPolicy` adapts
//! such a model to the per-move `PolicyNetwork` contract.

use crate::core::GameState;
use crate::nn::traits::{EncodedState, NetworkError, PolicyNetwork, Prediction};

/// Encodes game state into tensors for network input.
pub trait StateEncoder: Send {
    fn encode(&self, state: &GameState) -> EncodedState;

    /// Shape of encoded states for a board of side `size`.
    fn output_shape(&self, size: u8) -> Vec<usize>;
}

/// Cube of raw cell codes: -2 empty, -1 base, 0 Blue, 1 Green.
#[derive(Clone, Copy, Debug, Default)]
pub struct CellCodeEncoder;

impl StateEncoder for CellCodeEncoder {
    fn encode(&self, state: &GameState) -> EncodedState {
        let tensor = state.board().cells().iter().map(|c| c.code()).collect();
        EncodedState::new(tensor, self.output_shape(state.size()))
    }

    fn output_shape(&self, size: u8) -> Vec<usize> {
        let side = size as usize + 1;
        vec![side, side, side]
    }
}

/// Pick the priors of the available moves out of a full policy cube.
pub fn priors_from_grid(state: &GameState, grid: &[f32]) -> Result<Vec<f32>, NetworkError> {
    let board = state.board();
    let expected = board.cells().len();
    if grid.len() != expected {
        return Err(NetworkError::ShapeMismatch {
            expected,
            got: grid.len(),
        });
    }
    Ok(state
        .available_moves()
        .iter()
        .map(|&m| grid[board.index(m)])
        .collect())
}

/// Adapter from a cube-in, cube-out model to `PolicyNetwork`.
///
/// The model returns the policy cube and an optional value for the side to
/// move.
pub struct GridPolicy<F> {
    model: F,
}

impl<F> GridPolicy<F>
where
    F: Fn(&EncodedState) -> Result<(Vec<f32>, Option<f32>), NetworkError> + Send,
{
    pub fn new(model: F) -> Self {
        Self { model }
    }
}

impl<F> PolicyNetwork for GridPolicy<F>
where
    F: Fn(&EncodedState) -> Result<(Vec<f32>, Option<f32>), NetworkError> + Send,
{
    fn predict(&self, state: &GameState) -> Result<Prediction, NetworkError> {
        let encoded = CellCodeEncoder.encode(state);
        let (grid, value) = (self.model)(&encoded)?;
        Ok(Prediction {
            priors: priors_from_grid(state, &grid)?,
            value,
        })
    }
}
