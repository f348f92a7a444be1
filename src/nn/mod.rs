//! Policy/value collaborator integration.
//!
//! - **Traits**: `PolicyNetwork` (per-move priors plus optional value)
//! - **Encoding**: `StateEncoder` and the `CellCodeEncoder` cube encoding
//! - **Adapters**: `GridPolicy` for models that answer with a policy cube
//! - **Baseline**: `UniformPolicy` for testing
//!
//! ```rust,ignore
//! use cubicup::nn::GridPolicy;
//!
//! let policy = GridPolicy::new(|encoded| model.run(encoded));
//! let search = MCTSSearch::new(size, config)?.with_network(policy);
//! ```

pub mod encoder;
pub mod traits;

pub use encoder::{priors_from_grid, CellCodeEncoder, GridPolicy, StateEncoder};
pub use traits::{EncodedState, NetworkError, PolicyNetwork, Prediction, UniformPolicy};
