//! Self-play and training data collection.
//!
//! - **GameRecord**: a complete game with per-ply boards, moves, search
//!   probabilities and the end score
//! - **SelfPlayer**: plays games with a fixed simulation budget per move
//!
//! ## Usage
//!
//! ```rust
//! use cubicup::training::{SelfPlayConfig, SelfPlayer};
//!
//! let mut player = SelfPlayer::new(SelfPlayConfig::default().with_sims_per_move(50));
//! let record = player.play_game(3)?;
//!
//! assert!(record.is_finished());
//! let samples = record.to_training_samples();
//! assert_eq!(samples.len(), record.len());
//! # Ok::<(), cubicup::error::SearchError>(())
//! ```

pub mod record;
pub mod self_play;

pub use record::{GameRecord, Ply, TrainingSample};
pub use self_play::{SelfPlayConfig, SelfPlayer};
