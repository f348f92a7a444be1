//! Line-oriented command surface.
//!
//! Commands arrive as `newGame:<n>` or `move:<x>,<y>,<z>`; reports go out
//! as `Best Move:(x,y,z)`, `Score:<f>` and `Sims:<n>`. Reading and writing
//! the lines is left to the embedding process.

pub mod command;
pub mod engine;

pub use command::Command;
pub use engine::{format_report, Engine, REPORTED_VALUES};
