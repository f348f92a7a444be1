//! Command-driven engine wrapper around the search controller.
//!
//! Owns at most one `SearchController`. The first `newGame` spawns it;
//! later ones reset it. Reports are rendered as `Name:value` lines, and
//! the names are announced up front with `subscribe:` lines.

use tracing::{info, warn};

use crate::error::EngineError;
use crate::mcts::{MCTSConfig, SearchController, SearchReport};

use super::command::Command;

/// Names of the values the engine reports.
pub const REPORTED_VALUES: [&str; 3] = ["Best Move", "Score", "Sims"];

/// Engine lifecycle: created idle, runs once a game starts, stopped by
/// `shutdown` or drop.
pub struct Engine {
    config: MCTSConfig,
    controller: Option<SearchController>,
}

impl Engine {
    pub fn new(config: MCTSConfig) -> Self {
        Self {
            config,
            controller: None,
        }
    }

    /// `subscribe:<name>` line for each reported value.
    #[must_use]
    pub fn value_definitions() -> Vec<String> {
        REPORTED_VALUES
            .iter()
            .map(|name| format!("subscribe:{name}"))
            .collect()
    }

    /// Parse and apply one command line.
    ///
    /// Rejected commands leave the running search untouched.
    pub fn handle_line(&mut self, line: &str) -> Result<(), EngineError> {
        let command = line.parse::<Command>().map_err(|err| {
            warn!(%line, error = %err, "rejected command");
            err
        })?;
        self.apply(command)
    }

    pub fn apply(&mut self, command: Command) -> Result<(), EngineError> {
        match command {
            Command::NewGame(size) => {
                match &self.controller {
                    Some(controller) => controller.new_game(size)?,
                    None => {
                        self.controller = Some(SearchController::new(size, self.config.clone())?);
                    }
                }
                info!(size, "new game started");
            }
            Command::Move(at) => {
                self.controller()?.commit_move(at)?;
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn has_game(&self) -> bool {
        self.controller.is_some()
    }

    /// Consistent snapshot from the running search.
    pub fn report(&self) -> Result<SearchReport, EngineError> {
        Ok(self.controller()?.report()?)
    }

    /// Current values as `Name:value` lines.
    pub fn report_lines(&self) -> Result<Vec<String>, EngineError> {
        Ok(format_report(&self.report()?))
    }

    /// Stop the search worker, if any.
    pub fn shutdown(&mut self) {
        if let Some(controller) = self.controller.take() {
            controller.terminate();
        }
    }

    fn controller(&self) -> Result<&SearchController, EngineError> {
        self.controller.as_ref().ok_or(EngineError::NoGame)
    }
}

/// Render a report in the order of `REPORTED_VALUES`.
#[must_use]
pub fn format_report(report: &SearchReport) -> Vec<String> {
    let best = report
        .best_move
        .map_or_else(|| "none".to_string(), |at| at.to_string());
    vec![
        format!("Best Move:{best}"),
        format!("Score:{:.4}", report.score),
        format!("Sims:{}", report.root_sims),
    ]
}
