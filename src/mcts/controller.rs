//! Threaded search controller.
//!
//! One dedicated worker owns the search loop. Callers talk to it over a
//! command channel: commit a move, start a new game, pause, resume or
//! terminate. Root advances and resets are applied only at the top of the
//! loop, never in the middle of a cycle.
//!
//! Pause is a rendezvous: `pause()` returns once the worker has finished
//! its current cycle and acknowledged, and the worker stays parked on the
//! channel until resumed. Snapshots open their own hold/release window,
//! so they never see a half-applied backpropagation and never end a pause
//! some other caller asked for.
//!
//! ```no_run
//! use cubicup::board::Coord;
//! use cubicup::mcts::{MCTSConfig, SearchController};
//!
//! let controller = SearchController::new(4, MCTSConfig::default())?;
//! std::thread::sleep(std::time::Duration::from_millis(200));
//!
//! let report = controller.report()?;
//! println!("best: {:?} score: {:.3}", report.best_move, report.score);
//!
//! controller.commit_move(Coord::new(0, 3, 0))?;
//! controller.terminate();
//! # Ok::<(), cubicup::error::SearchError>(())
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::board::Coord;
use crate::error::SearchError;

use super::config::MCTSConfig;
use super::search::{MCTSSearch, SearchReport};

type Reply = Sender<Result<(), SearchError>>;

/// Requests handled at the top of the worker loop.
enum Control {
    Advance(Coord, Reply),
    Reset(u8, Reply),
    Pause(Sender<()>),
    Resume,
    /// Open a snapshot window; acknowledged once parked.
    Hold(Sender<()>),
    /// Close one snapshot window.
    Release,
    Terminate,
}

enum Poll {
    Message(Control),
    Empty,
    Closed,
}

/// Owner of the search worker thread.
pub struct SearchController {
    commands: Sender<Control>,
    search: Arc<Mutex<MCTSSearch>>,
    /// Paused at the caller's request (as opposed to a snapshot window).
    paused: AtomicBool,
    worker: Option<JoinHandle<()>>,
}

impl SearchController {
    /// Start searching a new game of side `size`.
    pub fn new(size: u8, config: MCTSConfig) -> Result<Self, SearchError> {
        Ok(Self::spawn(MCTSSearch::new(size, config)?))
    }

    /// Hand `search` to a fresh worker thread.
    pub fn spawn(search: MCTSSearch) -> Self {
        let idle = search.config().idle_interval();
        let search = Arc::new(Mutex::new(search));
        let (commands, rx) = mpsc::channel();

        let shared = Arc::clone(&search);
        let worker = thread::spawn(move || worker_loop(shared, rx, idle));

        Self {
            commands,
            search,
            paused: AtomicBool::new(false),
            worker: Some(worker),
        }
    }

    /// Advance the root past a move played in the real game.
    ///
    /// Blocks until the worker has applied it. Fails with `NoSuchChild`
    /// for a move not available at the root, which stays unchanged.
    pub fn commit_move(&self, at: Coord) -> Result<(), SearchError> {
        let (tx, rx) = mpsc::channel();
        self.send(Control::Advance(at, tx))?;
        rx.recv().map_err(|_| SearchError::WorkerStopped)?
    }

    /// Discard the tree and search a new game of side `size`.
    pub fn new_game(&self, size: u8) -> Result<(), SearchError> {
        let (tx, rx) = mpsc::channel();
        self.send(Control::Reset(size, tx))?;
        rx.recv().map_err(|_| SearchError::WorkerStopped)?
    }

    /// Park the worker at the next cycle boundary.
    ///
    /// Stays parked until `resume`, whatever snapshots come and go.
    pub fn pause(&self) -> Result<(), SearchError> {
        let (ack_tx, ack_rx) = mpsc::channel();
        self.send(Control::Pause(ack_tx))?;
        ack_rx.recv().map_err(|_| SearchError::WorkerStopped)?;
        self.paused.store(true, Ordering::SeqCst);
        Ok(())
    }

    pub fn resume(&self) -> Result<(), SearchError> {
        self.paused.store(false, Ordering::SeqCst);
        self.send(Control::Resume)
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Run `read` against the search while the worker is parked.
    ///
    /// Closing the window only lets the worker go if no pause is held.
    pub fn with_paused<R>(&self, read: impl FnOnce(&MCTSSearch) -> R) -> Result<R, SearchError> {
        self.parked(|search| read(&*search))
    }

    /// Consistent snapshot of the current search.
    pub fn report(&self) -> Result<SearchReport, SearchError> {
        self.with_paused(MCTSSearch::report)
    }

    /// Take the most recent degraded-mode error, if any.
    pub fn take_error(&self) -> Result<Option<SearchError>, SearchError> {
        self.parked(MCTSSearch::take_error)
    }

    /// Stop the worker and wait for it to exit.
    pub fn terminate(mut self) {
        self.shutdown();
    }

    fn parked<R>(&self, f: impl FnOnce(&mut MCTSSearch) -> R) -> Result<R, SearchError> {
        let (ack_tx, ack_rx) = mpsc::channel();
        self.send(Control::Hold(ack_tx))?;
        ack_rx.recv().map_err(|_| SearchError::WorkerStopped)?;

        let out = {
            let mut guard = lock(&self.search);
            f(&mut *guard)
        };

        self.send(Control::Release)?;
        Ok(out)
    }

    fn send(&self, control: Control) -> Result<(), SearchError> {
        self.commands
            .send(control)
            .map_err(|_| SearchError::WorkerStopped)
    }

    fn shutdown(&mut self) {
        if let Some(worker) = self.worker.take() {
            // The worker may already be gone; joining is enough then
            let _ = self.commands.send(Control::Terminate);
            if worker.join().is_err() {
                warn!("search worker panicked");
            }
        }
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn lock(search: &Mutex<MCTSSearch>) -> MutexGuard<'_, MCTSSearch> {
    // A panicked cycle leaves the tree as it was at the last boundary
    search.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn worker_loop(search: Arc<Mutex<MCTSSearch>>, rx: Receiver<Control>, idle: Duration) {
    info!("search worker started");
    // Caller pause and open snapshot windows are tracked apart so a
    // closing window never ends a pause
    let mut paused = false;
    let mut windows = 0u32;
    let mut idle_wait = false;

    loop {
        // Drain requests; park here while paused or idle
        loop {
            let poll = if paused || windows > 0 {
                match rx.recv() {
                    Ok(control) => Poll::Message(control),
                    Err(_) => Poll::Closed,
                }
            } else if idle_wait {
                idle_wait = false;
                match rx.recv_timeout(idle) {
                    Ok(control) => Poll::Message(control),
                    Err(RecvTimeoutError::Timeout) => Poll::Empty,
                    Err(RecvTimeoutError::Disconnected) => Poll::Closed,
                }
            } else {
                match rx.try_recv() {
                    Ok(control) => Poll::Message(control),
                    Err(TryRecvError::Empty) => Poll::Empty,
                    Err(TryRecvError::Disconnected) => Poll::Closed,
                }
            };

            match poll {
                Poll::Message(Control::Terminate) | Poll::Closed => {
                    info!("search worker stopped");
                    return;
                }
                Poll::Message(Control::Pause(ack)) => {
                    paused = true;
                    let _ = ack.send(());
                }
                Poll::Message(Control::Resume) => paused = false,
                Poll::Message(Control::Hold(ack)) => {
                    windows += 1;
                    let _ = ack.send(());
                }
                Poll::Message(Control::Release) => windows = windows.saturating_sub(1),
                Poll::Message(Control::Advance(at, reply)) => {
                    let _ = reply.send(lock(&search).update_with_turn(at));
                }
                Poll::Message(Control::Reset(size, reply)) => {
                    let _ = reply.send(lock(&search).reset(size));
                }
                Poll::Empty => break,
            }
        }

        let mut guard = lock(&search);
        match guard.step() {
            Ok(true) => {}
            Ok(false) => {
                debug!(sims = guard.root_sims(), "search budget spent; idling");
                idle_wait = true;
            }
            Err(err) => {
                warn!(error = %err, "search cycle failed");
                guard.record_error(err);
                idle_wait = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameState;

    fn controller(size: u8) -> SearchController {
        SearchController::new(size, MCTSConfig::default().with_idle_interval_ms(1)).unwrap()
    }

    #[test]
    fn test_pause_freezes_tree() {
        let controller = controller(4);
        thread::sleep(Duration::from_millis(20));

        controller.pause().unwrap();
        assert!(controller.is_paused());
        let first = controller.report().unwrap();
        thread::sleep(Duration::from_millis(20));
        let second = controller.report().unwrap();
        assert_eq!(first, second);
        assert!(controller.is_paused());

        controller.resume().unwrap();
        assert!(!controller.is_paused());
        controller.terminate();
    }

    #[test]
    fn test_commit_move_advances_root() {
        let controller = controller(3);
        controller.commit_move(Coord::new(0, 2, 0)).unwrap();

        let state = controller.with_paused(|s| s.root_state().clone()).unwrap();
        let mut expected = GameState::new(3).unwrap();
        expected.apply_move(Coord::new(0, 2, 0)).unwrap();
        assert_eq!(state, expected);
    }

    #[test]
    fn test_commit_unknown_move() {
        let controller = controller(3);
        assert_eq!(
            controller.commit_move(Coord::APEX),
            Err(SearchError::NoSuchChild(Coord::APEX))
        );
        let state = controller.with_paused(|s| s.root_state().clone()).unwrap();
        assert_eq!(state, GameState::new(3).unwrap());
    }

    #[test]
    fn test_new_game() {
        let controller = controller(3);
        controller.new_game(5).unwrap();
        assert_eq!(controller.with_paused(|s| s.root_state().size()).unwrap(), 5);

        assert!(matches!(controller.new_game(0), Err(SearchError::Game(_))));
    }

    #[test]
    fn test_commands_apply_while_paused() {
        let controller = controller(3);
        controller.pause().unwrap();
        controller.commit_move(Coord::new(2, 0, 0)).unwrap();

        let (last, turn) = controller
            .with_paused(|s| (s.root_state().last_move(), s.root_state().turn()))
            .unwrap();
        assert_eq!(last, Some(Coord::new(2, 0, 0)));
        assert_eq!(turn, crate::core::Color::Green);
        assert!(controller.is_paused());
    }

    #[test]
    fn test_solved_game_idles() {
        let controller = controller(1);
        let mut report = controller.report().unwrap();
        for _ in 0..200 {
            if report.solved.is_some() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
            report = controller.report().unwrap();
        }
        assert!(report.solved.is_some());
        assert_eq!(report.root_sims, 2);
        assert_eq!(report.best_move, Some(Coord::APEX));
    }
}
