//! Threaded controller and command-surface tests.

use std::sync::Once;
use std::thread;
use std::time::Duration;

use cubicup::board::Coord;
use cubicup::error::{EngineError, SearchError};
use cubicup::mcts::{MCTSConfig, SearchController};
use cubicup::protocol::Engine;

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive("cubicup=debug".parse().unwrap()),
            )
            .with_test_writer()
            .try_init();
    });
}

fn config() -> MCTSConfig {
    MCTSConfig::default().with_idle_interval_ms(1)
}

// =============================================================================
// Controller
// =============================================================================

#[test]
fn test_snapshots_are_consistent() {
    init_tracing();
    let controller = SearchController::new(5, config()).unwrap();

    for _ in 0..20 {
        thread::sleep(Duration::from_millis(2));
        let consistent = controller
            .with_paused(|search| {
                let tree = search.tree();
                tree.iter().all(|(_, node)| {
                    let children: u32 = node
                        .children
                        .iter()
                        .filter(|c| !c.is_none())
                        .map(|&c| tree.get(c).sims)
                        .sum();
                    node.sims >= children
                })
            })
            .unwrap();
        assert!(consistent);
    }
    controller.terminate();
}

#[test]
fn test_search_progresses_between_reports() {
    init_tracing();
    let controller = SearchController::new(5, config()).unwrap();

    let first = controller.report().unwrap().root_sims;
    let mut later = first;
    for _ in 0..100 {
        thread::sleep(Duration::from_millis(5));
        later = controller.report().unwrap().root_sims;
        if later > first {
            break;
        }
    }
    assert!(later > first);
}

#[test]
fn test_pause_during_snapshot_survives_release() {
    init_tracing();
    let controller = SearchController::new(5, config()).unwrap();
    thread::sleep(Duration::from_millis(10));

    thread::scope(|scope| {
        let (entered_tx, entered_rx) = std::sync::mpsc::channel();
        let reader = scope.spawn(|| {
            controller
                .with_paused(move |search| {
                    entered_tx.send(()).unwrap();
                    thread::sleep(Duration::from_millis(50));
                    search.root_sims()
                })
                .unwrap()
        });

        entered_rx.recv().unwrap();
        controller.pause().unwrap();
        reader.join().unwrap();
    });

    assert!(controller.is_paused());
    let before = controller.report().unwrap().root_sims;
    thread::sleep(Duration::from_millis(50));
    let after = controller.report().unwrap().root_sims;
    assert_eq!(before, after);

    controller.resume().unwrap();
    let mut later = after;
    for _ in 0..100 {
        thread::sleep(Duration::from_millis(5));
        later = controller.report().unwrap().root_sims;
        if later > after {
            break;
        }
    }
    assert!(later > after);
}

#[test]
fn test_overlapping_snapshots_release_worker() {
    init_tracing();
    let controller = SearchController::new(5, config()).unwrap();

    thread::scope(|scope| {
        let readers: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    for _ in 0..10 {
                        controller
                            .with_paused(|_| thread::sleep(Duration::from_millis(1)))
                            .unwrap();
                    }
                })
            })
            .collect();
        for reader in readers {
            reader.join().unwrap();
        }
    });

    assert!(!controller.is_paused());
    let first = controller.report().unwrap().root_sims;
    let mut later = first;
    for _ in 0..100 {
        thread::sleep(Duration::from_millis(5));
        later = controller.report().unwrap().root_sims;
        if later > first {
            break;
        }
    }
    assert!(later > first);
}

#[test]
fn test_sims_per_move_budget_idles_worker() {
    init_tracing();
    let controller = SearchController::new(5, config().with_sims_per_move(50)).unwrap();

    let mut sims = 0;
    for _ in 0..200 {
        sims = controller.report().unwrap().root_sims;
        if sims == 50 {
            break;
        }
        thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(sims, 50);

    // Budget refreshes after a committed move
    let best = controller.report().unwrap().best_move.unwrap();
    controller.commit_move(best).unwrap();
    let since = controller.with_paused(|s| s.sims_since_move()).unwrap();
    assert!(since <= 50);
}

#[test]
fn test_commit_unknown_move_is_reported() {
    init_tracing();
    let controller = SearchController::new(3, config()).unwrap();
    let bogus = Coord::new(1, 1, 1);

    assert_eq!(controller.commit_move(bogus), Err(SearchError::NoSuchChild(bogus)));
    // The worker is still serving
    controller.commit_move(Coord::new(0, 2, 0)).unwrap();
}

#[test]
fn test_drop_stops_worker() {
    init_tracing();
    let controller = SearchController::new(4, config()).unwrap();
    controller.pause().unwrap();
    drop(controller);
}

// =============================================================================
// Engine
// =============================================================================

#[test]
fn test_engine_session() {
    init_tracing();
    let mut engine = Engine::new(config());
    assert_eq!(engine.handle_line("move:0,0,0"), Err(EngineError::NoGame));

    engine.handle_line("newGame:4").unwrap();
    engine.handle_line("move:0,3,0").unwrap();
    assert!(engine.handle_line("move:9,9").is_err());

    let lines = engine.report_lines().unwrap();
    assert!(lines[0].starts_with("Best Move:"));
    assert!(lines[1].starts_with("Score:"));
    assert!(lines[2].starts_with("Sims:"));

    // A fresh game replaces the old one
    engine.handle_line("newGame:1").unwrap();
    let mut report = engine.report().unwrap();
    for _ in 0..200 {
        if report.solved.is_some() {
            break;
        }
        thread::sleep(Duration::from_millis(5));
        report = engine.report().unwrap();
    }
    assert_eq!(report.best_move, Some(Coord::APEX));
    engine.shutdown();
}
