//! Run-level tests against a scripted engine.
//!
//! The Stockfish test at the bottom needs a real binary.
//! Run with: `cargo test -p cybersjakk-core --test run -- --ignored`

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use cybersjakk_core::engine::{Engine, EngineError, Evaluation, PositionAnalysis};
use cybersjakk_core::{run, AnalysisConfig, Error};
use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Position};
use tempfile::{NamedTempFile, TempDir};

const NAJDORF: [&str; 10] = ["e4", "c5", "Nf3", "d6", "d4", "cxd4", "Nxd4", "Nf6", "Nc3", "a6"];

/// Shared view of what the fake engine saw
#[derive(Default, Clone)]
struct Recorder {
    quits: Rc<Cell<u32>>,
    fens: Rc<RefCell<Vec<String>>>,
    limits: Rc<RefCell<Vec<Duration>>>,
}

struct FakeEngine {
    recorder: Recorder,
    with_pv: bool,
    fail_on_call: Option<usize>,
}

impl Engine for FakeEngine {
    fn analyse(&mut self, position: &Chess, limit: Duration) -> Result<PositionAnalysis, EngineError> {
        let call = self.recorder.fens.borrow().len() + 1;
        if self.fail_on_call == Some(call) {
            return Err(EngineError::Closed);
        }

        self.recorder
            .fens
            .borrow_mut()
            .push(Fen::from_position(position, EnPassantMode::Legal).to_string());
        self.recorder.limits.borrow_mut().push(limit);

        let pv = if self.with_pv {
            position
                .legal_moves()
                .first()
                .map(|m| m.to_uci(CastlingMode::Standard))
                .into_iter()
                .collect()
        } else {
            Vec::new()
        };

        Ok(PositionAnalysis::new(Evaluation::Centipawns(call as i32 * 10), pv))
    }

    fn quit(&mut self) -> Result<(), EngineError> {
        self.recorder.quits.set(self.recorder.quits.get() + 1);
        Ok(())
    }
}

struct Fixture {
    _engine_file: NamedTempFile,
    _dir: TempDir,
    config: AnalysisConfig,
}

impl Fixture {
    fn new(moves: &[&str]) -> Self {
        let engine_file = NamedTempFile::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig::default()
            .with_engine_path(engine_file.path())
            .with_output_dir(dir.path().join("cybersjakk_analyse"))
            .with_moves(moves.iter().copied());
        Self {
            _engine_file: engine_file,
            _dir: dir,
            config,
        }
    }

    fn output(&self) -> &Path {
        &self.config.output_dir
    }

    fn files(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.output())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

fn launcher(
    recorder: &Recorder,
    with_pv: bool,
    fail_on_call: Option<usize>,
) -> impl FnOnce(&Path) -> Result<FakeEngine, EngineError> {
    let recorder = recorder.clone();
    move |_path: &Path| {
        Ok(FakeEngine {
            recorder,
            with_pv,
            fail_on_call,
        })
    }
}

fn reference_fens(moves: &[&str]) -> Vec<String> {
    let mut position = Chess::default();
    let mut fens = Vec::new();
    for san in moves {
        let mv = san.parse::<San>().unwrap().to_move(&position).unwrap();
        position = position.play(mv).unwrap();
        fens.push(Fen::from_position(&position, EnPassantMode::Legal).to_string());
    }
    fens
}

#[test]
fn test_three_move_scenario() {
    let fixture = Fixture::new(&["e4", "c5", "Nf3"]);
    let recorder = Recorder::default();

    let summary = run(&fixture.config, launcher(&recorder, true, None), |_| {}).unwrap();

    assert_eq!(summary.reports.len(), 3);
    assert_eq!(
        fixture.files(),
        vec!["trekk_01_e4.svg", "trekk_02_c5.svg", "trekk_03_Nf3.svg"]
    );

    for report in &summary.reports {
        let svg = fs::read_to_string(&report.diagram).unwrap();
        assert_eq!(svg.matches("lastmove").count(), 2);
        assert_eq!(svg.matches("class=\"arrow\"").count(), 1);
    }

    assert_eq!(recorder.quits.get(), 1);
    assert!(recorder
        .limits
        .borrow()
        .iter()
        .all(|l| *l == Duration::from_millis(500)));
}

#[test]
fn test_positions_follow_the_line() {
    let fixture = Fixture::new(&NAJDORF);
    let recorder = Recorder::default();

    let summary = run(&fixture.config, launcher(&recorder, true, None), |_| {}).unwrap();

    assert_eq!(*recorder.fens.borrow(), reference_fens(&NAJDORF));
    assert_eq!(fixture.files().len(), NAJDORF.len());

    let indices: Vec<usize> = summary.reports.iter().map(|r| r.applied.index).collect();
    assert_eq!(indices, (1..=10).collect::<Vec<_>>());
    assert_eq!(summary.reports[9].applied.uci.to_string(), "a7a6");
    assert_eq!(
        summary.reports[9].diagram,
        fixture.output().join("trekk_10_a6.svg")
    );
}

#[test]
fn test_missing_pv_draws_no_arrow() {
    let fixture = Fixture::new(&["e4", "e5"]);
    let recorder = Recorder::default();

    let summary = run(&fixture.config, launcher(&recorder, false, None), |_| {}).unwrap();

    assert_eq!(summary.reports.len(), 2);
    for report in &summary.reports {
        assert!(report.analysis.best_reply().is_none());
        let svg = fs::read_to_string(&report.diagram).unwrap();
        assert!(!svg.contains("class=\"arrow\""));
    }
}

#[test]
fn test_missing_engine_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = AnalysisConfig::default()
        .with_engine_path(dir.path().join("no-such-stockfish"))
        .with_output_dir(dir.path().join("out"));
    let launched = Cell::new(false);

    let result = run(
        &config,
        |_: &Path| -> Result<FakeEngine, EngineError> {
            launched.set(true);
            Err(EngineError::Spawn("should not be called".into()))
        },
        |_| {},
    );

    assert!(matches!(result, Err(Error::EngineNotFound(_))));
    assert!(!launched.get());
    assert!(!config.output_dir.exists());
}

#[test]
fn test_illegal_sixth_move_stops_after_five() {
    let moves = ["e4", "c5", "Nf3", "d6", "d4", "Ke7", "Nxd4", "Nf6", "Nc3", "a6"];
    let fixture = Fixture::new(&moves);
    let recorder = Recorder::default();
    let mut seen = 0;

    let result = run(&fixture.config, launcher(&recorder, true, None), |_| seen += 1);

    match result {
        Err(Error::IllegalMove { index, san, .. }) => {
            assert_eq!(index, 6);
            assert_eq!(san, "Ke7");
        }
        other => panic!("Expected IllegalMove, got {:?}", other.map(|s| s.reports.len())),
    }
    assert_eq!(seen, 5);
    assert_eq!(fixture.files().len(), 5);
    assert!(!fixture.output().join("trekk_06_Ke7.svg").exists());
    assert_eq!(recorder.quits.get(), 1);
}

#[test]
fn test_engine_failure_keeps_partial_output() {
    let fixture = Fixture::new(&NAJDORF);
    let recorder = Recorder::default();

    let result = run(&fixture.config, launcher(&recorder, true, Some(3)), |_| {});

    assert!(matches!(result, Err(Error::Engine(EngineError::Closed))));
    assert_eq!(
        fixture.files(),
        vec!["trekk_01_e4.svg", "trekk_02_c5.svg"]
    );
    assert_eq!(recorder.quits.get(), 1);
}

#[test]
fn test_launch_failure_is_reported() {
    let fixture = Fixture::new(&NAJDORF);

    let result = run(
        &fixture.config,
        |_: &Path| -> Result<FakeEngine, EngineError> { Err(EngineError::Spawn("exec format error".into())) },
        |_| {},
    );

    assert!(matches!(result, Err(Error::Engine(EngineError::Spawn(_)))));
    assert!(fixture.output().is_dir());
    assert!(fixture.files().is_empty());
}

#[test]
fn test_progress_sees_each_move() {
    let fixture = Fixture::new(&["d4", "d5", "c4"]);
    let recorder = Recorder::default();
    let mut lines = Vec::new();

    run(&fixture.config, launcher(&recorder, true, None), |report| {
        lines.push(format!(
            "{} {}",
            report.applied.san, report.analysis.evaluation
        ))
    })
    .unwrap();

    assert_eq!(lines, vec!["d4 +0.10", "d5 +0.20", "c4 +0.30"]);
}

#[test]
#[ignore = "requires Stockfish"]
fn test_stockfish_najdorf() {
    let dir = tempfile::tempdir().unwrap();
    let config = AnalysisConfig::default()
        .with_output_dir(dir.path())
        .with_moves(["e4", "c5", "Nf3"]);

    let summary = cybersjakk_core::run_with_stockfish(&config, |report| {
        println!("{} {}", report.diagram.display(), report.analysis.summary())
    })
    .unwrap();

    assert_eq!(summary.reports.len(), 3);
}
