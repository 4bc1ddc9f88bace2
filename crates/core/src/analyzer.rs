//! The analysis run: play the line, ask the engine about every position and
//! draw a diagram per move.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::diagram;
use crate::engine::{Engine, EngineError, EngineSession, PositionAnalysis, StockfishEngine};
use crate::error::Result;
use crate::line::{AppliedMove, MoveLine};

/// What happened at one step of the line
#[derive(Debug, Clone)]
pub struct MoveReport {
    pub applied: AppliedMove,
    pub analysis: PositionAnalysis,
    pub diagram: PathBuf,
}

/// A finished run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub reports: Vec<MoveReport>,
}

/// Runs the whole analysis with the engine produced by `launch`.
///
/// The engine path is checked before anything touches the filesystem. Once
/// the engine is up it is shut down exactly once, whether the line finishes
/// or a move, query or write fails part-way. Diagrams written before a
/// failure stay on disk.
pub fn run<E, L, P>(config: &AnalysisConfig, launch: L, mut progress: P) -> Result<RunSummary>
where
    E: Engine,
    L: FnOnce(&Path) -> std::result::Result<E, EngineError>,
    P: FnMut(&MoveReport),
{
    let engine_path = config.check_engine()?;

    fs::create_dir_all(&config.output_dir)?;
    info!(
        output = %config.output_dir.display(),
        moves = config.moves.len(),
        "starting analysis"
    );

    let mut session = EngineSession::open(engine_path, launch)?;
    let outcome = play_line(config, &mut session, &mut progress);
    let closed = session.close();

    match (outcome, closed) {
        (Ok(summary), Ok(())) => Ok(summary),
        (Ok(_), Err(e)) => Err(e.into()),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            warn!("engine did not shut down cleanly: {}", close_err);
            Err(e)
        }
    }
}

/// [`run`] against the Stockfish binary named in the config
pub fn run_with_stockfish<P>(config: &AnalysisConfig, progress: P) -> Result<RunSummary>
where
    P: FnMut(&MoveReport),
{
    run(config, StockfishEngine::new, progress)
}

fn play_line<E, P>(config: &AnalysisConfig, session: &mut EngineSession<E>, progress: &mut P) -> Result<RunSummary>
where
    E: Engine,
    P: FnMut(&MoveReport),
{
    let mut line = MoveLine::new();
    let mut summary = RunSummary::default();

    for san in &config.moves {
        let applied = line.apply_san(san)?;
        let analysis = session.analyse(line.position(), config.time_limit)?;

        let svg = diagram::render_svg(line.position(), &applied.uci, analysis.best_reply())?;
        let path = diagram::write_diagram(&config.output_dir, applied.index, &applied.san, &svg)?;

        let report = MoveReport {
            applied,
            analysis,
            diagram: path,
        };
        progress(&report);
        summary.reports.push(report);
    }

    Ok(summary)
}
