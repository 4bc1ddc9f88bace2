//! Stockfish chess engine interface
//!
//! Spawns Stockfish as a subprocess and communicates via UCI protocol.

use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{Chess, EnPassantMode, Position};
use tracing::{debug, info};

use super::analysis::{Evaluation, PositionAnalysis};
use super::{Engine, EngineError};

/// How long the engine gets to exit on its own after `quit`
const QUIT_GRACE: Duration = Duration::from_millis(500);
const QUIT_POLL: Duration = Duration::from_millis(20);

/// Wrapper around Stockfish chess engine
pub struct StockfishEngine {
    /// The child process
    process: Child,
    /// Stdin for sending commands
    stdin: ChildStdin,
    /// Stdout reader for receiving responses
    stdout: BufReader<ChildStdout>,
    /// Name reported by `id name`
    name: String,
    /// Whether `ucinewgame` has been sent
    new_game_sent: bool,
    /// Whether `quit` has already run
    closed: bool,
}

impl StockfishEngine {
    /// Starts the engine and completes the UCI handshake
    ///
    /// # Arguments
    /// * `path` - Path to the stockfish binary
    ///
    /// # Example
    /// ```ignore
    /// let mut engine = StockfishEngine::new(Path::new("./stockfish"))?;
    /// ```
    pub fn new(path: &Path) -> Result<Self, EngineError> {
        let mut process = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| EngineError::Spawn(format!("{}: {}", path.display(), e)))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| EngineError::Spawn("Failed to open stdin".into()))?;

        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| EngineError::Spawn("Failed to open stdout".into()))?;

        let mut engine = StockfishEngine {
            process,
            stdin,
            stdout: BufReader::new(stdout),
            name: String::new(),
            new_game_sent: false,
            closed: false,
        };

        engine.init_uci()?;
        info!(engine = %engine.name, "engine ready");

        Ok(engine)
    }

    /// Returns the engine's name as reported via UCI
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sends a command to the engine
    fn send(&mut self, cmd: &str) -> Result<(), EngineError> {
        debug!(">> {}", cmd);
        writeln!(self.stdin, "{}", cmd)?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Reads a line from the engine
    fn read_line(&mut self) -> Result<String, EngineError> {
        let mut line = String::new();
        let bytes = self.stdout.read_line(&mut line)?;
        if bytes == 0 {
            return Err(EngineError::Closed);
        }
        let line = line.trim().to_string();
        debug!("<< {}", line);
        Ok(line)
    }

    /// Reads lines until one starts with `expected`
    fn read_until(&mut self, expected: &str) -> Result<Vec<String>, EngineError> {
        let mut lines = Vec::new();
        loop {
            let line = self.read_line()?;
            let done = line.starts_with(expected);
            lines.push(line);
            if done {
                break;
            }
        }
        Ok(lines)
    }

    fn init_uci(&mut self) -> Result<(), EngineError> {
        self.send("uci")?;
        let lines = self.read_until("uciok")?;

        self.name = lines
            .iter()
            .find_map(|l| l.strip_prefix("id name "))
            .unwrap_or("Unknown Engine")
            .to_string();

        self.sync()
    }

    /// `isready` / `readyok` round-trip
    fn sync(&mut self) -> Result<(), EngineError> {
        self.send("isready")?;
        self.read_until("readyok")?;
        Ok(())
    }

    fn ensure_running(&self) -> Result<(), EngineError> {
        if self.closed {
            return Err(EngineError::NotRunning);
        }
        Ok(())
    }
}

impl Engine for StockfishEngine {
    fn analyse(&mut self, position: &Chess, limit: Duration) -> Result<PositionAnalysis, EngineError> {
        self.ensure_running()?;

        if !self.new_game_sent {
            self.send("ucinewgame")?;
            self.sync()?;
            self.new_game_sent = true;
        }

        let fen = Fen::from_position(position, EnPassantMode::Legal);
        self.send(&format!("position fen {}", fen))?;
        self.send(&format!("go movetime {}", limit.as_millis().max(1)))?;

        let mut latest: Option<InfoLine> = None;
        let best_move = loop {
            let line = self.read_line()?;

            if let Some(rest) = line.strip_prefix("bestmove") {
                // "bestmove e2e4 ponder e7e5" or "bestmove (none)"
                break rest
                    .split_whitespace()
                    .next()
                    .filter(|m| *m != "(none)")
                    .map(str::to_string);
            } else if line.starts_with("info") {
                if let Some(info) = parse_info_line(&line) {
                    latest = Some(info);
                }
            }
        };

        build_analysis(latest, best_move, position)
    }

    fn quit(&mut self) -> Result<(), EngineError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        // The process may already be gone, in which case the write fails.
        if let Err(e) = self.send("quit") {
            debug!("quit not delivered: {}", e);
        }

        let deadline = Instant::now() + QUIT_GRACE;
        while Instant::now() < deadline {
            match self.process.try_wait() {
                Ok(Some(_)) => {
                    debug!("engine exited");
                    return Ok(());
                }
                Ok(None) => thread::sleep(QUIT_POLL),
                Err(e) => {
                    debug!("could not poll engine status: {}", e);
                    break;
                }
            }
        }

        debug!("engine still running after quit, killing it");
        self.process.kill()?;
        self.process.wait()?;
        Ok(())
    }
}

impl Drop for StockfishEngine {
    fn drop(&mut self) {
        let _ = self.quit();
    }
}

/// The fields of one scored `info` line
#[derive(Debug, Default, PartialEq)]
struct InfoLine {
    depth: u32,
    evaluation: Option<Evaluation>,
    nodes: u64,
    time_ms: u64,
    pv: Vec<String>,
}

/// Parses an info line from the engine.
///
/// Returns `None` for `info string` chatter and for lines without a score,
/// such as `currmove` progress reports.
fn parse_info_line(line: &str) -> Option<InfoLine> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.get(1) == Some(&"string") {
        return None;
    }

    let mut info = InfoLine::default();
    let mut cp = None;
    let mut mate = None;
    let mut i = 1;

    while i < parts.len() {
        match parts[i] {
            "depth" => {
                info.depth = parts.get(i + 1).and_then(|v| v.parse().ok()).unwrap_or(0);
                i += 2;
            }
            "score" => {
                match parts.get(i + 1) {
                    Some(&"cp") => cp = parts.get(i + 2).and_then(|v| v.parse().ok()),
                    Some(&"mate") => mate = parts.get(i + 2).and_then(|v| v.parse().ok()),
                    _ => {}
                }
                i += 3;
            }
            "nodes" => {
                info.nodes = parts.get(i + 1).and_then(|v| v.parse().ok()).unwrap_or(0);
                i += 2;
            }
            "time" => {
                info.time_ms = parts.get(i + 1).and_then(|v| v.parse().ok()).unwrap_or(0);
                i += 2;
            }
            "pv" => {
                // Everything after "pv" is the principal variation
                info.pv = parts[i + 1..].iter().map(|s| s.to_string()).collect();
                break;
            }
            _ => {
                i += 1;
            }
        }
    }

    info.evaluation = Some(Evaluation::from_uci_score(cp, mate)?);
    Some(info)
}

/// Turns the last scored info line and the `bestmove` reply into an analysis
/// oriented to White.
fn build_analysis(
    latest: Option<InfoLine>,
    best_move: Option<String>,
    position: &Chess,
) -> Result<PositionAnalysis, EngineError> {
    let info = latest.ok_or_else(|| EngineError::Protocol("no score reported before bestmove".into()))?;
    let evaluation = info
        .evaluation
        .ok_or_else(|| EngineError::Protocol("info line without score".into()))?;

    let mut pv_text = info.pv;
    if pv_text.is_empty() {
        if let Some(best) = best_move {
            pv_text.push(best);
        }
    }

    let pv = pv_text
        .iter()
        .map(|m| {
            m.parse::<UciMove>()
                .map_err(|_| EngineError::Protocol(format!("malformed move '{}'", m)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PositionAnalysis {
        evaluation: evaluation.for_white(position.turn()),
        pv,
        depth: info.depth,
        nodes: info.nodes,
        time_ms: info.time_ms,
    })
}
