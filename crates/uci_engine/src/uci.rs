//! The UCI session: line-based command loop over stdin/stdout.
//!
//! The searcher is synchronous, so `go` blocks until the budget runs out
//! and `stop` between searches has nothing to cancel. Engines are built
//! from the configured (backend, evaluation) pair and rebuilt when a
//! `setoption` changes either.

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, ensure, Context};
use chess::ChessMove;
use log::{error, info, warn};

use alphabeta_engine::{mate_in, AlphaBetaEngine};
use engine_core::{Engine, GameState, SearchLimits, SearchResult};
use evaluation::nnue::Network;
use evaluation::{MaterialEval, NnueEval, PstEval};
use mcts_engine::MctsEngine;

use crate::config::{Config, EvalStrategy, SearchBackend};

/// Fraction of the remaining clock to spend on one move.
const CLOCK_FRACTION: u32 = 30;

pub struct UciSession {
    config: Config,
    engine: Box<dyn Engine>,
    state: GameState,
}

impl UciSession {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let engine = build_engine(&config)?;
        Ok(Self {
            config,
            engine,
            state: GameState::default(),
        })
    }

    pub fn run(mut self, input: impl BufRead, mut output: impl Write) -> anyhow::Result<()> {
        for line in input.lines() {
            let line = line.context("failed to read command")?;
            let parts: Vec<&str> = line.split_whitespace().collect();
            let Some(&command) = parts.first() else {
                continue;
            };

            match command {
                "uci" => self.identify(&mut output)?,
                "isready" => writeln!(output, "readyok")?,
                "setoption" => self.set_option(&parts),
                "ucinewgame" => {
                    self.engine.new_game();
                    self.state = GameState::default();
                }
                "position" => {
                    if let Err(err) = self.set_position(&parts[1..]) {
                        error!("position rejected: {err:#}");
                    }
                }
                "go" => self.go(&parts[1..], &mut output)?,
                // Nothing runs between commands that could be stopped
                "stop" => {}
                "quit" => break,
                other => warn!("ignoring unknown command {other:?}"),
            }
            output.flush()?;
        }
        Ok(())
    }

    fn identify(&self, output: &mut impl Write) -> anyhow::Result<()> {
        writeln!(output, "id name {}", self.engine.name())?;
        writeln!(output, "id author {}", self.engine.author())?;
        writeln!(
            output,
            "option name Hash type spin default {} min 1 max 4096",
            self.config.hash_mb
        )?;
        writeln!(
            output,
            "option name Depth type spin default {} min 1 max 127",
            self.config.depth
        )?;
        writeln!(
            output,
            "option name Search type combo default alphabeta var alphabeta var mcts"
        )?;
        writeln!(
            output,
            "option name Eval type combo default pst var material var pst var nnue"
        )?;
        writeln!(output, "option name EvalFile type string default <empty>")?;
        writeln!(output, "uciok")?;
        Ok(())
    }

    fn set_option(&mut self, parts: &[&str]) {
        let name_idx = parts.iter().position(|&t| t == "name");
        let value_idx = parts.iter().position(|&t| t == "value");
        let (Some(name_idx), Some(value_idx)) = (name_idx, value_idx) else {
            warn!("malformed setoption: {parts:?}");
            return;
        };
        let name = parts[name_idx + 1..value_idx].join(" ");
        let value = parts[value_idx + 1..].join(" ");

        match name.to_ascii_lowercase().as_str() {
            "hash" => match value.parse::<usize>() {
                Ok(mb) => {
                    self.config.hash_mb = mb;
                    self.engine.set_option("Hash", &value);
                }
                Err(_) => warn!("Hash wants a number, got {value:?}"),
            },
            "depth" => match value.parse::<u8>() {
                Ok(d) => self.config.depth = d.max(1),
                Err(_) => warn!("Depth wants a number, got {value:?}"),
            },
            "search" => match value.parse::<SearchBackend>() {
                Ok(backend) => {
                    self.config.search = backend;
                    self.rebuild_engine();
                }
                Err(()) => warn!("unknown search backend {value:?}"),
            },
            "eval" => match value.parse::<EvalStrategy>() {
                Ok(strategy) => {
                    self.config.eval = strategy;
                    self.rebuild_engine();
                }
                Err(()) => warn!("unknown eval strategy {value:?}"),
            },
            "evalfile" => {
                self.config.weights = Some(value.into());
                if self.config.eval == EvalStrategy::Nnue {
                    self.rebuild_engine();
                }
            }
            _ => warn!("ignoring unknown option {name:?}"),
        }
    }

    fn rebuild_engine(&mut self) {
        match build_engine(&self.config) {
            Ok(engine) => {
                info!("engine is now {}", engine.name());
                self.engine = engine;
            }
            Err(err) => error!("keeping previous engine: {err:#}"),
        }
    }

    fn set_position(&mut self, tokens: &[&str]) -> anyhow::Result<()> {
        let moves_idx = tokens.iter().position(|&t| t == "moves");
        let setup = &tokens[..moves_idx.unwrap_or(tokens.len())];

        let mut state = match setup.first() {
            Some(&"startpos") => GameState::default(),
            Some(&"fen") => {
                let fen = setup[1..].join(" ");
                GameState::from_fen(&fen)
                    .map_err(|err| anyhow::anyhow!("invalid FEN {fen:?}: {err}"))?
            }
            _ => bail!("expected startpos or fen, got {tokens:?}"),
        };

        if let Some(idx) = moves_idx {
            for token in &tokens[idx + 1..] {
                let mv: ChessMove = token
                    .parse()
                    .map_err(|err| anyhow::anyhow!("bad move {token:?}: {err}"))?;
                ensure!(state.board().legal(mv), "illegal move {token:?}");
                state.make_move(mv);
            }
        }

        self.state = state;
        Ok(())
    }

    fn go(&mut self, tokens: &[&str], output: &mut impl Write) -> anyhow::Result<()> {
        let limits = self.parse_limits(tokens);
        let result = self.engine.search(&self.state, limits.clone());
        report(&result, &limits, output)
    }

    fn parse_limits(&self, tokens: &[&str]) -> SearchLimits {
        let side = self.state.board().side_to_move();
        let mut depth = None;
        let mut movetime = None;
        let mut nodes = None;
        let mut our_time = None;
        let mut our_inc = None;
        let mut infinite = false;

        let mut iter = tokens.iter();
        while let Some(&token) = iter.next() {
            let mut arg = || iter.next().and_then(|v| v.parse::<u64>().ok());
            match token {
                "depth" => depth = arg().map(|d| d.min(127) as u8),
                "movetime" => movetime = arg().map(Duration::from_millis),
                "nodes" => nodes = arg(),
                "wtime" if side == chess::Color::White => {
                    our_time = arg().map(Duration::from_millis)
                }
                "btime" if side == chess::Color::Black => {
                    our_time = arg().map(Duration::from_millis)
                }
                "winc" if side == chess::Color::White => {
                    our_inc = arg().map(Duration::from_millis)
                }
                "binc" if side == chess::Color::Black => {
                    our_inc = arg().map(Duration::from_millis)
                }
                "infinite" => infinite = true,
                _ => {}
            }
        }

        // A simple per-move budget from the clock: a fixed fraction of
        // what remains, plus half the increment
        let budget = movetime.or_else(|| {
            our_time.map(|t| t / CLOCK_FRACTION + our_inc.unwrap_or(Duration::ZERO) / 2)
        });

        let mut limits = match (depth, budget) {
            (Some(d), Some(t)) => SearchLimits::depth_and_time(d, t),
            (Some(d), None) => SearchLimits::depth(d),
            (None, Some(t)) => SearchLimits::time(t),
            (None, None) if infinite || nodes.is_some() => SearchLimits::depth(127),
            (None, None) => SearchLimits::depth(self.config.depth),
        };
        if let Some(n) = nodes {
            limits = limits.with_nodes(n);
        }
        limits
    }
}

fn report(
    result: &SearchResult,
    limits: &SearchLimits,
    output: &mut impl Write,
) -> anyhow::Result<()> {
    let score = match mate_in(result.score) {
        Some(moves) => format!("mate {moves}"),
        None => format!("cp {}", result.score),
    };
    let pv = result
        .pv
        .iter()
        .map(|mv| mv.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(
        output,
        "info depth {} score {} nodes {} time {} pv {}",
        result.depth,
        score,
        result.nodes,
        limits.time_control.elapsed().as_millis(),
        pv
    )?;

    match result.best_move {
        Some(mv) => writeln!(output, "bestmove {mv}")?,
        None => writeln!(output, "bestmove 0000")?,
    }
    Ok(())
}

fn build_engine(config: &Config) -> anyhow::Result<Box<dyn Engine>> {
    Ok(match (config.search, config.eval) {
        (SearchBackend::Alphabeta, EvalStrategy::Material) => Box::new(
            AlphaBetaEngine::with_hash_mb(MaterialEval::new(), config.hash_mb),
        ),
        (SearchBackend::Alphabeta, EvalStrategy::Pst) => Box::new(AlphaBetaEngine::with_hash_mb(
            PstEval::new(),
            config.hash_mb,
        )),
        (SearchBackend::Alphabeta, EvalStrategy::Nnue) => Box::new(AlphaBetaEngine::with_hash_mb(
            load_nnue(config)?,
            config.hash_mb,
        )),
        (SearchBackend::Mcts, EvalStrategy::Material) => {
            Box::new(MctsEngine::new(MaterialEval::new()))
        }
        (SearchBackend::Mcts, EvalStrategy::Pst) => Box::new(MctsEngine::new(PstEval::new())),
        (SearchBackend::Mcts, EvalStrategy::Nnue) => {
            Box::new(MctsEngine::new(load_nnue(config)?))
        }
    })
}

/// A weight mismatch is fatal before any search begins; a missing file
/// configuration only downgrades to the zero network.
fn load_nnue(config: &Config) -> anyhow::Result<NnueEval> {
    match &config.weights {
        Some(path) => NnueEval::from_file(path)
            .with_context(|| format!("loading NNUE weights from {}", path.display())),
        None => {
            warn!("no NNUE weight file configured, every position scores 0");
            Ok(NnueEval::new(Arc::new(Network::zeroed())))
        }
    }
}

#[cfg(test)]
#[path = "uci_tests.rs"]
mod uci_tests;
