use std::{collections::BTreeMap, path::PathBuf, time::Duration};

use duelris_ai::{ai_player::AiPlayer, difficulty::MAX_LEVEL};
use duelris_engine::{
    Match, MatchEvent, MatchSeed, MatchStats, Side, Versus, VersusListener, VersusOutcome,
    VersusSnapshot,
};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{config::DuelConfig, util};

const DEFAULT_TICK_MS: u64 = 16;
const DEFAULT_MAX_SECONDS: u64 = 600;
const PROGRESS_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Session configuration file (see `default-config`)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed as 32 hex characters; random when omitted
    #[arg(long)]
    seed: Option<MatchSeed>,
    /// Level of the left AI, overriding the config file
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=i64::from(MAX_LEVEL)))]
    left_level: Option<u8>,
    /// Level of the right AI, overriding the config file
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=i64::from(MAX_LEVEL)))]
    right_level: Option<u8>,
    /// Simulated milliseconds per tick
    #[arg(long, default_value_t = DEFAULT_TICK_MS)]
    tick_ms: u64,
    /// Simulated seconds before the session is stopped without an outcome
    #[arg(long, default_value_t = DEFAULT_MAX_SECONDS)]
    max_seconds: u64,
    /// Include every event in the result
    #[arg(long)]
    events: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Default for SimulateArg {
    fn default() -> Self {
        Self {
            config: None,
            seed: None,
            left_level: None,
            right_level: None,
            tick_ms: DEFAULT_TICK_MS,
            max_seconds: DEFAULT_MAX_SECONDS,
            events: false,
            output: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct EventRecord {
    elapsed_ms: u128,
    side: Side,
    event: MatchEvent,
}

/// Counts events per side and optionally keeps the full log.
#[derive(Debug, Default)]
struct EventLog {
    elapsed: Duration,
    keep_records: bool,
    records: Vec<EventRecord>,
    counts: [BTreeMap<&'static str, usize>; 2],
}

impl EventLog {
    fn new(keep_records: bool) -> Self {
        Self {
            keep_records,
            ..Self::default()
        }
    }

    fn counts(&self, side: Side) -> &BTreeMap<&'static str, usize> {
        match side {
            Side::Left => &self.counts[0],
            Side::Right => &self.counts[1],
        }
    }
}

impl VersusListener for EventLog {
    fn on_event(&mut self, side: Side, event: MatchEvent) {
        let counts = match side {
            Side::Left => &mut self.counts[0],
            Side::Right => &mut self.counts[1],
        };
        *counts.entry(event_name(&event)).or_default() += 1;
        if let MatchEvent::GameOver { cause } = &event {
            eprintln!(
                "[{:>7.1}s] {side} topped out ({cause})",
                self.elapsed.as_secs_f64()
            );
        }
        if self.keep_records {
            self.records.push(EventRecord {
                elapsed_ms: self.elapsed.as_millis(),
                side,
                event,
            });
        }
    }
}

fn event_name(event: &MatchEvent) -> &'static str {
    match event {
        MatchEvent::Moved => "moved",
        MatchEvent::Rotated => "rotated",
        MatchEvent::Held => "held",
        MatchEvent::PieceLocked => "piece_locked",
        MatchEvent::LinesCleared { .. } => "lines_cleared",
        MatchEvent::GarbageSent { .. } => "garbage_sent",
        MatchEvent::GarbageApplied { .. } => "garbage_applied",
        MatchEvent::GameOver { .. } => "game_over",
    }
}

#[derive(Debug, Serialize)]
struct SideResult {
    level: u8,
    stats: MatchStats,
    event_counts: BTreeMap<&'static str, usize>,
}

#[derive(Debug, Serialize)]
struct SimulationResult {
    seed: MatchSeed,
    ticks: u64,
    elapsed_ms: u128,
    outcome: Option<VersusOutcome>,
    left: SideResult,
    right: SideResult,
    snapshot: VersusSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<Vec<EventRecord>>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        config,
        seed,
        left_level,
        right_level,
        tick_ms,
        max_seconds,
        events,
        output,
    } = arg;

    let mut config = match config {
        Some(path) => DuelConfig::open(path)?,
        None => DuelConfig::default(),
    };
    if let Some(level) = left_level {
        config.left_ai.level = *level;
    }
    if let Some(level) = right_level {
        config.right_ai.level = *level;
    }

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let tick = Duration::from_millis((*tick_ms).max(1));
    let limit = Duration::from_secs(*max_seconds);

    eprintln!(
        "Simulating level {} (left) vs level {} (right), seed {seed}",
        config.left_ai.level, config.right_ai.level
    );

    // AI noise streams are derived from the session seed so the whole run replays.
    let mut root = Pcg32::from_seed(*seed.as_bytes());
    let left_ai = AiPlayer::new(config.left_ai.clone(), root.random());
    let right_ai = AiPlayer::new(config.right_ai.clone(), root.random());
    let left_level = left_ai.difficulty().level();
    let right_level = right_ai.difficulty().level();

    let mut versus = Versus::new(config.match_config.clone(), seed, EventLog::new(*events))
        .with_controller(Side::Left, left_ai)
        .with_controller(Side::Right, right_ai);

    let mut ticks = 0;
    let mut elapsed = Duration::ZERO;
    let mut next_report = PROGRESS_INTERVAL;
    while versus.outcome().is_none() && elapsed < limit {
        ticks += 1;
        elapsed += tick;
        versus.listener_mut().elapsed = elapsed;
        versus.update(tick);
        if elapsed >= next_report {
            next_report += PROGRESS_INTERVAL;
            report_progress(&versus, elapsed);
        }
    }

    let outcome = versus.outcome();
    match outcome {
        Some(VersusOutcome::Winner(side)) => eprintln!("Winner: {side}"),
        Some(VersusOutcome::Draw) => eprintln!("Draw"),
        None => eprintln!("No outcome after {:.1}s, stopping", elapsed.as_secs_f64()),
    }

    let snapshot = versus.snapshot();
    let stats = |side: Side| versus.game(side).stats().clone();
    let result = SimulationResult {
        seed,
        ticks,
        elapsed_ms: elapsed.as_millis(),
        outcome,
        left: SideResult {
            level: left_level,
            stats: stats(Side::Left),
            event_counts: versus.listener().counts(Side::Left).clone(),
        },
        right: SideResult {
            level: right_level,
            stats: stats(Side::Right),
            event_counts: versus.listener().counts(Side::Right).clone(),
        },
        snapshot,
        events: None,
    };
    let result = SimulationResult {
        events: events.then(|| versus.into_listener().records),
        ..result
    };

    util::write_json(&result, output.as_deref())
}

fn report_progress<L>(versus: &Versus<L>, elapsed: Duration)
where
    L: VersusListener,
{
    let describe = |game: &Match| {
        let stats = game.stats();
        format!(
            "{} pieces, {} lines, {} sent, {} pending",
            stats.completed_pieces(),
            stats.total_cleared_lines(),
            stats.garbage_sent(),
            game.pending_garbage()
        )
    };
    eprintln!(
        "[{:>7.1}s] left: {} | right: {}",
        elapsed.as_secs_f64(),
        describe(versus.game(Side::Left)),
        describe(versus.game(Side::Right)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, clap::Parser)]
    struct Cli {
        #[command(flatten)]
        arg: SimulateArg,
    }

    #[test]
    fn test_default_matches_flag_defaults() {
        use clap::Parser as _;

        let parsed = Cli::parse_from(["duelris"]).arg;
        let default = SimulateArg::default();
        assert_eq!(default.tick_ms, DEFAULT_TICK_MS);
        assert_eq!(default.max_seconds, DEFAULT_MAX_SECONDS);
        assert_eq!(default.tick_ms, parsed.tick_ms);
        assert_eq!(default.max_seconds, parsed.max_seconds);
        assert_eq!(default.events, parsed.events);
        assert!(default.seed.is_none() && default.config.is_none());
    }

    #[test]
    fn test_event_log_counts_per_side() {
        let mut log = EventLog::new(true);
        log.on_event(Side::Left, MatchEvent::PieceLocked);
        log.on_event(Side::Left, MatchEvent::PieceLocked);
        log.on_event(Side::Right, MatchEvent::GarbageSent { amount: 2 });

        assert_eq!(log.counts(Side::Left).get("piece_locked"), Some(&2));
        assert_eq!(log.counts(Side::Right).get("garbage_sent"), Some(&1));
        assert!(log.counts(Side::Right).get("piece_locked").is_none());
        assert_eq!(log.records.len(), 3);
        assert_eq!(log.records[2].side, Side::Right);
    }

    #[test]
    fn test_event_log_without_records() {
        let mut log = EventLog::new(false);
        log.on_event(Side::Left, MatchEvent::Moved);
        assert!(log.records.is_empty());
        assert_eq!(log.counts(Side::Left).get("moved"), Some(&1));
    }
}
