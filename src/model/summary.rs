use chrono::NaiveDate;
use serde::Serialize;

use super::game::GameResult;

/// Aggregated view over every stored game.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// Number of stored records, decided or not.
    pub recorded_games: usize,
    /// Number of games with a recorded outcome.
    pub total_games: usize,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    /// Wins over decisions; draws stay out of the denominator.
    pub win_rate: f64,
    /// Running win/loss balance in date order, starting at 0.
    /// Wins add one, losses subtract one, draws and open games add nothing.
    pub cumulative: Vec<i64>,
    /// Current run of identical results, counted from the latest game.
    pub streak: Option<Streak>,
    /// The latest five records, newest first.
    pub recent_games: Vec<RecentGame>,
    /// Per-opponent records, most-played first.
    pub vs_opponent: Vec<OpponentSplit>,
    /// Per-year records, newest year first.
    pub by_year: Vec<YearSplit>,
    pub home: SideRecord,
    pub away: SideRecord,
    pub totals: TeamTotals,
    pub rates: TeamRates,
}

/// The active win/loss/draw run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub length: usize,
    pub result: GameResult,
}

/// A stored game as shown in the recent-games list.
#[derive(Debug, Clone, Serialize)]
pub struct RecentGame {
    pub date: NaiveDate,
    pub opponent: String,
    pub runs_scored: Option<u32>,
    pub runs_allowed: Option<u32>,
    pub result: Option<GameResult>,
}

/// Record against a single opponent.
#[derive(Debug, Clone, Serialize)]
pub struct OpponentSplit {
    pub opponent: String,
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub win_rate: f64,
}

/// Record within a single calendar year.
#[derive(Debug, Clone, Serialize)]
pub struct YearSplit {
    pub year: i32,
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub win_rate: f64,
}

/// Record for one side of the diamond.
///
/// Unlike the overall rate, the side rate counts draws in the denominator.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SideRecord {
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub win_rate: f64,
}

/// Sum and per-game average of one counter.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CounterTotal {
    pub sum: u64,
    pub per_game: f64,
}

/// Summed counting stats over decided games, free-form records excluded.
///
/// Duration and attendance average over the records where a value could be
/// parsed, not over all games.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TeamTotals {
    /// Number of games feeding the counter sums.
    pub games: usize,
    pub runs_scored: CounterTotal,
    pub runs_allowed: CounterTotal,
    pub at_bats: CounterTotal,
    pub hits: CounterTotal,
    pub home_runs: CounterTotal,
    pub stolen_bases: CounterTotal,
    pub walks: CounterTotal,
    pub hit_by_pitch: CounterTotal,
    pub strikeouts: CounterTotal,
    pub home_runs_allowed: CounterTotal,
    pub walks_allowed: CounterTotal,
    pub hit_by_pitch_allowed: CounterTotal,
    pub strikeouts_thrown: CounterTotal,
    pub wild_pitches: CounterTotal,
    pub balks: CounterTotal,
    pub opponent_at_bats: CounterTotal,
    pub opponent_hits: CounterTotal,
    pub opponent_home_runs: CounterTotal,
    pub opponent_stolen_bases: CounterTotal,
    pub duration_minutes: CounterTotal,
    pub attendance: CounterTotal,
}

/// Team rate stats; `None` when the denominator is zero.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TeamRates {
    pub batting_average: Option<f64>,
    pub home_run_rate: Option<f64>,
    pub on_base: Option<f64>,
    pub slugging: Option<f64>,
    pub ops: Option<f64>,
    pub earned_run_average: Option<f64>,
    pub opponent_batting_average: Option<f64>,
    pub opponent_home_run_rate: Option<f64>,
}

/// Batting rate stats for one player; `None` when undefined.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatterRates {
    pub batting_average: Option<f64>,
    pub on_base: Option<f64>,
    pub ops: Option<f64>,
}

/// Pitching rate stats for one player; `None` without recorded innings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PitcherRates {
    pub earned_run_average: Option<f64>,
    pub strikeouts_per_nine: Option<f64>,
}
