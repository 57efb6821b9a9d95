use std::fmt;
use std::ops::{Add, AddAssign};

use serde::{Serialize, Serializer};

use super::game::parse_counter;

/// Column headers of the batter totals CSV, in storage order.
pub const BATTER_HEADERS: [&str; 12] = [
    "選手名",
    "チーム名",
    "打数",
    "安打",
    "打点",
    "盗塁",
    "本塁打",
    "三振",
    "四球",
    "死球",
    "犠打",
    "犠飛",
];

/// Column headers of the pitcher totals CSV, in storage order.
pub const PITCHER_HEADERS: [&str; 13] = [
    "選手名",
    "チーム名",
    "投球数",
    "投球回",
    "打者数",
    "被安打",
    "被本塁打",
    "与四球",
    "与死球",
    "奪三振",
    "暴投",
    "ボーク",
    "失点",
];

/// Innings pitched, counted in thirds of an inning.
///
/// NPB notation writes two outs into the thirteenth inning as `12.2`,
/// meaning 12⅔ innings. Keeping the third count makes accumulation exact:
/// `0.2 + 0.2` is `1.1`, not `0.4`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Innings(u32);

impl Innings {
    pub fn new(thirds: u32) -> Innings {
        Innings(thirds)
    }

    pub fn from_whole(innings: u32) -> Innings {
        Innings(innings.saturating_mul(3))
    }

    /// Parses `X` or `X.Y` notation; anything unreadable counts as zero
    /// and absurdly large values clamp instead of overflowing.
    pub fn parse_lenient(text: &str) -> Innings {
        let text = text.trim();
        let (whole, frac) = match text.split_once('.') {
            Some((whole, frac)) => (
                whole.parse::<u32>().unwrap_or(0),
                frac.parse::<u32>().unwrap_or(0),
            ),
            None => (text.parse::<u32>().unwrap_or(0), 0),
        };
        Innings(whole.saturating_mul(3).saturating_add(frac))
    }

    pub fn thirds(self) -> u32 {
        self.0
    }

    /// Fractional innings for rate stats, e.g. `12.2` becomes 12.666…
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 3.0
    }
}

impl fmt::Display for Innings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 3;
        match self.0 % 3 {
            0 => write!(f, "{whole}"),
            rem => write!(f, "{whole}.{rem}"),
        }
    }
}

impl Add for Innings {
    type Output = Innings;

    fn add(self, rhs: Innings) -> Innings {
        Innings(self.0 + rhs.0)
    }
}

impl AddAssign for Innings {
    fn add_assign(&mut self, rhs: Innings) {
        self.0 += rhs.0;
    }
}

impl Serialize for Innings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One batter's line from a single game's box score.
#[derive(Debug, Clone, Serialize)]
pub struct BatterLine {
    pub name: String,
    pub at_bats: u32,
    pub hits: u32,
    pub runs_batted_in: u32,
    pub stolen_bases: u32,
    pub home_runs: u32,
    pub strikeouts: u32,
    pub walks: u32,
    pub hit_by_pitch: u32,
    pub sacrifice_bunts: u32,
    pub sacrifice_flies: u32,
}

/// One pitcher's line from a single game's box score.
#[derive(Debug, Clone, Serialize)]
pub struct PitcherLine {
    pub name: String,
    pub pitches: u32,
    pub innings: Innings,
    pub batters_faced: u32,
    pub hits_allowed: u32,
    pub home_runs_allowed: u32,
    pub walks: u32,
    pub hit_by_pitch: u32,
    pub strikeouts: u32,
    pub wild_pitches: u32,
    pub balks: u32,
    pub runs_allowed: u32,
}

/// Cumulative batting counters for one player, keyed by name and team.
#[derive(Debug, Clone, Serialize)]
pub struct BatterTotals {
    pub name: String,
    pub team: String,
    pub at_bats: u32,
    pub hits: u32,
    pub runs_batted_in: u32,
    pub stolen_bases: u32,
    pub home_runs: u32,
    pub strikeouts: u32,
    pub walks: u32,
    pub hit_by_pitch: u32,
    pub sacrifice_bunts: u32,
    pub sacrifice_flies: u32,
}

impl BatterTotals {
    pub fn from_line(line: &BatterLine, team: &str) -> BatterTotals {
        BatterTotals {
            name: line.name.clone(),
            team: team.to_string(),
            at_bats: line.at_bats,
            hits: line.hits,
            runs_batted_in: line.runs_batted_in,
            stolen_bases: line.stolen_bases,
            home_runs: line.home_runs,
            strikeouts: line.strikeouts,
            walks: line.walks,
            hit_by_pitch: line.hit_by_pitch,
            sacrifice_bunts: line.sacrifice_bunts,
            sacrifice_flies: line.sacrifice_flies,
        }
    }

    pub fn add_line(&mut self, line: &BatterLine) {
        self.at_bats += line.at_bats;
        self.hits += line.hits;
        self.runs_batted_in += line.runs_batted_in;
        self.stolen_bases += line.stolen_bases;
        self.home_runs += line.home_runs;
        self.strikeouts += line.strikeouts;
        self.walks += line.walks;
        self.hit_by_pitch += line.hit_by_pitch;
        self.sacrifice_bunts += line.sacrifice_bunts;
        self.sacrifice_flies += line.sacrifice_flies;
    }

    pub(crate) fn to_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.team.clone(),
            self.at_bats.to_string(),
            self.hits.to_string(),
            self.runs_batted_in.to_string(),
            self.stolen_bases.to_string(),
            self.home_runs.to_string(),
            self.strikeouts.to_string(),
            self.walks.to_string(),
            self.hit_by_pitch.to_string(),
            self.sacrifice_bunts.to_string(),
            self.sacrifice_flies.to_string(),
        ]
    }

    pub(crate) fn from_row(row: &[String]) -> Option<BatterTotals> {
        let cell = |i: usize| row.get(i).map(String::as_str).unwrap_or("").trim();
        let count = |i: usize| parse_counter(cell(i)).unwrap_or(0);
        if cell(0).is_empty() {
            return None;
        }
        Some(BatterTotals {
            name: cell(0).to_string(),
            team: cell(1).to_string(),
            at_bats: count(2),
            hits: count(3),
            runs_batted_in: count(4),
            stolen_bases: count(5),
            home_runs: count(6),
            strikeouts: count(7),
            walks: count(8),
            hit_by_pitch: count(9),
            sacrifice_bunts: count(10),
            sacrifice_flies: count(11),
        })
    }
}

/// Cumulative pitching counters for one player, keyed by name and team.
#[derive(Debug, Clone, Serialize)]
pub struct PitcherTotals {
    pub name: String,
    pub team: String,
    pub pitches: u32,
    pub innings: Innings,
    pub batters_faced: u32,
    pub hits_allowed: u32,
    pub home_runs_allowed: u32,
    pub walks: u32,
    pub hit_by_pitch: u32,
    pub strikeouts: u32,
    pub wild_pitches: u32,
    pub balks: u32,
    pub runs_allowed: u32,
}

impl PitcherTotals {
    pub fn from_line(line: &PitcherLine, team: &str) -> PitcherTotals {
        PitcherTotals {
            name: line.name.clone(),
            team: team.to_string(),
            pitches: line.pitches,
            innings: line.innings,
            batters_faced: line.batters_faced,
            hits_allowed: line.hits_allowed,
            home_runs_allowed: line.home_runs_allowed,
            walks: line.walks,
            hit_by_pitch: line.hit_by_pitch,
            strikeouts: line.strikeouts,
            wild_pitches: line.wild_pitches,
            balks: line.balks,
            runs_allowed: line.runs_allowed,
        }
    }

    pub fn add_line(&mut self, line: &PitcherLine) {
        self.pitches += line.pitches;
        self.innings += line.innings;
        self.batters_faced += line.batters_faced;
        self.hits_allowed += line.hits_allowed;
        self.home_runs_allowed += line.home_runs_allowed;
        self.walks += line.walks;
        self.hit_by_pitch += line.hit_by_pitch;
        self.strikeouts += line.strikeouts;
        self.wild_pitches += line.wild_pitches;
        self.balks += line.balks;
        self.runs_allowed += line.runs_allowed;
    }

    pub(crate) fn to_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.team.clone(),
            self.pitches.to_string(),
            self.innings.to_string(),
            self.batters_faced.to_string(),
            self.hits_allowed.to_string(),
            self.home_runs_allowed.to_string(),
            self.walks.to_string(),
            self.hit_by_pitch.to_string(),
            self.strikeouts.to_string(),
            self.wild_pitches.to_string(),
            self.balks.to_string(),
            self.runs_allowed.to_string(),
        ]
    }

    pub(crate) fn from_row(row: &[String]) -> Option<PitcherTotals> {
        let cell = |i: usize| row.get(i).map(String::as_str).unwrap_or("").trim();
        let count = |i: usize| parse_counter(cell(i)).unwrap_or(0);
        if cell(0).is_empty() {
            return None;
        }
        Some(PitcherTotals {
            name: cell(0).to_string(),
            team: cell(1).to_string(),
            pitches: count(2),
            innings: Innings::parse_lenient(cell(3)),
            batters_faced: count(4),
            hits_allowed: count(5),
            home_runs_allowed: count(6),
            walks: count(7),
            hit_by_pitch: count(8),
            strikeouts: count(9),
            wild_pitches: count(10),
            balks: count(11),
            runs_allowed: count(12),
        })
    }
}
