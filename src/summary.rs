//! Aggregation over stored game records.

use chrono::Datelike;
use itertools::Itertools;

use crate::model::{
    BatterRates, BatterTotals, CounterTotal, GameRecord, GameResult, HomeAway, OpponentSplit,
    PitcherRates, PitcherTotals, RecentGame, SideRecord, Streak, Summary, TeamRates, TeamTotals,
    YearSplit, OTHER_TEAM,
};

/// Builds the aggregate view over `records`.
///
/// Record counts, splits and the streak look at games with a recorded
/// outcome; counting totals further drop free-form records, which carry no
/// scraped counters. The cumulative balance runs over everything.
pub fn summarize(records: &[GameRecord]) -> Summary {
    let ordered = records.iter().sorted_by_key(|r| r.date).collect_vec();
    let decided = ordered
        .iter()
        .copied()
        .filter(|r| r.result.is_some())
        .collect_vec();
    let counted = decided
        .iter()
        .copied()
        .filter(|r| !r.team.contains(OTHER_TEAM))
        .collect_vec();

    let (wins, losses, draws) = tally(&decided);

    let mut balance = 0i64;
    let mut cumulative = vec![0i64];
    for record in &ordered {
        balance += match record.result {
            Some(GameResult::Win) => 1,
            Some(GameResult::Lose) => -1,
            _ => 0,
        };
        cumulative.push(balance);
    }

    let streak = decided
        .last()
        .and_then(|latest| latest.result)
        .map(|result| Streak {
            length: decided
                .iter()
                .rev()
                .take_while(|r| r.result == Some(result))
                .count(),
            result,
        });

    let recent_games = ordered
        .iter()
        .rev()
        .take(5)
        .map(|r| RecentGame {
            date: r.date,
            opponent: r.opponent.clone(),
            runs_scored: r.runs_scored,
            runs_allowed: r.runs_allowed,
            result: r.result,
        })
        .collect_vec();

    let vs_opponent = decided
        .iter()
        .copied()
        .into_group_map_by(|r| r.opponent.clone())
        .into_iter()
        .map(|(opponent, games)| {
            let (wins, losses, draws) = tally(&games);
            OpponentSplit {
                opponent,
                games: games.len(),
                wins,
                losses,
                draws,
                win_rate: win_rate(wins, wins + losses),
            }
        })
        .sorted_by(|a, b| b.games.cmp(&a.games).then_with(|| a.opponent.cmp(&b.opponent)))
        .collect_vec();

    let by_year = decided
        .iter()
        .copied()
        .into_group_map_by(|r| r.date.year())
        .into_iter()
        .map(|(year, games)| {
            let (wins, losses, draws) = tally(&games);
            YearSplit {
                year,
                games: games.len(),
                wins,
                losses,
                draws,
                win_rate: win_rate(wins, wins + losses),
            }
        })
        .sorted_by_key(|split| std::cmp::Reverse(split.year))
        .collect_vec();

    let totals = team_totals(&counted, &ordered);
    let rates = team_rates(&totals);

    Summary {
        recorded_games: records.len(),
        total_games: decided.len(),
        wins,
        losses,
        draws,
        win_rate: win_rate(wins, wins + losses),
        cumulative,
        streak,
        recent_games,
        vs_opponent,
        by_year,
        home: side_record(&decided, HomeAway::Home),
        away: side_record(&decided, HomeAway::Visitor),
        totals,
        rates,
    }
}

/// Rate stats for one batter's accumulated counters.
pub fn batter_rates(totals: &BatterTotals) -> BatterRates {
    let at_bats = u64::from(totals.at_bats);
    let hits = u64::from(totals.hits);
    let walks = u64::from(totals.walks);
    let hit_by_pitch = u64::from(totals.hit_by_pitch);
    let on_base = ratio(
        hits + walks + hit_by_pitch,
        at_bats + walks + hit_by_pitch + u64::from(totals.sacrifice_flies),
        3,
    );
    let slugging = ratio(hits + u64::from(totals.home_runs) * 3, at_bats, 3);
    BatterRates {
        batting_average: ratio(hits, at_bats, 3),
        on_base,
        ops: on_base.zip(slugging).map(|(o, s)| round_to(o + s, 3)),
    }
}

/// Rate stats for one pitcher's accumulated counters.
///
/// Every allowed run counts as earned; the box score does not split earned
/// from unearned runs.
pub fn pitcher_rates(totals: &PitcherTotals) -> PitcherRates {
    let innings = totals.innings.as_f64();
    if innings == 0.0 {
        return PitcherRates::default();
    }
    PitcherRates {
        earned_run_average: Some(round_to(f64::from(totals.runs_allowed) * 9.0 / innings, 2)),
        strikeouts_per_nine: Some(round_to(f64::from(totals.strikeouts) * 9.0 / innings, 2)),
    }
}

fn tally(records: &[&GameRecord]) -> (usize, usize, usize) {
    let mut wins = 0;
    let mut losses = 0;
    let mut draws = 0;
    for record in records {
        match record.result {
            Some(GameResult::Win) => wins += 1,
            Some(GameResult::Lose) => losses += 1,
            Some(GameResult::Draw) => draws += 1,
            None => {}
        }
    }
    (wins, losses, draws)
}

fn side_record(decided: &[&GameRecord], side: HomeAway) -> SideRecord {
    let games = decided
        .iter()
        .copied()
        .filter(|r| r.home_away == Some(side))
        .collect_vec();
    let (wins, losses, draws) = tally(&games);
    // Draws stay in the side denominator, unlike the overall rate.
    SideRecord {
        wins,
        losses,
        draws,
        win_rate: win_rate(wins, games.len()),
    }
}

fn team_totals(counted: &[&GameRecord], all: &[&GameRecord]) -> TeamTotals {
    let games = counted.len();
    let total = |value: fn(&GameRecord) -> u64| {
        let sum: u64 = counted.iter().map(|r| value(r)).sum();
        CounterTotal {
            sum,
            per_game: per_game(sum, games),
        }
    };

    TeamTotals {
        games,
        runs_scored: total(|r| u64::from(r.runs_scored.unwrap_or(0))),
        runs_allowed: total(|r| u64::from(r.runs_allowed.unwrap_or(0))),
        at_bats: total(|r| u64::from(r.stats.at_bats.unwrap_or(0))),
        hits: total(|r| u64::from(r.stats.hits.unwrap_or(0))),
        home_runs: total(|r| u64::from(r.stats.home_runs.unwrap_or(0))),
        stolen_bases: total(|r| u64::from(r.stats.stolen_bases.unwrap_or(0))),
        walks: total(|r| u64::from(r.stats.walks.unwrap_or(0))),
        hit_by_pitch: total(|r| u64::from(r.stats.hit_by_pitch.unwrap_or(0))),
        strikeouts: total(|r| u64::from(r.stats.strikeouts.unwrap_or(0))),
        home_runs_allowed: total(|r| u64::from(r.stats.home_runs_allowed.unwrap_or(0))),
        walks_allowed: total(|r| u64::from(r.stats.walks_allowed.unwrap_or(0))),
        hit_by_pitch_allowed: total(|r| u64::from(r.stats.hit_by_pitch_allowed.unwrap_or(0))),
        strikeouts_thrown: total(|r| u64::from(r.stats.strikeouts_thrown.unwrap_or(0))),
        wild_pitches: total(|r| u64::from(r.stats.wild_pitches.unwrap_or(0))),
        balks: total(|r| u64::from(r.stats.balks.unwrap_or(0))),
        opponent_at_bats: total(|r| u64::from(r.stats.opponent_at_bats.unwrap_or(0))),
        opponent_hits: total(|r| u64::from(r.stats.opponent_hits.unwrap_or(0))),
        opponent_home_runs: total(|r| u64::from(r.stats.opponent_home_runs.unwrap_or(0))),
        opponent_stolen_bases: total(|r| u64::from(r.stats.opponent_stolen_bases.unwrap_or(0))),
        duration_minutes: parsed_total(all, |r| duration_minutes(&r.duration)),
        attendance: parsed_total(all, |r| attendance_count(&r.attendance)),
    }
}

/// Sum and average of a counter only some records carry; records without a
/// parseable value stay out of both.
fn parsed_total(records: &[&GameRecord], value: fn(&GameRecord) -> Option<u64>) -> CounterTotal {
    let values = records.iter().filter_map(|r| value(r)).collect_vec();
    let sum: u64 = values.iter().sum();
    CounterTotal {
        sum,
        per_game: per_game(sum, values.len()),
    }
}

fn team_rates(totals: &TeamTotals) -> TeamRates {
    let at_bats = totals.at_bats.sum;
    let hits = totals.hits.sum;
    let home_runs = totals.home_runs.sum;
    let walks = totals.walks.sum;
    let hit_by_pitch = totals.hit_by_pitch.sum;
    let on_base = ratio(
        hits + walks + hit_by_pitch,
        at_bats + walks + hit_by_pitch,
        3,
    );
    let slugging = ratio(hits + home_runs * 3, at_bats, 3);
    TeamRates {
        batting_average: ratio(hits, at_bats, 3),
        home_run_rate: ratio(home_runs, at_bats, 3),
        on_base,
        slugging,
        ops: on_base.zip(slugging).map(|(o, s)| round_to(o + s, 3)),
        earned_run_average: (totals.games > 0)
            .then(|| round_to(totals.runs_allowed.sum as f64 / totals.games as f64, 2)),
        opponent_batting_average: ratio(totals.opponent_hits.sum, totals.opponent_at_bats.sum, 3),
        opponent_home_run_rate: ratio(
            totals.opponent_home_runs.sum,
            totals.opponent_at_bats.sum,
            3,
        ),
    }
}

/// Total minutes from the first two numbers of a duration cell, which
/// covers both `3:12` and older `3時間12分` renderings.
fn duration_minutes(text: &str) -> Option<u64> {
    let mut numbers = text
        .split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty());
    let hours = numbers.next()?.parse::<u64>().ok()?;
    let minutes = numbers.next()?.parse::<u64>().ok()?;
    Some(hours * 60 + minutes)
}

/// Attendance cell with thousands separators and the counter suffix
/// stripped; floats left by older files are truncated.
fn attendance_count(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|c| !matches!(c, ',' | '人')).collect();
    let digits = digits.trim();
    if digits.is_empty() {
        return None;
    }
    digits
        .parse::<u64>()
        .ok()
        .or_else(|| digits.parse::<f64>().ok().map(|f| f as u64))
}

fn win_rate(wins: usize, decisions: usize) -> f64 {
    if decisions == 0 {
        return 0.0;
    }
    round_to(wins as f64 / decisions as f64, 3)
}

fn ratio(numerator: u64, denominator: u64, places: i32) -> Option<f64> {
    (denominator > 0).then(|| round_to(numerator as f64 / denominator as f64, places))
}

fn per_game(sum: u64, games: usize) -> f64 {
    if games == 0 {
        return 0.0;
    }
    round_to(sum as f64 / games as f64, 2)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GameStats, Innings};
    use chrono::NaiveDate;

    fn rec(
        day: u32,
        result: Option<GameResult>,
        home_away: Option<HomeAway>,
        opponent: &str,
    ) -> GameRecord {
        GameRecord {
            date: NaiveDate::from_ymd_opt(2025, 4, day).unwrap(),
            team: "中日ドラゴンズ".to_string(),
            home_away,
            opponent: opponent.to_string(),
            runs_scored: Some(3),
            runs_allowed: Some(2),
            result,
            source_url: String::new(),
            stats: GameStats::default(),
            duration: String::new(),
            attendance: String::new(),
            comment: String::new(),
        }
    }

    #[test]
    fn test_summarize_record_and_splits() {
        let records = vec![
            rec(1, Some(GameResult::Win), Some(HomeAway::Home), "阪神タイガース"),
            rec(2, Some(GameResult::Lose), Some(HomeAway::Home), "阪神タイガース"),
            rec(3, Some(GameResult::Win), Some(HomeAway::Visitor), "巨人"),
        ];
        let summary = summarize(&records);

        assert_eq!(summary.recorded_games, 3);
        assert_eq!(summary.total_games, 3);
        assert_eq!(summary.wins, 2);
        assert_eq!(summary.losses, 1);
        assert_eq!(summary.draws, 0);
        assert_eq!(summary.win_rate, 0.667);
        assert_eq!(summary.cumulative, vec![0, 1, 0, 1]);
        assert_eq!(
            summary.streak,
            Some(Streak {
                length: 1,
                result: GameResult::Win
            })
        );

        assert_eq!(summary.recent_games.len(), 3);
        assert_eq!(summary.recent_games[0].date.day(), 3);
        assert_eq!(summary.recent_games[2].date.day(), 1);

        assert_eq!(summary.vs_opponent.len(), 2);
        assert_eq!(summary.vs_opponent[0].opponent, "阪神タイガース");
        assert_eq!(summary.vs_opponent[0].games, 2);
        assert_eq!(summary.vs_opponent[0].win_rate, 0.5);
        assert_eq!(summary.vs_opponent[1].opponent, "巨人");
        assert_eq!(summary.vs_opponent[1].win_rate, 1.0);

        assert_eq!(summary.by_year.len(), 1);
        assert_eq!(summary.by_year[0].year, 2025);
        assert_eq!(summary.by_year[0].games, 3);

        assert_eq!(summary.home.wins, 1);
        assert_eq!(summary.home.losses, 1);
        assert_eq!(summary.home.win_rate, 0.5);
        assert_eq!(summary.away.wins, 1);
        assert_eq!(summary.away.win_rate, 1.0);
    }

    #[test]
    fn test_summarize_streak_counts_back_from_latest() {
        let records = vec![
            rec(1, Some(GameResult::Lose), Some(HomeAway::Home), "巨人"),
            rec(2, Some(GameResult::Win), Some(HomeAway::Home), "巨人"),
            rec(3, Some(GameResult::Win), Some(HomeAway::Visitor), "巨人"),
        ];
        let streak = summarize(&records).streak.unwrap();
        assert_eq!(streak.length, 2);
        assert_eq!(streak.result, GameResult::Win);
    }

    #[test]
    fn test_summarize_skips_open_games_for_streak() {
        let records = vec![
            rec(1, Some(GameResult::Win), Some(HomeAway::Home), "巨人"),
            rec(2, None, None, "巨人"),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.recorded_games, 2);
        assert_eq!(summary.total_games, 1);
        // The open game neither extends nor breaks the streak, and holds
        // the balance flat.
        assert_eq!(
            summary.streak,
            Some(Streak {
                length: 1,
                result: GameResult::Win
            })
        );
        assert_eq!(summary.cumulative, vec![0, 1, 1]);

        assert!(summarize(&[rec(3, None, None, "巨人")]).streak.is_none());
    }

    #[test]
    fn test_summarize_draws_stay_out_of_win_rate() {
        let records = vec![
            rec(1, Some(GameResult::Win), Some(HomeAway::Home), "巨人"),
            rec(2, Some(GameResult::Draw), Some(HomeAway::Home), "巨人"),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.win_rate, 1.0);
        // Side rates keep draws in the denominator.
        assert_eq!(summary.home.win_rate, 0.5);
    }

    #[test]
    fn test_summarize_free_form_records_skip_totals() {
        let mut tracked = rec(1, Some(GameResult::Win), Some(HomeAway::Home), "巨人");
        tracked.stats.at_bats = Some(33);
        tracked.stats.hits = Some(9);
        let mut other = rec(2, Some(GameResult::Draw), None, "草野球");
        other.team = OTHER_TEAM.to_string();
        other.runs_scored = Some(10);

        let summary = summarize(&[tracked, other]);
        assert_eq!(summary.total_games, 2);
        assert_eq!(summary.totals.games, 1);
        assert_eq!(summary.totals.runs_scored.sum, 3);
        assert_eq!(summary.totals.at_bats.sum, 33);
        assert_eq!(summary.totals.hits.per_game, 9.0);
    }

    #[test]
    fn test_summarize_duration_and_attendance_average_over_parseable() {
        let mut with_both = rec(1, Some(GameResult::Win), Some(HomeAway::Home), "巨人");
        with_both.duration = "3:12".to_string();
        with_both.attendance = "36,292人".to_string();
        // Older files render the duration in its page form.
        let mut with_duration = rec(2, Some(GameResult::Lose), Some(HomeAway::Home), "巨人");
        with_duration.duration = "2時間48分".to_string();
        let blank = rec(3, Some(GameResult::Win), Some(HomeAway::Home), "巨人");

        let summary = summarize(&[with_both, with_duration, blank]);
        assert_eq!(summary.totals.duration_minutes.sum, 360);
        assert_eq!(summary.totals.duration_minutes.per_game, 180.0);
        assert_eq!(summary.totals.attendance.sum, 36292);
        assert_eq!(summary.totals.attendance.per_game, 36292.0);
    }

    #[test]
    fn test_summarize_rates_need_at_bats() {
        let mut record = rec(1, Some(GameResult::Win), Some(HomeAway::Home), "巨人");
        record.stats.at_bats = Some(0);
        let summary = summarize(&[record]);
        assert!(summary.rates.batting_average.is_none());
        assert!(summary.rates.ops.is_none());
        // Run average only needs counted games.
        assert_eq!(summary.rates.earned_run_average, Some(2.0));
    }

    #[test]
    fn test_summarize_team_rates() {
        let mut record = rec(1, Some(GameResult::Win), Some(HomeAway::Home), "巨人");
        record.stats = GameStats {
            at_bats: Some(30),
            hits: Some(9),
            home_runs: Some(2),
            walks: Some(3),
            hit_by_pitch: Some(1),
            opponent_at_bats: Some(32),
            opponent_hits: Some(8),
            opponent_home_runs: Some(1),
            ..GameStats::default()
        };
        let rates = summarize(&[record]).rates;
        assert_eq!(rates.batting_average, Some(0.3));
        assert_eq!(rates.home_run_rate, Some(0.067));
        // (9 + 3 + 1) / (30 + 3 + 1)
        assert_eq!(rates.on_base, Some(0.382));
        // (9 + 2 * 3) / 30
        assert_eq!(rates.slugging, Some(0.5));
        assert_eq!(rates.ops, Some(0.882));
        assert_eq!(rates.opponent_batting_average, Some(0.25));
        assert_eq!(rates.opponent_home_run_rate, Some(0.031));
    }

    #[test]
    fn test_batter_rates() {
        let totals = BatterTotals {
            name: "岡林".to_string(),
            team: "中日ドラゴンズ".to_string(),
            at_bats: 10,
            hits: 3,
            runs_batted_in: 2,
            stolen_bases: 1,
            home_runs: 1,
            strikeouts: 2,
            walks: 2,
            hit_by_pitch: 0,
            sacrifice_bunts: 0,
            sacrifice_flies: 1,
        };
        let rates = batter_rates(&totals);
        assert_eq!(rates.batting_average, Some(0.3));
        // (3 + 2 + 0) / (10 + 2 + 0 + 1)
        assert_eq!(rates.on_base, Some(0.385));
        // 0.385 + (3 + 3) / 10
        assert_eq!(rates.ops, Some(0.985));

        let empty = BatterTotals {
            at_bats: 0,
            hits: 0,
            walks: 0,
            hit_by_pitch: 0,
            sacrifice_flies: 0,
            ..totals
        };
        assert!(batter_rates(&empty).batting_average.is_none());
        assert!(batter_rates(&empty).ops.is_none());
    }

    #[test]
    fn test_pitcher_rates() {
        let totals = PitcherTotals {
            name: "柳".to_string(),
            team: "中日ドラゴンズ".to_string(),
            pitches: 202,
            innings: Innings::parse_lenient("12.2"),
            batters_faced: 50,
            hits_allowed: 10,
            home_runs_allowed: 2,
            walks: 4,
            hit_by_pitch: 0,
            strikeouts: 14,
            wild_pitches: 1,
            balks: 0,
            runs_allowed: 4,
        };
        let rates = pitcher_rates(&totals);
        assert_eq!(rates.earned_run_average, Some(2.84));
        assert_eq!(rates.strikeouts_per_nine, Some(9.95));

        let unused = PitcherTotals {
            innings: Innings::default(),
            ..totals
        };
        assert!(pitcher_rates(&unused).earned_run_average.is_none());
    }
}
