use chrono::NaiveDate;
use serde::Serialize;
use strum_macros::EnumString;

/// URL column value for games entered by hand instead of scraped.
pub const MANUAL_ENTRY_URL: &str = "手動入力";

/// Team-name sentinel for standalone records that aggregation totals skip.
pub const OTHER_TEAM: &str = "その他";

/// Column headers of the match CSV, in storage order.
pub const MATCH_HEADERS: [&str; 28] = [
    "日付",
    "チーム名",
    "ホーム/ビジター",
    "相手チーム",
    "得点",
    "失点",
    "勝敗",
    "URL",
    "自チーム_打数",
    "自チーム_安打",
    "自チーム_本塁打",
    "自チーム_盗塁",
    "自チーム_四球",
    "自チーム_死球",
    "自チーム_三振",
    "自チーム_被本塁打",
    "自チーム_与四球",
    "自チーム_与死球",
    "自チーム_奪三振",
    "自チーム_与暴投",
    "自チーム_与ボーク",
    "相手チーム_打数",
    "相手チーム_安打",
    "相手チーム_本塁打",
    "相手チーム_盗塁",
    "試合時間",
    "入場者数",
    "コメント",
];

/// Which side of the diamond the tracked team played on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, EnumString, strum_macros::Display,
)]
pub enum HomeAway {
    #[strum(serialize = "ホーム")]
    Home,
    #[strum(serialize = "ビジター")]
    Visitor,
}

/// Game outcome from the tracked team's perspective.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, EnumString, strum_macros::Display,
)]
pub enum GameResult {
    #[strum(serialize = "勝")]
    Win,
    #[strum(serialize = "敗")]
    Lose,
    #[strum(serialize = "引分")]
    Draw,
}

impl GameResult {
    /// Outcome for a side that scored `scored` runs against `allowed`.
    pub fn from_scores(scored: u32, allowed: u32) -> GameResult {
        match scored.cmp(&allowed) {
            std::cmp::Ordering::Greater => GameResult::Win,
            std::cmp::Ordering::Less => GameResult::Lose,
            std::cmp::Ordering::Equal => GameResult::Draw,
        }
    }
}

/// Where a located game can be scraped from.
#[derive(Debug, Clone, Serialize)]
pub struct GameLocation {
    /// Absolute URL of the game's box-score page.
    pub url: String,
    pub home_away: HomeAway,
}

/// Team-level counting stats of one game, seen from the tracked team.
///
/// `None` means the value was absent or unreadable on the page; sums treat
/// it as zero.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GameStats {
    pub at_bats: Option<u32>,
    pub hits: Option<u32>,
    pub home_runs: Option<u32>,
    pub stolen_bases: Option<u32>,
    pub walks: Option<u32>,
    pub hit_by_pitch: Option<u32>,
    pub strikeouts: Option<u32>,
    pub home_runs_allowed: Option<u32>,
    pub walks_allowed: Option<u32>,
    pub hit_by_pitch_allowed: Option<u32>,
    pub strikeouts_thrown: Option<u32>,
    pub wild_pitches: Option<u32>,
    pub balks: Option<u32>,
    pub opponent_at_bats: Option<u32>,
    pub opponent_hits: Option<u32>,
    pub opponent_home_runs: Option<u32>,
    pub opponent_stolen_bases: Option<u32>,
}

impl GameStats {
    /// All counters present and zero, for manual entries.
    pub fn zeroed() -> GameStats {
        GameStats {
            at_bats: Some(0),
            hits: Some(0),
            home_runs: Some(0),
            stolen_bases: Some(0),
            walks: Some(0),
            hit_by_pitch: Some(0),
            strikeouts: Some(0),
            home_runs_allowed: Some(0),
            walks_allowed: Some(0),
            hit_by_pitch_allowed: Some(0),
            strikeouts_thrown: Some(0),
            wild_pitches: Some(0),
            balks: Some(0),
            opponent_at_bats: Some(0),
            opponent_hits: Some(0),
            opponent_home_runs: Some(0),
            opponent_stolen_bases: Some(0),
        }
    }
}

/// Everything extracted from one box-score page, before it is tied to a
/// tracked team's record.
#[derive(Debug, Clone, Serialize)]
pub struct GameScrape {
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    /// Game duration as `H:MM`, empty when the page omits it.
    pub duration: String,
    /// Attendance digits with separators stripped, empty when absent.
    pub attendance: String,
    /// Counting stats from the perspective passed to the extractor.
    pub stats: GameStats,
}

/// One stored game from the tracked team's perspective.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub date: NaiveDate,
    pub team: String,
    pub home_away: Option<HomeAway>,
    pub opponent: String,
    pub runs_scored: Option<u32>,
    pub runs_allowed: Option<u32>,
    pub result: Option<GameResult>,
    pub source_url: String,
    pub stats: GameStats,
    pub duration: String,
    pub attendance: String,
    pub comment: String,
}

/// Confirmation of a game that was scraped and written to the store.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedGame {
    pub date: NaiveDate,
    pub team: String,
    pub opponent: String,
    pub result: GameResult,
    pub runs_scored: u32,
    pub runs_allowed: u32,
    pub url: String,
}

impl RecordedGame {
    /// Confirmation view of a stored record. The result is derived from
    /// the scores it is reported with, so the two cannot disagree.
    pub(crate) fn from_record(record: &GameRecord, url: &str) -> RecordedGame {
        let runs_scored = record.runs_scored.unwrap_or(0);
        let runs_allowed = record.runs_allowed.unwrap_or(0);
        RecordedGame {
            date: record.date,
            team: record.team.clone(),
            opponent: record.opponent.clone(),
            result: GameResult::from_scores(runs_scored, runs_allowed),
            runs_scored,
            runs_allowed,
            url: url.to_string(),
        }
    }
}

impl GameRecord {
    /// Builds a record for `team` out of a scraped box score.
    pub fn from_scrape(
        scrape: &GameScrape,
        team: &str,
        home_away: HomeAway,
        url: &str,
        comment: &str,
    ) -> GameRecord {
        let (scored, allowed, opponent) = match home_away {
            HomeAway::Home => (scrape.home_score, scrape.away_score, scrape.away_team.clone()),
            HomeAway::Visitor => (scrape.away_score, scrape.home_score, scrape.home_team.clone()),
        };
        GameRecord {
            date: scrape.date,
            team: team.to_string(),
            home_away: Some(home_away),
            opponent,
            runs_scored: Some(scored),
            runs_allowed: Some(allowed),
            result: Some(GameResult::from_scores(scored, allowed)),
            source_url: url.to_string(),
            stats: scrape.stats.clone(),
            duration: scrape.duration.clone(),
            attendance: scrape.attendance.clone(),
            comment: comment.to_string(),
        }
    }

    /// Builds the mirrored home/visitor pair for a manually entered game.
    ///
    /// Both records carry zeroed counters and [`MANUAL_ENTRY_URL`]; results
    /// are mirrored (home win means visitor loss, ties are draws for both).
    pub fn manual_pair(
        date: NaiveDate,
        home_team: &str,
        away_team: &str,
        home_score: u32,
        away_score: u32,
    ) -> (GameRecord, GameRecord) {
        let base = |team: &str, home_away, scored, allowed| GameRecord {
            date,
            team: team.to_string(),
            home_away: Some(home_away),
            opponent: String::new(),
            runs_scored: Some(scored),
            runs_allowed: Some(allowed),
            result: Some(GameResult::from_scores(scored, allowed)),
            source_url: MANUAL_ENTRY_URL.to_string(),
            stats: GameStats::zeroed(),
            duration: String::new(),
            attendance: String::new(),
            comment: String::new(),
        };
        let mut home = base(home_team, HomeAway::Home, home_score, away_score);
        home.opponent = away_team.to_string();
        let mut away = base(away_team, HomeAway::Visitor, away_score, home_score);
        away.opponent = home_team.to_string();
        (home, away)
    }

    /// Builds a free-form record (non-NPB games, notes) that totals skip.
    ///
    /// The team name is fixed to [`OTHER_TEAM`] and all counters are left
    /// empty.
    #[allow(clippy::too_many_arguments)]
    pub fn standalone(
        date: NaiveDate,
        opponent: &str,
        home_away: Option<HomeAway>,
        runs_scored: Option<u32>,
        runs_allowed: Option<u32>,
        result: Option<GameResult>,
        comment: &str,
    ) -> GameRecord {
        GameRecord {
            date,
            team: OTHER_TEAM.to_string(),
            home_away,
            opponent: opponent.to_string(),
            runs_scored,
            runs_allowed,
            result,
            source_url: String::new(),
            stats: GameStats::default(),
            duration: String::new(),
            attendance: String::new(),
            comment: comment.to_string(),
        }
    }

    /// Serializes the record into its 28 CSV cells, in header order.
    pub(crate) fn to_row(&self) -> Vec<String> {
        let opt = |v: Option<u32>| v.map(|n| n.to_string()).unwrap_or_default();
        let s = &self.stats;
        vec![
            self.date.format("%Y-%m-%d").to_string(),
            self.team.clone(),
            self.home_away.map(|h| h.to_string()).unwrap_or_default(),
            self.opponent.clone(),
            opt(self.runs_scored),
            opt(self.runs_allowed),
            self.result.map(|r| r.to_string()).unwrap_or_default(),
            self.source_url.clone(),
            opt(s.at_bats),
            opt(s.hits),
            opt(s.home_runs),
            opt(s.stolen_bases),
            opt(s.walks),
            opt(s.hit_by_pitch),
            opt(s.strikeouts),
            opt(s.home_runs_allowed),
            opt(s.walks_allowed),
            opt(s.hit_by_pitch_allowed),
            opt(s.strikeouts_thrown),
            opt(s.wild_pitches),
            opt(s.balks),
            opt(s.opponent_at_bats),
            opt(s.opponent_hits),
            opt(s.opponent_home_runs),
            opt(s.opponent_stolen_bases),
            self.duration.clone(),
            self.attendance.clone(),
            self.comment.clone(),
        ]
    }

    /// Deserializes one CSV row; `None` when the date cell is unusable.
    ///
    /// Short rows are padded with empty cells, numeric cells fall back to
    /// empty on garbage, so rows from older files still load.
    pub(crate) fn from_row(row: &[String]) -> Option<GameRecord> {
        let cell = |i: usize| row.get(i).map(String::as_str).unwrap_or("").trim();
        let count = |i: usize| parse_counter(cell(i));
        let date = parse_date(cell(0))?;
        Some(GameRecord {
            date,
            team: cell(1).to_string(),
            home_away: cell(2).parse().ok(),
            opponent: cell(3).to_string(),
            runs_scored: count(4),
            runs_allowed: count(5),
            result: cell(6).parse().ok(),
            source_url: cell(7).to_string(),
            stats: GameStats {
                at_bats: count(8),
                hits: count(9),
                home_runs: count(10),
                stolen_bases: count(11),
                walks: count(12),
                hit_by_pitch: count(13),
                strikeouts: count(14),
                home_runs_allowed: count(15),
                walks_allowed: count(16),
                hit_by_pitch_allowed: count(17),
                strikeouts_thrown: count(18),
                wild_pitches: count(19),
                balks: count(20),
                opponent_at_bats: count(21),
                opponent_hits: count(22),
                opponent_home_runs: count(23),
                opponent_stolen_bases: count(24),
            },
            duration: cell(25).to_string(),
            attendance: cell(26).to_string(),
            comment: cell(27).to_string(),
        })
    }
}

/// Parses a stored counter cell, tolerating float renderings like `5.0`.
pub(crate) fn parse_counter(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<u32>()
        .ok()
        .or_else(|| text.parse::<f64>().ok().map(|f| f as u32))
}

/// Parses a stored `%Y-%m-%d` date, tolerating a trailing time component.
pub(crate) fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let candidate = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(candidate, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_result_from_scores() {
        assert_eq!(GameResult::from_scores(5, 3), GameResult::Win);
        assert_eq!(GameResult::from_scores(2, 4), GameResult::Lose);
        assert_eq!(GameResult::from_scores(1, 1), GameResult::Draw);
    }

    #[test]
    fn test_manual_pair_is_mirrored() {
        let (home, away) = GameRecord::manual_pair(date(2025, 8, 15), "中日ドラゴンズ", "阪神タイガース", 5, 3);
        assert_eq!(home.result, Some(GameResult::Win));
        assert_eq!(away.result, Some(GameResult::Lose));
        assert_eq!(home.opponent, "阪神タイガース");
        assert_eq!(away.opponent, "中日ドラゴンズ");
        assert_eq!(home.runs_scored, Some(5));
        assert_eq!(away.runs_scored, Some(3));
        assert_eq!(home.home_away, Some(HomeAway::Home));
        assert_eq!(away.home_away, Some(HomeAway::Visitor));
        assert_eq!(home.source_url, MANUAL_ENTRY_URL);
        assert_eq!(home.stats.at_bats, Some(0));
        assert_eq!(away.stats.balks, Some(0));
    }

    #[test]
    fn test_recorded_game_result_follows_scores() {
        let (home, away) =
            GameRecord::manual_pair(date(2025, 8, 2), "中日ドラゴンズ", "阪神タイガース", 2, 6);
        let recorded = RecordedGame::from_record(&home, "https://npb.jp/x/box.html");
        assert_eq!(recorded.result, GameResult::Lose);
        assert_eq!(recorded.runs_scored, 2);
        assert_eq!(recorded.runs_allowed, 6);
        assert_eq!(recorded.opponent, "阪神タイガース");
        assert_eq!(recorded.url, "https://npb.jp/x/box.html");
        assert_eq!(RecordedGame::from_record(&away, "").result, GameResult::Win);
    }

    #[test]
    fn test_manual_pair_tie_is_two_draws() {
        let (home, away) = GameRecord::manual_pair(date(2025, 8, 15), "広島東洋カープ", "巨人", 2, 2);
        assert_eq!(home.result, Some(GameResult::Draw));
        assert_eq!(away.result, Some(GameResult::Draw));
    }

    #[test]
    fn test_row_round_trip() {
        let scrape = GameScrape {
            date: date(2025, 4, 2),
            home_team: "中日ドラゴンズ".to_string(),
            away_team: "阪神タイガース".to_string(),
            home_score: 4,
            away_score: 6,
            duration: "3:12".to_string(),
            attendance: "36292".to_string(),
            stats: GameStats {
                at_bats: Some(33),
                hits: Some(8),
                strikeouts: Some(7),
                ..GameStats::default()
            },
        };
        let record =
            GameRecord::from_scrape(&scrape, "中日ドラゴンズ", HomeAway::Home, "https://npb.jp/x/box.html", "");
        let row = record.to_row();
        assert_eq!(row.len(), MATCH_HEADERS.len());
        assert_eq!(row[0], "2025-04-02");
        assert_eq!(row[2], "ホーム");
        assert_eq!(row[6], "敗");
        assert_eq!(row[10], "");

        let back = GameRecord::from_row(&row).unwrap();
        assert_eq!(back.date, record.date);
        assert_eq!(back.result, Some(GameResult::Lose));
        assert_eq!(back.stats.at_bats, Some(33));
        assert_eq!(back.stats.home_runs, None);
        assert_eq!(back.duration, "3:12");
    }

    #[test]
    fn test_from_row_tolerates_short_and_messy_rows() {
        let row: Vec<String> = ["2024-05-01 00:00:00", "中日ドラゴンズ", "ビジター", "巨人", "3.0", "x"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let record = GameRecord::from_row(&row).unwrap();
        assert_eq!(record.date, date(2024, 5, 1));
        assert_eq!(record.runs_scored, Some(3));
        assert_eq!(record.runs_allowed, None);
        assert_eq!(record.result, None);
        assert_eq!(record.comment, "");

        let bad_date: Vec<String> = ["not a date".to_string()].to_vec();
        assert!(GameRecord::from_row(&bad_date).is_none());
    }

    #[test]
    fn test_standalone_record_skips_counters() {
        let record = GameRecord::standalone(
            date(2025, 3, 1),
            "オープン戦相手",
            None,
            Some(4),
            Some(4),
            Some(GameResult::Draw),
            "練習試合",
        );
        assert_eq!(record.team, OTHER_TEAM);
        assert_eq!(record.stats.at_bats, None);
        assert_eq!(record.source_url, "");
    }
}
