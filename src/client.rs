use std::time::Duration;

use chrono::NaiveDate;
use tracing::{instrument, warn};

use crate::error::Result;
use crate::model::*;
use crate::scrape;
use crate::store::{MatchStore, Stores};
use crate::teams;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// The main entry point for tracking NPB games.
///
/// `NpbClient` wraps a [`reqwest::Client`] and exposes methods to locate
/// games on the npb.jp schedule, extract box scores, and write the whole
/// record through [`Stores`].
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> npb_tracker::Result<()> {
/// use chrono::NaiveDate;
/// use npb_tracker::NpbClient;
///
/// let client = NpbClient::new();
/// let date = NaiveDate::from_ymd_opt(2025, 8, 15).unwrap();
/// if let Some(located) = client.locate_game(date, "中日ドラゴンズ").await? {
///     let game = client.fetch_game(&located.url, located.home_away).await?;
///     println!(
///         "{} {} - {} {}",
///         game.away_team, game.away_score, game.home_score, game.home_team
///     );
/// }
/// # Ok(())
/// # }
/// ```
pub struct NpbClient {
    http: reqwest::Client,
}

impl NpbClient {
    /// Create a new client with default settings: a browser user agent,
    /// which npb.jp expects, and a 30 second request timeout.
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        Self { http }
    }

    /// Create a new client using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure timeouts, proxies, headers, etc.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { http: client }
    }

    /// Find `team`'s game on the monthly schedule page for `date`.
    ///
    /// `Ok(None)` means the schedule lists no game for that team and date.
    #[instrument(skip(self))]
    pub async fn locate_game(&self, date: NaiveDate, team: &str) -> Result<Option<GameLocation>> {
        scrape::schedule::locate_game(&self.http, date, team).await
    }

    /// Fetch and parse a box-score page, seen from `home_away`'s side.
    #[instrument(skip(self))]
    pub async fn fetch_game(&self, url: &str, home_away: HomeAway) -> Result<GameScrape> {
        scrape::box_score::extract_game(&self.http, url, home_away).await
    }

    /// Fetch per-player batting and pitching lines for `home_away`'s
    /// roster. Failures are logged and come back as empty lists.
    #[instrument(skip(self))]
    pub async fn fetch_player_stats(
        &self,
        url: &str,
        home_away: HomeAway,
    ) -> (Vec<BatterLine>, Vec<PitcherLine>) {
        scrape::players::extract_players(&self.http, url, home_away).await
    }

    /// Locate, scrape and store `team`'s game on `date` in one call.
    ///
    /// Player career counters are folded in before the match row is saved;
    /// their failures are logged and never block the record. `Ok(None)`
    /// means no game was scheduled for that team and date.
    #[instrument(skip(self, stores))]
    pub async fn record_game(
        &self,
        stores: &Stores,
        date: NaiveDate,
        team: &str,
        comment: &str,
    ) -> Result<Option<RecordedGame>> {
        let Some(location) = self.locate_game(date, team).await? else {
            return Ok(None);
        };
        let game = self.fetch_game(&location.url, location.home_away).await?;
        let team_name = teams::display_name_for(team);
        let record = GameRecord::from_scrape(
            &game,
            &team_name,
            location.home_away,
            &location.url,
            comment,
        );

        let (batters, pitchers) = self
            .fetch_player_stats(&location.url, location.home_away)
            .await;
        if let Err(e) = stores.batting.accumulate(&batters, &team_name) {
            warn!(error = %e, "batter counters not saved");
        }
        if let Err(e) = stores.pitching.accumulate(&pitchers, &team_name) {
            warn!(error = %e, "pitcher counters not saved");
        }

        let recorded = RecordedGame::from_record(&record, &location.url);
        stores.matches.upsert(record)?;
        Ok(Some(recorded))
    }

    /// Store a manually entered game as its mirrored home/visitor pair,
    /// returning the two records written.
    pub fn record_manual(
        &self,
        store: &MatchStore,
        date: NaiveDate,
        home_team: &str,
        away_team: &str,
        home_score: u32,
        away_score: u32,
    ) -> Result<(GameRecord, GameRecord)> {
        let (home, away) =
            GameRecord::manual_pair(date, home_team, away_team, home_score, away_score);
        store.upsert_pair(home.clone(), away.clone())?;
        Ok((home, away))
    }
}

impl Default for NpbClient {
    fn default() -> Self {
        Self::new()
    }
}
