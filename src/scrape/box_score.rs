use ::scraper::{ElementRef, Html, Selector};
use chrono::NaiveDate;
use regex::Regex;
use tracing::{debug, instrument};

use crate::error::{NpbError, Result};
use crate::model::{GameScrape, GameStats, HomeAway};
use crate::scrape::{self, cell_text, parse_count, select_text};
use crate::teams;

/// Placeholder name when no linescore strategy yields a team name.
const UNKNOWN_TEAM: &str = "不明";

/// Footer positions of a batting summary table.
struct BattingColumns {
    at_bats: usize,
    hits: usize,
    stolen_bases: usize,
}

/// Footer positions of a pitching summary table.
struct PitchingColumns {
    home_runs: usize,
    walks: usize,
    hit_by_pitch: usize,
    strikeouts: usize,
    wild_pitches: usize,
    balks: usize,
}

// Layout drift on npb.jp lands here and nowhere else.
const BATTING_FOOTER: BattingColumns = BattingColumns {
    at_bats: 3,
    hits: 5,
    stolen_bases: 7,
};
const PITCHING_FOOTER: PitchingColumns = PitchingColumns {
    home_runs: 7,
    walks: 8,
    hit_by_pitch: 9,
    strikeouts: 10,
    wild_pitches: 11,
    balks: 12,
};

/// Wrapper div ids of the four summary tables, resolved for one side.
struct StatTables {
    own_batting: &'static str,
    own_pitching: &'static str,
    opponent_batting: &'static str,
    opponent_pitching: &'static str,
}

impl StatTables {
    fn for_side(side: HomeAway) -> StatTables {
        match side {
            HomeAway::Home => StatTables {
                own_batting: "table_bottom_b",
                own_pitching: "table_bottom_p",
                opponent_batting: "table_top_b",
                opponent_pitching: "table_top_p",
            },
            HomeAway::Visitor => StatTables {
                own_batting: "table_top_b",
                own_pitching: "table_top_p",
                opponent_batting: "table_bottom_b",
                opponent_pitching: "table_bottom_p",
            },
        }
    }
}

/// Scrapes one box-score page, reading stats from `home_away`'s perspective.
#[instrument(skip(client))]
pub(crate) async fn extract_game(
    client: &reqwest::Client,
    url: &str,
    home_away: HomeAway,
) -> Result<GameScrape> {
    let document = scrape::get_document(client, &scrape::absolutize_url(url)).await?;
    let game = parse_game(&document, home_away)?;
    debug!(
        date = %game.date,
        home = %game.home_team,
        away = %game.away_team,
        "parsed box score"
    );
    Ok(game)
}

pub(crate) fn parse_game(document: &Html, home_away: HomeAway) -> Result<GameScrape> {
    let date = parse_game_date(document)?;
    let (duration, attendance) = parse_game_info(document)?;

    let linescore_selector = Selector::parse("table#tablefix_ls")?;
    let linescore = document
        .select(&linescore_selector)
        .next()
        .ok_or(NpbError::ElementNotFound {
            context: "linescore table",
        })?;
    let visitor_selector = Selector::parse("tr.top")?;
    let home_selector = Selector::parse("tr.bottom")?;
    let visitor_row =
        linescore
            .select(&visitor_selector)
            .next()
            .ok_or(NpbError::ElementNotFound {
                context: "visitor linescore row",
            })?;
    let home_row = linescore
        .select(&home_selector)
        .next()
        .ok_or(NpbError::ElementNotFound {
            context: "home linescore row",
        })?;

    let away_team = teams::display_name_for(&team_name(&visitor_row)?);
    let home_team = teams::display_name_for(&team_name(&home_row)?);
    let away_score = total_score(&visitor_row)?;
    let home_score = total_score(&home_row)?;

    let stats = parse_team_stats(document, home_away)?;

    Ok(GameScrape {
        date,
        home_team,
        away_team,
        home_score,
        away_score,
        duration,
        attendance,
        stats,
    })
}

fn parse_game_date(document: &Html) -> Result<NaiveDate> {
    let title_selector = Selector::parse("div.game_tit time")?;
    let text = document
        .select(&title_selector)
        .next()
        .map(|e| cell_text(&e))
        .ok_or(NpbError::ElementNotFound {
            context: "game title date",
        })?;
    let pattern = Regex::new(r"(\d{4})年(\d{1,2})月(\d{1,2})日")?;
    let caps = pattern
        .captures(&text)
        .ok_or(NpbError::ElementNotFound {
            context: "game date",
        })?;
    NaiveDate::from_ymd_opt(
        caps[1].parse()?,
        caps[2].parse()?,
        caps[3].parse()?,
    )
    .ok_or(NpbError::ElementNotFound {
        context: "game date",
    })
}

/// Duration comes back as `H:MM`, attendance as bare digits. Either is
/// empty when the info line omits it.
fn parse_game_info(document: &Html) -> Result<(String, String)> {
    let info_selector = Selector::parse("p.game_info")?;
    let text = document
        .select(&info_selector)
        .next()
        .map(|e| cell_text(&e))
        .unwrap_or_default();

    let duration = Regex::new(r"試合時間\s*([0-9]{1,2})時間([0-9]{1,2})分")?
        .captures(&text)
        .map(|caps| {
            let hours: u32 = caps[1].parse().unwrap_or_default();
            format!("{}:{:0>2}", hours, &caps[2])
        })
        .unwrap_or_default();
    let attendance = Regex::new(r"入場者\s*([0-9,]+)")?
        .captures(&text)
        .map(|caps| caps[1].replace(',', ""))
        .unwrap_or_default();

    Ok((duration, attendance))
}

/// Selectors shared by the name strategies.
struct NameSelectors {
    span: Selector,
    th: Selector,
    td: Selector,
}

impl NameSelectors {
    fn new() -> Result<NameSelectors> {
        Ok(NameSelectors {
            span: Selector::parse("span")?,
            th: Selector::parse("th")?,
            td: Selector::parse("td")?,
        })
    }
}

/// Team names appear in whichever of several markup shapes the page
/// generation picked, so extraction runs an ordered strategy list and the
/// first one yielding text wins.
const NAME_STRATEGIES: &[fn(&NameSelectors, &ElementRef) -> Option<String>] = &[
    nested_span,
    header_span,
    header_text,
    first_cell,
    row_prefix,
];

fn team_name(row: &ElementRef) -> Result<String> {
    let selectors = NameSelectors::new()?;
    Ok(NAME_STRATEGIES
        .iter()
        .find_map(|strategy| strategy(&selectors, row))
        .unwrap_or_else(|| UNKNOWN_TEAM.to_string()))
}

fn nested_span(selectors: &NameSelectors, row: &ElementRef) -> Option<String> {
    non_empty(select_text(row, &selectors.span))
}

fn header_span(selectors: &NameSelectors, row: &ElementRef) -> Option<String> {
    let th = row.select(&selectors.th).next()?;
    let span = th.select(&selectors.span).next()?;
    non_empty(cell_text(&span))
}

fn header_text(selectors: &NameSelectors, row: &ElementRef) -> Option<String> {
    let th = row.select(&selectors.th).next()?;
    non_empty(cell_text(&th))
}

fn first_cell(selectors: &NameSelectors, row: &ElementRef) -> Option<String> {
    let td = row.select(&selectors.td).next()?;
    non_empty(cell_text(&td))
}

/// Last resort: the text of the whole row up to the first digit.
fn row_prefix(_: &NameSelectors, row: &ElementRef) -> Option<String> {
    let prefix: String = cell_text(row)
        .chars()
        .take_while(|c| !c.is_numeric())
        .collect();
    non_empty(prefix.trim().to_string())
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Final score from the run-total cell; unreadable text counts as zero.
fn total_score(row: &ElementRef) -> Result<u32> {
    let total_selector = Selector::parse("td.total-1")?;
    let cell = row
        .select(&total_selector)
        .next()
        .ok_or(NpbError::ElementNotFound {
            context: "linescore total cell",
        })?;
    Ok(parse_count(&cell_text(&cell)).unwrap_or(0))
}

/// Reads all four summary footers and assembles own-perspective stats.
///
/// Offense counts that the page only tabulates on the pitching side (home
/// runs, walks, hit-by-pitch, strikeouts) are read from the opposing
/// pitching footer: a walk drawn by a batter is a walk issued by the
/// opposing pitcher. The same identity makes the opponent's home-run count
/// a second read of the own pitching footer.
fn parse_team_stats(document: &Html, home_away: HomeAway) -> Result<GameStats> {
    let tables = StatTables::for_side(home_away);
    let own_batting = footer_cells(document, tables.own_batting)?;
    let own_pitching = footer_cells(document, tables.own_pitching)?;
    let opponent_batting = footer_cells(document, tables.opponent_batting)?;
    let opponent_pitching = footer_cells(document, tables.opponent_pitching)?;

    Ok(GameStats {
        at_bats: stat_at(&own_batting, BATTING_FOOTER.at_bats),
        hits: stat_at(&own_batting, BATTING_FOOTER.hits),
        stolen_bases: stat_at(&own_batting, BATTING_FOOTER.stolen_bases),
        home_runs: stat_at(&opponent_pitching, PITCHING_FOOTER.home_runs),
        walks: stat_at(&opponent_pitching, PITCHING_FOOTER.walks),
        hit_by_pitch: stat_at(&opponent_pitching, PITCHING_FOOTER.hit_by_pitch),
        strikeouts: stat_at(&opponent_pitching, PITCHING_FOOTER.strikeouts),
        home_runs_allowed: stat_at(&own_pitching, PITCHING_FOOTER.home_runs),
        walks_allowed: stat_at(&own_pitching, PITCHING_FOOTER.walks),
        hit_by_pitch_allowed: stat_at(&own_pitching, PITCHING_FOOTER.hit_by_pitch),
        strikeouts_thrown: stat_at(&own_pitching, PITCHING_FOOTER.strikeouts),
        wild_pitches: stat_at(&own_pitching, PITCHING_FOOTER.wild_pitches),
        balks: stat_at(&own_pitching, PITCHING_FOOTER.balks),
        opponent_at_bats: stat_at(&opponent_batting, BATTING_FOOTER.at_bats),
        opponent_hits: stat_at(&opponent_batting, BATTING_FOOTER.hits),
        opponent_home_runs: stat_at(&own_pitching, PITCHING_FOOTER.home_runs),
        opponent_stolen_bases: stat_at(&opponent_batting, BATTING_FOOTER.stolen_bases),
    })
}

/// Footer header cells of one summary table; `None` when the table or its
/// footer row is missing entirely.
fn footer_cells(document: &Html, wrapper_id: &str) -> Result<Option<Vec<String>>> {
    let row_selector = Selector::parse(&format!("div#{wrapper_id} tfoot tr"))?;
    let header_selector = Selector::parse("th")?;
    Ok(document.select(&row_selector).next().map(|row| {
        row.select(&header_selector)
            .map(|th| cell_text(&th))
            .collect()
    }))
}

/// One positional stat out of a footer row. A missing footer, an index
/// past the end of the row, and non-numeric text all read as `None`.
fn stat_at(cells: &Option<Vec<String>>, index: usize) -> Option<u32> {
    cells.as_ref()?.get(index).and_then(|text| parse_count(text))
}
