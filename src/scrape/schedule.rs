use ::scraper::{ElementRef, Html, Selector};
use chrono::{Datelike, NaiveDate};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::model::{GameLocation, HomeAway};
use crate::scrape::{self, select_text};
use crate::teams;

/// Finds the box-score page for `team` on `date` from the month schedule.
///
/// `team` may be a full name (`中日ドラゴンズ`) or the short form npb.jp
/// prints (`中日`). Returns `Ok(None)` when no game matches, which covers
/// off days just as well as malformed schedule markup.
#[instrument(skip(client))]
pub(crate) async fn locate_game(
    client: &reqwest::Client,
    date: NaiveDate,
    team: &str,
) -> Result<Option<GameLocation>> {
    let url = format!(
        "{}/games/{}/schedule_{:02}_detail.html",
        scrape::BASE_URL,
        date.year(),
        date.month()
    );
    let document = scrape::get_document(client, &url).await?;
    let location = find_game(&document, date, team)?;
    debug!(found = location.is_some(), "scanned month schedule");
    Ok(location)
}

/// Scans schedule rows whose id starts with `dateMMDD` for a cell naming
/// the team, then follows that cell's score link.
pub(crate) fn find_game(
    document: &Html,
    date: NaiveDate,
    team: &str,
) -> Result<Option<GameLocation>> {
    let short_name = teams::short_name_for(team);
    let row_selector = Selector::parse(&format!(
        r#"tr[id^="date{:02}{:02}"]"#,
        date.month(),
        date.day()
    ))?;
    let cell_selector = Selector::parse("td")?;
    let home_selector = Selector::parse("div.team1")?;
    let visitor_selector = Selector::parse("div.team2")?;
    let link_selector = Selector::parse(r#"a[href*="/scores/"]"#)?;

    for row in document.select(&row_selector) {
        for cell in row.select(&cell_selector) {
            let side = if matches_team(&select_text(&cell, &home_selector), &short_name) {
                HomeAway::Home
            } else if matches_team(&select_text(&cell, &visitor_selector), &short_name) {
                HomeAway::Visitor
            } else {
                continue;
            };
            // A matching cell without a usable link does not end the scan;
            // doubleheaders list the second game in a later cell.
            let Some(href) = score_link(&cell, &link_selector) else {
                continue;
            };
            return Ok(Some(GameLocation {
                url: scrape::absolutize_url(&box_score_url(href)),
                home_away: side,
            }));
        }
    }
    Ok(None)
}

/// Either name may be an abbreviation of the other, so containment is
/// checked both ways. Empty cell text never matches.
fn matches_team(cell_name: &str, short_name: &str) -> bool {
    !cell_name.is_empty()
        && !short_name.is_empty()
        && (cell_name.contains(short_name) || short_name.contains(cell_name))
}

/// First score link of the cell, unless it points at the stats subpage.
fn score_link(cell: &ElementRef, selector: &Selector) -> Option<String> {
    cell.select(selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .filter(|href| !href.contains("/stats"))
        .map(str::to_string)
}

/// Score links point at the game directory; the box score lives below it.
fn box_score_url(href: String) -> String {
    if href.ends_with("/box.html") {
        href
    } else {
        format!("{}/box.html", href.trim_end_matches('/'))
    }
}
