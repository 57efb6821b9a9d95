use ::scraper::{ElementRef, Html, Selector};
use itertools::Itertools;
use regex::Regex;
use tracing::{debug, instrument, warn};

use crate::error::Result;
use crate::model::{BatterLine, HomeAway, Innings, PitcherLine};
use crate::scrape::{self, cell_text, parse_count};

/// Scrapes per-player lines for `home_away`'s roster from a box-score page.
///
/// Player stats are enrichment: any failure is logged and reported as two
/// empty lists so the match record itself still goes through.
#[instrument(skip(client))]
pub(crate) async fn extract_players(
    client: &reqwest::Client,
    url: &str,
    home_away: HomeAway,
) -> (Vec<BatterLine>, Vec<PitcherLine>) {
    match try_extract_players(client, url, home_away).await {
        Ok(lines) => lines,
        Err(e) => {
            warn!(url, error = %e, "player stats scrape failed, continuing without");
            (Vec::new(), Vec::new())
        }
    }
}

async fn try_extract_players(
    client: &reqwest::Client,
    url: &str,
    home_away: HomeAway,
) -> Result<(Vec<BatterLine>, Vec<PitcherLine>)> {
    let document = scrape::get_document(client, &scrape::absolutize_url(url)).await?;
    let lines = parse_players(&document, home_away)?;
    debug!(
        batters = lines.0.len(),
        pitchers = lines.1.len(),
        "parsed player box score"
    );
    Ok(lines)
}

pub(crate) fn parse_players(
    document: &Html,
    home_away: HomeAway,
) -> Result<(Vec<BatterLine>, Vec<PitcherLine>)> {
    let (batting_rows, pitching_rows) = match home_away {
        HomeAway::Home => (
            "div#table_bottom_b table#tablefix_b_b tbody tr",
            "div#table_bottom_p table#tablefix_b_p tbody tr",
        ),
        HomeAway::Visitor => (
            "div#table_top_b table#tablefix_t_b tbody tr",
            "div#table_top_p table#tablefix_t_p tbody tr",
        ),
    };
    let player_selector = Selector::parse("td.player")?;
    let label_selector = Selector::parse("th")?;
    let innings_pattern = Regex::new(r"\d+")?;

    let batting_selector = Selector::parse(batting_rows)?;
    let batters = document
        .select(&batting_selector)
        .filter_map(|row| parse_batter_row(&row, &player_selector))
        .collect_vec();

    let pitching_selector = Selector::parse(pitching_rows)?;
    let pitchers = document
        .select(&pitching_selector)
        .filter_map(|row| parse_pitcher_row(&row, &player_selector, &label_selector, &innings_pattern))
        .collect_vec();

    Ok((batters, pitchers))
}

/// Direct `td` children only; cells of nested layout tables stay out so
/// positional indexing holds.
fn direct_cells<'a>(row: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "td")
        .collect_vec()
}

/// At-bats, hits, RBI and steals are positional; home runs and the walk
/// family only exist as inline annotations (`左本`, `三　振`, …) in the
/// at-bat result cells, so those are counted by marker substring.
fn parse_batter_row(row: &ElementRef, player_selector: &Selector) -> Option<BatterLine> {
    let cells = direct_cells(row);
    if cells.len() < 9 {
        return None;
    }
    let name = cell_text(&row.select(player_selector).next()?);
    let count = |i: usize| parse_count(&cell_text(&cells[i])).unwrap_or(0);
    let marker = |needle: &str| {
        cells
            .iter()
            .filter(|cell| cell_text(cell).contains(needle))
            .count() as u32
    };

    Some(BatterLine {
        name,
        at_bats: count(3),
        hits: count(5),
        runs_batted_in: count(6),
        stolen_bases: count(7),
        home_runs: cells[5..]
            .iter()
            .filter(|cell| cell_text(cell).contains('本'))
            .count() as u32,
        strikeouts: marker("三\u{3000}振"),
        walks: marker("四"),
        hit_by_pitch: marker("死\u{3000}球"),
        sacrifice_bunts: marker("犠打"),
        sacrifice_flies: marker("犠飛"),
    })
}

fn parse_pitcher_row(
    row: &ElementRef,
    player_selector: &Selector,
    label_selector: &Selector,
    innings_pattern: &Regex,
) -> Option<PitcherLine> {
    let cells = direct_cells(row);
    if cells.len() < 13 {
        return None;
    }
    let name = cell_text(&row.select(player_selector).next()?);
    let count = |i: usize| parse_count(&cell_text(&cells[i])).unwrap_or(0);
    // Whole innings sit in a label nested inside the fifth cell; the
    // fractional part is rendered separately and is not recorded.
    let innings = cells[4]
        .select(label_selector)
        .next()
        .and_then(|label| {
            let text = cell_text(&label);
            innings_pattern
                .find(&text)
                .and_then(|digits| digits.as_str().parse().ok())
        })
        .map(Innings::from_whole)
        .unwrap_or_default();

    Some(PitcherLine {
        name,
        pitches: count(2),
        innings,
        batters_faced: count(3),
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

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER_PAGE: &str = r#"
        <html><body>
        <div id="table_bottom_b"><table id="tablefix_b_b"><tbody>
            <tr>
                <td>1</td><td>(中)</td><td class="player">岡林</td>
                <td>5</td><td>1</td><td>2</td><td>1</td><td>0</td>
                <td>左本</td><td>三　振</td><td>四　球</td>
            </tr>
            <tr>
                <td>2</td><td>(遊)</td><td class="player">田中</td>
                <td>3</td><td>0</td><td>1</td><td>0</td><td>1</td>
                <td>遊ゴロ</td><td>犠打</td><td>死　球</td>
            </tr>
            <tr>
                <td>-</td><td class="player">投手交代</td><td></td>
            </tr>
            <tr>
                <td>9</td><td>(投)</td><td>柳</td>
                <td>2</td><td>0</td><td>0</td><td>0</td><td>0</td>
                <td>空三振</td>
            </tr>
        </tbody></table></div>
        <div id="table_bottom_p"><table id="tablefix_b_p"><tbody>
            <tr>
                <td>○</td><td class="player">柳</td>
                <td>101</td><td>25</td>
                <td><table><tr><th>6</th><td>1/3</td></tr></table></td>
                <td>5</td><td>1</td><td>2</td><td>0</td><td>7</td><td>1</td><td>0</td><td>2</td>
            </tr>
            <tr>
                <td></td><td class="player">松山</td>
                <td>14</td><td>4</td>
                <td>回途中</td>
                <td>1</td><td>0</td><td>1</td><td>0</td><td>2</td><td>0</td><td>0</td><td>0</td>
            </tr>
        </tbody></table></div>
        <div id="table_top_b"><table id="tablefix_t_b"><tbody>
            <tr>
                <td>1</td><td>(右)</td><td class="player">近本</td>
                <td>4</td><td>2</td><td>3</td><td>0</td><td>2</td>
                <td>中安</td><td>右安</td><td>左安</td>
            </tr>
        </tbody></table></div>
        </body></html>
    "#;

    #[test]
    fn test_parse_players_home_batting() {
        let document = Html::parse_document(PLAYER_PAGE);
        let (batters, _) = parse_players(&document, HomeAway::Home).unwrap();

        // The notice row and the row without a player cell are skipped.
        assert_eq!(batters.len(), 2);

        let okabayashi = &batters[0];
        assert_eq!(okabayashi.name, "岡林");
        assert_eq!(okabayashi.at_bats, 5);
        assert_eq!(okabayashi.hits, 2);
        assert_eq!(okabayashi.runs_batted_in, 1);
        assert_eq!(okabayashi.stolen_bases, 0);
        assert_eq!(okabayashi.home_runs, 1);
        assert_eq!(okabayashi.strikeouts, 1);
        assert_eq!(okabayashi.walks, 1);
        assert_eq!(okabayashi.hit_by_pitch, 0);

        let tanaka = &batters[1];
        assert_eq!(tanaka.at_bats, 3);
        assert_eq!(tanaka.home_runs, 0);
        assert_eq!(tanaka.hit_by_pitch, 1);
        assert_eq!(tanaka.sacrifice_bunts, 1);
        assert_eq!(tanaka.walks, 0);
    }

    #[test]
    fn test_parse_players_home_pitching() {
        let document = Html::parse_document(PLAYER_PAGE);
        let (_, pitchers) = parse_players(&document, HomeAway::Home).unwrap();

        assert_eq!(pitchers.len(), 2);

        let yanagi = &pitchers[0];
        assert_eq!(yanagi.name, "柳");
        assert_eq!(yanagi.pitches, 101);
        assert_eq!(yanagi.batters_faced, 25);
        assert_eq!(yanagi.innings, Innings::from_whole(6));
        assert_eq!(yanagi.hits_allowed, 5);
        assert_eq!(yanagi.home_runs_allowed, 1);
        assert_eq!(yanagi.walks, 2);
        assert_eq!(yanagi.strikeouts, 7);
        assert_eq!(yanagi.wild_pitches, 1);
        assert_eq!(yanagi.runs_allowed, 2);

        // No nested innings label: defaults to zero.
        assert_eq!(pitchers[1].innings, Innings::default());
        assert_eq!(pitchers[1].strikeouts, 2);
    }

    #[test]
    fn test_parse_players_visitor_reads_top_tables() {
        let document = Html::parse_document(PLAYER_PAGE);
        let (batters, pitchers) = parse_players(&document, HomeAway::Visitor).unwrap();

        assert_eq!(batters.len(), 1);
        assert_eq!(batters[0].name, "近本");
        assert_eq!(batters[0].hits, 3);
        assert!(pitchers.is_empty());
    }

    #[test]
    fn test_parse_players_empty_page() {
        let document = Html::parse_document("<html><body></body></html>");
        let (batters, pitchers) = parse_players(&document, HomeAway::Home).unwrap();
        assert!(batters.is_empty());
        assert!(pitchers.is_empty());
    }
}
