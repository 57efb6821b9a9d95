use chrono::NaiveDate;

use npb_tracker::store::{StoreConfig, Stores};
use npb_tracker::{summary, NpbClient};

#[tokio::main]
async fn main() {
    let mut args = std::env::args().skip(1);
    let date = args
        .next()
        .expect("usage: record_game <YYYY-MM-DD> <team> [comment]");
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").unwrap();
    let team = args.next().unwrap_or_else(|| "中日ドラゴンズ".to_string());
    let comment = args.next().unwrap_or_default();

    let stores = Stores::open(StoreConfig::default());
    let client = NpbClient::new();

    match client
        .record_game(&stores, date, &team, &comment)
        .await
        .unwrap()
    {
        Some(game) => println!(
            "{} {} vs {}: {} {}-{}",
            game.date, game.team, game.opponent, game.result, game.runs_scored, game.runs_allowed
        ),
        None => {
            println!("No game found for {team} on {date}");
            return;
        }
    }

    let records = stores.matches.load().unwrap();
    let summary = summary::summarize(&records);
    println!(
        "{} games: {} wins, {} losses, {} draws (win rate {:.3})",
        summary.total_games, summary.wins, summary.losses, summary.draws, summary.win_rate
    );
    if let Some(streak) = summary.streak {
        println!("streak: {}{}", streak.length, streak.result);
    }
}
