//! CSV-backed persistence for match records and player career counters.

mod csv;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use itertools::Itertools;
use tracing::{debug, warn};

use crate::error::{NpbError, Result};
use crate::model::{
    BatterLine, BatterTotals, GameRecord, PitcherLine, PitcherTotals, BATTER_HEADERS,
    MATCH_HEADERS, PITCHER_HEADERS,
};

/// Every tenth game save copies the match file aside.
const BACKUP_EVERY: u64 = 10;

/// Where the record files live.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> StoreConfig {
        StoreConfig {
            data_dir: PathBuf::from("data"),
        }
    }
}

/// The three record files bundled behind one handle.
pub struct Stores {
    pub matches: MatchStore,
    pub batting: BattingStore,
    pub pitching: PitchingStore,
}

impl Stores {
    pub fn open(config: StoreConfig) -> Stores {
        Stores {
            matches: MatchStore::new(
                config.data_dir.join("matches.csv"),
                config.data_dir.join("backup_counter.txt"),
            ),
            batting: BattingStore::new(config.data_dir.join("batters_stats.csv")),
            pitching: PitchingStore::new(config.data_dir.join("pitchers_stats.csv")),
        }
    }
}

/// The match CSV. Game saves advance a counter persisted next to the data;
/// comment edits and deletions rewrite the file without advancing it.
pub struct MatchStore {
    path: PathBuf,
    counter_path: PathBuf,
}

impl MatchStore {
    pub fn new(path: impl Into<PathBuf>, counter_path: impl Into<PathBuf>) -> MatchStore {
        MatchStore {
            path: path.into(),
            counter_path: counter_path.into(),
        }
    }

    /// Loads every stored record in file order. A missing file reads as
    /// empty, rows with unusable dates are skipped.
    pub fn load(&self) -> Result<Vec<GameRecord>> {
        let rows = load_rows(&self.path, MATCH_HEADERS[0])?;
        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            match GameRecord::from_row(row) {
                Some(record) => records.push(record),
                None => warn!(
                    cell = row.first().map(String::as_str).unwrap_or(""),
                    "skipped match row with unusable date"
                ),
            }
        }
        Ok(records)
    }

    /// Saves `record`, replacing any stored game with the same date and
    /// team. The replacement lands at the end of the file.
    pub fn upsert(&self, record: GameRecord) -> Result<()> {
        let mut records = self.load()?;
        records.retain(|r| !(r.date == record.date && r.team == record.team));
        records.push(record);
        self.save(&records)
    }

    /// Saves a home/visitor pair in a single write, dropping stored games
    /// of either team on that date first.
    pub fn upsert_pair(&self, a: GameRecord, b: GameRecord) -> Result<()> {
        let mut records = self.load()?;
        for record in [a, b] {
            records.retain(|r| !(r.date == record.date && r.team == record.team));
            records.push(record);
        }
        self.save(&records)
    }

    /// Appends without deduplication, for free-form records that may share
    /// a date.
    pub fn append(&self, record: GameRecord) -> Result<()> {
        let mut records = self.load()?;
        records.push(record);
        self.save(&records)
    }

    /// Rewrites the comment of every game of `team` on `date`; `false` when
    /// nothing matched.
    pub fn update_comment(&self, date: NaiveDate, team: &str, comment: &str) -> Result<bool> {
        let mut records = self.load()?;
        let mut found = false;
        for record in records
            .iter_mut()
            .filter(|r| r.date == date && r.team == team)
        {
            record.comment = comment.to_string();
            found = true;
        }
        if found {
            self.write(&records)?;
        }
        Ok(found)
    }

    /// Removes the record at `index` in file order; `false` when out of
    /// range.
    pub fn delete_at(&self, index: usize) -> Result<bool> {
        let mut records = self.load()?;
        if index >= records.len() {
            return Ok(false);
        }
        records.remove(index);
        self.write(&records)?;
        Ok(true)
    }

    fn write(&self, records: &[GameRecord]) -> Result<()> {
        let rows = records.iter().map(GameRecord::to_row).collect_vec();
        write_rows(&self.path, &MATCH_HEADERS, &rows)
    }

    fn save(&self, records: &[GameRecord]) -> Result<()> {
        self.write(records)?;
        self.bump_backup_counter();
        Ok(())
    }

    /// Counter and backup failures only warn; the primary write already
    /// went through. A missing or corrupt counter file restarts at zero.
    fn bump_backup_counter(&self) {
        let counter = fs::read_to_string(&self.counter_path)
            .ok()
            .and_then(|text| text.trim().parse::<u64>().ok())
            .unwrap_or(0)
            + 1;
        if let Err(e) = fs::write(&self.counter_path, counter.to_string()) {
            warn!(path = %self.counter_path.display(), error = %e, "backup counter not saved");
        }
        if counter % BACKUP_EVERY == 0 {
            self.backup();
        }
    }

    fn backup(&self) {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let target = self.path.with_file_name(format!("matches_backup_{stamp}.csv"));
        match fs::copy(&self.path, &target) {
            Ok(_) => debug!(path = %target.display(), "wrote match backup"),
            Err(e) => warn!(path = %target.display(), error = %e, "match backup failed"),
        }
    }
}

/// Career batting counters, one row per player and team.
pub struct BattingStore {
    path: PathBuf,
}

impl BattingStore {
    pub fn new(path: impl Into<PathBuf>) -> BattingStore {
        BattingStore { path: path.into() }
    }

    pub fn load(&self) -> Result<Vec<BatterTotals>> {
        let rows = load_rows(&self.path, BATTER_HEADERS[0])?;
        Ok(rows
            .iter()
            .filter_map(|row| BatterTotals::from_row(row))
            .collect_vec())
    }

    /// Folds one game's lines into the stored counters, adding rows for
    /// players seen for the first time.
    pub fn accumulate(&self, lines: &[BatterLine], team: &str) -> Result<()> {
        if lines.is_empty() {
            return Ok(());
        }
        let mut totals = self.load()?;
        for line in lines {
            match totals
                .iter_mut()
                .find(|t| t.name == line.name && t.team == team)
            {
                Some(entry) => entry.add_line(line),
                None => totals.push(BatterTotals::from_line(line, team)),
            }
        }
        let rows = totals.iter().map(BatterTotals::to_row).collect_vec();
        write_rows(&self.path, &BATTER_HEADERS, &rows)
    }
}

/// Career pitching counters, one row per player and team.
pub struct PitchingStore {
    path: PathBuf,
}

impl PitchingStore {
    pub fn new(path: impl Into<PathBuf>) -> PitchingStore {
        PitchingStore { path: path.into() }
    }

    pub fn load(&self) -> Result<Vec<PitcherTotals>> {
        let rows = load_rows(&self.path, PITCHER_HEADERS[0])?;
        Ok(rows
            .iter()
            .filter_map(|row| PitcherTotals::from_row(row))
            .collect_vec())
    }

    /// Folds one game's lines into the stored counters, adding rows for
    /// pitchers seen for the first time.
    pub fn accumulate(&self, lines: &[PitcherLine], team: &str) -> Result<()> {
        if lines.is_empty() {
            return Ok(());
        }
        let mut totals = self.load()?;
        for line in lines {
            match totals
                .iter_mut()
                .find(|t| t.name == line.name && t.team == team)
            {
                Some(entry) => entry.add_line(line),
                None => totals.push(PitcherTotals::from_line(line, team)),
            }
        }
        let rows = totals.iter().map(PitcherTotals::to_row).collect_vec();
        write_rows(&self.path, &PITCHER_HEADERS, &rows)
    }
}

fn load_rows(path: &Path, header: &str) -> Result<Vec<Vec<String>>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(NpbError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    Ok(csv::parse(&text)
        .into_iter()
        .filter(|row| row.first().map(String::as_str) != Some(header))
        .collect_vec())
}

fn write_rows(path: &Path, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| NpbError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    // Excel needs the BOM to read the Japanese headers as UTF-8.
    let mut text = String::from("\u{feff}");
    text.push_str(&csv::encode_row(headers));
    for row in rows {
        text.push_str(&csv::encode_row(row));
    }
    fs::write(path, text).map_err(|source| NpbError::Io {
        path: path.to_path_buf(),
        source,
    })
}
