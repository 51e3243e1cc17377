//! Rank-ordered phrase table keyed by input codes.
//!
//! A table maps short ASCII codes (e.g. `hao`) to phrases with a usage rank.
//! Lookups return candidates in descending rank order; ties keep the order in
//! which the rows were registered. Committing a (code, phrase) pair bumps its
//! rank so frequently used phrases surface earlier on later lookups.
//!
//! Persisted as a TSV file (`code\tphrase\trank`).

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::ops::Bound;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Result, TableError};

const HEADER: &str = "# tabime table v1";

/// How the code buffer is matched against table codes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Every code that starts with the query
    #[default]
    Prefix,
    /// Only the code equal to the query
    Exact,
}

/// A phrase returned by a lookup, with the code it was found under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub code: String,
    pub phrase: String,
    pub rank: u32,
}

/// A (code, phrase, rank) record as stored in a table file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    pub code: String,
    pub phrase: String,
    pub rank: u32,
}

/// Read/commit contract consumed by the editor.
///
/// Implementations must return candidates in non-increasing rank order with a
/// deterministic tie-break, and serialize concurrent commits.
pub trait PhraseTable: Send + Sync {
    /// Return up to `limit` candidates for `code`. An empty code yields nothing.
    fn lookup(&self, code: &str, mode: MatchMode, limit: usize) -> Result<Vec<Candidate>>;

    /// Record one use of (code, phrase) and return the new rank.
    fn commit(&self, code: &str, phrase: &str) -> Result<u32>;

    /// Persist pending rank changes, if the table has a backing store.
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Row {
    phrase: String,
    rank: u32,
    /// Registration order, used as the tie-break between equal ranks
    seq: u32,
}

#[derive(Debug, Default)]
struct TableData {
    rows: BTreeMap<String, Vec<Row>>,
    next_seq: u32,
    dirty: bool,
}

impl TableData {
    /// Insert a row, merging duplicates of the same (code, phrase) pair by
    /// keeping the first registration and the higher rank.
    fn insert(&mut self, code: String, phrase: String, rank: u32) {
        let rows = self.rows.entry(code).or_default();
        if let Some(row) = rows.iter_mut().find(|r| r.phrase == phrase) {
            row.rank = row.rank.max(rank);
            return;
        }
        rows.push(Row {
            phrase,
            rank,
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    fn entry_count(&self) -> usize {
        self.rows.values().map(|v| v.len()).sum()
    }

    /// All entries in registration order.
    fn entries(&self) -> Vec<(u32, TableEntry)> {
        let mut all: Vec<(u32, TableEntry)> = self
            .rows
            .iter()
            .flat_map(|(code, rows)| {
                rows.iter().map(move |r| {
                    (
                        r.seq,
                        TableEntry {
                            code: code.clone(),
                            phrase: r.phrase.clone(),
                            rank: r.rank,
                        },
                    )
                })
            })
            .collect();
        all.sort_by_key(|(seq, _)| *seq);
        all
    }

    fn write_tsv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        // Write a sibling file first so a crash never leaves a truncated table
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        {
            let file = File::create(&tmp)?;
            let mut w = BufWriter::new(file);
            writeln!(w, "{}", HEADER)?;
            for (_, entry) in self.entries() {
                writeln!(w, "{}\t{}\t{}", entry.code, entry.phrase, entry.rank)?;
            }
            w.flush()?;
        }
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

/// An in-memory phrase table, optionally backed by a TSV file.
///
/// Reads take a shared lock; commits take the write lock, so rank updates on
/// the same code never race each other.
#[derive(Debug)]
pub struct TableDb {
    name: String,
    path: Option<PathBuf>,
    save_on_commit: bool,
    data: RwLock<TableData>,
}

/// Phrase JSON import types
#[derive(Deserialize)]
struct JsonPhrase {
    phrase: String,
    #[serde(default)]
    rank: u32,
}

#[derive(Deserialize)]
struct JsonEntry {
    code: String,
    phrases: Vec<JsonPhrase>,
}

fn validate_code(code: &str) -> std::result::Result<(), String> {
    if code.is_empty() {
        return Err("empty code".to_string());
    }
    if code.starts_with('#') {
        return Err("code must not start with '#'".to_string());
    }
    if let Some(c) = code.chars().find(|c| !c.is_ascii_graphic()) {
        return Err(format!("code contains invalid character {:?}", c));
    }
    Ok(())
}

/// Normalize a phrase to the form it is stored in: trimmed, NFC, and free of
/// the characters the TSV format uses as separators.
fn normalize_phrase(phrase: &str) -> std::result::Result<String, String> {
    if let Some(c) = phrase.chars().find(|c| matches!(c, '\t' | '\r' | '\n')) {
        return Err(format!("phrase contains invalid character {:?}", c));
    }
    let phrase: String = phrase.trim().nfc().collect();
    if phrase.is_empty() {
        return Err("empty phrase".to_string());
    }
    Ok(phrase)
}

impl TableDb {
    /// Create an empty, unbacked table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            save_on_commit: false,
            data: RwLock::new(TableData::default()),
        }
    }

    /// Build an unbacked table from entries, in the given registration order.
    ///
    /// Entries that could not be saved and read back are skipped with a
    /// warning. Use [`TableDb::try_from_entries`] to reject them instead.
    pub fn from_entries(
        name: impl Into<String>,
        entries: impl IntoIterator<Item = TableEntry>,
    ) -> Self {
        let name = name.into();
        let mut data = TableData::default();
        for (i, e) in entries.into_iter().enumerate() {
            match Self::checked_row(&e) {
                Ok(phrase) => data.insert(e.code, phrase, e.rank),
                Err(reason) => warn!("table '{}': skipping entry {}: {}", name, i + 1, reason),
            }
        }
        Self {
            name,
            path: None,
            save_on_commit: false,
            data: RwLock::new(data),
        }
    }

    /// Like [`TableDb::from_entries`], but the first invalid entry is a
    /// `Format` error carrying its 1-based position.
    pub fn try_from_entries(
        name: impl Into<String>,
        entries: impl IntoIterator<Item = TableEntry>,
    ) -> Result<Self> {
        let mut data = TableData::default();
        for (i, e) in entries.into_iter().enumerate() {
            let phrase = Self::checked_row(&e).map_err(|reason| TableError::Format {
                line: i + 1,
                reason,
            })?;
            data.insert(e.code, phrase, e.rank);
        }
        Ok(Self {
            name: name.into(),
            path: None,
            save_on_commit: false,
            data: RwLock::new(data),
        })
    }

    fn checked_row(entry: &TableEntry) -> std::result::Result<String, String> {
        validate_code(&entry.code)?;
        normalize_phrase(&entry.phrase)
    }

    /// Open a TSV table file.
    ///
    /// Format: `code\tphrase\trank` per line, `#` starts a comment. The rank
    /// column may be omitted (rank 0). Any other malformed line is an error:
    /// a corrupt table must not be opened silently.
    pub fn open(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = name.into();
        if !path.exists() {
            return Err(TableError::NotFound(path.display().to_string()));
        }
        let data = Self::read_tsv(path)?;
        debug!(
            "opened table '{}' from {:?}: {} entries",
            name,
            path,
            data.entry_count()
        );
        Ok(Self {
            name,
            path: Some(path.to_path_buf()),
            save_on_commit: false,
            data: RwLock::new(data),
        })
    }

    fn read_tsv(path: &Path) -> Result<TableData> {
        let reader = BufReader::new(File::open(path)?);
        let mut data = TableData::default();

        for (i, line) in reader.lines().enumerate() {
            let line_no = i + 1;
            let line = line?;
            let line = line.trim_end_matches(['\r', '\n']);
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let format_err = |reason: String| TableError::Format {
                line: line_no,
                reason,
            };

            let cols: Vec<&str> = line.split('\t').collect();
            if cols.len() < 2 || cols.len() > 3 {
                return Err(format_err(format!(
                    "expected 2 or 3 tab-separated columns, found {}",
                    cols.len()
                )));
            }
            let code = cols[0].trim();
            validate_code(code).map_err(format_err)?;
            let phrase = normalize_phrase(cols[1]).map_err(format_err)?;
            let rank = match cols.get(2) {
                Some(r) => r
                    .trim()
                    .parse::<u32>()
                    .map_err(|e| format_err(format!("invalid rank {:?}: {}", r, e)))?,
                None => 0,
            };
            data.insert(code.to_string(), phrase, rank);
        }

        Ok(data)
    }

    /// Build an unbacked table from a JSON file.
    ///
    /// The JSON format is an array of `{code, phrases: [{phrase, rank}]}`.
    /// A code or phrase that the TSV format could not hold is a `Format`
    /// error, so a built table always reopens with the same rows.
    pub fn build_from_json(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let json_entries: Vec<JsonEntry> = serde_json::from_reader(reader)?;

        // Errors report the 1-based position of the offending object in the array
        let mut data = TableData::default();
        for (i, je) in json_entries.into_iter().enumerate() {
            let format_err = |reason: String| TableError::Format {
                line: i + 1,
                reason: format!("code {:?}: {}", je.code, reason),
            };
            validate_code(&je.code).map_err(format_err)?;
            for jp in &je.phrases {
                let phrase = normalize_phrase(&jp.phrase).map_err(format_err)?;
                data.insert(je.code.clone(), phrase, jp.rank);
            }
        }
        Ok(Self {
            name: name.into(),
            path: None,
            save_on_commit: false,
            data: RwLock::new(data),
        })
    }

    /// Persist each commit immediately instead of waiting for `flush`.
    pub fn with_save_on_commit(mut self, save_on_commit: bool) -> Self {
        self.save_on_commit = save_on_commit;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Total number of (code, phrase) entries.
    pub fn entry_count(&self) -> usize {
        self.read().map(|d| d.entry_count()).unwrap_or(0)
    }

    /// Whether there are commits not yet written to disk.
    pub fn is_dirty(&self) -> bool {
        self.read().map(|d| d.dirty).unwrap_or(false)
    }

    /// Current rank of a pair, if present.
    pub fn rank_of(&self, code: &str, phrase: &str) -> Option<u32> {
        let data = self.read().ok()?;
        data.rows
            .get(code)?
            .iter()
            .find(|r| r.phrase == phrase)
            .map(|r| r.rank)
    }

    /// Snapshot of all entries in registration order.
    pub fn entries(&self) -> Result<Vec<TableEntry>> {
        let data = self.read()?;
        Ok(data.entries().into_iter().map(|(_, e)| e).collect())
    }

    /// Write the table to its backing file if it has unsaved commits.
    pub fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut data = self.write()?;
        if !data.dirty {
            return Ok(());
        }
        data.write_tsv(path)?;
        data.dirty = false;
        debug!("table '{}' saved to {:?}", self.name, path);
        Ok(())
    }

    /// Write the table to `path` regardless of its backing file.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = self.read()?;
        data.write_tsv(path.as_ref())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, TableData>> {
        self.data
            .read()
            .map_err(|_| TableError::Unavailable(self.name.clone()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, TableData>> {
        self.data
            .write()
            .map_err(|_| TableError::Unavailable(self.name.clone()))
    }
}

impl PhraseTable for TableDb {
    fn lookup(&self, code: &str, mode: MatchMode, limit: usize) -> Result<Vec<Candidate>> {
        if code.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        let data = self.read()?;

        let hits: Box<dyn Iterator<Item = (&str, &Row)> + '_> = match mode {
            MatchMode::Exact => match data.rows.get_key_value(code) {
                Some((k, rows)) => Box::new(rows.iter().map(move |r| (k.as_str(), r))),
                None => Box::new(std::iter::empty()),
            },
            MatchMode::Prefix => Box::new(
                data.rows
                    .range::<str, _>((Bound::Included(code), Bound::Unbounded))
                    .take_while(|(k, _)| k.starts_with(code))
                    .flat_map(|(k, rows)| rows.iter().map(move |r| (k.as_str(), r))),
            ),
        };

        // Max-heap ordered worst-first: popping drops the weakest hit, so at
        // most `limit` hits are held however many codes share the prefix
        let mut best: BinaryHeap<(Reverse<u32>, u32, &str, &str)> =
            BinaryHeap::with_capacity(limit.min(64) + 1);
        for (code, row) in hits {
            best.push((Reverse(row.rank), row.seq, code, row.phrase.as_str()));
            if best.len() > limit {
                best.pop();
            }
        }

        Ok(best
            .into_sorted_vec()
            .into_iter()
            .map(|(Reverse(rank), _, code, phrase)| Candidate {
                code: code.to_string(),
                phrase: phrase.to_string(),
                rank,
            })
            .collect())
    }

    fn commit(&self, code: &str, phrase: &str) -> Result<u32> {
        let mut data = self.write()?;

        let Some(row) = data
            .rows
            .get_mut(code)
            .and_then(|rows| rows.iter_mut().find(|r| r.phrase == phrase))
        else {
            return Err(TableError::UnknownEntry {
                code: code.to_string(),
                phrase: phrase.to_string(),
            });
        };
        row.rank = row.rank.saturating_add(1);
        let rank = row.rank;
        data.dirty = true;

        if self.save_on_commit
            && let Some(path) = &self.path
        {
            // A failed write keeps the table dirty; the next flush retries
            match data.write_tsv(path) {
                Ok(()) => data.dirty = false,
                Err(e) => warn!("failed to persist table '{}': {}", self.name, e),
            }
        }

        debug!("commit {}\t{} -> rank {}", code, phrase, rank);
        Ok(rank)
    }

    fn flush(&self) -> Result<()> {
        TableDb::flush(self)
    }
}

impl Drop for TableDb {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            warn!("failed to save table '{}' on close: {}", self.name, e);
        }
    }
}

/// Number of distinct codes among `entries`.
pub fn distinct_codes(entries: &[TableEntry]) -> usize {
    entries
        .iter()
        .map(|e| e.code.as_str())
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(code: &str, phrase: &str, rank: u32) -> TableEntry {
        TableEntry {
            code: code.to_string(),
            phrase: phrase.to_string(),
            rank,
        }
    }

    fn sample() -> TableDb {
        TableDb::from_entries(
            "sample",
            vec![
                entry("hao", "好", 10),
                entry("hao", "号", 8),
                entry("hao", "豪", 8),
                entry("haoo", "浩", 9),
                entry("ha", "哈", 5),
                entry("ni", "你", 7),
            ],
        )
    }

    fn phrases(cands: &[Candidate]) -> Vec<&str> {
        cands.iter().map(|c| c.phrase.as_str()).collect()
    }

    #[test]
    fn test_prefix_lookup_rank_order() {
        let table = sample();
        let results = table.lookup("hao", MatchMode::Prefix, 100).unwrap();
        assert_eq!(phrases(&results), vec!["好", "浩", "号", "豪"]);
        assert_eq!(results[1].code, "haoo");
    }

    #[test]
    fn test_exact_lookup() {
        let table = sample();
        let results = table.lookup("hao", MatchMode::Exact, 100).unwrap();
        assert_eq!(phrases(&results), vec!["好", "号", "豪"]);
    }

    #[test]
    fn test_empty_code_returns_nothing() {
        let table = sample();
        assert!(table.lookup("", MatchMode::Prefix, 100).unwrap().is_empty());
        assert!(table.lookup("", MatchMode::Exact, 100).unwrap().is_empty());
    }

    #[test]
    fn test_lookup_limit() {
        let table = sample();
        let results = table.lookup("h", MatchMode::Prefix, 2).unwrap();
        assert_eq!(phrases(&results), vec!["好", "浩"]);
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let table = sample();
        for _ in 0..3 {
            let results = table.lookup("hao", MatchMode::Exact, 100).unwrap();
            // 号 and 豪 tie at rank 8; 号 was registered first
            assert_eq!(phrases(&results), vec!["好", "号", "豪"]);
        }
    }

    #[test]
    fn test_commit_moves_phrase_up() {
        let table = sample();
        assert_eq!(table.commit("hao", "豪").unwrap(), 9);
        let results = table.lookup("hao", MatchMode::Exact, 100).unwrap();
        assert_eq!(phrases(&results), vec!["好", "豪", "号"]);

        table.commit("hao", "豪").unwrap();
        table.commit("hao", "豪").unwrap();
        let results = table.lookup("hao", MatchMode::Exact, 100).unwrap();
        assert_eq!(results[0].phrase, "豪");
        assert_eq!(results[0].rank, 11);
        assert!(table.is_dirty());
    }

    #[test]
    fn test_commit_unknown_entry() {
        let table = sample();
        let err = table.commit("hao", "你").unwrap_err();
        assert!(matches!(err, TableError::UnknownEntry { .. }));
        assert!(!table.is_dirty());
    }

    #[test]
    fn test_duplicate_rows_merged() {
        let table = TableDb::from_entries(
            "dup",
            vec![entry("a", "啊", 1), entry("a", "啊", 4), entry("a", "阿", 2)],
        );
        assert_eq!(table.entry_count(), 2);
        assert_eq!(table.rank_of("a", "啊"), Some(4));
    }

    #[test]
    fn test_open_save_roundtrip_keeps_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.tsv");
        std::fs::write(
            &path,
            "# comment\n\nhao\t好\t10\nhao\t号\t8\nni\t你\n",
        )
        .unwrap();

        let table = TableDb::open("t", &path).unwrap();
        assert_eq!(table.entry_count(), 3);
        assert_eq!(table.rank_of("ni", "你"), Some(0));

        table.commit("hao", "号").unwrap();
        table.flush().unwrap();
        assert!(!table.is_dirty());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(HEADER));
        assert!(content.contains("hao\t号\t9\n"));
        let hao = content.find("hao\t好").unwrap();
        let ni = content.find("ni\t你").unwrap();
        assert!(hao < ni);
    }

    #[test]
    fn test_save_on_commit_writes_through() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.tsv");
        std::fs::write(&path, "hao\t好\t1\n").unwrap();

        let table = TableDb::open("t", &path).unwrap().with_save_on_commit(true);
        table.commit("hao", "好").unwrap();
        assert!(!table.is_dirty());

        let reopened = TableDb::open("t2", &path).unwrap();
        assert_eq!(reopened.rank_of("hao", "好"), Some(2));
    }

    #[test]
    fn test_drop_flushes_dirty_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.tsv");
        std::fs::write(&path, "hao\t好\t1\n").unwrap();

        {
            let table = TableDb::open("t", &path).unwrap();
            table.commit("hao", "好").unwrap();
        }

        let reopened = TableDb::open("t", &path).unwrap();
        assert_eq!(reopened.rank_of("hao", "好"), Some(2));
    }

    #[test]
    fn test_open_missing_file() {
        let err = TableDb::open("x", "/nonexistent/table.tsv").unwrap_err();
        assert!(matches!(err, TableError::NotFound(_)));
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.tsv");
        std::fs::write(&path, "hao\t好\t1\nbroken_line\n").unwrap();
        let err = TableDb::open("bad", &path).unwrap_err();
        assert!(matches!(err, TableError::Format { line: 2, .. }));

        std::fs::write(&path, "hao\t好\tmany\n").unwrap();
        let err = TableDb::open("bad", &path).unwrap_err();
        assert!(matches!(err, TableError::Format { line: 1, .. }));
    }

    #[test]
    fn test_phrases_are_nfc_normalized() {
        // "é" as e + combining acute accent
        let table = TableDb::from_entries("nfc", vec![entry("e", "e\u{0301}", 1)]);
        assert_eq!(table.rank_of("e", "\u{00e9}"), Some(1));
    }

    #[test]
    fn test_build_from_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.json");
        std::fs::write(
            &path,
            r#"[{"code":"hao","phrases":[{"phrase":"好","rank":3},{"phrase":"号"}]}]"#,
        )
        .unwrap();
        let table = TableDb::build_from_json("j", &path).unwrap();
        assert_eq!(table.entry_count(), 2);
        assert_eq!(table.rank_of("hao", "号"), Some(0));
        assert_eq!(distinct_codes(&table.entries().unwrap()), 1);
    }

    #[test]
    fn test_json_build_save_reopen_keeps_rows() {
        let dir = TempDir::new().unwrap();
        let json = dir.path().join("t.json");
        std::fs::write(
            &json,
            r#"[{"code":"hao","phrases":[{"phrase":" 好 ","rank":3},{"phrase":"号"}]},
                {"code":"a","phrases":[{"phrase":"啊","rank":1}]}]"#,
        )
        .unwrap();
        let built = TableDb::build_from_json("j", &json).unwrap();

        let tsv = dir.path().join("t.tsv");
        built.save_to(&tsv).unwrap();
        let reopened = TableDb::open("j", &tsv).unwrap();
        assert_eq!(reopened.entries().unwrap(), built.entries().unwrap());
        assert_eq!(reopened.rank_of("hao", "好"), Some(3));
    }

    #[test]
    fn test_json_build_rejects_separator_in_phrase() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.json");
        for phrase in ["x\\ty", "x\\ny", "x\\r", "   "] {
            std::fs::write(
                &path,
                format!(
                    r#"[{{"code":"a","phrases":[{{"phrase":"啊"}}]}},
                        {{"code":"b","phrases":[{{"phrase":"{}"}}]}}]"#,
                    phrase
                ),
            )
            .unwrap();
            let err = TableDb::build_from_json("j", &path).unwrap_err();
            assert!(
                matches!(err, TableError::Format { line: 2, .. }),
                "{:?} -> {:?}",
                phrase,
                err
            );
        }
    }

    #[test]
    fn test_json_build_rejects_comment_code() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.json");
        std::fs::write(&path, r##"[{"code":"#a","phrases":[{"phrase":"井"}]}]"##).unwrap();
        let err = TableDb::build_from_json("j", &path).unwrap_err();
        assert!(matches!(err, TableError::Format { line: 1, .. }));
    }

    #[test]
    fn test_from_entries_skips_rows_tsv_cannot_hold() {
        let table = TableDb::from_entries(
            "mixed",
            vec![
                entry("a", "啊", 1),
                entry("#a", "井", 1),
                entry("b", "x\ty", 1),
                entry("c", "", 1),
                entry("d", "的", 1),
            ],
        );
        assert_eq!(table.entry_count(), 2);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.tsv");
        table.save_to(&path).unwrap();
        assert_eq!(TableDb::open("mixed", &path).unwrap().entry_count(), 2);
    }

    #[test]
    fn test_try_from_entries_reports_position() {
        let err = TableDb::try_from_entries(
            "bad",
            vec![entry("a", "啊", 1), entry("b", "x\ny", 1)],
        )
        .unwrap_err();
        assert!(matches!(err, TableError::Format { line: 2, .. }));

        let ok = TableDb::try_from_entries("ok", vec![entry("a", " 啊", 1)]).unwrap();
        assert_eq!(ok.rank_of("a", "啊"), Some(1));
    }

    #[test]
    fn test_comment_code_rejected_in_tsv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.tsv");
        std::fs::write(&path, "a\t啊\t1\n#a\t井\t1\n").unwrap();
        // a leading '#' is a comment line, never a code
        let table = TableDb::open("t", &path).unwrap();
        assert_eq!(table.entry_count(), 1);
        assert!(validate_code("#a").is_err());
    }

    #[test]
    fn test_prefix_lookup_bounded_matches_full_sort() {
        let entries: Vec<TableEntry> = (0..500u32)
            .map(|i| entry(&format!("h{}", i % 37), &format!("p{}", i), (i * 7919) % 13))
            .collect();
        let table = TableDb::from_entries("many", entries);

        let all = table.lookup("h", MatchMode::Prefix, usize::MAX).unwrap();
        assert_eq!(all.len(), 500);
        for limit in [1, 5, 13, 499, 500, 600] {
            let some = table.lookup("h", MatchMode::Prefix, limit).unwrap();
            assert_eq!(some.len(), limit.min(500));
            assert_eq!(some[..], all[..some.len()]);
        }
    }
}
