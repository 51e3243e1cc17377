//! Code buffer and candidate lookup.
//!
//! The editor owns the code typed since the last commit and a memoized
//! candidate page for it. Any buffer mutation marks the page dirty; the next
//! read re-queries the table. Paging never re-queries.

use std::sync::Arc;

use tabime_engine::{MatchMode, PhraseTable, TableError};
use tracing::{debug, warn};

use super::candidate::{Candidate, CandidatePage};

/// Rejected buffer edits
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("symbol {0:?} is not in the input alphabet")]
    InvalidInput(char),

    #[error("code buffer is full ({max} symbols)")]
    BufferFull { max: usize },
}

/// Editor configuration
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Symbols accepted into the code buffer
    pub alphabet: String,
    /// Maximum code buffer length
    pub max_code_len: usize,
    /// Candidates per page
    pub page_size: usize,
    /// Prefix or exact code matching
    pub match_mode: MatchMode,
    /// Upper bound on candidates fetched per lookup
    pub lookup_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            alphabet: "abcdefghijklmnopqrstuvwxyz".to_string(),
            max_code_len: 16,
            page_size: CandidatePage::DEFAULT_PAGE_SIZE,
            match_mode: MatchMode::Prefix,
            lookup_limit: 256,
        }
    }
}

pub struct Editor {
    config: EditorConfig,
    table: Arc<dyn PhraseTable>,
    /// Code typed so far
    buffer: String,
    /// Candidates for `buffer` as of the last lookup
    page: CandidatePage,
    /// Set by buffer mutations; cleared by the next lookup
    dirty: bool,
    /// The last lookup failed; candidates are empty until the next one succeeds
    lookup_failed: bool,
}

impl Editor {
    pub fn new(table: Arc<dyn PhraseTable>, config: EditorConfig) -> Self {
        let page = CandidatePage::empty(config.page_size);
        Self {
            config,
            table,
            buffer: String::new(),
            page,
            dirty: false,
            lookup_failed: false,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The code typed so far
    pub fn code(&self) -> &str {
        &self.buffer
    }

    /// Number of symbols in the buffer
    pub fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.config.max_code_len
    }

    /// Append a symbol, or report why it was rejected.
    pub fn try_append(&mut self, symbol: char) -> Result<(), EditorError> {
        if !self.config.alphabet.contains(symbol) {
            return Err(EditorError::InvalidInput(symbol));
        }
        if self.is_full() {
            return Err(EditorError::BufferFull {
                max: self.config.max_code_len,
            });
        }
        self.buffer.push(symbol);
        self.dirty = true;
        Ok(())
    }

    /// Append a symbol. Returns whether the buffer changed.
    pub fn append(&mut self, symbol: char) -> bool {
        match self.try_append(symbol) {
            Ok(()) => true,
            Err(e) => {
                debug!("append rejected: {}", e);
                false
            }
        }
    }

    /// Remove the last symbol. Returns whether one was removed.
    pub fn backspace(&mut self) -> bool {
        if self.buffer.pop().is_some() {
            self.dirty = true;
            true
        } else {
            false
        }
    }

    /// Empty the buffer and drop the cached candidates.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.page.update(Vec::new());
        self.dirty = false;
        self.lookup_failed = false;
    }

    /// Display form of the raw code buffer
    pub fn auxiliary_text(&self) -> String {
        self.buffer.clone()
    }

    /// Re-query the table if the buffer changed since the last lookup.
    fn refresh(&mut self) {
        if !self.dirty {
            return;
        }
        self.dirty = false;

        if self.buffer.is_empty() {
            self.page.update(Vec::new());
            self.lookup_failed = false;
            return;
        }

        match self
            .table
            .lookup(&self.buffer, self.config.match_mode, self.config.lookup_limit)
        {
            Ok(results) => {
                debug!("lookup \"{}\": {} candidates", self.buffer, results.len());
                self.page
                    .update(results.into_iter().map(Candidate::from).collect());
                self.lookup_failed = false;
            }
            Err(e) => {
                warn!("lookup \"{}\" failed: {}", self.buffer, e);
                self.page.update(Vec::new());
                self.lookup_failed = true;
            }
        }
    }

    /// The candidate page for the current buffer
    pub fn page(&mut self) -> &CandidatePage {
        self.refresh();
        &self.page
    }

    /// Candidate at `offset` within page `page_index`
    pub fn candidate_at(&mut self, page_index: usize, offset: usize) -> Option<Candidate> {
        self.refresh();
        self.page.get(page_index, offset).cloned()
    }

    /// Candidate at `offset` within the page currently shown
    pub fn current_candidate(&mut self, offset: usize) -> Option<Candidate> {
        self.refresh();
        self.page.current(offset).cloned()
    }

    /// Total candidates for the current buffer, before paging
    pub fn candidate_count(&mut self) -> usize {
        self.refresh();
        self.page.len()
    }

    /// Whether the last lookup for the current buffer failed
    pub fn lookup_failed(&mut self) -> bool {
        self.refresh();
        self.lookup_failed
    }

    /// Show the next page. Returns false at the last page.
    pub fn next_page(&mut self) -> bool {
        self.refresh();
        self.page.next_page()
    }

    /// Show the previous page. Returns false at the first page.
    pub fn prev_page(&mut self) -> bool {
        self.refresh();
        self.page.prev_page()
    }

    /// Record one use of `candidate` in the table. Returns the new rank.
    pub fn record_usage(&self, candidate: &Candidate) -> Result<u32, TableError> {
        self.table.commit(&candidate.code, &candidate.text)
    }

    /// Persist pending rank changes in the table
    pub fn flush_table(&self) -> Result<(), TableError> {
        self.table.flush()
    }
}
