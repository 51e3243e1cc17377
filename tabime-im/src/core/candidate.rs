//! Candidate page management
//!
//! Holds the rank-ordered candidates for the current code buffer and a
//! fixed-size window (page) over them.

use tabime_engine::TableCandidate;

/// A single committable candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The phrase to commit
    pub text: String,
    /// The table code it was found under
    pub code: String,
    /// Usage rank at lookup time
    pub rank: u32,
    /// Position in the full (unpaged) candidate list
    pub index: usize,
}

impl Candidate {
    pub fn new(text: impl Into<String>, code: impl Into<String>, rank: u32) -> Self {
        Self {
            text: text.into(),
            code: code.into(),
            rank,
            index: 0,
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }
}

impl From<TableCandidate> for Candidate {
    fn from(c: TableCandidate) -> Self {
        Self::new(c.phrase, c.code, c.rank)
    }
}

/// An ordered candidate list viewed one page at a time.
///
/// The page origin is always a multiple of the page size. Moving past either
/// end is a no-op, and asking for a page beyond the end yields an empty slice.
#[derive(Debug, Clone)]
pub struct CandidatePage {
    /// All candidates
    candidates: Vec<Candidate>,
    /// Index of the first candidate on the current page
    origin: usize,
    /// Number of candidates per page
    page_size: usize,
}

impl CandidatePage {
    /// Default page size for candidate display
    pub const DEFAULT_PAGE_SIZE: usize = 6;

    /// Create a page view over `candidates`, starting at the first page
    pub fn new(candidates: Vec<Candidate>, page_size: usize) -> Self {
        let candidates = candidates
            .into_iter()
            .enumerate()
            .map(|(i, c)| c.with_index(i))
            .collect();
        Self {
            candidates,
            origin: 0,
            page_size: page_size.max(1),
        }
    }

    /// An empty list with the given page size
    pub fn empty(page_size: usize) -> Self {
        Self::new(Vec::new(), page_size)
    }

    /// Create a candidate list from strings (code left empty, rank 0)
    pub fn from_strings(
        strings: impl IntoIterator<Item = impl Into<String>>,
        page_size: usize,
    ) -> Self {
        let candidates = strings
            .into_iter()
            .map(|s| Candidate::new(s, "", 0))
            .collect();
        Self::new(candidates, page_size)
    }

    /// Get all candidates
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Get the number of candidates
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Get the page size
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Index of the first candidate on the current page
    pub fn origin(&self) -> usize {
        self.origin
    }

    /// Get the current page number (0-indexed)
    pub fn current_page(&self) -> usize {
        self.origin / self.page_size
    }

    /// Get the total number of pages
    pub fn total_pages(&self) -> usize {
        self.candidates.len().div_ceil(self.page_size)
    }

    /// Candidates on page `page_index`; empty past the end
    pub fn page(&self, page_index: usize) -> &[Candidate] {
        let Some(start) = page_index.checked_mul(self.page_size) else {
            return &[];
        };
        if start >= self.candidates.len() {
            return &[];
        }
        let end = (start + self.page_size).min(self.candidates.len());
        &self.candidates[start..end]
    }

    /// Get the candidates for the current page
    pub fn page_candidates(&self) -> &[Candidate] {
        self.page(self.current_page())
    }

    /// Candidate at `offset` within page `page_index`
    pub fn get(&self, page_index: usize, offset: usize) -> Option<&Candidate> {
        if offset >= self.page_size {
            return None;
        }
        self.page(page_index).get(offset)
    }

    /// Candidate at `offset` within the current page
    pub fn current(&self, offset: usize) -> Option<&Candidate> {
        self.get(self.current_page(), offset)
    }

    pub fn has_prev_page(&self) -> bool {
        self.origin > 0
    }

    pub fn has_next_page(&self) -> bool {
        self.origin + self.page_size < self.candidates.len()
    }

    /// Move to the next page. Returns false at the last page.
    pub fn next_page(&mut self) -> bool {
        if !self.has_next_page() {
            return false;
        }
        self.origin += self.page_size;
        true
    }

    /// Move to the previous page. Returns false at the first page.
    pub fn prev_page(&mut self) -> bool {
        if !self.has_prev_page() {
            return false;
        }
        self.origin -= self.page_size;
        true
    }

    /// Replace the candidates and return to the first page
    pub fn update(&mut self, candidates: Vec<Candidate>) {
        *self = Self::new(candidates, self.page_size);
    }
}

impl Default for CandidatePage {
    fn default() -> Self {
        Self::empty(Self::DEFAULT_PAGE_SIZE)
    }
}
