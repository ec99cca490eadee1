use tracing::{debug, error};

use crate::contract::{SearchQuery, SearchResponse, SearchResultItem};
use crate::error::ApiError;

/// Shorter trimmed input is treated as "no query".
pub const MIN_QUERY_CHARS: usize = 2;

/// What the result area currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResultArea {
    #[default]
    Blank,
    Loading,
    Results(Vec<SearchResultItem>),
    NoResults {
        query: String,
    },
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputDecision {
    Clear,
    Debounce(String),
}

/// Decides what a keystroke should do with the current input.
pub fn classify_input(raw: &str) -> InputDecision {
    let text = raw.trim();
    if text.chars().count() < MIN_QUERY_CHARS {
        InputDecision::Clear
    } else {
        InputDecision::Debounce(text.to_string())
    }
}

/// Text to search for on explicit submit, if any.
pub fn submitted_text(raw: &str) -> Option<String> {
    let text = raw.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Handle for one issued search; only the latest ticket may update the area.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTicket {
    pub generation: u64,
    pub query: SearchQuery,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    area: ResultArea,
    generation: u64,
}

impl SearchState {
    pub fn area(&self) -> &ResultArea {
        &self.area
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Empties the area and invalidates any search still in flight.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.area = ResultArea::Blank;
    }

    pub fn begin(&mut self, query: SearchQuery) -> SearchTicket {
        self.generation += 1;
        self.area = ResultArea::Loading;
        SearchTicket {
            generation: self.generation,
            query,
        }
    }

    /// Applies a finished search. Returns `false` when the ticket was superseded.
    pub fn complete(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<SearchResponse, ApiError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                stale = ticket.generation,
                current = self.generation,
                query = %ticket.query.text,
                "Discarding stale search response"
            );
            return false;
        }

        self.area = match outcome {
            Ok(response) if response.items.is_empty() => ResultArea::NoResults {
                query: ticket.query.text.clone(),
            },
            Ok(response) => ResultArea::Results(response.items),
            Err(e) => {
                error!(error = %e, query = %ticket.query.text, "Search request failed");
                ResultArea::Failed
            }
        };
        true
    }
}
