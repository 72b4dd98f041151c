//! Card state machine
//!
//! One [`CardState`] value replaces the loose loading/error/selection flags a
//! view would otherwise juggle. Async work is split into `begin_*` (issue a
//! ticket) and `complete_*`/`apply_*` (accept the result only if the ticket is
//! still current), so the caller can run the network part anywhere.

use tracing::debug;

use crate::Result;
use crate::models::{Forecast, Location};
use crate::search::{SearchSequence, SearchTicket};
use crate::weather::ForecastProvider;

/// Everything the card view can be showing
#[derive(Debug, Clone, Default)]
pub enum CardState {
    /// Nothing typed, nothing selected
    #[default]
    Empty,
    /// A query is waiting for (or in) a geocoding request
    Searching { query: String },
    Suggestions {
        query: String,
        locations: Vec<Location>,
    },
    NoResults { query: String },
    GeocodeError { query: String, message: String },
    LocationSelected { location: Location },
    ForecastLoading { location: Location },
    Success { forecast: Forecast },
    ForecastError { location: Location, message: String },
}

impl CardState {
    /// Short name for logs and prompts
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            CardState::Empty => "empty",
            CardState::Searching { .. } => "searching",
            CardState::Suggestions { .. } => "suggestions",
            CardState::NoResults { .. } => "no-results",
            CardState::GeocodeError { .. } => "geocode-error",
            CardState::LocationSelected { .. } => "location-selected",
            CardState::ForecastLoading { .. } => "forecast-loading",
            CardState::Success { .. } => "success",
            CardState::ForecastError { .. } => "forecast-error",
        }
    }
}

/// A search the caller should run, usually through the debouncer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub ticket: SearchTicket,
    pub query: String,
}

/// A forecast fetch the caller should run
#[derive(Debug, Clone)]
pub struct GenerateTicket {
    id: u64,
    pub location: Location,
}

/// Sequences search, selection, forecast generation and retry
#[derive(Debug)]
pub struct ForecastOrchestrator {
    state: CardState,
    searches: SearchSequence,
    generation: u64,
    min_query_chars: usize,
}

impl Default for ForecastOrchestrator {
    fn default() -> Self {
        Self::new(2)
    }
}

impl ForecastOrchestrator {
    #[must_use]
    pub fn new(min_query_chars: usize) -> Self {
        Self {
            state: CardState::Empty,
            searches: SearchSequence::new(),
            generation: 0,
            min_query_chars,
        }
    }

    /// Shared ticket counter; hand this to the `SearchDebouncer`
    #[must_use]
    pub fn search_sequence(&self) -> SearchSequence {
        self.searches.clone()
    }

    #[must_use]
    pub fn state(&self) -> &CardState {
        &self.state
    }

    /// The location the card is about, if one has been picked
    #[must_use]
    pub fn selected_location(&self) -> Option<&Location> {
        match &self.state {
            CardState::LocationSelected { location }
            | CardState::ForecastLoading { location }
            | CardState::ForecastError { location, .. } => Some(location),
            CardState::Success { forecast } => Some(&forecast.location),
            _ => None,
        }
    }

    #[must_use]
    pub fn forecast(&self) -> Option<&Forecast> {
        match &self.state {
            CardState::Success { forecast } => Some(forecast),
            _ => None,
        }
    }

    #[must_use]
    pub fn suggestions(&self) -> &[Location] {
        match &self.state {
            CardState::Suggestions { locations, .. } => locations,
            _ => &[],
        }
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            CardState::GeocodeError { message, .. } | CardState::ForecastError { message, .. } => {
                Some(message.as_str())
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.state, CardState::ForecastLoading { .. })
    }

    /// Whether the generate action is enabled
    #[must_use]
    pub fn can_generate(&self) -> bool {
        matches!(
            self.state,
            CardState::LocationSelected { .. }
                | CardState::Success { .. }
                | CardState::ForecastError { .. }
        )
    }

    /// The user changed the search text. Any selection, forecast or error is
    /// dropped. Returns the search to run when the query is long enough.
    pub fn edit_query(&mut self, query: &str) -> Option<SearchRequest> {
        // a pending forecast for the old selection must not land
        self.generation += 1;

        let query = query.trim();
        if query.chars().count() < self.min_query_chars {
            self.searches.invalidate();
            self.transition(CardState::Empty);
            return None;
        }

        let ticket = self.searches.issue();
        self.transition(CardState::Searching {
            query: query.to_string(),
        });
        Some(SearchRequest {
            ticket,
            query: query.to_string(),
        })
    }

    /// Accept a finished search if it is still the latest one. Returns false
    /// when the result was discarded.
    pub fn apply_search(&mut self, ticket: SearchTicket, result: Result<Vec<Location>>) -> bool {
        let CardState::Searching { query } = &self.state else {
            debug!("Ignoring search {} in state {}", ticket.id(), self.state.name());
            return false;
        };
        if !self.searches.is_latest(ticket) {
            debug!("Ignoring stale search {}", ticket.id());
            return false;
        }

        let query = query.clone();
        let next = match result {
            Ok(locations) if locations.is_empty() => CardState::NoResults { query },
            Ok(locations) => CardState::Suggestions { query, locations },
            Err(e) => CardState::GeocodeError {
                query,
                message: e.user_message().to_string(),
            },
        };
        self.transition(next);
        true
    }

    /// Pick a location. Clears any previous forecast or error and cancels
    /// outstanding searches and generations.
    pub fn select_location(&mut self, location: Location) {
        self.searches.invalidate();
        self.generation += 1;
        debug!("Selected {}", location.display_name());
        self.transition(CardState::LocationSelected { location });
    }

    /// Pick the n-th (0-based) entry of the current suggestions
    pub fn pick_suggestion(&mut self, index: usize) -> Option<&Location> {
        let location = self.suggestions().get(index)?.clone();
        self.select_location(location);
        self.selected_location()
    }

    /// Back to the empty state
    pub fn clear(&mut self) {
        self.searches.invalidate();
        self.generation += 1;
        self.transition(CardState::Empty);
    }

    /// Start generating a card for the selected location.
    ///
    /// `None` when there is no location or a generation is already in
    /// flight; a second trigger before the first resolves does nothing.
    pub fn begin_generate(&mut self) -> Option<GenerateTicket> {
        let location = match &self.state {
            CardState::ForecastLoading { .. } => {
                debug!("Generation already in flight, ignoring trigger");
                return None;
            }
            _ if !self.can_generate() => return None,
            _ => self.selected_location()?.clone(),
        };

        self.generation += 1;
        self.transition(CardState::ForecastLoading {
            location: location.clone(),
        });
        Some(GenerateTicket {
            id: self.generation,
            location,
        })
    }

    /// Retry after a failed fetch, reusing the stored location
    pub fn retry(&mut self) -> Option<GenerateTicket> {
        if !matches!(self.state, CardState::ForecastError { .. }) {
            return None;
        }
        self.begin_generate()
    }

    /// Store the outcome of a fetch if its ticket is still current. Returns
    /// false when the result was discarded.
    pub fn complete_generate(&mut self, ticket: GenerateTicket, result: Result<Forecast>) -> bool {
        if ticket.id != self.generation || !self.is_loading() {
            debug!("Discarding outdated forecast for {}", ticket.location.display_name());
            return false;
        }

        let next = match result {
            Ok(forecast) => CardState::Success { forecast },
            Err(e) => CardState::ForecastError {
                location: ticket.location,
                message: e.user_message().to_string(),
            },
        };
        self.transition(next);
        true
    }

    /// Begin, fetch and complete in one go
    pub async fn generate<P>(&mut self, provider: &P) -> &CardState
    where
        P: ForecastProvider + ?Sized,
    {
        if let Some(ticket) = self.begin_generate() {
            let result = provider.fetch_forecast(&ticket.location).await;
            self.complete_generate(ticket, result);
        }
        &self.state
    }

    /// [`retry`](Self::retry), then fetch and complete
    pub async fn retry_with<P>(&mut self, provider: &P) -> &CardState
    where
        P: ForecastProvider + ?Sized,
    {
        if let Some(ticket) = self.retry() {
            let result = provider.fetch_forecast(&ticket.location).await;
            self.complete_generate(ticket, result);
        }
        &self.state
    }

    fn transition(&mut self, next: CardState) {
        debug!("Card state {} -> {}", self.state.name(), next.name());
        self.state = next;
    }
}
