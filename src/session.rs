//! Interactive search-as-you-type session
//!
//! Plain lines edit the query; lines starting with `:` are commands.
//! Searches and forecast fetches run as tasks on a [`JoinSet`] and are
//! collected as they finish, so typing is never blocked by the network.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::{self, JoinError, JoinSet};
use tracing::{debug, warn};

use crate::{TravelCardConfig, TravelCardError};
use crate::export;
use crate::models::{Forecast, Location};
use crate::orchestrator::{CardState, ForecastOrchestrator, GenerateTicket, SearchRequest};
use crate::search::{SearchDebouncer, SearchTicket};
use crate::weather::{ForecastProvider, Geocoder};

const HELP: &str = "\
Type a place name to search. Commands:
  :pick N      choose suggestion N
  :generate    fetch the forecast card
  :retry       try the last fetch again
  :png [PATH]  save the card as PNG
  :text        print the shareable summary
  :clear       start over
  :quit        leave";

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// New search text
    Query(String),
    /// Whitespace-only line; leaves the query and the card alone
    Blank,
    /// 0-based suggestion index
    Pick(usize),
    Generate,
    Retry,
    Png(Option<PathBuf>),
    Text,
    Clear,
    Help,
    Quit,
    Unknown(String),
}

/// Parse a line. `:pick` takes a 1-based number.
#[must_use]
pub fn parse_command(line: &str) -> SessionCommand {
    if line.trim().is_empty() {
        return SessionCommand::Blank;
    }
    let Some(command) = line.trim().strip_prefix(':') else {
        return SessionCommand::Query(line.to_string());
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let argument = parts.next();

    match (name, argument) {
        ("pick" | "p", Some(n)) => match n.parse::<usize>() {
            Ok(n) if n >= 1 => SessionCommand::Pick(n - 1),
            _ => SessionCommand::Unknown(line.trim().to_string()),
        },
        ("generate" | "g", None) => SessionCommand::Generate,
        ("retry" | "r", None) => SessionCommand::Retry,
        ("png", path) => SessionCommand::Png(path.map(PathBuf::from)),
        ("text" | "t", None) => SessionCommand::Text,
        ("clear" | "c", None) => SessionCommand::Clear,
        ("help" | "h" | "?", None) => SessionCommand::Help,
        ("quit" | "q" | "exit", None) => SessionCommand::Quit,
        _ => SessionCommand::Unknown(line.trim().to_string()),
    }
}

enum SessionEvent {
    SearchDone {
        ticket: SearchTicket,
        result: Option<crate::Result<Vec<Location>>>,
    },
    ForecastDone {
        ticket: GenerateTicket,
        result: crate::Result<Forecast>,
    },
}

/// What a background task was started for, kept so a panicked task can
/// still be reported against its ticket
enum Job {
    Search(SearchTicket),
    Forecast(GenerateTicket),
}

impl Job {
    fn failed(self, error: &JoinError) -> SessionEvent {
        match self {
            Job::Search(ticket) => SessionEvent::SearchDone {
                ticket,
                result: Some(Err(TravelCardError::geocode(format!(
                    "search task failed: {error}"
                )))),
            },
            Job::Forecast(ticket) => SessionEvent::ForecastDone {
                ticket,
                result: Err(TravelCardError::forecast(format!(
                    "forecast task failed: {error}"
                ))),
            },
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Drives a [`ForecastOrchestrator`] from line input
pub struct Session<C> {
    client: Arc<C>,
    orchestrator: ForecastOrchestrator,
    debouncer: SearchDebouncer,
    output_dir: PathBuf,
    tasks: JoinSet<SessionEvent>,
    jobs: HashMap<task::Id, Job>,
}

impl<C> Session<C>
where
    C: Geocoder + ForecastProvider + 'static,
{
    #[must_use]
    pub fn new(client: Arc<C>, config: &TravelCardConfig) -> Self {
        let orchestrator = ForecastOrchestrator::new(config.search.min_query_chars);
        let debouncer =
            SearchDebouncer::from_config(&config.search, orchestrator.search_sequence());

        Self {
            client,
            orchestrator,
            debouncer,
            output_dir: PathBuf::from(&config.export.output_dir),
            tasks: JoinSet::new(),
            jobs: HashMap::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &CardState {
        self.orchestrator.state()
    }

    /// Run until `:quit`, or until input ends and outstanding work has
    /// reported back.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(out, "{HELP}")?;
        let mut lines = input.lines();
        let mut input_open = true;

        loop {
            if !input_open && self.tasks.is_empty() {
                break;
            }

            tokio::select! {
                line = lines.next_line(), if input_open => match line? {
                    Some(line) => {
                        if self.handle_line(&line, out)? == Flow::Quit {
                            break;
                        }
                    }
                    None => {
                        debug!("Input closed with {} task(s) pending", self.tasks.len());
                        input_open = false;
                    }
                },
                Some(joined) = self.tasks.join_next_with_id(), if !self.tasks.is_empty() => {
                    if let Some(event) = self.finish_job(joined) {
                        self.handle_event(event, out)?;
                    }
                }
            }
        }

        Ok(())
    }

    fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let command = parse_command(line);
        debug!("Session command {:?}", command);

        match command {
            SessionCommand::Blank => {}
            SessionCommand::Query(query) => match self.orchestrator.edit_query(&query) {
                Some(request) => self.spawn_search(request),
                None if !query.trim().is_empty() => {
                    writeln!(out, "Keep typing...")?;
                }
                None => {}
            },
            SessionCommand::Pick(index) => match self.orchestrator.pick_suggestion(index) {
                Some(location) => {
                    writeln!(
                        out,
                        "Selected {}. Type :generate for the forecast card.",
                        location.display_name()
                    )?;
                }
                None => writeln!(out, "No suggestion {}.", index + 1)?,
            },
            SessionCommand::Generate => match self.orchestrator.begin_generate() {
                Some(ticket) => self.spawn_forecast(ticket, out)?,
                None if self.orchestrator.is_loading() => {
                    writeln!(out, "Already loading...")?;
                }
                None => writeln!(out, "Pick a destination first.")?,
            },
            SessionCommand::Retry => match self.orchestrator.retry() {
                Some(ticket) => self.spawn_forecast(ticket, out)?,
                None => writeln!(out, "Nothing to retry.")?,
            },
            SessionCommand::Png(target) => self.export_png(target, out)?,
            SessionCommand::Text => match self.orchestrator.forecast() {
                Some(forecast) => writeln!(out, "{}", export::summary_text(forecast))?,
                None => writeln!(out, "No card yet.")?,
            },
            SessionCommand::Clear => {
                self.orchestrator.clear();
                writeln!(out, "Cleared.")?;
            }
            SessionCommand::Help => writeln!(out, "{HELP}")?,
            SessionCommand::Quit => return Ok(Flow::Quit),
            SessionCommand::Unknown(input) => {
                writeln!(out, "Unknown command {input}. Type :help.")?;
            }
        }

        Ok(Flow::Continue)
    }

    /// Turn a joined task into its event. A panicked task becomes a failed
    /// result for the ticket it was started with.
    fn finish_job(
        &mut self,
        joined: Result<(task::Id, SessionEvent), JoinError>,
    ) -> Option<SessionEvent> {
        match joined {
            Ok((id, event)) => {
                self.jobs.remove(&id);
                Some(event)
            }
            Err(error) => {
                warn!("Background task ended abnormally: {error}");
                self.jobs
                    .remove(&error.id())
                    .map(|job| job.failed(&error))
            }
        }
    }

    fn handle_event<W: Write>(&mut self, event: SessionEvent, out: &mut W) -> Result<()> {
        match event {
            SessionEvent::SearchDone {
                ticket,
                result: Some(result),
            } => {
                if self.orchestrator.apply_search(ticket, result) {
                    self.print_search_outcome(out)?;
                }
            }
            SessionEvent::SearchDone { result: None, .. } => {}
            SessionEvent::ForecastDone { ticket, result } => {
                if !self.orchestrator.complete_generate(ticket, result) {
                    return Ok(());
                }
                match self.orchestrator.state() {
                    CardState::Success { forecast } => {
                        writeln!(out, "{}", export::terminal_card(forecast))?;
                    }
                    CardState::ForecastError { message, .. } => {
                        writeln!(out, "{message} Type :retry to try again.")?;
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn print_search_outcome<W: Write>(&self, out: &mut W) -> Result<()> {
        match self.orchestrator.state() {
            CardState::Suggestions { locations, .. } => {
                for (i, location) in locations.iter().enumerate() {
                    writeln!(out, "  {}. {} ({})", i + 1, location.name, location.subtitle())?;
                }
            }
            CardState::NoResults { query } => writeln!(out, "No places found for \"{query}\".")?,
            CardState::GeocodeError { message, .. } => writeln!(out, "{message}")?,
            _ => {}
        }
        Ok(())
    }

    fn spawn_search(&mut self, request: SearchRequest) {
        let client = Arc::clone(&self.client);
        let debouncer = self.debouncer.clone();
        let ticket = request.ticket;

        let handle = self.tasks.spawn(async move {
            let result = debouncer
                .search(client.as_ref(), request.ticket, &request.query)
                .await;
            SessionEvent::SearchDone {
                ticket: request.ticket,
                result,
            }
        });
        self.jobs.insert(handle.id(), Job::Search(ticket));
    }

    fn spawn_forecast<W: Write>(&mut self, ticket: GenerateTicket, out: &mut W) -> Result<()> {
        writeln!(out, "Loading forecast for {}...", ticket.location.display_name())?;
        let client = Arc::clone(&self.client);
        let job = Job::Forecast(ticket.clone());

        let handle = self.tasks.spawn(async move {
            let result = client.fetch_forecast(&ticket.location).await;
            SessionEvent::ForecastDone { ticket, result }
        });
        self.jobs.insert(handle.id(), job);
        Ok(())
    }

    /// Export failures are reported and leave the card untouched
    fn export_png<W: Write>(&self, target: Option<PathBuf>, out: &mut W) -> Result<()> {
        let Some(forecast) = self.orchestrator.forecast() else {
            writeln!(out, "No card yet.")?;
            return Ok(());
        };

        let path = export::resolve_png_path(target.as_deref(), &self.output_dir, forecast);
        match export::write_png(forecast, &path) {
            Ok(()) => writeln!(out, "Saved {}", path.display())?,
            Err(e) => {
                warn!("PNG export failed: {e}");
                writeln!(out, "{}", e.user_message())?;
            }
        }
        Ok(())
    }
}
