//! Fanning a search out to every provider and merging the results as they arrive.
//!
//! A [`Session`] holds one result slot per provider and a generation counter. Every search
//! starts a new generation, so a completion which belongs to an earlier search is recognised
//! and dropped instead of overwriting newer results.
//!
//! [`Searcher`] drives a session with one worker thread per provider. Workers only send their
//! [`Completion`] back over a channel, the session and the [`View`] are only ever touched by the
//! calling thread, which re-renders after every completion.

use std::{sync::mpsc, thread};

use log::{debug, info, trace, warn};

use crate::{
    config::{Config, Messages},
    provider::KNOWN_SOURCES,
    render::{self, BookForm, View},
    Book, Client, Error, Provider,
};

/// Where a [`Session`] is in its current search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchState {
    /// No search has been started.
    Idle,
    /// Requests of the current search are still outstanding.
    Searching,
    /// Every request of the current search has completed.
    Rendered,
}

/// The result of one provider request, tagged with the search it belongs to.
#[derive(Debug)]
pub struct Completion {
    epoch: u64,
    slot: usize,
    result: Result<Vec<Book>, Error>,
}

impl Completion {
    /// A completion for the provider at `slot` of the search started as `epoch`.
    #[must_use]
    pub const fn new(epoch: u64, slot: usize, result: Result<Vec<Book>, Error>) -> Self {
        Self {
            epoch,
            slot,
            result,
        }
    }
}

/// What [`Session::complete`] did with a [`Completion`].
#[derive(Debug)]
pub enum Outcome {
    /// The results were stored and should be rendered.
    Applied,
    /// The provider request failed, nothing was stored.
    Failed {
        /// Slot of the provider that failed.
        slot: usize,
        /// Why it failed.
        error: Error,
    },
    /// The completion belongs to a superseded search and was dropped.
    Stale,
}

/// Transient results of the current search, one slot per provider.
#[derive(Debug)]
pub struct Session {
    epoch: u64,
    state: SearchState,
    keyword: String,
    results: Vec<Option<Vec<Book>>>,
    pending: usize,
}

impl Session {
    /// An idle session for `slots` providers.
    #[must_use]
    pub fn new(slots: usize) -> Self {
        Self {
            epoch: 0,
            state: SearchState::Idle,
            keyword: String::new(),
            results: (0..slots).map(|_| None).collect(),
            pending: 0,
        }
    }

    /// Starts a new search for `keyword`, dropping the results of the previous one.
    ///
    /// Returns the epoch completions of this search have to carry.
    pub fn begin(&mut self, keyword: &str) -> u64 {
        self.epoch += 1;
        self.keyword = keyword.to_owned();
        self.results.iter_mut().for_each(|slot| *slot = None);
        self.pending = self.results.len();
        self.state = if self.pending == 0 {
            SearchState::Rendered
        } else {
            SearchState::Searching
        };

        trace!("Search {} for '{keyword}' started", self.epoch);
        self.epoch
    }

    /// Applies the result of one provider request.
    pub fn complete(&mut self, completion: Completion) -> Outcome {
        let Completion {
            epoch,
            slot,
            result,
        } = completion;

        if epoch != self.epoch || slot >= self.results.len() {
            return Outcome::Stale;
        }

        self.pending = self.pending.saturating_sub(1);
        if self.pending == 0 {
            trace!("Search {} has completed", self.epoch);
            self.state = SearchState::Rendered;
        }

        match result {
            Ok(books) => {
                self.results[slot] = Some(books);
                Outcome::Applied
            }
            Err(error) => Outcome::Failed { slot, error },
        }
    }

    /// The results held for the provider at `slot`.
    #[must_use]
    pub fn results(&self, slot: usize) -> &[Book] {
        self.results
            .get(slot)
            .and_then(Option::as_deref)
            .unwrap_or_default()
    }

    /// `true` when no provider holds any result.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results
            .iter()
            .all(|slot| slot.as_ref().map_or(true, Vec::is_empty))
    }

    /// The epoch of the current search, `0` before the first one.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Where the current search is.
    #[must_use]
    pub const fn state(&self) -> SearchState {
        self.state
    }

    /// The keyword of the current search.
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }
}

/// Searches every registered provider at once and renders results as they come in.
pub struct Searcher<C: Client = reqwest::blocking::Client> {
    client: C,
    providers: Vec<Provider>,
    session: Session,
    messages: Messages,
    rendered: Vec<Book>,
}

impl<C: Client + Sync> Searcher<C> {
    /// Creates a searcher for the providers registered by `config`.
    ///
    /// # Errors
    ///
    /// An [`Err`] is returned when the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = C::with_timeout(config.timeout)?;
        Ok(Self::with_client(client, config))
    }

    /// Creates a searcher which sends its requests through `client`.
    #[must_use]
    pub fn with_client(client: C, config: &Config) -> Self {
        let providers = config.providers();
        Self {
            client,
            session: Session::new(providers.len()),
            providers,
            messages: config.messages.clone(),
            rendered: Vec::new(),
        }
    }

    /// Searches every provider for `keyword`, drawing into `view` after each provider answers.
    ///
    /// A keyword that is empty or only whitespace does nothing. A failing provider shows
    /// [`Messages::search_error`], which is replaced by the list again as long as any other
    /// provider has results.
    pub fn search<V: View + ?Sized>(&mut self, keyword: &str, view: &mut V) {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            trace!("Empty keyword - nothing to search");
            return;
        }

        let Self {
            client,
            providers,
            session,
            messages,
            rendered,
        } = self;

        let (client, providers) = (&*client, &*providers);
        let epoch = session.begin(keyword);
        rendered.clear();
        view.show_message(&messages.loading);

        for source in KNOWN_SOURCES
            .iter()
            .filter(|known| providers.iter().all(|p| p.source() != **known))
        {
            view.remove_toggle(source);
        }

        info!("Searching {} providers for '{keyword}'", providers.len());
        let (tx, rx) = mpsc::channel();

        thread::scope(|scope| {
            for (slot, provider) in providers.iter().enumerate() {
                let tx = tx.clone();
                scope.spawn(move || {
                    let result = provider.search(client, keyword);
                    if tx.send(Completion::new(epoch, slot, result)).is_err() {
                        warn!("Search {epoch} finished before provider {slot} answered");
                    }
                });
            }
            // the merge point below ends once every worker has dropped its sender
            drop(tx);

            for completion in rx {
                match session.complete(completion) {
                    Outcome::Applied => {
                        *rendered = render::render(providers, session, messages, view);
                    }
                    Outcome::Failed { slot, error } => {
                        let source = providers[slot].source();
                        warn!("{} search failed: {error}", source.description);
                        view.show_message(&messages.search_error);
                        // results of the other providers stay listed below the error
                        if !session.is_empty() {
                            *rendered = render::render(providers, session, messages, view);
                        }
                    }
                    Outcome::Stale => debug!("Dropped a completion of a superseded search"),
                }
            }
        });

        debug!(
            "Search {epoch} finished with {} rendered books",
            rendered.len()
        );
    }

    /// The edit form values of the book at `position` of the last rendered list.
    #[must_use]
    pub fn select(&self, position: usize) -> Option<BookForm> {
        BookForm::from_rendered(&self.rendered, position)
    }

    /// The books of the last rendered list, in render order.
    #[must_use]
    pub fn rendered(&self) -> &[Book] {
        &self.rendered
    }

    /// The registered providers, in render order.
    #[must_use]
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// The session of the current search.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::{Completion, Outcome, SearchState, Searcher, Session};
    use crate::{
        api::{impl_route, RouteClient},
        config::{Config, Messages},
        provider::KNOWN_SOURCES,
        render::{Event, RecordingView},
        Book, Error, ErrorKind,
    };

    const DOUBAN_JSON: &str = include_str!("../tests/data/douban_search.json");
    const GOOGLE_JSON: &str = include_str!("../tests/data/google_books_search.json");
    const GOODREADS_JSON: &str = include_str!("../tests/data/goodreads_bridge.json");

    impl_route! {
        AllProviders {
            "douban.com" => Ok(DOUBAN_JSON.to_owned()),
            "googleapis.com" => Ok(GOOGLE_JSON.to_owned()),
            "yahooapis.com" => Ok(GOODREADS_JSON.to_owned()),
        }
        DoubanDown {
            "douban.com" => Err(Error::new(ErrorKind::IO, "Connection refused")),
            "googleapis.com" => Ok(GOOGLE_JSON.to_owned()),
        }
        SlowDoubanDown {
            "douban.com" => {
                std::thread::sleep(std::time::Duration::from_millis(300));
                Err(Error::new(ErrorKind::IO, "Connection timed out"))
            },
            "googleapis.com" => Ok(GOOGLE_JSON.to_owned()),
        }
        NothingFound {
            "douban.com" => Ok(r#"{ "count": 0, "books": [] }"#.to_owned()),
            "googleapis.com" => Ok(r#"{ "totalItems": 0 }"#.to_owned()),
        }
    }

    fn book(id: &str) -> Book {
        let mut book = Book::empty(KNOWN_SOURCES[0]);
        book.id = id.to_owned();
        book
    }

    #[test]
    fn stale_completion_is_dropped() {
        let mut session = Session::new(2);
        let first = session.begin("first");
        let second = session.begin("second");
        assert_ne!(first, second);

        let outcome = session.complete(Completion::new(first, 0, Ok(vec![book("late")])));

        assert!(matches!(outcome, Outcome::Stale));
        assert!(session.is_empty());
        assert_eq!(SearchState::Searching, session.state());
        assert_eq!("second", session.keyword());
    }

    #[test]
    fn session_is_rendered_once_every_slot_completed() {
        let mut session = Session::new(2);
        assert_eq!(SearchState::Idle, session.state());

        let epoch = session.begin("test");
        session.complete(Completion::new(epoch, 1, Ok(vec![book("g")])));
        assert_eq!(SearchState::Searching, session.state());

        let outcome = session.complete(Completion::new(
            epoch,
            0,
            Err(Error::new(ErrorKind::IO, "down")),
        ));
        assert!(matches!(outcome, Outcome::Failed { slot: 0, .. }));
        assert_eq!(SearchState::Rendered, session.state());
        assert!(session.results(0).is_empty());
        assert_eq!(1, session.results(1).len());
    }

    #[test]
    fn new_search_clears_previous_results() {
        let mut session = Session::new(1);
        let epoch = session.begin("first");
        session.complete(Completion::new(epoch, 0, Ok(vec![book("a")])));
        assert!(!session.is_empty());

        session.begin("second");
        assert!(session.is_empty());
    }

    #[test]
    fn empty_keyword_does_nothing() {
        let mut searcher =
            Searcher::with_client(RouteClient::<AllProviders>::default(), &Config::default());
        let mut view = RecordingView::default();

        searcher.search("   ", &mut view);

        assert!(view.events.is_empty());
        assert_eq!(SearchState::Idle, searcher.session().state());
    }

    #[test]
    fn results_of_every_provider_are_rendered_in_order() {
        let config = Config {
            goodreads_token: Some("TOKEN".to_owned()),
            ..Config::default()
        };
        let mut searcher = Searcher::with_client(RouteClient::<AllProviders>::default(), &config);
        let mut view = RecordingView::default();

        searcher.search("code complete", &mut view);

        assert_eq!(SearchState::Rendered, searcher.session().state());
        assert_eq!(Event::Message(Messages::default().loading), view.events[0]);
        let sources: Vec<_> = searcher.rendered().iter().map(|b| b.source.id).collect();
        assert_eq!(
            vec!["douban", "douban", "google", "google", "goodreads", "goodreads"],
            sources
        );
        assert_eq!(6, view.items.len());
        assert!(!view.events.contains(&Event::RemoveToggle("goodreads")));

        let form = searcher.select(2).expect("third book was rendered");
        assert_eq!("Code Complete", form.title);
        assert_eq!("Computers", form.tags);
    }

    #[test]
    fn unconfigured_goodreads_toggle_is_removed() {
        let mut searcher =
            Searcher::with_client(RouteClient::<AllProviders>::default(), &Config::default());
        let mut view = RecordingView::default();

        searcher.search("code complete", &mut view);

        assert!(view.events.contains(&Event::RemoveToggle("goodreads")));
        assert_eq!(4, searcher.rendered().len());
    }

    #[test]
    fn failing_provider_does_not_block_the_others() {
        let mut searcher =
            Searcher::with_client(RouteClient::<DoubanDown>::default(), &Config::default());
        let mut view = RecordingView::default();

        searcher.search("code complete", &mut view);

        let messages = Messages::default();
        assert!(view.events.contains(&Event::Message(messages.search_error)));
        assert!(view.events.contains(&Event::Append(0, "QnghAQAAIAAJ".to_owned())));
        assert_eq!(vec!["QnghAQAAIAAJ", "5bDpAAAAMAAJ"], view.items);
        let ids: Vec<_> = searcher.rendered().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(vec!["QnghAQAAIAAJ", "5bDpAAAAMAAJ"], ids);
        assert_eq!(SearchState::Rendered, searcher.session().state());
    }

    #[test]
    fn late_failure_keeps_rendered_results_on_view() {
        let mut searcher =
            Searcher::with_client(RouteClient::<SlowDoubanDown>::default(), &Config::default());
        let mut view = RecordingView::default();

        searcher.search("code complete", &mut view);

        let messages = Messages::default();
        let error_at = view
            .events
            .iter()
            .rposition(|e| *e == Event::Message(messages.search_error.clone()))
            .expect("failure is shown");
        assert!(view.events[error_at..].contains(&Event::Clear));
        assert_eq!(None, view.message);
        assert_eq!(vec!["QnghAQAAIAAJ", "5bDpAAAAMAAJ"], view.items);
        assert_eq!(2, searcher.rendered().len());
        assert_eq!("Code Complete", searcher.select(0).expect("shown").title);
    }

    #[test]
    fn nothing_found_shows_only_no_result() {
        let mut searcher =
            Searcher::with_client(RouteClient::<NothingFound>::default(), &Config::default());
        let mut view = RecordingView::default();

        searcher.search("zzzz", &mut view);

        assert_eq!(Some(Messages::default().no_result), view.message);
        assert!(view.items.is_empty());
        assert!(searcher.rendered().is_empty());
        assert!(searcher.select(0).is_none());
    }
}
