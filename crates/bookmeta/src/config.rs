//! Settings which decide the registered providers and the messages shown to the user.

use std::time::Duration;

use log::trace;
use serde::Deserialize;

use crate::{
    api::goodreads::DEFAULT_BRIDGE_URL,
    provider::{Douban, Goodreads, GoogleBooks, Provider},
};

/// Localized messages shown in place of the result list.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Messages {
    /// Shown while a search is running.
    pub loading: String,
    /// Shown when no provider returned anything.
    pub no_result: String,
    /// Shown when a provider request failed.
    pub search_error: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            loading: "Loading...".to_owned(),
            no_result: "No Result! Please try another keyword.".to_owned(),
            search_error: "Search error!".to_owned(),
        }
    }
}

/// Configuration of a [`Searcher`](crate::Searcher).
#[derive(Clone, Debug)]
pub struct Config {
    /// Goodreads API token, Goodreads is only searched when this is present and not empty.
    pub goodreads_token: Option<String>,
    /// Endpoint of the XML-to-JSON bridge used for Goodreads.
    pub bridge_url: String,
    /// Request timeout, `None` waits for as long as a provider takes.
    pub timeout: Option<Duration>,
    /// Messages shown to the user.
    pub messages: Messages,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            goodreads_token: None,
            bridge_url: DEFAULT_BRIDGE_URL.to_owned(),
            timeout: None,
            messages: Messages::default(),
        }
    }
}

impl Config {
    /// The Goodreads token when one is configured.
    #[must_use]
    pub fn goodreads_token(&self) -> Option<&str> {
        self.goodreads_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// The providers to search, in the order their results are rendered.
    #[must_use]
    pub fn providers(&self) -> Vec<Provider> {
        let mut providers = vec![Provider::Douban(Douban), Provider::Google(GoogleBooks)];

        if let Some(token) = self.goodreads_token() {
            providers.push(Provider::Goodreads(Goodreads::new(
                token,
                self.bridge_url.as_str(),
            )));
        } else {
            trace!("No Goodreads token configured - Goodreads will not be searched");
        }

        providers
    }
}
