use std::{borrow::Cow, time::Duration};

use log::{debug, info, trace};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::{Book, Error, ErrorKind, Source};

pub(crate) mod douban;
pub(crate) mod goodreads;
pub(crate) mod google_books;
mod xml;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Replaces every run of whitespace in `title` with `with`.
pub(crate) fn collapse_whitespace<'a>(title: &'a str, with: &str) -> Cow<'a, str> {
    WHITESPACE_RE.replace_all(title, with)
}

/// The HTTP seam every provider request goes through.
pub trait Client
where
    Self: Default,
{
    /// Builds a client which gives up on a request after `timeout`, or never when `None`.
    ///
    /// # Errors
    ///
    /// An [`Err`] is returned when the underlying client cannot be built.
    fn with_timeout(_timeout: Option<Duration>) -> Result<Self, Error> {
        Ok(Self::default())
    }

    /// Fetches `url` and deserializes the JSON body to `T`.
    ///
    /// # Errors
    ///
    /// An [`Err`] is returned when the request fails or the body is not a valid `T`.
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned;
}

impl Client for reqwest::blocking::Client {
    fn with_timeout(timeout: Option<Duration>) -> Result<Self, Error> {
        reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::wrap(ErrorKind::Config, e))
    }

    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        self.get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .and_then(reqwest::blocking::Response::text)
            .map_err(|e| Error::wrap(ErrorKind::IO, e))
            .and_then(|text| decode_json(&text))
    }
}

/// Decodes a response body, an empty body is a [`ErrorKind::NoValue`] error.
pub(crate) fn decode_json<T: DeserializeOwned>(text: &str) -> Result<T, Error> {
    if text.trim().is_empty() {
        return Err(Error::new(ErrorKind::NoValue, "Response text is empty"));
    }

    serde_json::from_str(text).map_err(|e| Error::wrap(ErrorKind::Deserialize, e))
}

/// A metadata provider which can be searched by title.
///
/// `Response` is the decoded body of a search request, [`Adapter::extract_results`] splits it into
/// `Raw` results which [`Adapter::to_book`] normalizes one at a time.
pub trait Adapter {
    /// Decoded body of a search response.
    type Response: DeserializeOwned;
    /// A single result as found in [`Adapter::Response`].
    type Raw;

    /// Identity of the provider, copied into every [`Book`] it produces.
    fn source(&self) -> Source;

    /// The request URL for a search by `title`.
    ///
    /// # Errors
    ///
    /// An [`Err`] is returned when no valid URL can be built.
    fn search_url(&self, title: &str) -> Result<Url, Error>;

    /// Splits a response into raw results.
    ///
    /// # Errors
    ///
    /// An [`Err`] is returned when the response does not have the expected shape.
    fn extract_results(&self, response: Self::Response) -> Result<Vec<Self::Raw>, Error>;

    /// Normalizes a raw result, defaulting anything the provider left out.
    fn to_book(&self, raw: Self::Raw) -> Book;
}

pub(crate) fn search<C: Client, A: Adapter>(
    client: &C,
    adapter: &A,
    title: &str,
) -> Result<Vec<Book>, Error> {
    let source = adapter.source();
    info!("Searching for '{title}' using {}", source.description);

    let url = adapter.search_url(title)?;
    trace!("Requesting {url}");

    let response = client.get_json(url.as_str())?;
    let raw = adapter.extract_results(response)?;
    debug!("{} returned {} results", source.description, raw.len());

    Ok(raw.into_iter().map(|r| adapter.to_book(r)).collect())
}

#[cfg(test)]
pub(crate) use test::{
    assert_url, impl_route, impl_text_producer, MockClient, NetworkErrorProducer, Producer,
    Route, RouteClient, URL_SINK,
};
