//! The set of metadata providers and the order their results are shown in.

use reqwest::Url;

use crate::{
    api::{self, douban, goodreads, google_books, Adapter, Client},
    Book, Error, Source,
};

pub use api::{douban::Douban, goodreads::Goodreads, google_books::GoogleBooks};

/// Every provider this crate knows about, in render order.
pub const KNOWN_SOURCES: [Source; 3] = [douban::SOURCE, google_books::SOURCE, goodreads::SOURCE];

/// A registered metadata provider.
///
/// Dispatches to the [`Adapter`] of each provider so that the orchestrator can treat them all
/// the same way.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum Provider {
    /// Douban Books
    Douban(Douban),
    /// Google Books
    Google(GoogleBooks),
    /// Goodreads through the XML bridge
    Goodreads(Goodreads),
}

impl Provider {
    /// Identity of the provider.
    #[must_use]
    pub fn source(&self) -> Source {
        match self {
            Self::Douban(a) => a.source(),
            Self::Google(a) => a.source(),
            Self::Goodreads(a) => a.source(),
        }
    }

    /// The request URL for a search by `title`.
    ///
    /// # Errors
    ///
    /// An [`Err`] is returned when no valid URL can be built from the configuration.
    pub fn search_url(&self, title: &str) -> Result<Url, Error> {
        match self {
            Self::Douban(a) => a.search_url(title),
            Self::Google(a) => a.search_url(title),
            Self::Goodreads(a) => a.search_url(title),
        }
    }

    /// Searches this provider for `title` and normalizes every result.
    ///
    /// # Errors
    ///
    /// An [`Err`] is returned when the request fails or the response cannot be decoded.
    pub fn search<C: Client>(&self, client: &C, title: &str) -> Result<Vec<Book>, Error> {
        match self {
            Self::Douban(a) => api::search(client, a, title),
            Self::Google(a) => api::search(client, a, title),
            Self::Goodreads(a) => api::search(client, a, title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Douban, Goodreads, GoogleBooks, Provider, KNOWN_SOURCES};
    use crate::api::goodreads::DEFAULT_BRIDGE_URL;

    #[test]
    fn known_sources_are_in_render_order() {
        let ids: Vec<_> = KNOWN_SOURCES.iter().map(|s| s.id).collect();
        assert_eq!(vec!["douban", "google", "goodreads"], ids);
    }

    #[test]
    fn provider_dispatches_to_its_adapter() {
        let providers = [
            Provider::Douban(Douban),
            Provider::Google(GoogleBooks),
            Provider::Goodreads(Goodreads::new("t", DEFAULT_BRIDGE_URL)),
        ];

        for (provider, known) in providers.iter().zip(KNOWN_SOURCES) {
            assert_eq!(known, provider.source());
            let url = provider.search_url("dune").expect("valid url");
            assert!(url.as_str().contains("dune"), "{url}");
        }
    }
}
