use log::trace;
use regex::Regex;
use reqwest::Url;
use serde::Deserialize;

use crate::{book::GENERIC_COVER, Book, Error, ErrorKind, Source};

use super::{collapse_whitespace, xml, Adapter};

/// Endpoint of the service that fetches the Goodreads XML and wraps it in JSON.
pub const DEFAULT_BRIDGE_URL: &str = "https://query.yahooapis.com/v1/public/yql";

const GOODREADS_SEARCH_URL: &str = "https://www.goodreads.com/search/index.xml";

pub(crate) const SOURCE: Source = Source {
    id: "goodreads",
    description: "Goodreads",
    url: "https://www.goodreads.com/",
};

/// Goodreads search, reached through an XML-to-JSON bridge.
#[derive(Clone, Debug)]
pub struct Goodreads {
    token: String,
    bridge_url: String,
}

impl Goodreads {
    /// Creates the adapter for the API `token`, querying through `bridge_url`.
    #[must_use]
    pub fn new(token: impl Into<String>, bridge_url: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            bridge_url: bridge_url.into(),
        }
    }
}

/// The bridge response, holding the Goodreads XML document as its first result.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
pub struct Envelope {
    #[serde(default)]
    results: Vec<String>,
}

impl Adapter for Goodreads {
    type Response = Envelope;
    /// The XML content of a single `work` element.
    type Raw = String;

    fn source(&self) -> Source {
        SOURCE
    }

    fn search_url(&self, title: &str) -> Result<Url, Error> {
        let goodreads_url = format!(
            "{GOODREADS_SEARCH_URL}?key={}&q={}",
            self.token,
            collapse_whitespace(title, "+")
        );
        let query = format!("select * from xml where url='{goodreads_url}'");

        Url::parse_with_params(&self.bridge_url, &[("q", &*query), ("format", "xml")])
            .map_err(|e| Error::wrap(ErrorKind::Config, e))
    }

    fn extract_results(&self, response: Envelope) -> Result<Vec<String>, Error> {
        let Some(document) = response.results.first() else {
            trace!("Bridge response held no document");
            return Ok(Vec::new());
        };

        let results = xml::path(document, &["GoodreadsResponse", "search", "results"])
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::Deserialize,
                    "Goodreads response is missing the search results",
                )
            })?;

        Ok(xml::children(results, "work")
            .into_iter()
            .map(str::to_owned)
            .collect())
    }

    fn to_book(&self, raw: String) -> Book {
        let work = raw.as_str();
        let best_book = xml::child(work, "best_book").unwrap_or_default();
        let id = xml::text_at(best_book, &["id"]);

        let author = xml::text_at(best_book, &["author", "name"]);
        let authors = if author.is_empty() {
            Vec::new()
        } else {
            vec![author]
        };

        let published_date = publication_date(
            &xml::text_at(work, &["original_publication_year"]),
            &xml::text_at(work, &["original_publication_month"]),
            &xml::text_at(work, &["original_publication_day"]),
        );

        let rating = xml::text_at(work, &["average_rating"])
            .parse()
            .unwrap_or(0.0);

        let image = xml::text_at(best_book, &["image_url"]);
        let cover = if image.is_empty() {
            GENERIC_COVER.to_owned()
        } else {
            large_cover(&image, &id)
        };

        Book {
            title: xml::text_at(best_book, &["title"]),
            authors,
            description: String::new(),
            publisher: String::new(),
            published_date,
            tags: Vec::new(),
            rating,
            cover,
            url: format!("https://www.goodreads.com/book/show/{id}"),
            id,
            source: SOURCE,
        }
    }
}

/// Joins the date parts as `year-MM-DD`, an absent month or day becomes `00`.
pub(crate) fn publication_date(year: &str, month: &str, day: &str) -> String {
    format!("{year}-{}-{}", pad2(month), pad2(day))
}

// Keeps the last two characters of the value prefixed with `00`.
fn pad2(value: &str) -> String {
    let padded: Vec<char> = format!("00{value}").chars().collect();
    padded[padded.len() - 2..].iter().collect()
}

/// Swaps the medium size marker of a Goodreads cover for the large one, `…m/<id>.jpg` becomes
/// `…l/<id>.jpg`. Any other URL is returned unchanged.
pub(crate) fn large_cover(image_url: &str, id: &str) -> String {
    let pattern = format!(r"(?i)m(/{}\.(jpe?g|png|gif))$", regex::escape(id));
    let Ok(re) = Regex::new(&pattern) else {
        return image_url.to_owned();
    };
    re.replace(image_url, "l$1").into_owned()
}
