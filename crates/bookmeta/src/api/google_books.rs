use reqwest::Url;
use serde::Deserialize;

use crate::{book::GENERIC_COVER, Book, Error, ErrorKind, Source};

use super::{collapse_whitespace, Adapter};

const GOOGLE_BOOKS_URL: &str = "https://www.googleapis.com/books/v1/volumes";

pub(crate) const SOURCE: Source = Source {
    id: "google",
    description: "Google Books",
    url: "https://books.google.com/",
};

/// Google Books volumes API.
#[derive(Copy, Clone, Debug, Default)]
pub struct GoogleBooks;

/// Body of a Google Books volumes search.
///
/// `items` is left out entirely when nothing matched.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
pub struct GoogleModel {
    #[serde(default)]
    items: Vec<Item>,
}

/// A single volume of a Google Books search.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
pub struct Item {
    #[serde(default)]
    id: String,
    #[serde(rename = "volumeInfo", default)]
    volume_info: VolumeInfo,
}

/// Volume information from the Google Book API
#[derive(Deserialize, Default)]
#[cfg_attr(test, derive(Debug))]
#[serde(default, rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    authors: Option<Vec<String>>,
    description: Option<String>,
    publisher: Option<String>,
    published_date: Option<String>,
    categories: Option<Vec<String>>,
    average_rating: Option<f64>,
    image_links: Option<ImageLinks>,
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct ImageLinks {
    thumbnail: Option<String>,
}

impl Adapter for GoogleBooks {
    type Response = GoogleModel;
    type Raw = Item;

    fn source(&self) -> Source {
        SOURCE
    }

    // Whitespace runs collapse to a single space which the query encoding turns into `+`.
    fn search_url(&self, title: &str) -> Result<Url, Error> {
        let query = collapse_whitespace(title, " ");
        Url::parse_with_params(GOOGLE_BOOKS_URL, &[("q", &*query)])
            .map_err(|e| Error::wrap(ErrorKind::Config, e))
    }

    fn extract_results(&self, response: GoogleModel) -> Result<Vec<Item>, Error> {
        Ok(response.items)
    }

    fn to_book(&self, raw: Item) -> Book {
        let Item {
            id,
            volume_info:
                VolumeInfo {
                    title,
                    authors,
                    description,
                    publisher,
                    published_date,
                    categories,
                    average_rating,
                    image_links,
                },
        } = raw;

        Book {
            url: format!("https://books.google.com/books?id={id}"),
            id,
            title: title.unwrap_or_default(),
            authors: authors.unwrap_or_default(),
            description: description.unwrap_or_default(),
            publisher: publisher.unwrap_or_default(),
            published_date: published_date.unwrap_or_default(),
            tags: categories.unwrap_or_default(),
            rating: average_rating.unwrap_or(0.0),
            cover: image_links
                .and_then(|links| links.thumbnail)
                .unwrap_or_else(|| GENERIC_COVER.to_owned()),
            source: SOURCE,
        }
    }
}
