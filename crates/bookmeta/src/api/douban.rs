use reqwest::Url;
use serde::Deserialize;

use crate::{book::GENERIC_COVER, Book, Error, ErrorKind, Source};

use super::Adapter;

const DOUBAN_SEARCH_URL: &str = "https://api.douban.com/v2/book/search";

pub(crate) const SOURCE: Source = Source {
    id: "douban",
    description: "Douban Books",
    url: "https://book.douban.com/",
};

/// Douban Books search API.
#[derive(Copy, Clone, Debug, Default)]
pub struct Douban;

/// Body of a Douban search response.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
pub struct DoubanModel {
    #[serde(default)]
    books: Option<Vec<DoubanBook>>,
}

/// A single book of a Douban search response.
#[derive(Deserialize, Default)]
#[cfg_attr(test, derive(Debug))]
#[serde(default)]
pub struct DoubanBook {
    id: Option<String>,
    title: Option<String>,
    author: Option<Vec<String>>,
    summary: Option<String>,
    publisher: Option<String>,
    pubdate: Option<String>,
    tags: Option<Vec<Tag>>,
    rating: Option<Rating>,
    image: Option<String>,
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct Tag {
    #[serde(default)]
    title: Option<String>,
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct Rating {
    #[serde(default)]
    average: Option<Average>,
}

/// Douban sends the average as a string such as `"8.6"`, older responses used a number.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
#[serde(untagged)]
enum Average {
    Number(f64),
    Text(String),
}

impl Average {
    fn value(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(t) => t.trim().parse().unwrap_or(0.0),
        }
    }
}

impl Adapter for Douban {
    type Response = DoubanModel;
    type Raw = DoubanBook;

    fn source(&self) -> Source {
        SOURCE
    }

    fn search_url(&self, title: &str) -> Result<Url, Error> {
        Url::parse_with_params(
            DOUBAN_SEARCH_URL,
            &[("q", title), ("fields", "all"), ("count", "10")],
        )
        .map_err(|e| Error::wrap(ErrorKind::Config, e))
    }

    fn extract_results(&self, response: DoubanModel) -> Result<Vec<DoubanBook>, Error> {
        Ok(response.books.unwrap_or_default())
    }

    fn to_book(&self, raw: DoubanBook) -> Book {
        // Deconstruct to take ownership of fields (avoids cloning).
        let DoubanBook {
            id,
            title,
            author,
            summary,
            publisher,
            pubdate,
            tags,
            rating,
            image,
        } = raw;

        let id = id.unwrap_or_default();

        Book {
            url: format!("https://book.douban.com/subject/{id}"),
            id,
            title: title.unwrap_or_default(),
            authors: author.unwrap_or_default(),
            description: summary.unwrap_or_default(),
            publisher: publisher.unwrap_or_default(),
            published_date: pubdate.unwrap_or_default(),
            tags: tags
                .unwrap_or_default()
                .into_iter()
                .filter_map(|tag| tag.title)
                .filter(|title| !title.is_empty())
                .collect(),
            rating: rating
                .and_then(|r| r.average)
                .map_or(0.0, |average| average.value()),
            cover: image
                .filter(|image| !image.is_empty())
                .unwrap_or_else(|| GENERIC_COVER.to_owned()),
            source: SOURCE,
        }
    }
}
