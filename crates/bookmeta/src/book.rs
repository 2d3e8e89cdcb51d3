//! The provider agnostic book record every search result is normalized into.

use serde::Serialize;

/// Cover used when a provider has no image for a book.
pub const GENERIC_COVER: &str = "/static/generic_cover.jpg";

/// The provider a [`Book`] was found with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Source {
    /// Short key of the provider, e.g. `"douban"`.
    pub id: &'static str,
    /// Human readable name of the provider.
    pub description: &'static str,
    /// Home page of the provider.
    pub url: &'static str,
}

/// A single search result normalized from one of the providers.
///
/// Every field is always present, values missing from the provider response are defaulted to
/// an empty string, an empty [`Vec`] or `0.0` for the rating.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Provider local identifier.
    pub id: String,
    /// Title of the book.
    pub title: String,
    /// Authors in the order the provider lists them.
    pub authors: Vec<String>,
    /// Description or summary, may contain markup from the provider.
    pub description: String,
    /// Publisher of the book.
    pub publisher: String,
    /// Free form publication date as given by the provider.
    pub published_date: String,
    /// Tags or categories.
    pub tags: Vec<String>,
    /// Average rating on the provider's own scale, `0.0` when unknown.
    pub rating: f64,
    /// Cover image URL, see [`GENERIC_COVER`].
    pub cover: String,
    /// Canonical page of the book on the provider site.
    pub url: String,
    /// The provider this book came from.
    pub source: Source,
}

impl Book {
    /// Creates an empty book for `source` with every field defaulted.
    #[must_use]
    pub fn empty(source: Source) -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            authors: Vec::new(),
            description: String::new(),
            publisher: String::new(),
            published_date: String::new(),
            tags: Vec::new(),
            rating: 0.0,
            cover: GENERIC_COVER.to_owned(),
            url: String::new(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Book, Source, GENERIC_COVER};

    const SOURCE: Source = Source {
        id: "test",
        description: "Test Books",
        url: "https://example.com/",
    };

    #[test]
    fn empty_book_has_every_field_defaulted() {
        let book = Book::empty(SOURCE);

        assert!(book.authors.is_empty());
        assert!(book.tags.is_empty());
        assert_eq!(0.0, book.rating);
        assert_eq!(GENERIC_COVER, book.cover);
        assert_eq!("test", book.source.id);
    }

    #[test]
    fn published_date_serializes_in_camel_case() {
        let mut book = Book::empty(SOURCE);
        book.published_date = "2004".to_owned();

        let json = serde_json::to_value(&book).unwrap();
        assert_eq!("2004", json["publishedDate"]);
        assert_eq!("Test Books", json["source"]["description"]);
        assert!(json["authors"].as_array().unwrap().is_empty());
    }
}
