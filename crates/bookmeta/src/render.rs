//! Drawing search results into a [`View`] and turning a picked result into edit form values.

use log::trace;
use serde::Serialize;

use crate::{config::Messages, search::Session, Book, Provider, Source};

/// The result list of a front end.
///
/// Implementations own the actual widgets, templating and per provider show/hide controls, the
/// renderer only tells them what to draw.
pub trait View {
    /// Replaces the content of the result area with `message`.
    fn show_message(&mut self, message: &str);

    /// Replaces the content of the result area with an empty list.
    fn clear(&mut self);

    /// Appends `book` to the list, `position` is its index in the rendered list and is what
    /// [`BookForm::from_rendered`] expects back when the user picks it.
    fn append(&mut self, position: usize, book: &Book);

    /// Re-applies the show/hide state of `source` to the items just appended.
    fn apply_toggle(&mut self, source: &Source);

    /// Removes the show/hide control of a provider that is not searched.
    fn remove_toggle(&mut self, _source: &Source) {}
}

/// Draws the results held by `session` into `view` and returns the books in the order they were
/// appended.
///
/// When no provider holds a result the view only shows [`Messages::no_result`].
pub fn render<V: View + ?Sized>(
    providers: &[Provider],
    session: &Session,
    messages: &Messages,
    view: &mut V,
) -> Vec<Book> {
    if session.is_empty() {
        trace!("No provider holds any result");
        view.show_message(&messages.no_result);
        return Vec::new();
    }

    view.clear();
    let mut rendered = Vec::new();

    for (slot, provider) in providers.iter().enumerate() {
        for book in session.results(slot) {
            view.append(rendered.len(), book);
            rendered.push(book.clone());
        }

        view.apply_toggle(&provider.source());
    }

    trace!("Rendered {} books", rendered.len());
    rendered
}

/// Values copied into the book edit form when a result is picked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BookForm {
    /// Content for the rich text description editor.
    pub description: String,
    /// Author input, authors joined by `,`.
    pub author: String,
    /// Title input.
    pub title: String,
    /// Tags input, tags joined by `,`.
    pub tags: String,
    /// Star rating widget value.
    pub rating: u32,
    /// Source of the cover preview image.
    pub cover_preview: String,
    /// Hidden cover URL input.
    pub cover_url: String,
}

impl BookForm {
    /// The form values for the result at `position` of a rendered list.
    #[must_use]
    pub fn from_rendered(rendered: &[Book], position: usize) -> Option<Self> {
        rendered.get(position).map(Self::from)
    }
}

impl From<&Book> for BookForm {
    fn from(book: &Book) -> Self {
        Self {
            description: book.description.clone(),
            author: book.authors.join(","),
            title: book.title.clone(),
            tags: book.tags.join(","),
            rating: star_rating(book.rating),
            cover_preview: book.cover.clone(),
            cover_url: book.cover.clone(),
        }
    }
}

// Nearest whole star, halves round up and anything negative or NaN is no stars.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn star_rating(rating: f64) -> u32 {
    rating.round().max(0.0) as u32
}

#[cfg(test)]
pub(crate) use test::{Event, RecordingView};

#[cfg(test)]
mod test {
    use crate::{Book, Source};

    use super::View;

    #[derive(Clone, Debug, PartialEq)]
    pub(crate) enum Event {
        Message(String),
        Clear,
        Append(usize, String),
        Toggle(&'static str),
        RemoveToggle(&'static str),
    }

    /// A [`View`] which records every call and keeps what is currently shown.
    #[derive(Default)]
    pub(crate) struct RecordingView {
        pub(crate) events: Vec<Event>,
        pub(crate) message: Option<String>,
        pub(crate) items: Vec<String>,
    }

    impl View for RecordingView {
        fn show_message(&mut self, message: &str) {
            self.events.push(Event::Message(message.to_owned()));
            self.message = Some(message.to_owned());
            self.items.clear();
        }

        fn clear(&mut self) {
            self.events.push(Event::Clear);
            self.message = None;
            self.items.clear();
        }

        fn append(&mut self, position: usize, book: &Book) {
            self.events.push(Event::Append(position, book.id.clone()));
            self.items.push(book.id.clone());
        }

        fn apply_toggle(&mut self, source: &Source) {
            self.events.push(Event::Toggle(source.id));
        }

        fn remove_toggle(&mut self, source: &Source) {
            self.events.push(Event::RemoveToggle(source.id));
        }
    }
}
