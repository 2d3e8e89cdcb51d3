use std::fmt::Write as _;

use bookmeta::{Book, Source, View};
use log::{debug, trace, warn};

struct Item {
    position: usize,
    book: Book,
    visible: bool,
}

/// Keeps the result area of the terminal, printed once a search has finished.
pub struct TerminalView {
    message: Option<String>,
    items: Vec<Item>,
    hidden: Vec<String>,
}

impl TerminalView {
    pub const fn new(hidden: Vec<String>) -> Self {
        Self {
            message: None,
            items: Vec::new(),
            hidden,
        }
    }

    /// Books currently shown, hidden providers left out.
    pub fn visible(&self) -> impl Iterator<Item = (usize, &Book)> {
        self.items
            .iter()
            .filter(|item| item.visible)
            .map(|item| (item.position, &item.book))
    }

    /// The result area as text.
    pub fn display(&self) -> String {
        if let Some(message) = &self.message {
            return message.clone();
        }

        let mut out = String::new();
        for (position, book) in self.visible() {
            if !out.is_empty() {
                out.push('\n');
            }
            list_item(&mut out, position, book);
        }
        out
    }
}

impl View for TerminalView {
    fn show_message(&mut self, message: &str) {
        debug!("{message}");
        self.message = Some(message.to_owned());
        self.items.clear();
    }

    fn clear(&mut self) {
        self.message = None;
        self.items.clear();
    }

    fn append(&mut self, position: usize, book: &Book) {
        self.items.push(Item {
            position,
            book: book.clone(),
            visible: true,
        });
    }

    fn apply_toggle(&mut self, source: &Source) {
        let hide = self.hidden.iter().any(|h| h == source.id);
        for item in self.items.iter_mut().filter(|i| i.book.source == *source) {
            item.visible = !hide;
        }
    }

    fn remove_toggle(&mut self, source: &Source) {
        trace!("{} is not searched - removing its toggle", source.description);
        if self.hidden.iter().any(|h| h == source.id) {
            warn!("--hide {} has no effect as it is not searched", source.id);
            self.hidden.retain(|h| h != source.id);
        }
    }
}

fn list_item(out: &mut String, position: usize, book: &Book) {
    let authors = if book.authors.is_empty() {
        "Unknown author".to_owned()
    } else {
        book.authors.join(", ")
    };

    // Writing to a String does not fail.
    let _ = writeln!(out, "{}. {}", position + 1, book.title);
    let _ = writeln!(out, "   {authors}");
    if !book.publisher.is_empty() || !book.published_date.is_empty() {
        let _ = writeln!(out, "   {} {}", book.publisher, book.published_date);
    }
    let _ = writeln!(
        out,
        "   Rating: {}  Source: {}",
        book.rating, book.source.description
    );
    let _ = writeln!(out, "   Cover: {}", book.cover);
    let _ = write!(out, "   {}", book.url);
}
