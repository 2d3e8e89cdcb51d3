#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]

//! # bookmeta
//!
//! bookmeta searches book metadata providers (Douban, Google Books and, when a token is
//! configured, Goodreads) by title, all at once. Results of every provider are normalized into
//! a [`Book`] and drawn into a [`View`] as soon as each provider answers. A rendered result can
//! then be turned into the values of a book edit form with [`BookForm`].
//!
//! ```no_run
//! use bookmeta::{Book, Config, Searcher, Source, View};
//!
//! struct Print;
//!
//! impl View for Print {
//!     fn show_message(&mut self, message: &str) {
//!         println!("{message}");
//!     }
//!     fn clear(&mut self) {}
//!     fn append(&mut self, position: usize, book: &Book) {
//!         println!("{position}: {} ({})", book.title, book.source.description);
//!     }
//!     fn apply_toggle(&mut self, _source: &Source) {}
//! }
//!
//! # fn main() -> Result<(), bookmeta::Error> {
//! let mut searcher: Searcher = Searcher::new(&Config::default())?;
//! searcher.search("code complete", &mut Print);
//!
//! if let Some(form) = searcher.select(0) {
//!     println!("{} by {}", form.title, form.author);
//! }
//! # Ok(())
//! # }
//! ```

mod api;
mod book;
pub mod config;
mod error;
pub mod provider;
pub mod render;
pub mod search;

pub use api::{Adapter, Client};
pub use book::{Book, Source, GENERIC_COVER};
pub use config::{Config, Messages};
pub use error::{Error, ErrorKind};
pub use provider::Provider;
pub use render::{BookForm, View};
pub use search::{Searcher, Session};
