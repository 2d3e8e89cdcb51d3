use std::fmt::Write as _;

use crate::{interact, view::TerminalView};

use bookmeta::{BookForm, Config, Searcher};

use clap::Subcommand;
use eyre::eyre;
use log::trace;

#[derive(Subcommand)]
#[non_exhaustive]
pub enum Commands {
    /// Search every provider for books by title
    #[clap(arg_required_else_help = true)]
    Search {
        /// Title or keywords to search for
        #[clap(required = true)]
        keyword: Vec<String>,

        /// Fill in the book details from the result at this position (starting at 1)
        #[clap(short, long, conflicts_with = "interact")]
        select: Option<usize>,

        /// Choose the result to fill in the book details from
        #[clap(short, long)]
        interact: bool,

        /// Print JSON instead of text
        #[clap(long)]
        json: bool,

        /// Hide the results of a provider (douban, google or goodreads)
        #[clap(long)]
        hide: Vec<String>,
    },

    /// List the providers that are searched, in the order their results are shown
    Sources,
}

impl Commands {
    pub fn execute(self, config: &Config) -> eyre::Result<String> {
        match self {
            Commands::Search {
                keyword,
                select,
                interact,
                json,
                hide,
            } => {
                let keyword = keyword.join(" ");
                let mut searcher: Searcher = Searcher::new(config)?;
                let mut view = TerminalView::new(hide);

                searcher.search(&keyword, &mut view);

                let position = if interact {
                    Some(interact::user_select_book(view.visible())?)
                } else {
                    select
                        .map(|n| {
                            n.checked_sub(1)
                                .ok_or_else(|| eyre!("Result positions start at 1"))
                        })
                        .transpose()?
                };

                if let Some(position) = position {
                    trace!("Filling in the book details from result {position}");
                    let form = searcher
                        .select(position)
                        .ok_or_else(|| eyre!("There is no result at position {}", position + 1))?;
                    return if json {
                        Ok(serde_json::to_string_pretty(&form)?)
                    } else {
                        Ok(form_display(&form))
                    };
                }

                if json {
                    let books: Vec<_> = view.visible().map(|(_, book)| book).collect();
                    Ok(serde_json::to_string_pretty(&books)?)
                } else {
                    Ok(view.display())
                }
            }
            Commands::Sources => Ok(config
                .providers()
                .iter()
                .map(|p| {
                    let source = p.source();
                    format!("{}\t{}\t{}", source.id, source.description, source.url)
                })
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }
}

fn form_display(form: &BookForm) -> String {
    let mut out = String::new();
    // Writing to a String does not fail.
    let _ = writeln!(out, "Title: {}", form.title);
    let _ = writeln!(out, "Author: {}", form.author);
    let _ = writeln!(out, "Tags: {}", form.tags);
    let _ = writeln!(out, "Rating: {}", form.rating);
    let _ = writeln!(out, "Cover: {}", form.cover_url);
    let _ = write!(out, "Description:\n{}", form.description);
    out
}

#[test]
fn sources_lists_goodreads_only_with_token() {
    let config = Config::default();
    let out = Commands::Sources.execute(&config).unwrap();
    assert_eq!(
        "douban\tDouban Books\thttps://book.douban.com/\ngoogle\tGoogle Books\thttps://books.google.com/",
        out
    );

    let config = Config {
        goodreads_token: Some("token".to_owned()),
        ..Config::default()
    };
    let out = Commands::Sources.execute(&config).unwrap();
    assert!(out.ends_with("goodreads\tGoodreads\thttps://www.goodreads.com/"));
}

#[test]
fn form_display_lists_every_field() {
    let form = BookForm {
        description: "A handbook".to_owned(),
        author: "Steve McConnell".to_owned(),
        title: "Code Complete".to_owned(),
        tags: "a,b".to_owned(),
        rating: 4,
        cover_preview: "cover.jpg".to_owned(),
        cover_url: "cover.jpg".to_owned(),
    };

    assert_eq!(
        "Title: Code Complete\nAuthor: Steve McConnell\nTags: a,b\nRating: 4\nCover: cover.jpg\nDescription:\nA handbook",
        form_display(&form)
    );
}
