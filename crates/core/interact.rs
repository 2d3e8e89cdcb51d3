use bookmeta::Book;
use eyre::{eyre, Context, Result};

pub fn user_select<S: ToString>(prompt: &str, items: &[S]) -> Result<usize> {
    let selection = dialoguer::Select::with_theme(&dialoguer::theme::ColorfulTheme::default())
        .with_prompt(prompt)
        .default(0)
        .items(items)
        .interact_opt()
        .wrap_err_with(|| eyre!("User selection cancelled"))?;

    if let Some(index) = selection {
        Ok(index)
    } else {
        Err(eyre!("No selection made - cancelling operation"))
    }
}

/// Lets the user pick one of `books`, returning its position.
pub fn user_select_book<'a>(books: impl Iterator<Item = (usize, &'a Book)>) -> Result<usize> {
    let (positions, items): (Vec<_>, Vec<_>) = books
        .map(|(position, book)| (position, book_summary(book)))
        .unzip();

    if items.is_empty() {
        return Err(eyre!("There are no results to choose from"));
    }

    user_select("Fill in the book details from", &items).map(|i| positions[i])
}

fn book_summary(book: &Book) -> String {
    if book.authors.is_empty() {
        format!("{} ({})", book.title, book.source.description)
    } else {
        format!(
            "{} - {} ({})",
            book.title,
            book.authors.join(", "),
            book.source.description
        )
    }
}

#[test]
fn summary_names_authors_and_source() {
    let mut book = Book::empty(bookmeta::provider::KNOWN_SOURCES[1]);
    book.title = "Code Complete".to_owned();
    assert_eq!("Code Complete (Google Books)", book_summary(&book));

    book.authors = vec!["Steve McConnell".to_owned()];
    assert_eq!(
        "Code Complete - Steve McConnell (Google Books)",
        book_summary(&book)
    );
}
