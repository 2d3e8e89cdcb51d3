#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![allow(clippy::as_conversions, clippy::mod_module_files)]

use std::{path::PathBuf, process};

mod app;
mod commands;
mod interact;
mod view;

use commands::Commands;

use clap::{Args, Parser};
use log::trace;

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        process::exit(2);
    }
}

fn try_main() -> eyre::Result<()> {
    let Cli {
        command,
        global_opts:
            GlobalOpts {
                goodreads_token,
                bridge_url,
                messages,
                timeout,
                verbosity,
                quiet,
            },
    } = Cli::parse();

    setup_errlog(verbosity as usize, quiet)?;

    let config = app::build_config(goodreads_token, bridge_url, messages, timeout)?;
    trace!("Searching {} providers", config.providers().len());

    let message = command.execute(&config)?;
    if !message.is_empty() {
        println!("{message}");
    }
    Ok(())
}

fn setup_errlog(verbosity: usize, quiet: bool) -> eyre::Result<()> {
    // if quiet then ignore verbosity but still show errors
    let verbosity = if quiet { 0 } else { verbosity + 1 };

    stderrlog::new().verbosity(verbosity).init()?;
    Ok(())
}

#[derive(Parser)]
#[clap(name = "bookmeta")]
#[clap(about = "Search book metadata providers by title and fill in the details of a book")]
#[clap(version, author)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(flatten)]
    global_opts: GlobalOpts,
}

#[derive(Debug, Args)]
struct GlobalOpts {
    /// Goodreads API token, Goodreads is only searched when a token is given
    #[clap(long, env = "GOODREADS_TOKEN", hide_env_values = true, global = true)]
    goodreads_token: Option<String>,

    /// Endpoint of the service which wraps the Goodreads XML response in JSON
    #[clap(long, global = true)]
    bridge_url: Option<String>,

    /// JSON file with the localized `loading`, `no_result` and `search_error` messages
    #[clap(short, long, parse(from_os_str), global = true)]
    messages: Option<PathBuf>,

    /// Seconds to wait for a provider before giving up on it
    #[clap(short, long, global = true)]
    timeout: Option<u64>,

    /// How chatty the program is when performing commands
    ///
    /// The number of times this flag is used will increase how chatty
    /// the program is.
    #[clap(short, long, parse(from_occurrences), global = true)]
    verbosity: u8,

    /// Prevents the program from logging anything but errors to stderr.
    #[clap(short, long, global = true)]
    quiet: bool,
}
