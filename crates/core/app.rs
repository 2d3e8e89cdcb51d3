use std::{fs, path::PathBuf, time::Duration};

use bookmeta::{Config, Messages};
use eyre::{eyre, Context};
use log::{info, trace};

pub fn build_config(
    goodreads_token: Option<String>,
    bridge_url: Option<String>,
    messages: Option<PathBuf>,
    timeout: Option<u64>,
) -> eyre::Result<Config> {
    let mut config = Config {
        goodreads_token,
        timeout: timeout.map(Duration::from_secs),
        ..Config::default()
    };

    if let Some(url) = bridge_url {
        trace!("Using '{url}' as the Goodreads bridge");
        config.bridge_url = url;
    }

    if let Some(path) = messages {
        config.messages = read_messages(&path)?;
    }

    if config.goodreads_token().is_some() {
        info!("Goodreads token found - Goodreads will be searched");
    }

    Ok(config)
}

fn read_messages(path: &std::path::Path) -> eyre::Result<Messages> {
    trace!("Reading messages from {}", path.display());
    let text = fs::read_to_string(path)
        .wrap_err_with(|| eyre!("Cannot read the messages file `{}`", path.display()))?;

    serde_json::from_str(&text)
        .wrap_err_with(|| eyre!("`{}` is not a valid messages file", path.display()))
}

#[test]
fn messages_file_overrides_defaults() {
    use assert_fs::prelude::*;

    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("messages.json");
    file.write_str(r#"{ "no_result": "没有结果" }"#).unwrap();

    let config = build_config(None, None, Some(file.to_path_buf()), Some(5)).unwrap();

    assert_eq!("没有结果", config.messages.no_result);
    assert_eq!(Messages::default().loading, config.messages.loading);
    assert_eq!(Some(Duration::from_secs(5)), config.timeout);
    assert_eq!(2, config.providers().len());
}

#[test]
fn missing_messages_file_is_an_error() {
    let err = build_config(None, None, Some(PathBuf::from("does/not/exist.json")), None)
        .expect_err("file does not exist");

    assert!(err.to_string().contains("Cannot read the messages file"));
}
