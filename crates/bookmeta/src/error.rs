pub(crate) type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Why a provider search, or building the client for one, failed.
///
/// An error carries a message, the error it was caused by, or both.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    source: Option<DynError>,
}

/// Broad cause of an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never got a successful HTTP response.
    IO,
    /// The response body is not the document the provider is expected to send.
    Deserialize,
    /// The provider answered with an empty body.
    NoValue,
    /// A URL or client could not be built from the configuration.
    Config,
}

impl ErrorKind {
    const fn label(self) -> &'static str {
        match self {
            Self::IO => "IO error",
            Self::Deserialize => "Deserialize error",
            Self::NoValue => "No value error",
            Self::Config => "Config error",
        }
    }
}

impl Error {
    /// An error of `kind` described by `message`.
    #[must_use]
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: Some(message.into()),
            source: None,
        }
    }

    /// An error of `kind` caused by `source`, such as a `reqwest` or `serde_json` failure.
    #[must_use]
    pub fn wrap<E>(kind: ErrorKind, source: E) -> Self
    where
        E: Into<DynError>,
    {
        Self {
            kind,
            message: None,
            source: Some(source.into()),
        }
    }

    /// The broad cause, used to tell transport failures from bad responses.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind.label())?;

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(cause) = &self.source {
            write!(f, ": caused by {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| &**e as _)
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    #[test]
    fn display_includes_kind_message_and_cause() {
        let err = Error::new(ErrorKind::NoValue, "Response text is empty");
        assert_eq!("No value error: Response text is empty", err.to_string());

        let io = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
        let err = Error::wrap(ErrorKind::IO, io);
        assert_eq!("IO error: caused by connection reset", err.to_string());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn kind_is_kept() {
        let err = Error::new(ErrorKind::Config, "relative URL without a base");

        assert_eq!(ErrorKind::Config, err.kind());
        assert!(err.to_string().starts_with("Config error: "));
    }
}
