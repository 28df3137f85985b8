//! Extension traits for wrapping errors inline

use super::constructors::wrap;
use super::options::Opt;
use super::types::Error;

/// Wrap the error side of a `Result`
pub trait ResultExt<T> {
    /// Wrap the error, if any, with a message and options
    ///
    /// # Errors
    ///
    /// Returns the wrapped error when `self` is `Err`.
    fn wrap_err(self, message: impl Into<String>, opts: &[Opt]) -> Result<T, Error>;

    /// Like [`ResultExt::wrap_err`] but builds the message lazily
    ///
    /// # Errors
    ///
    /// Returns the wrapped error when `self` is `Err`.
    fn wrap_err_with<M, F>(self, message: F, opts: &[Opt]) -> Result<T, Error>
    where
        M: Into<String>,
        F: FnOnce() -> M;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    #[track_caller]
    fn wrap_err(self, message: impl Into<String>, opts: &[Opt]) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(wrap(err, message, opts)),
        }
    }

    #[track_caller]
    fn wrap_err_with<M, F>(self, message: F, opts: &[Opt]) -> Result<T, Error>
    where
        M: Into<String>,
        F: FnOnce() -> M,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(wrap(err, message(), opts)),
        }
    }
}

/// Turn a missing value into an error
pub trait OptionExt<T> {
    /// Return `Err` with a new error when `self` is `None`
    ///
    /// # Errors
    ///
    /// Returns a new error when `self` is `None`.
    fn ok_or_err(self, message: impl Into<String>, opts: &[Opt]) -> Result<T, Error>;
}

impl<T> OptionExt<T> for Option<T> {
    #[track_caller]
    fn ok_or_err(self, message: impl Into<String>, opts: &[Opt]) -> Result<T, Error> {
        match self {
            Some(value) => Ok(value),
            None => Err(Error::new(message, opts)),
        }
    }
}
