//! Outcome of every remote operation.

use crate::error::ErrorKind;

/// Success value or classified failure, returned by every dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultWrapper<T> {
    Success(T),
    Failure(ErrorKind),
}

impl<T> ResultWrapper<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ResultWrapper::Success(_))
    }

    pub fn into_result(self) -> Result<T, ErrorKind> {
        match self {
            ResultWrapper::Success(value) => Ok(value),
            ResultWrapper::Failure(kind) => Err(kind),
        }
    }

    /// The success value, or `T::default()` for a failure.
    ///
    /// List consumers use this to treat any failure as an empty result set.
    pub fn success_or_default(self) -> T
    where
        T: Default,
    {
        match self {
            ResultWrapper::Success(value) => value,
            ResultWrapper::Failure(_) => T::default(),
        }
    }
}

impl<T> From<ResultWrapper<T>> for Result<T, ErrorKind> {
    fn from(wrapper: ResultWrapper<T>) -> Self {
        wrapper.into_result()
    }
}
