use std::{fmt::Display, panic::Location};

use anyhow::{Context, Result};

pub mod prelude {
    extern crate anyhow;
    pub use anyhow::{anyhow, bail, Context, Result};

    extern crate thiserror;
    pub use thiserror::Error;

    pub use super::LocatedError;
    pub use crate::loc;
}

/// Format a `[file:line:column]` tag from a `std::panic::Location`
macro_rules! loc_caller {
    ($caller:expr) => {
        format!("[{}:{}:{}]", $caller.file(), $caller.line(), $caller.column())
    }
}

/// Early-return shorthand: wrap an error into an `Err(anyhow::Error)` tagged with the
/// location of the macro call.
/// ```
/// use located_error::prelude::*;
/// fn fail() -> Result<()> {
///     loc!("Whoops")
/// }
/// assert!(fail().is_err());
/// ```
#[macro_export]
macro_rules! loc {
    ($err:expr) => {
        $crate::prelude::Context::context(
            ::std::result::Result::Err($crate::prelude::anyhow!($err)),
            format!("[{}:{}:{}]", file!(), line!(), column!())
        )
    };
}

pub trait LocatedError<T, E> {
    /// Wrap the error value with additional context + the location at which it was called.
    fn loc<C>(self, context: C) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static;

    /// Wrap the error value with additional context that is evaluated lazily
    /// only once an error does occur + the location at which it was called.
    fn with_loc<C, F>(self, f: F) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> LocatedError<T, E> for Result<T, E>
where
    E: Display + Send + Sync + 'static,
    Result<T, E>: Context<T, E>,
{
    #[track_caller]
    fn loc<C>(self, context: C) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static
    {
        let caller = Location::caller();
        self.with_context(|| format!("{} {context}", loc_caller!(caller)))
    }

    #[track_caller]
    fn with_loc<C, F>(self, f: F) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C
    {
        let caller = Location::caller();
        self.with_context(|| format!("{} {}", loc_caller!(caller), f()))
    }
}
