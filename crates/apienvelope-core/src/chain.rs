//! Contextual error wrapping and cause-chain rendering
//!
//! An error response carries a single message string. When handlers wrap
//! errors with context, the message is the whole chain, outermost first:
//!
//! ```
//! use apienvelope_core::{Wrapped, render_chain};
//!
//! let err = Wrapped::new("load user", Wrapped::new("query failed", "connection refused"));
//! assert_eq!(render_chain(&err), "load user: query failed: connection refused");
//! ```

use std::error::Error;
use std::fmt;

type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Separator placed between each level of a rendered cause chain
const CHAIN_SEPARATOR: &str = ": ";

/// An error annotated with a context message
///
/// `Display` prints only the context; the wrapped error is reachable through
/// [`Error::source`]. Use [`render_chain`] to get the full message.
#[derive(Debug)]
pub struct Wrapped {
    context: String,
    source: BoxError,
}

impl Wrapped {
    /// Wrap `source` with a context message
    ///
    /// `source` may be any error, or a plain string for a leaf message.
    pub fn new(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            context: context.into(),
            source: source.into(),
        }
    }

    /// The context message added at this level
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Unwrap into the inner error
    pub fn into_source(self) -> BoxError {
        self.source
    }
}

impl fmt::Display for Wrapped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.context)
    }
}

impl Error for Wrapped {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Extension trait for attaching context to the error of a `Result`
pub trait ResultExt<T> {
    /// Wrap the error, if any, with a context message
    fn context(self, context: impl Into<String>) -> Result<T, Wrapped>;

    /// Wrap the error, if any, with a lazily built context message
    fn with_context<C, F>(self, f: F) -> Result<T, Wrapped>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    fn context(self, context: impl Into<String>) -> Result<T, Wrapped> {
        self.map_err(|e| Wrapped::new(context, e))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, Wrapped>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Wrapped::new(f(), e))
    }
}

/// Render an error and all of its causes as one `": "`-separated line
///
/// Many errors already embed their cause in their own message
/// (`"request read failed: boom"` with a source of `"boom"`). Such a cause is
/// not repeated. A [`Wrapped`] level never embeds its cause, so every level
/// below it is always printed, even when empty.
pub fn render_chain(err: &(dyn Error + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut parent = err;
    let mut parent_text = rendered.clone();

    while let Some(cause) = parent.source() {
        let text = cause.to_string();
        if !embeds_cause(parent, &parent_text, &text) {
            rendered.push_str(CHAIN_SEPARATOR);
            rendered.push_str(&text);
        }
        parent = cause;
        parent_text = text;
    }

    rendered
}

/// Whether `parent` already prints `cause_text` as the last segment of its own message
fn embeds_cause(parent: &(dyn Error + 'static), parent_text: &str, cause_text: &str) -> bool {
    if parent.is::<Wrapped>() {
        return false;
    }
    parent_text
        .strip_suffix(cause_text)
        .is_some_and(|head| head.ends_with(CHAIN_SEPARATOR))
}

/// The innermost error of a cause chain
pub fn root_cause<'a>(err: &'a (dyn Error + 'static)) -> &'a (dyn Error + 'static) {
    let mut current = err;
    while let Some(next) = current.source() {
        current = next;
    }
    current
}
