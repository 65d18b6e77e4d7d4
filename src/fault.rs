//! The native fault channel.
//!
//! Expected failures travel as [`Outcome`](crate::Outcome) values. Everything
//! else (the unexpected, the environmental, the "this should never happen")
//! travels as a [`Fault`] in the `Err` side of a plain `Result`, and `?`
//! carries it up the stack.
//!
//! A `Fault` remembers three things about the error it wraps:
//!
//! - the concrete error value (so callers can match on its category),
//! - the name of the error's type,
//! - the source location where it was raised.
//!
//! # Examples
//!
//! ```
//! use upshot::Fault;
//! use std::io;
//!
//! fn read_config() -> Result<String, io::Error> {
//!     Err(io::Error::new(io::ErrorKind::NotFound, "missing config"))
//! }
//!
//! fn open() -> Result<String, Fault> {
//!     let text = read_config()?;
//!     Ok(text)
//! }
//!
//! let fault = open().unwrap_err();
//! assert!(fault.is::<io::Error>());
//! assert_eq!(fault.message(), "missing config");
//! ```

use std::any::type_name;
use std::error::Error as StdError;
use std::fmt;
use std::panic::Location;

/// An owned, type-erased error raised by an operation.
///
/// The error itself is held as an [`anyhow::Error`]; `Fault` adds the name of
/// the concrete error type and the location where it was raised, which the
/// flattened [`message_stack`](Fault::message_stack) prints for every layer.
///
/// `Fault` intentionally does not implement [`std::error::Error`]; that keeps
/// the blanket `From<E: Error>` conversion coherent, which in turn lets `?`
/// lift any error into a `Fault`.
pub struct Fault {
    error: anyhow::Error,
    type_name: &'static str,
    location: &'static Location<'static>,
    cause: Option<Box<Fault>>,
}

impl Fault {
    /// Wrap an error, recording the caller's location.
    ///
    /// # Examples
    ///
    /// ```
    /// use upshot::Fault;
    /// use std::fmt;
    ///
    /// #[derive(Debug)]
    /// struct Timeout;
    ///
    /// impl fmt::Display for Timeout {
    ///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    ///         write!(f, "timed out")
    ///     }
    /// }
    ///
    /// impl std::error::Error for Timeout {}
    ///
    /// let fault = Fault::new(Timeout);
    /// assert!(fault.is::<Timeout>());
    /// assert!(fault.type_name().ends_with("Timeout"));
    /// ```
    #[track_caller]
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Fault {
            error: anyhow::Error::new(error),
            type_name: type_name::<E>(),
            location: Location::caller(),
            cause: None,
        }
    }

    /// Adopt an [`anyhow::Error`] raised elsewhere.
    ///
    /// Category matching still sees the error anyhow wraps.
    #[track_caller]
    pub fn from_anyhow(error: anyhow::Error) -> Self {
        Fault {
            error,
            type_name: type_name::<anyhow::Error>(),
            location: Location::caller(),
            cause: None,
        }
    }

    /// Raise a fault carrying only a message.
    ///
    /// The fault's category is [`MessageFault`].
    #[track_caller]
    pub fn msg(message: impl Into<String>) -> Self {
        Fault::new(MessageFault(message.into()))
    }

    /// Wrap the error in a line of context.
    ///
    /// The context becomes the fault's message and the original error its
    /// first source; the category is unchanged.
    ///
    /// ```
    /// use std::io;
    /// use upshot::Fault;
    ///
    /// let fault = Fault::new(io::Error::other("socket closed")).context("syncing ledger");
    /// assert!(fault.is::<io::Error>());
    /// assert_eq!(fault.message(), "syncing ledger");
    /// ```
    pub fn context<D>(mut self, context: D) -> Self
    where
        D: fmt::Display + Send + Sync + 'static,
    {
        self.error = self.error.context(context);
        self
    }

    /// Attach an explicit nested cause.
    ///
    /// The cause takes precedence over the source chain of the wrapped error.
    pub fn caused_by(mut self, cause: Fault) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Returns `true` if the wrapped error is of category `C`.
    pub fn is<C>(&self) -> bool
    where
        C: StdError + Send + Sync + 'static,
    {
        self.error.is::<C>()
    }

    /// Borrow the wrapped error as category `C`, if it is one.
    pub fn downcast_ref<C>(&self) -> Option<&C>
    where
        C: StdError + Send + Sync + 'static,
    {
        self.error.downcast_ref::<C>()
    }

    /// Take the wrapped error out as category `C`.
    ///
    /// Returns the fault unchanged when the category does not match.
    pub fn downcast<C>(self) -> Result<C, Self>
    where
        C: StdError + Send + Sync + 'static,
    {
        let Fault {
            error,
            type_name,
            location,
            cause,
        } = self;

        error.downcast::<C>().map_err(|error| Fault {
            error,
            type_name,
            location,
            cause,
        })
    }

    /// The wrapped error's message.
    pub fn message(&self) -> String {
        self.error.to_string()
    }

    /// Name of the wrapped error's concrete type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Where the fault was raised.
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// The explicit nested cause, if one was attached.
    pub fn cause(&self) -> Option<&Fault> {
        self.cause.as_deref()
    }

    /// Borrow the underlying [`anyhow::Error`].
    pub fn as_anyhow(&self) -> &anyhow::Error {
        &self.error
    }

    /// Flatten the fault and all of its nested causes into a multi-line trace.
    ///
    /// Each layer contributes its type name, message and location. Nested
    /// layers are wrapped in `BEGIN`/`END` markers. A non-empty `prefix` is
    /// written as the first line.
    ///
    /// # Examples
    ///
    /// ```
    /// use upshot::Fault;
    ///
    /// let fault = Fault::msg("disk full").caused_by(Fault::msg("quota exceeded"));
    /// let stack = fault.message_stack("saving report");
    ///
    /// let lines: Vec<&str> = stack.lines().collect();
    /// assert_eq!(lines[0], "saving report");
    /// assert!(lines[2].ends_with("disk full"));
    /// assert!(stack.contains("---- BEGIN Inner Fault ----"));
    /// assert!(stack.contains("quota exceeded"));
    /// ```
    pub fn message_stack(&self, prefix: &str) -> String {
        let mut out = String::new();
        if !prefix.is_empty() {
            out.push_str(prefix);
            out.push('\n');
        }
        write_fault(&mut out, self);
        out.truncate(out.trim_end().len());
        out
    }
}

const BEGIN_INNER: &str = "\t---- BEGIN Inner Fault ----\n";
const END_INNER: &str = "\t---- END Inner Fault ----\n";

fn write_layer(out: &mut String, type_name: &str, message: &str, location: &str) {
    out.push_str(&format!("\tFault type: {}\n", type_name));
    out.push_str(&format!("\tFault message: {}\n", message));
    out.push_str(&format!("\tLocation: {}\n", location));
}

fn write_fault(out: &mut String, fault: &Fault) {
    write_layer(
        out,
        fault.type_name,
        &fault.message(),
        &fault.location.to_string(),
    );
    match &fault.cause {
        Some(cause) => {
            out.push_str(BEGIN_INNER);
            write_fault(out, cause);
            out.push_str(END_INNER);
        }
        None => write_sources(out, fault.error.chain().skip(1)),
    }
}

// Sources reached through the error chain carry no type name or location.
fn write_sources<'a, I>(out: &mut String, mut sources: I)
where
    I: Iterator<Item = &'a (dyn StdError + 'static)>,
{
    if let Some(source) = sources.next() {
        out.push_str(BEGIN_INNER);
        write_layer(out, "dyn Error", &source.to_string(), "<unknown>");
        write_sources(out, sources);
        out.push_str(END_INNER);
    }
}

impl<E> From<E> for Fault
where
    E: StdError + Send + Sync + 'static,
{
    #[track_caller]
    fn from(error: E) -> Self {
        Fault::new(error)
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fault")
            .field("type_name", &self.type_name)
            .field("error", &format_args!("{}", self.error))
            .field("location", &format_args!("{}", self.location))
            .field("cause", &self.cause)
            .finish()
    }
}

/// Category of faults raised from a bare message via [`Fault::msg`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFault(pub String);

impl fmt::Display for MessageFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for MessageFault {}
