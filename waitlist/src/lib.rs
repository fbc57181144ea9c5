//! Waitlist data collaborator.
//!
//! The form hands one [`Signup`] to a [`WaitlistBackend`] and never looks at the
//! stored entry again. Three backends are provided:
//!
//! - [`ConvexClient`] - hosted Convex deployment over its HTTP function API
//! - [`MemoryWaitlist`] - in-process store with the same semantics, for offline runs
//! - [`ConsoleWaitlist`] - used when no endpoint is configured; logs the signup
//!
//! All backends share the same contract: `add` is idempotent per email (the
//! existing entry is updated and its id returned), `list` returns the newest
//! entries first, and `count` is the number of distinct emails.

mod console;
mod convex;
mod error;
mod memory;

pub use console::ConsoleWaitlist;
pub use convex::{ConvexClient, FunctionKind};
pub use error::WaitlistError;
pub use memory::MemoryWaitlist;

pub use anora_types::{EntryId, Signup, WaitlistEntry};

use futures_util::future::BoxFuture;

/// Function path of the signup mutation.
pub const ADD_FUNCTION: &str = "waitlist:add";
/// Function path of the newest-first listing query.
pub const LIST_FUNCTION: &str = "waitlist:list";
/// Function path of the entry count query.
pub const COUNT_FUNCTION: &str = "waitlist:count";

pub type WaitlistFut<T> = BoxFuture<'static, Result<T, WaitlistError>>;

/// Operations of the waitlist data collaborator.
///
/// Futures are `'static` so callers can spawn them on their own runtime.
pub trait WaitlistBackend: Send + Sync {
    /// Record a signup and return the id of the (possibly pre-existing) entry.
    fn add(&self, signup: Signup) -> WaitlistFut<EntryId>;

    /// All entries, newest first.
    fn list(&self) -> WaitlistFut<Vec<WaitlistEntry>>;

    fn count(&self) -> WaitlistFut<u64>;

    /// Short label for logs.
    fn describe(&self) -> String;
}
