use futures_util::future;
use futures_util::FutureExt;

use crate::{EntryId, Signup, WaitlistBackend, WaitlistEntry, WaitlistError, WaitlistFut};

/// Stand-in collaborator when no endpoint is configured.
///
/// Signups are written to the log and reported as accepted; queries fail with
/// [`WaitlistError::NotConfigured`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleWaitlist;

impl WaitlistBackend for ConsoleWaitlist {
    fn add(&self, signup: Signup) -> WaitlistFut<EntryId> {
        tracing::info!(
            name = %signup.name,
            email = %signup.email,
            "Waitlist signup (no endpoint configured)"
        );
        future::ready(Ok(EntryId::new("local"))).boxed()
    }

    fn list(&self) -> WaitlistFut<Vec<WaitlistEntry>> {
        future::ready(Err(WaitlistError::NotConfigured)).boxed()
    }

    fn count(&self) -> WaitlistFut<u64> {
        future::ready(Err(WaitlistError::NotConfigured)).boxed()
    }

    fn describe(&self) -> String {
        "console".to_string()
    }
}
