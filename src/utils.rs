use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::error;

/// The pseudo-scope used for resources which live outside any region or
/// account, e.g. AWS managed IAM policies.
pub const GLOBAL_SCOPE: &str = "aws";

/// Formats an account ID and region into a scope: `{accountID}.{region}`, or
/// just the account ID for regionless resources.
pub fn format_scope(account_id: &str, region: &str) -> String {
    if region.is_empty() {
        account_id.to_string()
    } else {
        format!("{account_id}.{region}")
    }
}

/// Splits a scope into its account ID and region.
pub fn parse_scope(scope: &str) -> Result<(String, String), String> {
    let sections: Vec<&str> = scope.split('.').collect();

    match sections.as_slice() {
        [account_id, region] => Ok((account_id.to_string(), region.to_string())),
        _ => Err(format!("could not split scope '{scope}' into 2 sections")),
    }
}

/// Locks the mutex even if a panicking holder poisoned it.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(from_guard)
}

fn from_guard<T>(error: PoisonError<MutexGuard<'_, T>>) -> MutexGuard<'_, T> {
    error!("{:#?}", error);
    error.into_inner()
}
