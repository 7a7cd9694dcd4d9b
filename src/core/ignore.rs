//! # Ignore set: errors that count as a clean stop.
//!
//! When the first terminal error of a group run matches an [`IgnoreRule`], the group
//! returns `Ok(())` instead. Rules are matched against every link of
//! [`ActorError::chain`], so wrapped sentinels are found as well.
//!
//! ## Defaults
//! [`IgnoreSet::default`] holds [`ContextError::Canceled`] and
//! [`ContextError::DeadlineExceeded`]. Each call builds a new set; nothing is shared
//! between groups.

use std::any::type_name;
use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::error::{ActorError, ContextError};

type Matcher = Arc<dyn Fn(&(dyn StdError + 'static)) -> bool + Send + Sync>;

/// A single matcher in the ignore set.
///
/// # Example
/// ```
/// use actorgroup::{ActorError, IgnoreRule};
///
/// #[derive(Debug, PartialEq, thiserror::Error)]
/// enum ServerError {
///     #[error("server closed")]
///     Closed,
///     #[error("bind failed")]
///     Bind,
/// }
///
/// let rule = IgnoreRule::error(ServerError::Closed);
/// assert!(rule.matches(&ActorError::failed(ServerError::Closed)));
/// assert!(!rule.matches(&ActorError::failed(ServerError::Bind)));
/// ```
#[derive(Clone)]
pub struct IgnoreRule {
    label: Cow<'static, str>,
    matcher: Matcher,
}

impl IgnoreRule {
    /// Matches an error equal to `sentinel` anywhere in the chain.
    pub fn error<E>(sentinel: E) -> Self
    where
        E: StdError + PartialEq + Send + Sync + 'static,
    {
        Self {
            label: Cow::Owned(sentinel.to_string()),
            matcher: Arc::new(move |e: &(dyn StdError + 'static)| {
                e.downcast_ref::<E>() == Some(&sentinel)
            }),
        }
    }

    /// Matches any error of type `E` anywhere in the chain.
    pub fn kind<E>() -> Self
    where
        E: StdError + 'static,
    {
        Self {
            label: Cow::Borrowed(type_name::<E>()),
            matcher: Arc::new(|e: &(dyn StdError + 'static)| e.is::<E>()),
        }
    }

    /// Matches [`ContextError::Canceled`].
    pub fn canceled() -> Self {
        Self::error(ContextError::Canceled)
    }

    /// Matches [`ContextError::DeadlineExceeded`].
    pub fn deadline_exceeded() -> Self {
        Self::error(ContextError::DeadlineExceeded)
    }

    /// Returns the rules a group ignores unless told otherwise: cancellation and
    /// deadline expiry. Every call builds a new list.
    pub fn defaults() -> Vec<IgnoreRule> {
        vec![Self::canceled(), Self::deadline_exceeded()]
    }

    /// True if any link of `err`'s chain matches this rule.
    pub fn matches(&self, err: &ActorError) -> bool {
        err.chain().any(|e| (self.matcher)(e))
    }

    /// Human-readable description of what this rule matches.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl From<ContextError> for IgnoreRule {
    fn from(e: ContextError) -> Self {
        IgnoreRule::error(e)
    }
}

impl fmt::Debug for IgnoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IgnoreRule").field(&self.label).finish()
    }
}

/// Ordered collection of [`IgnoreRule`]s.
#[derive(Clone, Debug)]
pub struct IgnoreSet {
    rules: Vec<IgnoreRule>,
}

impl IgnoreSet {
    /// Creates an empty set: every error is surfaced.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends one rule.
    pub fn push(&mut self, rule: impl Into<IgnoreRule>) {
        self.rules.push(rule.into());
    }

    /// True if `err` matches any rule.
    pub fn matches(&self, err: &ActorError) -> bool {
        self.rules.iter().any(|r| r.matches(err))
    }

    /// Replaces a matching error with `Ok(())`; anything else passes through unchanged.
    pub fn filter(&self, res: Result<(), ActorError>) -> Result<(), ActorError> {
        match res {
            Err(e) if self.matches(&e) => Ok(()),
            other => other,
        }
    }

    /// Iterates over the rules in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &IgnoreRule> {
        self.rules.iter()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for IgnoreSet {
    /// `[Canceled, DeadlineExceeded]`
    fn default() -> Self {
        Self {
            rules: IgnoreRule::defaults(),
        }
    }
}

impl<R: Into<IgnoreRule>> Extend<R> for IgnoreSet {
    fn extend<I: IntoIterator<Item = R>>(&mut self, iter: I) {
        self.rules.extend(iter.into_iter().map(Into::into));
    }
}
