use std::ops::Deref;

use crate::analyzer::Analysis;

/// A completed analysis, handed to planning.
///
/// Only the read API of [`Analysis`] is reachable: the wrapper dereferences
/// to a shared `&Analysis` and never to `&mut`. It owns all of its data and
/// can be shared across threads once frozen.
#[derive(Debug, Clone)]
pub struct ImmutableAnalysis {
    inner: Analysis,
}

impl From<Analysis> for ImmutableAnalysis {
    fn from(inner: Analysis) -> Self {
        Self { inner }
    }
}

impl Deref for ImmutableAnalysis {
    type Target = Analysis;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
