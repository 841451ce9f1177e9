//! # Ballot Box
//!
//! Append-only in-memory store of sealed votes. A vote is either recorded in
//! full or not at all; nothing is ever removed.

use super::entities::{SealedVote, TransactionId};
use super::errors::SealError;
use parking_lot::RwLock;
use std::collections::HashSet;

#[derive(Default)]
struct BoxInner {
    votes: Vec<SealedVote>,
    ids: HashSet<TransactionId>,
}

/// Append-only collection of sealed votes.
#[derive(Default)]
pub struct BallotBox {
    inner: RwLock<BoxInner>,
}

impl BallotBox {
    /// Create an empty ballot box.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sealed vote.
    ///
    /// # Errors
    ///
    /// `SealError::DuplicateTransaction` if the id is already present.
    pub fn record(&self, vote: SealedVote) -> Result<usize, SealError> {
        let mut inner = self.inner.write();
        if !inner.ids.insert(vote.transaction_id().clone()) {
            return Err(SealError::DuplicateTransaction(
                vote.transaction_id().to_string(),
            ));
        }
        inner.votes.push(vote);
        Ok(inner.votes.len())
    }

    /// Number of recorded votes.
    pub fn count(&self) -> usize {
        self.inner.read().votes.len()
    }

    /// True if a vote with this id was recorded.
    pub fn contains(&self, id: &TransactionId) -> bool {
        self.inner.read().ids.contains(id)
    }

    /// Consistent copy of all votes in recording order.
    pub fn snapshot(&self) -> Vec<SealedVote> {
        self.inner.read().votes.clone()
    }
}
