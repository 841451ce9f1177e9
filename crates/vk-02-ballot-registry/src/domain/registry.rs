//! # Ballot Registry
//!
//! Loaded once per sitting. After construction nothing can add, remove or
//! reorder candidates.

use super::entities::{Candidate, SessionSalt, VoteRecord};
use super::errors::BallotError;
use shared_types::{CandidateId, Timestamp};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Immutable, ordered candidate list.
#[derive(Clone, Debug)]
pub struct BallotRegistry {
    candidates: Arc<[Candidate]>,
    index: Arc<HashMap<CandidateId, usize>>,
}

impl BallotRegistry {
    /// Build a registry, validating the candidate list.
    ///
    /// # Errors
    ///
    /// - `EmptyBallot` if `candidates` is empty
    /// - `DuplicateCandidate` if two entries share an id
    /// - `InvalidCandidate` if an id or name is blank
    pub fn new(candidates: Vec<Candidate>) -> Result<Self, BallotError> {
        if candidates.is_empty() {
            return Err(BallotError::EmptyBallot);
        }

        let mut index = HashMap::with_capacity(candidates.len());
        for (position, candidate) in candidates.iter().enumerate() {
            if candidate.id.as_str().trim().is_empty() {
                return Err(BallotError::InvalidCandidate(format!(
                    "entry {} has a blank id",
                    position
                )));
            }
            if candidate.name.trim().is_empty() {
                return Err(BallotError::InvalidCandidate(format!(
                    "candidate {} has a blank name",
                    candidate.id
                )));
            }
            if index.insert(candidate.id.clone(), position).is_some() {
                return Err(BallotError::DuplicateCandidate(candidate.id.clone()));
            }
        }

        info!(candidates = candidates.len(), "[vk-02] ballot registry loaded");

        Ok(Self {
            candidates: candidates.into(),
            index: Arc::new(index),
        })
    }

    /// Parse a JSON array of candidates.
    pub fn from_json(json: &str) -> Result<Self, BallotError> {
        let candidates: Vec<Candidate> =
            serde_json::from_str(json).map_err(|e| BallotError::Malformed(e.to_string()))?;
        Self::new(candidates)
    }

    /// Demonstration ballot used when no ballot file is configured.
    pub fn demo_sitting() -> Self {
        let candidates = vec![
            Candidate::new("C001", "Alice Johnson", "Democratic Progressive Party", "🌟"),
            Candidate::new("C002", "Robert Smith", "National Unity Alliance", "🏛️"),
            Candidate::new("C003", "Maria Garcia", "People's Reform Movement", "🌿"),
            Candidate::new("C004", "David Kumar", "Innovation First Party", "🚀"),
        ];
        match Self::new(candidates) {
            Ok(registry) => registry,
            Err(e) => unreachable!("demo ballot is statically valid: {e}"),
        }
    }

    /// Candidates in ballot order.
    pub fn list(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Look up a candidate.
    pub fn get(&self, id: &CandidateId) -> Option<&Candidate> {
        self.index.get(id).map(|&i| &self.candidates[i])
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Always false for a constructed registry.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Validate a selection and build the vote record.
    ///
    /// # Errors
    ///
    /// `BallotError::UnknownCandidate` if `candidate_id` is not on the ballot.
    pub fn select(
        &self,
        session_salt: SessionSalt,
        candidate_id: &CandidateId,
        at: Timestamp,
    ) -> Result<VoteRecord, BallotError> {
        if !self.index.contains_key(candidate_id) {
            return Err(BallotError::UnknownCandidate(candidate_id.clone()));
        }
        Ok(VoteRecord::new(session_salt, candidate_id.clone(), at))
    }
}
