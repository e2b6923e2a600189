//! Poll store engine.

use super::StoreConfig;
use crate::error::{Error, Result};
use crate::model::{encode_id, Choice, Genre, Poll, SampleData, SampleNode, StoredRecord, Vote};
use sled::transaction::TransactionError;
use sled::{Db, Transactional, Tree};
use tracing::debug;

/// Tree indexing votes by poll and user.
const BALLOTS_TREE: &str = "ballots";

/// The poll store wrapping sled, one tree per record type.
pub struct PollStore {
    /// The underlying sled database.
    db: Db,

    polls: Tree,
    choices: Tree,
    votes: Tree,
    /// `poll_id ++ user` to vote id, one entry per user and poll.
    ballots: Tree,
    genres: Tree,
    sample_data: Tree,
    sample_nodes: Tree,
}

impl PollStore {
    /// Open or create a store with the given configuration.
    pub fn open(config: StoreConfig) -> Result<Self> {
        let db = config.to_sled_config().open()?;
        let polls = db.open_tree(Poll::TREE)?;
        let choices = db.open_tree(Choice::TREE)?;
        let votes = db.open_tree(Vote::TREE)?;
        let ballots = db.open_tree(BALLOTS_TREE)?;
        let genres = db.open_tree(Genre::TREE)?;
        let sample_data = db.open_tree(SampleData::TREE)?;
        let sample_nodes = db.open_tree(SampleNode::TREE)?;

        Ok(Self {
            db,
            polls,
            choices,
            votes,
            ballots,
            genres,
            sample_data,
            sample_nodes,
        })
    }

    /// Generate a new record id, unique across all trees.
    pub fn generate_id(&self) -> Result<u64> {
        Ok(self.db.generate_id()?)
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    // ========== Polls ==========

    /// Insert or replace a poll.
    pub fn put_poll(&self, poll: &Poll) -> Result<()> {
        put(&self.polls, poll)
    }

    /// Get a poll by id.
    pub fn get_poll(&self, id: u64) -> Result<Option<Poll>> {
        get(&self.polls, id)
    }

    /// All polls in id order.
    pub fn all_polls(&self) -> Result<Vec<Poll>> {
        scan(&self.polls)
    }

    /// Delete a poll together with its choices and votes.
    ///
    /// Returns false if the poll did not exist.
    pub fn delete_poll(&self, id: u64) -> Result<bool> {
        if self.polls.remove(encode_id(id))?.is_none() {
            return Ok(false);
        }

        let votes = self.votes_for_poll(id)?;
        for vote in &votes {
            self.remove_vote(vote)?;
        }
        let choices = self.choices_for_poll(id)?;
        for choice in &choices {
            self.choices.remove(encode_id(choice.id))?;
        }

        debug!(poll_id = id, choices = choices.len(), votes = votes.len(), "Deleted poll");
        Ok(true)
    }

    // ========== Choices ==========

    /// Insert or replace a choice.
    pub fn put_choice(&self, choice: &Choice) -> Result<()> {
        put(&self.choices, choice)
    }

    /// Get a choice by id.
    pub fn get_choice(&self, id: u64) -> Result<Option<Choice>> {
        get(&self.choices, id)
    }

    /// Choices of a poll in creation order.
    pub fn choices_for_poll(&self, poll_id: u64) -> Result<Vec<Choice>> {
        let mut choices: Vec<Choice> = scan(&self.choices)?;
        choices.retain(|c| c.poll_id == poll_id);
        Ok(choices)
    }

    /// Delete a choice together with its votes.
    ///
    /// Returns false if the choice did not exist.
    pub fn delete_choice(&self, id: u64) -> Result<bool> {
        if self.choices.remove(encode_id(id))?.is_none() {
            return Ok(false);
        }

        let mut removed = 0;
        for vote in scan::<Vote>(&self.votes)? {
            if vote.choice_id == id {
                self.remove_vote(&vote)?;
                removed += 1;
            }
        }

        debug!(choice_id = id, votes = removed, "Deleted choice");
        Ok(true)
    }

    // ========== Votes ==========

    /// Record a vote unless its user already voted on the poll.
    ///
    /// The ballot entry and the vote are written in one transaction.
    /// Returns false, writing nothing, if a ballot already exists.
    pub fn cast_vote(&self, vote: &Vote) -> Result<bool> {
        let ballot = ballot_key(vote.poll_id, &vote.user);
        let id = encode_id(vote.id);
        let bytes = vote.to_bytes()?;

        let result: std::result::Result<bool, TransactionError<()>> =
            (&self.votes, &self.ballots).transaction(|(votes, ballots)| {
                if ballots.get(&ballot)?.is_some() {
                    return Ok(false);
                }
                ballots.insert(ballot.as_slice(), &id[..])?;
                votes.insert(&id[..], bytes.as_slice())?;
                Ok(true)
            });

        match result {
            Ok(cast) => Ok(cast),
            Err(TransactionError::Abort(())) => Ok(false),
            Err(TransactionError::Storage(e)) => Err(Error::Storage(e)),
        }
    }

    fn remove_vote(&self, vote: &Vote) -> Result<()> {
        self.votes.remove(encode_id(vote.id))?;
        self.ballots.remove(ballot_key(vote.poll_id, &vote.user))?;
        Ok(())
    }

    /// All votes in id order.
    pub fn all_votes(&self) -> Result<Vec<Vote>> {
        scan(&self.votes)
    }

    /// All votes cast on a poll.
    pub fn votes_for_poll(&self, poll_id: u64) -> Result<Vec<Vote>> {
        let mut votes: Vec<Vote> = scan(&self.votes)?;
        votes.retain(|v| v.poll_id == poll_id);
        Ok(votes)
    }

    /// Check if a user has voted on a poll.
    pub fn has_voted(&self, user: &str, poll_id: u64) -> Result<bool> {
        Ok(self.ballots.contains_key(ballot_key(poll_id, user))?)
    }

    // ========== Genres ==========

    /// Insert or replace a genre.
    pub fn put_genre(&self, genre: &Genre) -> Result<()> {
        put(&self.genres, genre)
    }

    /// Get a genre by id.
    pub fn get_genre(&self, id: u64) -> Result<Option<Genre>> {
        get(&self.genres, id)
    }

    /// All genres in id order.
    pub fn all_genres(&self) -> Result<Vec<Genre>> {
        scan(&self.genres)
    }

    /// Remove the given genres.
    pub fn delete_genres(&self, ids: &[u64]) -> Result<()> {
        for id in ids {
            self.genres.remove(encode_id(*id))?;
        }
        debug!(genres = ids.len(), "Deleted genres");
        Ok(())
    }

    // ========== Sample data ==========

    /// Insert or replace a sample data row.
    pub fn put_sample_data(&self, row: &SampleData) -> Result<()> {
        put(&self.sample_data, row)
    }

    /// Get a sample data row by primary key.
    pub fn get_sample_data(&self, pk_id: u64) -> Result<Option<SampleData>> {
        get(&self.sample_data, pk_id)
    }

    /// Insert or replace a sample tree node.
    pub fn put_sample_node(&self, node: &SampleNode) -> Result<()> {
        put(&self.sample_nodes, node)
    }

    /// Get a sample tree node by id.
    pub fn get_sample_node(&self, id: u64) -> Result<Option<SampleNode>> {
        get(&self.sample_nodes, id)
    }

    /// All sample tree nodes in id order.
    pub fn all_sample_nodes(&self) -> Result<Vec<SampleNode>> {
        scan(&self.sample_nodes)
    }
}

fn ballot_key(poll_id: u64, user: &str) -> Vec<u8> {
    let mut key = encode_id(poll_id).to_vec();
    key.extend_from_slice(user.as_bytes());
    key
}

fn put<R: StoredRecord>(tree: &Tree, record: &R) -> Result<()> {
    tree.insert(encode_id(record.id()), record.to_bytes()?)?;
    Ok(())
}

fn get<R: StoredRecord>(tree: &Tree, id: u64) -> Result<Option<R>> {
    match tree.get(encode_id(id))? {
        Some(bytes) => Ok(Some(R::from_bytes(&bytes)?)),
        None => Ok(None),
    }
}

fn scan<R: StoredRecord>(tree: &Tree) -> Result<Vec<R>> {
    tree.iter()
        .values()
        .map(|value| R::from_bytes(&value?))
        .collect()
}
