//! Poll operations on top of the store.
//!
//! Users are identified by username. Authenticating them is left to the
//! caller.

use crate::error::{Error, Result};
use crate::model::{current_timestamp, Choice, Poll, Vote};
use crate::pagination::{Page, POLLS_PER_PAGE, USER_POLLS_PER_PAGE};
use crate::results::PollResults;
use crate::store::{PollStore, StoreConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

/// Listing parameters. Sort flags only need to be present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PollQuery {
    /// Case-insensitive substring filter on the poll text.
    pub search: Option<String>,
    /// Sort by text.
    pub name: Option<String>,
    /// Sort by publication date.
    pub date: Option<String>,
    /// Sort by ascending vote count.
    pub vote: Option<String>,
    /// Requested page, parsed leniently.
    pub page: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortKey {
    Created,
    Text,
    PubDate,
    VoteCount,
}

impl PollQuery {
    /// The effective ordering. Later flags override earlier ones in the
    /// order name, date, vote.
    fn sort_key(&self) -> SortKey {
        if self.vote.is_some() {
            SortKey::VoteCount
        } else if self.date.is_some() {
            SortKey::PubDate
        } else if self.name.is_some() {
            SortKey::Text
        } else {
            SortKey::Created
        }
    }
}

/// A poll with its vote count, as shown in listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollSummary {
    #[serde(flatten)]
    pub poll: Poll,
    pub vote_count: usize,
}

/// Input for creating a poll with its first two choices.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPoll {
    pub text: String,
    pub choice1: String,
    pub choice2: String,
}

/// Input for editing a poll.
#[derive(Debug, Clone, Deserialize)]
pub struct EditPoll {
    pub text: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Input for adding or editing a choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceInput {
    pub choice_text: String,
}

/// What a poll page shows: the ballot while open, the results once ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum PollView {
    Ballot { poll: Poll, choices: Vec<Choice> },
    Results(PollResults),
}

/// Poll operations.
pub struct PollService {
    store: PollStore,
}

impl PollService {
    /// Create a service over an open store.
    pub fn new(store: PollStore) -> Self {
        Self { store }
    }

    /// Open a store and create a service over it.
    pub fn open(config: StoreConfig) -> Result<Self> {
        Ok(Self::new(PollStore::open(config)?))
    }

    /// The underlying store.
    pub fn store(&self) -> &PollStore {
        &self.store
    }

    /// List all polls, filtered, sorted and paginated.
    pub fn list_polls(&self, query: &PollQuery) -> Result<Page<PollSummary>> {
        let mut polls = self.summaries(self.store.all_polls()?)?;

        match query.sort_key() {
            SortKey::Created => {}
            SortKey::Text => polls.sort_by(|a, b| a.poll.text.cmp(&b.poll.text)),
            SortKey::PubDate => polls.sort_by_key(|s| s.poll.pub_date),
            SortKey::VoteCount => polls.sort_by_key(|s| s.vote_count),
        }

        if let Some(term) = &query.search {
            let term = term.to_lowercase();
            polls.retain(|s| s.poll.text.to_lowercase().contains(&term));
        }

        Ok(Page::of(polls, POLLS_PER_PAGE, query.page.as_deref()))
    }

    /// List the polls owned by a user.
    pub fn list_by_user(&self, owner: &str, page: Option<&str>) -> Result<Page<PollSummary>> {
        let mut polls = self.store.all_polls()?;
        polls.retain(|p| p.owner == owner);
        Ok(Page::of(self.summaries(polls)?, USER_POLLS_PER_PAGE, page))
    }

    fn summaries(&self, polls: Vec<Poll>) -> Result<Vec<PollSummary>> {
        let mut counts: HashMap<u64, usize> = HashMap::new();
        for vote in self.store.all_votes()? {
            *counts.entry(vote.poll_id).or_default() += 1;
        }

        Ok(polls
            .into_iter()
            .map(|poll| PollSummary {
                vote_count: counts.get(&poll.id).copied().unwrap_or(0),
                poll,
            })
            .collect())
    }

    /// Create an active poll with two choices.
    pub fn create_poll(&self, owner: &str, input: NewPoll) -> Result<Poll> {
        let text = required("text", &input.text)?;
        let choice1 = required("choice1", &input.choice1)?;
        let choice2 = required("choice2", &input.choice2)?;

        let poll = Poll {
            id: self.store.generate_id()?,
            owner: owner.to_string(),
            text,
            pub_date: current_timestamp(),
            active: true,
        };
        self.store.put_poll(&poll)?;

        for choice_text in [choice1, choice2] {
            self.store.put_choice(&Choice {
                id: self.store.generate_id()?,
                poll_id: poll.id,
                choice_text,
            })?;
        }

        info!(poll_id = poll.id, owner = %owner, "Poll & choices added");
        Ok(poll)
    }

    /// Update a poll's text and active flag.
    pub fn edit_poll(&self, user: &str, poll_id: u64, input: EditPoll) -> Result<Poll> {
        let mut poll = self.owned_poll(user, poll_id)?;
        poll.text = required("text", &input.text)?;
        poll.active = input.active;
        self.store.put_poll(&poll)?;

        info!(poll_id, "Poll updated");
        Ok(poll)
    }

    /// Delete a poll with its choices and votes.
    pub fn delete_poll(&self, user: &str, poll_id: u64) -> Result<()> {
        self.owned_poll(user, poll_id)?;
        self.store.delete_poll(poll_id)?;

        info!(poll_id, "Poll deleted");
        Ok(())
    }

    /// Add a choice to a poll.
    pub fn add_choice(&self, user: &str, poll_id: u64, input: ChoiceInput) -> Result<Choice> {
        self.owned_poll(user, poll_id)?;
        let choice = Choice {
            id: self.store.generate_id()?,
            poll_id,
            choice_text: required("choice_text", &input.choice_text)?,
        };
        self.store.put_choice(&choice)?;

        info!(poll_id, choice_id = choice.id, "Choice added");
        Ok(choice)
    }

    /// Change a choice's text.
    pub fn edit_choice(&self, user: &str, choice_id: u64, input: ChoiceInput) -> Result<Choice> {
        let mut choice = self.get_choice(choice_id)?;
        self.owned_poll(user, choice.poll_id)?;
        choice.choice_text = required("choice_text", &input.choice_text)?;
        self.store.put_choice(&choice)?;

        info!(choice_id, "Choice updated");
        Ok(choice)
    }

    /// Delete a choice with its votes.
    pub fn delete_choice(&self, user: &str, choice_id: u64) -> Result<()> {
        let choice = self.get_choice(choice_id)?;
        self.owned_poll(user, choice.poll_id)?;
        self.store.delete_choice(choice_id)?;

        info!(choice_id, "Choice deleted");
        Ok(())
    }

    /// The ballot of an active poll, or the results of an ended one.
    pub fn poll_detail(&self, poll_id: u64) -> Result<PollView> {
        let poll = self.get_poll(poll_id)?;
        if !poll.active {
            return Ok(PollView::Results(self.tally(poll)?));
        }
        let choices = self.store.choices_for_poll(poll_id)?;
        Ok(PollView::Ballot { poll, choices })
    }

    /// Check that a user has not voted on the poll yet.
    pub fn user_can_vote(&self, user: &str, poll_id: u64) -> Result<bool> {
        self.get_poll(poll_id)?;
        Ok(!self.store.has_voted(user, poll_id)?)
    }

    /// Cast a vote and return the updated results.
    pub fn vote(&self, user: &str, poll_id: u64, choice_id: Option<u64>) -> Result<PollResults> {
        let poll = self.get_poll(poll_id)?;

        if !poll.active {
            warn!(poll_id, user = %user, "Vote on ended poll");
            return Err(Error::PollClosed(poll_id));
        }
        if self.store.has_voted(user, poll_id)? {
            warn!(poll_id, user = %user, "You already voted this poll");
            return Err(Error::AlreadyVoted {
                user: user.to_string(),
                poll_id,
            });
        }
        let Some(choice_id) = choice_id else {
            warn!(poll_id, user = %user, "No choice selected");
            return Err(Error::NoChoiceSelected);
        };

        let choice = self.get_choice(choice_id)?;
        if choice.poll_id != poll_id {
            warn!(poll_id, choice_id, "Choice belongs to another poll");
            return Err(Error::ChoiceNotInPoll { choice_id, poll_id });
        }

        let vote = Vote {
            id: self.store.generate_id()?,
            user: user.to_string(),
            poll_id,
            choice_id,
        };
        if !self.store.cast_vote(&vote)? {
            warn!(poll_id, user = %user, "You already voted this poll");
            return Err(Error::AlreadyVoted {
                user: user.to_string(),
                poll_id,
            });
        }

        info!(poll_id, choice_id, user = %user, "Vote recorded");
        self.tally(poll)
    }

    /// Stop a poll from accepting votes and return its results.
    pub fn end_poll(&self, user: &str, poll_id: u64) -> Result<PollResults> {
        let mut poll = self.owned_poll(user, poll_id)?;
        if poll.active {
            poll.active = false;
            self.store.put_poll(&poll)?;
            info!(poll_id, "Poll ended");
        }
        self.tally(poll)
    }

    /// Current results of a poll.
    pub fn results(&self, poll_id: u64) -> Result<PollResults> {
        let poll = self.get_poll(poll_id)?;
        self.tally(poll)
    }

    fn tally(&self, poll: Poll) -> Result<PollResults> {
        let choices = self.store.choices_for_poll(poll.id)?;
        let votes = self.store.votes_for_poll(poll.id)?;
        Ok(PollResults::tally(poll, &choices, &votes))
    }

    fn get_poll(&self, poll_id: u64) -> Result<Poll> {
        self.store
            .get_poll(poll_id)?
            .ok_or(Error::PollNotFound(poll_id))
    }

    fn get_choice(&self, choice_id: u64) -> Result<Choice> {
        self.store
            .get_choice(choice_id)?
            .ok_or(Error::ChoiceNotFound(choice_id))
    }

    fn owned_poll(&self, user: &str, poll_id: u64) -> Result<Poll> {
        let poll = self.get_poll(poll_id)?;
        if poll.owner != user {
            return Err(Error::NotOwner {
                user: user.to_string(),
                poll_id,
            });
        }
        Ok(poll)
    }
}

pub(crate) fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}
