//! Vote tallies.

use crate::model::{Choice, Poll, Vote};
use rand::seq::SliceRandom;
use serde::Serialize;

/// Display classes a result row may be rendered with.
pub const ALERT_CLASSES: [&str; 7] = [
    "primary",
    "secondary",
    "success",
    "danger",
    "dark",
    "warning",
    "info",
];

/// Tally of one choice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceResult {
    pub choice_id: u64,
    pub text: String,
    pub num_votes: usize,
    /// Share of all votes on the poll, 0 to 100.
    pub percentage: f64,
    /// Randomly picked from [`ALERT_CLASSES`].
    pub alert_class: String,
}

/// Tally of a whole poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollResults {
    pub poll: Poll,
    pub total_votes: usize,
    pub choices: Vec<ChoiceResult>,
}

impl PollResults {
    /// Count votes per choice. Percentages are 0 when nobody has voted.
    pub fn tally(poll: Poll, choices: &[Choice], votes: &[Vote]) -> Self {
        let total_votes = votes.len();
        let mut rng = rand::thread_rng();

        let choices = choices
            .iter()
            .map(|choice| {
                let num_votes = votes.iter().filter(|v| v.choice_id == choice.id).count();
                let percentage = if total_votes == 0 {
                    0.0
                } else {
                    num_votes as f64 / total_votes as f64 * 100.0
                };
                ChoiceResult {
                    choice_id: choice.id,
                    text: choice.choice_text.clone(),
                    num_votes,
                    percentage,
                    alert_class: ALERT_CLASSES
                        .choose(&mut rng)
                        .copied()
                        .unwrap_or("primary")
                        .to_string(),
                }
            })
            .collect();

        Self {
            poll,
            total_votes,
            choices,
        }
    }
}
