//! pollme polls - Poll, choice and vote storage and services.
//!
//! Also holds the genre and sample-data hierarchies of the polls app.
//! Records live in sled trees and are encoded with rkyv. The `apps` module
//! describes every installed app to the schema reader.

pub mod apps;
pub mod error;
pub mod hierarchy;
pub mod model;
pub mod pagination;
pub mod results;
pub mod service;
pub mod store;
pub mod tree;

pub use apps::installed_apps;
pub use error::{Error, Result};
pub use hierarchy::{NewGenre, NewSampleNode, SampleTree};
pub use model::{Choice, Genre, Poll, SampleData, SampleNode, StoredRecord, Vote};
pub use pagination::{Page, POLLS_PER_PAGE, USER_POLLS_PER_PAGE};
pub use results::{ChoiceResult, PollResults, ALERT_CLASSES};
pub use service::{ChoiceInput, EditPoll, NewPoll, PollQuery, PollService, PollSummary, PollView};
pub use store::{PollStore, StoreConfig};
pub use tree::{TreeNode, TreeRecord};
