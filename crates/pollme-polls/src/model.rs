//! Stored records of the poll application.

use crate::error::{Error, Result};
use rkyv::util::AlignedVec;
use serde::{Deserialize, Serialize};

/// A poll owned by a user.
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize,
)]
pub struct Poll {
    /// Poll id.
    pub id: u64,

    /// Username of the owner.
    pub owner: String,

    /// Question text.
    pub text: String,

    /// Publication timestamp in microseconds since Unix epoch.
    pub pub_date: u64,

    /// Whether the poll still accepts votes.
    pub active: bool,
}

/// One answer option of a poll.
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize,
)]
pub struct Choice {
    pub id: u64,
    pub poll_id: u64,
    pub choice_text: String,
}

/// A user's vote for a choice.
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize,
)]
pub struct Vote {
    pub id: u64,
    pub user: String,
    pub poll_id: u64,
    pub choice_id: u64,
}

/// A node of the genre hierarchy. Names are unique.
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize,
)]
pub struct Genre {
    pub id: u64,
    pub name: String,
    /// Parent genre; roots have none.
    pub parent_id: Option<u64>,
}

/// One row of sample pricing data.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Serialize,
    Deserialize,
    rkyv::Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
)]
#[serde(default)]
pub struct SampleData {
    pub pk_id: u64,
    pub product_id: Option<i64>,
    pub market_id: Option<i64>,
    pub ppg: Option<String>,
    pub retailer: Option<String>,
    pub nsv_cal: Option<f64>,
    pub list_price_cal: Option<f64>,
    pub list_price_cal_new: Option<f64>,
    pub list_price_cal_per_change_ip: Option<f64>,
    pub base_price_cal: Option<f64>,
    pub base_price_cal_new: Option<f64>,
    pub base_price_cal_per_change_ip: Option<f64>,
    pub aup_cal: Option<f64>,
    pub aup_cal_new: Option<f64>,
}

/// A node of the sample-data hierarchy, optionally pointing at a data row.
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize,
)]
pub struct SampleNode {
    pub id: u64,
    /// The `SampleData` row shown for this node.
    pub datarow: Option<u64>,
    pub parent_id: Option<u64>,
}

/// A record kept in its own sled tree, keyed by id.
pub trait StoredRecord: Sized {
    /// Name of the sled tree holding this record type.
    const TREE: &'static str;

    /// Record id.
    fn id(&self) -> u64;

    /// Serialize the record to bytes using rkyv.
    fn to_bytes(&self) -> Result<Vec<u8>>;

    /// Deserialize a record from bytes using rkyv.
    fn from_bytes(bytes: &[u8]) -> Result<Self>;
}

macro_rules! stored_record {
    ($ty:ty, $tree:literal) => {
        stored_record!($ty, $tree, id);
    };
    ($ty:ty, $tree:literal, $id:ident) => {
        impl StoredRecord for $ty {
            const TREE: &'static str = $tree;

            fn id(&self) -> u64 {
                self.$id
            }

            fn to_bytes(&self) -> Result<Vec<u8>> {
                rkyv::to_bytes::<rkyv::rancor::Error>(self)
                    .map(|v| v.to_vec())
                    .map_err(|e| Error::Serialization(e.to_string()))
            }

            fn from_bytes(bytes: &[u8]) -> Result<Self> {
                // sled values carry no alignment guarantee
                let mut aligned = AlignedVec::<16>::with_capacity(bytes.len());
                aligned.extend_from_slice(bytes);
                rkyv::from_bytes::<Self, rkyv::rancor::Error>(&aligned)
                    .map_err(|e| Error::Deserialization(e.to_string()))
            }
        }
    };
}

stored_record!(Poll, "polls");
stored_record!(Choice, "choices");
stored_record!(Vote, "votes");
stored_record!(Genre, "genres");
stored_record!(SampleData, "sample_data", pk_id);
stored_record!(SampleNode, "sample_nodes");

/// Encode a record id as a tree key.
pub(crate) fn encode_id(id: u64) -> [u8; 8] {
    id.to_be_bytes()
}

/// Current time in microseconds since Unix epoch.
pub fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or_default()
}
