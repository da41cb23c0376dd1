use serde::{Deserialize, Serialize};

use crate::matches::repo::{MatchWithNames, Participant};

/// Response for `GET /match`: who the caller gives to, and whether this is
/// the first time they fetched it.
#[derive(Debug, Serialize)]
pub struct MatchReveal {
    #[serde(rename = "firstTime")]
    pub first_time: bool,
    pub recipient: Participant,
}

#[derive(Debug, Serialize)]
pub struct MatchEntry {
    pub id: i64,
    pub giver: Participant,
    pub receiver: Participant,
}

impl From<MatchWithNames> for MatchEntry {
    fn from(m: MatchWithNames) -> Self {
        Self {
            id: m.id,
            giver: Participant {
                id: m.giver_id,
                name: m.giver_name,
                email: m.giver_email,
            },
            receiver: Participant {
                id: m.receiver_id,
                name: m.receiver_name,
                email: m.receiver_email,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MatchListResponse {
    pub year: i64,
    pub matches: Vec<MatchEntry>,
}

/// One entry of the manual update endpoint's replacement list; snake_case
/// on the wire, unlike the rest of the API.
#[derive(Debug, Deserialize)]
pub struct MatchPair {
    pub giver_id: i64,
    pub receiver_id: i64,
}
