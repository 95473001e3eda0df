//! Fixed candidate list shown when the data source cannot be reached.

use crate::protocol::{CandidateRecord, VoteBuckets};

pub fn fallback_candidates() -> Vec<CandidateRecord> {
    vec![
        CandidateRecord {
            id: 1,
            name: "VIPIN KUMAR SINGH".to_string(),
            flat: "1725".to_string(),
            total_count: 14,
            total_value: 25.41,
            votes: VoteBuckets::from_counts([0, 0, 0, 0, 14]),
            rank: 1,
        },
        CandidateRecord {
            id: 2,
            name: "KAVITA GUPTA".to_string(),
            flat: "2430".to_string(),
            total_count: 15,
            total_value: 24.34,
            votes: VoteBuckets::from_counts([0, 4, 0, 0, 11]),
            rank: 2,
        },
    ]
}
