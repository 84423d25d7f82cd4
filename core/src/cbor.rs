// SPDX-License-Identifier: MIT OR Apache-2.0

//! CBOR serialization helpers for sessions and score collections
//!
//! This module provides functions for serializing and deserializing
//! game sessions and the score file using the Concise Binary Object
//! Representation (CBOR).

use crate::{GameSession, ScoreRecord};
use serde::{Deserialize, Serialize};

/// Current layout version of the score file
pub const SCORE_FILE_VERSION: u8 = 1;

/// On-disk layout of the score collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreFile {
    pub version: u8,
    pub scores: Vec<ScoreRecord>,
}

/// Serialize a session to CBOR
pub fn serialize_session(session: &GameSession) -> Vec<u8> {
    match serde_cbor::to_vec(session) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!("Failed to serialize game session: {}", err);
            Vec::new()
        }
    }
}

/// Deserialize a session from CBOR
pub fn deserialize_session(data: &[u8]) -> Option<GameSession> {
    if data.is_empty() {
        return None;
    }

    match serde_cbor::from_slice(data) {
        Ok(session) => Some(session),
        Err(err) => {
            tracing::error!("Failed to deserialize game session: {}", err);
            None
        }
    }
}

/// Encode the score collection
pub fn encode_scores(scores: &[ScoreRecord]) -> Result<Vec<u8>, serde_cbor::Error> {
    serde_cbor::to_vec(&ScoreFile {
        version: SCORE_FILE_VERSION,
        scores: scores.to_vec(),
    })
}

/// Decode the score collection. Empty input is an empty collection.
pub fn decode_scores(data: &[u8]) -> Result<Vec<ScoreRecord>, serde_cbor::Error> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    let file: ScoreFile = serde_cbor::from_slice(data)?;
    if file.version != SCORE_FILE_VERSION {
        tracing::warn!(
            "Score file version {} differs from {}, reading anyway",
            file.version,
            SCORE_FILE_VERSION
        );
    }
    Ok(file.scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArticleIdentifier, NavigationEvent};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_session_survives_mid_round() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut session = GameSession::new(
            ArticleIdentifier::from_title("Haifa"),
            ArticleIdentifier::from_title("Israel"),
            t,
        );
        session.process_navigation(&NavigationEvent::new("/wiki/Haifa")).unwrap();
        session.process_navigation(&NavigationEvent::new("/wiki/Carmel")).unwrap();

        let restored = deserialize_session(&serialize_session(&session)).unwrap();
        assert_eq!(restored, session);

        // The restored copy keeps suppressing the duplicate callback
        let mut restored = restored;
        restored.process_navigation(&NavigationEvent::new("/wiki/Carmel")).unwrap();
        assert_eq!(restored.page_visit_count(), 2);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(deserialize_session(&[]).is_none());
        assert!(deserialize_session(&[0xff, 0x00, 0x13]).is_none());
        assert!(decode_scores(&[0xff, 0x00, 0x13]).is_err());
        assert!(decode_scores(&[]).unwrap().is_empty());
    }
}
