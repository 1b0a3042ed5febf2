//! Raw match records and the per-player facts extracted from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PositionalEvent;

/// One participant's line in a raw match record, as supplied by the
/// match-history provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawParticipant {
    /// Stable player identifier (PUUID).
    pub puuid: String,

    /// Team the participant played on (100 = blue, 200 = red).
    pub team_id: u16,

    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,

    /// Lane minions killed.
    pub total_minions_killed: u32,

    /// Jungle monsters killed.
    pub neutral_minions_killed: u32,

    pub gold_earned: u32,

    /// Total damage dealt to champions.
    pub damage_dealt: u32,

    pub vision_score: u32,

    pub win: bool,

    /// Ward placements by this participant, world-space coordinates.
    #[serde(default)]
    pub ward_events: Vec<PositionalEvent>,
}

impl RawParticipant {
    /// Total creep score: lane minions plus jungle monsters.
    pub fn creep_score(&self) -> u32 {
        self.total_minions_killed + self.neutral_minions_killed
    }
}

/// A raw match as supplied by the match-history provider. Read-only input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMatch {
    pub match_id: String,

    /// Game start time.
    pub game_start: DateTime<Utc>,

    /// Game length in seconds.
    pub game_duration_seconds: u32,

    pub participants: Vec<RawParticipant>,
}

impl RawMatch {
    /// Find the participant entry for a player, if present.
    pub fn participant(&self, puuid: &str) -> Option<&RawParticipant> {
        self.participants.iter().find(|p| p.puuid == puuid)
    }

    /// Total damage dealt to champions by one team.
    pub fn team_damage(&self, team_id: u16) -> u64 {
        self.participants
            .iter()
            .filter(|p| p.team_id == team_id)
            .map(|p| p.damage_dealt as u64)
            .sum()
    }
}

/// Immutable fact extracted from one match for one player.
///
/// Produced once per ingested match and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchParticipantRecord {
    pub match_id: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub creep_score: u32,
    pub gold_earned: u32,
    pub damage_dealt: u32,

    /// Player's share of their team's damage to champions (0.0 to 1.0).
    pub damage_share: f64,

    pub vision_score: u32,
    pub game_duration_seconds: u32,
    pub timestamp: DateTime<Utc>,
    pub win: bool,
}

impl MatchParticipantRecord {
    /// Extract the fact for one player from a raw match.
    ///
    /// Returns `None` when the player did not take part in the match.
    pub fn from_match(raw: &RawMatch, puuid: &str) -> Option<Self> {
        let participant = raw.participant(puuid)?;

        let team_damage = raw.team_damage(participant.team_id);
        let damage_share = if team_damage > 0 {
            participant.damage_dealt as f64 / team_damage as f64
        } else {
            0.0
        };

        Some(Self {
            match_id: raw.match_id.clone(),
            kills: participant.kills,
            deaths: participant.deaths,
            assists: participant.assists,
            creep_score: participant.creep_score(),
            gold_earned: participant.gold_earned,
            damage_dealt: participant.damage_dealt,
            damage_share,
            vision_score: participant.vision_score,
            game_duration_seconds: raw.game_duration_seconds,
            timestamp: raw.game_start,
            win: participant.win,
        })
    }

    /// Single-match KDA with the deaths floor of 1.
    pub fn kda(&self) -> f64 {
        (self.kills + self.assists) as f64 / self.deaths.max(1) as f64
    }
}
