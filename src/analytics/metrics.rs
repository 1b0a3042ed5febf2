//! Metric extraction: raw matches to per-player aggregate snapshots.

use tracing::debug;

use crate::models::{MatchParticipantRecord, MetricSnapshot, RawMatch};

use super::AnalyticsError;

/// Extract per-match facts for one player from a batch of raw matches.
///
/// Matches the player did not take part in are skipped, never fatal to the
/// batch. Returned records preserve the input match order.
pub fn extract_records<'a, I>(matches: I, puuid: &str) -> Vec<MatchParticipantRecord>
where
    I: IntoIterator<Item = &'a RawMatch>,
{
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for raw in matches {
        match MatchParticipantRecord::from_match(raw, puuid) {
            Some(record) => records.push(record),
            None => {
                debug!(match_id = %raw.match_id, player = %puuid, "participant not found, skipping match");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        debug!(skipped, found = records.len(), "extraction skipped matches");
    }

    records
}

/// Compute an aggregate snapshot over a set of match records.
///
/// Ratios are computed from summed totals, not averaged per-match ratios, so
/// a 20-minute stomp and a 45-minute slugfest weigh by their actual length.
/// Deaths are floored at 1 for the KDA ratio. Zero records is an
/// `InsufficientSample` error, never a snapshot.
pub fn compute_snapshot(records: &[MatchParticipantRecord]) -> Result<MetricSnapshot, AnalyticsError> {
    if records.is_empty() {
        return Err(AnalyticsError::InsufficientSample {
            found: 0,
            required: 1,
        });
    }

    let mut kills = 0u64;
    let mut deaths = 0u64;
    let mut assists = 0u64;
    let mut creep_score = 0u64;
    let mut gold = 0u64;
    let mut duration_seconds = 0u64;
    let mut damage_share_sum = 0.0f64;
    let mut vision_sum = 0u64;
    let mut wins = 0u64;

    for record in records {
        kills += record.kills as u64;
        deaths += record.deaths as u64;
        assists += record.assists as u64;
        creep_score += record.creep_score as u64;
        gold += record.gold_earned as u64;
        duration_seconds += record.game_duration_seconds as u64;
        damage_share_sum += record.damage_share;
        vision_sum += record.vision_score as u64;
        if record.win {
            wins += 1;
        }
    }

    let sample_size = records.len() as u64;
    let minutes = duration_seconds as f64 / 60.0;

    let (cs_per_minute, gold_per_minute) = if duration_seconds > 0 {
        (creep_score as f64 / minutes, gold as f64 / minutes)
    } else {
        (0.0, 0.0)
    };

    Ok(MetricSnapshot {
        average_kda: (kills + assists) as f64 / deaths.max(1) as f64,
        cs_per_minute,
        gold_per_minute,
        damage_share: damage_share_sum / sample_size as f64,
        vision_score: vision_sum as f64 / sample_size as f64,
        win_rate: wins as f64 / sample_size as f64,
        sample_size: sample_size as u32,
    })
}

/// Extract and aggregate in one step.
pub fn snapshot_for_player<'a, I>(matches: I, puuid: &str) -> Result<MetricSnapshot, AnalyticsError>
where
    I: IntoIterator<Item = &'a RawMatch>,
{
    compute_snapshot(&extract_records(matches, puuid))
}
