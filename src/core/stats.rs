//! Streak and statistics derivation from already-fetched challenge records.
//!
//! Mirrors the backend's accounting so the dashboard still shows correct
//! numbers when the stats endpoint is unavailable: a challenge counts toward
//! the streak only when its first attempt completed it on the challenge's
//! own date, and a streak is a run of consecutive such dates.

use chrono::{Datelike, Days, NaiveDate};

use crate::core::challenges::{
    Challenge, ChallengeStats, ChallengeStatus, Difficulty, DifficultyCount,
};

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Dates that count toward a streak, most recent first, deduplicated.
fn streak_dates(challenges: &[Challenge]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = challenges
        .iter()
        .filter_map(|c| {
            let first = c.attempts.iter().min_by_key(|a| a.attempt_number)?;
            if first.status != ChallengeStatus::Completed {
                return None;
            }
            let challenge_date = parse_date(&c.date)?;
            let attempt_date = parse_date(&first.date)?;
            (attempt_date == challenge_date).then_some(challenge_date)
        })
        .collect();
    dates.sort_unstable_by(|a, b| b.cmp(a));
    dates.dedup();
    dates
}

fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let Some(&most_recent) = dates.first() else {
        return 0;
    };
    let yesterday = today - Days::new(1);
    if most_recent != today && most_recent != yesterday {
        return 0;
    }
    let mut streak = 1u32;
    let mut expected = most_recent - Days::new(1);
    for &d in &dates[1..] {
        if d == expected {
            streak += 1;
            expected = expected - Days::new(1);
        } else {
            break;
        }
    }
    streak
}

fn longest_streak(dates: &[NaiveDate]) -> u32 {
    if dates.is_empty() {
        return 0;
    }
    let mut longest = 1u32;
    let mut run = 1u32;
    for pair in dates.windows(2) {
        if pair[1] == pair[0] - Days::new(1) {
            run += 1;
        } else {
            longest = longest.max(run);
            run = 1;
        }
    }
    longest.max(run)
}

fn difficulty_count(challenges: &[Challenge], difficulty: Difficulty) -> DifficultyCount {
    let mut count = DifficultyCount::default();
    for c in challenges.iter().filter(|c| c.difficulty == difficulty) {
        count.total += 1;
        if c.status == ChallengeStatus::Completed {
            count.solved += 1;
        }
    }
    count
}

/// Derive user statistics from a challenge list, as of `today`.
pub fn derive_stats(challenges: &[Challenge], today: NaiveDate) -> ChallengeStats {
    let dates = streak_dates(challenges);
    let current = current_streak(&dates, today);
    let month_start = today.with_day0(0).unwrap_or(today);

    ChallengeStats {
        total_solved: challenges
            .iter()
            .filter(|c| c.status == ChallengeStatus::Completed)
            .count() as u32,
        total_attempted: challenges
            .iter()
            .filter(|c| !c.attempts.is_empty())
            .count() as u32,
        attempting: challenges
            .iter()
            .filter(|c| c.status == ChallengeStatus::Pending && !c.attempts.is_empty())
            .count() as u32,
        easy: difficulty_count(challenges, Difficulty::Easy),
        medium: difficulty_count(challenges, Difficulty::Medium),
        hard: difficulty_count(challenges, Difficulty::Hard),
        current_streak: current,
        // The streak running right now counts toward the record too.
        longest_streak: longest_streak(&dates).max(current),
        monthly_attempts: challenges
            .iter()
            .filter(|c| {
                c.attempts
                    .iter()
                    .any(|a| parse_date(&a.date).is_some_and(|d| d >= month_start && d <= today))
            })
            .count() as u32,
    }
}
