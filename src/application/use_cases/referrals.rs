//! Referral counting, dense ranking and leaderboard assembly.
//!
//! Everything here is a pure function over the full record set. Nothing is
//! cached between calls: each call rebuilds its typed mappings from scratch.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

use crate::domain::entities::{
    leaderboard::{Leaderboard, LeaderboardEntry, ReferralStats, ReferrerIdentity},
    signup::{SignupRecord, first_char, referral_code_value},
};

/// Number of rows returned by the public leaderboard.
pub const LEADERBOARD_SIZE: usize = 10;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Referral counts keyed by the referring code, in first-seen order.
#[derive(Debug, Default, Clone)]
pub struct ReferralCounts {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl ReferralCounts {
    pub fn from_records(records: &[SignupRecord]) -> Self {
        let mut counts = Self::default();
        for code in records.iter().filter_map(SignupRecord::referrer_code) {
            counts.bump(code);
        }
        counts
    }

    fn bump(&mut self, code: &str) {
        match self.counts.get_mut(code) {
            Some(count) => *count += 1,
            None => {
                self.order.push(code.to_string());
                self.counts.insert(code.to_string(), 1);
            }
        }
    }

    pub fn get(&self, code: &str) -> usize {
        referral_code_value(code)
            .and_then(|code| self.counts.get(code).copied())
            .unwrap_or(0)
    }

    /// `1 + number of codes with a strictly greater count`. Equal counts share
    /// a rank, and a code nobody used ranks after every code that was used.
    pub fn rank(&self, code: &str) -> usize {
        let mine = self.get(code);
        1 + self.counts.values().filter(|&&count| count > mine).count()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.order
            .iter()
            .map(|code| (code.as_str(), self.counts[code]))
    }
}

/// Referral count and dense rank of `code` among every code that referred at
/// least one signup.
pub fn referral_stats(records: &[SignupRecord], code: &str) -> ReferralStats {
    let counts = ReferralCounts::from_records(records);
    ReferralStats {
        count: counts.get(code),
        rank: counts.rank(code),
    }
}

/// Owner lookup used for notifications: the first record claiming the code.
pub fn find_referrer<'a>(records: &'a [SignupRecord], code: &str) -> Option<&'a SignupRecord> {
    let code = referral_code_value(code)?;
    records.iter().find(|r| r.own_code() == Some(code))
}

/// Code → owner mapping for the leaderboard. When several records claim the
/// same code the last one wins.
pub fn referrer_identities(records: &[SignupRecord]) -> HashMap<String, ReferrerIdentity> {
    let mut identities = HashMap::new();
    for record in records {
        let Some(code) = record.own_code() else {
            continue;
        };
        let identity = ReferrerIdentity {
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            timestamp: record.timestamp.clone(),
        };
        if identities.insert(code.to_string(), identity).is_some() {
            tracing::warn!(referral_code = %code, "Referral code claimed by more than one signup");
        }
    }
    identities
}

/// Top `limit` referrers by count, plus totals over the whole record set.
pub fn build_leaderboard(records: &[SignupRecord], limit: usize) -> Leaderboard {
    let identities = referrer_identities(records);
    let counts = ReferralCounts::from_records(records);

    let mut entries: Vec<LeaderboardEntry> = counts
        .iter()
        .filter_map(|(code, referrals)| {
            identities
                .get(code)
                .map(|identity| leaderboard_entry(identity, referrals))
        })
        .collect();

    // Stable sort: ties keep first-seen order.
    entries.sort_by(|a, b| b.referrals.cmp(&a.referrals));
    entries.truncate(limit);

    Leaderboard {
        entries,
        total_referrals: counts.total(),
        total_signups: records.len(),
    }
}

fn leaderboard_entry(identity: &ReferrerIdentity, referrals: usize) -> LeaderboardEntry {
    let first_initial = first_char(&identity.first_name);
    let last_initial = first_char(&identity.last_name);
    LeaderboardEntry {
        initials: format!("{first_initial}{last_initial}").to_uppercase(),
        name: format!("{} {}.", identity.first_name, last_initial),
        joined: joined_label(&identity.timestamp),
        referrals,
    }
}

/// `"Joined Mon D"` in UTC, or just `"Joined"` when the timestamp can't be read.
pub fn joined_label(timestamp: &str) -> String {
    match parse_timestamp(timestamp) {
        Some(at) => {
            let date = at.date_naive();
            format!(
                "Joined {} {}",
                MONTHS[date.month0() as usize],
                date.day()
            )
        }
        None => "Joined".to_string(),
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(at.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
}
