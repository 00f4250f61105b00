use serde::Serialize;

/// Owner of a referral code, as shown on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferrerIdentity {
    pub first_name: String,
    pub last_name: String,
    pub timestamp: String,
}

/// One leaderboard row. Derived per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub initials: String,
    pub name: String,
    pub joined: String,
    pub referrals: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
    /// Sum of all referral counts, including codes with no known owner.
    pub total_referrals: usize,
    pub total_signups: usize,
}

/// Referral count and dense rank for a single code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReferralStats {
    pub count: usize,
    pub rank: usize,
}
