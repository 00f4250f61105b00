pub mod referrals;
pub mod waitlist;
