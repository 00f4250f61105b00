pub mod leaderboard;
pub mod signup;
