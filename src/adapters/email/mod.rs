pub mod fallback;
pub mod resend;
