/// Placeholder some clients send when no referrer was captured.
pub const UNDEFINED_REFERRER: &str = "undefined";

/// Columns of the signup table, in storage order.
pub const SIGNUP_COLUMNS: [&str; 9] = [
    "timestamp",
    "first_name",
    "last_name",
    "email",
    "portfolio_size",
    "company_size",
    "country",
    "referral_code",
    "referred_by",
];

/// One waitlist entrant as stored. Records are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignupRecord {
    pub timestamp: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub portfolio_size: String,
    pub company_size: String,
    pub country: String,
    pub referral_code: String,
    pub referred_by: String,
}

impl SignupRecord {
    /// Field values in `SIGNUP_COLUMNS` order.
    pub fn columns(&self) -> [&str; 9] {
        [
            &self.timestamp,
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.portfolio_size,
            &self.company_size,
            &self.country,
            &self.referral_code,
            &self.referred_by,
        ]
    }

    pub fn normalized_email(&self) -> String {
        normalize_email(&self.email)
    }

    /// The code of whoever referred this entrant, if any.
    pub fn referrer_code(&self) -> Option<&str> {
        referral_code_value(&self.referred_by)
    }

    /// This entrant's own shareable code, if one was assigned.
    pub fn own_code(&self) -> Option<&str> {
        let code = self.referral_code.trim();
        (!code.is_empty()).then_some(code)
    }

    pub fn last_initial(&self) -> String {
        first_char(&self.last_name)
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trims a `referredBy` value and discards the empty and `"undefined"` forms.
pub fn referral_code_value(raw: &str) -> Option<&str> {
    let code = raw.trim();
    if code.is_empty() || code == UNDEFINED_REFERRER {
        None
    } else {
        Some(code)
    }
}

pub(crate) fn first_char(value: &str) -> String {
    value.chars().next().map(String::from).unwrap_or_default()
}
