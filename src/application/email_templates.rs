use url::Url;
use v_htmlescape::escape;

/// Top-N cutoff promised in the referral notification copy.
const TOP_TIER: usize = 5;

/// Branding and links baked into every outgoing email. URLs are trusted
/// configuration and inserted unescaped; user-supplied text is escaped.
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub brand_name: String,
    pub site_url: Url,
    pub support_email: String,
    pub logo_url: String,
}

impl NotificationConfig {
    pub fn referral_link(&self, referral_code: &str) -> String {
        let mut url = self.site_url.clone();
        url.query_pairs_mut().clear().append_pair("ref", referral_code);
        url.to_string()
    }

    pub fn leaderboard_link(&self) -> String {
        let mut url = self.site_url.clone();
        url.set_fragment(Some("leaderboard"));
        url.to_string()
    }

    fn site_label(&self) -> String {
        self.site_url
            .host_str()
            .map(|host| host.to_string())
            .unwrap_or_else(|| self.site_url.to_string())
    }
}

pub fn primary_button(url: &str, label: &str) -> String {
    format!(
        r#"<table width="100%" cellpadding="0" cellspacing="0" border="0"><tr><td align="center" style="padding:0 0 24px 0;"><a href="{url}" style="display:inline-block;background-color:#184c3c;color:#ffffff;padding:14px 40px;border-radius:8px;text-decoration:none;font-size:16px;font-weight:600;">{label}</a></td></tr></table>"#
    )
}

fn paragraph(html: &str) -> String {
    format!(r#"<p style="color:#414346;font-size:16px;line-height:1.6;margin:0 0 16px 0;">{html}</p>"#)
}

/// Sent to every new entrant.
pub fn welcome_email(
    config: &NotificationConfig,
    first_name: &str,
    referral_code: &str,
) -> (String, String) {
    let subject = format!(
        "Welcome to the {} waitlist, {}!",
        config.brand_name, first_name
    );
    let link = config.referral_link(referral_code);

    let body = format!(
        r#"{greeting}{joined}{climb}{button}<p style="color:#66696d;font-size:13px;line-height:1.5;margin:0 0 32px 0;text-align:center;">Your referral link: <a href="{link}" style="color:#184c3c;word-break:break-all;">{link}</a></p>"#,
        greeting = paragraph(&format!("Hi {},", escape(first_name))),
        joined = paragraph(&format!(
            "You're officially on the {} waitlist. As one of our first members you'll be among the first to try it at launch.",
            escape(&config.brand_name)
        )),
        climb = paragraph(&format!(
            "The top {TOP_TIER} referrers on our leaderboard before launch win a reward. Share your unique link to start climbing."
        )),
        button = primary_button(&link, "Share Your Referral Link"),
    );

    let html = wrap_email(config, "You're on the Waitlist!", &body);
    (subject, html)
}

/// Sent to a referrer whenever someone signs up with their code.
pub fn referral_notification_email(
    config: &NotificationConfig,
    referrer_first_name: &str,
    new_first_name: &str,
    new_last_initial: &str,
    referral_count: usize,
    rank: usize,
) -> (String, String) {
    let subject = format!(
        "{}, your referral {} just joined {}!",
        referrer_first_name, new_first_name, config.brand_name
    );

    let body = format!(
        r#"{greeting}{who}{position}{stats}{button}"#,
        greeting = paragraph(&format!("Hi {},", escape(referrer_first_name))),
        who = paragraph(&format!(
            "<strong>{} {}.</strong> just joined the {} waitlist using your referral link.",
            escape(new_first_name),
            escape(new_last_initial),
            escape(&config.brand_name)
        )),
        position = paragraph(&position_label(referral_count, rank)),
        stats = stat_boxes(referral_count, rank),
        button = primary_button(&config.leaderboard_link(), "View the Leaderboard"),
    );

    let html = wrap_email(config, "New Referral Signup!", &body);
    (subject, html)
}

pub fn position_label(referral_count: usize, rank: usize) -> String {
    if rank <= TOP_TIER {
        format!(
            "You're in the <strong>top {TOP_TIER}</strong> &mdash; keep sharing to hold your spot."
        )
    } else if rank <= 10 {
        format!(
            "You're <strong>#{rank}</strong> on the leaderboard. A few more referrals could put you in the top {TOP_TIER}!"
        )
    } else {
        let plural = if referral_count == 1 { "" } else { "s" };
        format!(
            "You have <strong>{referral_count} referral{plural}</strong> so far. Keep sharing to climb the leaderboard."
        )
    }
}

fn stat_boxes(referral_count: usize, rank: usize) -> String {
    let stat = |value: String, label: &str| {
        format!(
            r#"<td width="50%" align="center" valign="top" style="padding:0 8px;"><table cellpadding="0" cellspacing="0" border="0" style="background-color:#f5f6f8;border-radius:8px;width:100%;"><tr><td align="center" style="padding:20px;"><p style="color:#184c3c;font-size:32px;font-weight:700;margin:0;">{value}</p><p style="color:#66696d;font-size:11px;margin:6px 0 0 0;text-transform:uppercase;letter-spacing:0.5px;">{label}</p></td></tr></table></td>"#
        )
    };
    format!(
        r#"<table width="100%" cellpadding="0" cellspacing="0" border="0" style="margin:0 0 32px 0;"><tr>{}{}</tr></table>"#,
        stat(referral_count.to_string(), "Referrals"),
        stat(format!("#{rank}"), "Rank"),
    )
}

pub fn wrap_email(config: &NotificationConfig, headline: &str, body_html: &str) -> String {
    let brand = escape(&config.brand_name);
    let site = config.site_url.as_str();
    let site_label = escape(&config.site_label()).to_string();
    let support = escape(&config.support_email);
    let logo = &config.logo_url;

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head><meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1.0"><title>{brand}</title></head>
  <body style="margin:0;padding:0;background-color:#f5f6f8;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,Helvetica,Arial,sans-serif;">
    <table width="100%" cellpadding="0" cellspacing="0" border="0" style="background-color:#f5f6f8;"><tr><td align="center" style="padding:40px 20px;">
      <table width="600" cellpadding="0" cellspacing="0" border="0" style="background-color:#ffffff;border-radius:12px;overflow:hidden;">
        <tr><td align="center" style="padding:40px 40px 24px 40px;"><img src="{logo}" alt="{brand}" width="130" style="display:block;border:0;" /></td></tr>
        <tr><td style="padding:32px 40px 40px 40px;">
          <h1 style="color:#1f2022;font-size:24px;font-weight:700;margin:0 0 28px 0;text-align:center;">{headline}</h1>
          {body_html}
        </td></tr>
        <tr><td style="padding:0 40px 32px 40px;">
          <p style="color:#414346;font-size:14px;line-height:1.6;margin:0;">Have questions? Contact us at <a href="mailto:{support}" style="color:#184c3c;font-weight:600;text-decoration:none;">{support}</a>.</p>
        </td></tr>
        <tr><td style="border-top:1px solid #e5e5e5;padding:24px 40px;text-align:center;">
          <p style="color:#9a9ea3;font-size:12px;line-height:1.8;margin:0;">{brand}<br><a href="{site}" style="color:#9a9ea3;text-decoration:none;">{site_label}</a></p>
        </td></tr>
      </table>
    </td></tr></table>
  </body>
</html>
"#
    )
}
