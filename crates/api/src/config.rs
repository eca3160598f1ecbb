use chrono::{FixedOffset, NaiveTime};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development except
/// the bot credentials, which stay `None` when absent -- the webhook path
/// answers those requests with a server error rather than operating
/// unauthenticated.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Bot credentials and schedule.
    pub bot: BotConfig,
}

/// Messaging credentials, manager identity, and the two daily trigger times.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Channel secret used to verify inbound webhook signatures.
    pub channel_secret: Option<String>,
    /// Access token for the outbound Messaging API.
    pub access_token: Option<String>,
    /// Identity that receives the daily lateness digest.
    pub manager_user_id: Option<String>,
    /// When the wake-up broadcast fires each day (default: `06:00`).
    pub wake_up_time: NaiveTime,
    /// When the lateness report fires each day (default: `06:30`).
    pub late_report_time: NaiveTime,
    /// The wall-clock offset the schedule and "today" run in (default: `+09:00`).
    pub utc_offset: FixedOffset,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `3000`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
    /// | `LINE_CHANNEL_SECRET`       | unset                   |
    /// | `LINE_CHANNEL_ACCESS_TOKEN` | unset                   |
    /// | `MANAGER_USER_ID`           | unset                   |
    /// | `CHECK_IN_START_TIME`       | `06:00`                 |
    /// | `LATE_REPORT_TIME`          | `06:30`                 |
    /// | `UTC_OFFSET`                | `+09:00`                |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            bot: BotConfig::from_env(),
        }
    }
}

impl BotConfig {
    /// Load the bot section from environment variables.
    pub fn from_env() -> Self {
        let channel_secret = non_empty_var("LINE_CHANNEL_SECRET");
        let access_token = non_empty_var("LINE_CHANNEL_ACCESS_TOKEN");
        let manager_user_id = non_empty_var("MANAGER_USER_ID");

        let wake_up_time = time_var("CHECK_IN_START_TIME", "06:00");
        let late_report_time = time_var("LATE_REPORT_TIME", "06:30");

        let offset_raw = std::env::var("UTC_OFFSET").unwrap_or_else(|_| "+09:00".into());
        let utc_offset = parse_utc_offset(&offset_raw)
            .unwrap_or_else(|| panic!("UTC_OFFSET must look like +09:00, got '{offset_raw}'"));

        Self {
            channel_secret,
            access_token,
            manager_user_id,
            wake_up_time,
            late_report_time,
            utc_offset,
        }
    }

    /// Whether both webhook credentials are present.
    pub fn has_credentials(&self) -> bool {
        self.channel_secret.is_some() && self.access_token.is_some()
    }
}

/// Read an env var, treating empty strings as unset.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Read an `HH:MM` env var with a default.
fn time_var(name: &str, default: &str) -> NaiveTime {
    let raw = std::env::var(name).unwrap_or_else(|_| default.into());
    NaiveTime::parse_from_str(&raw, "%H:%M")
        .unwrap_or_else(|_| panic!("{name} must be HH:MM, got '{raw}'"))
}

/// Parse a `+HH:MM` / `-HH:MM` offset string.
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    let (sign, rest) = match raw.split_at_checked(1)? {
        ("+", rest) => (1, rest),
        ("-", rest) => (-1, rest),
        _ => (1, raw),
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_offset() {
        assert_eq!(
            parse_utc_offset("+09:00"),
            FixedOffset::east_opt(9 * 3600)
        );
    }

    #[test]
    fn parses_negative_offset() {
        assert_eq!(
            parse_utc_offset("-05:30"),
            FixedOffset::east_opt(-(5 * 3600 + 30 * 60))
        );
    }

    #[test]
    fn parses_unsigned_offset_as_east() {
        assert_eq!(parse_utc_offset("09:00"), FixedOffset::east_opt(9 * 3600));
    }

    #[test]
    fn rejects_garbage_offsets() {
        assert_eq!(parse_utc_offset(""), None);
        assert_eq!(parse_utc_offset("+9"), None);
        assert_eq!(parse_utc_offset("+25:00"), None);
        assert_eq!(parse_utc_offset("+09:75"), None);
        assert_eq!(parse_utc_offset("tokyo"), None);
    }
}
