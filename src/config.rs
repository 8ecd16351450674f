use std::env;

use anyhow::{Context, Result, bail};
use chrono::{NaiveTime, Weekday};
use dotenvy::dotenv;

use crate::utils::punch_time::parse_clock_time;

const DEFAULT_WORKING_WEEKDAYS: &str = "Mon,Tue,Wed,Thu,Fri,Sat";

/// Set of weekdays on which attendance is expected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkWeek([bool; 7]);

impl WorkWeek {
    pub fn from_days(days: &[Weekday]) -> Self {
        let mut set = [false; 7];
        for day in days {
            set[day.num_days_from_monday() as usize] = true;
        }
        Self(set)
    }

    /// Parses a comma separated list such as `Mon,Tue,Wed`.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut days = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let day = part
                .parse::<Weekday>()
                .map_err(|_| anyhow::anyhow!("unknown weekday '{}'", part))?;
            days.push(day);
        }
        if days.is_empty() {
            bail!("at least one working weekday is required");
        }
        Ok(Self::from_days(&days))
    }

    pub fn is_working(&self, day: Weekday) -> bool {
        self.0[day.num_days_from_monday() as usize]
    }

    pub fn names(&self) -> Vec<String> {
        (0..7u8)
            .filter(|i| self.0[*i as usize])
            .filter_map(|i| Weekday::try_from(i).ok())
            .map(|d| d.to_string())
            .collect()
    }
}

impl Default for WorkWeek {
    fn default() -> Self {
        Self::from_days(&[
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ])
    }
}

/// Thresholds used to classify an employee-day.
#[derive(Clone, Debug)]
pub struct AttendanceRules {
    pub work_start_time: NaiveTime,
    /// A first punch strictly after this time is late.
    pub late_after_time: NaiveTime,
    /// A last punch strictly before this time is an early leave.
    pub early_leave_time: NaiveTime,
    pub working_weekdays: WorkWeek,
}

impl Default for AttendanceRules {
    fn default() -> Self {
        Self {
            work_start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            late_after_time: NaiveTime::from_hms_opt(8, 5, 0).unwrap_or_default(),
            early_leave_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default(),
            working_weekdays: WorkWeek::default(),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,

    // Upstream BioTime server
    pub biotime_base: String,
    pub biotime_username: String,
    pub biotime_password: String,

    pub rules: AttendanceRules,

    // Rate limiting
    pub rate_reports_per_min: u32,

    // Logging
    pub log_level: tracing::Level,
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| -> String {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let time = |key: &str, default: &str| -> Result<NaiveTime> {
            let raw = var(key, default);
            parse_clock_time(&raw).with_context(|| format!("{} has invalid time '{}'", key, raw))
        };

        let rules = AttendanceRules {
            work_start_time: time("WORK_START_TIME", "08:00:00")?,
            late_after_time: time("LATE_AFTER_TIME", "08:05:00")?,
            early_leave_time: time("EARLY_LEAVE_TIME", "17:00:00")?,
            working_weekdays: WorkWeek::parse(&var("WORKING_WEEKDAYS", DEFAULT_WORKING_WEEKDAYS))
                .context("WORKING_WEEKDAYS is invalid")?,
        };

        let rate_reports_per_min: u32 = var("RATE_REPORTS_PER_MIN", "120")
            .parse()
            .context("RATE_REPORTS_PER_MIN must be a positive integer")?;
        if rate_reports_per_min == 0 {
            bail!("RATE_REPORTS_PER_MIN must be greater than zero");
        }

        let log_level = var("LOG_LEVEL", "debug")
            .parse::<tracing::Level>()
            .map_err(|_| anyhow::anyhow!("LOG_LEVEL must be one of trace, debug, info, warn, error"))?;

        Ok(Self {
            server_addr: var("SERVER_ADDR", "0.0.0.0:8000"),
            biotime_base: normalize_base_url(&var("BIOTIME_BASE", "http://localhost:8080")),
            biotime_username: var("BIOTIME_USERNAME", "admin"),
            biotime_password: var("BIOTIME_PASSWORD", "password"),
            rules,
            rate_reports_per_min,
            log_level,
            log_dir: var("LOG_DIR", "logs"),
        })
    }
}

/// Ensures a scheme is present and strips trailing slashes.
pub fn normalize_base_url(raw: &str) -> String {
    let with_scheme = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    };
    with_scheme.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.server_addr, "0.0.0.0:8000");
        assert_eq!(config.biotime_base, "http://localhost:8080");
        assert_eq!(config.biotime_username, "admin");
        assert_eq!(config.rules.late_after_time, NaiveTime::from_hms_opt(8, 5, 0).unwrap());
        assert_eq!(config.rules.early_leave_time, NaiveTime::from_hms_opt(17, 0, 0).unwrap());
        assert_eq!(config.rules.working_weekdays, WorkWeek::default());
        assert_eq!(config.rate_reports_per_min, 120);
        assert_eq!(config.log_level, tracing::Level::DEBUG);
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let config = config_from(&[("BIOTIME_USERNAME", ""), ("LATE_AFTER_TIME", "  ")]).unwrap();

        assert_eq!(config.biotime_username, "admin");
        assert_eq!(config.rules.late_after_time, NaiveTime::from_hms_opt(8, 5, 0).unwrap());
    }

    #[test]
    fn base_url_gets_scheme_and_loses_trailing_slash() {
        assert_eq!(normalize_base_url("10.0.0.5:8081/"), "http://10.0.0.5:8081");
        assert_eq!(normalize_base_url("https://bio.example.com//"), "https://bio.example.com");
        assert_eq!(normalize_base_url("http://bio:80"), "http://bio:80");
    }

    #[test]
    fn thresholds_accept_short_form() {
        let config = config_from(&[("LATE_AFTER_TIME", "09:15")]).unwrap();
        assert_eq!(config.rules.late_after_time, NaiveTime::from_hms_opt(9, 15, 0).unwrap());
    }

    #[test]
    fn invalid_threshold_is_an_error() {
        assert!(config_from(&[("EARLY_LEAVE_TIME", "five pm")]).is_err());
    }

    #[test]
    fn zero_rate_limit_is_rejected() {
        assert!(config_from(&[("RATE_REPORTS_PER_MIN", "0")]).is_err());
        assert!(config_from(&[("RATE_REPORTS_PER_MIN", "-3")]).is_err());
    }

    #[test]
    fn working_weekdays_parse() {
        let week = WorkWeek::parse("mon, Tuesday,WED").unwrap();
        assert!(week.is_working(Weekday::Mon));
        assert!(week.is_working(Weekday::Tue));
        assert!(week.is_working(Weekday::Wed));
        assert!(!week.is_working(Weekday::Thu));
        assert!(!week.is_working(Weekday::Sun));
        assert_eq!(week.names(), vec!["Mon", "Tue", "Wed"]);

        assert!(WorkWeek::parse("Mon,Funday").is_err());
        assert!(WorkWeek::parse(" , ").is_err());
    }

    #[test]
    fn default_week_excludes_sunday() {
        let week = WorkWeek::default();
        assert!(week.is_working(Weekday::Sat));
        assert!(!week.is_working(Weekday::Sun));
    }
}
