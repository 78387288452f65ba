//! INI parsing: `Ini` → [`Settings`].
//!
//! The single place where INI key names map to struct fields. Unknown
//! sections and keys are ignored.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use ini::{Ini, Properties};

use super::defaults::clamp_poll_interval;
use super::file::ConfigFileError;
use super::settings::Settings;

/// Parse an `Ini` into `Settings`, overlaying values on the defaults.
pub(super) fn parse_ini(ini: &Ini) -> Result<Settings, ConfigFileError> {
    let mut settings = Settings::default();

    if let Some(section) = ini.section(Some("connection")) {
        let s = Section::new("connection", section);
        if let Some(v) = s.url("aircraft_url")? {
            settings.connection.aircraft_url = v;
        }
        if let Some(v) = s.url("sim_url")? {
            settings.connection.sim_url = v;
        }
        if let Some(v) = s.positive::<u64>("request_timeout_secs")? {
            settings.connection.request_timeout = Duration::from_secs(v);
        }
    }

    if let Some(section) = ini.section(Some("gsx")) {
        let s = Section::new("gsx", section);
        if let Some(v) = s.get("menu_file") {
            if !v.is_empty() {
                settings.gsx.menu_file = expand_tilde(v);
            }
        }
        if let Some(v) = s.positive::<u64>("menu_ready_timeout_secs")? {
            settings.gsx.menu_ready_timeout = Duration::from_secs(v);
        }
        if let Some(v) = s.number::<u64>("operator_delay_ms")? {
            settings.gsx.operator_delay = Duration::from_millis(v);
        }
        if let Some(v) = s.number::<u64>("reposition_delay_secs")? {
            settings.gsx.reposition_delay = Duration::from_secs(v);
        }
    }

    if let Some(section) = ini.section(Some("services")) {
        let s = Section::new("services", section);
        let p = &mut settings.services;
        let flags: [(&str, &mut bool); 13] = [
            ("auto_reposition", &mut p.auto_reposition),
            ("auto_connect", &mut p.auto_connect),
            ("connect_pca", &mut p.connect_pca),
            ("pca_only_jetway", &mut p.pca_only_jetway),
            ("jetway_only", &mut p.jetway_only),
            ("auto_refuel", &mut p.auto_refuel),
            ("call_catering", &mut p.call_catering),
            ("auto_boarding", &mut p.auto_boarding),
            ("auto_deboarding", &mut p.auto_deboarding),
            ("zero_fuel_start", &mut p.zero_fuel_start),
            ("save_fuel", &mut p.save_fuel),
            ("save_hydraulic_fluids", &mut p.save_hydraulic_fluids),
            ("synch_bypass", &mut p.synch_bypass),
        ];
        for (key, field) in flags {
            if let Some(v) = s.flag(key)? {
                *field = v;
            }
        }
        if let Some(v) = s.get("refuel_rate_kgs") {
            let rate: f64 = s.parse("refuel_rate_kgs", v, "must be a number")?;
            if !(rate.is_finite() && rate > 0.0) {
                return Err(s.invalid("refuel_rate_kgs", v, "must be greater than zero"));
            }
            p.refuel_rate_kgs = rate;
        }
    }

    if let Some(section) = ini.section(Some("monitor")) {
        let s = Section::new("monitor", section);
        if let Some(v) = s.number::<u64>("poll_interval_ms")? {
            settings.monitor.poll_interval = clamp_poll_interval(Duration::from_millis(v));
        }
    }

    if let Some(section) = ini.section(Some("logging")) {
        let s = Section::new("logging", section);
        if let Some(v) = s.get("directory") {
            if !v.is_empty() {
                settings.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = s.get("file") {
            if !v.is_empty() {
                settings.logging.file = v.to_string();
            }
        }
    }

    Ok(settings)
}

/// One INI section with typed accessors that report the offending key.
struct Section<'a> {
    name: &'static str,
    props: &'a Properties,
}

impl<'a> Section<'a> {
    fn new(name: &'static str, props: &'a Properties) -> Self {
        Self { name, props }
    }

    fn get(&self, key: &str) -> Option<&'a str> {
        self.props.get(key).map(str::trim)
    }

    fn invalid(&self, key: &str, value: &str, reason: &str) -> ConfigFileError {
        ConfigFileError::InvalidValue {
            section: self.name.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    fn parse<T: FromStr>(
        &self,
        key: &str,
        value: &str,
        reason: &str,
    ) -> Result<T, ConfigFileError> {
        value.parse().map_err(|_| self.invalid(key, value, reason))
    }

    fn number<T: FromStr>(&self, key: &str) -> Result<Option<T>, ConfigFileError> {
        self.get(key)
            .map(|v| self.parse(key, v, "must be a non-negative integer"))
            .transpose()
    }

    fn positive<T: FromStr + PartialOrd + Default>(
        &self,
        key: &str,
    ) -> Result<Option<T>, ConfigFileError> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => {
                let n: T = self.parse(key, v, "must be a positive integer")?;
                if n > T::default() {
                    Ok(Some(n))
                } else {
                    Err(self.invalid(key, v, "must be a positive integer"))
                }
            }
        }
    }

    fn flag(&self, key: &str) -> Result<Option<bool>, ConfigFileError> {
        self.get(key)
            .map(|v| parse_bool(v).ok_or_else(|| self.invalid(key, v, "must be true or false")))
            .transpose()
    }

    fn url(&self, key: &str) -> Result<Option<String>, ConfigFileError> {
        match self.get(key) {
            None => Ok(None),
            Some(v) if v.starts_with("http://") || v.starts_with("https://") => {
                Ok(Some(v.trim_end_matches('/').to_string()))
            }
            Some(v) => Err(self.invalid(key, v, "must start with http:// or https://")),
        }
    }
}

/// Accepts true/false, yes/no, on/off, 1/0.
pub(super) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Expand `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::MIN_POLL_INTERVAL;

    fn parse(text: &str) -> Result<Settings, ConfigFileError> {
        Settings::from_ini_str(text)
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(parse("").unwrap(), Settings::default());
    }

    #[test]
    fn test_full_file() {
        let settings = parse(
            r#"
[connection]
aircraft_url = http://10.0.0.2:5000/
sim_url = https://sim.local:8086
request_timeout_secs = 12

[gsx]
menu_file = /opt/gsx/menu
menu_ready_timeout_secs = 30
operator_delay_ms = 750
reposition_delay_secs = 0

[services]
auto_reposition = no
jetway_only = yes
refuel_rate_kgs = 40.5
save_fuel = 1
synch_bypass = off

[monitor]
poll_interval_ms = 250

[logging]
directory = /var/log/groundsync
file = gs.log
"#,
        )
        .unwrap();

        assert_eq!(settings.connection.aircraft_url, "http://10.0.0.2:5000");
        assert_eq!(settings.connection.sim_url, "https://sim.local:8086");
        assert_eq!(settings.connection.request_timeout, Duration::from_secs(12));
        assert_eq!(settings.gsx.menu_file, PathBuf::from("/opt/gsx/menu"));
        assert_eq!(settings.gsx.menu_ready_timeout, Duration::from_secs(30));
        assert_eq!(settings.gsx.operator_delay, Duration::from_millis(750));
        assert_eq!(settings.gsx.reposition_delay, Duration::ZERO);
        assert!(!settings.services.auto_reposition);
        assert!(settings.services.jetway_only);
        assert!(settings.services.save_fuel);
        assert!(!settings.services.synch_bypass);
        assert_eq!(settings.services.refuel_rate_kgs, 40.5);
        assert_eq!(settings.monitor.poll_interval, Duration::from_millis(250));
        assert_eq!(settings.logging.directory, PathBuf::from("/var/log/groundsync"));
        assert_eq!(settings.logging.file, "gs.log");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let settings = parse("[services]\nfly_the_plane = true\n[extra]\nx = 1\n").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_invalid_bool() {
        let err = parse("[services]\nauto_refuel = maybe\n").unwrap_err();
        match err {
            ConfigFileError::InvalidValue {
                section,
                key,
                value,
                ..
            } => {
                assert_eq!(section, "services");
                assert_eq!(key, "auto_refuel");
                assert_eq!(value, "maybe");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_refuel_rate_must_be_positive() {
        assert!(parse("[services]\nrefuel_rate_kgs = 0\n").is_err());
        assert!(parse("[services]\nrefuel_rate_kgs = -3\n").is_err());
        assert!(parse("[services]\nrefuel_rate_kgs = fast\n").is_err());
    }

    #[test]
    fn test_url_scheme_required() {
        assert!(parse("[connection]\nsim_url = 127.0.0.1:8086\n").is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(parse("[connection]\nrequest_timeout_secs = 0\n").is_err());
    }

    #[test]
    fn test_poll_interval_clamped_to_floor() {
        let settings = parse("[monitor]\npoll_interval_ms = 2\n").unwrap();
        assert_eq!(settings.monitor.poll_interval, MIN_POLL_INTERVAL);
    }

    #[test]
    fn test_parse_bool_variants() {
        assert_eq!(parse_bool(" TRUE "), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("2"), None);
    }

    #[test]
    fn test_expand_tilde_leaves_absolute_paths() {
        assert_eq!(expand_tilde("/a/b"), PathBuf::from("/a/b"));
    }
}
