use std::time::Duration;

use log::debug;
use serde_json::{Map, Value};

use crate::error::*;

/// Largest supported number of atomic state bits.
pub const MAX_N: usize = 8;

/// Largest supported number of time points on each side of 0.
pub const MAX_M: usize = 8;

pub const DEFAULT_MAX_TIME: Duration = Duration::from_secs(1);

/// Per-example settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Number of atomic state bits.
    pub n: usize,
    /// Number of time points in each direction from 0 (bimodal theory only).
    pub m: Option<usize>,
    pub contingent: bool,
    pub disjoint: bool,
    pub non_empty: bool,
    pub non_null: bool,
    /// Wall-clock budget for the whole check: encoding, every solver call and iteration.
    pub max_time: Duration,
    pub iterate: usize,
    /// `true` when a countermodel is expected. Only the runner looks at it.
    pub expectation: Option<bool>,
}

impl Settings {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            m: None,
            contingent: false,
            disjoint: false,
            non_empty: false,
            non_null: false,
            max_time: DEFAULT_MAX_TIME,
            iterate: 1,
            expectation: None,
        }
    }

    pub fn with_m(mut self, m: usize) -> Self {
        self.m = Some(m);
        self
    }

    pub fn with_iterate(mut self, iterate: usize) -> Self {
        self.iterate = iterate;
        self
    }

    pub fn with_max_time(mut self, max_time: Duration) -> Self {
        self.max_time = max_time;
        self
    }

    pub fn contingent(mut self) -> Self {
        self.contingent = true;
        self
    }

    pub fn disjoint(mut self) -> Self {
        self.disjoint = true;
        self
    }

    pub fn non_empty(mut self) -> Self {
        self.non_empty = true;
        self
    }

    pub fn non_null(mut self) -> Self {
        self.non_null = true;
        self
    }

    /// Parse settings from a JSON object. Unknown keys are rejected.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        let n = match map.get("N") {
            Some(value) => as_count("N", value)?,
            None => return MissingSettingSnafu { key: "N" }.fail(),
        };
        if n > MAX_N {
            return InvalidSettingSnafu {
                key: "N",
                reason: format!("{} exceeds the maximum of {}", n, MAX_N),
            }
            .fail();
        }

        let mut settings = Settings::new(n);
        for (key, value) in map {
            match key.as_str() {
                "N" => {}
                "M" => settings.m = Some(check_m(as_count(key, value)?)?),
                "contingent" => settings.contingent = as_bool(key, value)?,
                "disjoint" => settings.disjoint = as_bool(key, value)?,
                "non_empty" => settings.non_empty = as_bool(key, value)?,
                "non_null" => settings.non_null = as_bool(key, value)?,
                "max_time" => {
                    let secs = value.as_f64().filter(|&x| x.is_finite() && x > 0.0);
                    match secs {
                        Some(secs) => settings.max_time = Duration::from_secs_f64(secs),
                        None => {
                            return InvalidSettingSnafu {
                                key,
                                reason: format!("expected a positive number of seconds, got {}", value),
                            }
                            .fail()
                        }
                    }
                }
                "iterate" => {
                    let iterate = as_count(key, value)?;
                    if iterate == 0 {
                        return InvalidSettingSnafu {
                            key,
                            reason: "must be at least 1",
                        }
                        .fail();
                    }
                    settings.iterate = iterate;
                }
                "expectation" => settings.expectation = Some(as_bool(key, value)?),
                _ => return UnknownSettingSnafu { key }.fail(),
            }
        }
        debug!("Parsed settings: {:?}", settings);
        Ok(settings)
    }

    /// `M`, or an error naming it.
    pub fn require_m(&self) -> Result<usize> {
        match self.m {
            Some(m) => check_m(m),
            None => MissingSettingSnafu { key: "M" }.fail(),
        }
    }
}

pub(crate) fn check_m(m: usize) -> Result<usize> {
    if m == 0 {
        return InvalidSettingSnafu {
            key: "M",
            reason: "must be at least 1",
        }
        .fail();
    }
    if m > MAX_M {
        return InvalidSettingSnafu {
            key: "M",
            reason: format!("{} exceeds the maximum of {}", m, MAX_M),
        }
        .fail();
    }
    Ok(m)
}

fn as_count(key: &str, value: &Value) -> Result<usize> {
    match value.as_u64() {
        Some(x) => Ok(x as usize),
        None => InvalidSettingSnafu {
            key,
            reason: format!("expected a non-negative integer, got {}", value),
        }
        .fail(),
    }
}

fn as_bool(key: &str, value: &Value) -> Result<bool> {
    match value.as_bool() {
        Some(x) => Ok(x),
        None => InvalidSettingSnafu {
            key,
            reason: format!("expected a boolean, got {}", value),
        }
        .fail(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_log::test;

    use super::*;

    fn parse(value: Value) -> Result<Settings> {
        match value {
            Value::Object(map) => Settings::from_map(&map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_defaults() {
        let settings = parse(json!({"N": 3})).unwrap();
        assert_eq!(settings, Settings::new(3));
        assert_eq!(settings.max_time, Duration::from_secs(1));
        assert_eq!(settings.iterate, 1);
        assert!(!settings.contingent && !settings.disjoint && !settings.non_empty && !settings.non_null);
    }

    #[test]
    fn test_all_keys() {
        let settings = parse(json!({
            "N": 4, "M": 2, "contingent": true, "disjoint": false, "non_empty": true,
            "non_null": true, "max_time": 0.5, "iterate": 3, "expectation": false
        }))
        .unwrap();
        let expected = Settings::new(4)
            .with_m(2)
            .contingent()
            .non_empty()
            .non_null()
            .with_max_time(Duration::from_millis(500))
            .with_iterate(3);
        assert_eq!(settings, Settings { expectation: Some(false), ..expected });
    }

    #[test]
    fn test_rejects_bad_settings() {
        assert!(matches!(parse(json!({})), Err(CheckError::MissingSetting { key }) if key == "N"));
        assert!(matches!(parse(json!({"N": 2, "foo": 1})), Err(CheckError::UnknownSetting { key }) if key == "foo"));
        assert!(matches!(parse(json!({"N": 9})), Err(CheckError::InvalidSetting { .. })));
        assert!(matches!(parse(json!({"N": -1})), Err(CheckError::InvalidSetting { .. })));
        assert!(matches!(parse(json!({"N": 2, "M": 0})), Err(CheckError::InvalidSetting { .. })));
        assert!(matches!(parse(json!({"N": 2, "max_time": 0})), Err(CheckError::InvalidSetting { .. })));
        assert!(matches!(parse(json!({"N": 2, "iterate": 0})), Err(CheckError::InvalidSetting { .. })));
        assert!(matches!(parse(json!({"N": 2, "contingent": 1})), Err(CheckError::InvalidSetting { .. })));
    }

    #[test]
    fn test_zero_n_is_accepted_here() {
        assert_eq!(parse(json!({"N": 0})).unwrap().n, 0);
    }

    #[test]
    fn test_require_m() {
        assert!(matches!(Settings::new(1).require_m(), Err(CheckError::MissingSetting { key }) if key == "M"));
        assert_eq!(Settings::new(1).with_m(3).require_m().unwrap(), 3);
        assert!(matches!(Settings::new(1).with_m(0).require_m(), Err(CheckError::InvalidSetting { .. })));
    }

    #[test]
    fn test_m_is_capped() {
        assert_eq!(parse(json!({"N": 2, "M": MAX_M})).unwrap().m, Some(MAX_M));
        assert!(matches!(
            parse(json!({"N": 2, "M": MAX_M + 1})),
            Err(CheckError::InvalidSetting { key, .. }) if key == "M"
        ));
        assert!(matches!(
            Settings::new(1).with_m(1000).require_m(),
            Err(CheckError::InvalidSetting { key, .. }) if key == "M"
        ));
    }
}
