//! Gateway statistics payloads: scrubbing of the raw stats JSON and the
//! typed summary the dashboard header renders.

use chrono::NaiveDateTime;
use serde_json::{json, Value};

/// The gateway reports itself in its own seen list; the dashboard drops it.
const GATEWAY_CALLSIGN: &str = "REPEAT";

/// Timestamp format of the seen-list `last` field.
const SEEN_LAST_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Snapshot shown before the first successful poll. Already in normalized
/// shape, so `normalize_stats` is a no-op on it.
pub fn fallback_stats() -> Value {
    json!({
        "aprsd": {
            "seen_list": {},
            "version": "unknown",
        },
        "aprs-is": { "server": "" },
        "repeat": { "version": "unknown" },
    })
}

/// Scrub and enrich a raw stats payload: private and noisy sections go
/// away, the gateway's own callsign disappears from the seen list, and
/// every remaining seen-list entry gains an integer `ts` parsed from its
/// `last` timestamp. Fields this function does not know about pass through
/// verbatim; they feed the pretty-printed diagnostic block.
pub fn normalize_stats(mut value: Value) -> Value {
    let Some(root) = value.as_object_mut() else {
        return fallback_stats();
    };
    root.remove("email");
    root.remove("messages");
    if !root.contains_key("repeat") {
        root.insert("repeat".to_string(), json!({ "version": "unknown" }));
    }
    if let Some(aprsd) = root.get_mut("aprsd").and_then(Value::as_object_mut) {
        aprsd.remove("watch_list");
        if let Some(seen) = aprsd.get_mut("seen_list").and_then(Value::as_object_mut) {
            seen.remove(GATEWAY_CALLSIGN);
            for entry in seen.values_mut() {
                stamp_seen_ts(entry);
            }
        }
    }
    value
}

fn stamp_seen_ts(entry: &mut Value) {
    let Some(map) = entry.as_object_mut() else {
        return;
    };
    let Some(last) = map.get("last").and_then(Value::as_str) else {
        return;
    };
    if let Ok(parsed) = NaiveDateTime::parse_from_str(last, SEEN_LAST_FORMAT) {
        map.insert("ts".to_string(), Value::from(parsed.and_utc().timestamp()));
    }
}

pub fn pretty_stats(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Header fields rendered at the top of the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSummary {
    pub repeat_version: String,
    pub aprsd_version: String,
    pub uptime: Option<String>,
    pub aprs_server: String,
    /// Pre-built connection fragment from the gateway, when it sends one.
    /// The gateway declares it markup-safe; absent, the view builds its own
    /// link from `aprs_server`.
    pub connection_html: Option<String>,
}

impl StatsSummary {
    pub fn from_stats(stats: &Value) -> Self {
        Self {
            repeat_version: str_at(stats, &["repeat", "version"])
                .unwrap_or("unknown")
                .to_string(),
            aprsd_version: str_at(stats, &["aprsd", "version"])
                .unwrap_or("unknown")
                .to_string(),
            uptime: uptime_text(stats),
            aprs_server: str_at(stats, &["aprs-is", "server"]).unwrap_or("").to_string(),
            connection_html: str_at(stats, &["aprs_connection"]).map(str::to_string),
        }
    }
}

/// Uptime arrives as a string or a bare number depending on gateway
/// version.
fn uptime_text(stats: &Value) -> Option<String> {
    match stats.get("aprsd").and_then(|aprsd| aprsd.get("uptime")) {
        Some(Value::String(text)) => Some(text.clone()),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    }
}

fn str_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    let mut cursor = value;
    for key in path {
        cursor = cursor.get(key)?;
    }
    cursor.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_stats() -> Value {
        json!({
            "aprsd": {
                "version": "3.4.0",
                "uptime": "2 days",
                "watch_list": { "KI5ABC": {} },
                "seen_list": {
                    "REPEAT": { "last": "2021-11-01 16:18:11.631723" },
                    "KI5ABC": { "last": "2021-11-01 16:18:11.631723", "count": 4 }
                }
            },
            "aprs-is": { "server": "noam.aprs2.net" },
            "email": { "sent": 3 },
            "messages": { "received": 9 },
            "custom_section": { "anything": true }
        })
    }

    #[test]
    fn normalization_scrubs_private_sections() {
        let stats = normalize_stats(raw_stats());
        assert!(stats.get("email").is_none());
        assert!(stats.get("messages").is_none());
        assert!(stats["aprsd"].get("watch_list").is_none());
    }

    #[test]
    fn normalization_drops_the_gateway_from_the_seen_list() {
        let stats = normalize_stats(raw_stats());
        let seen = stats["aprsd"]["seen_list"].as_object().unwrap();
        assert!(!seen.contains_key("REPEAT"));
        assert!(seen.contains_key("KI5ABC"));
    }

    #[test]
    fn normalization_stamps_seen_entries_with_epoch_ts() {
        let stats = normalize_stats(raw_stats());
        let entry = &stats["aprsd"]["seen_list"]["KI5ABC"];
        // 2021-11-01 16:18:11 UTC
        assert_eq!(entry["ts"], json!(1635783491));
        assert_eq!(entry["count"], json!(4));
    }

    #[test]
    fn normalization_adds_a_repeat_section_when_missing() {
        let stats = normalize_stats(raw_stats());
        assert_eq!(stats["repeat"]["version"], json!("unknown"));
    }

    #[test]
    fn unknown_fields_pass_through_verbatim() {
        let stats = normalize_stats(raw_stats());
        assert_eq!(stats["custom_section"]["anything"], json!(true));
    }

    #[test]
    fn non_object_payloads_fall_back_to_the_default_shape() {
        assert_eq!(normalize_stats(json!([1, 2, 3])), fallback_stats());
        assert_eq!(normalize_stats(Value::Null), fallback_stats());
    }

    #[test]
    fn fallback_shape_is_already_normalized() {
        assert_eq!(normalize_stats(fallback_stats()), fallback_stats());
    }

    #[test]
    fn summary_extracts_the_header_fields() {
        let summary = StatsSummary::from_stats(&normalize_stats(raw_stats()));
        assert_eq!(summary.repeat_version, "unknown");
        assert_eq!(summary.aprsd_version, "3.4.0");
        assert_eq!(summary.uptime.as_deref(), Some("2 days"));
        assert_eq!(summary.aprs_server, "noam.aprs2.net");
        assert!(summary.connection_html.is_none());
    }

    #[test]
    fn summary_accepts_numeric_uptime() {
        let stats = json!({ "aprsd": { "version": "3.4.0", "uptime": 86400 } });
        let summary = StatsSummary::from_stats(&stats);
        assert_eq!(summary.uptime.as_deref(), Some("86400"));
    }

    #[test]
    fn summary_of_the_fallback_is_well_formed() {
        let summary = StatsSummary::from_stats(&fallback_stats());
        assert_eq!(summary.repeat_version, "unknown");
        assert_eq!(summary.aprsd_version, "unknown");
        assert_eq!(summary.uptime, None);
        assert_eq!(summary.aprs_server, "");
    }

    #[test]
    fn summary_keeps_a_gateway_supplied_connection_fragment() {
        let stats = json!({
            "aprs_connection": "APRS-IS Server: <a href='http://status.aprs2.net'>x</a>"
        });
        let summary = StatsSummary::from_stats(&stats);
        assert!(summary.connection_html.unwrap().contains("status.aprs2.net"));
    }
}
