use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Destination screens the server knows how to address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Chat,
    ClubDetails,
    JobDetails,
    HelpOfferDetails,
    /// Any screen name this build does not recognize yet.
    Unknown(String),
}

impl Screen {
    pub fn parse(s: &str) -> Self {
        match s {
            "chat" => Screen::Chat,
            "clubDetails" => Screen::ClubDetails,
            "jobDetails" => Screen::JobDetails,
            "helpOfferDetails" => Screen::HelpOfferDetails,
            other => Screen::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Screen::Chat => "chat",
            Screen::ClubDetails => "clubDetails",
            Screen::JobDetails => "jobDetails",
            Screen::HelpOfferDetails => "helpOfferDetails",
            Screen::Unknown(name) => name,
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Notification content as delivered by the push service.
///
/// `data` is left untyped: depending on the delivery path it is an object,
/// a JSON-encoded string, or a one-element array wrapping such a string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawNotificationPayload {
    pub screen: Option<serde_json::Value>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Shape-independent routing information extracted from a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPayload {
    pub screen: String,
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl CanonicalPayload {
    pub fn screen(&self) -> Screen {
        Screen::parse(&self.screen)
    }

    /// String view of a data field. Numbers are stringified; anything else is absent.
    pub fn field(&self, key: &str) -> Option<String> {
        match self.data.get(key)? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTarget {
    pub path: String,
    pub params: BTreeMap<String, String>,
}

impl RouteTarget {
    pub fn bare(path: &str) -> Self {
        RouteTarget {
            path: path.to_string(),
            params: BTreeMap::new(),
        }
    }
}

/// What the OS should do with an incoming notification while the app is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPresentation {
    pub should_show_alert: bool,
    pub should_play_sound: bool,
    pub should_set_badge: bool,
}

impl AlertPresentation {
    pub fn shown() -> Self {
        AlertPresentation {
            should_show_alert: true,
            should_play_sound: true,
            should_set_badge: false,
        }
    }

    pub fn silenced() -> Self {
        AlertPresentation {
            should_show_alert: false,
            should_play_sound: false,
            should_set_badge: false,
        }
    }

    pub fn is_suppressed(&self) -> bool {
        !self.should_show_alert
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppLifecycle {
    Active,
    Inactive,
    Background,
}

impl FromStr for AppLifecycle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AppLifecycle::Active),
            "inactive" => Ok(AppLifecycle::Inactive),
            "background" => Ok(AppLifecycle::Background),
            _ => Err(format!("Invalid app state: {}", s)),
        }
    }
}

/// A notification the user acted on, as handed over by the OS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrival {
    /// OS notification identifier, when the delivery path exposes one.
    #[serde(default)]
    pub id: Option<String>,
    pub payload: serde_json::Value,
}

impl Arrival {
    pub fn new(payload: serde_json::Value) -> Self {
        Arrival { id: None, payload }
    }

    pub fn with_id(id: &str, payload: serde_json::Value) -> Self {
        Arrival {
            id: Some(id.to_string()),
            payload,
        }
    }
}

/// Journal entry kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeliveryKind {
    Presented,
    Suppressed,
    Navigated,
    Dropped,
    Duplicate,
    Held,
}

impl DeliveryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryKind::Presented => "presented",
            DeliveryKind::Suppressed => "suppressed",
            DeliveryKind::Navigated => "navigated",
            DeliveryKind::Dropped => "dropped",
            DeliveryKind::Duplicate => "duplicate",
            DeliveryKind::Held => "held",
        }
    }
}

impl FromStr for DeliveryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "presented" => Ok(DeliveryKind::Presented),
            "suppressed" => Ok(DeliveryKind::Suppressed),
            "navigated" => Ok(DeliveryKind::Navigated),
            "dropped" => Ok(DeliveryKind::Dropped),
            "duplicate" => Ok(DeliveryKind::Duplicate),
            "held" => Ok(DeliveryKind::Held),
            _ => Err(format!("Invalid delivery kind: {}", s)),
        }
    }
}

impl std::fmt::Display for DeliveryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub id: i64,
    pub kind: String,
    pub screen: String,
    pub notification_id: String,
    pub path: String,
    pub detail: String,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_round_trips_known_names() {
        for name in ["chat", "clubDetails", "jobDetails", "helpOfferDetails"] {
            assert_eq!(Screen::parse(name).as_str(), name);
        }
        assert_eq!(
            Screen::parse("tutorProfile"),
            Screen::Unknown("tutorProfile".to_string())
        );
    }

    #[test]
    fn field_stringifies_numbers_and_skips_other_types() {
        let payload = CanonicalPayload {
            screen: "jobDetails".to_string(),
            data: serde_json::json!({"a": "x", "b": 42, "c": null, "d": "", "e": {"f": 1}})
                .as_object()
                .cloned()
                .unwrap(),
        };
        assert_eq!(payload.field("a").as_deref(), Some("x"));
        assert_eq!(payload.field("b").as_deref(), Some("42"));
        assert_eq!(payload.field("c"), None);
        assert_eq!(payload.field("d"), None);
        assert_eq!(payload.field("e"), None);
        assert_eq!(payload.field("missing"), None);
    }

    #[test]
    fn app_lifecycle_from_str() {
        assert_eq!("active".parse::<AppLifecycle>(), Ok(AppLifecycle::Active));
        assert_eq!(
            "background".parse::<AppLifecycle>(),
            Ok(AppLifecycle::Background)
        );
        assert!("foreground".parse::<AppLifecycle>().is_err());
    }

    #[test]
    fn delivery_kind_parses_journal_values() {
        assert_eq!("dropped".parse::<DeliveryKind>(), Ok(DeliveryKind::Dropped));
        assert!("replayed".parse::<DeliveryKind>().is_err());
        assert_eq!(format!("[{:<10}]", DeliveryKind::Held), "[held      ]");
    }
}
