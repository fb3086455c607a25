use std::collections::BTreeMap;

use crate::error::NotificationError;
use crate::models::{CanonicalPayload, RouteTarget, Screen};

pub const DEFAULT_FALLBACK_PATH: &str = "/home";

const CHAT_FIELDS: &[&str] = &["userId", "receiverId", "name", "avatar"];

// Id sources per entity screen, highest precedence first.
const CLUB_ID_FIELDS: &[&str] = &["clubid", "clubId", "_id"];
const JOB_ID_FIELDS: &[&str] = &["offerId", "jobId", "_id"];
const HELP_OFFER_ID_FIELDS: &[&str] = &["offerId", "helpOfferId", "_id"];

/// Maps canonical payloads onto in-app destinations.
#[derive(Debug, Clone)]
pub struct RouteBuilder {
    fallback_path: String,
}

impl Default for RouteBuilder {
    fn default() -> Self {
        RouteBuilder::new(DEFAULT_FALLBACK_PATH)
    }
}

/// Entity screens: (path, target param name, id sources).
fn entity_route(screen: &Screen) -> Option<(&'static str, &'static str, &'static [&'static str])> {
    match screen {
        Screen::ClubDetails => Some(("/clubDetails", "clubid", CLUB_ID_FIELDS)),
        Screen::JobDetails => Some(("/jobDetails", "offerId", JOB_ID_FIELDS)),
        Screen::HelpOfferDetails => Some(("/helpOfferDetails", "offerId", HELP_OFFER_ID_FIELDS)),
        Screen::Chat | Screen::Unknown(_) => None,
    }
}

impl RouteBuilder {
    pub fn new(fallback_path: &str) -> Self {
        let fallback_path = if fallback_path.is_empty() {
            DEFAULT_FALLBACK_PATH
        } else {
            fallback_path
        };
        RouteBuilder {
            fallback_path: fallback_path.to_string(),
        }
    }

    pub fn fallback(&self) -> RouteTarget {
        RouteTarget::bare(&self.fallback_path)
    }

    pub fn build(&self, payload: &CanonicalPayload) -> Result<RouteTarget, NotificationError> {
        let screen = payload.screen();
        match screen {
            Screen::Chat => {
                let params: BTreeMap<String, String> = CHAT_FIELDS
                    .iter()
                    .filter_map(|key| payload.field(key).map(|v| (key.to_string(), v)))
                    .collect();
                Ok(RouteTarget {
                    path: "/chat".to_string(),
                    params,
                })
            }
            Screen::Unknown(ref name) => {
                log::info!(
                    "Unknown screen '{}', routing to {}",
                    name,
                    self.fallback_path
                );
                Ok(self.fallback())
            }
            _ => {
                let Some((path, param, sources)) = entity_route(&screen) else {
                    return Ok(self.fallback());
                };
                let id = sources
                    .iter()
                    .find_map(|key| payload.field(key))
                    .ok_or_else(|| NotificationError::MissingIdentifier {
                        screen: screen.to_string(),
                        fields: sources.join(", "),
                    })?;
                let mut params = BTreeMap::new();
                params.insert(param.to_string(), id);
                Ok(RouteTarget {
                    path: path.to_string(),
                    params,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_value;
    use serde_json::json;

    fn build(payload: serde_json::Value) -> Result<RouteTarget, NotificationError> {
        RouteBuilder::default().build(&normalize_value(&payload).unwrap())
    }

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn job_details_uses_offer_id() {
        let target = build(json!({"screen": "jobDetails", "data": {"offerId": "abc"}})).unwrap();
        assert_eq!(
            target,
            RouteTarget {
                path: "/jobDetails".to_string(),
                params: params(&[("offerId", "abc")]),
            }
        );
    }

    #[test]
    fn screen_specific_id_beats_generic_id() {
        let target = build(json!({
            "screen": "clubDetails",
            "data": {"_id": "generic", "clubid": "c1"}
        }))
        .unwrap();
        assert_eq!(target.params, params(&[("clubid", "c1")]));

        let target = build(json!({"screen": "clubDetails", "data": {"_id": "c9"}})).unwrap();
        assert_eq!(target.path, "/clubDetails");
        assert_eq!(target.params, params(&[("clubid", "c9")]));
    }

    #[test]
    fn help_offer_falls_back_through_precedence() {
        let target = build(json!({
            "screen": "helpOfferDetails",
            "data": {"helpOfferId": "h1", "_id": "x"}
        }))
        .unwrap();
        assert_eq!(target.path, "/helpOfferDetails");
        assert_eq!(target.params, params(&[("offerId", "h1")]));
    }

    #[test]
    fn numeric_ids_are_stringified() {
        let target = build(json!({"screen": "jobDetails", "data": {"jobId": 77}})).unwrap();
        assert_eq!(target.params, params(&[("offerId", "77")]));
    }

    #[test]
    fn chat_collects_present_fields() {
        let target = build(json!({
            "screen": "chat",
            "data": {"userId": "me", "receiverId": "u1", "name": "Ada", "avatar": null, "extra": "x"}
        }))
        .unwrap();
        assert_eq!(target.path, "/chat");
        assert_eq!(
            target.params,
            params(&[("userId", "me"), ("receiverId", "u1"), ("name", "Ada")])
        );
    }

    #[test]
    fn unknown_screen_resolves_to_fallback() {
        let target = build(json!({"screen": "unknownFutureScreen", "data": {"x": 1}})).unwrap();
        assert_eq!(target, RouteTarget::bare(DEFAULT_FALLBACK_PATH));
    }

    #[test]
    fn configured_fallback_is_used() {
        let builder = RouteBuilder::new("/(tabs)/explore");
        let payload = normalize_value(&json!({"screen": "leaderboard"})).unwrap();
        assert_eq!(builder.build(&payload).unwrap().path, "/(tabs)/explore");
        assert_eq!(RouteBuilder::new("").fallback().path, DEFAULT_FALLBACK_PATH);
    }

    #[test]
    fn entity_screen_without_id_fails() {
        let err = build(json!({"screen": "jobDetails", "data": {"title": "x"}})).unwrap_err();
        assert!(matches!(err, NotificationError::MissingIdentifier { .. }));
        assert!(err.to_string().contains("offerId, jobId, _id"));
    }
}
