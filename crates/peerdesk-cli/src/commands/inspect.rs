use peerdesk_shared::active_view::ActiveViewRegistry;
use peerdesk_shared::normalize;
use peerdesk_shared::presentation::PresentationPolicy;
use peerdesk_shared::routes::RouteBuilder;

use super::{emit_result, CommandResult};

fn to_json<T: serde::Serialize>(value: &T) -> Result<Option<serde_json::Value>, String> {
    serde_json::to_value(value)
        .map(Some)
        .map_err(|e| format!("Failed to serialize result: {}", e))
}

pub fn run_normalize(json: &str) -> Result<Option<serde_json::Value>, String> {
    let payload = normalize::normalize_str(json).map_err(|e| e.to_string())?;
    to_json(&payload)
}

pub fn run_route(json: &str, routes: &RouteBuilder) -> Result<Option<serde_json::Value>, String> {
    let payload = normalize::normalize_str(json).map_err(|e| e.to_string())?;
    let target = routes.build(&payload).map_err(|e| e.to_string())?;
    to_json(&target)
}

pub fn run_present(json: &str, active: Option<&str>) -> Result<Option<serde_json::Value>, String> {
    let raw: serde_json::Value =
        serde_json::from_str(json).map_err(|e| format!("Failed to parse JSON: {}", e))?;
    let registry = ActiveViewRegistry::new();
    registry.set_active(active);
    let presentation = PresentationPolicy::new(registry).decide(&raw);
    to_json(&presentation)
}

pub fn handle_normalize(json: &str) {
    emit_result(CommandResult::from_run(run_normalize(json)));
}

pub fn handle_route(json: &str, routes: &RouteBuilder) {
    emit_result(CommandResult::from_run(run_route(json, routes)));
}

pub fn handle_present(json: &str, active: Option<&str>) {
    emit_result(CommandResult::from_run(run_present(json, active)));
}
