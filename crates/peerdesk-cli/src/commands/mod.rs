pub mod inspect;
pub mod journal;
pub mod simulate;

use serde::Serialize;

#[derive(Serialize)]
pub struct CommandResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResult {
    pub fn from_run(result: Result<Option<serde_json::Value>, String>) -> Self {
        match result {
            Ok(data) => CommandResult {
                success: true,
                error: None,
                data,
            },
            Err(e) => {
                log::warn!("{}", e);
                CommandResult {
                    success: false,
                    error: Some(e),
                    data: None,
                }
            }
        }
    }
}

/// Serializes a CommandResult as JSON and writes it to stdout
pub fn emit_result(result: CommandResult) {
    println!(
        "{}",
        serde_json::to_string(&result).unwrap_or_else(|_| r#"{"success":false}"#.to_string())
    );
}
