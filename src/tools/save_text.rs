// ABOUTME: save_to_text tool — appends a line of text to a file on the local machine.
// ABOUTME: Creates the file on first use; never truncates existing content.

use std::fs::OpenOptions;
use std::io::Write;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::tools::{Tool, display_param, required_str, required_text};

pub const SAVE_TO_TEXT_TOOL_NAME: &str = "save_to_text";

/// Appends `data` followed by a newline to `filename`.
pub struct SaveToTextTool;

#[async_trait]
impl Tool for SaveToTextTool {
    fn name(&self) -> &str {
        SAVE_TO_TEXT_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Append text as a new line to a file"
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "filename": {
                    "type": "string",
                    "description": "Path of the file to append to"
                },
                "data": {
                    "type": "string",
                    "description": "Text to append"
                }
            },
            "required": ["filename", "data"]
        })
    }

    async fn execute(&self, params: Value) -> Result<String> {
        let filename = required_str(SAVE_TO_TEXT_TOOL_NAME, &params, "filename")?;
        let data = required_text(SAVE_TO_TEXT_TOOL_NAME, &params, "data")?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(filename)
            .map_err(|e| Error::tool(SAVE_TO_TEXT_TOOL_NAME, format!("{}: {}", filename, e)))?;
        writeln!(file, "{}", data)
            .map_err(|e| Error::tool(SAVE_TO_TEXT_TOOL_NAME, format!("{}: {}", filename, e)))?;

        Ok(format!("Saved {} bytes to {}", data.len() + 1, filename))
    }

    fn started_activity(&self, params: &Value) -> String {
        format!("💾 Saving to file: {}", display_param(params, "filename"))
    }

    fn finished_activity(&self) -> String {
        "✅ File saved successfully".to_string()
    }
}
