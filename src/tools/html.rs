// ABOUTME: create_html_file tool — writes a minimal static HTML page with a title and body.
// ABOUTME: Title and body are embedded verbatim; the caller is trusted to supply safe markup.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::tools::{Tool, display_param, required_str, required_text};

pub const CREATE_HTML_TOOL_NAME: &str = "create_html_file";

/// Writes (or overwrites) `filename` with an HTML document built from `title` and `data`.
pub struct CreateHtmlTool;

/// Render the page. No escaping is applied to either argument.
pub fn render_html(title: &str, data: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
</head>
<body>
    <h1>{title}</h1>
    <div>{data}</div>
</body>
</html>
"#
    )
}

#[async_trait]
impl Tool for CreateHtmlTool {
    fn name(&self) -> &str {
        CREATE_HTML_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Create an HTML page with a title and body content"
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "filename": {
                    "type": "string",
                    "description": "Path of the HTML file to write"
                },
                "title": {
                    "type": "string",
                    "description": "Page title, also used as the main heading"
                },
                "data": {
                    "type": "string",
                    "description": "HTML body content"
                }
            },
            "required": ["filename", "title", "data"]
        })
    }

    async fn execute(&self, params: Value) -> Result<String> {
        let filename = required_str(CREATE_HTML_TOOL_NAME, &params, "filename")?;
        let title = required_text(CREATE_HTML_TOOL_NAME, &params, "title")?;
        let data = required_text(CREATE_HTML_TOOL_NAME, &params, "data")?;

        std::fs::write(filename, render_html(&title, &data))
            .map_err(|e| Error::tool(CREATE_HTML_TOOL_NAME, format!("{}: {}", filename, e)))?;

        Ok(format!("Created {}", filename))
    }

    fn started_activity(&self, params: &Value) -> String {
        format!("🌐 Creating HTML file: {}", display_param(params, "filename"))
    }

    fn finished_activity(&self) -> String {
        "✅ HTML file created".to_string()
    }
}
