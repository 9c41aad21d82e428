//! Tool builder and agent dispatch for memefetch

use crate::client::FetchOptions;
use crate::detail::fetch_detail;
use crate::error::ScrapeError;
use crate::listing::fetch_listing;
use crate::types::{
    Action, ListingOutcome, MemeDetailsParams, NewestMemesParams, PageFetchResult, ToolCall,
    ToolData, ToolResponse, DEFAULT_LIMIT,
};
use crate::{TOOL_DESCRIPTION, TOOL_LLMTXT, TOOL_NAME};
use schemars::{schema_for, JsonSchema};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Builder for configuring the meme tool
#[derive(Debug, Clone, Default)]
pub struct ToolBuilder {
    options: FetchOptions,
}

impl ToolBuilder {
    /// Create a new tool builder targeting the public site
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the site origin (scheme and host, no trailing path)
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.options.origin = origin.into();
        self
    }

    /// Set custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.options.user_agent = Some(ua.into());
        self
    }

    /// Set a total request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    /// Build the tool
    pub fn build(self) -> Tool {
        Tool {
            options: self.options,
        }
    }
}

/// Configured meme tool
#[derive(Debug, Clone, Default)]
pub struct Tool {
    options: FetchOptions,
}

impl Tool {
    /// Create a new tool builder
    pub fn builder() -> ToolBuilder {
        ToolBuilder::new()
    }

    /// Fetch options in effect
    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Get tool name
    pub fn name(&self) -> &'static str {
        TOOL_NAME
    }

    /// Get tool description
    pub fn description(&self) -> &'static str {
        TOOL_DESCRIPTION
    }

    /// Get full documentation (llmtxt)
    pub fn llmtxt(&self) -> &'static str {
        TOOL_LLMTXT
    }

    /// Newest memes, default `include_html_on_empty` off
    pub async fn get_newest_memes(&self, limit: usize) -> ListingOutcome {
        fetch_listing(limit, false, &self.options).await
    }

    /// Newest memes with the raw-HTML diagnostic on empty results
    pub async fn get_newest_memes_with_html(&self, limit: usize) -> ListingOutcome {
        fetch_listing(limit, true, &self.options).await
    }

    /// HTML of one meme page
    pub async fn get_meme_details(&self, url: &str) -> PageFetchResult {
        fetch_detail(url, &self.options).await
    }

    /// Run an action by name and wrap the result in a status envelope
    ///
    /// Validation failures are reported before any request is made.
    pub async fn dispatch(&self, action: &str, params: &Value) -> ToolResponse {
        debug!(action, "dispatch");
        let action = match action.parse::<Action>() {
            Ok(action) => action,
            Err(err) => return ToolResponse::error(&err),
        };

        match action {
            Action::GetNewestMemes => match parse_limit(params) {
                Ok(limit) => ToolResponse::Success {
                    data: ToolData::Memes(self.get_newest_memes(limit).await),
                },
                Err(err) => ToolResponse::error(&err),
            },
            Action::GetMemeDetails => match parse_url(params) {
                Ok(url) => ToolResponse::Success {
                    data: ToolData::Page(self.get_meme_details(url).await),
                },
                Err(err) => ToolResponse::error(&err),
            },
        }
    }

    /// Dispatch a typed tool call
    pub async fn call(&self, call: &ToolCall) -> ToolResponse {
        self.dispatch(&call.action, &call.params).await
    }

    /// Function definitions in the OpenAI function-calling format
    pub fn tool_definitions(&self) -> Value {
        json!([
            function_definition::<NewestMemesParams>(
                Action::GetNewestMemes,
                "Get the newest memes from Know Your Meme",
            ),
            function_definition::<MemeDetailsParams>(
                Action::GetMemeDetails,
                "Get details for a specific meme",
            ),
        ])
    }

    /// Single-tool schema taking an `action` and its `params`
    pub fn dispatch_schema(&self) -> Value {
        let actions: Vec<&str> = Action::ALL.iter().map(Action::as_str).collect();
        json!({
            "name": TOOL_NAME,
            "description": TOOL_DESCRIPTION,
            "schema": {
                "type": "object",
                "properties": {
                    "action": {
                        "type": "string",
                        "enum": actions,
                        "description": "The action to perform"
                    },
                    "params": {
                        "type": "object",
                        "description": "Parameters for the action"
                    }
                },
                "required": ["action"]
            }
        })
    }

    /// JSON schema of the parameters of one action
    pub fn input_schema(&self, action: Action) -> Value {
        match action {
            Action::GetNewestMemes => parameters_schema::<NewestMemesParams>(),
            Action::GetMemeDetails => parameters_schema::<MemeDetailsParams>(),
        }
    }

    /// JSON schema of the detail result
    pub fn output_schema(&self) -> Value {
        let schema = schema_for!(PageFetchResult);
        serde_json::to_value(schema).unwrap_or_default()
    }
}

fn parameters_schema<T: JsonSchema>() -> Value {
    let schema = schema_for!(T);
    let mut value = serde_json::to_value(schema).unwrap_or_default();
    if let Some(obj) = value.as_object_mut() {
        obj.remove("$schema");
        obj.remove("title");
        obj.entry("required").or_insert_with(|| json!([]));
    }
    value
}

fn function_definition<T: JsonSchema>(action: Action, description: &str) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": action.as_str(),
            "description": description,
            "parameters": parameters_schema::<T>()
        }
    })
}

/// `limit` defaults to 5 and must be a positive integer when present
fn parse_limit(params: &Value) -> Result<usize, ScrapeError> {
    match params.get("limit") {
        None | Some(Value::Null) => Ok(DEFAULT_LIMIT),
        Some(value) => value
            .as_u64()
            .filter(|n| *n > 0)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| {
                ScrapeError::InvalidParams("limit must be a positive integer".to_string())
            }),
    }
}

/// `url` must be a non-empty string
fn parse_url(params: &Value) -> Result<&str, ScrapeError> {
    params
        .get("url")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .ok_or(ScrapeError::MissingUrl)
}
