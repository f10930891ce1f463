//! MCP Tool definitions and handlers
//!
//! Defines the closed set of mock tools, the registry that exposes them and
//! their handler implementations. Handlers never perform I/O; they return
//! canned or lightly templated data.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{McpError, Result};
use crate::mcp::types::{CallToolResult, Tool};

/// Names of every tool the endpoint knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    GetProfile,
    CreatePost,
    SearchOrganizations,
    SendMessage,
}

impl ToolName {
    /// All tools, in listing order
    pub const ALL: [ToolName; 4] = [
        ToolName::GetProfile,
        ToolName::CreatePost,
        ToolName::SearchOrganizations,
        ToolName::SendMessage,
    ];

    /// Wire name of the tool
    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::GetProfile => "get_profile",
            ToolName::CreatePost => "create_post",
            ToolName::SearchOrganizations => "search_organizations",
            ToolName::SendMessage => "send_message",
        }
    }

    /// Descriptor advertised by `tools/list`
    pub fn descriptor(self) -> Tool {
        match self {
            ToolName::GetProfile => tool_def(
                self,
                "Retrieves the authenticated member's profile",
                get_profile_schema(),
            ),
            ToolName::CreatePost => tool_def(
                self,
                "Publishes a new post to the member's feed",
                create_post_schema(),
            ),
            ToolName::SearchOrganizations => tool_def(
                self,
                "Searches organizations by name",
                search_organizations_schema(),
            ),
            ToolName::SendMessage => tool_def(
                self,
                "Sends a direct message to another member",
                send_message_schema(),
            ),
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = McpError;

    fn from_str(name: &str) -> std::result::Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == name)
            .ok_or_else(|| McpError::ToolNotFound {
                name: name.to_string(),
            })
    }
}

/// Immutable set of tools exposed by a server
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    entries: Vec<(ToolName, Tool)>,
}

impl ToolRegistry {
    /// Registry containing the given tools, in the given order.
    /// Duplicates are ignored.
    pub fn new(tools: impl IntoIterator<Item = ToolName>) -> Self {
        let mut entries: Vec<(ToolName, Tool)> = Vec::new();
        for tool in tools {
            if !entries.iter().any(|(name, _)| *name == tool) {
                entries.push((tool, tool.descriptor()));
            }
        }
        Self { entries }
    }

    /// Registry containing every mock tool
    pub fn builtin() -> Self {
        Self::new(ToolName::ALL)
    }

    /// List all registered tools
    pub fn list_tools(&self) -> Vec<Tool> {
        self.entries.iter().map(|(_, tool)| tool.clone()).collect()
    }

    /// Resolve a wire name against the registered set
    pub fn lookup(&self, name: &str) -> Result<ToolName> {
        let tool: ToolName = name.parse()?;
        if self.entries.iter().any(|(registered, _)| *registered == tool) {
            Ok(tool)
        } else {
            Err(McpError::ToolNotFound {
                name: name.to_string(),
            }
            .into())
        }
    }

    /// Call a tool by name
    pub async fn call_tool(&self, name: &str, args: Value) -> Result<CallToolResult> {
        let tool = self.lookup(name)?;
        tracing::debug!(tool = %tool, "invoking mock tool");
        let output = invoke(tool, args).await?;
        CallToolResult::json(&output)
    }
}

/// Run a tool's handler and return its plain result object
pub async fn invoke(tool: ToolName, args: Value) -> Result<Value> {
    match tool {
        ToolName::GetProfile => handle_get_profile().await,
        ToolName::CreatePost => handle_create_post(parse_args(args)?).await,
        ToolName::SearchOrganizations => handle_search_organizations(parse_args(args)?).await,
        ToolName::SendMessage => handle_send_message(parse_args(args)?).await,
    }
}

fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T> {
    // A missing arguments object behaves like an empty one.
    let args = if args.is_null() { json!({}) } else { args };
    serde_json::from_value(args).map_err(|e| {
        McpError::InvalidArguments {
            message: e.to_string(),
        }
        .into()
    })
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

// ==================== Tool Handlers ====================

async fn handle_get_profile() -> Result<Value> {
    Ok(json!({
        "id": "mock-member-001",
        "firstName": "Jordan",
        "lastName": "Rivera",
        "headline": "Product Engineer at Mockingbird Labs",
        "vanityName": "jordan-rivera",
        "profileUrl": "https://www.example.com/in/jordan-rivera",
        "retrievedAt": now_rfc3339(),
    }))
}

/// Post visibility accepted by `create_post`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    #[default]
    Public,
    Connections,
}

impl Visibility {
    fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "PUBLIC",
            Visibility::Connections => "CONNECTIONS",
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreatePostArgs {
    text: String,
    #[serde(default)]
    visibility: Visibility,
}

async fn handle_create_post(args: CreatePostArgs) -> Result<Value> {
    Ok(json!({
        "id": format!("urn:li:share:{}", uuid::Uuid::new_v4()),
        "status": "PUBLISHED",
        "visibility": args.visibility.as_str(),
        "text": args.text,
        "createdAt": now_rfc3339(),
    }))
}

#[derive(Debug, Deserialize)]
struct SearchOrganizationsArgs {
    query: String,
}

async fn handle_search_organizations(args: SearchOrganizationsArgs) -> Result<Value> {
    let slug = args
        .query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();

    Ok(json!({
        "query": args.query,
        "total": 1,
        "results": [
            {
                "id": "urn:li:organization:1000001",
                "name": format!("{} Corporation", args.query),
                "vanityName": slug,
                "industry": "Software Development",
                "followerCount": 12840,
            }
        ],
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageArgs {
    recipient_id: String,
    text: String,
    subject: Option<String>,
}

async fn handle_send_message(args: SendMessageArgs) -> Result<Value> {
    let mut result = json!({
        "messageId": format!("msg-{}", uuid::Uuid::new_v4()),
        "recipientId": args.recipient_id,
        "status": "SENT",
        "sentAt": now_rfc3339(),
    });
    if let Some(subject) = args.subject {
        result["subject"] = Value::String(subject);
    }
    // The body is accepted but only its length is reported back.
    result["characterCount"] = json!(args.text.chars().count());
    Ok(result)
}

// ==================== Schema Definitions ====================

fn tool_def(name: ToolName, description: &str, schema: Value) -> Tool {
    Tool {
        name: name.as_str().to_string(),
        description: description.to_string(),
        input_schema: schema,
    }
}

fn get_profile_schema() -> Value {
    json!({
        "type": "object",
        "properties": {},
        "required": []
    })
}

fn create_post_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "text": {
                "type": "string",
                "description": "Body of the post"
            },
            "visibility": {
                "type": "string",
                "enum": ["PUBLIC", "CONNECTIONS"],
                "description": "Who can see the post (default: PUBLIC)"
            }
        },
        "required": ["text"]
    })
}

fn search_organizations_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": "Organization name to search for"
            }
        },
        "required": ["query"]
    })
}

fn send_message_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "recipientId": {
                "type": "string",
                "description": "ID of the member receiving the message"
            },
            "subject": {
                "type": "string",
                "description": "Optional subject line"
            },
            "text": {
                "type": "string",
                "description": "Message body"
            }
        },
        "required": ["recipientId", "text"]
    })
}
