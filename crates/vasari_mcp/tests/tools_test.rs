//! Tests for tool dispatch over an in-memory Discord directory.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use mcp_spec::handler::ToolError;
use serde_json::{Value, json};
use std::sync::Arc;
use vasari_discord::{
    Channel, ChannelKind, MemoryDirectory, Message, Server, Snowflake, Thread, to_iso8601,
};
use vasari_mcp::{McpError, Router, ToolRegistry, VasariRouter};

fn since() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn message(channel: u64, offset_secs: i64, seq: u64) -> Message {
    let instant = since() + TimeDelta::seconds(offset_secs);
    Message::new(
        Snowflake::from_parts(instant, seq),
        channel,
        "alice#0001",
        format!("message {seq}"),
    )
}

fn directory() -> MemoryDirectory {
    let directory = MemoryDirectory::new()
        .with_server(Server::new(1u64, "Test Guild"))
        .with_channel(Channel::new(10u64, 1u64, "general", ChannelKind::Text).with_position(0))
        .with_channel(Channel::new(11u64, 1u64, "random", ChannelKind::Text).with_position(1))
        .with_channel(Channel::new(20u64, 1u64, "ideas", ChannelKind::Forum).with_position(2))
        .with_thread(Thread::new(21u64, 20u64, "Roadmap"));
    let directory = (0..5).fold(directory, |d, i| d.with_message(message(10, 10 + i, i as u64)));
    let directory = (0..10).fold(directory, |d, i| d.with_message(message(11, 10 + i, i as u64)));
    let directory = (0..2).fold(directory, |d, i| d.with_message(message(21, -60 + i, i as u64)));
    (0..3).fold(directory, |d, i| d.with_message(message(21, 60 + i, 10 + i as u64)))
}

fn registry() -> ToolRegistry {
    ToolRegistry::discord(Arc::new(directory()))
}

#[test]
fn test_registry_lists_the_four_tools() {
    let names: Vec<String> = registry()
        .list()
        .iter()
        .map(|t| t.name().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "list-channels",
            "list-channels-with-new-messages",
            "read-messages",
            "send-message"
        ]
    );
}

#[test]
fn test_schemas_declare_required_fields() {
    let registry = registry();
    let required = |name: &str| registry.get(name).unwrap().input_schema()["required"].clone();
    assert_eq!(required("send-message"), json!(["channel", "message"]));
    assert_eq!(required("read-messages"), json!(["channel"]));
    assert_eq!(required("list-channels"), json!([]));
    assert_eq!(required("list-channels-with-new-messages"), json!(["since"]));
}

#[tokio::test]
async fn test_unknown_tool() {
    let err = registry().execute("delete-server", json!({})).await.unwrap_err();
    assert_eq!(err, McpError::ToolNotFound("delete-server".to_string()));
}

#[tokio::test]
async fn test_missing_and_mistyped_arguments_are_reported_together() {
    let err = registry()
        .execute("read-messages", json!({"server": 7, "limit": 0}))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid arguments: server: Expected string, received number, channel: Required, \
         limit: Number must be greater than or equal to 1"
    );
}

#[tokio::test]
async fn test_oversized_message_is_rejected_before_sending() {
    let directory = Arc::new(directory());
    let registry = ToolRegistry::discord(directory.clone());
    let err = registry
        .execute(
            "send-message",
            json!({"channel": "general", "message": "x".repeat(2001)}),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, McpError::InvalidInput(_)));
    assert_eq!(directory.messages_in(10u64).len(), 5);
}

#[tokio::test]
async fn test_send_message_result() {
    let directory = Arc::new(directory());
    let registry = ToolRegistry::discord(directory.clone());
    let result = registry
        .execute("send-message", json!({"channel": "#general", "message": "hi"}))
        .await
        .unwrap();

    assert_eq!(result["status"], "success");
    assert_eq!(result["channel"], "general");
    assert_eq!(result["server"], "Test Guild");
    let id: Snowflake = result["messageId"].as_str().unwrap().parse().unwrap();
    let stored = directory.messages_in(10u64);
    assert_eq!(stored.last().map(|m| m.id), Some(id));
}

#[tokio::test]
async fn test_read_messages_default_limit_and_order() {
    let result = registry()
        .execute("read-messages", json!({"channel": "random"}))
        .await
        .unwrap();
    let items = result.as_array().unwrap();
    assert_eq!(items.len(), 10);
    assert_eq!(items[0]["content"], "message 9");
    assert_eq!(items[9]["content"], "message 0");
    assert_eq!(items[0]["channel"], "#random");
}

#[tokio::test]
async fn test_read_messages_accepts_whole_float_limit() {
    let result = registry()
        .execute("read-messages", json!({"channel": "random", "limit": 3.0}))
        .await
        .unwrap();
    let items = result.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["content"], "message 9");
}

#[tokio::test]
async fn test_envelope_keys_keep_declaration_order() {
    let listing = registry()
        .execute("list-channels", Value::Null)
        .await
        .unwrap();
    let keys: Vec<&str> = listing
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, ["server", "serverId", "channels", "totalChannels"]);

    let messages = registry()
        .execute("read-messages", json!({"channel": "general", "limit": 1}))
        .await
        .unwrap();
    let keys: Vec<&str> = messages[0]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, ["channel", "server", "author", "content", "timestamp"]);
}

#[tokio::test]
async fn test_list_channels_result() {
    let result = registry()
        .execute("list-channels", Value::Null)
        .await
        .unwrap();
    assert_eq!(result["server"], "Test Guild");
    assert_eq!(result["totalChannels"], 3);
    assert_eq!(result["channels"][0]["lastMessage"]["content"], "message 4");
    assert_eq!(result["channels"][2]["threads"][0]["name"], "Roadmap");
}

#[tokio::test]
async fn test_new_messages_ranking_includes_forum_threads() {
    let result = registry()
        .execute(
            "list-channels-with-new-messages",
            json!({"since": to_iso8601(&since())}),
        )
        .await
        .unwrap();

    assert_eq!(result["totalChannelsWithNewMessages"], 3);
    let ranked: Vec<(String, u64)> = result["channels"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| {
            (
                c["name"].as_str().unwrap().to_string(),
                c["messageCount"].as_u64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("random".to_string(), 10),
            ("general".to_string(), 5),
            ("[Forum: ideas] Roadmap".to_string(), 3),
        ]
    );
}

#[tokio::test]
async fn test_bad_time_format_is_caller_facing() {
    let err = registry()
        .execute("list-channels-with-new-messages", json!({"since": "banana"}))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid time format \"banana\". Use ISO 8601 (e.g., \"2024-01-01T00:00:00Z\") \
         or relative time (e.g., \"1h\", \"24h\", \"7d\")"
    );
}

#[tokio::test]
async fn test_router_renders_pretty_json() {
    let router = VasariRouter::builder().tools(registry()).build();
    assert_eq!(router.list_tools().len(), 4);

    let content = router
        .call_tool("list-channels", json!({"server": "test guild"}))
        .await
        .unwrap();
    assert_eq!(content.len(), 1);
    let item = serde_json::to_value(&content[0]).unwrap();
    assert_eq!(item["type"], "text");
    let text = item["text"].as_str().unwrap();
    assert!(text.starts_with("{\n  \"server\": \"Test Guild\""), "{text}");
}

#[tokio::test]
async fn test_router_maps_errors() {
    let router = VasariRouter::builder().tools(registry()).build();

    let err = router.call_tool("nope", json!({})).await.unwrap_err();
    assert!(matches!(err, ToolError::NotFound(_)));

    let err = router
        .call_tool("read-messages", json!({"channel": "missing"}))
        .await
        .unwrap_err();
    match err {
        ToolError::ExecutionError(text) => assert!(
            text.starts_with("Channel \"missing\" not found in server \"Test Guild\""),
            "{text}"
        ),
        other => panic!("expected ExecutionError, got {other:?}"),
    }
}
