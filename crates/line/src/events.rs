//! Inbound webhook event types.
//!
//! The platform delivers a batch of events per request. The event kind is a
//! closed tagged enum so every kind the bot understands is matched
//! exhaustively; kinds it does not understand (unfollow, join, sticker
//! messages, ...) deserialize into the catch-all variants and are ignored
//! without error.

use serde::Deserialize;

/// Top-level webhook request body: `{"events": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// Where an event came from. Group and room events carry no `userId`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventSource {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// The content of a `message` event.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum MessageContent {
    #[serde(rename = "text")]
    Text { text: String },
    /// Image, sticker, location, etc. The bot only reacts to text.
    #[serde(other)]
    Other,
}

/// The content of a `postback` event: an opaque data string set by the
/// message template that produced the button.
#[derive(Debug, Clone, Deserialize)]
pub struct PostbackContent {
    pub data: String,
}

/// One inbound event.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum WebhookEvent {
    #[serde(rename = "follow")]
    Follow {
        #[serde(rename = "replyToken")]
        reply_token: String,
        #[serde(default)]
        source: EventSource,
    },
    #[serde(rename = "message")]
    Message {
        #[serde(rename = "replyToken")]
        reply_token: String,
        #[serde(default)]
        source: EventSource,
        message: MessageContent,
    },
    #[serde(rename = "postback")]
    Postback {
        #[serde(rename = "replyToken")]
        reply_token: String,
        #[serde(default)]
        source: EventSource,
        postback: PostbackContent,
    },
    /// Any event kind the bot does not handle.
    #[serde(other)]
    Other,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_empty_batch() {
        let payload: WebhookPayload = serde_json::from_str(r#"{"events":[]}"#).unwrap();
        assert!(payload.events.is_empty());
    }

    #[test]
    fn missing_events_key_is_empty_batch() {
        let payload: WebhookPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.events.is_empty());
    }

    #[test]
    fn parses_follow_event() {
        let json = r#"{
            "events": [
                {"type": "follow", "replyToken": "rt-1", "source": {"type": "user", "userId": "U123"}}
            ]
        }"#;
        let payload: WebhookPayload = serde_json::from_str(json).unwrap();
        match &payload.events[0] {
            WebhookEvent::Follow { reply_token, source } => {
                assert_eq!(reply_token, "rt-1");
                assert_eq!(source.user_id.as_deref(), Some("U123"));
            }
            other => panic!("expected follow, got {other:?}"),
        }
    }

    #[test]
    fn parses_text_message_event() {
        let json = r#"{
            "events": [
                {
                    "type": "message",
                    "replyToken": "rt-2",
                    "source": {"type": "user", "userId": "U123"},
                    "message": {"type": "text", "id": "m1", "text": "Tanaka"}
                }
            ]
        }"#;
        let payload: WebhookPayload = serde_json::from_str(json).unwrap();
        match &payload.events[0] {
            WebhookEvent::Message { message: MessageContent::Text { text }, .. } => {
                assert_eq!(text, "Tanaka");
            }
            other => panic!("expected text message, got {other:?}"),
        }
    }

    #[test]
    fn non_text_message_content_is_other() {
        let json = r#"{
            "events": [
                {
                    "type": "message",
                    "replyToken": "rt-3",
                    "source": {"userId": "U123"},
                    "message": {"type": "sticker", "packageId": "1", "stickerId": "2"}
                }
            ]
        }"#;
        let payload: WebhookPayload = serde_json::from_str(json).unwrap();
        assert_matches!(
            &payload.events[0],
            WebhookEvent::Message { message: MessageContent::Other, .. }
        );
    }

    #[test]
    fn parses_postback_event() {
        let json = r#"{
            "events": [
                {
                    "type": "postback",
                    "replyToken": "rt-4",
                    "source": {"userId": "U123"},
                    "postback": {"data": "action=wake_up"}
                }
            ]
        }"#;
        let payload: WebhookPayload = serde_json::from_str(json).unwrap();
        match &payload.events[0] {
            WebhookEvent::Postback { postback, .. } => {
                assert_eq!(postback.data, "action=wake_up");
            }
            other => panic!("expected postback, got {other:?}"),
        }
    }

    #[test]
    fn unknown_event_kinds_fold_into_other() {
        let json = r#"{
            "events": [
                {"type": "unfollow", "source": {"userId": "U123"}},
                {"type": "join", "source": {"type": "group", "groupId": "G1"}}
            ]
        }"#;
        let payload: WebhookPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.events.len(), 2);
        for event in &payload.events {
            assert_matches!(event, WebhookEvent::Other);
        }
    }

    #[test]
    fn group_source_has_no_user_id() {
        let json = r#"{
            "events": [
                {"type": "follow", "replyToken": "rt-5", "source": {"type": "group", "groupId": "G1"}}
            ]
        }"#;
        let payload: WebhookPayload = serde_json::from_str(json).unwrap();
        match &payload.events[0] {
            WebhookEvent::Follow { source, .. } => assert!(source.user_id.is_none()),
            other => panic!("expected follow, got {other:?}"),
        }
    }
}
