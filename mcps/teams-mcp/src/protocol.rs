//! Message envelopes sent through `/internal/messages/send`
//!
//! Shutdown and plan-approval handshakes are owned by the daemon: it mints
//! the request id when the request is stored and resolves it when a response
//! carrying the same id arrives. Here the id is an opaque token that is
//! checked for shape and forwarded verbatim; nothing is remembered between
//! calls.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Message kinds understood by the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// Direct message to one member
    Message,
    /// Message to every other member of the team
    Broadcast,
    ShutdownRequest,
    ShutdownResponse,
    PlanApprovalResponse,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Message => "message",
            MessageType::Broadcast => "broadcast",
            MessageType::ShutdownRequest => "shutdown_request",
            MessageType::ShutdownResponse => "shutdown_response",
            MessageType::PlanApprovalResponse => "plan_approval_response",
        }
    }

    /// Responses answer a daemon-issued request and must name it
    pub fn is_response(&self) -> bool {
        matches!(
            self,
            MessageType::ShutdownResponse | MessageType::PlanApprovalResponse
        )
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Envelope validation failures, raised before any network call
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("recipient is required for message type \"{0}\"")]
    MissingRecipient(MessageType),

    #[error("sender must not be empty")]
    EmptySender,

    #[error("request_id must be a non-empty string")]
    EmptyRequestId,

    #[error("request_id is required for message type \"{0}\"")]
    MissingRequestId(MessageType),
}

/// Correlation payload pairing a response with its request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Correlation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approve: Option<bool>,
}

/// Unvalidated message fields as supplied by the caller
#[derive(Debug, Clone)]
pub struct MessageDraft {
    pub message_type: MessageType,
    pub sender: String,
    pub recipient: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub request_id: Option<String>,
    pub approve: Option<bool>,
}

/// Validated body for `/internal/messages/send`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEnvelope {
    pub team: String,
    pub from_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_name: Option<String>,
    pub message_type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_json: Option<Correlation>,
}

pub fn build_envelope(team: &str, draft: MessageDraft) -> Result<MessageEnvelope, ProtocolError> {
    let MessageDraft {
        message_type,
        sender,
        recipient,
        summary,
        content,
        request_id,
        approve,
    } = draft;

    let sender = sender.trim().to_string();
    if sender.is_empty() {
        return Err(ProtocolError::EmptySender);
    }

    let recipient = recipient
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    let to_name = match message_type {
        MessageType::Broadcast => None,
        MessageType::Message => {
            Some(recipient.ok_or(ProtocolError::MissingRecipient(message_type))?)
        }
        _ => recipient,
    };

    if request_id.as_deref().is_some_and(|id| id.trim().is_empty()) {
        return Err(ProtocolError::EmptyRequestId);
    }
    if message_type.is_response() && request_id.is_none() {
        return Err(ProtocolError::MissingRequestId(message_type));
    }

    let payload_json = if request_id.is_some() || approve.is_some() {
        Some(Correlation {
            request_id,
            approve,
        })
    } else {
        None
    };

    Ok(MessageEnvelope {
        team: team.to_string(),
        from_name: sender,
        to_name,
        message_type,
        summary,
        content_text: content,
        payload_json,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(message_type: MessageType) -> MessageDraft {
        MessageDraft {
            message_type,
            sender: "team-lead".into(),
            recipient: None,
            summary: None,
            content: None,
            request_id: None,
            approve: None,
        }
    }

    #[test]
    fn test_message_requires_recipient() {
        let mut d = draft(MessageType::Message);
        d.recipient = Some("  ".into());
        assert_eq!(
            build_envelope("proj", d).unwrap_err(),
            ProtocolError::MissingRecipient(MessageType::Message)
        );
    }

    #[test]
    fn test_broadcast_drops_recipient() {
        let mut d = draft(MessageType::Broadcast);
        d.recipient = Some("bob".into());
        d.content = Some("standup".into());

        let envelope = build_envelope("proj", d).unwrap();
        let body = serde_json::to_value(&envelope).unwrap();
        assert!(body.get("toName").is_none());
        assert_eq!(body["messageType"], "broadcast");
        assert_eq!(body["contentText"], "standup");
    }

    #[test]
    fn test_correlation_omitted_when_not_supplied() {
        let mut d = draft(MessageType::Message);
        d.recipient = Some("alice".into());

        let body = serde_json::to_value(build_envelope("proj", d).unwrap()).unwrap();
        assert!(body.get("payloadJson").is_none());
    }

    #[test]
    fn test_correlation_forwarded_verbatim() {
        let mut d = draft(MessageType::ShutdownResponse);
        d.sender = "alice".into();
        d.request_id = Some("shutdown-42@alice".into());
        d.approve = Some(true);

        let body = serde_json::to_value(build_envelope("proj", d).unwrap()).unwrap();
        assert_eq!(
            body["payloadJson"],
            json!({"requestId": "shutdown-42@alice", "approve": true})
        );
        assert_eq!(body["fromName"], "alice");
    }

    #[test]
    fn test_approve_alone_builds_partial_payload() {
        let mut d = draft(MessageType::ShutdownRequest);
        d.recipient = Some("alice".into());
        d.approve = Some(false);

        let body = serde_json::to_value(build_envelope("proj", d).unwrap()).unwrap();
        assert_eq!(body["payloadJson"], json!({"approve": false}));
    }

    #[test]
    fn test_response_requires_request_id() {
        let mut d = draft(MessageType::PlanApprovalResponse);
        d.approve = Some(true);
        assert_eq!(
            build_envelope("proj", d).unwrap_err(),
            ProtocolError::MissingRequestId(MessageType::PlanApprovalResponse)
        );
    }

    #[test]
    fn test_blank_request_id_rejected() {
        let mut d = draft(MessageType::ShutdownResponse);
        d.request_id = Some(" ".into());
        assert_eq!(
            build_envelope("proj", d).unwrap_err(),
            ProtocolError::EmptyRequestId
        );
    }

    #[test]
    fn test_empty_sender_rejected() {
        let mut d = draft(MessageType::Broadcast);
        d.sender = String::new();
        assert_eq!(build_envelope("proj", d).unwrap_err(), ProtocolError::EmptySender);
    }
}
