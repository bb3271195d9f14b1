//! Message and inbox handler implementations

use crate::daemon::types::ReadInboxRequest;
use crate::daemon::DaemonResult;
use crate::error::{DaemonContext, ToolResult};
use crate::params::{ReadInboxParams, SendMessageParams};
use crate::protocol::{build_envelope, MessageDraft, MessageEnvelope};
use crate::session::Session;
use crate::types::{InboxRead, MessageSent};

use super::{require, LEAD_NAME};

const SEND_PATH: &str = "/internal/messages/send";

/// Route a message, or forward a handshake response with its request id
pub async fn send_message(session: &Session, params: SendMessageParams) -> ToolResult<MessageSent> {
    let team = require("team", &params.team)?;

    let envelope = build_envelope(
        &team,
        MessageDraft {
            message_type: params.message_type,
            sender: params.sender.unwrap_or_else(|| LEAD_NAME.to_string()),
            recipient: params.recipient,
            summary: params.summary,
            content: params.content,
            request_id: params.request_id,
            approve: params.approve,
        },
    )?;

    deliver(session, &envelope).await.context(format!(
        "failed to send {} in team \"{}\"",
        envelope.message_type, team
    ))?;

    tracing::debug!(
        team = %team,
        message_type = %envelope.message_type,
        to = ?envelope.to_name,
        "message sent"
    );

    Ok(MessageSent {
        team,
        message_type: envelope.message_type,
        sender: envelope.from_name,
        recipient: envelope.to_name,
        request_id: envelope.payload_json.and_then(|p| p.request_id),
    })
}

/// Mark a member's unread messages as read
///
/// `unread_only` and `mark_as_read` are accepted but the daemon always marks
/// every unread message.
pub async fn read_inbox(session: &Session, params: ReadInboxParams) -> ToolResult<InboxRead> {
    let team = require("team", &params.team)?;
    let member = require("member", &params.member)?;

    if params.unread_only == Some(false) || params.mark_as_read == Some(false) {
        tracing::debug!(team = %team, member = %member, "inbox flags ignored, marking all unread as read");
    }

    session
        .client()
        .send(
            "/internal/inbox/read",
            &ReadInboxRequest {
                team: team.clone(),
                member_name: member.clone(),
            },
        )
        .await
        .context(format!("failed to read inbox of \"{}\" in team \"{}\"", member, team))?;

    Ok(InboxRead {
        team,
        member,
        marked_read: true,
    })
}

pub(super) async fn deliver(session: &Session, envelope: &MessageEnvelope) -> DaemonResult<()> {
    session.client().send(SEND_PATH, envelope).await.map(|_| ())
}
