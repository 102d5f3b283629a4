// Copyright 2025 AgentReplay (https://github.com/agentreplay)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Conversation operations.

use crate::operation::{FieldSpec, HttpMethod, OperationDescriptor};

const CONVERSATION_STATUSES: &[&str] = &["archived", "open", "deleted", "spam"];

pub(super) fn conversation_id() -> FieldSpec {
    FieldSpec::string("conversation_id")
        .required()
        .describe("Conversation ID (cnv_...)")
}

fn recipients(name: &str, role: &str) -> FieldSpec {
    FieldSpec::strings(name).describe(format!("{} recipient handles", role))
}

pub(super) fn operations() -> Vec<OperationDescriptor> {
    vec![
        OperationDescriptor::get("list_conversations", "/conversations")
            .describe("List conversations in the company, most recently updated first")
            .paginated(),
        OperationDescriptor::get("search_conversations", "/conversations/search")
            .describe(
                "Search conversations with Front search syntax, e.g. \"status:open tag:urgent\"",
            )
            .field(
                FieldSpec::string("query")
                    .required()
                    .wire("q")
                    .describe("Search query"),
            )
            .paginated(),
        OperationDescriptor::get("get_conversation", "/conversations/{conversation_id}")
            .describe("Fetch a conversation by ID")
            .field(conversation_id()),
        OperationDescriptor::patch("update_conversation", "/conversations/{conversation_id}")
            .describe("Update a conversation's assignee, inbox, status or tags")
            .field(conversation_id())
            .field(FieldSpec::string("assignee_id").describe("Teammate ID to assign"))
            .field(FieldSpec::string("inbox_id").describe("Inbox ID to move the conversation to"))
            .field(
                FieldSpec::string("status")
                    .one_of(CONVERSATION_STATUSES)
                    .describe("New conversation status"),
            )
            .field(FieldSpec::strings("tag_ids").describe("Replace the conversation's tags")),
        OperationDescriptor::put(
            "update_conversation_assignee",
            "/conversations/{conversation_id}/assignee",
        )
        .describe("Assign or unassign a conversation")
        .field(conversation_id())
        .field(
            FieldSpec::string("assignee_id")
                .required()
                .describe("Teammate ID to assign, or empty string to unassign"),
        ),
        OperationDescriptor::get(
            "list_conversation_messages",
            "/conversations/{conversation_id}/messages",
        )
        .describe("List the messages in a conversation")
        .field(conversation_id())
        .paginated(),
        OperationDescriptor::get(
            "list_conversation_comments",
            "/conversations/{conversation_id}/comments",
        )
        .describe("List the internal comments on a conversation")
        .field(conversation_id()),
        OperationDescriptor::routed(
            HttpMethod::POST,
            "reply_to_conversation",
            "type",
            &[
                ("comment", "/conversations/{conversation_id}/comments"),
                ("reply", "/conversations/{conversation_id}/messages"),
            ],
        )
        .describe(
            "Add an internal comment (type=comment) or send a reply (type=reply) to a conversation. \
             Replies are queued: the API answers 202 with a provisional message_uid.",
        )
        .field(conversation_id())
        .field(
            FieldSpec::string("type")
                .required()
                .one_of(&["comment", "reply"])
                .describe("comment for an internal note, reply for an outbound message"),
        )
        .field(FieldSpec::string("body").required().describe("Message or comment body"))
        .field(FieldSpec::string("author_id").describe("Teammate ID of the author"))
        .field(FieldSpec::string("channel_id").describe("Channel to send the reply from"))
        .field(FieldSpec::string("subject").describe("Reply subject"))
        .field(recipients("to", "Primary"))
        .field(recipients("cc", "CC"))
        .field(recipients("bcc", "BCC")),
        OperationDescriptor::get(
            "list_conversation_events",
            "/conversations/{conversation_id}/events",
        )
        .describe("List the activity events of a conversation")
        .field(conversation_id())
        .paginated(),
        OperationDescriptor::get(
            "list_conversation_followers",
            "/conversations/{conversation_id}/followers",
        )
        .describe("List the teammates following a conversation")
        .field(conversation_id()),
        OperationDescriptor::post(
            "add_conversation_followers",
            "/conversations/{conversation_id}/followers",
        )
        .describe("Add teammates as followers of a conversation")
        .field(conversation_id())
        .field(
            FieldSpec::strings("teammate_ids")
                .required()
                .describe("Teammate IDs to add"),
        ),
        OperationDescriptor::delete(
            "remove_conversation_followers",
            "/conversations/{conversation_id}/followers",
        )
        .payload_in_body()
        .describe("Remove teammates from a conversation's followers")
        .field(conversation_id())
        .field(
            FieldSpec::strings("teammate_ids")
                .required()
                .describe("Teammate IDs to remove"),
        ),
        OperationDescriptor::post("add_conversation_tags", "/conversations/{conversation_id}/tags")
            .describe("Add tags to a conversation")
            .field(conversation_id())
            .field(FieldSpec::strings("tag_ids").required().describe("Tag IDs to add")),
        OperationDescriptor::delete(
            "remove_conversation_tags",
            "/conversations/{conversation_id}/tags",
        )
        .payload_in_body()
        .describe("Remove tags from a conversation")
        .field(conversation_id())
        .field(FieldSpec::strings("tag_ids").required().describe("Tag IDs to remove")),
        OperationDescriptor::post(
            "add_conversation_links",
            "/conversations/{conversation_id}/links",
        )
        .describe("Link a conversation to external links")
        .field(conversation_id())
        .field(FieldSpec::strings("link_ids").required().describe("Link IDs to add")),
        OperationDescriptor::delete(
            "remove_conversation_links",
            "/conversations/{conversation_id}/links",
        )
        .payload_in_body()
        .describe("Unlink external links from a conversation")
        .field(conversation_id())
        .field(FieldSpec::strings("link_ids").required().describe("Link IDs to remove")),
        OperationDescriptor::get(
            "list_conversation_inboxes",
            "/conversations/{conversation_id}/inboxes",
        )
        .describe("List the inboxes a conversation belongs to")
        .field(conversation_id()),
    ]
}
