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

use crate::operation::{FieldSpec, OperationDescriptor};

pub(super) fn channel_id() -> FieldSpec {
    FieldSpec::string("channel_id")
        .required()
        .describe("Channel ID (cha_...)")
}

pub(super) fn operations() -> Vec<OperationDescriptor> {
    vec![
        OperationDescriptor::get("get_message", "/messages/{message_id}")
            .describe("Fetch a message by ID")
            .field(
                FieldSpec::string("message_id")
                    .required()
                    .describe("Message ID (msg_...)"),
            ),
        // 202 Accepted: message_uid is provisional until the send completes
        OperationDescriptor::post("create_message", "/channels/{channel_id}/messages")
            .describe(
                "Send a new message from a channel, starting a new conversation. \
                 The API answers 202 Accepted with a provisional message_uid; \
                 the final message ID is not immediately resolvable.",
            )
            .field(channel_id())
            .field(
                FieldSpec::strings("to")
                    .required()
                    .describe("Recipient handles"),
            )
            .field(FieldSpec::string("body").required().describe("Message body (HTML or text)"))
            .field(FieldSpec::string("subject").describe("Message subject"))
            .field(FieldSpec::strings("cc").describe("CC recipient handles"))
            .field(FieldSpec::strings("bcc").describe("BCC recipient handles"))
            .field(FieldSpec::string("author_id").describe("Teammate ID sending the message"))
            .field(FieldSpec::string("sender_name").describe("Display name of the sender")),
        OperationDescriptor::post(
            "receive_custom_message",
            "/channels/{channel_id}/incoming_messages",
        )
        .describe("Import an inbound message into a custom channel")
        .field(channel_id())
        .field(
            FieldSpec::object("sender")
                .required()
                .describe("Sender object with handle and optional name"),
        )
        .field(FieldSpec::string("body").required().describe("Message body"))
        .field(FieldSpec::string("subject").describe("Message subject"))
        .field(FieldSpec::object("metadata").describe("Thread and headers metadata")),
    ]
}
