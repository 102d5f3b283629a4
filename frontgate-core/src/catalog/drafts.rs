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

//! Draft operations.
//!
//! Edits and deletes carry the draft's current `version`; a stale version is
//! answered with 409 and surfaces as a version conflict, not "not found".

use super::conversations::conversation_id;
use super::messages::channel_id;
use crate::operation::{FieldSpec, OperationDescriptor};

const DRAFT_MODES: &[&str] = &["private", "shared"];

fn draft_id() -> FieldSpec {
    FieldSpec::string("draft_id")
        .required()
        .describe("Draft ID (msg_...)")
}

fn version() -> FieldSpec {
    FieldSpec::string("version")
        .required()
        .describe("Current draft version, as returned when the draft was fetched")
}

fn mode() -> FieldSpec {
    FieldSpec::string("mode")
        .one_of(DRAFT_MODES)
        .describe("private drafts are visible to the author only")
}

pub(super) fn operations() -> Vec<OperationDescriptor> {
    vec![
        OperationDescriptor::get(
            "list_conversation_drafts",
            "/conversations/{conversation_id}/drafts",
        )
        .describe("List the drafts in a conversation")
        .field(conversation_id()),
        OperationDescriptor::post("create_draft", "/channels/{channel_id}/drafts")
            .describe("Create a draft message that starts a new conversation")
            .field(channel_id())
            .field(FieldSpec::string("body").required().describe("Draft body"))
            .field(FieldSpec::strings("to").describe("Recipient handles"))
            .field(FieldSpec::strings("cc").describe("CC recipient handles"))
            .field(FieldSpec::strings("bcc").describe("BCC recipient handles"))
            .field(FieldSpec::string("subject").describe("Draft subject"))
            .field(FieldSpec::string("author_id").describe("Teammate ID of the author"))
            .field(mode()),
        OperationDescriptor::post("create_draft_reply", "/conversations/{conversation_id}/drafts")
            .describe("Create a draft reply in an existing conversation")
            .field(conversation_id())
            .field(
                FieldSpec::string("channel_id")
                    .required()
                    .describe("Channel the reply will be sent from"),
            )
            .field(FieldSpec::string("body").required().describe("Draft body"))
            .field(FieldSpec::string("author_id").describe("Teammate ID of the author"))
            .field(mode()),
        OperationDescriptor::patch("edit_draft", "/drafts/{draft_id}")
            .versioned()
            .describe("Edit a draft. Fails with a version conflict if the draft changed meanwhile.")
            .field(draft_id())
            .field(
                FieldSpec::string("channel_id")
                    .required()
                    .describe("Channel of the draft"),
            )
            .field(FieldSpec::string("body").required().describe("New draft body"))
            .field(version())
            .field(FieldSpec::string("author_id").describe("Teammate ID of the author"))
            .field(mode()),
        OperationDescriptor::delete("delete_draft", "/drafts/{draft_id}")
            .payload_in_body()
            .versioned()
            .describe("Delete a draft. Fails with a version conflict if the draft changed meanwhile.")
            .field(draft_id())
            .field(version()),
    ]
}
