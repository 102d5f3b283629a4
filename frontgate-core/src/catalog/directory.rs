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

//! Teammates, tags, inboxes, channels, links and comments.

use crate::operation::{FieldSpec, OperationDescriptor};

const TAG_HIGHLIGHTS: &[&str] = &[
    "grey",
    "pink",
    "red",
    "orange",
    "yellow",
    "green",
    "light-blue",
    "blue",
    "purple",
];

fn id(name: &str, prefix: &str, what: &str) -> FieldSpec {
    FieldSpec::string(name)
        .required()
        .describe(format!("{} ID ({}_...)", what, prefix))
}

fn teammates() -> Vec<OperationDescriptor> {
    vec![
        OperationDescriptor::get("list_teammates", "/teammates")
            .describe("List all teammates in the company"),
        OperationDescriptor::get("get_teammate", "/teammates/{teammate_id}")
            .describe("Fetch a teammate by ID")
            .field(id("teammate_id", "tea", "Teammate")),
        OperationDescriptor::patch("update_teammate", "/teammates/{teammate_id}")
            .describe("Update a teammate's profile or availability")
            .field(id("teammate_id", "tea", "Teammate"))
            .field(FieldSpec::string("username").describe("New username"))
            .field(FieldSpec::string("first_name").describe("First name"))
            .field(FieldSpec::string("last_name").describe("Last name"))
            .field(FieldSpec::boolean("is_available").describe("Whether the teammate is available")),
        OperationDescriptor::get(
            "list_teammate_conversations",
            "/teammates/{teammate_id}/conversations",
        )
        .describe("List the conversations assigned to a teammate")
        .field(id("teammate_id", "tea", "Teammate"))
        .paginated(),
        OperationDescriptor::get("get_me", "/me")
            .describe("Fetch the identity the API token belongs to"),
    ]
}

fn tags() -> Vec<OperationDescriptor> {
    let highlight = || {
        FieldSpec::string("highlight")
            .one_of(TAG_HIGHLIGHTS)
            .describe("Tag color")
    };
    let visible = || {
        FieldSpec::boolean("is_visible_in_conversation_lists")
            .describe("Show the tag in conversation lists")
    };

    vec![
        OperationDescriptor::get("list_tags", "/tags")
            .describe("List the company tags")
            .paginated(),
        OperationDescriptor::get("get_tag", "/tags/{tag_id}")
            .describe("Fetch a tag by ID")
            .field(id("tag_id", "tag", "Tag")),
        OperationDescriptor::post("create_tag", "/tags")
            .describe("Create a company tag")
            .field(FieldSpec::string("name").required().describe("Tag name"))
            .field(highlight())
            .field(visible()),
        OperationDescriptor::patch("update_tag", "/tags/{tag_id}")
            .describe("Update a tag")
            .field(id("tag_id", "tag", "Tag"))
            .field(FieldSpec::string("name").describe("Tag name"))
            .field(highlight())
            .field(visible()),
        OperationDescriptor::delete("delete_tag", "/tags/{tag_id}")
            .describe("Delete a tag")
            .field(id("tag_id", "tag", "Tag")),
        OperationDescriptor::get("list_tag_conversations", "/tags/{tag_id}/conversations")
            .describe("List the conversations carrying a tag")
            .field(id("tag_id", "tag", "Tag"))
            .paginated(),
    ]
}

fn inboxes_and_channels() -> Vec<OperationDescriptor> {
    vec![
        OperationDescriptor::get("list_inboxes", "/inboxes")
            .describe("List the company inboxes"),
        OperationDescriptor::get("get_inbox", "/inboxes/{inbox_id}")
            .describe("Fetch an inbox by ID")
            .field(id("inbox_id", "inb", "Inbox")),
        OperationDescriptor::get("list_inbox_channels", "/inboxes/{inbox_id}/channels")
            .describe("List the channels of an inbox")
            .field(id("inbox_id", "inb", "Inbox")),
        OperationDescriptor::get("list_inbox_conversations", "/inboxes/{inbox_id}/conversations")
            .describe("List the conversations in an inbox")
            .field(id("inbox_id", "inb", "Inbox"))
            .field(FieldSpec::string("query").wire("q").describe("Conversation filter query"))
            .paginated(),
        OperationDescriptor::get("list_channels", "/channels")
            .describe("List the company channels"),
        OperationDescriptor::get("get_channel", "/channels/{channel_id}")
            .describe("Fetch a channel by ID")
            .field(id("channel_id", "cha", "Channel")),
    ]
}

fn links_and_comments() -> Vec<OperationDescriptor> {
    vec![
        OperationDescriptor::get("list_links", "/links")
            .describe("List links")
            .paginated(),
        OperationDescriptor::get("get_link", "/links/{link_id}")
            .describe("Fetch a link by ID")
            .field(id("link_id", "top", "Link")),
        OperationDescriptor::post("create_link", "/links")
            .describe("Create a link to an external resource")
            .field(FieldSpec::string("name").required().describe("Link name"))
            .field(
                FieldSpec::string("external_url")
                    .required()
                    .describe("URL of the external resource"),
            ),
        OperationDescriptor::patch("update_link", "/links/{link_id}")
            .describe("Rename a link")
            .field(id("link_id", "top", "Link"))
            .field(FieldSpec::string("name").describe("Link name")),
        OperationDescriptor::get("list_link_conversations", "/links/{link_id}/conversations")
            .describe("List the conversations linked to a link")
            .field(id("link_id", "top", "Link"))
            .paginated(),
        OperationDescriptor::get("get_comment", "/comments/{comment_id}")
            .describe("Fetch a comment by ID")
            .field(id("comment_id", "com", "Comment")),
    ]
}

pub(super) fn operations() -> Vec<OperationDescriptor> {
    let mut operations = teammates();
    operations.extend(tags());
    operations.extend(inboxes_and_channels());
    operations.extend(links_and_comments());
    operations
}
