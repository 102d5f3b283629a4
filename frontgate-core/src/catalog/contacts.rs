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

const HANDLE_SOURCES: &[&str] = &[
    "email",
    "phone",
    "twitter",
    "facebook",
    "intercom",
    "front_chat",
    "custom",
];

fn contact_id() -> FieldSpec {
    FieldSpec::string("contact_id")
        .required()
        .describe("Contact ID (crd_...)")
}

fn handle_fields(op: OperationDescriptor) -> OperationDescriptor {
    op.field(
        FieldSpec::string("handle")
            .required()
            .describe("Handle value, e.g. an email address or phone number"),
    )
    .field(
        FieldSpec::string("source")
            .required()
            .one_of(HANDLE_SOURCES)
            .describe("Source of the handle"),
    )
}

pub(super) fn operations() -> Vec<OperationDescriptor> {
    vec![
        OperationDescriptor::get("list_contacts", "/contacts")
            .describe("List contacts, optionally filtered by a search query")
            .field(FieldSpec::string("query").wire("q").describe("Contact search query"))
            .paginated(),
        OperationDescriptor::get("get_contact", "/contacts/{contact_id}")
            .describe("Fetch a contact by ID")
            .field(contact_id()),
        OperationDescriptor::post("create_contact", "/contacts")
            .describe("Create a contact")
            .field(
                FieldSpec::objects("handles")
                    .required()
                    .describe("Handles as objects with handle and source"),
            )
            .field(FieldSpec::string("name").describe("Contact name"))
            .field(FieldSpec::string("description").describe("Contact description"))
            .field(FieldSpec::strings("links").describe("URLs associated with the contact"))
            .field(FieldSpec::strings("group_names").describe("Contact groups to add the contact to")),
        OperationDescriptor::patch("update_contact", "/contacts/{contact_id}")
            .describe("Update a contact")
            .field(contact_id())
            .field(FieldSpec::string("name").describe("Contact name"))
            .field(FieldSpec::string("description").describe("Contact description"))
            .field(FieldSpec::strings("links").describe("URLs associated with the contact"))
            .field(FieldSpec::strings("group_names").describe("Contact groups"))
            .field(FieldSpec::boolean("is_spammer").describe("Mark the contact as a spammer")),
        OperationDescriptor::delete("delete_contact", "/contacts/{contact_id}")
            .describe("Delete a contact")
            .field(contact_id()),
        OperationDescriptor::post("merge_contacts", "/contacts/merge")
            .describe("Merge contacts into a single contact")
            .field(
                FieldSpec::strings("contact_ids")
                    .required()
                    .describe("Contact IDs to merge"),
            )
            .field(
                FieldSpec::string("target_contact_id")
                    .describe("Contact to merge into; defaults to the first of contact_ids"),
            ),
        OperationDescriptor::get(
            "list_contact_conversations",
            "/contacts/{contact_id}/conversations",
        )
        .describe("List the conversations of a contact")
        .field(contact_id())
        .paginated(),
        handle_fields(
            OperationDescriptor::post("add_contact_handle", "/contacts/{contact_id}/handles")
                .describe("Add a handle to a contact")
                .field(contact_id()),
        ),
        handle_fields(
            OperationDescriptor::delete("remove_contact_handle", "/contacts/{contact_id}/handles")
                .payload_in_body()
                .describe("Remove a handle from a contact")
                .field(contact_id()),
        )
        .field(
            FieldSpec::boolean("force")
                .describe("Delete the contact if this was its last handle"),
        ),
        OperationDescriptor::get("list_contact_notes", "/contacts/{contact_id}/notes")
            .describe("List the notes on a contact")
            .field(contact_id()),
        OperationDescriptor::post("add_contact_note", "/contacts/{contact_id}/notes")
            .describe("Add a note to a contact")
            .field(contact_id())
            .field(
                FieldSpec::string("author_id")
                    .required()
                    .describe("Teammate ID of the note author"),
            )
            .field(FieldSpec::string("body").required().describe("Note content")),
    ]
}
