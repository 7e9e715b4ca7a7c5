//! Atom feed and entry parsing.
//!
//! Hatena returns a `<feed>` for the collection and a bare `<entry>` for a
//! member. Both go through `atom_syndication`; a bare entry is wrapped in a
//! feed element first. Draft state lives in `app:control/app:draft`.

use std::str::FromStr;

use atom_syndication::{Entry as AtomEntry, Feed, extension::Extension};
use chrono::Utc;
use hatena_core::{Entry, EntryPage};

use super::error::AtomPubError;

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// Parse a collection page.
pub fn parse_feed(xml: &str) -> Result<EntryPage, AtomPubError> {
    let feed = Feed::from_str(xml).map_err(|e| AtomPubError::Parse(e.to_string()))?;

    let next_cursor = feed
        .links()
        .iter()
        .find(|link| link.rel() == "next")
        .map(|link| link.href().to_string());

    let entries = feed.entries().iter().filter_map(convert_entry).collect();

    Ok(EntryPage { entries, next_cursor })
}

/// Parse a member document (root element `<entry>`).
pub fn parse_entry(xml: &str) -> Result<Entry, AtomPubError> {
    let wrapped = format!("<feed xmlns=\"{ATOM_NS}\">{}</feed>", strip_xml_declaration(xml));
    let feed = Feed::from_str(&wrapped).map_err(|e| AtomPubError::Parse(e.to_string()))?;

    feed.entries()
        .first()
        .and_then(convert_entry)
        .ok_or_else(|| AtomPubError::Parse("document contains no entry".into()))
}

fn strip_xml_declaration(xml: &str) -> &str {
    let trimmed = xml.trim_start_matches('\u{feff}').trim_start();
    if trimmed.starts_with("<?xml")
        && let Some(end) = trimmed.find("?>")
    {
        return trimmed[end + 2..].trim_start();
    }
    trimmed
}

fn convert_entry(item: &AtomEntry) -> Option<Entry> {
    let Some(id) = member_id(item) else {
        tracing::warn!(atom_id = item.id(), "skipping entry without a usable id");
        return None;
    };

    let mut entry = Entry::new(id, item.title().as_str());

    if let Some(content) = item.content() {
        entry.body = content.value().unwrap_or_default().to_string();
        entry.content_type = content.content_type().map(|t| t.to_string());
    }

    for category in item.categories() {
        entry.add_category(category.term());
    }

    entry.draft = is_draft(item);
    entry.published = item.published().map(|d| d.with_timezone(&Utc));
    entry.updated = Some(item.updated().with_timezone(&Utc));
    entry.url = item
        .links()
        .iter()
        .find(|link| link.rel() == "alternate")
        .map(|link| link.href().to_string());

    Some(entry)
}

/// Member id: last segment of the edit link, else the suffix of the Atom id.
fn member_id(item: &AtomEntry) -> Option<String> {
    let from_edit = item
        .links()
        .iter()
        .find(|link| link.rel() == "edit")
        .and_then(|link| link.href().trim_end_matches('/').rsplit('/').next())
        .filter(|segment| !segment.is_empty());

    let from_atom_id = || {
        item.id()
            .rsplit(['-', '/'])
            .next()
            .filter(|segment| !segment.is_empty())
    };

    from_edit.or_else(from_atom_id).map(str::to_string)
}

fn is_draft(item: &AtomEntry) -> bool {
    let extensions = item.extensions();

    let app_draft = extensions
        .get("app")
        .and_then(|elements| elements.get("control"))
        .into_iter()
        .flatten()
        .flat_map(|control| {
            let children = control.children();
            children
                .get("app:draft")
                .into_iter()
                .chain(children.get("draft"))
                .flatten()
        })
        .any(is_yes);

    let hatena_draft = extensions
        .get("hatena")
        .and_then(|elements| elements.get("draft"))
        .into_iter()
        .flatten()
        .any(is_yes);

    app_draft || hatena_draft
}

fn is_yes(ext: &Extension) -> bool {
    ext.value().is_some_and(|v| v.trim().eq_ignore_ascii_case("yes"))
}
