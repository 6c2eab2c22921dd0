use serde_json::Value;

use crate::path::{list_at, object_at, text_at, Step};
use crate::{CastEntry, NOT_AVAILABLE};

use crate::path::Step::{Index, Key};

const CAST_EDGES: &[Step<'static>] = &[Key("mainColumnData"), Key("cast"), Key("edges")];

/// Billed cast from `pageProps`, one entry per edge in source order.
///
/// A missing cast container yields an empty list. An edge without a person
/// node still yields an entry, with every field set to `"N/A"`.
pub fn extract_cast(page_props: &Value) -> Vec<CastEntry> {
    list_at(page_props, CAST_EDGES)
        .iter()
        .map(cast_entry)
        .collect()
}

fn cast_entry(edge: &Value) -> CastEntry {
    let Ok(node) = object_at(edge, &[Key("node")]) else {
        return CastEntry::not_available();
    };
    CastEntry {
        character_name: text_at(node, &[Key("characters"), Index(0), Key("name")], NOT_AVAILABLE),
        real_name: text_at(node, &[Key("name"), Key("nameText"), Key("text")], NOT_AVAILABLE),
        actor_image: text_at(node, &[Key("name"), Key("primaryImage"), Key("url")], NOT_AVAILABLE),
    }
}
