use serde_json::Value;

use crate::path::Step::Key;
use crate::path::{list_at, lookup};

/// Results listed on a search page, passed through unmodified.
///
/// Returns an empty list when any segment of
/// `props.pageProps.titleResults.results` is absent.
pub fn search_results(document: &Value) -> Vec<Value> {
    list_at(
        document,
        &[
            Key("props"),
            Key("pageProps"),
            Key("titleResults"),
            Key("results"),
        ],
    )
    .to_vec()
}

/// The title id a search result points at, if it carries a non-empty string `id`.
pub fn result_id(result: &Value) -> Option<&str> {
    lookup(result, &[Key("id")])
        .ok()
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
}
