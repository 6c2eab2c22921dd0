use crate::PathError;

/// Record-level failures: the document is not shaped like a title page at all.
///
/// Anything below these two anchors is defaulted field by field instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("title page data has no pageProps ({0})")]
    MissingPageProps(#[source] PathError),
    #[error("title page data has no aboveTheFoldData ({0})")]
    MissingFoldData(#[source] PathError),
}
