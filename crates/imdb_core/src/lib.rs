//! IMDb core: pure extraction from embedded page JSON into flat records.
mod cast;
mod error;
mod path;
mod record;
mod search;
mod title;

pub use cast::extract_cast;
pub use error::ExtractError;
pub use path::{
    is_truthy, joined_text, list_at, lookup, object_at, scalar_at, text_at, PathError, Step,
};
pub use record::{
    CastEntry, CommonDetails, MovieCredits, ProductionBudget, RoleCredits, SeriesCredits,
    TitleRecord, WorldwideGross, NOT_AVAILABLE,
};
pub use search::{result_id, search_results};
pub use title::{extract_title, TitleKind, NO_DESCRIPTION};
