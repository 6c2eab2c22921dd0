use serde::Serialize;
use serde_json::Value;

/// Sentinel emitted for any field the upstream document does not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// One billed cast member, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CastEntry {
    pub character_name: String,
    pub real_name: String,
    pub actor_image: String,
}

impl CastEntry {
    /// Entry for an edge whose person node is absent.
    pub fn not_available() -> Self {
        Self {
            character_name: NOT_AVAILABLE.to_string(),
            real_name: NOT_AVAILABLE.to_string(),
            actor_image: NOT_AVAILABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionBudget {
    pub production_budget_price: Value,
    pub production_budget_currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldwideGross {
    pub worldwide_gross_amount: Value,
    pub worldwide_gross_currency: String,
}

/// Fields shared by movies and series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonDetails {
    pub title_text: String,
    pub thumbnail: String,
    pub release_year: Value,
    pub avg_rating: Value,
    pub is_series: bool,
    pub rating_vote_count: Value,
    pub time_duration: String,
    pub description: String,
    pub release_date: String,
    pub country_of_origin: String,
    pub languages: String,
    pub production_budget: ProductionBudget,
    pub worldwide_gross: WorldwideGross,
    pub top_casts: Vec<CastEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieCredits {
    pub director: String,
    pub writer: String,
    pub stars: String,
    #[serde(rename = "playbackURL")]
    pub playback_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesCredits {
    pub director: String,
    pub creators: String,
    pub stars: String,
    #[serde(rename = "playbackURL")]
    pub playback_url: String,
}

/// Role-specific credits; serialized inline with the common fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RoleCredits {
    Movie(MovieCredits),
    Series(SeriesCredits),
}

/// Flat detail record for one title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleRecord {
    #[serde(flatten)]
    pub details: CommonDetails,
    #[serde(flatten)]
    pub credits: RoleCredits,
    pub imdb_id: String,
}
