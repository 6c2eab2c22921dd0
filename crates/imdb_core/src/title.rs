use serde_json::Value;

use crate::path::Step::{Index, Key};
use crate::path::{is_truthy, joined_text, list_at, lookup, object_at, scalar_at, text_at, Step};
use crate::{
    extract_cast, CommonDetails, ExtractError, MovieCredits, ProductionBudget, RoleCredits,
    SeriesCredits, TitleRecord, WorldwideGross, NOT_AVAILABLE,
};

/// Default for a title without a plot summary.
pub const NO_DESCRIPTION: &str = "No description available";

const PAGE_PROPS: &[Step<'static>] = &[Key("props"), Key("pageProps")];
const FOLD_DATA: &[Step<'static>] = &[Key("aboveTheFoldData")];
const MAIN_COLUMN: &str = "mainColumnData";
const CREDIT_NAME: &[Step<'static>] = &[Key("name"), Key("nameText"), Key("text")];
const PRIMARY_VIDEO: &[Step<'static>] = &[
    Key("primaryVideos"),
    Key("edges"),
    Index(0),
    Key("node"),
];

/// Which role-specific credits a title carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleKind {
    Movie,
    Series,
}

impl TitleKind {
    /// Reads `titleType.isSeries`; absent or falsy means movie.
    pub fn of(fold: &Value) -> Self {
        match lookup(fold, &[Key("titleType"), Key("isSeries")]) {
            Ok(flag) if is_truthy(flag) => TitleKind::Series,
            _ => TitleKind::Movie,
        }
    }
}

/// Builds the flat record for a title page's embedded JSON document.
///
/// Only the absence of `props.pageProps` or `pageProps.aboveTheFoldData` fails;
/// every other field falls back to its own default independently.
pub fn extract_title(document: &Value, imdb_id: &str) -> Result<TitleRecord, ExtractError> {
    let page_props = object_at(document, PAGE_PROPS).map_err(ExtractError::MissingPageProps)?;
    let fold = object_at(page_props, FOLD_DATA).map_err(ExtractError::MissingFoldData)?;

    let kind = TitleKind::of(fold);
    let details = common_details(page_props, fold, kind);
    let credits = match kind {
        TitleKind::Movie => RoleCredits::Movie(movie_credits(fold)),
        TitleKind::Series => RoleCredits::Series(series_credits(fold)),
    };

    Ok(TitleRecord {
        details,
        credits,
        imdb_id: imdb_id.to_string(),
    })
}

fn common_details(page_props: &Value, fold: &Value, kind: TitleKind) -> CommonDetails {
    let mut release_year_path = PRIMARY_VIDEO.to_vec();
    release_year_path.extend([Key("primaryTitle"), Key("releaseYear"), Key("year")]);

    CommonDetails {
        title_text: text_at(fold, &[Key("originalTitleText"), Key("text")], NOT_AVAILABLE),
        thumbnail: text_at(fold, &[Key("primaryImage"), Key("url")], NOT_AVAILABLE),
        release_year: scalar_at(fold, &release_year_path, NOT_AVAILABLE),
        avg_rating: scalar_at(
            fold,
            &[Key("ratingsSummary"), Key("aggregateRating")],
            NOT_AVAILABLE,
        ),
        is_series: kind == TitleKind::Series,
        rating_vote_count: scalar_at(
            fold,
            &[Key("ratingsSummary"), Key("voteCount")],
            NOT_AVAILABLE,
        ),
        time_duration: text_at(
            fold,
            &[
                Key("runtime"),
                Key("displayableProperty"),
                Key("value"),
                Key("plainText"),
            ],
            NOT_AVAILABLE,
        ),
        description: text_at(
            fold,
            &[Key("plot"), Key("plotText"), Key("plainText")],
            NO_DESCRIPTION,
        ),
        release_date: release_date(fold),
        country_of_origin: text_at(
            page_props,
            &[
                Key(MAIN_COLUMN),
                Key("countriesOfOrigin"),
                Key("countries"),
                Index(0),
                Key("text"),
            ],
            NOT_AVAILABLE,
        ),
        languages: joined_text(
            list_at(
                page_props,
                &[Key(MAIN_COLUMN), Key("spokenLanguages"), Key("spokenLanguages")],
            ),
            &[Key("text")],
            NOT_AVAILABLE,
        ),
        production_budget: ProductionBudget {
            production_budget_price: scalar_at(
                page_props,
                &[Key(MAIN_COLUMN), Key("productionBudget"), Key("budget"), Key("amount")],
                NOT_AVAILABLE,
            ),
            production_budget_currency: text_at(
                page_props,
                &[Key(MAIN_COLUMN), Key("productionBudget"), Key("budget"), Key("currency")],
                NOT_AVAILABLE,
            ),
        },
        worldwide_gross: WorldwideGross {
            worldwide_gross_amount: scalar_at(
                page_props,
                &[Key(MAIN_COLUMN), Key("worldwideGross"), Key("total"), Key("amount")],
                NOT_AVAILABLE,
            ),
            worldwide_gross_currency: text_at(
                page_props,
                &[Key(MAIN_COLUMN), Key("worldwideGross"), Key("total"), Key("currency")],
                NOT_AVAILABLE,
            ),
        },
        top_casts: extract_cast(page_props),
    }
}

/// `day/month/year`, each part defaulting on its own.
fn release_date(fold: &Value) -> String {
    let part = |name: &str| text_at(fold, &[Key("releaseDate"), Key(name)], NOT_AVAILABLE);
    format!("{}/{}/{}", part("day"), part("month"), part("year"))
}

fn movie_credits(fold: &Value) -> MovieCredits {
    MovieCredits {
        director: director(fold),
        writer: credit_names(fold, 1),
        stars: credit_names(fold, 2),
        playback_url: playback_url(fold),
    }
}

fn series_credits(fold: &Value) -> SeriesCredits {
    SeriesCredits {
        director: director(fold),
        creators: credit_names(fold, 0),
        stars: credit_names(fold, 1),
        playback_url: playback_url(fold),
    }
}

fn director(fold: &Value) -> String {
    let mut path = vec![Key("principalCredits"), Index(0), Key("credits"), Index(0)];
    path.extend_from_slice(CREDIT_NAME);
    text_at(fold, &path, NOT_AVAILABLE)
}

/// Names in one credit group; `"N/A"` (not an empty string) when the group has none.
fn credit_names(fold: &Value, group: usize) -> String {
    let credits = list_at(fold, &[Key("principalCredits"), Index(group), Key("credits")]);
    if credits.is_empty() {
        return NOT_AVAILABLE.to_string();
    }
    joined_text(credits, CREDIT_NAME, NOT_AVAILABLE)
}

fn playback_url(fold: &Value) -> String {
    let mut path = PRIMARY_VIDEO.to_vec();
    path.extend([Key("playbackURLs"), Index(0), Key("url")]);
    text_at(fold, &path, NOT_AVAILABLE)
}
