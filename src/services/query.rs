use std::collections::BTreeMap;

use crate::models::{Era, Locale, RuntimeRange, ScareLevel};

/// TMDB genre id for horror
pub const HORROR_GENRE_ID: &str = "27";

const NEW_ERA_YEARS: i32 = 10;
const CLASSIC_ERA_YEARS: i32 = 24;

/// Upstream discovery query parameters, ordered by name
pub type QueryParams = BTreeMap<&'static str, String>;

/// Translates categorical filters into TMDB `/discover/movie` parameters.
///
/// Pure: the same inputs, including `current_year`, always give the same map.
/// `scare` must already be resolved, since it also decides `include_adult`.
pub fn build_query_params(
    scare: ScareLevel,
    runtime: RuntimeRange,
    era: Era,
    locale: Locale,
    current_year: i32,
) -> QueryParams {
    let mut params = QueryParams::new();

    params.insert("with_genres", HORROR_GENRE_ID.to_string());
    params.insert("language", locale.language_code().to_string());
    params.insert("include_adult", (scare == ScareLevel::Strong).to_string());

    params.insert("sort_by", "popularity.desc".to_string());
    match scare {
        ScareLevel::Light => {
            params.insert("vote_average.gte", "6.0".to_string());
            params.insert("vote_count.gte", "500".to_string());
        }
        ScareLevel::Normal => {
            params.insert("vote_count.gte", "200".to_string());
        }
        ScareLevel::Strong => {
            params.insert("vote_count.gte", "60".to_string());
        }
    }

    match runtime {
        RuntimeRange::Short => {
            params.insert("with_runtime.lte", "90".to_string());
        }
        RuntimeRange::Medium => {
            params.insert("with_runtime.gte", "91".to_string());
            params.insert("with_runtime.lte", "120".to_string());
        }
        RuntimeRange::Long => {
            params.insert("with_runtime.gte", "121".to_string());
        }
    }

    match era {
        Era::New => {
            params.insert(
                "primary_release_date.gte",
                format!("{}-01-01", current_year - NEW_ERA_YEARS),
            );
        }
        Era::Classic => {
            params.insert(
                "primary_release_date.lte",
                format!("{}-12-31", current_year - CLASSIC_ERA_YEARS),
            );
        }
        Era::Any => {}
    }

    params
}
