use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{RawItem, ScareLevel},
    random::RandomSource,
    services::{providers::CatalogProvider, query::QueryParams},
};

/// Pages requested per discovery call
pub const PAGE_COUNT: usize = 2;

/// Strong picks sample pages from `1..=STRONG_PAGE_RANGE`
pub const STRONG_PAGE_RANGE: usize = 5;

/// Page numbers to request, in issue order.
///
/// Strong draws each page independently (duplicates allowed); every other
/// level walks the first pages in sequence.
pub fn page_numbers(scare: ScareLevel, random: &dyn RandomSource) -> Vec<u32> {
    (0..PAGE_COUNT)
        .map(|index| match scare {
            ScareLevel::Strong => 1 + random.below(STRONG_PAGE_RANGE) as u32,
            ScareLevel::Light | ScareLevel::Normal => index as u32 + 1,
        })
        .collect()
}

/// Fetches all pages concurrently and concatenates them in issue order.
///
/// Any failed page fails the whole aggregate. Page requests already in
/// flight are left to finish on their own.
pub async fn fetch_aggregate(
    catalog: Arc<dyn CatalogProvider>,
    params: &QueryParams,
    scare: ScareLevel,
    random: &dyn RandomSource,
) -> AppResult<Vec<RawItem>> {
    let pages = page_numbers(scare, random);
    let mut tasks = Vec::with_capacity(pages.len());

    for page in pages {
        let catalog = Arc::clone(&catalog);
        let params = params.clone();
        let task = tokio::spawn(async move { catalog.discover_page(&params, page).await });
        tasks.push((page, task));
    }

    let mut results = Vec::new();

    for (page, task) in tasks {
        match task.await {
            Ok(Ok(items)) => results.extend(items),
            Ok(Err(e)) => {
                tracing::warn!(
                    error = %e,
                    page = page,
                    provider = catalog.name(),
                    "Discovery page fetch failed"
                );
                return Err(e);
            }
            Err(e) => {
                tracing::error!(error = %e, page = page, "Task join error");
                return Err(AppError::Internal(e.to_string()));
            }
        }
    }

    tracing::debug!(
        items = results.len(),
        provider = catalog.name(),
        "Discovery pages aggregated"
    );

    Ok(results)
}
