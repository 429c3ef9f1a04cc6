use uuid::Uuid;

use crate::{
    domain::catalog::{find_variant_by_barcode, list_available_variants},
    domain::stock::aggregate_stock,
    dto::catalog::{ArticleList, BarcodeMatch, ColorList, CustomerList, SizeList, VariantList},
    error::{AppError, AppResult},
    models::Article,
    response::{ApiResponse, Meta},
    routes::params::{ArticleQuery, ArticleSortBy, SortOrder},
    state::AppState,
};

pub async fn list_articles(
    state: &AppState,
    query: ArticleQuery,
) -> AppResult<ApiResponse<ArticleList>> {
    let articles = state.catalog.list_articles().await?;
    let items = filter_articles(articles, &query);
    let meta = Meta::all(items.len());
    Ok(ApiResponse::success("Articles", ArticleList { items }, Some(meta)))
}

pub async fn get_article(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Article>> {
    let article = fetch_article(state, id).await?;
    Ok(ApiResponse::success("Article", article, None))
}

pub async fn list_variants(state: &AppState, id: Uuid) -> AppResult<ApiResponse<VariantList>> {
    let article = fetch_article(state, id).await?;
    let items = list_available_variants(&article);
    let meta = Meta::all(items.len());
    Ok(ApiResponse::success("Available variants", VariantList { items }, Some(meta)))
}

pub async fn lookup_barcode(state: &AppState, code: &str) -> AppResult<ApiResponse<BarcodeMatch>> {
    let articles = state.catalog.list_articles().await?;
    let (article, variant) = match find_variant_by_barcode(&articles, code) {
        Ok(found) => found,
        Err(err) => {
            tracing::info!(barcode = %code, "barcode not recognized");
            return Err(err);
        }
    };
    let data = BarcodeMatch {
        variant: variant.cloned(),
        article: article.clone(),
    };
    Ok(ApiResponse::success("Article found", data, None))
}

pub async fn list_sizes(state: &AppState) -> AppResult<ApiResponse<SizeList>> {
    let items = state.references.list_sizes().await?;
    let meta = Meta::all(items.len());
    Ok(ApiResponse::success("Sizes", SizeList { items }, Some(meta)))
}

pub async fn list_colors(state: &AppState) -> AppResult<ApiResponse<ColorList>> {
    let items = state.references.list_colors().await?;
    let meta = Meta::all(items.len());
    Ok(ApiResponse::success("Colors", ColorList { items }, Some(meta)))
}

pub async fn list_customers(state: &AppState) -> AppResult<ApiResponse<CustomerList>> {
    let items = state.references.list_customers().await?;
    let meta = Meta::all(items.len());
    Ok(ApiResponse::success("Customers", CustomerList { items }, Some(meta)))
}

pub(crate) async fn fetch_article(state: &AppState, id: Uuid) -> AppResult<Article> {
    state
        .catalog
        .get_article(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("article {id}")))
}

fn filter_articles(articles: Vec<Article>, query: &ArticleQuery) -> Vec<Article> {
    let needle = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);
    let active_only = query.active_only.unwrap_or(true);

    let mut items: Vec<Article> = articles
        .into_iter()
        .filter(|a| !active_only || a.active)
        .filter(|a| {
            query
                .category
                .as_deref()
                .is_none_or(|c| a.category.eq_ignore_ascii_case(c))
        })
        .filter(|a| query.min_price.is_none_or(|min| a.base_price >= min))
        .filter(|a| query.max_price.is_none_or(|max| a.base_price <= max))
        .filter(|a| {
            needle.as_deref().is_none_or(|n| {
                a.name.to_lowercase().contains(n)
                    || a
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(n))
            })
        })
        .collect();

    if let Some(sort_by) = query.sort_by {
        items.sort_by(|a, b| match sort_by {
            ArticleSortBy::Name => a.name.cmp(&b.name),
            ArticleSortBy::Price => a.base_price.cmp(&b.base_price),
            ArticleSortBy::Stock => aggregate_stock(a).cmp(&aggregate_stock(b)),
        });
        if matches!(query.sort_order, Some(SortOrder::Desc)) {
            items.reverse();
        }
    }
    items
}
