//! Home page route handler: the catalog with search and brand filters.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{RawQuery, State};
use tracing::instrument;

use super::products::ProductView;
use crate::error::Result;
use crate::filters;
use crate::middleware::PageContext;
use crate::services::catalog::{self, CatalogQuery};
use crate::state::AppState;

/// One entry of the brand dropdown.
#[derive(Clone)]
pub struct BrandOption {
    pub name: String,
    pub selected: bool,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub products: Vec<ProductView>,
    pub brands: Vec<BrandOption>,
    pub search: String,
    pub is_filtered: bool,
}

/// Display the catalog.
#[instrument(skip(state, page))]
pub async fn home(
    State(state): State<AppState>,
    page: PageContext,
    RawQuery(raw): RawQuery,
) -> Result<HomeTemplate> {
    let query = CatalogQuery::from_query(raw.as_deref().unwrap_or_default());
    let catalog = catalog::browse(state.pool(), &query).await?;

    tracing::debug!(
        results = catalog.products.len(),
        search = %catalog.search,
        brand = %catalog.selected_brand,
        "Catalog query"
    );

    let brands = catalog
        .brands
        .iter()
        .map(|name| BrandOption {
            selected: *name == catalog.selected_brand,
            name: name.clone(),
        })
        .collect();

    Ok(HomeTemplate {
        page,
        products: catalog.products.iter().map(ProductView::from).collect(),
        brands,
        is_filtered: !catalog.search.is_empty() || !catalog.selected_brand.is_empty(),
        search: catalog.search,
    })
}
