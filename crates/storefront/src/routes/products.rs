//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tower_sessions::Session;
use tracing::instrument;

use kitshop_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::PageContext;
use crate::models::Product;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub price: String,
    pub description: String,
    pub image_url: String,
    pub brand: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            price: product.price.to_string(),
            description: product.description.clone().unwrap_or_default(),
            image_url: product.image_url(),
            brand: product.brand.clone().unwrap_or_default(),
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub page: PageContext,
    pub product: ProductView,
}

/// Parse the `{id}` path segment.
///
/// Anything that is not an integer cannot name a product, so it is a 404
/// rather than a 400.
pub(crate) fn parse_product_id(raw: &str) -> Result<ProductId> {
    raw.parse::<i64>()
        .map(ProductId::new)
        .map_err(|_| AppError::NotFound(format!("product {raw}")))
}

/// Load a product or fail with 404.
pub(crate) async fn find_product(state: &AppState, id: ProductId) -> Result<Product> {
    ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// Display product detail page.
///
/// Queued flashes are only consumed once the product is found, so a 404
/// leaves them for the next rendered page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<ProductShowTemplate> {
    let product = find_product(&state, parse_product_id(&id)?).await?;
    let page = PageContext::load(&session).await?;

    Ok(ProductShowTemplate {
        page,
        product: ProductView::from(&product),
    })
}
