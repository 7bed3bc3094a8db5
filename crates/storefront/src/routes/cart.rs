//! Cart route handlers.
//!
//! The cart lives in the session. Every mutating route is a plain `GET` that
//! queues a flash message and redirects.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, header},
    response::Redirect,
};
use tower_sessions::Session;
use tracing::instrument;
use url::Url;

use super::products::{find_product, parse_product_id};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{PageContext, load_cart, push_flash, save_cart};
use crate::models::{Cart, CartItem, Flash};
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i64,
    pub name: String,
    pub image_url: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.as_i64(),
            name: item.name.clone(),
            image_url: item.image_url(),
            quantity: item.quantity,
            price: item.price.to_string(),
            line_price: item.line_total().to_string(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            total: cart.total().to_string(),
            item_count: cart.item_count(),
        }
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: PageContext,
    pub cart: CartView,
}

/// Display the cart.
#[instrument(skip(session, page))]
pub async fn show(session: Session, page: PageContext) -> Result<CartShowTemplate> {
    let cart = load_cart(&session).await?;

    Ok(CartShowTemplate {
        page,
        cart: CartView::from(&cart),
    })
}

/// Add one unit of a product and go back to where the visitor came from.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let product = find_product(&state, parse_product_id(&id)?).await?;

    let mut cart = load_cart(&session).await?;
    let quantity = cart.add(&product);
    save_cart(&session, &cart).await?;

    let product_id = product.id.to_string();
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product_id.as_str())]),
    );
    tracing::info!(product_id = %product.id, quantity, "Added to cart");

    push_flash(&session, Flash::success(format!("{} added to cart!", product.name))).await?;

    Ok(Redirect::to(&back_target(&headers)))
}

/// Remove a product's line from the cart. Unknown ids are ignored.
#[instrument(skip(session))]
pub async fn remove(session: Session, Path(id): Path<String>) -> Result<Redirect> {
    let id = parse_product_id(&id)?;

    let mut cart = load_cart(&session).await?;
    if cart.remove(id) {
        save_cart(&session, &cart).await?;

        let product_id = id.to_string();
        add_breadcrumb(
            "cart",
            "Removed from cart",
            Some(&[("product_id", product_id.as_str())]),
        );
        push_flash(&session, Flash::success("Item removed from cart!")).await?;
    }

    Ok(Redirect::to("/cart"))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Redirect> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    save_cart(&session, &cart).await?;

    add_breadcrumb("cart", "Cleared cart", None);
    push_flash(&session, Flash::info("Cart cleared!")).await?;

    Ok(Redirect::to("/cart"))
}

/// Where to send the visitor after adding to the cart.
///
/// The `Referer` is followed only when it points at the host that served this
/// request; the redirect then keeps just its path and query. Anything else
/// goes to the catalog.
fn back_target(headers: &HeaderMap) -> String {
    same_origin_referer(headers).unwrap_or_else(|| "/".to_string())
}

fn same_origin_referer(headers: &HeaderMap) -> Option<String> {
    let host = headers.get(header::HOST)?.to_str().ok()?;
    let referer = headers.get(header::REFERER)?.to_str().ok()?;
    let url = Url::parse(referer).ok()?;

    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    // Read the Host header with the referer's scheme so default ports compare equal.
    let served = Url::parse(&format!("{}://{host}", url.scheme())).ok()?;
    if !served.username().is_empty() || served.path() != "/" {
        return None;
    }
    let same_origin = served.host() == url.host()
        && served.port_or_known_default() == url.port_or_known_default();
    if !same_origin {
        return None;
    }

    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }
    Some(target)
}
