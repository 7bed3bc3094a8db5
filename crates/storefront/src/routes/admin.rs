//! Admin panel handlers: product table, single-product form and CSV upload.
//!
//! Every handler takes [`RequireAdmin`], so visitors without the session flag
//! are sent to `/admin_login` before the handler body runs.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use kitshop_core::{Price, PriceError};

use super::products::ProductView;
use crate::db::ProductRepository;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{PageContext, RequireAdmin, push_flash};
use crate::models::{Flash, NewProduct};
use crate::services::import::{self, is_csv_filename};
use crate::state::AppState;

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 100;
const DESCRIPTION_MAX_CHARS: usize = 1024;
const IMAGE_FILE_MAX_CHARS: usize = 20;
const BRAND_MAX_CHARS: usize = 50;

/// Multipart field carrying the CSV upload.
const UPLOAD_FIELD: &str = "file";

// =============================================================================
// Dashboard
// =============================================================================

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub page: PageContext,
    pub products: Vec<ProductView>,
}

/// List every product.
#[instrument(skip(state, page))]
pub async fn dashboard(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    page: PageContext,
) -> Result<DashboardTemplate> {
    let products = ProductRepository::new(state.pool()).list(None).await?;

    Ok(DashboardTemplate {
        page,
        products: products.iter().map(ProductView::from).collect(),
    })
}

// =============================================================================
// Single product form
// =============================================================================

/// Raw add-product form, kept as submitted so it can be shown again.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub description: String,
    pub image_file: String,
    pub brand: String,
}

/// Per-field validation messages. Empty when the form is valid.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormErrors {
    pub name: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub image_file: Option<String>,
    pub brand: Option<String>,
}

impl FormErrors {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.image_file.is_none()
            && self.brand.is_none()
    }
}

impl ProductForm {
    /// Check every field and build the product to insert.
    ///
    /// # Errors
    ///
    /// Returns the messages for every invalid field.
    pub fn validate(&self) -> std::result::Result<NewProduct, FormErrors> {
        let mut errors = FormErrors::default();

        let name = self.name.trim();
        let name_len = name.chars().count();
        if name.is_empty() {
            errors.name = Some(required());
        } else if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name_len) {
            errors.name = Some(format!(
                "Field must be between {NAME_MIN_CHARS} and {NAME_MAX_CHARS} characters long."
            ));
        }

        let price = if self.price.trim().is_empty() {
            errors.price = Some(required());
            None
        } else {
            match Price::parse(&self.price) {
                Ok(price) => Some(price),
                Err(PriceError::Negative) => {
                    errors.price = Some("Number must be at least 0.".to_string());
                    None
                }
                Err(_) => {
                    errors.price = Some("Not a valid float value.".to_string());
                    None
                }
            }
        };

        errors.description = too_long(&self.description, DESCRIPTION_MAX_CHARS);

        let image_file = self.image_file.trim();
        if image_file.is_empty() {
            errors.image_file = Some(required());
        } else {
            errors.image_file = too_long(image_file, IMAGE_FILE_MAX_CHARS);
        }

        errors.brand = too_long(&self.brand, BRAND_MAX_CHARS);

        match price {
            Some(price) if errors.is_empty() => Ok(NewProduct::new(
                name,
                price,
                Some(self.description.clone()),
                Some(image_file.to_string()),
                Some(self.brand.clone()),
            )),
            _ => Err(errors),
        }
    }
}

fn required() -> String {
    "This field is required.".to_string()
}

fn too_long(value: &str, max: usize) -> Option<String> {
    (value.trim().chars().count() > max)
        .then(|| format!("Field cannot be longer than {max} characters."))
}

/// Add-product page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/add_product.html")]
pub struct AddProductTemplate {
    pub page: PageContext,
    pub form: ProductForm,
    pub errors: FormErrors,
}

/// Display the empty add-product form.
#[instrument(skip(page))]
pub async fn add_product_page(_admin: RequireAdmin, page: PageContext) -> AddProductTemplate {
    AddProductTemplate {
        page,
        form: ProductForm::default(),
        errors: FormErrors::default(),
    }
}

/// Validate and insert one product.
#[instrument(skip(state, session))]
pub async fn add_product(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    match form.validate() {
        Ok(product) => {
            let created = ProductRepository::new(state.pool()).create(&product).await?;

            let product_id = created.id.to_string();
            add_breadcrumb(
                "admin",
                "Added product",
                Some(&[("product_id", product_id.as_str())]),
            );

            push_flash(&session, Flash::success("Product added successfully!")).await?;
            Ok(Redirect::to("/admin_dashboard").into_response())
        }
        Err(errors) => {
            tracing::debug!(?errors, "Add product form rejected");

            let page = PageContext::load(&session).await?;
            Ok(AddProductTemplate { page, form, errors }.into_response())
        }
    }
}

// =============================================================================
// Bulk CSV import
// =============================================================================

/// Bulk upload page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/bulk_add.html")]
pub struct BulkAddTemplate {
    pub page: PageContext,
}

/// An uploaded file.
struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

/// Display the upload form.
#[instrument(skip(page))]
pub async fn bulk_add_page(_admin: RequireAdmin, page: PageContext) -> BulkAddTemplate {
    BulkAddTemplate { page }
}

/// Import every row of an uploaded CSV file in one transaction.
#[instrument(skip_all)]
pub async fn bulk_add(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<Response> {
    let Some(upload) = read_upload(multipart).await? else {
        push_flash(&session, Flash::danger("No file part")).await?;
        return Ok(Redirect::to("/admin/bulk_add").into_response());
    };

    if upload.filename.is_empty() {
        push_flash(&session, Flash::danger("No file selected")).await?;
        return Ok(Redirect::to("/admin/bulk_add").into_response());
    }

    if !is_csv_filename(&upload.filename) {
        tracing::info!(filename = %upload.filename, "Rejected non-CSV upload");
        return render_bulk_add(&session, Flash::danger("Please upload a CSV file.")).await;
    }

    match import::import_csv(state.pool(), &upload.bytes).await {
        Ok(count) => {
            let imported = count.to_string();
            add_breadcrumb(
                "admin",
                "Imported products",
                Some(&[("filename", upload.filename.as_str()), ("count", imported.as_str())]),
            );
            tracing::info!(filename = %upload.filename, count, "CSV import committed");

            push_flash(
                &session,
                Flash::success(format!("{count} products were imported from the file.")),
            )
            .await?;
            Ok(Redirect::to("/admin_dashboard").into_response())
        }
        Err(e) => {
            tracing::warn!(filename = %upload.filename, error = %e, "CSV import rolled back");
            render_bulk_add(
                &session,
                Flash::danger(format!("An error occurred while processing the file: {e}")),
            )
            .await
        }
    }
}

async fn render_bulk_add(session: &Session, flash: Flash) -> Result<Response> {
    let page = PageContext::load(session).await?.with_flash(flash);
    Ok(BulkAddTemplate { page }.into_response())
}

/// Read the `file` field, skipping any other fields.
async fn read_upload(mut multipart: Multipart) -> Result<Option<Upload>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        return Ok(Some(Upload {
            filename,
            bytes: bytes.to_vec(),
        }));
    }

    Ok(None)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_IMAGE_FILE;

    fn form(name: &str, price: &str) -> ProductForm {
        ProductForm {
            name: name.to_string(),
            price: price.to_string(),
            description: "Home kit".to_string(),
            image_file: "kit.jpg".to_string(),
            brand: "Nike".to_string(),
        }
    }

    #[test]
    fn test_valid_form_builds_product() {
        let product = form("  Juventus Home Kit ", "80.5").validate().unwrap();

        assert_eq!(product.name, "Juventus Home Kit");
        assert_eq!(product.price.to_string(), "$80.50");
        assert_eq!(product.description.as_deref(), Some("Home kit"));
        assert_eq!(product.image_file, "kit.jpg");
        assert_eq!(product.brand.as_deref(), Some("Nike"));
    }

    #[test]
    fn test_zero_price_and_blank_optionals_are_accepted() {
        let mut f = form("Scarf", "0");
        f.description = String::new();
        f.brand = "   ".to_string();

        let product = f.validate().unwrap();
        assert_eq!(product.price, Price::ZERO);
        assert_eq!(product.description, None);
        assert_eq!(product.brand, None);
        assert_ne!(product.image_file, DEFAULT_IMAGE_FILE);
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let errors = form("Scarf", "-1").validate().unwrap_err();

        assert_eq!(errors.price.as_deref(), Some("Number must be at least 0."));
        assert!(errors.name.is_none());
    }

    #[test]
    fn test_non_numeric_and_missing_price() {
        let errors = form("Scarf", "ten").validate().unwrap_err();
        assert_eq!(errors.price.as_deref(), Some("Not a valid float value."));

        let errors = form("Scarf", "  ").validate().unwrap_err();
        assert_eq!(errors.price.as_deref(), Some("This field is required."));
    }

    #[test]
    fn test_name_length_bounds() {
        assert!(form("A", "1").validate().unwrap_err().name.is_some());
        assert!(form("", "1").validate().unwrap_err().name.is_some());
        assert!(form(&"x".repeat(101), "1").validate().is_err());
        assert!(form(&"x".repeat(100), "1").validate().is_ok());
        // Characters, not bytes.
        assert!(form(&"ж".repeat(100), "1").validate().is_ok());
    }

    #[test]
    fn test_over_long_fields_are_rejected() {
        let mut f = form("Scarf", "1");
        f.description = "d".repeat(1025);
        f.image_file = "a-very-long-name.jpeg".to_string();
        f.brand = "b".repeat(51);

        let errors = f.validate().unwrap_err();
        assert!(errors.description.is_some());
        assert_eq!(
            errors.image_file.as_deref(),
            Some("Field cannot be longer than 20 characters.")
        );
        assert!(errors.brand.is_some());
        assert!(errors.name.is_none());
        assert!(errors.price.is_none());
    }

    #[test]
    fn test_image_file_is_required() {
        let mut f = form("Scarf", "1");
        f.image_file = " ".to_string();

        let errors = f.validate().unwrap_err();
        assert_eq!(errors.image_file.as_deref(), Some("This field is required."));
    }
}
