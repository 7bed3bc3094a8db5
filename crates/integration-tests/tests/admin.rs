//! Admin login guard, product form and CSV upload.

use axum::http::StatusCode;
use kitshop_integration_tests::{Part, TestContext};

const HEADER: &str = "name,price,description,image_file,brand\n";

// ============================================================================
// Login guard
// ============================================================================

#[tokio::test]
async fn test_admin_pages_redirect_to_login_without_flag() {
    let mut ctx = TestContext::seeded().await;

    for path in ["/admin_dashboard", "/admin/add_product", "/admin/bulk_add"] {
        ctx.get(path).await.assert_redirect("/admin_login");
    }

    let resp = ctx.get("/admin_login").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Please log in to access this page."));
}

#[tokio::test]
async fn test_admin_posts_are_guarded_too() {
    let mut ctx = TestContext::new().await;

    ctx.post_form("/admin/add_product", &[("name", "Kit"), ("price", "1")])
        .await
        .assert_redirect("/admin_login");
    ctx.upload_csv("kits.csv", &format!("{HEADER}Kit,1,,kit.jpg,Nike\n"))
        .await
        .assert_redirect("/admin_login");

    assert_eq!(ctx.product_count().await, 0);
}

#[tokio::test]
async fn test_login_with_wrong_credentials_does_not_set_flag() {
    let mut ctx = TestContext::seeded().await;

    let resp = ctx
        .post_form(
            "/admin_login",
            &[("username", "admin"), ("password", "wrong")],
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Invalid username or password."));
    assert!(resp.body.contains(r#"value="admin""#));

    ctx.get("/admin_dashboard")
        .await
        .assert_redirect("/admin_login");
}

#[tokio::test]
async fn test_login_with_correct_credentials_sets_flag() {
    let mut ctx = TestContext::seeded().await;

    ctx.login_admin().await;

    let resp = ctx.get("/admin_dashboard").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("You are now logged in as admin!"));
    assert!(resp.body.contains("Real Madrid Home Kit"));
    assert!(resp.body.contains("PSG Third Kit"));
    assert!(resp.body.contains("/admin_logout"));
}

#[tokio::test]
async fn test_logout_clears_flag_but_keeps_cart() {
    let mut ctx = TestContext::seeded().await;
    ctx.get("/add_to_cart/1").await;
    ctx.login_admin().await;

    ctx.get("/admin_logout").await.assert_redirect("/");

    let home = ctx.get("/").await;
    assert!(home.body.contains("You have been logged out of the admin panel."));
    ctx.get("/admin_dashboard")
        .await
        .assert_redirect("/admin_login");

    let cart = ctx.get("/cart").await;
    assert!(cart.body.contains("Real Madrid Home Kit"));
}

// ============================================================================
// Single product form
// ============================================================================

#[tokio::test]
async fn test_add_product() {
    let mut ctx = TestContext::new().await;
    ctx.login_admin().await;

    let form = ctx.get("/admin/add_product").await;
    assert_eq!(form.status, StatusCode::OK);

    ctx.post_form(
        "/admin/add_product",
        &[
            ("name", "Juventus Home Kit"),
            ("price", "80.50"),
            ("description", "Home kit"),
            ("image_file", "juve.jpg"),
            ("brand", "Adidas"),
        ],
    )
    .await
    .assert_redirect("/admin_dashboard");

    assert_eq!(ctx.product_count().await, 1);

    let dashboard = ctx.get("/admin_dashboard").await;
    assert!(dashboard.body.contains("Product added successfully!"));
    assert!(dashboard.body.contains("Juventus Home Kit"));
    assert!(dashboard.body.contains("$80.50"));

    let catalog = ctx.get("/?brand=Adidas").await;
    assert!(catalog.body.contains("Juventus Home Kit"));
}

#[tokio::test]
async fn test_invalid_product_form_is_redisplayed() {
    let mut ctx = TestContext::new().await;
    ctx.login_admin().await;
    let long_brand = "b".repeat(51);

    let resp = ctx
        .post_form(
            "/admin/add_product",
            &[
                ("name", "Juventus Home Kit"),
                ("price", "-3"),
                ("description", ""),
                ("image_file", "juve.jpg"),
                ("brand", &long_brand),
            ],
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Number must be at least 0."));
    assert!(resp.body.contains("Field cannot be longer than 50 characters."));
    assert!(resp.body.contains(r#"value="Juventus Home Kit""#));
    assert!(resp.body.contains(r#"value="-3""#));
    assert_eq!(ctx.product_count().await, 0);
}

#[tokio::test]
async fn test_product_form_rejects_short_name_and_missing_image() {
    let mut ctx = TestContext::new().await;
    ctx.login_admin().await;

    let resp = ctx
        .post_form(
            "/admin/add_product",
            &[("name", "X"), ("price", "10"), ("image_file", "")],
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Field must be between 2 and 100 characters long."));
    assert!(resp.body.contains("This field is required."));
    assert_eq!(ctx.product_count().await, 0);
}

// ============================================================================
// Bulk CSV import
// ============================================================================

#[tokio::test]
async fn test_bulk_import_commits_every_row() {
    let mut ctx = TestContext::new().await;
    ctx.login_admin().await;

    let csv = format!(
        "{HEADER}Juventus Home Kit,80.5,\"Home kit, 2024\",juve.jpg,Adidas\n\
         Inter Away Kit,70,,,Nike\n"
    );
    ctx.upload_csv("kits.csv", &csv)
        .await
        .assert_redirect("/admin_dashboard");

    assert_eq!(ctx.product_count().await, 2);

    let dashboard = ctx.get("/admin_dashboard").await;
    assert!(dashboard.body.contains("2 products were imported from the file."));
    assert!(dashboard.body.contains("Inter Away Kit"));
    assert!(dashboard.body.contains("default.jpg"));
}

#[tokio::test]
async fn test_bulk_import_with_bad_price_commits_nothing() {
    let mut ctx = TestContext::seeded().await;
    ctx.login_admin().await;

    let csv = format!("{HEADER}Good Kit,10,,good.jpg,Nike\nBad Kit,abc,,bad.jpg,Nike\n");
    let resp = ctx.upload_csv("kits.csv", &csv).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("An error occurred while processing the file"));
    assert!(resp.body.contains("could not convert string to float"));
    assert_eq!(ctx.product_count().await, 6);

    let catalog = ctx.get("/?search=Good").await;
    assert!(catalog.body.contains("No products found."));
}

#[tokio::test]
async fn test_bulk_import_with_wrong_column_count_commits_nothing() {
    let mut ctx = TestContext::new().await;
    ctx.login_admin().await;

    let csv = format!("{HEADER}Kit,10,,kit.jpg,Nike\nShort row,10\n");
    let resp = ctx.upload_csv("kits.csv", &csv).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("expected 5 fields, found 2"));
    assert_eq!(ctx.product_count().await, 0);
}

#[tokio::test]
async fn test_bulk_import_with_blank_line_commits_nothing() {
    let mut ctx = TestContext::new().await;
    ctx.login_admin().await;

    let csv = format!("{HEADER}Kit,10,,kit.jpg,Nike\n\nOther Kit,12,,other.jpg,Adidas\n");
    let resp = ctx.upload_csv("kits.csv", &csv).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("line 3: expected 5 fields, found 0"));
    assert_eq!(ctx.product_count().await, 0);
}

#[tokio::test]
async fn test_non_csv_upload_is_rejected() {
    let mut ctx = TestContext::new().await;
    ctx.login_admin().await;

    let resp = ctx
        .upload_csv("kits.txt", &format!("{HEADER}Kit,10,,kit.jpg,Nike\n"))
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Please upload a CSV file."));
    assert_eq!(ctx.product_count().await, 0);
}

#[tokio::test]
async fn test_upload_without_file_part() {
    let mut ctx = TestContext::new().await;
    ctx.login_admin().await;

    ctx.post_multipart(
        "/admin/bulk_add",
        &[Part {
            name: "comment",
            filename: None,
            content: b"no file here",
        }],
    )
    .await
    .assert_redirect("/admin/bulk_add");

    let resp = ctx.get("/admin/bulk_add").await;
    assert!(resp.body.contains("No file part"));
}

#[tokio::test]
async fn test_upload_with_empty_filename() {
    let mut ctx = TestContext::new().await;
    ctx.login_admin().await;

    ctx.upload_csv("", "")
        .await
        .assert_redirect("/admin/bulk_add");

    let resp = ctx.get("/admin/bulk_add").await;
    assert!(resp.body.contains("No file selected"));
    assert_eq!(ctx.product_count().await, 0);
}
