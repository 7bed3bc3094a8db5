//! Catalog, product detail, static files and health checks.

use axum::http::StatusCode;
use kitshop_core::Price;
use kitshop_integration_tests::TestContext;
use kitshop_storefront::db::ProductRepository;
use kitshop_storefront::models::NewProduct;

#[tokio::test]
async fn test_home_lists_demo_products() {
    let mut ctx = TestContext::seeded().await;

    for path in ["/", "/home"] {
        let resp = ctx.get(path).await;
        assert_eq!(resp.status, StatusCode::OK);
        assert!(resp.body.contains("Real Madrid Home Kit"));
        assert!(resp.body.contains("PSG Third Kit"));
        assert!(resp.body.contains("$79.99"));
    }
}

#[tokio::test]
async fn test_brand_filter_returns_only_that_brand() {
    let mut ctx = TestContext::seeded().await;

    let resp = ctx.get("/?brand=Nike").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Barcelona Away Kit"));
    assert!(resp.body.contains("PSG Away Kit"));
    assert!(!resp.body.contains("Real Madrid Home Kit"));
    assert!(!resp.body.contains("Bayern Munich Home Kit"));
    assert!(resp.body.contains(r#"<option value="Nike" selected>"#));
    // Both brands stay selectable.
    assert!(resp.body.contains(r#"<option value="Adidas">"#));
}

#[tokio::test]
async fn test_repeated_query_keys_use_first_value() {
    let mut ctx = TestContext::seeded().await;

    let resp = ctx.get("/?brand=Nike&brand=Adidas").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Barcelona Away Kit"));
    assert!(!resp.body.contains("Real Madrid Home Kit"));
    assert!(resp.body.contains(r#"<option value="Nike" selected>"#));

    let resp = ctx.get("/?search=psg&search=madrid").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("PSG Away Kit"));
    assert!(!resp.body.contains("Real Madrid Home Kit"));
}

#[tokio::test]
async fn test_search_is_case_insensitive_and_trimmed() {
    let mut ctx = TestContext::seeded().await;

    let resp = ctx.get("/?search=%20%20psg%20").await;

    assert!(resp.body.contains("PSG Away Kit"));
    assert!(resp.body.contains("PSG Third Kit"));
    assert!(!resp.body.contains("Barcelona Away Kit"));
    assert!(resp.body.contains(r#"value="psg""#));
}

#[tokio::test]
async fn test_search_matches_non_ascii_names() {
    let mut ctx = TestContext::new().await;
    ProductRepository::new(&ctx.pool)
        .create(&NewProduct::new(
            "Футбольная форма ПСЖ",
            Price::new(76.0).expect("valid price"),
            None,
            None,
            Some("Nike".to_string()),
        ))
        .await
        .expect("insert");

    // "пСж", percent-encoded.
    let resp = ctx.get("/?search=%D0%BF%D0%A1%D0%B6").await;

    assert!(resp.body.contains("Футбольная форма ПСЖ"));
}

#[tokio::test]
async fn test_unmatched_search_shows_empty_state() {
    let mut ctx = TestContext::seeded().await;

    let resp = ctx.get("/?search=Juventus").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("No products found."));
    assert!(!resp.body.contains("Home Kit"));
}

#[tokio::test]
async fn test_product_detail() {
    let mut ctx = TestContext::seeded().await;

    let resp = ctx.get("/product/1").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Real Madrid Home Kit"));
    assert!(resp.body.contains("Home kit, 2024"));
    assert!(resp.body.contains("/add_to_cart/1"));
}

#[tokio::test]
async fn test_missing_product_is_404() {
    let mut ctx = TestContext::seeded().await;

    assert_eq!(ctx.get("/product/999").await.status, StatusCode::NOT_FOUND);
    assert_eq!(ctx.get("/product/abc").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_responses_carry_security_headers_and_request_id() {
    let mut ctx = TestContext::new().await;

    let resp = ctx.get("/").await;

    assert_eq!(
        resp.headers.get("referrer-policy").map(|v| v.as_bytes()),
        Some(&b"same-origin"[..])
    );
    assert_eq!(
        resp.headers.get("x-frame-options").map(|v| v.as_bytes()),
        Some(&b"DENY"[..])
    );
    assert!(resp.headers.contains_key("content-security-policy"));
    assert!(resp.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_stylesheet_is_served() {
    let mut ctx = TestContext::new().await;

    let resp = ctx.get("/static/css/main.css").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains(".product-grid"));
}

#[tokio::test]
async fn test_health_endpoints() {
    let mut ctx = TestContext::new().await;

    let resp = ctx.get("/health").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "ok");

    assert_eq!(ctx.get("/health/ready").await.status, StatusCode::OK);
}
