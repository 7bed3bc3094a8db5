//! Session cart: add, remove, clear and view.

use axum::http::StatusCode;
use kitshop_integration_tests::TestContext;

#[tokio::test]
async fn test_empty_cart() {
    let mut ctx = TestContext::seeded().await;

    let resp = ctx.get("/cart").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_adding_same_product_twice_yields_quantity_two() {
    let mut ctx = TestContext::seeded().await;

    ctx.get("/add_to_cart/1").await.assert_redirect("/");
    ctx.get("/add_to_cart/1").await.assert_redirect("/");

    let resp = ctx.get("/cart").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body.matches("/remove_from_cart/1").count(), 1);
    assert!(resp.body.contains("<td>2</td>"));
    assert!(resp.body.contains("$159.98"));
    assert!(resp.body.contains(r#"<span class="badge">2</span>"#));
    assert!(resp.body.contains("Real Madrid Home Kit added to cart!"));
}

#[tokio::test]
async fn test_cart_total_sums_lines() {
    let mut ctx = TestContext::seeded().await;

    ctx.get("/add_to_cart/1").await; // 79.99
    ctx.get("/add_to_cart/2").await; // 75.00
    ctx.get("/add_to_cart/2").await;

    let resp = ctx.get("/cart").await;
    assert!(resp.body.contains("$150.00"));
    assert!(resp.body.contains(r#"<td class="total">$229.99</td>"#));
    assert!(resp.body.contains("3 item(s)"));
}

#[tokio::test]
async fn test_flash_is_shown_once() {
    let mut ctx = TestContext::seeded().await;

    ctx.get("/add_to_cart/3").await;

    let first = ctx.get("/cart").await;
    assert!(first.body.contains("added to cart!"));

    let second = ctx.get("/cart").await;
    assert!(!second.body.contains("added to cart!"));
    assert!(second.body.contains("Manchester United Home Kit"));
}

#[tokio::test]
async fn test_missing_product_page_keeps_queued_flash() {
    let mut ctx = TestContext::seeded().await;

    ctx.get("/add_to_cart/1").await;
    assert_eq!(ctx.get("/product/999").await.status, StatusCode::NOT_FOUND);

    let resp = ctx.get("/cart").await;
    assert!(resp.body.contains("Real Madrid Home Kit added to cart!"));
}

#[tokio::test]
async fn test_add_redirects_to_same_origin_referer() {
    let mut ctx = TestContext::seeded().await;

    ctx.get_from("/add_to_cart/2", "localhost", "http://localhost/?brand=Nike")
        .await
        .assert_redirect("/?brand=Nike");

    ctx.get_from("/add_to_cart/2", "localhost", "https://elsewhere.example/page")
        .await
        .assert_redirect("/");
}

#[tokio::test]
async fn test_adding_missing_product_is_404() {
    let mut ctx = TestContext::seeded().await;

    assert_eq!(ctx.get("/add_to_cart/999").await.status, StatusCode::NOT_FOUND);

    let resp = ctx.get("/cart").await;
    assert!(resp.body.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_remove_drops_the_line() {
    let mut ctx = TestContext::seeded().await;
    ctx.get("/add_to_cart/1").await;
    ctx.get("/add_to_cart/1").await;
    ctx.get("/add_to_cart/2").await;

    ctx.get("/remove_from_cart/1").await.assert_redirect("/cart");

    let resp = ctx.get("/cart").await;
    assert!(resp.body.contains("Item removed from cart!"));
    assert!(!resp.body.contains("/remove_from_cart/1"));
    assert!(resp.body.contains("/remove_from_cart/2"));
}

#[tokio::test]
async fn test_removing_product_not_in_cart_changes_nothing() {
    let mut ctx = TestContext::seeded().await;
    ctx.get("/add_to_cart/1").await;
    let before = ctx.get("/cart").await;

    ctx.get("/remove_from_cart/2").await.assert_redirect("/cart");
    ctx.get("/remove_from_cart/999").await.assert_redirect("/cart");

    let after = ctx.get("/cart").await;
    assert!(!after.body.contains("Item removed from cart!"));
    assert!(after.body.contains("/remove_from_cart/1"));
    assert!(after.body.contains("$79.99"));
    assert!(before.body.contains(r#"<td class="total">$79.99</td>"#));
    assert!(after.body.contains(r#"<td class="total">$79.99</td>"#));
}

#[tokio::test]
async fn test_clear_cart() {
    let mut ctx = TestContext::seeded().await;
    ctx.get("/add_to_cart/1").await;
    ctx.get("/add_to_cart/4").await;

    ctx.get("/clear_cart").await.assert_redirect("/cart");

    let resp = ctx.get("/cart").await;
    assert!(resp.body.contains("Cart cleared!"));
    assert!(resp.body.contains("Your cart is empty."));
    assert!(!resp.body.contains(r#"class="badge""#));
}

#[tokio::test]
async fn test_cart_is_per_session() {
    let mut ctx = TestContext::seeded().await;
    ctx.get("/add_to_cart/1").await;

    // A second browser without the cookie.
    ctx.forget_session();
    let resp = ctx.get("/cart").await;
    assert!(resp.body.contains("Your cart is empty."));
}
