pub mod admin;
pub mod carts;
pub mod health;
pub mod payments;
pub mod products;
pub mod sales;
pub mod session;
pub mod shops;
pub mod summary;
pub mod users;

use crate::auth::TokenIssuer;
use crate::config::Config;
use crate::db::Repository;
use crate::orchestration::CheckoutOrchestrator;
use crate::payments::PaymentProvider;
use axum::http::{header, HeaderValue, Method};
use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Config,
    pub checkout: Arc<CheckoutOrchestrator>,
    pub tokens: Arc<TokenIssuer>,
    pub payments: Arc<dyn PaymentProvider>,
}

impl AppState {
    pub fn new(repo: Arc<Repository>, config: Config, payments: Arc<dyn PaymentProvider>) -> Self {
        let checkout = Arc::new(CheckoutOrchestrator::from_repository(repo.clone()));
        let tokens = Arc::new(TokenIssuer::new(
            &config.access_token_secret,
            config.token_ttl_hours,
        ));
        Self {
            repo,
            config,
            checkout,
            tokens,
            payments,
        }
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/jwt", post(session::issue_token))
        .route("/logout", post(session::logout))
        .route("/users", post(users::create_user).get(users::list_users))
        .route("/user", get(users::get_me))
        .route("/user/addShopInfo", put(users::add_shop_info))
        .route("/shops", post(shops::create_shop))
        .route("/shops/mine", get(shops::get_my_shop))
        .route(
            "/shops/increaseProductLimit",
            put(shops::increase_product_limit),
        )
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/product/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/carts", get(carts::list_cart).put(carts::add_to_cart))
        .route("/carts/:product_id", delete(carts::remove_from_cart))
        .route("/sales", post(sales::checkout).get(sales::list_sales))
        .route("/salesSummary", get(summary::shop_summary))
        .route("/admin/salesSummary", get(summary::admin_summary))
        .route("/admin/increaseIncome", patch(admin::increase_income))
        .route(
            "/create-payment-intent",
            post(payments::create_payment_intent),
        )
        .layer(cors)
        .with_state(state)
}
