//! Integration tests for the RocketShoes cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! No external services are needed: [`StubApi`] serves the stock and catalog
//! endpoints from an in-process `axum` server bound to an ephemeral port, and
//! the cart is driven through the real `reqwest` client.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use url::Url;

/// How the stub answers every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StubMode {
    /// Serve registered data, 404 for unknown products.
    #[default]
    Normal,
    /// Answer every request with this status and an empty body.
    Status(u16),
    /// Answer 200 with a body that is not JSON.
    Malformed,
}

#[derive(Debug, Default)]
struct StubData {
    stock: HashMap<i32, i64>,
    products: HashMap<i32, Value>,
    hits: HashMap<String, usize>,
    mode: StubMode,
}

type Shared = Arc<Mutex<StubData>>;

/// In-process stock and catalog API.
///
/// The server task is aborted when the stub is dropped.
#[derive(Debug)]
pub struct StubApi {
    base_url: Url,
    data: Shared,
    server: JoinHandle<()>,
}

impl StubApi {
    /// Start a stub on `127.0.0.1` with an ephemeral port.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let data: Shared = Arc::default();

        let app = Router::new()
            .route("/stock/{id}", get(stock))
            .route("/products/{id}", get(product))
            .with_state(data.clone());

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let base_url = Url::parse(&format!("http://{addr}/"))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        Ok(Self {
            base_url,
            data,
            server,
        })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Register a product with a catalog entry built by [`product_json`].
    pub fn put_product(&self, id: i32, title: &str, price: f64, available: u32) {
        self.put_product_json(product_json(id, title, price), available);
    }

    /// Register a product from a raw catalog object (must contain `id`).
    pub fn put_product_json(&self, product: Value, available: u32) {
        let Some(id) = product.get("id").and_then(Value::as_i64) else {
            return;
        };
        let Ok(id) = i32::try_from(id) else {
            return;
        };
        self.with_data(|data| {
            data.stock.insert(id, i64::from(available));
            data.products.insert(id, product);
        });
    }

    /// Set the reported stock; negative values are served as-is.
    pub fn set_stock(&self, id: i32, available: i64) {
        self.with_data(|data| {
            data.stock.insert(id, available);
        });
    }

    pub fn set_mode(&self, mode: StubMode) {
        self.with_data(|data| data.mode = mode);
    }

    /// Number of requests served for a path such as `/products/1`.
    #[must_use]
    pub fn hits(&self, path: &str) -> usize {
        self.data
            .lock()
            .map(|data| data.hits.get(path).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    fn with_data(&self, f: impl FnOnce(&mut StubData)) {
        if let Ok(mut data) = self.data.lock() {
            f(&mut data);
        }
    }
}

impl Drop for StubApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Catalog object shaped like the `/products/{id}` response.
#[must_use]
pub fn product_json(id: i32, title: &str, price: f64) -> Value {
    json!({
        "id": id,
        "title": title,
        "price": price,
        "image": format!("https://cdn.rocketshoes.dev/products/{id}.jpg"),
    })
}

async fn stock(State(data): State<Shared>, Path(id): Path<i32>) -> Response {
    respond(&data, &format!("/stock/{id}"), |data| {
        data.stock
            .get(&id)
            .map(|amount| json!({ "id": id, "amount": amount }))
    })
}

async fn product(State(data): State<Shared>, Path(id): Path<i32>) -> Response {
    respond(&data, &format!("/products/{id}"), |data| data.products.get(&id).cloned())
}

fn respond(data: &Shared, path: &str, lookup: impl FnOnce(&StubData) -> Option<Value>) -> Response {
    let Ok(mut data) = data.lock() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    *data.hits.entry(path.to_string()).or_insert(0) += 1;

    match data.mode {
        StubMode::Status(code) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        StubMode::Malformed => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        StubMode::Normal => match lookup(&data) {
            Some(body) => axum::Json(body).into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        },
    }
}
