use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: u64,
    pub title: String,
}

#[derive(Deserialize)]
pub struct NewItem {
    pub title: String,
}

/// `_page` / `_limit` query parameters, jsonplaceholder style. Without a
/// limit the whole collection is returned.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(rename = "_page")]
    pub page: Option<u32>,
    #[serde(rename = "_limit")]
    pub limit: Option<u32>,
}

#[derive(Debug, Default)]
pub struct Store {
    items: BTreeMap<u64, Item>,
    next_id: u64,
}

impl Store {
    /// Store pre-populated with items `1..=count`.
    pub fn seeded(count: u64) -> Self {
        let items = (1..=count)
            .map(|id| {
                (
                    id,
                    Item {
                        id,
                        title: format!("Item {id}"),
                    },
                )
            })
            .collect();
        Self {
            items,
            next_id: count,
        }
    }

    fn page(&self, query: &PageQuery) -> Vec<Item> {
        let all = self.items.values().cloned();
        match query.limit {
            Some(limit) => {
                let page = query.page.unwrap_or(1).max(1);
                let skip = (page as usize - 1).saturating_mul(limit as usize);
                all.skip(skip).take(limit as usize).collect()
            }
            None => all.collect(),
        }
    }

    fn insert(&mut self, title: String) -> Item {
        self.next_id += 1;
        let item = Item {
            id: self.next_id,
            title,
        };
        self.items.insert(item.id, item.clone());
        item
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with_seed(0)
}

pub fn app_with_seed(count: u64) -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded(count)));
    Router::new()
        .route("/posts", get(list_items).post(create_item))
        .route("/posts/{id}", delete(delete_item))
        .with_state(db)
}

pub async fn run(listener: TcpListener, seed: u64) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_seed(seed)).await
}

async fn list_items(State(db): State<Db>, Query(query): Query<PageQuery>) -> Json<Vec<Item>> {
    let items = db.read().await.page(&query);
    debug!(page = ?query.page, limit = ?query.limit, count = items.len(), "list");
    Json(items)
}

async fn create_item(
    State(db): State<Db>,
    Json(input): Json<NewItem>,
) -> (StatusCode, Json<Item>) {
    let item = db.write().await.insert(input.title);
    info!(id = item.id, "created item");
    (StatusCode::CREATED, Json(item))
}

async fn delete_item(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let removed = db.write().await.items.remove(&id);
    match removed {
        Some(_) => {
            info!(id, "deleted item");
            Ok(Json(serde_json::json!({})))
        }
        None => Err(StatusCode::NOT_FOUND),
    }
}
