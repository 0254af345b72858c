use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Form, Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub id: u64,
    pub content: String,
    pub author_name: String,
    pub author_profile_url: String,
    pub title: String,
    pub upvotes: u64,
    pub downvotes: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub data: Vec<Answer>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub query: String,
    pub similarity: Option<u32>,
}

pub type Db = Arc<RwLock<HashMap<u64, Answer>>>;

#[derive(Clone)]
pub struct AppState {
    db: Db,
    api_key: Arc<str>,
}

const DEFAULT_SIMILARITY: u32 = 60;
const CONTENT_FIELD: &str = "answer[content]";

/// Answers every fresh app starts with.
pub fn seed_answers() -> Vec<Answer> {
    let answer = |id: u64, title: &str, content: &str, author: &str, up: u64, down: u64| Answer {
        id,
        content: content.to_string(),
        author_name: author.to_string(),
        author_profile_url: format!("https://www.grepper.com/profile/{author}"),
        title: title.to_string(),
        upvotes: up,
        downvotes: down,
    };
    vec![
        answer(
            101,
            "javascript loop array backwards",
            "for (let i = arr.length - 1; i >= 0; i--) {}",
            "ada",
            12,
            1,
        ),
        answer(
            102,
            "rust loop over array",
            "for x in arr.iter() {}",
            "ferris",
            30,
            0,
        ),
        answer(
            103,
            "python reverse list",
            "xs[::-1]",
            "guido",
            7,
            2,
        ),
        answer(560676, "set variable", "x=1", "grace", 5, 1),
    ]
}

pub fn app(api_key: &str) -> Router {
    let db: Db = Arc::new(RwLock::new(
        seed_answers().into_iter().map(|a| (a.id, a)).collect(),
    ));
    let state = AppState {
        db,
        api_key: Arc::from(api_key),
    };
    Router::new()
        .route("/v1/answers/search", get(search_answers))
        .route("/v1/answers/{id}", get(fetch_answer).post(update_answer))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

/// Basic-auth gate in front of every answer route, ahead of the extractors.
async fn require_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    authorize(request.headers(), &state.api_key)?;
    Ok(next.run(request).await)
}

/// Check basic auth: the key is the username, the password is ignored.
fn authorize(headers: &HeaderMap, api_key: &str) -> Result<(), StatusCode> {
    let encoded = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Basic "))
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let decoded = STANDARD
        .decode(encoded)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let (user, _password) = decoded.split_once(':').ok_or(StatusCode::UNAUTHORIZED)?;
    if user != api_key {
        tracing::debug!("rejected request with unknown api key");
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(())
}

/// Percentage of query words that appear in `title`.
fn title_similarity(query: &str, title: &str) -> u32 {
    let title = title.to_lowercase();
    let title_words: Vec<&str> = title.split_whitespace().collect();
    let words: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if words.is_empty() {
        return 0;
    }
    let hits = words
        .iter()
        .filter(|w| title_words.contains(&w.as_str()))
        .count();
    (hits * 100 / words.len()) as u32
}

async fn search_answers(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, StatusCode> {
    let similarity = params.similarity.unwrap_or(DEFAULT_SIMILARITY);
    if !(1..=100).contains(&similarity) {
        return Err(StatusCode::BAD_REQUEST);
    }
    let answers = state.db.read().await;
    let mut data: Vec<Answer> = answers
        .values()
        .filter(|a| title_similarity(&params.query, &a.title) >= similarity)
        .cloned()
        .collect();
    data.sort_by_key(|a| a.id);
    tracing::debug!(query = %params.query, similarity, hits = data.len(), "search");
    Ok(Json(SearchResponse { data }))
}

async fn fetch_answer(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Answer>, StatusCode> {
    let answers = state.db.read().await;
    answers.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_answer(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let content = form.get(CONTENT_FIELD).ok_or(StatusCode::BAD_REQUEST)?;
    let mut answers = state.db.write().await;
    let answer = answers.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    answer.content = content.clone();
    tracing::debug!(id, "answer updated");
    Ok(Json(json!({ "success": true, "answer": answer.clone() })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(credentials: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let value = format!("Basic {}", STANDARD.encode(credentials));
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn authorize_accepts_key_with_empty_password() {
        assert_eq!(authorize(&basic("key:"), "key"), Ok(()));
    }

    #[test]
    fn authorize_rejects_missing_header() {
        assert_eq!(authorize(&HeaderMap::new(), "key"), Err(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn authorize_rejects_wrong_key() {
        assert_eq!(authorize(&basic("other:"), "key"), Err(StatusCode::FORBIDDEN));
    }

    #[test]
    fn authorize_rejects_credentials_without_colon() {
        assert_eq!(authorize(&basic("key"), "key"), Err(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn similarity_counts_matching_words() {
        assert_eq!(title_similarity("loop array", "rust loop over array"), 100);
        assert_eq!(title_similarity("loop list", "rust loop over array"), 50);
        assert_eq!(title_similarity("", "anything"), 0);
    }

    #[test]
    fn similarity_ignores_case() {
        assert_eq!(title_similarity("Rust LOOP", "rust loop over array"), 100);
    }

    #[test]
    fn answer_roundtrips_through_json() {
        let answer = seed_answers().remove(0);
        let json = serde_json::to_string(&answer).unwrap();
        let back: Answer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, answer);
    }

    #[test]
    fn seed_ids_are_unique() {
        let seeds = seed_answers();
        let mut ids: Vec<u64> = seeds.iter().map(|a| a.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), seeds.len());
    }
}
