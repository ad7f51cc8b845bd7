//! Mock of the scouting list endpoints.
//!
//! Each endpoint pages the way its production counterpart does:
//!
//! - `/api/players` returns `players`, numeric `id_player` cursors, and
//!   `total` on the first page only.
//! - `/api/scouts` returns `scouts`, string cursors, and `totalCount`, which
//!   is `null` after the first page.
//! - `/api/reports` returns `items` and `totalCount` on every page.

use crate::store::MockStore;
use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::{Value, json};
use std::net::TcpListener;

pub const MAX_PAGE_LIMIT: usize = 100;
const DEFAULT_LIMIT: usize = 50;

pub struct Config {
    /// set to "0.0.0.0" for public access, "127.0.0.1" for local dev
    pub ip: String,
    /// set to 0 to get an os-assigned port
    pub port: u16,
    /// "*" allows any origin, for the UI dev server
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Read `IP_ADDRESS`, `PORT` and `ALLOWED_ORIGINS`, falling back to a
    /// local server on port 8000 that accepts any origin.
    pub fn from_env() -> Result<Self, std::num::ParseIntError> {
        use std::env::var;

        let allowed_origins = var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Config {
            ip: var("IP_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: var("PORT")
                .map(|port| port.parse())
                .unwrap_or(Ok(8000))?,
            allowed_origins,
        })
    }
}

/// Build the server, but not await it.
///
/// Returns the port that the server has bound to by modifying the config.
pub fn build(config: &mut Config, store: MockStore) -> std::io::Result<Server> {
    let store = web::Data::new(store);
    let allowed_origins = config.allowed_origins.clone();

    // OS assigns the port if binding to 0
    let listener = TcpListener::bind(format!("{}:{}", config.ip, config.port))?;
    config.port = listener.local_addr()?.port();
    let server = HttpServer::new(move || {
        let cors = if allowed_origins.iter().any(|origin| origin == "*") {
            Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .supports_credentials()
        } else {
            allowed_origins.iter().fold(
                Cors::default()
                    .allow_any_method()
                    .allow_any_header()
                    .supports_credentials(),
                |cors, origin| cors.allowed_origin(origin),
            )
        };

        App::new()
            .wrap(cors)
            .service(
                web::scope("/api")
                    .route("/health_check", web::get().to(health_check))
                    .route("/players", web::get().to(players))
                    .route("/scouts", web::get().to(scouts))
                    .route("/reports", web::get().to(reports)),
            )
            .app_data(store.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}

/// Paging parameters common to all list endpoints.
struct ListParams {
    cursor: Option<String>,
    limit: usize,
}

impl ListParams {
    fn parse(query: &[(String, String)]) -> Result<Self, HttpResponse> {
        let cursor = param(query, "cursor").map(str::to_string);
        let limit = match param(query, "limit") {
            None => DEFAULT_LIMIT,
            Some(limit) => limit
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or_else(|| bad_request("Invalid limit"))?,
        };
        Ok(Self {
            cursor,
            limit: limit.min(MAX_PAGE_LIMIT),
        })
    }
}

fn param<'a>(query: &'a [(String, String)], key: &str) -> Option<&'a str> {
    query
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, value)| value.as_str())
        .filter(|value| !value.is_empty())
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({ "error": message }))
}

fn contains(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|haystack| {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    })
}

/// One page of `rows`, starting after the row whose id is `cursor`.
struct Window<T> {
    rows: Vec<T>,
    has_more: bool,
    first_page: bool,
}

fn paginate<T>(
    rows: Vec<T>,
    params: &ListParams,
    id: impl Fn(&T) -> String,
) -> Result<Window<T>, HttpResponse> {
    let start = match &params.cursor {
        None => 0,
        Some(cursor) => {
            rows.iter()
                .position(|row| id(row) == *cursor)
                .ok_or_else(|| bad_request("Invalid cursor"))?
                + 1
        }
    };

    let mut page: Vec<T> =
        rows.into_iter().skip(start).take(params.limit + 1).collect();
    let has_more = page.len() > params.limit;
    page.truncate(params.limit);

    Ok(Window {
        rows: page,
        has_more,
        first_page: params.cursor.is_none(),
    })
}

/// Record the request, then serve a scripted reply if one is queued.
fn intercept(
    req: &HttpRequest,
    query: &[(String, String)],
    store: &MockStore,
) -> Option<HttpResponse> {
    store.record(req.path(), query);
    store
        .next_scripted(req.path())
        .map(|reply| reply.into_response())
}

async fn players(
    req: HttpRequest,
    query: web::Query<Vec<(String, String)>>,
    store: web::Data<MockStore>,
) -> HttpResponse {
    let query = query.into_inner();
    if let Some(reply) = intercept(&req, &query, &store) {
        return reply;
    }
    let params = match ListParams::parse(&query) {
        Ok(params) => params,
        Err(response) => return response,
    };

    let search = param(&query, "search");
    let nationality = param(&query, "nationality");
    let position = param(&query, "position");
    let mut players: Vec<_> = store
        .players()
        .into_iter()
        .filter(|p| {
            search.is_none_or(|s| {
                contains(Some(&p.player_name), s)
                    || contains(p.nationality_1.as_deref(), s)
                    || contains(p.team_name.as_deref(), s)
                    || contains(p.position_player.as_deref(), s)
            })
        })
        .filter(|p| nationality.is_none_or(|n| contains(p.nationality_1.as_deref(), n)))
        .filter(|p| position.is_none_or(|n| contains(p.position_player.as_deref(), n)))
        .collect();
    // Highest rated first, ties by id
    players.sort_by(|a, b| {
        b.player_rating
            .unwrap_or(0.0)
            .total_cmp(&a.player_rating.unwrap_or(0.0))
            .then(a.id_player.cmp(&b.id_player))
    });
    let total = players.len();

    let window = match paginate(players, &params, |p| p.id_player.to_string()) {
        Ok(window) => window,
        Err(response) => return response,
    };
    let next_cursor = window
        .rows
        .last()
        .filter(|_| window.has_more)
        .map(|p| json!(p.id_player))
        .unwrap_or(Value::Null);

    let mut body = json!({
        "players": window.rows,
        "nextCursor": next_cursor,
        "hasMore": window.has_more,
    });
    if window.first_page {
        body["total"] = json!(total);
    }
    HttpResponse::Ok().json(body)
}

async fn scouts(
    req: HttpRequest,
    query: web::Query<Vec<(String, String)>>,
    store: web::Data<MockStore>,
) -> HttpResponse {
    let query = query.into_inner();
    if let Some(reply) = intercept(&req, &query, &store) {
        return reply;
    }
    let params = match ListParams::parse(&query) {
        Ok(params) => params,
        Err(response) => return response,
    };

    let search = param(&query, "search");
    let scouts: Vec<_> = store
        .scouts()
        .into_iter()
        .filter(|s| {
            search.is_none_or(|q| {
                contains(Some(&s.scout_name), q)
                    || contains(s.nationality.as_deref(), q)
            })
        })
        .collect();
    let total = scouts.len();

    let window = match paginate(scouts, &params, |s| s.id_scout.clone()) {
        Ok(window) => window,
        Err(response) => return response,
    };
    let next_cursor = window
        .rows
        .last()
        .filter(|_| window.has_more)
        .map(|s| s.id_scout.clone());

    HttpResponse::Ok().json(json!({
        "scouts": window.rows,
        "nextCursor": next_cursor,
        "hasMore": window.has_more,
        "totalCount": window.first_page.then_some(total),
    }))
}

async fn reports(
    req: HttpRequest,
    query: web::Query<Vec<(String, String)>>,
    store: web::Data<MockStore>,
) -> HttpResponse {
    let query = query.into_inner();
    if let Some(reply) = intercept(&req, &query, &store) {
        return reply;
    }
    let params = match ListParams::parse(&query) {
        Ok(params) => params,
        Err(response) => return response,
    };

    let search = param(&query, "search");
    let scout = param(&query, "scout");
    let mut reports: Vec<_> = store
        .reports()
        .into_iter()
        .filter(|r| search.is_none_or(|q| contains(Some(&r.player_name), q)))
        .filter(|r| scout.is_none_or(|q| contains(Some(&r.scout_name), q)))
        .collect();
    // Newest first
    reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let total = reports.len();

    let window = match paginate(reports, &params, |r| r.id_report.clone()) {
        Ok(window) => window,
        Err(response) => return response,
    };
    let next_cursor = window
        .rows
        .last()
        .filter(|_| window.has_more)
        .map(|r| r.id_report.clone());

    HttpResponse::Ok().json(json!({
        "items": window.rows,
        "nextCursor": next_cursor,
        "hasMore": window.has_more,
        "totalCount": total,
    }))
}
