use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Datelike, NaiveDate, Utc};
use event_layout::{compute_layout, CalendarMonth, Layout, MonthView};
use log::error;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::cache::RowCache;
use crate::upstream::{fetch_rows, FetchError};

const CALENDAR_PATH: &str = "/calendar";
const ICS_PATH: &str = "/calendar.ics";
const CALENDAR_NAME: &str = "Campus Events";

pub struct AppState {
    pub client: Client,
    pub upstream: Url,
    pub cache: RowCache,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(CALENDAR_PATH, get(handle_month))
        .route(ICS_PATH, get(handle_ics))
        .fallback(|| async { (StatusCode::NOT_FOUND, "Try /calendar or /calendar.ics") })
        .with_state(Arc::new(state))
}

#[derive(Debug, Default, Deserialize)]
struct MonthQuery {
    year: Option<i32>,
    month: Option<u32>,
}

/// The requested month, filling in whatever is left out from `today`.
fn resolve_month(query: &MonthQuery, today: NaiveDate) -> Option<CalendarMonth> {
    CalendarMonth::new(
        query.year.unwrap_or(today.year()),
        query.month.unwrap_or(today.month()),
    )
}

async fn handle_month(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MonthQuery>,
) -> Response {
    let Some(month) = resolve_month(&query, Utc::now().date_naive()) else {
        return (StatusCode::BAD_REQUEST, "Invalid year or month").into_response();
    };

    match load_layout(&state).await {
        Ok(layout) => Json(MonthView::build(&layout, month)).into_response(),
        Err(err) => upstream_failure(&err),
    }
}

async fn handle_ics(State(state): State<Arc<AppState>>) -> Response {
    match load_layout(&state).await {
        Ok(layout) => (
            [("content-type", "text/calendar")],
            layout.to_ics(CALENDAR_NAME).to_string(),
        )
            .into_response(),
        Err(err) => upstream_failure(&err),
    }
}

async fn load_layout(state: &AppState) -> Result<Layout, FetchError> {
    let rows = match state.cache.get(&state.upstream).await {
        Some(rows) => rows,
        None => {
            let rows = fetch_rows(&state.client, &state.upstream).await?;
            state.cache.insert(state.upstream.clone(), rows).await
        }
    };

    Ok(compute_layout(rows.iter().cloned()))
}

fn upstream_failure(err: &FetchError) -> Response {
    error!("{err}");
    (StatusCode::BAD_GATEWAY, "Failed to fetch events").into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use event_layout::PALETTE;
    use serde_json::Value;
    use tokio::net::TcpListener;
    use tokio::time::Duration;
    use tower::ServiceExt;

    use super::*;
    use crate::cache::Config;

    const EVENTS: &str = r#"[
        {"name": "Fair", "start": "2025-03-01", "end": "2025-03-02", "location": "Quad"},
        {"name": "Broken", "start": 20250301}
    ]"#;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 17).unwrap()
    }

    fn app(upstream: Url) -> Router {
        router(AppState {
            client: Client::new(),
            upstream,
            cache: RowCache::new(Config {
                enabled: false,
                ttl: Duration::from_secs(60),
            }),
        })
    }

    async fn send(app: Router, uri: &str) -> Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app.oneshot(request).await.unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// An upstream address nothing listens on.
    async fn closed_upstream() -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);
        Url::parse(&format!("http://{address}/events")).unwrap()
    }

    async fn serving_upstream(body: &'static str) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let upstream = Router::new().route("/events", get(move || async move { body }));
        tokio::spawn(async move { axum::serve(listener, upstream).await });
        Url::parse(&format!("http://{address}/events")).unwrap()
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let response = send(app(closed_upstream().await), "/events").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_month_is_bad_request() {
        let upstream = closed_upstream().await;

        let response = send(app(upstream.clone()), "/calendar?year=2025&month=13").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(app(upstream), "/calendar?month=march").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unreachable_upstream_is_bad_gateway() {
        let upstream = closed_upstream().await;

        let response = send(app(upstream.clone()), "/calendar?year=2025&month=3").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = send(app(upstream), "/calendar.ics").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn month_view_is_served_as_json() {
        let upstream = serving_upstream(EVENTS).await;
        let response = send(app(upstream), "/calendar?year=2025&month=3").await;
        assert_eq!(response.status(), StatusCode::OK);

        let view = serde_json::from_str::<Value>(&body_text(response).await).unwrap();
        assert_eq!(view["year"], 2025);
        assert_eq!(view["month"], 3);
        assert_eq!(view["legend"]["Quad"], PALETTE[0]);
        assert_eq!(view["agenda"].as_array().unwrap().len(), 1);
        assert_eq!(view["agenda"][0]["event"]["name"], "Fair");
    }

    #[tokio::test]
    async fn feed_is_served_as_icalendar() {
        let upstream = serving_upstream(EVENTS).await;
        let response = send(app(upstream), "/calendar.ics").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/calendar");

        let feed = body_text(response).await;
        assert!(feed.starts_with("BEGIN:VCALENDAR"));
        assert!(feed.contains("SUMMARY:Fair"));
        assert!(!feed.contains("Broken"));
    }

    #[test]
    fn missing_parts_come_from_today() {
        let month = resolve_month(&MonthQuery::default(), today()).unwrap();
        assert_eq!((month.year(), month.month()), (2025, 3));

        let query = MonthQuery {
            year: None,
            month: Some(11),
        };
        let month = resolve_month(&query, today()).unwrap();
        assert_eq!((month.year(), month.month()), (2025, 11));

        let query = MonthQuery {
            year: Some(2026),
            month: Some(1),
        };
        let month = resolve_month(&query, today()).unwrap();
        assert_eq!((month.year(), month.month()), (2026, 1));
    }

    #[test]
    fn out_of_range_month_is_rejected() {
        let query = MonthQuery {
            year: None,
            month: Some(13),
        };
        assert!(resolve_month(&query, today()).is_none());

        let query = MonthQuery {
            year: None,
            month: Some(0),
        };
        assert!(resolve_month(&query, today()).is_none());
    }
}
