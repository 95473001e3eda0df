use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use ecboard_proto::sheets::RowReader;
use ecboard_proto::transform::transform;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, info};

pub const DATA_ROUTE: &str = "/api/google-sheets-data";

#[derive(Clone)]
pub struct HttpState {
    /// `None` when the configured spreadsheet URL has no id.
    reader: Option<Arc<dyn RowReader>>,
}

impl HttpState {
    pub fn new(reader: Option<Arc<dyn RowReader>>) -> Self {
        Self { reader }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

fn error_response(error: &'static str, details: Option<String>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody { error, details }),
    )
        .into_response()
}

pub fn router(state: HttpState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(DATA_ROUTE, get(sheets_data))
        .layer(cors)
        .with_state(state)
}

pub fn start_server(
    bind_address: String,
    port: u16,
    state: HttpState,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let app = router(state);

        let addr = format!("{}:{}", bind_address, port);
        let listener = match TcpListener::bind(&addr).await {
            Ok(l) => l,
            Err(e) => {
                error!("Failed to bind HTTP server to {}: {}", addr, e);
                return;
            }
        };

        info!("Data endpoint listening on http://{}{}", addr, DATA_ROUTE);

        if let Err(e) = axum::serve(listener, app).await {
            error!("HTTP server error: {}", e);
        }
    })
}

async fn sheets_data(State(state): State<HttpState>) -> Response {
    let Some(reader) = state.reader.as_ref() else {
        error!("HTTP API: no spreadsheet id configured");
        return error_response("Invalid Google Sheets configuration", None);
    };

    match reader.read_rows().await {
        Ok(rows) => {
            let candidates = transform(&rows);
            debug!(
                "HTTP API: {} rows -> {} candidates",
                rows.len(),
                candidates.len()
            );
            Json(candidates).into_response()
        }
        Err(e) => {
            error!("HTTP API: reading {} failed: {}", reader.describe(), e);
            error_response("Failed to fetch data from Google Sheets", Some(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use ecboard_proto::error::FetchError;
    use ecboard_proto::transform::Cell;
    use serde_json::Value;
    use tower::ServiceExt;

    struct StubReader(Result<Vec<Vec<Cell>>, u16>);

    #[async_trait]
    impl RowReader for StubReader {
        async fn read_rows(&self) -> Result<Vec<Vec<Cell>>, FetchError> {
            match &self.0 {
                Ok(rows) => Ok(rows.clone()),
                Err(status) => Err(FetchError::SourceError {
                    status: *status,
                    body: "quota exceeded".into(),
                }),
            }
        }

        fn describe(&self) -> String {
            "stub".into()
        }
    }

    fn row(name: &str, value: &str) -> Vec<Cell> {
        let mut row = vec![Cell::from("1"), Cell::from(name), Cell::Blank, Cell::from("101")];
        row.extend((0..5).map(|_| Cell::from("1")));
        row.push(Cell::from("5"));
        row.push(Cell::from(value));
        row
    }

    fn app(reader: Option<StubReader>) -> Router {
        router(HttpState::new(
            reader.map(|r| Arc::new(r) as Arc<dyn RowReader>),
        ))
    }

    async fn call(app: Router, method: Method) -> (StatusCode, Value) {
        let resp = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(DATA_ROUTE)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_serves_ranked_candidates() {
        let rows = vec![
            vec![Cell::from("S.No"), Cell::from("Candidate Name")],
            row("A", "10.0"),
            row("B", "20.0"),
        ];
        let (status, body) = call(app(Some(StubReader(Ok(rows)))), Method::GET).await;
        assert_eq!(status, StatusCode::OK);

        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["name"], "B");
        assert_eq!(list[0]["position"], 1);
        assert_eq!(list[0]["id"], 2);
        assert_eq!(list[0]["flat"], "101");
        assert_eq!(list[0]["votes"]["920"], 1);
        assert_eq!(list[1]["name"], "A");
        assert_eq!(list[1]["totalValue"], 10.0);
    }

    #[tokio::test]
    async fn test_empty_sheet_is_empty_array() {
        let (status, body) = call(app(Some(StubReader(Ok(Vec::new())))), Method::GET).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_500_with_details() {
        let (status, body) = call(app(Some(StubReader(Err(429)))), Method::GET).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch data from Google Sheets");
        assert!(body["details"].as_str().unwrap().contains("429"));
    }

    #[tokio::test]
    async fn test_missing_spreadsheet_id() {
        let (status, body) = call(app(None), Method::GET).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Invalid Google Sheets configuration");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_other_methods_rejected() {
        let (status, _) = call(app(Some(StubReader(Ok(Vec::new())))), Method::POST).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let resp = app(None)
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri(DATA_ROUTE)
                    .header(header::ORIGIN, "http://projector.local")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(resp.status().is_success());
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
    }
}
