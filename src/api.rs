//! API client for schema graph data
//!
//! Fetches `{nodes, edges}` payloads from the migration backend. A failed
//! fetch is reported to the caller; there is no retry.

use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::{ErdError, Result};
use crate::graph::{ErdGraph, SchemaDomain};

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Path of the ERD endpoint for a domain
    pub fn erd_path(domain: SchemaDomain) -> String {
        format!("/api/schema-graph/{}/erd", domain.as_str())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.http.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            return Err(ErdError::Status {
                status: response.status().as_u16(),
                url,
            });
        }

        // Decode via serde_json so malformed bodies surface as payload errors
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch the ERD for a domain, optionally pre-filtered server side by a
    /// table-name substring
    pub async fn get_erd(&self, domain: SchemaDomain, table_filter: Option<&str>) -> Result<ErdGraph> {
        let path = Self::erd_path(domain);
        let query: Vec<(&str, &str)> = table_filter
            .filter(|f| !f.trim().is_empty())
            .map(|f| vec![("table_filter", f)])
            .unwrap_or_default();

        let graph: ErdGraph = self.get(&path, &query).await?;
        info!(
            domain = %domain,
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "Fetched schema ERD"
        );
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned HTTP response on an ephemeral port. The handle yields
    /// the request head as received.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&head).into_owned()
        });

        (base_url, handle)
    }

    #[test]
    fn test_erd_path() {
        assert_eq!(ApiClient::erd_path(SchemaDomain::Source), "/api/schema-graph/source/erd");
        assert_eq!(ApiClient::erd_path(SchemaDomain::Target), "/api/schema-graph/target/erd");
    }

    #[test]
    fn test_base_url_trimmed() {
        let client = ApiClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_http_error() {
        // Reserve a port, then close it so nothing is listening
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(&format!("http://{addr}"));
        let err = client.get_erd(SchemaDomain::Target, None).await.unwrap_err();
        assert!(matches!(err, ErdError::Http(_)));
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported() {
        let (base_url, server) = serve_once("400 Bad Request", r#"{"detail": "unknown domain"}"#).await;
        let client = ApiClient::new(&base_url);

        let err = client.get_erd(SchemaDomain::Source, Some("pmi")).await.unwrap_err();

        match err {
            ErdError::Status { status, url } => {
                assert_eq!(status, 400);
                assert!(url.ends_with("/api/schema-graph/source/erd"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/schema-graph/source/erd?table_filter=pmi "));
    }

    #[tokio::test]
    async fn test_blank_table_filter_is_not_sent() {
        let (base_url, server) = serve_once("200 OK", r#"{"nodes": [], "edges": []}"#).await;
        let client = ApiClient::new(&base_url);

        let graph = client.get_erd(SchemaDomain::Target, Some("  ")).await.unwrap();

        assert!(graph.is_empty());
        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/schema-graph/target/erd "));
    }

    #[tokio::test]
    async fn test_success_payload_is_decoded() {
        let (base_url, _server) = serve_once(
            "200 OK",
            r#"{"domain": "target", "nodes": [{"id": "LOAD_PMI", "column_count": 48}], "edges": []}"#,
        )
        .await;
        let client = ApiClient::new(&base_url);

        let graph = client.get_erd(SchemaDomain::Target, None).await.unwrap();

        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].id, "LOAD_PMI");
    }

    #[tokio::test]
    async fn test_malformed_body_is_payload_error() {
        let (base_url, _server) = serve_once("200 OK", "<html>not json</html>").await;
        let client = ApiClient::new(&base_url);

        let err = client.get_erd(SchemaDomain::Target, None).await.unwrap_err();
        assert!(matches!(err, ErdError::Payload(_)));
    }
}
