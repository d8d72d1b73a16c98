// Record store HTTP client
//
// Wraps `reqwest::Client` with collection/record URL construction and
// status translation. Endpoint modules (mobiles, wishlist, reviews) are
// implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for a json-server style record store.
///
/// Every collection lives at `{base}/{collection}` and every record at
/// `{base}/{collection}/{id}`. Responses are plain JSON records or arrays
/// of records; there is no envelope.
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    base_url: Url,
}

impl StoreClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// The `base_url` is the store root, e.g. `http://localhost:3001`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The store base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/{collection}`
    pub(crate) fn collection_url(&self, collection: &str) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Request {
                message: format!("store URL cannot be a base: {}", self.base_url),
            })?
            .pop_if_empty()
            .push(collection);
        Ok(url)
    }

    /// `{base}/{collection}/{id}`, with the id percent-encoded as one segment.
    pub(crate) fn record_url(&self, collection: &str, id: &str) -> Result<Url, Error> {
        if id.is_empty() {
            return Err(Error::Request {
                message: format!("empty record id for {collection}"),
            });
        }
        let mut url = self.collection_url(collection)?;
        url.path_segments_mut()
            .map_err(|()| Error::Request {
                message: format!("store URL cannot be a base: {}", self.base_url),
            })?
            .push(id);
        Ok(url)
    }

    /// Resolve a resource path such as `mobiles/42` or `reviews?mobileId=1`
    /// against the base. Anything after `?` becomes the query string.
    fn resource_url(&self, resource_path: &str) -> Result<Url, Error> {
        let (path, query) = match resource_path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (resource_path, None),
        };

        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| Error::Request {
                message: format!("store URL cannot be a base: {}", self.base_url),
            })?;
            segments.pop_if_empty();
            for segment in path.split('/').filter(|s| !s.is_empty()) {
                segments.push(segment);
            }
        }
        url.set_query(query.filter(|q| !q.is_empty()));
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Issue `method` against a resource path with an optional JSON body.
    ///
    /// This is the generic entry point; the typed endpoint methods build
    /// their URLs directly and go through [`send`](Self::send).
    pub async fn request<T, B>(
        &self,
        method: Method,
        resource_path: &str,
        body: Option<&B>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.resource_url(resource_path)?;
        self.send(method, url, body).await
    }

    /// Send a GET request and decode the body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        self.send(Method::GET, url, None::<&()>).await
    }

    /// Send a GET request with query parameters (e.g. `?mobileId=...`).
    pub(crate) async fn get_query<T: DeserializeOwned>(
        &self,
        mut url: Url,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        self.get(url).await
    }

    /// Send a POST request with JSON body.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        self.send(Method::POST, url, Some(body)).await
    }

    /// Send a PUT request with JSON body (full replace).
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        self.send(Method::PUT, url, Some(body)).await
    }

    /// Send a DELETE request, discarding whatever body comes back.
    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        let _: serde_json::Value = self.send(Method::DELETE, url, None::<&()>).await?;
        Ok(())
    }

    async fn send<T, B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        debug!("{} {}", method, url);

        let mut builder = self.http.request(method, url.clone());
        if let Some(body) = body {
            let payload = serde_json::to_vec(body).map_err(|e| Error::Request {
                message: format!("failed to encode request body: {e}"),
            })?;
            builder = builder.header(CONTENT_TYPE, "application/json").body(payload);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| Error::from_reqwest(&e, &url))?;

        Self::parse_response(resp, &url).await
    }

    /// Map non-2xx statuses to `Error::Server`, otherwise decode the body.
    ///
    /// An empty success body decodes as JSON `null`, so callers that expect
    /// `serde_json::Value` or `Option<T>` tolerate 204 responses.
    async fn parse_response<T: DeserializeOwned>(
        resp: reqwest::Response,
        url: &Url,
    ) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::from_reqwest(&e, url))?;

        if !status.is_success() {
            return Err(Error::Server {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_owned(),
                body,
            });
        }

        let text = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(text).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> StoreClient {
        StoreClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn collection_url_handles_trailing_slash() {
        assert_eq!(
            client("http://localhost:3001").collection_url("mobiles").unwrap().as_str(),
            "http://localhost:3001/mobiles"
        );
        assert_eq!(
            client("http://localhost:3001/api/").collection_url("wishlist").unwrap().as_str(),
            "http://localhost:3001/api/wishlist"
        );
    }

    #[test]
    fn record_url_escapes_the_id() {
        let url = client("http://localhost:3001").record_url("mobiles", "a b/c").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3001/mobiles/a%20b%2Fc");
    }

    #[test]
    fn record_url_rejects_empty_id() {
        let err = client("http://localhost:3001").record_url("mobiles", "").unwrap_err();
        assert!(matches!(err, Error::Request { .. }));
    }

    #[test]
    fn resource_url_splits_nested_paths() {
        let url = client("http://localhost:3001/").resource_url("/reviews/7").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3001/reviews/7");
    }

    #[test]
    fn resource_url_keeps_the_query_string() {
        let url = client("http://localhost:3001").resource_url("reviews?mobileId=1").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3001/reviews?mobileId=1");
        assert_eq!(url.path(), "/reviews");

        let bare = client("http://localhost:3001").resource_url("reviews?").unwrap();
        assert_eq!(bare.as_str(), "http://localhost:3001/reviews");
    }
}
