//! Typed request dispatch for the storefront API.
//!
//! # Design
//! `StoreClient` holds a `base_url` and a `Transport` and carries no mutable
//! state between calls. Each catalog operation is split into a `build_*`
//! method that produces a `RequestDescriptor` and an async `get_*` method
//! that runs it through `dispatch_with`. Dispatch is total: transport errors,
//! non-2xx statuses, body decoding errors, and transform errors (including
//! panics) are all classified and returned as `ResultWrapper::Failure`.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::classify::classify;
use crate::config::ClientConfig;
use crate::error::{BoxError, Cancelled, DispatchFailure, TransportError};
use crate::http::RequestDescriptor;
use crate::result::ResultWrapper;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{CategoriesListResponse, CategoryList, ProductList, ProductListResponse};

/// Stateless dispatcher for the storefront API.
#[derive(Debug, Clone)]
pub struct StoreClient<T> {
    base_url: String,
    transport: T,
}

impl StoreClient<ReqwestTransport> {
    /// Client over a fresh pooled `reqwest` transport.
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        Ok(Self::new(&config.base_url, ReqwestTransport::new(config)?))
    }
}

impl<T: Transport> StoreClient<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_products_request(&self, category: Option<u32>) -> RequestDescriptor {
        let url = match category {
            Some(id) => format!("{}/products/category/{id}", self.base_url),
            None => format!("{}/products", self.base_url),
        };
        RequestDescriptor::get(url).with_header("accept", "application/json")
    }

    pub fn build_categories_request(&self) -> RequestDescriptor {
        RequestDescriptor::get(format!("{}/categories", self.base_url))
            .with_header("accept", "application/json")
    }

    /// Products, optionally restricted to one category, in server order.
    pub async fn get_products(&self, category: Option<u32>) -> ResultWrapper<ProductList> {
        self.dispatch_with(self.build_products_request(category), |response: ProductListResponse| {
            Ok(ProductList::from(response))
        })
        .await
    }

    pub async fn get_categories(&self) -> ResultWrapper<CategoryList> {
        self.dispatch_with(self.build_categories_request(), |response: CategoriesListResponse| {
            Ok(CategoryList::from(response))
        })
        .await
    }

    /// Dispatch with the decoded response as the result.
    pub async fn dispatch<Resp>(&self, descriptor: RequestDescriptor) -> ResultWrapper<Resp>
    where
        Resp: DeserializeOwned,
    {
        self.dispatch_with(descriptor, Ok).await
    }

    /// Issue `descriptor`, decode the body as `Resp`, and map it through
    /// `transform`. Never fails: every raised failure is classified.
    pub async fn dispatch_with<Resp, R, F>(
        &self,
        descriptor: RequestDescriptor,
        transform: F,
    ) -> ResultWrapper<R>
    where
        Resp: DeserializeOwned,
        F: FnOnce(Resp) -> Result<R, BoxError>,
    {
        let method = descriptor.method;
        let url = descriptor.full_url();
        debug!(%method, %url, "dispatching request");

        match self.try_dispatch(&descriptor, transform).await {
            Ok(value) => {
                debug!(%method, %url, "request succeeded");
                ResultWrapper::Success(value)
            }
            Err(raised) => {
                let kind = classify(&raised);
                warn!(%method, %url, status = kind.status(), error = %kind, "request failed");
                ResultWrapper::Failure(kind)
            }
        }
    }

    /// Like `dispatch_with`, but gives up as soon as `cancel` fires.
    ///
    /// Cancellation drops the in-flight call and is reported as `Cancelled`,
    /// never as a classified failure.
    pub async fn dispatch_cancellable<Resp, R, F>(
        &self,
        descriptor: RequestDescriptor,
        transform: F,
        cancel: &CancellationToken,
    ) -> Result<ResultWrapper<R>, Cancelled>
    where
        Resp: DeserializeOwned,
        F: FnOnce(Resp) -> Result<R, BoxError>,
    {
        let url = descriptor.url.clone();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(%url, "dispatch cancelled");
                Err(Cancelled)
            }
            outcome = self.dispatch_with(descriptor, transform) => Ok(outcome),
        }
    }

    async fn try_dispatch<Resp, R, F>(
        &self,
        descriptor: &RequestDescriptor,
        transform: F,
    ) -> Result<R, DispatchFailure>
    where
        Resp: DeserializeOwned,
        F: FnOnce(Resp) -> Result<R, BoxError>,
    {
        let response = self.transport.execute(descriptor).await?;
        if !response.is_success() {
            return Err(DispatchFailure::Status {
                status: response.status,
                body: response.body,
            });
        }

        // A blank 2xx body decodes as JSON `null`, so `()` and `Option` responses work.
        let body = if response.body.trim().is_empty() {
            "null"
        } else {
            response.body.as_str()
        };
        let decoded: Resp = serde_json::from_str(body)?;
        run_transform(transform, decoded)
    }
}

fn run_transform<Resp, R, F>(transform: F, decoded: Resp) -> Result<R, DispatchFailure>
where
    F: FnOnce(Resp) -> Result<R, BoxError>,
{
    match panic::catch_unwind(AssertUnwindSafe(move || transform(decoded))) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(DispatchFailure::Transform(err)),
        Err(payload) => Err(DispatchFailure::TransformPanic(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::error::{ErrorKind, TransportErrorKind};
    use crate::http::{HttpMethod, HttpResponse};

    /// Replays canned outcomes in order and records every request it sees.
    #[derive(Default)]
    struct ScriptedTransport {
        outcomes: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
        seen: Mutex<Vec<RequestDescriptor>>,
    }

    impl ScriptedTransport {
        fn responding(status: u16, body: &str) -> Self {
            let transport = Self::default();
            transport.push(Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            }));
            transport
        }

        fn failing(kind: TransportErrorKind, message: &str) -> Self {
            let transport = Self::default();
            transport.push(Err(TransportError::new(kind, message)));
            transport
        }

        fn push(&self, outcome: Result<HttpResponse, TransportError>) {
            self.outcomes.lock().unwrap().push_back(outcome);
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn execute(&self, request: &RequestDescriptor) -> Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push(request.clone());
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted outcome left")
        }
    }

    /// Never answers.
    struct StalledTransport;

    #[async_trait]
    impl Transport for StalledTransport {
        async fn execute(&self, _request: &RequestDescriptor) -> Result<HttpResponse, TransportError> {
            std::future::pending().await
        }
    }

    const PRODUCTS: &str = r#"[
        {"id":7,"title":"Kettle","price":24.0,"categoryId":2,"description":"Steel","image":"k.png"},
        {"id":3,"title":"Toaster","price":31.5,"categoryId":2,"description":"Two slots","image":"t.png"}
    ]"#;

    fn client(transport: ScriptedTransport) -> StoreClient<ScriptedTransport> {
        StoreClient::new("http://localhost:3000", transport)
    }

    #[test]
    fn build_products_request_without_category() {
        let req = client(ScriptedTransport::default()).build_products_request(None);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/products");
        assert!(req.body.is_none());
        assert!(req.query.is_empty());
    }

    #[test]
    fn build_products_request_with_category() {
        let req = client(ScriptedTransport::default()).build_products_request(Some(2));
        assert_eq!(req.url, "http://localhost:3000/products/category/2");
        assert_eq!(
            req.headers,
            vec![("accept".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn build_categories_request_produces_correct_request() {
        let req = client(ScriptedTransport::default()).build_categories_request();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/categories");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = StoreClient::new("http://localhost:3000/", ScriptedTransport::default());
        assert_eq!(
            client.build_categories_request().url,
            "http://localhost:3000/categories"
        );
    }

    #[tokio::test]
    async fn get_products_preserves_order() {
        let client = client(ScriptedTransport::responding(200, PRODUCTS));
        let result = client.get_products(Some(2)).await;

        let ResultWrapper::Success(list) = result else {
            panic!("expected success, got {result:?}");
        };
        let ids: Vec<u32> = list.products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![7, 3]);

        let seen = client.transport.seen.lock().unwrap();
        assert_eq!(seen[0].url, "http://localhost:3000/products/category/2");
    }

    #[tokio::test]
    async fn get_categories_reads_envelope() {
        let body = r#"{"data":[{"id":1,"title":"Kitchen","image":"k.png"}],"msg":"ok"}"#;
        let client = client(ScriptedTransport::responding(200, body));
        let list = client.get_categories().await.into_result().unwrap();
        assert_eq!(list.titles(), vec!["Kitchen"]);
        assert_eq!(list.msg.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn server_error_is_classified() {
        let client = client(ScriptedTransport::responding(500, "internal error"));
        let result = client.get_products(None).await;
        assert_eq!(
            result,
            ResultWrapper::Failure(ErrorKind::ServerError {
                status: 500,
                message: "internal error".into()
            })
        );
    }

    #[tokio::test]
    async fn not_found_is_client_error() {
        let client = client(ScriptedTransport::responding(404, ""));
        let result = client.get_categories().await;
        assert!(matches!(
            result,
            ResultWrapper::Failure(ErrorKind::ClientError { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error() {
        let client = client(ScriptedTransport::failing(
            TransportErrorKind::Connect,
            "connection refused",
        ));
        let result = client.get_categories().await;
        assert_eq!(
            result,
            ResultWrapper::Failure(ErrorKind::TransportError("connection refused".into()))
        );
    }

    #[tokio::test]
    async fn shared_transport_dispatches() {
        let transport = std::sync::Arc::new(ScriptedTransport::responding(200, "[]"));
        let client = StoreClient::new("http://localhost:3000", transport.clone());
        let list = client.get_products(None).await.into_result().unwrap();
        assert!(list.products.is_empty());
        assert_eq!(transport.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn bad_json_is_unknown_error() {
        let client = client(ScriptedTransport::responding(200, "not json"));
        let result = client.get_products(None).await;
        assert!(matches!(result, ResultWrapper::Failure(ErrorKind::UnknownError(_))));
    }

    #[tokio::test]
    async fn failing_transform_is_unknown_error() {
        let client = client(ScriptedTransport::responding(200, PRODUCTS));
        let descriptor = client.build_products_request(None);
        let result: ResultWrapper<usize> = client
            .dispatch_with(descriptor, |products: Vec<serde_json::Value>| {
                Err(format!("rejected {} products", products.len()).into())
            })
            .await;
        assert_eq!(
            result,
            ResultWrapper::Failure(ErrorKind::UnknownError("rejected 2 products".into()))
        );
    }

    #[tokio::test]
    async fn panicking_transform_is_unknown_error() {
        let client = client(ScriptedTransport::responding(200, PRODUCTS));
        let descriptor = client.build_products_request(None);
        let result: ResultWrapper<()> = client
            .dispatch_with(descriptor, |_: Vec<serde_json::Value>| -> Result<(), BoxError> {
                panic!("mapper exploded")
            })
            .await;
        assert_eq!(
            result,
            ResultWrapper::Failure(ErrorKind::UnknownError(
                "transform panicked: mapper exploded".into()
            ))
        );
    }

    #[tokio::test]
    async fn dispatch_without_transform_returns_decoded_body() {
        let client = client(ScriptedTransport::responding(200, "[1,2,3]"));
        let descriptor = RequestDescriptor::get("http://localhost:3000/numbers").with_query("limit", "3");
        let result: ResultWrapper<Vec<u32>> = client.dispatch(descriptor).await;
        assert_eq!(result, ResultWrapper::Success(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn blank_success_body_decodes_as_unit() {
        let client = client(ScriptedTransport::responding(204, ""));
        let descriptor = RequestDescriptor::get("http://localhost:3000/ping");
        let result: ResultWrapper<()> = client.dispatch(descriptor).await;
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits() {
        let client = StoreClient::new("http://localhost:3000", StalledTransport);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let descriptor = client.build_categories_request();
        let outcome = client
            .dispatch_cancellable(
                descriptor,
                |c: CategoriesListResponse| Ok(CategoryList::from(c)),
                &cancel,
            )
            .await;
        assert_eq!(outcome, Err(Cancelled));
    }

    #[tokio::test]
    async fn cancellation_aborts_in_flight_call() {
        let client = StoreClient::new("http://localhost:3000", StalledTransport);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });
        let outcome: Result<ResultWrapper<Vec<u32>>, Cancelled> = client
            .dispatch_cancellable(RequestDescriptor::get("http://localhost:3000/slow"), Ok, &cancel)
            .await;
        assert_eq!(outcome, Err(Cancelled));
    }

    #[tokio::test]
    async fn uncancelled_dispatch_completes() {
        let client = client(ScriptedTransport::responding(200, "[4]"));
        let cancel = CancellationToken::new();
        let outcome: Result<ResultWrapper<Vec<u32>>, Cancelled> = client
            .dispatch_cancellable(RequestDescriptor::get("http://localhost:3000/n"), Ok, &cancel)
            .await;
        assert_eq!(outcome, Ok(ResultWrapper::Success(vec![4])));
    }
}
