// src/security/layer.rs
use super::rules::HeaderRules;
use futures::future::BoxFuture;
use hyper::{Request, Response};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Wraps a service so every response carries the headers of the rules that
/// match the request path.
#[derive(Clone)]
pub struct SecurityHeadersLayer {
    rules: Arc<HeaderRules>,
}

impl SecurityHeadersLayer {
    pub fn new(rules: HeaderRules) -> Self {
        Self {
            rules: Arc::new(rules),
        }
    }
}

impl<S> Layer<S> for SecurityHeadersLayer {
    type Service = SecurityHeaders<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SecurityHeaders {
            inner,
            rules: self.rules.clone(),
        }
    }
}

#[derive(Clone)]
pub struct SecurityHeaders<S> {
    inner: S,
    rules: Arc<HeaderRules>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for SecurityHeaders<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // Resolve before handing the request off; the path is gone afterwards.
        let headers = self.rules.headers_for(req.uri().path());
        let fut = self.inner.call(req);

        Box::pin(async move {
            let mut response = fut.await?;
            let map = response.headers_mut();
            for (name, value) in headers {
                map.insert(name, value);
            }
            Ok(response)
        })
    }
}
