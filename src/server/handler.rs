// src/server/handler.rs
use hyper::{Body, Request, Response};
use std::convert::Infallible;
use std::time::Instant;
use tower::Service;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::routes;
use crate::state::AppState;

#[derive(Clone)]
pub struct AppService {
    state: AppState,
}

impl AppService {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl Service<Request<Body>> for AppService {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let state = self.state.clone();
        let request_id = Uuid::new_v4();
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let span = info_span!("request", %request_id, %method, %path);

        Box::pin(
            async move {
                let start = Instant::now();
                let response = routes::route(&state, req).await;
                info!(
                    status = response.status().as_u16(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "{} {}",
                    method,
                    path
                );
                Ok(response)
            }
            .instrument(span),
        )
    }
}
