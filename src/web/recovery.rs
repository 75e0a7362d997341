//! Per-request recovery boundary.
//!
//! A panic raised while a wrapped service handles a request (either in
//! `call` or while its future is polled) is logged with the stack where it
//! started and answered with a plain `500 Internal Server Error`. The
//! connection and the serving task survive.

use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};
use tower_http::catch_panic::{CatchPanic, CatchPanicLayer, ResponseForPanic};

use crate::recover::{log_captured, BoundaryScope, CapturedError};

pub const INTERNAL_SERVER_ERROR_BODY: &str = "Internal Server Error";

/// Turns a captured panic payload into the fixed error response.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicResponder;

impl ResponseForPanic for PanicResponder {
    type ResponseBody = axum::body::Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response {
        log_captured(&CapturedError::from_unwind(err));
        (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR_BODY).into_response()
    }
}

/// [`CatchPanicLayer`] with [`PanicResponder`], around a service that marks
/// each call and poll as running inside a recovery boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoveryLayer;

impl<S> Layer<S> for RecoveryLayer {
    type Service = CatchPanic<BoundaryService<S>, PanicResponder>;

    fn layer(&self, inner: S) -> Self::Service {
        CatchPanicLayer::custom(PanicResponder).layer(BoundaryService { inner })
    }
}

pub fn recovery_layer() -> RecoveryLayer {
    RecoveryLayer
}

#[derive(Debug, Clone)]
pub struct BoundaryService<S> {
    inner: S,
}

impl<S, Request> Service<Request> for BoundaryService<S>
where
    S: Service<Request>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoundaryFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        let _scope = BoundaryScope::enter();
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let _scope = BoundaryScope::enter();
        BoundaryFuture {
            inner: Box::pin(self.inner.call(request)),
        }
    }
}

pub struct BoundaryFuture<F> {
    inner: Pin<Box<F>>,
}

impl<F: Future> Future for BoundaryFuture<F> {
    type Output = F::Output;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let _scope = BoundaryScope::enter();
        self.inner.as_mut().poll(cx)
    }
}
