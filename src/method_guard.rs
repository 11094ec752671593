// method_guard.rs
use crate::error::ProxyError;

use actix_web::{
    body::{BoxBody, EitherBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    Error, ResponseError,
};
use futures::future::LocalBoxFuture;
use log::warn;
use std::future::{ready, Ready};
use std::task::{Context, Poll};

/// Answers anything but POST with 405 before the request reaches a handler.
pub struct PostOnly;

impl<S, B> Transform<S, ServiceRequest> for PostOnly
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type Transform = PostOnlyMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(PostOnlyMiddleware { service }))
    }
}

pub struct PostOnlyMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for PostOnlyMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if req.method() == Method::POST {
            let fut = self.service.call(req);
            return Box::pin(async move {
                let res: ServiceResponse<B> = fut.await?;
                Ok(res.map_into_left_body())
            });
        }

        warn!("Rejected {} {}", req.method(), req.path());
        Box::pin(async move {
            let (http_req, _payload) = req.into_parts();
            let res = ProxyError::MethodNotAllowed.error_response();
            Ok(ServiceResponse::new(http_req, res).map_into_right_body())
        })
    }
}
