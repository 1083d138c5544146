use std::task::{Context, Poll};

use futures::future::BoxFuture;
use http::{Request, Response};
use http_body::Body as HttpBody;
use respcache::{BeforeOutcome, BufferedBody, CacheStore, RequestView, ResponseCacheInterceptor};
use tower::{BoxError, Service};
use tracing::{debug, trace};

/// Tower service that runs the cache hooks around an inner service.
///
/// Hits are answered without calling the inner service. Misses call it and
/// hand the response to the post-handler hook. Errors returned by the inner
/// service are passed through and never cached.
pub struct ResponseCacheService<S, St> {
    inner: S,
    interceptor: ResponseCacheInterceptor<St>,
}

impl<S, St> ResponseCacheService<S, St> {
    /// Wraps `inner` with `interceptor`.
    pub fn new(inner: S, interceptor: ResponseCacheInterceptor<St>) -> Self {
        Self { inner, interceptor }
    }
}

impl<S, St> Clone for ResponseCacheService<S, St>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            interceptor: self.interceptor.clone(),
        }
    }
}

impl<S, St, ReqBody, ResBody> Service<Request<ReqBody>> for ResponseCacheService<S, St>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    S::Error: Into<BoxError>,
    St: CacheStore + 'static,
    ReqBody: Send + 'static,
    ResBody: HttpBody + Send + 'static,
    ResBody::Data: Send,
    ResBody::Error: Send,
{
    type Response = Response<BufferedBody<ResBody>>;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        // The ready inner service goes into the future; keep a fresh clone.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let interceptor = self.interceptor.clone();

        Box::pin(async move {
            let view = RequestView::from_request(&request);
            let pending = match interceptor.before_handler(Some(&view)).await? {
                BeforeOutcome::HitServed(response) => {
                    return Ok(response.map(BufferedBody::from));
                }
                BeforeOutcome::MissPassthrough(pending) => pending,
            };

            let response = match inner.call(request).await {
                Ok(response) => response,
                Err(error) => {
                    let error: BoxError = error.into();
                    debug!(path = view.path(), %error, "handler failed, nothing cached");
                    return Err(error);
                }
            };

            let (response, outcome) = interceptor
                .after_handler(Some(&view), pending, response)
                .await?;
            trace!(path = view.path(), ?outcome, "post-handler hook finished");
            Ok::<_, BoxError>(response)
        })
    }
}
