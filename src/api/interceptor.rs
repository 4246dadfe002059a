use reqwest::Request;

/// Hook run on every outgoing request before it reaches the transport.
///
/// Interceptors run synchronously on the calling task, in the order they were
/// installed, and each one hands back the (possibly rewritten) request.
/// Plain closures `Fn(Request) -> Request` qualify.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, request: Request) -> Request;
}

impl<F> RequestInterceptor for F
where
    F: Fn(Request) -> Request + Send + Sync,
{
    fn intercept(&self, request: Request) -> Request {
        self(request)
    }
}

/// Slot for attaching the session's bearer token. Currently passes the request through untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct AuthPlaceholder;

impl RequestInterceptor for AuthPlaceholder {
    fn intercept(&self, request: Request) -> Request {
        request
    }
}
