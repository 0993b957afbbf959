//! HTTP method wrapper

use std::fmt;
use std::str::FromStr;

/// Method wrapper that keeps axum's type out of endpoint declarations
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HttpMethod(axum::http::Method);

impl HttpMethod {
    pub const GET: Self = Self(axum::http::Method::GET);
    pub const POST: Self = Self(axum::http::Method::POST);
    pub const PUT: Self = Self(axum::http::Method::PUT);
    pub const DELETE: Self = Self(axum::http::Method::DELETE);
    pub const PATCH: Self = Self(axum::http::Method::PATCH);
    pub const HEAD: Self = Self(axum::http::Method::HEAD);
    pub const OPTIONS: Self = Self(axum::http::Method::OPTIONS);

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub(crate) fn from_axum(method: axum::http::Method) -> Self {
        Self(method)
    }
}

impl FromStr for HttpMethod {
    type Err = axum::http::method::InvalidMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        axum::http::Method::from_str(s).map(Self)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
