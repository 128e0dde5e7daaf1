//! # Trellis Engine
//!
//! Route data execution for navigable route trees: wraps per-route
//! loaders and actions with concurrent module loading, redirect
//! interception, and a two-tier success/boundary/fault error model.
//!
//! The engine sits between the navigation router and three external
//! collaborators, each behind a trait seam:
//!
//! - [`DataFetcher`] performs the data request; its `Err` side is the
//!   fault value the error model surfaces unchanged.
//! - [`ModuleLoader`] resolves a route's code module; results land in a
//!   shared, append-only [`ModuleCache`].
//! - [`StylePrefetcher`] warms the module's style resources.
//!
//! Loaders run fetch and module load concurrently and join both before
//! branching on the result; actions fetch first and skip the module load
//! entirely when the response redirects. Cross-origin redirects are a
//! terminal, tagged outcome: the caller replaces the whole application
//! location instead of receiving route data.
//!
//! ## Example
//!
//! ```
//! use trellis_engine::{marker, FetchResponse, RedirectCheck, RedirectInterceptor};
//! use http::StatusCode;
//! use url::Url;
//!
//! let origin = Url::parse("http://localhost:3000").unwrap();
//! let interceptor = RedirectInterceptor::new(origin);
//!
//! let response = FetchResponse::new(StatusCode::NO_CONTENT)
//!     .with_header(marker::REDIRECT, "/login");
//!
//! match interceptor.check(&response).unwrap() {
//!     RedirectCheck::SameOrigin(redirect) => assert_eq!(redirect.location, "/login"),
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```

pub mod engine;
pub mod error;
pub mod fetch;
pub mod module;
pub mod redirect;

pub use engine::{DataFnArgs, NavRoute, RouteDataEngine, RouteDataOutcome};
pub use error::{CatchSignal, RouteDataError};
pub use fetch::{
    is_catch_response, is_error_response, marker, DataFetcher, FetchResponse, Submission,
};
pub use module::{
    ModuleCache, ModuleLoader, ReloadArgs, ReloadPredicate, RouteModule, StylePrefetcher,
};
pub use redirect::{RedirectCheck, RedirectDescriptor, RedirectInterceptor};
