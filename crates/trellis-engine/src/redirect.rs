// File: src/redirect.rs
// Purpose: Redirect marker detection and origin-aware resolution

use crate::fetch::{marker, FetchResponse};
use anyhow::{Context, Result};
use url::Url;

/// Resolved same-origin redirect target plus revalidate flag.
#[derive(Debug, Clone, PartialEq)]
pub struct RedirectDescriptor {
    /// Path, query, and fragment of the target.
    pub location: String,
    /// Set by mere presence of the revalidate marker header.
    pub revalidate: bool,
}

/// Result of inspecting a response for redirect markers.
#[derive(Debug, Clone, PartialEq)]
pub enum RedirectCheck {
    /// No redirect marker on the response.
    None,
    /// Same-origin target for the router to navigate to.
    SameOrigin(RedirectDescriptor),
    /// Cross-origin target. Terminal for the calling operation: the
    /// caller performs an origin-level replace navigation and must not
    /// expect route data.
    ExternalNavigation(Url),
}

/// Inspects fetch responses for redirect markers and resolves them
/// against the current application origin.
#[derive(Debug, Clone)]
pub struct RedirectInterceptor {
    origin: Url,
}

impl RedirectInterceptor {
    pub fn new(origin: Url) -> Self {
        Self { origin }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Checks `response` for a redirect marker and classifies the target.
    pub fn check(&self, response: &FetchResponse) -> Result<RedirectCheck> {
        let Some(target) = response.header(marker::REDIRECT) else {
            return Ok(RedirectCheck::None);
        };

        let resolved = self
            .origin
            .join(target)
            .with_context(|| format!("invalid redirect target `{}`", target))?;

        if !self.same_origin(&resolved) {
            return Ok(RedirectCheck::ExternalNavigation(resolved));
        }

        let revalidate = response.headers.contains_key(marker::REVALIDATE);
        Ok(RedirectCheck::SameOrigin(RedirectDescriptor {
            location: location_of(&resolved),
            revalidate,
        }))
    }

    fn same_origin(&self, url: &Url) -> bool {
        url.scheme() == self.origin.scheme()
            && url.host() == self.origin.host()
            && url.port_or_known_default() == self.origin.port_or_known_default()
    }
}

/// Path, query, and fragment of `url` as a single navigable string.
fn location_of(url: &Url) -> String {
    let mut location = url.path().to_string();
    if let Some(query) = url.query() {
        location.push('?');
        location.push_str(query);
    }
    if let Some(fragment) = url.fragment() {
        location.push('#');
        location.push_str(fragment);
    }
    location
}
