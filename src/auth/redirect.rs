//! Works out where to send the user after logging in.
//!
//! Protected pages send unauthenticated users to the log-in page with a
//! `redirect_url` query parameter pointing back at the page they asked for.
//! Only same-site relative URLs are honoured.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

/// The query parameter that carries the page to return to after logging in.
pub const REDIRECT_PARAM: &str = "redirect_url";

/// Pages that make no sense to return to once logged in.
const GUEST_PAGES: [&str; 4] = [
    endpoints::LOG_IN_VIEW,
    endpoints::REGISTER_VIEW,
    endpoints::FORGOT_PASSWORD_VIEW,
    endpoints::RESET_PASSWORD_VIEW,
];

/// Reduce `raw_url` to a path and query on this site.
///
/// Absolute URLs are only accepted when `accept_absolute` is set, which is the
/// case for the `HX-Current-URL` header that htmx fills in itself. URLs from
/// query strings and forms must already be relative.
fn same_site_target(raw_url: &str, accept_absolute: bool) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if !accept_absolute && (uri.scheme().is_some() || uri.authority().is_some()) {
        return None;
    }

    let target = uri.path_and_query()?.as_str();
    if !target.starts_with('/') || target.starts_with("//") {
        return None;
    }

    let path = target.split_once('?').map_or(target, |(path, _)| path);
    if GUEST_PAGES.contains(&path) {
        return None;
    }

    Some(target.to_owned())
}

/// Validate a redirect URL submitted by the browser, e.g. in the log-in form.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    same_site_target(raw_url, false)
}

/// Build the log-in URL that returns to the page `request` was made from.
///
/// For htmx requests to `/api` routes the page is taken from the
/// `HX-Current-URL` header, otherwise from the request URI. Falls back to the
/// dashboard when neither gives a usable target.
pub fn build_log_in_redirect_url(request: &Request) -> String {
    let target = if request.uri().path().starts_with("/api") {
        current_page_of_hx_request(request)
    } else {
        request
            .uri()
            .path_and_query()
            .and_then(|path_and_query| normalize_redirect_url(path_and_query.as_str()))
    };

    let target = target.unwrap_or_else(|| endpoints::DASHBOARD_VIEW.to_owned());

    log_in_url_with_target(&target)
}

pub(super) fn log_in_url_with_target(target: &str) -> String {
    match serde_urlencoded::to_string([(REDIRECT_PARAM, target)]) {
        Ok(query) => format!("{}?{query}", endpoints::LOG_IN_VIEW),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {target}: {error}");
            endpoints::LOG_IN_VIEW.to_owned()
        }
    }
}

fn current_page_of_hx_request(request: &Request) -> Option<String> {
    let headers = request.headers();
    let is_hx_request = headers
        .get("hx-request")
        .and_then(|header| header.to_str().ok())
        .is_some_and(|header| header.eq_ignore_ascii_case("true"));

    if !is_hx_request {
        tracing::warn!("Missing HX-Request header for {} request.", request.uri());
        return None;
    }

    let current_url = headers
        .get("hx-current-url")
        .and_then(|header| header.to_str().ok())?;

    let target = same_site_target(current_url, true);
    if target.is_none() {
        tracing::warn!("Invalid HX-Current-URL header value: {current_url}");
    }

    target
}
