//! JSON server for the article archive.
//!
//! Built on `tiny_http`. Requests are handled one at a time on the main
//! thread and every request reads fresh data from the content store, so
//! nothing is shared between requests.
//!
//! # Routes
//!
//! | Route                           | Response                        |
//! |---------------------------------|---------------------------------|
//! | `GET /articles?category=<slug>` | archive view for the selection  |
//! | `GET /articles/<slug>`          | one post, or 404                |
//! | `GET /slugs`                    | every post slug                 |
//!
//! Any other path is a 404; any other method is a 405.

use crate::{
    archive::{ArchiveFilter, PriorityTable, Selection},
    config::{ArchiveConfig, SiteConfig},
    content::{ContentQuery, ContentStore, Post},
    log,
};
use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use serde_json::json;
use std::{borrow::Cow, net::SocketAddr, sync::Arc};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

// ============================================================================
// Server Entry Point
// ============================================================================

/// Serve the archive until Ctrl+C.
pub fn serve_archive<S: ContentStore>(config: &SiteConfig, query: &ContentQuery<S>) -> Result<()> {
    let interface: std::net::IpAddr = config.serve.interface.parse()?;
    let (server, addr) = try_bind_port(interface, config.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    // Set up Ctrl+C handler for graceful shutdown
    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}/articles", addr);

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, query, &config.archive) {
            log!("serve"; "request error: {e}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(
    interface: std::net::IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    match last_error {
        Some(e) => bail!(
            "Failed to bind after {} attempts (ports {}-{}): {}",
            max_retries,
            base_port,
            base_port.saturating_add(max_retries - 1),
            e
        ),
        None => bail!("No ports to try"),
    }
}

// ============================================================================
// Request Handling
// ============================================================================

/// Status code and JSON body of a response.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self { status, body },
            Err(err) => Self::error(500, &format!("failed to encode response: {err}")),
        }
    }

    fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": message }).to_string(),
        }
    }
}

/// A post as served by `/articles/<slug>`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PostPage<'a> {
    #[serde(flatten)]
    post: &'a Post,
    published_label: Option<String>,
    summary: String,
}

fn handle_request<S: ContentStore>(
    request: Request,
    query: &ContentQuery<S>,
    archive: &ArchiveConfig,
) -> Result<()> {
    let reply = route(request.method(), request.url(), query, archive);
    log!("serve"; "{} {} {}", request.method(), request.url(), reply.status);

    let header = Header::from_bytes("Content-Type", JSON_CONTENT_TYPE)
        .map_err(|()| anyhow!("invalid Content-Type header"))?;
    let response = Response::from_string(reply.body)
        .with_status_code(StatusCode(reply.status))
        .with_header(header);

    request.respond(response)?;
    Ok(())
}

/// Resolve a request to its reply.
pub fn route<S: ContentStore>(
    method: &Method,
    url: &str,
    query: &ContentQuery<S>,
    archive: &ArchiveConfig,
) -> Reply {
    if *method != Method::Get {
        return Reply::error(405, "method not allowed");
    }

    let (path, query_string) = url.split_once('?').unwrap_or((url, ""));
    let segments: Vec<Cow<str>> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(decode)
        .collect();

    match segments.as_slice() {
        [first] if first == "articles" => {
            let category = query_param(query_string, "category");
            archive_reply(query, archive, Selection::from_param(category.as_deref()))
        }
        [first, slug] if first == "articles" => post_reply(query, archive, slug),
        [first] if first == "slugs" => Reply::json(200, &query.list_post_slugs()),
        _ => Reply::error(404, "not found"),
    }
}

fn archive_reply<S: ContentStore>(
    query: &ContentQuery<S>,
    archive: &ArchiveConfig,
    selection: Selection,
) -> Reply {
    let priority = PriorityTable::new(&archive.priority);
    let mut filter = ArchiveFilter::new(query.load_archive(), &priority);
    filter.select(selection);
    Reply::json(200, &filter.view(archive.summary_chars))
}

fn post_reply<S: ContentStore>(query: &ContentQuery<S>, archive: &ArchiveConfig, slug: &str) -> Reply {
    match query.get_post(slug) {
        Some(post) => Reply::json(
            200,
            &PostPage {
                published_label: post.published_label(),
                summary: post.summary(archive.summary_chars),
                post: &post,
            },
        ),
        None => Reply::error(404, "post not found"),
    }
}

/// Percent-decode a path segment, keeping it as-is when it is not valid UTF-8.
fn decode(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}

/// First value of `name` in a query string. `+` decodes to a space.
fn query_param(query_string: &str, name: &str) -> Option<String> {
    query_string
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| decode(key) == name)
        .map(|(_, value)| decode(&value.replace('+', " ")).into_owned())
}
