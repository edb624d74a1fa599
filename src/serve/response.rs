//! Writing replies through tiny_http.

use anyhow::Result;
use tiny_http::{Header, Request, Response, StatusCode};

use super::handler::Reply;

/// One year, the conventional ceiling for `max-age`.
const IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Send `reply`; for `HEAD` only the status and headers.
pub fn send(request: Request, reply: Reply, head: bool) -> Result<()> {
    let mut headers = vec![make_header("Content-Type", reply.content_type)];
    if reply.immutable {
        headers.push(make_header("Cache-Control", IMMUTABLE));
    }

    if head {
        let mut response = Response::empty(StatusCode(reply.status));
        for header in headers {
            response.add_header(header);
        }
        request.respond(response)?;
        return Ok(());
    }

    let mut response = Response::from_data(reply.body).with_status_code(StatusCode(reply.status));
    for header in headers {
        response.add_header(header);
    }
    request.respond(response)?;
    Ok(())
}

fn make_header(name: &str, value: &str) -> Header {
    // Header names and values here are static ASCII.
    Header::from_bytes(name.as_bytes(), value.as_bytes()).expect("valid header")
}
