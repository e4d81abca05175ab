//! HTTP utility functions for extracting request information.

use actix_web::HttpRequest;

/// Proxy headers consulted for the caller's address, in order of preference
const CLIENT_IP_HEADERS: [&str; 4] = [
    "X-Forwarded-For",
    "X-Real-IP",
    "CF-Connecting-IP", // Cloudflare
    "X-Cluster-Client-IP",
];

/// Fallback key when neither a proxy header nor a peer address is known
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Extract the client IP address used as the rate limiting key.
///
/// Proxy headers win over the socket peer; `X-Forwarded-For` may list a
/// chain of hops and only the first (originating) entry is used.
pub fn extract_client_ip(req: &HttpRequest) -> String {
    for header_name in CLIENT_IP_HEADERS {
        if let Some(ip) = req
            .headers()
            .get(header_name)
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
        {
            return ip.to_string();
        }
    }

    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Extract user agent from request headers
pub fn extract_user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("User-Agent")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}
