//! Extracting the admin key from request headers

/// Header carrying the key as a bare value
pub const API_KEY_HEADER: &str = "x-api-key";

/// Larger header values are treated as absent
pub const MAX_AUTH_HEADER_BYTES: usize = 4096;

/// Pick the admin key out of `Authorization: Bearer <key>` or `X-API-Key: <key>`
///
/// `Authorization` wins when both are present and well formed. Oversized or
/// malformed values count as missing.
pub fn presented_key<'a>(authorization: Option<&'a str>, api_key: Option<&'a str>) -> Option<&'a str> {
    authorization
        .and_then(parse_bearer)
        .or_else(|| api_key.and_then(parse_bare))
}

fn parse_bearer(header: &str) -> Option<&str> {
    if header.len() > MAX_AUTH_HEADER_BYTES {
        return None;
    }
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token)
}

fn parse_bare(header: &str) -> Option<&str> {
    if header.len() > MAX_AUTH_HEADER_BYTES {
        return None;
    }
    let token = header.trim();
    (!token.is_empty()).then_some(token)
}
