use actix_web::HttpRequest;

/// Resolve the client IP for rate limiting: first `x-forwarded-for` entry,
/// then `x-real-ip`, then the peer address. Requests with none of these
/// collapse into a shared "unknown" bucket; that shared bucket is a known,
/// accepted weakness of the soft throttle.
pub fn get_client_ip(req: &HttpRequest) -> String {
    if let Some(forwarded) = req.headers().get("x-forwarded-for") {
        if let Ok(s) = forwarded.to_str() {
            if let Some(first) = s.split(',').next() {
                let first = first.trim();
                if !first.is_empty() {
                    return first.to_string();
                }
            }
        }
    }

    if let Some(real_ip) = req.headers().get("x-real-ip") {
        if let Ok(s) = real_ip.to_str() {
            let s = s.trim();
            if !s.is_empty() {
                return s.to_string();
            }
        }
    }

    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
