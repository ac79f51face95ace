// Authentication module

/// Password hashing and verification (bcrypt)
pub mod password;

/// JWT creation and verification (jsonwebtoken)
pub mod jwt;

/// Session verification (cookie -> Actor)
pub mod session;

/// Session-guard middleware
pub mod middleware;

/// First-boot admin account creation
pub mod bootstrap;

/// Session cookie name
pub const AUTH_COOKIE: &str = "activos_token";

/// Build the session cookie header value
pub fn build_auth_cookie(token: &str, max_age_secs: usize, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        AUTH_COOKIE, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the header value that deletes the session cookie
pub fn clear_auth_cookie(secure: bool) -> String {
    let mut cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
        AUTH_COOKIE
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Generate a random alphanumeric token
pub fn generate_random_token(length: usize) -> String {
    use rand::RngExt;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
