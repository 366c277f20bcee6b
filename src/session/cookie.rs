use axum_extra::extract::cookie::{Cookie, Key, SameSite};
use axum_extra::extract::SignedCookieJar;
use sha2::{Digest, Sha512};

use super::SessionId;

/// Derive the 64-byte cookie signing key from the configured secret.
///
/// Without a secret the key is random and sessions do not survive a restart.
pub fn signing_key(secret: Option<&str>) -> Key {
    match secret {
        Some(secret) => Key::from(Sha512::digest(secret.as_bytes()).as_slice()),
        None => {
            tracing::warn!("SESSION_SECRET missing, using an ephemeral session key");
            Key::generate()
        }
    }
}

pub fn session_cookie(name: &str, id: SessionId, secure: bool) -> Cookie<'static> {
    Cookie::build((name.to_string(), id.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

pub fn clear_session_cookie(name: &str) -> Cookie<'static> {
    Cookie::build((name.to_string(), "")).path("/").build()
}

/// Session id from a verified cookie. Tampered or malformed values read as absent.
pub fn read_session_id(jar: &SignedCookieJar, name: &str) -> Option<SessionId> {
    jar.get(name).and_then(|c| c.value().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_deterministic_for_a_secret() {
        let a = signing_key(Some("secret"));
        let b = signing_key(Some("secret"));
        let c = signing_key(Some("other"));
        assert_eq!(a.master(), b.master());
        assert_ne!(a.master(), c.master());
    }

    /// `name=value` exactly as the browser would send it back.
    fn wire_pair(jar: SignedCookieJar) -> String {
        use axum::response::IntoResponse;

        let response = (jar, "").into_response();
        let header = response.headers()[axum::http::header::SET_COOKIE].to_str().unwrap().to_string();
        header.split(';').next().unwrap().to_string()
    }

    fn jar_from_cookie_header(pair: &str, key: Key) -> SignedCookieJar {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(axum::http::header::COOKIE, pair.parse().unwrap());
        SignedCookieJar::from_headers(&headers, key)
    }

    #[test]
    fn test_signed_round_trip_and_tamper() {
        let key = signing_key(Some("secret"));
        let id = SessionId::generate();

        let pair = wire_pair(SignedCookieJar::new(key.clone()).add(session_cookie("sid", id, false)));
        assert_ne!(pair, format!("sid={id}"), "value must carry a signature");
        assert_eq!(read_session_id(&jar_from_cookie_header(&pair, key.clone()), "sid"), Some(id));

        // Signed with another key.
        let foreign = wire_pair(SignedCookieJar::new(signing_key(Some("other"))).add(session_cookie("sid", id, false)));
        assert_eq!(read_session_id(&jar_from_cookie_header(&foreign, key.clone()), "sid"), None);

        // Unsigned value.
        let bare = format!("sid={id}");
        assert_eq!(read_session_id(&jar_from_cookie_header(&bare, key), "sid"), None);
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = session_cookie("sid", SessionId::generate(), true);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
    }
}
