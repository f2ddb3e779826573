use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use tower_cookies::{Cookie, Cookies, Key};

const FLASH_COOKIE: &str = "flash";

/// One-shot notice shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    pub level: String,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: "success".to_string(), message: message.into() }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self { level: "danger".to_string(), message: message.into() }
    }

    // Incoming cookies are percent-decoded before the signature check, so the
    // stored value must not contain '%'. URL-safe base64 never does.
    fn encode(&self) -> Option<String> {
        let json = serde_json::to_vec(self).ok()?;
        Some(general_purpose::URL_SAFE_NO_PAD.encode(json))
    }

    fn decode(value: &str) -> Option<Self> {
        let json = general_purpose::URL_SAFE_NO_PAD.decode(value).ok()?;
        serde_json::from_slice(&json).ok()
    }
}

pub fn set_flash(cookies: &Cookies, key: &Key, flash: Flash) {
    let Some(value) = flash.encode() else {
        log::warn!("dropping flash message that could not be encoded");
        return;
    };

    let cookie = Cookie::build((FLASH_COOKIE, value))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::minutes(5))
        .build();

    cookies.signed(key).add(cookie);
}

/// Reads and clears the pending flash message. Tampered cookies are cleared
/// and ignored.
pub fn take_flash(cookies: &Cookies, key: &Key) -> Option<Flash> {
    cookies.get(FLASH_COOKIE)?;
    let verified = cookies.signed(key).get(FLASH_COOKIE);
    cookies.remove(Cookie::build((FLASH_COOKIE, "")).path("/").build());

    match verified {
        Some(cookie) => Flash::decode(cookie.value()),
        None => {
            log::warn!("discarding flash cookie with a bad signature");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_flash_is_cookie_safe() {
        let flash = Flash::success("4 Beaker; 50% off issued to \"Lab A\".");
        let encoded = flash.encode().unwrap();

        assert!(!encoded.contains('%'));
        assert!(!encoded.contains(';'));
        assert!(!encoded.contains('"'));
        assert!(!encoded.contains(' '));
        assert_eq!(Flash::decode(&encoded), Some(flash));
    }

    #[test]
    fn garbage_does_not_decode() {
        assert_eq!(Flash::decode("not-json"), None);
    }
}
