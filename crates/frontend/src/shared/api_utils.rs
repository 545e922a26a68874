//! API utilities for frontend-backend communication
//!
//! Provides helper functions for constructing API URLs and query strings.

/// Порт backend-сервера
const BACKEND_PORT: u16 = 3000;

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location,
/// using the backend port.
///
/// # Returns
/// - API base URL like "http://localhost:3000"
/// - Empty string if window is not available (relative URLs are used then)
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:{}", protocol, hostname, BACKEND_PORT)
}

/// Build a full API URL from a path
///
/// # Example
/// ```ignore
/// let url = api_url("/api/fallas/validar");
/// ```
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Собрать query string, кодируя ключи и значения
///
/// # Example
/// ```ignore
/// assert_eq!(query_string(&[("equipo_tipo", "bomba")]), "equipo_tipo=bomba");
/// ```
pub fn query_string(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Значение параметра из `location.search` (`?a=1&b=2`), декодированное
pub fn query_param(search: &str, key: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .and_then(|(_, v)| {
            urlencoding::decode(&v.replace('+', " "))
                .ok()
                .map(|decoded| decoded.into_owned())
        })
        .filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_encodes_values() {
        assert_eq!(
            query_string(&[("equipo_tipo", "bomba"), ("equipo_id", "12")]),
            "equipo_tipo=bomba&equipo_id=12"
        );
        assert_eq!(
            query_string(&[("equipo_tipo", "fuente de poder"), ("equipo_id", "1&2")]),
            "equipo_tipo=fuente%20de%20poder&equipo_id=1%262"
        );
        assert_eq!(query_string(&[]), "");
    }

    #[test]
    fn test_query_param() {
        let search = "?error=Ya%20existe%20una%20falla%20%28ID%3A%207%29&x=1";
        assert_eq!(
            query_param(search, "error").as_deref(),
            Some("Ya existe una falla (ID: 7)")
        );
        assert_eq!(query_param(search, "x").as_deref(), Some("1"));
        assert_eq!(query_param("?error=a+b", "error").as_deref(), Some("a b"));
        assert_eq!(query_param("?error=", "error"), None);
        assert_eq!(query_param("", "error"), None);
    }
}
