use axum::body::{Body, HttpBody};
use axum::http::{header, HeaderMap, Request};
use axum::middleware::Next;
use axum::response::Response;

/// Форматирует число с разделителями тысяч (точками)
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('.');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Цвет времени в строке лога: голубой для 2xx/3xx, коричневый для остальных
fn status_color(status: u16) -> &'static str {
    if status < 400 {
        "36"
    } else {
        "33"
    }
}

/// Размер ответа без чтения тела: `Content-Length`, иначе точная подсказка тела
fn response_size(headers: &HeaderMap, exact_hint: Option<u64>) -> String {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .or(exact_hint)
        .map(|n| format_number(n as usize))
        .unwrap_or_else(|| "-".to_string())
}

/// Простой middleware для логирования запросов: одна цветная строка на запрос
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let size = response_size(response.headers(), response.body().size_hint().exact());
    let timestamp = chrono::Local::now();
    println!(
        "\x1b[{}m{}\x1b[0m | {:>5}ms | {:>12} | {} {:>6} {}",
        status_color(status),
        timestamp.format("%H:%M:%S"),
        start.elapsed().as_millis(),
        size,
        status,
        method,
        uri.path()
    );

    response
}
