// src/routes/landing.rs
//
// Static landing page. The backend address is a text label only; the page
// never calls the backend.
//
use super::with_content_type;
use crate::config::DEFAULT_API_BASE;
use hyper::{Body, Response, StatusCode};

pub const STYLESHEET_PATH: &str = "/landing.css";

// Served as a file so the production CSP (`style-src 'self'`) allows it.
const STYLESHEET: &str = "main { padding: 24px; }\n";

pub fn render_landing_page() -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"fr\">\n",
            "<head>\n",
            "  <meta charset=\"utf-8\">\n",
            "  <title>template_projet</title>\n",
            "  <link rel=\"stylesheet\" href=\"{stylesheet}\">\n",
            "</head>\n",
            "<body>\n",
            "  <main>\n",
            "    <h1>template_projet — Web</h1>\n",
            "    <p>Web prêt. Backend: <code>{backend}</code></p>\n",
            "  </main>\n",
            "</body>\n",
            "</html>\n",
        ),
        stylesheet = STYLESHEET_PATH,
        backend = DEFAULT_API_BASE,
    )
}

pub fn landing_page() -> Response<Body> {
    with_content_type(
        StatusCode::OK,
        Body::from(render_landing_page()),
        "text/html; charset=utf-8",
    )
}

pub fn stylesheet() -> Response<Body> {
    with_content_type(StatusCode::OK, Body::from(STYLESHEET), "text/css; charset=utf-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_has_heading_and_backend_label() {
        let html = render_landing_page();
        assert!(html.contains("<h1>template_projet — Web</h1>"));
        assert!(html.contains("<code>http://localhost:8000</code>"));
        assert!(html.contains("href=\"/landing.css\""));
        assert!(!html.contains("style=\""));
        assert!(!html.contains("<script"));
    }

    #[test]
    fn test_render_is_stable() {
        assert_eq!(render_landing_page(), render_landing_page());
    }

    #[test]
    fn test_landing_response_is_html() {
        let response = landing_page();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "text/html; charset=utf-8"
        );
    }
}
