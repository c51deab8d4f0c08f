//! Request parameter collection
//!
//! Parameters come from the URL query string and, for form submissions,
//! from the `application/x-www-form-urlencoded` body. Query values come
//! first.

use axum::body::Body;
use axum::extract::Request;
use http::header::CONTENT_TYPE;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use portico_core::{GatewayError, RequestParameters};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A request whose parameters could not be collected
#[derive(Debug)]
pub struct ParameterRejection {
    /// Parameters gathered before the failure (the query string)
    pub parameters: RequestParameters,
    pub error: GatewayError,
}

/// Gather the request's parameters, returning the request ready to be
/// handled again
///
/// Form bodies are buffered up to `form_body_limit` bytes and handed back
/// to the handler unchanged.
pub async fn collect_parameters(
    request: Request,
    form_body_limit: usize,
) -> Result<(Request, RequestParameters), ParameterRejection> {
    let mut parameters = RequestParameters::new();

    if let Some(query) = request.uri().query() {
        parameters.extend(url::form_urlencoded::parse(query.as_bytes()));
    }

    if !is_form(&request) {
        return Ok((request, parameters));
    }

    let (parts, body) = request.into_parts();

    let bytes = match Limited::new(body, form_body_limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            let error = if e.downcast_ref::<LengthLimitError>().is_some() {
                GatewayError::ClientOverrun(format!("form body exceeds {form_body_limit} bytes"))
            } else {
                tracing::debug!(error = %e, "failed to read form body");
                GatewayError::BadRequest("failed to read request body".to_owned())
            };
            return Err(ParameterRejection { parameters, error });
        }
    };

    parameters.extend(url::form_urlencoded::parse(&bytes));

    Ok((Request::from_parts(parts, Body::from(bytes)), parameters))
}

fn is_form(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(uri: &str) -> Request {
        http::Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, content_type: &str, body: &'static str) -> Request {
        http::Request::builder()
            .method(http::Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn query_parameters_are_decoded() {
        let (_, parameters) = collect_parameters(get("/api/session?token=a%2Bb&name=x+y"), 1024)
            .await
            .unwrap();

        assert_eq!(parameters.token(), Some("a+b"));
        assert_eq!(parameters.first("name"), Some("x y"));
    }

    #[tokio::test]
    async fn request_without_query_has_no_parameters() {
        let (_, parameters) = collect_parameters(get("/api/session"), 1024).await.unwrap();
        assert!(parameters.is_empty());
    }

    #[tokio::test]
    async fn form_values_follow_query_values() {
        let request = post_form(
            "/api/tokens?token=from-query",
            "application/x-www-form-urlencoded; charset=UTF-8",
            "token=from-body&username=alice",
        );

        let (request, parameters) = collect_parameters(request, 1024).await.unwrap();

        assert_eq!(
            parameters.get("token"),
            Some(&["from-query".to_owned(), "from-body".to_owned()][..])
        );
        assert_eq!(parameters.first("username"), Some("alice"));

        let body = axum::body::to_bytes(request.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"token=from-body&username=alice");
    }

    #[tokio::test]
    async fn non_form_bodies_are_left_alone() {
        let request = post_form("/api/tokens", "application/json", r#"{"token":"json"}"#);

        let (request, parameters) = collect_parameters(request, 4).await.unwrap();

        assert!(parameters.token().is_none());
        let body = axum::body::to_bytes(request.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"token":"json"}"#);
    }

    #[tokio::test]
    async fn oversized_form_is_rejected_with_query_parameters() {
        let request = post_form("/api/tokens?token=sess-7", FORM_CONTENT_TYPE, "username=a-rather-long-name");

        let rejection = collect_parameters(request, 8).await.unwrap_err();

        assert!(matches!(rejection.error, GatewayError::ClientOverrun(_)));
        assert_eq!(rejection.parameters.token(), Some("sess-7"));
    }
}
