use http::header::HeaderName;
use http::{HeaderValue, Method};
use portico_config::{AllowList, CorsConfig};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Build a Tower CORS layer from configuration
///
/// Entries that fail to parse are skipped.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = match &config.origins {
        AllowList::Any => AllowOrigin::any(),
        AllowList::List(origins) => AllowOrigin::list(origins.iter().filter_map(|o| o.parse::<HeaderValue>().ok())),
    };

    let methods = match &config.methods {
        AllowList::Any => AllowMethods::any(),
        AllowList::List(methods) => {
            AllowMethods::list(methods.iter().filter_map(|m| m.parse::<Method>().ok()))
        }
    };

    let headers = match &config.headers {
        AllowList::Any => AllowHeaders::any(),
        AllowList::List(headers) => {
            AllowHeaders::list(headers.iter().filter_map(|h| h.parse::<HeaderName>().ok()))
        }
    };

    let mut layer = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers);

    if config.credentials {
        layer = layer.allow_credentials(true);
    }

    if let Some(max_age) = config.max_age_duration() {
        layer = layer.max_age(max_age);
    }

    layer
}
