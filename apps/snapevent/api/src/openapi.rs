//! OpenAPI documentation configuration

use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

/// Registers the `bearer` scheme referenced by the owner/session routes
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SnapEvent API",
        version = "0.1.0",
        description = "Events with QR share links, guest photo and message uploads, and event galleries"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    modifiers(&BearerAuth),
    nest(
        (path = "/auth", api = domain_identity::ApiDoc),
        (path = "/events", api = domain_events::ApiDoc),
        (path = "/events", api = domain_uploads::ApiDoc),
        (path = "/events", api = domain_gallery::ApiDoc),
        (path = "/blobs", api = domain_uploads::BlobsApiDoc)
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_covers_every_domain() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/auth/login",
            "/events/{id}",
            "/events/{id}/qr",
            "/events/{id}/photos",
            "/events/{id}/records",
            "/events/{id}/gallery",
            "/blobs/{path}",
        ] {
            assert!(paths.contains(&expected), "missing {} in {:?}", expected, paths);
        }

        let schemes = doc.components.unwrap().security_schemes;
        assert!(schemes.contains_key("bearer"));
    }
}
