//! OpenAPI specification and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{bookings, health, spots, vehicles};
use crate::api::types::PaginationMeta;
use crate::data::types::BookingStatus;
use crate::domain::search::GeoPoint;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ParkSpot API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Parking spot marketplace"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "spots", description = "Spot search and listing management"),
        (name = "vehicles", description = "Per-user vehicle registry"),
        (name = "bookings", description = "Spot bookings")
    ),
    paths(
        health::health,
        // Spots
        spots::search_spots,
        spots::list_my_spots,
        spots::get_spot,
        spots::create_spot,
        spots::update_spot,
        spots::delete_spot,
        // Vehicles
        vehicles::list_vehicles,
        vehicles::create_vehicle,
        vehicles::delete_vehicle,
        // Bookings
        bookings::list_bookings,
        bookings::create_booking,
        bookings::get_booking,
        bookings::cancel_booking,
    ),
    components(schemas(
        PaginationMeta,
        GeoPoint,
        BookingStatus,
        health::HealthResponse,
        spots::types::SpotDto,
        spots::types::CreateSpotRequest,
        spots::types::UpdateSpotRequest,
        vehicles::types::VehicleDto,
        vehicles::types::ListVehiclesResponse,
        vehicles::types::CreateVehicleRequest,
        bookings::types::BookingDto,
        bookings::types::CreateBookingRequest,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>ParkSpot API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/openapi.json",
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                deepLinking: true,
                showExtensions: true,
                showCommonExtensions: true
            });
        };
    </script>
</body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_marketplace_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/api/v1/health",
            "/api/v1/spots",
            "/api/v1/spots/{id}",
            "/api/v1/vehicles",
            "/api/v1/bookings/{id}/cancel",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
        assert_eq!(doc.info.title, "ParkSpot API");
    }
}
