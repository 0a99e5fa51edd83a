use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PlantOps API",
        version = "0.3.0",
        description = r#"
# PlantOps Maintenance API

Backend for the plant maintenance panel: equipment fault tracking, motor and
control-device registry, spare-part stock control, downtime reporting and
dashboards.

## Authentication

All API endpoints require a JWT bearer token obtained from `/api/auth/login`:

```
Authorization: Bearer <your-jwt-token>
```

Admin-only endpoints additionally require the `admin` role claim.

## Error Handling

Errors use a consistent JSON shape with appropriate HTTP status codes:

```json
{
  "error": "Not Found",
  "message": "Motor with id 42 not found",
  "request_id": "req-abc123xyz",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        contact(
            name = "PlantOps Maintenance",
            email = "maintenance@plantops.dev"
        ),
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development")
    ),
    tags(
        (name = "Motors", description = "Motor registry endpoints"),
        (name = "Records", description = "Motor fault record endpoints"),
        (name = "General faults", description = "Site-wide fault endpoints"),
        (name = "Stocks", description = "Spare-part stock and consumption endpoints"),
        (name = "Analytics", description = "Dashboard aggregate endpoints")
    ),
    paths(
        // Motors
        crate::handlers::motors::list_motors,
        crate::handlers::motors::get_motor,
        crate::handlers::motors::create_motor,

        // Records
        crate::handlers::records::list_records,
        crate::handlers::records::create_record,

        // General faults
        crate::handlers::general_faults::list_faults,
        crate::handlers::general_faults::create_fault,

        // Stocks
        crate::handlers::stocks::list_stocks,
        crate::handlers::stocks::create_stock,
        crate::handlers::stock_usages::list_usages,
        crate::handlers::stock_usages::record_usage,

        // Analytics
        crate::handlers::analytics::get_dashboard_metrics,
    ),
    components(
        schemas(
            crate::ApiResponse<serde_json::Value>,

            // Analytics types
            crate::services::analytics::DashboardMetrics,
            crate::services::analytics::FleetMetrics,
            crate::services::analytics::MotorHealth,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_generates() {
        let openapi = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("PlantOps API"));
        assert!(json.contains("/api/motors"));
        assert!(json.contains("/api/stock-usages"));
    }
}
