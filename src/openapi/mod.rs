use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wireplant API",
        version = "0.1.0",
        description = r#"
# Wireplant ERP API

Backend for a wire-manufacturing plant.

- **Production**: flattening output and spiral intake records
- **Reports**: item-wise material balance, also as CSV
- **Inventory**: ledger entries, totals and daily movements
- **Alerts**: open inventory alerts and their resolution
- **Dashboard**: combined snapshot, JSON export and a server-sent event stream

## Authentication

Obtain a token from `POST /auth/login` and send it on every `/api/v1` call:

```
Authorization: Bearer <token>
```

`POST /auth/logout` revokes the token.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "auth", description = "Login and logout"),
        (name = "users", description = "Dashboard accounts"),
        (name = "production", description = "Flattening and spiral section records"),
        (name = "reports", description = "Material balance reports"),
        (name = "inventory", description = "Inventory ledger"),
        (name = "alerts", description = "Inventory alerts"),
        (name = "dashboard", description = "Dashboard snapshot, export and stream")
    ),
    paths(
        crate::auth::login_handler,
        crate::auth::logout_handler,
        crate::handlers::users::list_users,
        crate::handlers::users::current_user,
        crate::handlers::production::list_flattening,
        crate::handlers::production::create_flattening,
        crate::handlers::production::list_spiral,
        crate::handlers::production::create_spiral,
        crate::handlers::reports::material_balance,
        crate::handlers::reports::material_balance_csv,
        crate::handlers::ledger::list_ledger,
        crate::handlers::ledger::ledger_summary,
        crate::handlers::alerts::list_alerts,
        crate::handlers::alerts::alert_counts,
        crate::handlers::alerts::resolve_alert,
        crate::handlers::alerts::resolve_all_alerts,
        crate::handlers::dashboard::dashboard,
        crate::handlers::dashboard::export_dashboard,
        crate::handlers::dashboard::dashboard_stream,
    ),
    components(
        schemas(
            crate::ApiResponse<serde_json::Value>,
            crate::ResponseMeta,
            crate::errors::ErrorResponse,
            crate::auth::LoginCredentials,
            crate::auth::LoginResponse,
            crate::services::users::UserProfile,
            crate::services::users::UserListItem,
            crate::handlers::users::UserListResponse,
            crate::handlers::users::CurrentUserResponse,
            crate::services::production::NewSectionRecord,
            crate::services::material_balance::MaterialBalanceReport,
            crate::reports::ItemBalance,
            crate::reports::BalanceSummary,
            crate::reports::LedgerSummary,
            crate::reports::DailyMovement,
            crate::services::inventory_ledger::LedgerOverview,
            crate::services::alerts::AlertView,
            crate::services::alerts::AlertCounts,
            crate::handlers::alerts::ResolveAllResponse,
            crate::services::dashboard::DashboardSnapshot,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDocV1;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
