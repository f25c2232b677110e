use rocket::serde::json::Json;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// # Server Details
#[derive(Serialize, Deserialize, JsonSchema)]
pub struct ServerInfo {
    /// Service name
    pub name: String,
    /// Service version
    pub version: String,
}

/// # Query Node
///
/// Fetch details about this service instance.
#[openapi(tag = "Core")]
#[get("/")]
pub async fn root() -> Json<ServerInfo> {
    Json(ServerInfo {
        name: "civica-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
