use rocket::{Build, Rocket};
use revolt_rocket_okapi::revolt_okapi::openapi3::OpenApi;
use revolt_rocket_okapi::settings::OpenApiSettings;

mod admin;
mod issues;
mod notifications;
mod reports;
mod root;

pub fn mount(mut rocket: Rocket<Build>) -> Rocket<Build> {
    let settings = OpenApiSettings::default();

    mount_endpoints_and_merged_docs! {
        rocket, "/".to_owned(), settings,
        "/" => (vec![], custom_openapi_spec()),
        "" => openapi_get_routes_spec![root::root],
        "/issues" => issues::routes(),
        "/reports" => reports::routes(),
        "/notifications" => notifications::routes(),
        "/admin" => admin::routes()
    };

    rocket
}

fn custom_openapi_spec() -> OpenApi {
    use revolt_rocket_okapi::revolt_okapi::openapi3::Info;

    OpenApi {
        openapi: OpenApi::default_version(),
        info: Info {
            title: "Civica API".to_string(),
            description: Some("Civic issue reporting and moderation".to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}
