use rocket::Route;
use revolt_rocket_okapi::revolt_okapi::openapi3::OpenApi;

mod my_reports;

pub fn routes() -> (Vec<Route>, OpenApi) {
    openapi_get_routes_spec![my_reports::my_reports]
}
