use rocket::Route;
use revolt_rocket_okapi::revolt_okapi::openapi3::OpenApi;

mod delete_issue;
mod report_count;
mod report_issue;
mod report_status;

pub fn routes() -> (Vec<Route>, OpenApi) {
    openapi_get_routes_spec![
        report_issue::report_issue,
        report_status::report_status,
        report_count::report_count,
        delete_issue::delete_issue,
    ]
}
