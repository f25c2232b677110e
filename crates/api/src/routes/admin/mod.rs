use rocket::Route;
use revolt_rocket_okapi::revolt_okapi::openapi3::OpenApi;

mod dismiss_report;
mod fetch_report;
mod fetch_reports;
mod fetch_reports_grouped;
mod report_analytics;
mod review_report;
mod update_user_role;

pub fn routes() -> (Vec<Route>, OpenApi) {
    openapi_get_routes_spec![
        fetch_reports::fetch_reports,
        fetch_reports_grouped::fetch_reports_grouped,
        report_analytics::report_analytics,
        fetch_report::fetch_report,
        review_report::review_report,
        dismiss_report::dismiss_report,
        update_user_role::update_user_role,
    ]
}
