use rocket::Route;
use revolt_rocket_okapi::revolt_okapi::openapi3::OpenApi;

mod clear_notifications;
mod delete_notification;
mod fetch_notifications;
mod mark_all_read;
mod mark_read;
mod unread_count;

pub fn routes() -> (Vec<Route>, OpenApi) {
    openapi_get_routes_spec![
        fetch_notifications::fetch_notifications,
        unread_count::unread_count,
        mark_read::mark_read,
        mark_all_read::mark_all_read,
        delete_notification::delete_notification,
        clear_notifications::clear_notifications,
    ]
}
