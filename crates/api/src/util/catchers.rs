use rocket::Catcher;

use civica_result::{create_error, Result};

#[catch(401)]
pub fn unauthorized() -> Result<()> {
    Err(create_error!(NotAuthenticated))
}

#[catch(403)]
pub fn forbidden() -> Result<()> {
    Err(create_error!(NotPrivileged))
}

#[catch(404)]
pub fn not_found() -> Result<()> {
    Err(create_error!(NotFound))
}

#[catch(422)]
pub fn unprocessable_entity() -> Result<()> {
    Err(create_error!(FailedValidation {
        error: "Failed to deserialize request payload".to_string()
    }))
}

pub fn all_catchers() -> Vec<Catcher> {
    catchers![not_found, unauthorized, forbidden, unprocessable_entity]
}
