use rocket::Route;
use rocket_okapi::revolt_okapi::openapi3::OpenApi;

pub mod issue;
pub mod verify;

pub fn routes() -> (Vec<Route>, OpenApi) {
    openapi_get_routes_spec![issue::issue, verify::verify]
}
