use rocket::Route;
use rocket_okapi::revolt_okapi::openapi3::OpenApi;

pub mod fetch;

pub fn routes() -> (Vec<Route>, OpenApi) {
    openapi_get_routes_spec![fetch::fetch]
}
