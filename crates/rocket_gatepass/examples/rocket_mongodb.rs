//! Run example with `cargo run --example rocket_mongodb --features example`

use rocket_okapi::revolt_okapi::openapi3::OpenApi;

#[macro_use]
extern crate rocket;

#[cfg(feature = "example")]
#[launch]
async fn rocket() -> _ {
    use gatepass::database::MongoDb;
    use gatepass::Migration;
    use mongodb::{options::ClientOptions, Client};
    use rocket_okapi::{mount_endpoints_and_merged_docs, settings::OpenApiSettings};

    let client_options = ClientOptions::parse("mongodb://localhost:27017")
        .await
        .expect("Valid connection URL");

    let client = Client::with_options(client_options).expect("MongoDB server");
    let database = gatepass::Database::MongoDb(MongoDb(client.database("gatepass")));

    for migration in [Migration::WipeAll, Migration::M2026_08_10EnsureUpToSpec] {
        database.run_migration(migration).await.unwrap();
    }

    let gatepass = gatepass::Gatepass {
        database,
        ..Default::default()
    };

    let mut rocket = rocket::build();
    let settings = OpenApiSettings::default();

    mount_endpoints_and_merged_docs! {
        rocket, "/".to_owned(), settings,
        "/" => (vec![], custom_openapi_spec()),
        "/token" => rocket_gatepass::routes::token::routes(),
        "/alerts" => rocket_gatepass::routes::alerts::routes(),
    };

    rocket.manage(gatepass).mount(
        "/swagger/",
        rocket_okapi::swagger_ui::make_swagger_ui(&rocket_okapi::swagger_ui::SwaggerUIConfig {
            url: "../openapi.json".to_owned(),
            ..Default::default()
        }),
    )
}

#[cfg(not(feature = "example"))]
fn main() {
    panic!("Enable `example` feature to run this example!");
}

fn custom_openapi_spec() -> OpenApi {
    OpenApi {
        openapi: OpenApi::default_version(),
        ..Default::default()
    }
}
