//! Run example with `cargo run --example rocket_mongodb_no_okapi --features example`

#[macro_use]
extern crate rocket;

#[cfg(feature = "example")]
#[launch]
async fn rocket() -> _ {
    use gatepass::database::MongoDb;
    use gatepass::Migration;
    use mongodb::{options::ClientOptions, Client};

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

    rocket::build()
        .manage(gatepass)
        .mount("/token", rocket_gatepass::routes::token::routes().0)
        .mount("/alerts", rocket_gatepass::routes::alerts::routes().0)
}

#[cfg(not(feature = "example"))]
fn main() {
    panic!("Enable `example` feature to run this example!");
}
