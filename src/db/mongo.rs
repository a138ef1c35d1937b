use mongodb::{
    bson::{doc, Document},
    options::{ClientOptions, IndexOptions, ServerApi, ServerApiVersion},
    Client, IndexModel,
};
use std::sync::Arc;
use std::time::Duration;

pub const DB_NAME: &str = "TravelPlanner";
pub const USERS_COLLECTION: &str = "Users";
pub const TRIPS_COLLECTION: &str = "Trips";

pub async fn create_mongo_client(uri: &String) -> Arc<Client> {
    println!("Connecting to MongoDB: {}", uri);

    // Configure MongoDB client options with more robust settings
    let mut client_options = ClientOptions::parse(uri)
        .await
        .expect("MongoDB URI may be incorrect! Failed to parse.");

    // Set a reasonable timeout for operations
    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    // Set the server API if using MongoDB 5.0+
    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    // Create the client and check if it can connect
    let client =
        Client::with_options(client_options).expect("Failed to create MongoDB client with options");

    // Test the connection to make sure it works
    match client.database(DB_NAME).run_command(doc! {"ping": 1}).await {
        Ok(_) => println!("Successfully connected to MongoDB and verified with ping command"),
        Err(e) => {
            eprintln!("WARNING: Connected to MongoDB but ping test failed: {}", e);
            eprintln!("The API may still work, but some functionality might be impaired");
        }
    }

    Arc::new(client)
}

/// Creates the indexes the handlers rely on. The unique email index backs the
/// duplicate-registration conflict; the user_id index backs per-user trip
/// listing.
pub async fn ensure_indexes(client: &Client) {
    let users = client
        .database(DB_NAME)
        .collection::<Document>(USERS_COLLECTION);
    let email_index = IndexModel::builder()
        .keys(doc! { "email": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();
    if let Err(e) = users.create_index(email_index).await {
        eprintln!("WARNING: Failed to create unique email index: {}", e);
    }

    let trips = client
        .database(DB_NAME)
        .collection::<Document>(TRIPS_COLLECTION);
    let owner_index = IndexModel::builder().keys(doc! { "user_id": 1 }).build();
    if let Err(e) = trips.create_index(owner_index).await {
        eprintln!("WARNING: Failed to create trips owner index: {}", e);
    }
}
