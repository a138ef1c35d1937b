use actix_web::{web, App};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use tripmind_api::middleware::auth::{jwt_secret, Claims};
use tripmind_api::routes;
use tripmind_api::services::planner_service::PlannerService;

pub struct TestApp {
    pub client: Arc<mongodb::Client>,
    pub planner: PlannerService,
}

impl TestApp {
    pub async fn new() -> Self {
        let mongo_uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        // The driver connects lazily; tests only exercise paths that never
        // reach the store
        let client = mongodb::Client::with_uri_str(&mongo_uri)
            .await
            .expect("Failed to parse MongoDB URI");

        Self {
            client: Arc::new(client),
            planner: PlannerService::without_credential(),
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.client.clone()))
            .app_data(web::Data::new(self.planner.clone()))
            .configure(routes::config)
    }
}

#[allow(dead_code)]
pub fn bearer_token() -> String {
    tripmind_api::routes::auth::generate_token("test@example.com", ObjectId::new())
        .expect("Failed to generate test token")
}

#[allow(dead_code)]
pub fn expired_bearer_token() -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: "test@example.com".to_string(),
        iat: (now - 25 * 3600) as usize,
        exp: (now - 3600) as usize,
        user_id: ObjectId::new().to_hex(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret().as_bytes()),
    )
    .expect("Failed to generate expired test token")
}
