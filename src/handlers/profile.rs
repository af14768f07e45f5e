use actix_web::{web, HttpResponse, Responder};

use crate::services::profile_service::ProfileService;

/// GET / and GET /api/profile
/// Aggregated GitHub profile, served from cache when fresh
pub async fn get_profile(service: web::Data<ProfileService>) -> impl Responder {
    let profile = service.profile().await;
    HttpResponse::Ok().json(profile.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::FALLBACK_ACTIVITY;
    use crate::services::github::PlatformConfig;
    use crate::services::test_support::transport;
    use crate::utils::clock::ManualClock;
    use crate::utils::config::SiteConfig;
    use actix_web::{test, App};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_profile_endpoint_serves_offline_profile() {
        let dir = tempfile::tempdir().unwrap();
        let service = ProfileService::new(
            SiteConfig {
                name: "Jane".to_string(),
                ..SiteConfig::default()
            },
            dir.path(),
            Arc::new(transport()),
            PlatformConfig::custom("http://127.0.0.1:9", "http://127.0.0.1:9/raw"),
            Arc::new(ManualClock::at(2024, 5, 20)),
        );

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service))
                .route("/api/profile", web::get().to(get_profile)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/profile").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["name"], "Jane");
        assert_eq!(body["total_repos"], 0);
        assert_eq!(body["activity_data"], serde_json::json!(FALLBACK_ACTIVITY));
        assert_eq!(body["star_history"], serde_json::json!([]));
    }
}
