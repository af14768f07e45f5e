use actix_web::{web, HttpResponse, Responder};

use crate::services::profile_service::ProfileService;

/// GET /api/config
/// Site configuration with the GitHub token removed
pub async fn get_config(service: web::Data<ProfileService>) -> impl Responder {
    HttpResponse::Ok().json(service.config().redacted())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::github::PlatformConfig;
    use crate::services::test_support::transport;
    use crate::utils::clock::SystemClock;
    use crate::utils::config::SiteConfig;
    use actix_web::{test, App};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_config_endpoint_redacts_token() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig {
            github_url: "https://github.com/octocat".to_string(),
            github_token: "ghp_secret".to_string(),
            ..SiteConfig::default()
        };
        let service = ProfileService::new(
            config,
            dir.path(),
            Arc::new(transport()),
            PlatformConfig::github(),
            Arc::new(SystemClock),
        );

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service))
                .route("/api/config", web::get().to(get_config)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/config").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["github_url"], "https://github.com/octocat");
        assert_eq!(body["github_token"], "");
        assert_eq!(body["theme"]["primary_color"], "#6a11cb");
        assert_eq!(body["contact"]["cv"], "");
    }
}
