use actix_web::web;

use crate::controllers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    // API 路由
    cfg.service(
        web::scope("/api")
            .service(controllers::health_check)          // GET /api/health
            .service(controllers::get_available_genres)  // GET /api/genres
            .service(controllers::get_model_metrics)     // GET /api/metrics
            .service(controllers::predict_genres_batch)  // POST /api/predict/batch
            .service(controllers::predict_genres),       // POST /api/predict
    );
}
