use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod controllers;
mod models;
mod openapi;
mod routes;
mod services;
mod utils;

use config::CONFIG;
use openapi::ApiDoc;
use services::PredictionService;

fn build_cors() -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

    if CONFIG.cors_allowed_origins.iter().any(|o| o == "*") {
        return cors.allow_any_origin();
    }
    CONFIG
        .cors_allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 加载.env文件
    dotenv().ok();

    // 初始化日志
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    // --- 模型加载 ---
    // 模型只在启动时加载一次，之后只读，各 worker 共享同一份
    log::info!("模型路径: {}, 标准化参数路径: {}", CONFIG.model_path, CONFIG.scaler_path);
    let prediction_service = web::Data::new(PredictionService::from_config(&CONFIG));
    if prediction_service.model_loaded() {
        log::info!("训练模型已就绪");
    } else {
        log::warn!("未加载训练模型，所有预测将使用启发式规则 (DEMO-MODE)");
    }

    let host = CONFIG.host.clone();
    let port = CONFIG.port;
    log::info!("Starting server at http://{}:{}", host, port);
    log::info!("API 文档: http://{}:{}/api/docs/", host, port);

    let openapi = ApiDoc::openapi();

    // 创建并启动HTTP服务器
    HttpServer::new(move || {
        App::new()
            .app_data(prediction_service.clone())
            .wrap(middleware::Logger::default())
            .wrap(build_cors())
            // 文档路由需在 /api scope 之前注册
            .service(SwaggerUi::new("/api/docs/{_:.*}").url("/api/openapi.json", openapi.clone()))
            .configure(routes::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
