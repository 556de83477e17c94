use actix_web::{get, HttpResponse, Responder};

use crate::models::{Genre, GenresResponse};

/// 支持的流派列表，顺序即模型输出顺序
#[utoipa::path(
    get,
    path = "/api/genres",
    tag = "Model",
    responses(
        (status = 200, description = "流派列表", body = GenresResponse)
    )
)]
#[get("/genres")]
pub async fn get_available_genres() -> impl Responder {
    HttpResponse::Ok().json(GenresResponse {
        genres: Genre::ALL.to_vec(),
    })
}
