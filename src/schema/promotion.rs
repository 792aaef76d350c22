use poem_openapi::{payload::Json, ApiResponse, Object};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{BadRequestResponse, InternalServerErrorResponse, NotFoundResponse};

#[derive(Object, Deserialize, Serialize)]
pub struct IndexResponse {
    pub service_name: String,
    pub version: String,
    pub endpoint: String,
}

#[derive(ApiResponse)]
pub enum IndexResponses {
    #[oai(status = 200)]
    Ok(Json<IndexResponse>),
}

#[derive(Object, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PromotionResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub active_status: bool,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: String,
    pub updated_at: String,
    pub product_ids: Option<Vec<String>>,
    pub extra: Option<Value>,
}

#[derive(ApiResponse)]
pub enum PromotionListResponses {
    #[oai(status = 200)]
    Ok(Json<Vec<PromotionResponse>>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(ApiResponse)]
pub enum PromotionDetailResponses {
    #[oai(status = 200)]
    Ok(Json<PromotionResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(ApiResponse)]
pub enum PromotionCreateResponses {
    #[oai(status = 201)]
    Created(
        Json<PromotionResponse>,
        #[oai(header = "Location")] String,
    ),

    #[oai(status = 400)]
    BadRequest(Json<BadRequestResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(ApiResponse)]
pub enum PromotionUpdateResponses {
    #[oai(status = 200)]
    Ok(Json<PromotionResponse>),

    #[oai(status = 400)]
    BadRequest(Json<BadRequestResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(ApiResponse)]
pub enum PromotionDeleteResponses {
    #[oai(status = 204)]
    NoContent,

    #[oai(status = 400)]
    BadRequest(Json<BadRequestResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(Object, Deserialize, Serialize)]
pub struct PromotionStatusResponse {
    pub message: String,
    pub active_status: bool,
}

#[derive(ApiResponse)]
pub enum PromotionStatusResponses {
    #[oai(status = 200)]
    Ok(Json<PromotionStatusResponse>),

    #[oai(status = 400)]
    BadRequest(Json<BadRequestResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}
