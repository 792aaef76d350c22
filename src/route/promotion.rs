use std::{collections::HashMap, sync::Arc};

use poem::{web::Data, Request};
use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    core::error::ValidationError,
    model::{promotion::Promotion, promotion_filter::PromotionFilter},
    repository::promotion::PromotionRepository,
    schema::{
        common::{BadRequestResponse, InternalServerErrorResponse, NotFoundResponse},
        promotion::{
            IndexResponse, IndexResponses, PromotionCreateResponses, PromotionDeleteResponses,
            PromotionDetailResponses, PromotionListResponses, PromotionStatusResponse,
            PromotionStatusResponses, PromotionUpdateResponses,
        },
    },
    AppState,
};

#[derive(Tags)]
enum ApiPromotionTags {
    Promotion,
}

pub struct ApiPromotion;

fn not_found(id: &str) -> Json<NotFoundResponse> {
    Json(NotFoundResponse {
        message: format!("Promotion with id '{}' was not found.", id),
    })
}

fn bad_request(err: ValidationError) -> Json<BadRequestResponse> {
    warn!("rejected promotion data: {}", err);
    Json(BadRequestResponse {
        message: err.to_string(),
    })
}

#[OpenApi]
impl ApiPromotion {
    #[oai(path = "/", method = "get", tag = "ApiPromotionTags::Promotion")]
    async fn index_api(&self) -> IndexResponses {
        IndexResponses::Ok(Json(IndexResponse {
            service_name: "Promotion Service".to_string(),
            version: "v1.0".to_string(),
            endpoint: "/promotions".to_string(),
        }))
    }

    #[oai(path = "/promotions", method = "get", tag = "ApiPromotionTags::Promotion")]
    async fn list_promotion_api(
        &self,
        req: &Request,
        state: Data<&Arc<AppState>>,
    ) -> PromotionListResponses {
        let params = req
            .params::<HashMap<String, String>>()
            .unwrap_or_default();
        let filter = PromotionFilter::from_query(&params);
        info!("Request to list promotions with {:?}", filter);

        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return PromotionListResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.promotion",
                        "list_promotion_api",
                        "begin transaction",
                        &err.to_string(),
                    ),
                ));
            }
        };

        let data = match tx.find_all(&filter).await {
            Ok(val) => val,
            Err(err) => {
                return PromotionListResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.promotion",
                        "list_promotion_api",
                        "find_all",
                        &err.to_string(),
                    ),
                ))
            }
        };

        PromotionListResponses::Ok(Json(data.iter().map(|x| x.serialize()).collect()))
    }

    #[oai(path = "/promotions/:id", method = "get", tag = "ApiPromotionTags::Promotion")]
    async fn get_promotion_api(
        &self,
        Path(id): Path<String>,
        state: Data<&Arc<AppState>>,
    ) -> PromotionDetailResponses {
        info!("Request to Retrieve a promotion with id [{}]", id);
        let promotion_id = match Uuid::parse_str(&id) {
            Ok(val) => val,
            Err(_) => return PromotionDetailResponses::NotFound(not_found(&id)),
        };

        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return PromotionDetailResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.promotion",
                        "get_promotion_api",
                        "begin transaction",
                        &err.to_string(),
                    ),
                ));
            }
        };

        match tx.find_by_id(&promotion_id).await {
            Ok(Some(promotion)) => PromotionDetailResponses::Ok(Json(promotion.serialize())),
            Ok(None) => PromotionDetailResponses::NotFound(not_found(&id)),
            Err(err) => PromotionDetailResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.promotion",
                    "get_promotion_api",
                    "find_by_id",
                    &err.to_string(),
                ),
            )),
        }
    }

    #[oai(path = "/promotions", method = "post", tag = "ApiPromotionTags::Promotion")]
    async fn create_promotion_api(
        &self,
        Json(json): Json<Value>,
        state: Data<&Arc<AppState>>,
    ) -> PromotionCreateResponses {
        info!("Request to Create a Promotion...");
        let promotion = match Promotion::from_json(&json) {
            Ok(val) => val,
            Err(err) => return PromotionCreateResponses::BadRequest(bad_request(err)),
        };

        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return PromotionCreateResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.promotion",
                        "create_promotion_api",
                        "begin transaction",
                        &err.to_string(),
                    ),
                ));
            }
        };

        if let Err(err) = tx.create(&promotion).await {
            return PromotionCreateResponses::BadRequest(bad_request(err));
        }
        if let Err(err) = tx.commit().await {
            return PromotionCreateResponses::BadRequest(bad_request(
                ValidationError::persistence(err),
            ));
        }
        info!("Promotion with new id [{}] saved!", promotion.id);

        let location = state.promotion_url(&promotion.id);
        PromotionCreateResponses::Created(Json(promotion.serialize()), location)
    }

    #[oai(path = "/promotions/:id", method = "put", tag = "ApiPromotionTags::Promotion")]
    async fn update_promotion_api(
        &self,
        Path(id): Path<String>,
        Json(json): Json<Value>,
        state: Data<&Arc<AppState>>,
    ) -> PromotionUpdateResponses {
        info!("Request to update promotion with id: {}", id);
        let promotion_id = match Uuid::parse_str(&id) {
            Ok(val) => val,
            Err(_) => return PromotionUpdateResponses::NotFound(not_found(&id)),
        };

        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return PromotionUpdateResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.promotion",
                        "update_promotion_api",
                        "begin transaction",
                        &err.to_string(),
                    ),
                ));
            }
        };

        let mut promotion = match tx.find_by_id(&promotion_id).await {
            Ok(Some(val)) => val,
            Ok(None) => return PromotionUpdateResponses::NotFound(not_found(&id)),
            Err(err) => {
                return PromotionUpdateResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.promotion",
                        "update_promotion_api",
                        "find_by_id",
                        &err.to_string(),
                    ),
                ))
            }
        };

        if let Err(err) = promotion.deserialize(&json) {
            return PromotionUpdateResponses::BadRequest(bad_request(err));
        }
        if let Err(err) = tx.update(&mut promotion).await {
            return PromotionUpdateResponses::BadRequest(bad_request(err));
        }
        if let Err(err) = tx.commit().await {
            return PromotionUpdateResponses::BadRequest(bad_request(
                ValidationError::persistence(err),
            ));
        }
        info!("Promotion with ID [{}] updated successfully.", promotion_id);

        PromotionUpdateResponses::Ok(Json(promotion.serialize()))
    }

    #[oai(path = "/promotions/:id", method = "delete", tag = "ApiPromotionTags::Promotion")]
    async fn delete_promotion_api(
        &self,
        Path(id): Path<String>,
        state: Data<&Arc<AppState>>,
    ) -> PromotionDeleteResponses {
        info!("Request to Delete a promotion with id [{}]", id);
        let promotion_id = match Uuid::parse_str(&id) {
            Ok(val) => val,
            Err(_) => return PromotionDeleteResponses::NotFound(not_found(&id)),
        };

        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return PromotionDeleteResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.promotion",
                        "delete_promotion_api",
                        "begin transaction",
                        &err.to_string(),
                    ),
                ));
            }
        };

        // Missing promotions are not an error, the outcome is the same
        let deleted = match tx.delete(&promotion_id).await {
            Ok(val) => val,
            Err(err) => return PromotionDeleteResponses::BadRequest(bad_request(err)),
        };
        if let Err(err) = tx.commit().await {
            return PromotionDeleteResponses::BadRequest(bad_request(
                ValidationError::persistence(err),
            ));
        }
        info!(
            "Promotion with ID [{}] delete complete (existed: {}).",
            promotion_id, deleted
        );
        PromotionDeleteResponses::NoContent
    }

    #[oai(
        path = "/promotions/:id/activate",
        method = "patch",
        tag = "ApiPromotionTags::Promotion"
    )]
    async fn activate_promotion_api(
        &self,
        Path(id): Path<String>,
        state: Data<&Arc<AppState>>,
    ) -> PromotionStatusResponses {
        set_active_status(&id, true, state.0).await
    }

    #[oai(
        path = "/promotions/:id/deactivate",
        method = "patch",
        tag = "ApiPromotionTags::Promotion"
    )]
    async fn deactivate_promotion_api(
        &self,
        Path(id): Path<String>,
        state: Data<&Arc<AppState>>,
    ) -> PromotionStatusResponses {
        set_active_status(&id, false, state.0).await
    }
}

async fn set_active_status(
    id: &str,
    active_status: bool,
    state: &Arc<AppState>,
) -> PromotionStatusResponses {
    info!(
        "Request to set active_status={} on promotion [{}]",
        active_status, id
    );
    let promotion_id = match Uuid::parse_str(id) {
        Ok(val) => val,
        Err(_) => return PromotionStatusResponses::NotFound(not_found(id)),
    };

    // Begin db transaction
    let mut tx = match state.db.begin().await {
        Ok(val) => val,
        Err(err) => {
            return PromotionStatusResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.promotion",
                    "set_active_status",
                    "begin transaction",
                    &err.to_string(),
                ),
            ));
        }
    };

    let mut promotion = match tx.find_by_id(&promotion_id).await {
        Ok(Some(val)) => val,
        Ok(None) => return PromotionStatusResponses::NotFound(not_found(id)),
        Err(err) => {
            return PromotionStatusResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.promotion",
                    "set_active_status",
                    "find_by_id",
                    &err.to_string(),
                ),
            ))
        }
    };

    if active_status {
        promotion.activate();
    } else {
        promotion.deactivate();
    }
    if let Err(err) = tx.update_active_status(&promotion).await {
        return PromotionStatusResponses::BadRequest(bad_request(err));
    }
    if let Err(err) = tx.commit().await {
        return PromotionStatusResponses::BadRequest(bad_request(ValidationError::persistence(
            err,
        )));
    }

    let message = if active_status {
        "Promotion activated"
    } else {
        "Promotion deactivated"
    };
    PromotionStatusResponses::Ok(Json(PromotionStatusResponse {
        message: message.to_string(),
        active_status: promotion.active_status,
    }))
}
