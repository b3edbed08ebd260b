use actix_web::{HttpResponse, Responder, get, web};
use chrono::Utc;

use crate::repository::DieselRepository;
use crate::routes::error_body;
use crate::services::{ServiceError, pricing as pricing_service};

#[get("/v1/variants/{variant_id}/pricing")]
/// Return the fully cascaded price for one variant as JSON.
pub async fn api_v1_variant_pricing(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let variant_id = path.into_inner();
    let now = Utc::now().naive_utc();
    match pricing_service::resolve_variant_pricing(repo.get_ref(), variant_id, now) {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(ServiceError::VariantNotFound(_)) => {
            HttpResponse::NotFound().json(error_body("VARIANT_NOT_FOUND"))
        }
        Err(err) => {
            log::error!("Failed to price variant {variant_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/carts/{cart_id}/pricing")]
/// Return the priced cart: line totals, fired discounts and coupon overlay.
pub async fn api_v1_cart_pricing(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let cart_id = path.into_inner();
    let now = Utc::now().naive_utc();
    match pricing_service::resolve_cart_pricing(repo.get_ref(), cart_id, now) {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(ServiceError::CartNotFound(_)) => {
            HttpResponse::NotFound().json(error_body("CART_NOT_FOUND"))
        }
        Err(err) => {
            log::error!("Failed to price cart {cart_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
