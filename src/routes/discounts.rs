use actix_web::{HttpResponse, Responder, delete, get, patch, post, web};

use crate::forms::discounts::{CreateDiscountForm, UpdateDiscountForm};
use crate::repository::DieselRepository;
use crate::routes::error_body;
use crate::services::{ServiceError, discounts as discount_service};

fn service_error_response(context: &str, err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::DiscountNotFound(_) => {
            HttpResponse::NotFound().json(error_body("DISCOUNT_NOT_FOUND"))
        }
        ServiceError::Scope(scope_err) => {
            HttpResponse::UnprocessableEntity().json(error_body(scope_err.code()))
        }
        err => {
            log::error!("{context}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/discounts")]
/// Return every discount record, targets included.
pub async fn api_v1_list_discounts(repo: web::Data<DieselRepository>) -> impl Responder {
    match discount_service::list_discounts(repo.get_ref()) {
        Ok(discounts) => HttpResponse::Ok().json(discounts),
        Err(err) => service_error_response("Failed to list discounts", err),
    }
}

#[get("/v1/discounts/{discount_id}")]
pub async fn api_v1_get_discount(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match discount_service::get_discount(repo.get_ref(), path.into_inner()) {
        Ok(discount) => HttpResponse::Ok().json(discount),
        Err(err) => service_error_response("Failed to load discount", err),
    }
}

#[post("/v1/discounts")]
/// Create a discount; scope/target mismatches come back as 422 with a stable
/// error code.
pub async fn api_v1_create_discount(
    form: web::Json<CreateDiscountForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let draft = match form.into_inner().into_draft() {
        Ok(draft) => draft,
        Err(err) => return HttpResponse::BadRequest().json(error_body(&err.to_string())),
    };
    match discount_service::create_discount(repo.get_ref(), draft) {
        Ok(discount) => HttpResponse::Created().json(discount),
        Err(err) => service_error_response("Failed to create discount", err),
    }
}

#[patch("/v1/discounts/{discount_id}")]
/// Partially update a discount. Scope fields are merged with the stored
/// record before validation.
pub async fn api_v1_update_discount(
    path: web::Path<i32>,
    form: web::Json<UpdateDiscountForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let changes = match form.into_inner().into_changes() {
        Ok(changes) => changes,
        Err(err) => return HttpResponse::BadRequest().json(error_body(&err.to_string())),
    };
    match discount_service::update_discount(repo.get_ref(), path.into_inner(), changes) {
        Ok(discount) => HttpResponse::Ok().json(discount),
        Err(err) => service_error_response("Failed to update discount", err),
    }
}

#[delete("/v1/discounts/{discount_id}")]
pub async fn api_v1_delete_discount(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match discount_service::delete_discount(repo.get_ref(), path.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => service_error_response("Failed to delete discount", err),
    }
}

#[post("/v1/discounts/validate-scope")]
/// Validate a scope assignment without persisting anything: 204 when it is
/// consistent, 422 with the failure code otherwise.
pub async fn api_v1_validate_scope(
    assignment: web::Json<crate::domain::discount::ScopeAssignment>,
) -> impl Responder {
    match discount_service::validate_scope(&assignment) {
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(scope_err) => HttpResponse::UnprocessableEntity().json(error_body(scope_err.code())),
    }
}
