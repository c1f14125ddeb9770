use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::repository::DieselRepository;
use crate::routes::main::dashboard_query;
use crate::services::ServiceError;
use crate::services::reports::list_summaries;

#[get("/api/v1/shift-summaries")]
/// Return the dashboard's shift summaries as paginated JSON.
///
/// Accepts the dashboard filters: `date_from`, `date_to`, `shift`, repeated
/// `machine_id` and `page`. Users without a viewing role receive
/// `401 Unauthorized`.
pub async fn api_v1_shift_summaries(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let query = match dashboard_query(&req) {
        Ok(query) => query,
        Err(err) => return HttpResponse::BadRequest().body(err.to_string()),
    };

    match list_summaries(repo.get_ref(), &user, query) {
        Ok(summaries) => HttpResponse::Ok().json(summaries),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(ServiceError::Form(message)) => HttpResponse::BadRequest().body(message),
        Err(err) => {
            log::error!("Failed to list shift summaries: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
