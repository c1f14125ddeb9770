use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::reports::{DashboardQuery, load_dashboard};

/// Decode the dashboard filters; `machine_id` may repeat.
pub(crate) fn dashboard_query(req: &HttpRequest) -> Result<DashboardQuery, serde_html_form::de::Error> {
    serde_html_form::from_str(req.query_string())
}

#[get("/")]
pub async fn show_dashboard(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query = match dashboard_query(&req) {
        Ok(query) => query,
        Err(err) => {
            log::warn!("Ignoring malformed dashboard query: {err}");
            FlashMessage::error("Некорректные параметры фильтра.").send();
            return redirect("/");
        }
    };

    match load_dashboard(repo.get_ref(), &user, query) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "index",
                &server_config.auth_service_url,
            );
            context.insert("summaries", &data.summaries);
            context.insert("activity_totals", &data.activity_totals);
            context.insert("batch_outputs", &data.batch_outputs);
            context.insert("machines", &data.machines);
            context.insert("shift_types", &data.shift_types);
            context.insert("filters", &data.filters);
            render_template(&tera, "main/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to load dashboard: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
