use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::{Context, Tera};

use crate::forms::shift_reports::ShiftReportForm;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::shift_reports::{
    NewReportPageData, delete_shift_report, load_new_report_page, preview_shift_report,
    save_shift_report, show_shift_report,
};

const NEW_REPORT_URL: &str = "/shift-reports/new";

fn insert_reference(context: &mut Context, data: &NewReportPageData) {
    context.insert("machines", &data.machines);
    context.insert("products", &data.products);
    context.insert("shift_patterns", &data.shift_patterns);
    context.insert("shift_types", &data.shift_types);
    context.insert("downtime_kinds", &data.downtime_kinds);
}

fn decode_form(body: &[u8]) -> Result<ShiftReportForm, HttpResponse> {
    ShiftReportForm::from_body(body).map_err(|err| {
        log::warn!("Rejected shift report body: {err}");
        FlashMessage::error("Не удалось прочитать форму отчёта.").send();
        redirect(NEW_REPORT_URL)
    })
}

/// Render the entry page with the submitted form and its preview.
///
/// Used both for explicit previews and for saves that were refused, so the
/// operator keeps what was typed.
fn render_preview(
    repo: &DieselRepository,
    user: &AuthenticatedUser,
    flash_messages: &IncomingFlashMessages,
    server_config: &CommonServerConfig,
    tera: &Tera,
    form: ShiftReportForm,
    error: Option<String>,
) -> HttpResponse {
    let page = match load_new_report_page(repo, user) {
        Ok(page) => page,
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            return redirect("/na");
        }
        Err(err) => {
            log::error!("Failed to load shift report form: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = base_context(
        flash_messages,
        user,
        "shift_reports",
        &server_config.auth_service_url,
    );
    insert_reference(&mut context, &page);
    context.insert("error", &error);

    let form = form.with_blank_rows();
    match preview_shift_report(repo, user, form.clone()) {
        Ok(preview) => {
            context.insert("can_save", &preview.can_save());
            context.insert("preview", &preview);
            context.insert("form", &preview.form);
        }
        Err(ServiceError::Form(message)) => {
            context.insert("form_error", &message);
            context.insert("form", &form);
        }
        Err(err) => {
            log::error!("Failed to preview shift report: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    render_template(tera, "shift_reports/new.html", &context)
}

#[get("/shift-reports/new")]
pub async fn new_shift_report(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_new_report_page(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "shift_reports",
                &server_config.auth_service_url,
            );
            insert_reference(&mut context, &data);
            context.insert("form", &ShiftReportForm::default().with_blank_rows());
            render_template(&tera, "shift_reports/new.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load shift report form: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/shift-reports/preview")]
pub async fn preview_report(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
    body: web::Bytes,
) -> impl Responder {
    let form = match decode_form(&body) {
        Ok(form) => form,
        Err(response) => return response,
    };

    render_preview(
        repo.get_ref(),
        &user,
        &flash_messages,
        server_config.get_ref(),
        &tera,
        form,
        None,
    )
}

#[post("/shift-reports")]
pub async fn save_report(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
    body: web::Bytes,
) -> impl Responder {
    let form = match decode_form(&body) {
        Ok(form) => form,
        Err(response) => return response,
    };

    let error = match save_shift_report(repo.get_ref(), &user, form.clone()) {
        Ok(report) => {
            FlashMessage::success("Отчёт смены сохранён.").send();
            return redirect(&format!("/shift-reports/{}", report.summary.id));
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            return redirect("/na");
        }
        Err(ServiceError::Form(message)) => message,
        Err(ServiceError::Conflict) => {
            "Отчёт за эту дату, машину и смену уже существует. Отметьте «Заменить существующий», чтобы перезаписать его.".to_string()
        }
        Err(err) => {
            log::error!("Failed to save shift report: {err}");
            "Не удалось сохранить отчёт смены.".to_string()
        }
    };

    render_preview(
        repo.get_ref(),
        &user,
        &flash_messages,
        server_config.get_ref(),
        &tera,
        form,
        Some(error),
    )
}

#[get("/shift-reports/{summary_id}")]
pub async fn show_report(
    summary_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_shift_report(repo.get_ref(), &user, summary_id.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "index",
                &server_config.auth_service_url,
            );
            context.insert("summary", &data.summary);
            context.insert("machine_name", &data.machine_name);
            context.insert("qty_uom", &data.qty_uom);
            context.insert("shift_label", &data.shift_label);
            context.insert("activities", &data.activities);
            render_template(&tera, "shift_reports/show.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Отчёт смены не найден.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to load shift report: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/shift-reports/{summary_id}/delete")]
pub async fn delete_report(
    summary_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_shift_report(repo.get_ref(), &user, summary_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Отчёт смены удалён.").send();
            redirect("/")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Отчёт смены не найден.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to delete shift report: {err}");
            FlashMessage::error("Не удалось удалить отчёт смены.").send();
            redirect("/")
        }
    }
}
