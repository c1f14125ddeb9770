use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::reference::{
    UploadMachinesForm, UploadProductsForm, UploadShiftPatternsForm, UploadStandardRatesForm,
};
use crate::repository::DieselRepository;
use crate::services::reference::{
    import_machines, import_products, import_shift_patterns, import_standard_rates,
    load_reference_page,
};
use crate::services::{ServiceError, ServiceResult};

const REFERENCE_URL: &str = "/reference";

/// Turn an import outcome into a flash message and a redirect back to the
/// reference page.
fn finish_import(result: ServiceResult<usize>, what: &str) -> HttpResponse {
    match result {
        Ok(count) => {
            FlashMessage::success(format!("{what}: загружено записей {count}.")).send();
            redirect(REFERENCE_URL)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(format!("{what}: {message}")).send();
            redirect(REFERENCE_URL)
        }
        Err(err) => {
            log::error!("Failed to import {what}: {err}");
            FlashMessage::error(format!("{what}: ошибка при загрузке.")).send();
            redirect(REFERENCE_URL)
        }
    }
}

#[get("/reference")]
pub async fn show_reference(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_reference_page(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "reference",
                &server_config.auth_service_url,
            );
            context.insert("machines", &data.machines);
            context.insert("products", &data.products);
            context.insert("shift_patterns", &data.shift_patterns);
            context.insert("standard_rates", &data.standard_rates);
            context.insert("can_import", &data.can_import);
            render_template(&tera, "reference/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load reference data: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/reference/machines/upload")]
pub async fn upload_machines(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadMachinesForm>,
) -> impl Responder {
    finish_import(import_machines(repo.get_ref(), &user, form), "Машины")
}

#[post("/reference/products/upload")]
pub async fn upload_products(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadProductsForm>,
) -> impl Responder {
    finish_import(import_products(repo.get_ref(), &user, form), "Продукты")
}

#[post("/reference/shift-patterns/upload")]
pub async fn upload_shift_patterns(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadShiftPatternsForm>,
) -> impl Responder {
    finish_import(
        import_shift_patterns(repo.get_ref(), &user, form),
        "Графики смен",
    )
}

#[post("/reference/standard-rates/upload")]
pub async fn upload_standard_rates(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadStandardRatesForm>,
) -> impl Responder {
    finish_import(
        import_standard_rates(repo.get_ref(), &user, form),
        "Нормативы",
    )
}
