use crate::domain::a001_falla::api::HttpValidationClient;
use crate::domain::a001_falla::controller::{FallaFormHandler, FallaGuardController};
use crate::domain::a001_falla::guard::{GuardView, SubmitDecision, ValidationOutcome};
use crate::domain::a002_equipo;
use crate::shared::api_utils::query_param;
use crate::shared::client_log;
use contracts::domain::a002_equipo::EquipoOption;
use leptos::prelude::*;
use std::rc::Rc;

const LOG_CATEGORY: &str = "falla_guard";

/// ViewModel формы "Nueva falla"
#[derive(Clone)]
pub struct FallaNuevaViewModel {
    controller: Rc<FallaGuardController<HttpValidationClient>>,
    pub guard_view: RwSignal<GuardView>,
    pub tipos: RwSignal<Vec<String>>,
    pub opciones: RwSignal<Vec<EquipoOption>>,
    pub equipo_tipo: RwSignal<String>,
    pub equipo_id: RwSignal<String>,
    pub catalog_error: RwSignal<Option<String>>,
    /// Отказ сервера при прошлой отправке (`?error=` после редиректа)
    pub form_error: RwSignal<Option<String>>,
}

impl FallaNuevaViewModel {
    pub fn new() -> Self {
        let controller = Rc::new(FallaGuardController::new(HttpValidationClient));
        let guard_view = RwSignal::new(controller.view());
        controller.set_observer(move |view| guard_view.set(view.clone()));

        Self {
            controller,
            guard_view,
            tipos: RwSignal::new(Vec::new()),
            opciones: RwSignal::new(Vec::new()),
            equipo_tipo: RwSignal::new(String::new()),
            equipo_id: RwSignal::new(String::new()),
            catalog_error: RwSignal::new(None),
            form_error: RwSignal::new(server_form_error()),
        }
    }

    /// Загрузить каталог оборудования (встроенный или с сервера)
    pub fn load_catalog(&self) {
        let controller = self.controller.clone();
        let tipos = self.tipos;
        let catalog_error = self.catalog_error;
        wasm_bindgen_futures::spawn_local(async move {
            match a002_equipo::api::load_catalog().await {
                Ok(catalog) => {
                    controller.set_catalog(catalog);
                    tipos.set(controller.tipos());
                }
                Err(e) => {
                    log::error!("Failed to load equipment catalog: {}", e);
                    catalog_error.set(Some(format!("Error cargando equipos: {}", e)));
                }
            }
        });
    }

    pub fn on_tipo_changed(&self, tipo: String) {
        self.form_error.set(None);
        let opciones = self.controller.on_equipment_type_changed(&tipo);
        self.equipo_tipo.set(tipo);
        self.equipo_id.set(String::new());
        self.opciones.set(opciones);
    }

    pub fn on_equipo_changed(&self, id: String) {
        self.equipo_id.set(id.clone());
        let tipo = self.equipo_tipo.get_untracked();
        let controller = self.controller.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = controller.on_equipment_instance_changed(&tipo, &id).await;
            if let Some(ValidationOutcome::FailedOpen(e)) = outcome {
                client_log::report(
                    LOG_CATEGORY,
                    format!("Error validando falla {}/{}: {}", tipo, id, e),
                );
            }
        });
    }

    /// Последняя проверка перед отправкой формы браузером
    pub fn on_submit(&self, ev: &leptos::ev::SubmitEvent) {
        if let SubmitDecision::Block(reason) = self.controller.on_submit() {
            ev.prevent_default();
            let message = reason.message();
            log::info!("Envío bloqueado: {:?}", reason);
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(&message);
            }
        }
    }
}

/// Сообщение, с которым backend вернул браузер на форму
fn server_form_error() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    query_param(&search, "error")
}

impl Default for FallaNuevaViewModel {
    fn default() -> Self {
        Self::new()
    }
}
