use super::api::ValidationClient;
use super::guard::{DuplicateFaultGuard, GuardView, SubmitDecision, ValidationOutcome};
use async_trait::async_trait;
use contracts::domain::a002_equipo::{EquipmentCatalog, EquipoOption};
use std::cell::RefCell;

/// События формы "Nueva falla"
#[async_trait(?Send)]
pub trait FallaFormHandler {
    /// Новый тип оборудования: опции селектора экземпляров
    fn on_equipment_type_changed(&self, equipo_tipo: &str) -> Vec<EquipoOption>;

    /// Новый экземпляр: запускает проверку, если пара полная
    async fn on_equipment_instance_changed(
        &self,
        equipo_tipo: &str,
        equipo_id: &str,
    ) -> Option<ValidationOutcome>;

    /// Один запрос к серверу. `None`, если пара неполная и запрос не отправлялся.
    async fn validate(&self, equipo_tipo: &str, equipo_id: &str) -> Option<ValidationOutcome>;

    fn on_submit(&self) -> SubmitDecision;
}

/// Владелец состояния защиты на время сессии формы
///
/// Состояние живёт в `RefCell` и никогда не удерживается через `.await`.
pub struct FallaGuardController<C: ValidationClient> {
    guard: RefCell<DuplicateFaultGuard>,
    catalog: RefCell<EquipmentCatalog>,
    client: C,
    observer: RefCell<Option<Box<dyn Fn(&GuardView)>>>,
}

impl<C: ValidationClient> FallaGuardController<C> {
    pub fn new(client: C) -> Self {
        Self {
            guard: RefCell::new(DuplicateFaultGuard::new()),
            catalog: RefCell::new(EquipmentCatalog::default()),
            client,
            observer: RefCell::new(None),
        }
    }

    /// Подписка на изменения снимка (UI обновляет сигналы)
    pub fn set_observer(&self, observer: impl Fn(&GuardView) + 'static) {
        *self.observer.borrow_mut() = Some(Box::new(observer));
        self.notify();
    }

    pub fn set_catalog(&self, catalog: EquipmentCatalog) {
        *self.catalog.borrow_mut() = catalog;
    }

    pub fn tipos(&self) -> Vec<String> {
        self.catalog.borrow().tipos()
    }

    pub fn view(&self) -> GuardView {
        self.guard.borrow().view()
    }

    fn notify(&self) {
        let view = self.view();
        if let Some(observer) = self.observer.borrow().as_ref() {
            observer(&view);
        }
    }
}

#[async_trait(?Send)]
impl<C: ValidationClient> FallaFormHandler for FallaGuardController<C> {
    fn on_equipment_type_changed(&self, equipo_tipo: &str) -> Vec<EquipoOption> {
        self.guard
            .borrow_mut()
            .on_equipment_type_changed(equipo_tipo);
        self.notify();
        self.catalog.borrow().options_for(equipo_tipo.trim())
    }

    async fn on_equipment_instance_changed(
        &self,
        equipo_tipo: &str,
        equipo_id: &str,
    ) -> Option<ValidationOutcome> {
        let complete = self
            .guard
            .borrow_mut()
            .on_equipment_instance_changed(equipo_tipo, equipo_id);
        self.notify();
        if !complete {
            return None;
        }
        self.validate(equipo_tipo, equipo_id).await
    }

    async fn validate(&self, equipo_tipo: &str, equipo_id: &str) -> Option<ValidationOutcome> {
        let ticket = self
            .guard
            .borrow_mut()
            .begin_validation(equipo_tipo, equipo_id)?;
        self.notify();

        let result = self
            .client
            .validar(&ticket.equipo_tipo, &ticket.equipo_id)
            .await;

        let outcome = self.guard.borrow_mut().finish_validation(&ticket, result);
        match &outcome {
            ValidationOutcome::FailedOpen(e) => {
                log::error!("Error validando falla: {}", e);
            }
            ValidationOutcome::Stale => {
                log::debug!(
                    "Respuesta obsoleta descartada: {}/{} (#{})",
                    ticket.equipo_tipo,
                    ticket.equipo_id,
                    ticket.seq
                );
                return Some(outcome);
            }
            _ => {}
        }
        self.notify();
        Some(outcome)
    }

    fn on_submit(&self) -> SubmitDecision {
        self.guard.borrow().on_submit()
    }
}
