//! Защита от повторного отчёта о falla
//!
//! Чистая машина состояний без DOM и сети: её ведёт
//! [`FallaGuardController`](super::controller::FallaGuardController), а тесты
//! проверяют напрямую.
//!
//! Инвариант: отправка формы разрешена тогда и только тогда, когда выбраны и
//! тип, и экземпляр оборудования, нет конфликта с открытой falla и нет
//! незавершённой проверки.
//!
//! Каждая проверка получает номер из монотонного счётчика. Ответ применяется,
//! только если его номер совпадает с последней выданной и ещё не отменённой
//! проверкой, поэтому запоздавший ответ на старый выбор ничего не меняет.

use contracts::domain::a001_falla::{FallaExistente, ValidarFallaResponse};

pub const MSG_SELECCION_INCOMPLETA: &str =
    "Debe seleccionar el tipo de equipo y el equipo específico";
pub const MSG_FALLA_EXISTENTE: &str = "No se puede reportar la falla porque ya existe una falla activa para este equipo. Debe cerrar o cancelar la falla anterior.";
pub const MSG_VALIDACION_PENDIENTE: &str =
    "Espere a que termine la validación del equipo seleccionado";

/// Текущий выбор оборудования в форме
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquipmentSelection {
    pub equipo_tipo: String,
    pub equipo_id: String,
}

impl EquipmentSelection {
    pub fn is_complete(&self) -> bool {
        !self.equipo_tipo.trim().is_empty() && !self.equipo_id.trim().is_empty()
    }
}

/// Открытая falla, найденная сервером для выбранного оборудования
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictRef {
    pub mensaje: String,
    pub falla: Option<FallaExistente>,
}

impl ConflictRef {
    /// Идентификатор для сообщения, если ссылка его содержит
    pub fn falla_id(&self) -> Option<String> {
        self.falla.as_ref().and_then(FallaExistente::display_id)
    }
}

/// Выданная проверка: номер и пара, для которой она запущена
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationTicket {
    pub seq: u64,
    pub equipo_tipo: String,
    pub equipo_id: String,
}

/// Чем закончилась проверка
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Сервер разрешил отчёт
    Permitted,
    /// Есть открытая falla, отправка заблокирована
    Conflict,
    /// Сбой транспорта или разбора ответа: отправка разрешена
    FailedOpen(String),
    /// Ответ устарел и отброшен
    Stale,
}

/// Почему отправка формы заблокирована
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitBlock {
    MissingSelection,
    Conflict { falla_id: Option<String> },
    ValidationPending,
}

impl SubmitBlock {
    /// Текст блокирующего сообщения
    pub fn message(&self) -> String {
        match self {
            SubmitBlock::MissingSelection => MSG_SELECCION_INCOMPLETA.to_string(),
            SubmitBlock::Conflict { falla_id: Some(id) } => {
                format!("{} (Falla existente: #{})", MSG_FALLA_EXISTENTE, id)
            }
            SubmitBlock::Conflict { falla_id: None } => MSG_FALLA_EXISTENTE.to_string(),
            SubmitBlock::ValidationPending => MSG_VALIDACION_PENDIENTE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitDecision {
    Allow,
    Block(SubmitBlock),
}

/// Состояние кнопки отправки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitButton {
    Ready,
    Validating,
    Blocked,
}

impl SubmitButton {
    pub fn label(&self) -> &'static str {
        match self {
            SubmitButton::Ready => "Reportar Falla",
            SubmitButton::Validating => "Validando...",
            SubmitButton::Blocked => "No se puede reportar (Falla Existente)",
        }
    }
}

/// Снимок для отрисовки
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardView {
    pub submit_enabled: bool,
    pub button: SubmitButton,
    pub alert: Option<String>,
}

#[derive(Debug, Default)]
pub struct DuplicateFaultGuard {
    selection: EquipmentSelection,
    conflict: Option<ConflictRef>,
    in_flight: Option<u64>,
    last_seq: u64,
}

impl DuplicateFaultGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &EquipmentSelection {
        &self.selection
    }

    pub fn conflict(&self) -> Option<&ConflictRef> {
        self.conflict.as_ref()
    }

    pub fn is_validating(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Смена типа: сбрасывает экземпляр, конфликт и незавершённую проверку
    pub fn on_equipment_type_changed(&mut self, equipo_tipo: &str) {
        self.selection = EquipmentSelection {
            equipo_tipo: equipo_tipo.trim().to_string(),
            equipo_id: String::new(),
        };
        self.conflict = None;
        self.in_flight = None;
    }

    /// Смена экземпляра. Возвращает `true`, если пара полная и нужна проверка.
    ///
    /// Незавершённая проверка для прежнего экземпляра отменяется; конфликт
    /// остаётся до ответа на новую проверку.
    pub fn on_equipment_instance_changed(&mut self, equipo_tipo: &str, equipo_id: &str) -> bool {
        if equipo_tipo.trim() != self.selection.equipo_tipo {
            self.on_equipment_type_changed(equipo_tipo);
        }
        self.selection.equipo_id = equipo_id.trim().to_string();
        self.in_flight = None;
        self.selection.is_complete()
    }

    /// Начать проверку пары. `None`, если пара неполная.
    pub fn begin_validation(&mut self, equipo_tipo: &str, equipo_id: &str) -> Option<ValidationTicket> {
        if equipo_tipo.trim().is_empty() || equipo_id.trim().is_empty() {
            return None;
        }
        if equipo_tipo.trim() != self.selection.equipo_tipo
            || equipo_id.trim() != self.selection.equipo_id
        {
            self.on_equipment_instance_changed(equipo_tipo, equipo_id);
        }

        self.last_seq += 1;
        self.in_flight = Some(self.last_seq);
        Some(ValidationTicket {
            seq: self.last_seq,
            equipo_tipo: self.selection.equipo_tipo.clone(),
            equipo_id: self.selection.equipo_id.clone(),
        })
    }

    /// Применить результат проверки
    pub fn finish_validation(
        &mut self,
        ticket: &ValidationTicket,
        result: Result<ValidarFallaResponse, String>,
    ) -> ValidationOutcome {
        if self.in_flight != Some(ticket.seq) {
            return ValidationOutcome::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(resp) if resp.permitir => {
                self.conflict = None;
                ValidationOutcome::Permitted
            }
            Ok(resp) => {
                let mensaje = if resp.mensaje.trim().is_empty() {
                    MSG_FALLA_EXISTENTE.to_string()
                } else {
                    resp.mensaje
                };
                self.conflict = Some(ConflictRef {
                    mensaje,
                    falla: resp.falla_existente,
                });
                ValidationOutcome::Conflict
            }
            Err(e) => {
                // Недоступность проверки не должна мешать регистрации falla
                self.conflict = None;
                ValidationOutcome::FailedOpen(e)
            }
        }
    }

    /// Финальная проверка перед отправкой формы
    pub fn on_submit(&self) -> SubmitDecision {
        if !self.selection.is_complete() {
            return SubmitDecision::Block(SubmitBlock::MissingSelection);
        }
        if let Some(conflict) = &self.conflict {
            return SubmitDecision::Block(SubmitBlock::Conflict {
                falla_id: conflict.falla_id(),
            });
        }
        if self.in_flight.is_some() {
            return SubmitDecision::Block(SubmitBlock::ValidationPending);
        }
        SubmitDecision::Allow
    }

    pub fn view(&self) -> GuardView {
        let button = if self.in_flight.is_some() {
            SubmitButton::Validating
        } else if self.conflict.is_some() {
            SubmitButton::Blocked
        } else {
            SubmitButton::Ready
        };
        GuardView {
            submit_enabled: button == SubmitButton::Ready,
            button,
            alert: self.conflict.as_ref().map(|c| c.mensaje.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conflict_response() -> ValidarFallaResponse {
        serde_json::from_str(
            r#"{"permitir":false,"mensaje":"Ya existe una falla activa","falla_existente":{"id":99}}"#,
        )
        .unwrap()
    }

    fn allowed_response() -> ValidarFallaResponse {
        serde_json::from_str(r#"{"permitir":true,"mensaje":""}"#).unwrap()
    }

    fn selected(tipo: &str, id: &str) -> (DuplicateFaultGuard, ValidationTicket) {
        let mut guard = DuplicateFaultGuard::new();
        guard.on_equipment_type_changed(tipo);
        assert!(guard.on_equipment_instance_changed(tipo, id));
        let ticket = guard.begin_validation(tipo, id).unwrap();
        (guard, ticket)
    }

    #[test]
    fn test_incomplete_selection_blocks_without_validation() {
        let mut guard = DuplicateFaultGuard::new();
        assert_eq!(
            guard.on_submit(),
            SubmitDecision::Block(SubmitBlock::MissingSelection)
        );

        guard.on_equipment_type_changed("bomba");
        assert!(!guard.on_equipment_instance_changed("bomba", ""));
        assert!(guard.begin_validation("bomba", "").is_none());
        assert!(guard.begin_validation("", "12").is_none());
        assert!(!guard.is_validating());
        assert_eq!(
            guard.on_submit(),
            SubmitDecision::Block(SubmitBlock::MissingSelection)
        );
    }

    #[test]
    fn test_in_flight_disables_submit() {
        let (guard, _ticket) = selected("bomba", "12");
        let view = guard.view();
        assert!(!view.submit_enabled);
        assert_eq!(view.button, SubmitButton::Validating);
        assert_eq!(
            guard.on_submit(),
            SubmitDecision::Block(SubmitBlock::ValidationPending)
        );
    }

    #[test]
    fn test_conflict_scenario() {
        let (mut guard, ticket) = selected("bomba", "12");
        let outcome = guard.finish_validation(&ticket, Ok(conflict_response()));
        assert_eq!(outcome, ValidationOutcome::Conflict);

        let view = guard.view();
        assert!(!view.submit_enabled);
        assert_eq!(view.button, SubmitButton::Blocked);
        assert_eq!(view.alert.as_deref(), Some("Ya existe una falla activa"));

        match guard.on_submit() {
            SubmitDecision::Block(block @ SubmitBlock::Conflict { .. }) => {
                assert_eq!(
                    block,
                    SubmitBlock::Conflict {
                        falla_id: Some("99".into())
                    }
                );
                assert!(block.message().starts_with(MSG_FALLA_EXISTENTE));
                assert!(block.message().contains("#99"));
            }
            other => panic!("unexpected decision: {:?}", other),
        }
    }

    #[test]
    fn test_allowed_scenario() {
        let (mut guard, ticket) = selected("bomba", "12");
        assert_eq!(
            guard.finish_validation(&ticket, Ok(allowed_response())),
            ValidationOutcome::Permitted
        );
        let view = guard.view();
        assert!(view.submit_enabled);
        assert_eq!(view.alert, None);
        assert!(guard.conflict().is_none());
        assert_eq!(guard.on_submit(), SubmitDecision::Allow);
    }

    #[test]
    fn test_conflict_without_reference_still_blocks() {
        let (mut guard, ticket) = selected("bomba", "12");
        let resp = ValidarFallaResponse {
            permitir: false,
            mensaje: "Duplicada".into(),
            falla_existente: None,
        };
        guard.finish_validation(&ticket, Ok(resp));
        assert_eq!(
            guard.on_submit(),
            SubmitDecision::Block(SubmitBlock::Conflict { falla_id: None })
        );
    }

    #[test]
    fn test_conflict_reference_shapes_all_block() {
        for (reference, falla_id) in [
            ("99", Some("99")),
            (r#"{"id":"99"}"#, Some("99")),
            (r#"{"id":99,"estado":"Abierta"}"#, Some("99")),
            (r#"{"codigo":"X"}"#, None),
        ] {
            let json = format!(
                r#"{{"permitir":false,"mensaje":"Ya existe una falla activa","falla_existente":{}}}"#,
                reference
            );
            let resp: ValidarFallaResponse = serde_json::from_str(&json).unwrap();

            let (mut guard, ticket) = selected("bomba", "12");
            assert_eq!(
                guard.finish_validation(&ticket, Ok(resp)),
                ValidationOutcome::Conflict,
                "reference {}",
                reference
            );
            assert!(!guard.view().submit_enabled);
            assert_eq!(
                guard.on_submit(),
                SubmitDecision::Block(SubmitBlock::Conflict {
                    falla_id: falla_id.map(String::from)
                })
            );
        }
    }

    #[test]
    fn test_conflict_without_message_uses_default_alert() {
        let (mut guard, ticket) = selected("bomba", "12");
        let resp: ValidarFallaResponse =
            serde_json::from_str(r#"{"permitir":false,"mensaje":null}"#).unwrap();
        guard.finish_validation(&ticket, Ok(resp));
        assert_eq!(guard.view().alert.as_deref(), Some(MSG_FALLA_EXISTENTE));
        assert_eq!(guard.view().button, SubmitButton::Blocked);
    }

    #[test]
    fn test_network_failure_fails_open() {
        let (mut guard, ticket) = selected("bomba", "12");
        let outcome = guard.finish_validation(&ticket, Err("Request failed".into()));
        assert_eq!(outcome, ValidationOutcome::FailedOpen("Request failed".into()));

        let view = guard.view();
        assert!(view.submit_enabled);
        assert_eq!(view.button, SubmitButton::Ready);
        assert_eq!(view.alert, None);
        assert_eq!(guard.on_submit(), SubmitDecision::Allow);
    }

    #[test]
    fn test_failure_after_conflict_on_other_equipment_re_enables() {
        let (mut guard, ticket) = selected("bomba", "12");
        guard.finish_validation(&ticket, Ok(conflict_response()));

        guard.on_equipment_instance_changed("bomba", "13");
        let ticket = guard.begin_validation("bomba", "13").unwrap();
        guard.finish_validation(&ticket, Err("timeout".into()));
        assert!(guard.view().submit_enabled);
        assert_eq!(guard.on_submit(), SubmitDecision::Allow);
    }

    #[test]
    fn test_type_change_clears_conflict() {
        let (mut guard, ticket) = selected("bomba", "12");
        guard.finish_validation(&ticket, Ok(conflict_response()));

        guard.on_equipment_type_changed("camara");
        assert!(guard.conflict().is_none());
        assert_eq!(guard.selection().equipo_id, "");
        let view = guard.view();
        assert!(view.submit_enabled);
        assert_eq!(view.alert, None);
        // Экземпляр ещё не выбран
        assert_eq!(
            guard.on_submit(),
            SubmitDecision::Block(SubmitBlock::MissingSelection)
        );
    }

    #[test]
    fn test_conflict_held_until_permitted() {
        let (mut guard, ticket) = selected("bomba", "12");
        guard.finish_validation(&ticket, Ok(conflict_response()));

        guard.on_equipment_instance_changed("bomba", "13");
        assert!(guard.conflict().is_some());
        let ticket = guard.begin_validation("bomba", "13").unwrap();
        assert!(matches!(guard.on_submit(), SubmitDecision::Block(SubmitBlock::Conflict { .. })));

        guard.finish_validation(&ticket, Ok(allowed_response()));
        assert!(guard.conflict().is_none());
        assert_eq!(guard.on_submit(), SubmitDecision::Allow);
    }

    #[test]
    fn test_stale_response_is_ignored() {
        let (mut guard, old) = selected("bomba", "12");
        guard.on_equipment_instance_changed("bomba", "13");
        let new = guard.begin_validation("bomba", "13").unwrap();
        assert!(new.seq > old.seq);

        // Ответ на новую проверку приходит первым
        assert_eq!(
            guard.finish_validation(&new, Ok(allowed_response())),
            ValidationOutcome::Permitted
        );
        // Запоздавший ответ на старую проверку отброшен
        assert_eq!(
            guard.finish_validation(&old, Ok(conflict_response())),
            ValidationOutcome::Stale
        );
        assert!(guard.conflict().is_none());
        assert_eq!(guard.on_submit(), SubmitDecision::Allow);
    }

    #[test]
    fn test_stale_response_cannot_re_enable() {
        let (mut guard, old) = selected("bomba", "12");
        guard.on_equipment_instance_changed("bomba", "13");
        let new = guard.begin_validation("bomba", "13").unwrap();

        assert_eq!(
            guard.finish_validation(&old, Err("late failure".into())),
            ValidationOutcome::Stale
        );
        assert!(guard.is_validating());
        assert!(!guard.view().submit_enabled);

        guard.finish_validation(&new, Ok(conflict_response()));
        assert!(!guard.view().submit_enabled);
    }

    #[test]
    fn test_response_after_type_change_is_stale() {
        let (mut guard, ticket) = selected("bomba", "12");
        guard.on_equipment_type_changed("camara");
        assert_eq!(
            guard.finish_validation(&ticket, Ok(conflict_response())),
            ValidationOutcome::Stale
        );
        assert!(guard.conflict().is_none());
        assert!(guard.view().submit_enabled);
    }

    #[test]
    fn test_repeated_validation_is_idempotent() {
        let (mut once, ticket) = selected("bomba", "12");
        once.finish_validation(&ticket, Ok(conflict_response()));

        let (mut twice, ticket) = selected("bomba", "12");
        twice.finish_validation(&ticket, Ok(conflict_response()));
        let ticket = twice.begin_validation("bomba", "12").unwrap();
        twice.finish_validation(&ticket, Ok(conflict_response()));

        assert_eq!(once.view(), twice.view());
        assert_eq!(once.on_submit(), twice.on_submit());
        assert_eq!(once.selection(), twice.selection());
    }
}
