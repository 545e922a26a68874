use super::view_model::FallaNuevaViewModel;
use crate::domain::a001_falla::api::create_action_url;
use crate::domain::a001_falla::guard::SubmitButton;
use contracts::domain::a001_falla::Prioridad;
use leptos::prelude::*;

#[component]
pub fn FallaNueva() -> impl IntoView {
    let vm = FallaNuevaViewModel::new();
    vm.load_catalog();

    let guard_view = vm.guard_view;
    let tipos = vm.tipos;
    let opciones = vm.opciones;
    let equipo_tipo = vm.equipo_tipo;
    let equipo_id = vm.equipo_id;
    let catalog_error = vm.catalog_error;
    let form_error = vm.form_error;

    view! {
        <div class="details-container falla-nueva">
            <div class="details-header">
                <h3>{"Reportar nueva falla"}</h3>
            </div>

            {move || catalog_error.get().map(|e| view! { <div class="error">{e}</div> })}
            {move || {
                form_error
                    .get()
                    .map(|e| view! { <div class="alert alert-danger" role="alert">{e}</div> })
            }}

            {move || {
                guard_view
                    .get()
                    .alert
                    .map(|mensaje| {
                        view! {
                            <div id="alertaDuplicado" class="alert alert-warning show" role="alert">
                                <strong>{"Falla existente: "}</strong>
                                <span id="mensajeDuplicado">{mensaje}</span>
                            </div>
                        }
                    })
            }}

            <form
                id="formNuevaFalla"
                class="details-form"
                method="post"
                action=create_action_url()
                on:submit={
                    let vm = vm.clone();
                    move |ev| vm.on_submit(&ev)
                }
            >
                <div class="form-group">
                    <label for="equipo_tipo">{"Tipo de equipo"}</label>
                    <select
                        id="equipo_tipo"
                        name="equipo_tipo"
                        class="form-select"
                        prop:value=move || equipo_tipo.get()
                        on:change={
                            let vm = vm.clone();
                            move |ev| vm.on_tipo_changed(event_target_value(&ev))
                        }
                    >
                        <option value="">{"Seleccione..."}</option>
                        {move || {
                            tipos
                                .get()
                                .into_iter()
                                .map(|tipo| view! { <option value=tipo.clone()>{tipo.clone()}</option> })
                                .collect_view()
                        }}
                    </select>
                </div>

                <div class="form-group">
                    <label for="equipo_id">{"Equipo"}</label>
                    <select
                        id="equipo_id"
                        name="equipo_id"
                        class="form-select"
                        prop:value=move || equipo_id.get()
                        on:change={
                            let vm = vm.clone();
                            move |ev| vm.on_equipo_changed(event_target_value(&ev))
                        }
                    >
                        <option value="">{"Seleccione..."}</option>
                        {move || {
                            opciones
                                .get()
                                .into_iter()
                                .map(|o| view! { <option value=o.value>{o.label}</option> })
                                .collect_view()
                        }}
                    </select>
                </div>

                <div class="form-group">
                    <label for="prioridad">{"Prioridad"}</label>
                    <select id="prioridad" name="prioridad" class="form-select">
                        <option value="">{"Sin prioridad"}</option>
                        {Prioridad::all()
                            .into_iter()
                            .map(|p| view! { <option value=p.as_str()>{p.as_str()}</option> })
                            .collect_view()}
                    </select>
                </div>

                <div class="form-group">
                    <label for="descripcion">{"Descripción"}</label>
                    <textarea
                        id="descripcion"
                        name="descripcion"
                        rows="3"
                        placeholder="Describa la falla observada"
                    />
                </div>

                <div class="details-actions">
                    <button
                        id="btnEnviar"
                        type="submit"
                        class="btn btn-primary"
                        disabled=move || !guard_view.get().submit_enabled
                    >
                        {move || {
                            (guard_view.get().button == SubmitButton::Validating)
                                .then(|| {
                                    view! {
                                        <span
                                            class="spinner-border spinner-border-sm"
                                            role="status"
                                        ></span>
                                    }
                                })
                        }}
                        {move || guard_view.get().button.label()}
                    </button>
                </div>
            </form>
        </div>
    }
}
