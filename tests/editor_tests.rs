mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{existing_record, ApiCall, RecordingApi};
use gearguard::dto::FieldUpdate;
use gearguard::models::{AuthMode, Credentials, DashboardData, Priority, RequestDraft, RequestField, RequestId, Stage};
use gearguard::services::{DashboardLoader, DeleteOutcome, EditorTab, RequestEditor, SessionService, PASSWORD_MISMATCH};
use gearguard::viewmodels::{AppView, AppViewModel, AuthField, DashboardViewModel};
use gearguard::ClientError;

#[tokio::test]
async fn test_signup_mismatch_makes_no_call() {
    let api = RecordingApi::new();
    let session = SessionService::new(api.clone());

    let err = session
        .submit(AuthMode::Signup, &Credentials::signup("Ana", "ana@example.com", "pw1", "pw2"))
        .await
        .unwrap_err();

    assert_eq!(err, ClientError::Validation(PASSWORD_MISMATCH.to_string()));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_open_existing_is_locked_copy_of_record() {
    let record = existing_record("abc");
    let api = RecordingApi::with_record(record.clone());
    let mut editor = RequestEditor::new(api.clone());

    editor.open_existing(RequestId::new("abc")).await.unwrap();

    assert!(editor.is_open());
    assert!(editor.is_locked());
    assert_eq!(editor.draft(), &RequestDraft::from(&record));
    assert_eq!(editor.draft().to_record(record.id.clone()).subject, record.subject);
}

#[tokio::test]
async fn test_locked_edits_change_nothing() {
    let api = RecordingApi::with_record(existing_record("abc"));
    let mut editor = RequestEditor::new(api.clone());
    editor.open_existing(RequestId::new("abc")).await.unwrap();
    api.clear_calls();
    let before = editor.draft().clone();

    assert_eq!(editor.change_field(RequestField::Technician, "Bob"), Err(ClientError::Locked));
    assert_eq!(editor.set_stage(Stage::Done), Err(ClientError::Locked));
    assert_eq!(editor.edit_text_area("new notes"), Err(ClientError::Locked));
    assert!(matches!(editor.save().await, Err(ClientError::Locked)));
    editor.flush().await.unwrap();

    assert_eq!(editor.draft(), &before);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_open_new_has_default_draft_and_no_autosave() {
    let api = RecordingApi::new();
    let mut editor = RequestEditor::new(api.clone());

    editor.open_new();
    assert!(editor.is_open());
    assert!(!editor.is_locked());
    assert_eq!(editor.draft(), &RequestDraft::default());

    editor.change_field(RequestField::Subject, "Replace filter").unwrap();
    editor.set_priority(Priority::High).unwrap();
    assert_eq!(editor.draft().field_value(RequestField::Subject).as_deref(), Some("Replace filter"));
    assert_eq!(editor.draft().priority, Priority::High);

    editor.flush().await.unwrap();
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_unlock_then_single_field_sync() {
    let api = RecordingApi::with_record(existing_record("42"));
    let mut editor = RequestEditor::new(api.clone());

    editor.open_existing(RequestId::new("42")).await.unwrap();
    editor.unlock().unwrap();
    editor.change_field(RequestField::Technician, "Alice").unwrap();
    editor.flush().await.unwrap();

    assert_eq!(
        api.write_calls(),
        vec![ApiCall::UpdateField(FieldUpdate {
            id: RequestId::new("42"),
            field: RequestField::Technician,
            value: "Alice".into(),
        })]
    );
    assert_eq!(editor.draft().technician, "Alice");
    assert!(editor.sync_status().is_empty());
}

#[tokio::test]
async fn test_target_switch_also_syncs_cleared_id() {
    let mut record = existing_record("42");
    record.equipment_id = "eq-cnc-01".into();
    let api = RecordingApi::with_record(record);
    let mut editor = RequestEditor::new(api.clone());

    editor.open_existing(RequestId::new("42")).await.unwrap();
    editor.unlock().unwrap();
    editor.change_field(RequestField::TargetType, "work_center").unwrap();
    // Mismo tipo: solo el propio campo
    editor.change_field(RequestField::TargetType, "work_center").unwrap();
    editor.flush().await.unwrap();

    let update = |field, value: &str| {
        ApiCall::UpdateField(FieldUpdate { id: RequestId::new("42"), field, value: value.into() })
    };
    assert_eq!(
        api.write_calls(),
        vec![
            update(RequestField::TargetType, "work_center"),
            update(RequestField::WorkCenterId, ""),
            update(RequestField::TargetType, "work_center"),
        ]
    );
    assert_eq!(editor.draft().field_value(RequestField::WorkCenterId).as_deref(), Some(""));
}

#[tokio::test]
async fn test_write_lanes_retire_after_flush_and_close() {
    let api = RecordingApi::with_record(existing_record("42"));
    let mut editor = RequestEditor::new(api.clone());

    editor.open_existing(RequestId::new("42")).await.unwrap();
    editor.unlock().unwrap();
    editor.change_field(RequestField::Notes, "first pass").unwrap();
    editor.flush().await.unwrap();
    assert_eq!(editor.active_lanes(), 0);

    editor.change_field(RequestField::Notes, "second pass").unwrap();
    editor.close();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(editor.active_lanes(), 0);
    assert_eq!(api.write_calls().len(), 2);
}

#[tokio::test]
async fn test_field_syncs_arrive_before_save() {
    let api = RecordingApi::with_record(existing_record("42"));
    *api.field_delay.lock().unwrap() = Some(Duration::from_millis(30));
    let mut editor = RequestEditor::new(api.clone());

    editor.open_existing(RequestId::new("42")).await.unwrap();
    editor.unlock().unwrap();
    editor.change_field(RequestField::Technician, "Alice").unwrap();
    editor.change_field(RequestField::Duration, "01:00").unwrap();
    let saved = editor.save().await.unwrap();

    assert_eq!(saved, Some(RequestId::new("42")));
    assert!(!editor.is_open());
    let writes = api.write_calls();
    assert_eq!(writes.len(), 3);
    assert!(matches!(&writes[0], ApiCall::UpdateField(u) if u.field == RequestField::Technician));
    assert!(matches!(&writes[1], ApiCall::UpdateField(u) if u.field == RequestField::Duration));
    assert!(matches!(&writes[2], ApiCall::Save(p) if p.record.duration == "01:00"));
}

#[tokio::test]
async fn test_failed_autosave_is_inline_error() {
    let api = RecordingApi::with_record(existing_record("42"));
    *api.fail_fields.lock().unwrap() = true;
    let mut editor = RequestEditor::new(api.clone());

    editor.open_existing(RequestId::new("42")).await.unwrap();
    editor.unlock().unwrap();
    editor.change_field(RequestField::Notes, "checked").unwrap();
    editor.flush().await.unwrap();

    assert!(editor.state().field_errors.contains_key(&RequestField::Notes));

    // Un cambio nuevo del campo limpia su error
    editor.change_field(RequestField::Notes, "checked again").unwrap();
    assert!(!editor.state().field_errors.contains_key(&RequestField::Notes));
}

#[tokio::test]
async fn test_outcomes_from_closed_session_are_dropped() {
    let api = RecordingApi::with_record(existing_record("42"));
    *api.fail_fields.lock().unwrap() = true;
    *api.field_delay.lock().unwrap() = Some(Duration::from_millis(20));
    let mut editor = RequestEditor::new(api.clone());

    editor.open_existing(RequestId::new("42")).await.unwrap();
    editor.unlock().unwrap();
    editor.change_field(RequestField::Notes, "late").unwrap();
    editor.close();

    editor.open_existing(RequestId::new("42")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(editor.sync_status().is_empty());
}

#[tokio::test]
async fn test_tabs_keep_both_texts() {
    let api = RecordingApi::new();
    let mut editor = RequestEditor::new(api);
    editor.open_new();

    editor.edit_text_area("oil the chain").unwrap();
    editor.select_tab(EditorTab::Instructions);
    assert_eq!(editor.text_area_value(), "");
    editor.edit_text_area("wear gloves").unwrap();
    editor.select_tab(EditorTab::Notes);

    assert_eq!(editor.text_area_value(), "oil the chain");
    assert_eq!(editor.draft().instructions, "wear gloves");
}

#[tokio::test]
async fn test_target_switch_and_inactive_field() {
    let api = RecordingApi::new();
    let mut editor = RequestEditor::new(api);
    editor.open_new();

    editor.change_field(RequestField::EquipmentId, "eq-1").unwrap();
    editor.change_field(RequestField::TargetType, "work_center").unwrap();
    assert_eq!(
        editor.change_field(RequestField::EquipmentId, "eq-2"),
        Err(ClientError::InactiveField(RequestField::EquipmentId))
    );
    editor.change_field(RequestField::WorkCenterId, "wc-1").unwrap();

    let record = editor.draft().to_record(None);
    assert_eq!(record.equipment_id, "");
    assert_eq!(record.work_center_id, "wc-1");
    assert!(matches!(editor.set_stage(Stage::Scrap), Ok(())));
    assert!(matches!(
        editor.change_field(RequestField::Stage, "Closed"),
        Err(ClientError::Validation(_))
    ));
    assert_eq!(editor.draft().stage, Stage::Scrap);
}

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let api = RecordingApi::with_record(existing_record("abc"));
    let mut editor = RequestEditor::new(api.clone());
    editor.open_existing(RequestId::new("abc")).await.unwrap();

    let mut prompt = String::new();
    let outcome = editor
        .delete(|message| {
            prompt = message.to_string();
            false
        })
        .await
        .unwrap();
    assert_eq!(outcome, DeleteOutcome::Cancelled);
    assert_eq!(prompt, "Are you sure?");
    assert!(api.write_calls().is_empty());
    assert!(editor.is_open());

    let outcome = editor.delete(|_| true).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert_eq!(api.write_calls(), vec![ApiCall::Delete(RequestId::new("abc"))]);
    assert!(!editor.is_open());
}

#[tokio::test]
async fn test_delete_without_id_is_rejected() {
    let api = RecordingApi::new();
    let mut editor = RequestEditor::new(api.clone());
    editor.open_new();
    assert!(matches!(editor.delete(|_| true).await, Err(ClientError::MissingId)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_open_missing_record_stays_closed() {
    let api = RecordingApi::new();
    let mut editor = RequestEditor::new(api);
    let err = editor.open_existing(RequestId::new("nope")).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
    assert!(!editor.is_open());
    assert!(editor.state().last_error.is_some());
}

#[tokio::test]
async fn test_loader_keeps_data_on_failure() {
    let api = RecordingApi::with_record(existing_record("abc"));
    let mut loader = DashboardLoader::new(api.clone());
    loader.reload().await.unwrap();
    assert_eq!(loader.data().requests.len(), 1);

    api.queue_dashboard(Err(ClientError::Transport("connection refused".into())));
    assert!(loader.reload().await.is_err());
    assert_eq!(loader.data().requests.len(), 1);
    assert!(loader.last_error().is_some());

    api.queue_dashboard(Ok(DashboardData::default()));
    loader.reload().await.unwrap();
    assert!(loader.data().requests.is_empty());
    assert!(loader.last_error().is_none());
}

#[tokio::test]
async fn test_dashboard_reloads_after_save_and_delete() {
    let api = RecordingApi::with_record(existing_record("abc"));
    *api.assigned_id.lock().unwrap() = Some(RequestId::new("new-1"));
    let mut dashboard = DashboardViewModel::new(api.clone());
    dashboard.mount().await;

    dashboard.new_request();
    dashboard.editor_mut().change_field(RequestField::Subject, "Replace filter").unwrap();
    assert_eq!(dashboard.save().await.unwrap(), Some(RequestId::new("new-1")));

    dashboard.open_request(RequestId::new("abc")).await.unwrap();
    dashboard.delete(|_| true).await.unwrap();

    let fetches = api.calls().into_iter().filter(|c| *c == ApiCall::FetchDashboard).count();
    assert_eq!(fetches, 3);
    assert!(dashboard.data().requests.is_empty());
}

#[tokio::test]
async fn test_logout_returns_to_auth_even_on_failure() {
    let api = RecordingApi::new();
    *api.fail_logout.lock().unwrap() = true;
    let mut app = AppViewModel::new(api.clone());

    let form = app.auth_form_mut().state_mut();
    form.set_field(AuthField::Email, "admin@example.com");
    form.set_field(AuthField::Password, "admin");
    let view = app.submit_auth().await.clone();
    assert_eq!(view, AppView::Shell { user: gearguard::models::SessionUser("Mitchell Admin".into()) });
    assert!(app.dashboard().is_some());

    app.navigation_mut().select_page("kanban").unwrap();
    assert_eq!(app.logout().await, &AppView::Auth);
    assert!(app.dashboard().is_none());
    assert!(api.calls().contains(&ApiCall::Logout));
}

#[tokio::test]
async fn test_signup_success_switches_form_to_login() {
    let api = RecordingApi::new();
    let mut app = AppViewModel::new(Arc::clone(&api) as Arc<dyn gearguard::GearGuardApi>);

    let form = app.auth_form_mut().state_mut();
    form.toggle_mode();
    form.set_field(AuthField::Name, "Ana");
    form.set_field(AuthField::Email, "ana@example.com");
    form.set_field(AuthField::Password, "pw");
    form.set_field(AuthField::RetypePassword, "pw");

    assert_eq!(app.submit_auth().await, &AppView::Auth);
    let state = app.auth_form().state();
    assert_eq!(state.mode, AuthMode::Login);
    assert_eq!(state.email, "ana@example.com");
    assert!(state.notice.is_some());
    assert_eq!(api.calls(), vec![ApiCall::Signup("ana@example.com".into())]);
}
