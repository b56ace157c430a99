use serde_json::json;

use super::*;
use crate::error::NO_SELECTION_MESSAGE;
use crate::test_utils::{test_fields, TestFields};

fn session() -> DialogSession<TestFields> {
    DialogSession::new()
}

fn target(kind: DialogKind) -> DialogTarget {
    DialogTarget::Standard(kind)
}

/// Open `kind` and make an unsaved edit in it.
fn dirty(session: &mut DialogSession<TestFields>, kind: DialogKind) {
    if kind != DialogKind::Add {
        session.set_pending_data(kind, Some(test_fields(1)));
    }
    session.open_dialog(kind, false);
    session.edit_pending(kind, |f| f.name = "changed".into());
    assert!(session.has_unsaved_changes());
}

// ==================== Mutual exclusion / history ====================

#[test]
fn at_most_one_dialog_open() {
    let mut s = session();
    let steps: [fn(&mut DialogSession<TestFields>) -> Transition; 6] = [
        |s| s.open_dialog(DialogKind::Add, true),
        |s| s.open_dialog(DialogKind::Edit, true),
        |s| s.open_custom_dialog("clientIdSecretDialog", None, true),
        |s| s.open_dialog(DialogKind::Delete, true),
        |s| s.open_custom_dialog("other", Some(json!({"a": 1})), true),
        |s| s.open_dialog(DialogKind::Add, true),
    ];
    for step in steps {
        assert_eq!(step(&mut s), Transition::Applied);
        assert_eq!(s.open_flags().open_count(), 1);
    }
}

#[test]
fn forced_open_then_forced_cancel_returns() {
    let mut s = session();
    s.open_dialog(DialogKind::Add, false);
    s.open_dialog(DialogKind::Edit, true);
    assert_eq!(s.previous_dialog(), Some(&target(DialogKind::Add)));

    assert_eq!(s.cancel_dialog(true), Transition::Applied);

    assert!(s.is_open(&target(DialogKind::Add)));
    assert!(s.previous_dialog().is_none());
    assert_eq!(s.history_depth(), 0);
}

#[test]
fn cancel_pops_one_level_then_closes() {
    let mut s = session();
    s.open_dialog(DialogKind::Add, false);
    s.open_dialog(DialogKind::Edit, false);
    s.open_custom_dialog("k", None, false);
    assert_eq!(s.history_depth(), 2);

    s.cancel_dialog(false);
    assert!(s.is_open(&target(DialogKind::Edit)));
    s.cancel_dialog(false);
    assert!(s.is_open(&target(DialogKind::Add)));
    s.cancel_dialog(false);
    assert!(s.is_all_closed());
}

#[test]
fn reopening_current_dialog_keeps_history() {
    let mut s = session();
    s.open_dialog(DialogKind::Add, false);
    s.open_dialog(DialogKind::Add, false);
    assert_eq!(s.history_depth(), 0);
}

#[test]
fn history_restores_snapshot_only_into_empty_slot() {
    let mut s = session();
    s.open_with_record(DialogKind::Edit, test_fields(1), false);
    s.open_custom_dialog("k", None, false);

    s.set_pending_data(DialogKind::Edit, None);
    s.cancel_dialog(false);
    assert_eq!(s.pending_data(DialogKind::Edit), Some(&test_fields(1)));

    s.open_custom_dialog("k", None, false);
    s.set_pending_data(DialogKind::Edit, Some(test_fields(2)));
    s.cancel_dialog(false);
    assert_eq!(s.pending_data(DialogKind::Edit), Some(&test_fields(2)));
}

#[test]
fn custom_payload_survives_round_trip() {
    let mut s = session();
    s.open_custom_dialog("k", Some(json!({"clientId": "c"})), false);
    s.open_dialog(DialogKind::Add, false);
    s.cancel_dialog(false);

    assert!(s.is_open(&DialogTarget::custom("k")));
    assert_eq!(s.custom_data("k").unwrap()["clientId"], "c");
}

#[test]
fn non_object_payload_is_ignored() {
    let mut s = session();
    assert_eq!(s.open_custom_dialog("k", Some(json!(5)), false), Transition::Applied);
    assert!(s.is_open(&DialogTarget::custom("k")));
    assert!(s.custom_data("k").is_none());
}

#[test]
fn close_current_clears_history_and_confirmation() {
    let mut s = session();
    s.open_dialog(DialogKind::Add, false);
    dirty(&mut s, DialogKind::Edit);
    assert_eq!(s.open_dialog(DialogKind::Delete, false), Transition::AwaitingConfirmation);

    s.close_current_dialog();

    assert!(s.is_all_closed());
    assert!(!s.is_confirmation_pending());
    assert_eq!(s.history_depth(), 0);
    assert!(!s.has_unsaved_changes());
}

// ==================== Discard guard ====================

#[test]
fn unsaved_changes_hold_the_request() {
    let mut s = session();
    dirty(&mut s, DialogKind::Add);

    assert_eq!(s.open_dialog(DialogKind::Edit, false), Transition::AwaitingConfirmation);

    assert!(s.current_dialog().is_none());
    assert!(s.open_flags().all_closed());
    assert!(s.open_flags().confirmation);
    assert!(!s.is_all_closed());
    assert_eq!(s.pending_request(), Some(&DeferredRequest::Open(DialogKind::Edit)));
    // Cleared while the prompt is up, restored on decline.
    assert!(!s.has_unsaved_changes());
}

#[test]
fn confirm_replays_request() {
    let mut s = session();
    dirty(&mut s, DialogKind::Add);
    s.open_dialog(DialogKind::Edit, false);

    assert_eq!(s.confirm_discard(), Transition::Applied);

    assert!(s.is_open(&target(DialogKind::Edit)));
    assert_eq!(s.previous_dialog(), Some(&target(DialogKind::Add)));
    assert!(!s.is_confirmation_pending());
    assert!(!s.has_unsaved_changes());
}

#[test]
fn decline_restores_prior_visibility() {
    let mut s = session();
    dirty(&mut s, DialogKind::Add);
    let before = s.open_flags();
    s.open_dialog(DialogKind::Edit, false);

    assert_eq!(s.decline_discard(), Transition::Applied);

    assert_eq!(s.open_flags(), before);
    assert!(s.has_unsaved_changes());
    assert_eq!(s.pending_data(DialogKind::Add).unwrap().name, "changed");
    assert_eq!(s.history_depth(), 0);
}

#[test]
fn second_request_while_pending_is_rejected() {
    let mut s = session();
    dirty(&mut s, DialogKind::Add);
    s.open_dialog(DialogKind::Edit, false);

    assert_eq!(s.open_dialog(DialogKind::Delete, false), Transition::Rejected);
    assert_eq!(s.cancel_dialog(false), Transition::Rejected);
    assert_eq!(s.pending_request(), Some(&DeferredRequest::Open(DialogKind::Edit)));
}

#[test]
fn forced_request_supersedes_pending() {
    let mut s = session();
    dirty(&mut s, DialogKind::Add);
    s.open_dialog(DialogKind::Edit, false);

    assert_eq!(s.open_dialog(DialogKind::Delete, true), Transition::Applied);

    assert!(!s.is_confirmation_pending());
    assert!(s.is_open(&target(DialogKind::Delete)));
    assert_eq!(s.previous_dialog(), Some(&target(DialogKind::Add)));
}

#[test]
fn guarded_cancel_closes_on_confirm() {
    let mut s = session();
    dirty(&mut s, DialogKind::Add);

    assert_eq!(s.cancel_dialog(false), Transition::AwaitingConfirmation);
    s.confirm_discard();

    assert!(s.is_all_closed());
    assert!(s.pending_data(DialogKind::Add).is_none());
}

#[test]
fn forced_cancel_skips_guard() {
    let mut s = session();
    dirty(&mut s, DialogKind::Add);

    assert_eq!(s.cancel_dialog(true), Transition::Applied);
    assert!(s.is_all_closed());
    assert!(!s.has_unsaved_changes());
}

#[test]
fn guarded_open_with_record_installs_on_confirm_only() {
    let mut s = session();
    s.open_with_record(DialogKind::Edit, test_fields(1), false);
    s.edit_pending(DialogKind::Edit, |f| f.name = "changed".into());

    s.open_with_record(DialogKind::Edit, test_fields(2), false);
    assert_eq!(s.pending_data(DialogKind::Edit).unwrap().name, "changed");

    s.confirm_discard();
    assert_eq!(s.pending_data(DialogKind::Edit), Some(&test_fields(2)));
    assert!(s.is_open(&target(DialogKind::Edit)));
}

#[test]
fn decision_without_pending_request_is_rejected() {
    let mut s = session();
    assert_eq!(s.confirm_discard(), Transition::Rejected);
    assert_eq!(s.decline_discard(), Transition::Rejected);
}

// ==================== Pending data ====================

#[test]
fn edits_outside_a_dialog_are_not_unsaved_changes() {
    let mut s = session();
    s.edit_pending(DialogKind::Add, |f| f.name = "x".into());
    assert!(!s.has_unsaved_changes());

    s.open_dialog(DialogKind::Add, false);
    s.set_pending_data(DialogKind::Add, Some(test_fields(1)));
    assert!(!s.has_unsaved_changes());
}

#[test]
fn opening_clears_error_and_field_errors() {
    let mut s = session();
    s.open_dialog(DialogKind::Add, false);
    s.set_error(Some("boom".into()));
    s.set_field_error("name", "required");
    s.set_pending_data(DialogKind::Edit, Some(test_fields(1)));

    s.open_dialog(DialogKind::Edit, false);

    assert!(s.error().is_none());
    assert!(s.field_errors().is_empty());
}

#[test]
fn closing_settles_to_selection_snapshot() {
    let mut s = session();
    let ticket = s.set_selected_rows(vec![1]);
    s.apply_conversion(ticket, Ok(test_fields(1)));
    s.open_dialog(DialogKind::Edit, false);
    s.edit_pending(DialogKind::Edit, |f| f.name = "changed".into());
    s.open_custom_dialog("k", Some(json!({"a": 1})), true);

    s.close_current_dialog();

    assert_eq!(s.pending_data(DialogKind::Edit), Some(&test_fields(1)));
    assert_eq!(s.pending_data(DialogKind::Delete), Some(&test_fields(1)));
    assert!(s.custom_data("k").is_none());
}

// ==================== Selection ====================

#[test]
fn selection_fills_edit_and_delete_when_closed() {
    let mut s = session();
    let ticket = s.set_selected_rows(vec![5]);
    assert!(s.apply_conversion(ticket, Ok(test_fields(5))));

    assert_eq!(s.selected_row_ids(), &[5]);
    assert_eq!(s.pending_data(DialogKind::Edit), Some(&test_fields(5)));
    assert_eq!(s.pending_data(DialogKind::Delete), Some(&test_fields(5)));
}

#[test]
fn selection_waits_for_open_dialog_to_close() {
    let mut s = session();
    s.open_with_record(DialogKind::Edit, test_fields(1), false);

    let ticket = s.set_selected_rows(vec![2]);
    s.apply_conversion(ticket, Ok(test_fields(2)));
    assert_eq!(s.pending_data(DialogKind::Edit), Some(&test_fields(1)));
    assert_eq!(s.selection_snapshot(), Some(&test_fields(2)));

    s.cancel_dialog(false);
    assert_eq!(s.pending_data(DialogKind::Edit), Some(&test_fields(2)));
}

#[test]
fn outdated_ticket_is_dropped() {
    let mut s = session();
    let first = s.set_selected_rows(vec![1]);
    let second = s.set_selected_rows(vec![2]);

    assert!(!s.apply_conversion(first, Ok(test_fields(1))));
    assert!(s.apply_conversion(second, Ok(test_fields(2))));
    assert_eq!(s.pending_data(DialogKind::Edit), Some(&test_fields(2)));
}

#[test]
fn conversion_failure_surfaces_and_clears() {
    let mut s = session();
    let ticket = s.set_selected_rows(vec![1]);
    s.apply_conversion(ticket, Ok(test_fields(1)));
    let ticket = s.set_selected_rows(vec![2]);

    s.apply_conversion(ticket, Err(CoreError::ConversionFailure("bad row".into())));

    assert_eq!(s.error(), Some("Could not load the selected row: bad row"));
    assert!(s.pending_data(DialogKind::Edit).is_none());
    assert!(s.pending_data(DialogKind::Delete).is_none());
}

// ==================== Delete targets ====================

#[test]
fn delete_without_targets_is_blocked() {
    let mut s = session();
    s.open_dialog(DialogKind::Delete, false);

    assert_eq!(s.error(), Some(NO_SELECTION_MESSAGE));
    assert_eq!(s.delete_targets(), Err(CoreError::NoSelection));
    assert!(!s.can_submit_delete());
}

#[test]
fn edit_without_target_is_blocked() {
    let mut s = session();
    s.open_dialog(DialogKind::Edit, false);

    assert_eq!(s.error(), Some(NO_SELECTION_MESSAGE));
    assert_eq!(s.edit_target(), Err(CoreError::NoSelection));
    assert!(!s.can_submit_edit());

    s.edit_pending(DialogKind::Edit, |f| f.name = "typed".into());
    assert!(s.pending_data(DialogKind::Edit).is_none());
    assert!(!s.has_unsaved_changes());
}

#[test]
fn only_add_submits_fall_back_to_default() {
    let mut s = session();
    assert_eq!(s.submit_data(DialogKind::Add), Ok(TestFields::default()));
    assert_eq!(s.submit_data(DialogKind::Edit), Err(CoreError::NoSelection));

    let ticket = s.set_selected_rows(vec![4]);
    s.apply_conversion(ticket, Ok(test_fields(4)));

    assert_eq!(s.submit_data(DialogKind::Edit), Ok(test_fields(4)));
    assert!(s.can_submit_edit());
}

#[test]
fn explicit_delete_record_wins_over_selection() {
    let mut s = session();
    s.set_selected_rows(vec![1, 2]);
    assert_eq!(s.delete_targets(), Ok(vec![1, 2]));

    s.set_pending_data(DialogKind::Delete, Some(test_fields(9)));
    assert_eq!(s.delete_targets(), Ok(vec![9]));
}

// ==================== Commit / revalidation ====================

#[test]
fn commit_revalidates_once_after_close() {
    let mut s = session();
    dirty(&mut s, DialogKind::Add);

    s.mark_committed();
    assert!(s.is_commit_pending());
    assert!(!s.take_revalidation());

    s.close_current_dialog();
    assert!(!s.is_commit_pending());
    assert!(s.take_revalidation());
    assert!(!s.take_revalidation());

    // Further transitions into "all closed" do not revalidate again.
    s.open_dialog(DialogKind::Add, false);
    s.cancel_dialog(false);
    assert!(!s.take_revalidation());
}

#[test]
fn commit_clears_all_pending_data() {
    let mut s = session();
    let ticket = s.set_selected_rows(vec![1]);
    s.apply_conversion(ticket, Ok(test_fields(1)));
    s.open_dialog(DialogKind::Edit, false);

    s.mark_committed();
    s.close_current_dialog();

    for kind in DialogKind::ALL {
        assert!(s.pending_data(kind).is_none());
    }
    assert!(s.selection_snapshot().is_none());
}

#[test]
fn commit_while_closed_settles_immediately() {
    let mut s = session();
    s.mark_committed();
    assert!(s.take_revalidation());
}

#[test]
fn escalation_settles_when_custom_dialog_closes() {
    let mut s = session();
    dirty(&mut s, DialogKind::Add);

    let payload = json!({"clientId": "c", "clientSecret": "s"});
    assert_eq!(
        s.open_custom_dialog("clientIdSecretDialog", Some(payload), true),
        Transition::Applied
    );
    s.mark_committed();
    assert!(!s.take_revalidation());

    s.close_current_dialog();
    assert!(s.take_revalidation());
    assert!(s.custom_data("clientIdSecretDialog").is_none());
}

// ==================== Walkthrough ====================

#[test]
fn edit_then_guarded_delete_walkthrough() {
    let mut s = session();
    let ticket = s.set_selected_rows(vec![5]);
    s.apply_conversion(ticket, Ok(test_fields(5)));

    s.open_dialog(DialogKind::Edit, false);
    assert!(s.open_flags().edit);
    s.edit_pending(DialogKind::Edit, |f| f.name = "renamed".into());
    assert!(s.has_unsaved_changes());

    assert_eq!(s.open_dialog(DialogKind::Delete, false), Transition::AwaitingConfirmation);
    assert_eq!(s.open_flags().open_count(), 0);
    assert!(s.open_flags().confirmation);

    s.confirm_discard();
    assert!(s.open_flags().delete);
    assert_eq!(s.delete_targets(), Ok(vec![5]));

    // Cancelling the delete returns to the edit dialog with its edits.
    s.cancel_dialog(false);
    assert!(s.open_flags().edit);
    assert_eq!(s.pending_data(DialogKind::Edit).unwrap().name, "renamed");
}

// ==================== Lifecycle ====================

#[test]
fn dispose_invalidates_tokens_and_rejects_requests() {
    let mut s = session();
    let token = s.token();
    let ticket = s.set_selected_rows(vec![1]);
    s.open_dialog(DialogKind::Add, false);

    s.dispose();

    assert!(s.is_disposed());
    assert!(!s.is_live(token));
    assert_ne!(s.token(), token);
    assert!(!s.apply_conversion(ticket, Ok(test_fields(1))));
    assert_eq!(s.open_dialog(DialogKind::Edit, false), Transition::Rejected);
    assert!(s.is_all_closed());
    assert!(s.selected_row_ids().is_empty());

    s.mark_committed();
    assert!(!s.take_revalidation());
}
