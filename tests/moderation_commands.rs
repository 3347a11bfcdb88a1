//! Moderation command behavior: kick, strict mute semantics, offline
//! targets, unmute, and the warning counter proc.

mod common;

use common::{gm_session, harness, harness_with};
use gmshell::gm::Policy;
use gmshell::world::AccountId;
use gmshell::world::World;
use gmshell::DispatchOutcome;

#[tokio::test]
async fn kick_disconnects_an_online_player() {
    let h = harness();
    assert!(h.world.is_online("Dorn"));
    let result = h.dispatcher.dispatch(gm_session(), "kick Dorn").await;
    assert_eq!(result.outcome, DispatchOutcome::Success);
    assert!(!h.world.is_online("Dorn"));
}

#[tokio::test]
async fn kick_unknown_player_reports_target_not_found() {
    let h = harness();
    let result = h.dispatcher.dispatch(gm_session(), "kick Nobody").await;
    assert_eq!(result.outcome, DispatchOutcome::HandlerFailed);
    assert_eq!(result.replies, vec!["Target not found.".to_string()]);
}

#[tokio::test]
async fn equal_level_peer_can_be_kicked_but_not_muted() {
    let h = harness();
    // Astra and Brann are both game masters. Kick is the ordinary
    // comparison: equal levels pass.
    let result = h.dispatcher.dispatch(gm_session(), "kick Brann").await;
    assert_eq!(result.outcome, DispatchOutcome::Success);
    // Mute is strict: equality is not enough.
    let result = h.dispatcher.dispatch(gm_session(), "mute Brann 10 abuse").await;
    assert_eq!(result.outcome, DispatchOutcome::HandlerFailed);
    assert_eq!(
        result.replies,
        vec!["You do not have authority over that target.".to_string()]
    );
    assert!(h.world.mute_state(AccountId(20)).is_none());
}

#[tokio::test]
async fn mute_records_duration_reason_and_actor() {
    let h = harness();
    let result = h
        .dispatcher
        .dispatch(gm_session(), "mute Dorn 15 trade chat spam")
        .await;
    assert_eq!(result.outcome, DispatchOutcome::Success);
    assert_eq!(
        result.replies,
        vec!["Chat disabled for Dorn for 15 min: trade chat spam".to_string()]
    );
    let mute = h.world.mute_state(AccountId(40)).expect("mute recorded");
    assert_eq!(mute.reason, "trade chat spam");
    assert_eq!(mute.muted_by, "Astra");
}

#[tokio::test]
async fn mute_reaches_offline_targets_through_persisted_lookup() {
    let h = harness();
    // Eira is offline; the security comparison falls back to the persisted
    // level and the mute lands on the account.
    let result = h.dispatcher.dispatch(gm_session(), "mute Eira 5").await;
    assert_eq!(result.outcome, DispatchOutcome::Success);
    assert!(result.replies[0].contains("next login"));
    assert!(h.world.mute_state(AccountId(50)).is_some());
}

#[tokio::test]
async fn mute_requires_a_duration() {
    let h = harness();
    let result = h.dispatcher.dispatch(gm_session(), "mute Dorn").await;
    assert_eq!(result.outcome, DispatchOutcome::HandlerFailed);
    assert!(result.replies[0].starts_with("Bad argument"));
    assert!(h.world.mute_state(AccountId(40)).is_none());

    let result = h.dispatcher.dispatch(gm_session(), "mute Dorn zero").await;
    assert_eq!(result.outcome, DispatchOutcome::HandlerFailed);
}

#[tokio::test]
async fn unmute_lifts_an_active_mute_once() {
    let h = harness();
    h.dispatcher
        .dispatch(gm_session(), "mute Dorn 10 spam")
        .await;
    let result = h.dispatcher.dispatch(gm_session(), "unmute Dorn").await;
    assert_eq!(result.outcome, DispatchOutcome::Success);
    assert!(h.world.mute_state(AccountId(40)).is_none());

    let result = h.dispatcher.dispatch(gm_session(), "unmute Dorn").await;
    assert_eq!(result.outcome, DispatchOutcome::HandlerFailed);
    assert_eq!(result.replies, vec!["Dorn is not muted.".to_string()]);
}

#[tokio::test]
async fn warnings_accumulate_then_proc_into_a_mute() {
    let h = harness();
    for round in 1..=2u32 {
        let result = h
            .dispatcher
            .dispatch(gm_session(), "warn Dorn language")
            .await;
        assert_eq!(result.outcome, DispatchOutcome::Success);
        assert_eq!(result.replies, vec!["Dorn warned: language".to_string()]);
        assert_eq!(h.world.warning_count(AccountId(40)), round);
        assert!(h.world.mute_state(AccountId(40)).is_none());
    }

    // Third warning reaches the default threshold: the counter procs,
    // resets to absent, and the account is muted.
    let result = h.dispatcher.dispatch(gm_session(), "warn Dorn language").await;
    assert_eq!(result.outcome, DispatchOutcome::Success);
    assert_eq!(
        result.replies,
        vec!["Dorn reached 3 warnings and was muted for 30 min".to_string()]
    );
    assert_eq!(h.world.warning_count(AccountId(40)), 0);
    let mute = h.world.mute_state(AccountId(40)).expect("auto-mute");
    assert_eq!(mute.reason, "3 warnings accumulated");
}

#[tokio::test]
async fn warn_threshold_follows_policy() {
    let h = harness_with(Policy {
        warn_threshold: 1,
        warn_mute_minutes: 5,
        ..Policy::default()
    });
    let result = h.dispatcher.dispatch(gm_session(), "warn Dorn once").await;
    assert_eq!(result.outcome, DispatchOutcome::Success);
    assert_eq!(
        result.replies,
        vec!["Dorn reached 1 warnings and was muted for 5 min".to_string()]
    );
    assert!(h.world.mute_state(AccountId(40)).is_some());
}

#[tokio::test]
async fn self_target_policy_controls_strict_actions_on_self() {
    // Default: acting on yourself passes even the strict comparison.
    let h = harness();
    let result = h.dispatcher.dispatch(gm_session(), "mute Astra 5 testing").await;
    assert_eq!(result.outcome, DispatchOutcome::Success);

    // Policy flipped: self-targeting is denied like any peer action.
    let h = harness_with(Policy {
        self_action_allowed: false,
        ..Policy::default()
    });
    let result = h.dispatcher.dispatch(gm_session(), "mute Astra 5 testing").await;
    assert_eq!(result.outcome, DispatchOutcome::HandlerFailed);
    assert!(h.world.mute_state(AccountId(10)).is_none());
}

#[tokio::test]
async fn pinfo_summarizes_online_and_offline_players() {
    let h = harness();
    let result = h.dispatcher.dispatch(gm_session(), "pinfo Dorn").await;
    assert_eq!(result.outcome, DispatchOutcome::Success);
    assert!(result.replies[0].contains("online"));
    assert!(result.replies[0].contains("account 40"));

    let result = h.dispatcher.dispatch(gm_session(), "pinfo Eira").await;
    assert_eq!(result.outcome, DispatchOutcome::Success);
    assert!(result.replies[0].contains("offline"));

    h.dispatcher.dispatch(gm_session(), "mute Eira 5 spam").await;
    let result = h.dispatcher.dispatch(gm_session(), "pinfo Eira").await;
    assert_eq!(result.replies.len(), 2);
    assert!(result.replies[1].contains("Muted until"));
}

#[tokio::test]
async fn pinfo_defaults_to_the_operator_itself() {
    let h = harness();
    let result = h.dispatcher.dispatch(gm_session(), "pinfo").await;
    assert_eq!(result.outcome, DispatchOutcome::Success);
    assert!(result.replies[0].starts_with("Astra"));
}

#[tokio::test]
async fn revive_applies_only_to_dead_online_players() {
    let h = harness();
    h.world.kill_player(400);
    assert!(!h.world.is_alive(400));
    let result = h.dispatcher.dispatch(gm_session(), "revive Dorn").await;
    assert_eq!(result.outcome, DispatchOutcome::Success);
    assert!(h.world.is_alive(400));

    let result = h.dispatcher.dispatch(gm_session(), "revive Dorn").await;
    assert_eq!(result.outcome, DispatchOutcome::HandlerFailed);
    assert_eq!(
        result.replies,
        vec!["Dorn does not need reviving.".to_string()]
    );
}
