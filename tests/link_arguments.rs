//! Link-token arguments driven through real dispatch: pasted client links,
//! bare ids, bad tokens, and packed-identifier decoding.

mod common;

use common::{gm_session, harness};
use gmshell::gm::context::CommandSource;
use gmshell::DispatchOutcome;

#[tokio::test]
async fn additem_accepts_a_bare_id() {
    let h = harness();
    let result = h.dispatcher.dispatch(gm_session(), "additem 17 3").await;
    assert_eq!(result.outcome, DispatchOutcome::Success);
    assert_eq!(result.replies, vec!["Added 3x item 17 to Astra".to_string()]);
    assert_eq!(h.world.item_count(100, 17), 3);
}

#[tokio::test]
async fn additem_accepts_a_pasted_client_link() {
    let h = harness();
    let line = "additem |cff9d9d9d|Hitem:117:0:0:0|h[Tough Jerky]|h|r";
    let result = h.dispatcher.dispatch(gm_session(), line).await;
    assert_eq!(result.outcome, DispatchOutcome::Success);
    assert_eq!(h.world.item_count(100, 117), 1);
}

#[tokio::test]
async fn additem_rejects_malformed_tokens_without_granting() {
    let h = harness();
    for line in [
        "additem Hitem:",
        "additem Hspell:8326",
        "additem chicken",
        "additem 4294967296",
    ] {
        let result = h.dispatcher.dispatch(gm_session(), line).await;
        assert_eq!(result.outcome, DispatchOutcome::HandlerFailed, "line: {line}");
        assert!(
            result.replies[0].starts_with("Bad argument"),
            "line: {line}"
        );
    }
    assert_eq!(h.world.item_count(100, 17), 0);
    assert_eq!(h.world.item_count(100, 117), 0);
}

#[tokio::test]
async fn additem_validates_the_template() {
    let h = harness();
    let result = h.dispatcher.dispatch(gm_session(), "additem 999").await;
    assert_eq!(result.outcome, DispatchOutcome::HandlerFailed);
    assert_eq!(result.replies, vec!["invalid item id 999.".to_string()]);
}

#[tokio::test]
async fn additemset_grants_every_member() {
    let h = harness();
    let result = h.dispatcher.dispatch(gm_session(), "additemset 1").await;
    assert_eq!(result.outcome, DispatchOutcome::Success);
    assert_eq!(
        result.replies,
        vec!["Added 2 items from set 1 to Astra".to_string()]
    );
    assert_eq!(h.world.item_count(100, 17), 1);
    assert_eq!(h.world.item_count(100, 117), 1);
}

#[tokio::test]
async fn additemset_rejects_unknown_sets() {
    let h = harness();
    let result = h.dispatcher.dispatch(gm_session(), "additemset 99").await;
    assert_eq!(result.outcome, DispatchOutcome::HandlerFailed);
    assert_eq!(
        result.replies,
        vec!["item set 99 is empty or unknown.".to_string()]
    );
}

#[tokio::test]
async fn setskill_updates_a_known_skill_via_link_or_id() {
    let h = harness();
    h.world.learn_skill(100, 186, 1, 75);
    let result = h
        .dispatcher
        .dispatch(gm_session(), "setskill |Hskill:186|h[Mining]|h|r 150 225")
        .await;
    assert_eq!(result.outcome, DispatchOutcome::Success);
    assert_eq!(h.world.skill_of(100, 186), Some((150, 225)));

    // Max defaults to the value.
    let result = h.dispatcher.dispatch(gm_session(), "setskill 186 60").await;
    assert_eq!(result.outcome, DispatchOutcome::Success);
    assert_eq!(h.world.skill_of(100, 186), Some((60, 60)));
}

#[tokio::test]
async fn setskill_rejects_unknown_and_unlearned_skills() {
    let h = harness();
    let result = h.dispatcher.dispatch(gm_session(), "setskill 355 10").await;
    assert_eq!(result.outcome, DispatchOutcome::HandlerFailed);
    assert_eq!(result.replies, vec!["invalid skill id 355.".to_string()]);

    // Known template, but Astra never learned it.
    let result = h.dispatcher.dispatch(gm_session(), "setskill 186 10").await;
    assert_eq!(result.outcome, DispatchOutcome::HandlerFailed);
    assert_eq!(
        result.replies,
        vec!["Astra does not know skill 186.".to_string()]
    );
}

#[tokio::test]
async fn cooldown_clears_one_spell_or_all() {
    let h = harness();
    h.world.set_cooldown(100, 8326);
    let result = h
        .dispatcher
        .dispatch(gm_session(), "cooldown Hspell:8326")
        .await;
    assert_eq!(result.outcome, DispatchOutcome::Success);
    assert_eq!(h.world.cooldown_count(100), 0);

    h.world.set_cooldown(100, 8326);
    let result = h.dispatcher.dispatch(gm_session(), "cooldown").await;
    assert_eq!(result.outcome, DispatchOutcome::Success);
    assert_eq!(result.replies, vec!["All cooldowns cleared for Astra".to_string()]);
    assert_eq!(h.world.cooldown_count(100), 0);
}

#[tokio::test]
async fn guid_decodes_packed_identifiers_by_tag() {
    let h = harness();
    // Creature 9001 under the creature high tag.
    let result = h
        .dispatcher
        .dispatch(CommandSource::Console, "guid 0xF130000000002329")
        .await;
    assert_eq!(result.outcome, DispatchOutcome::Success);
    assert!(result.replies[0].contains("creature 9001"));
    assert!(result.replies[0].contains("Plains Rat"));

    // Bare low value decodes as a player; Eira is persisted but offline.
    let result = h
        .dispatcher
        .dispatch(CommandSource::Console, "guid 500")
        .await;
    assert_eq!(result.outcome, DispatchOutcome::Success);
    assert!(result.replies[0].contains("persisted but not live"));
}

#[tokio::test]
async fn guid_rejects_unmapped_tags() {
    let h = harness();
    let result = h
        .dispatcher
        .dispatch(CommandSource::Console, "guid 0xF140000000000001")
        .await;
    assert_eq!(result.outcome, DispatchOutcome::HandlerFailed);
    assert!(result.replies[0].starts_with("Bad argument"));
}
