mod common;

use chrono::Duration;
use common::{fixture, remedy_input, seed_remedy, USER};
use strandly_lib::{
    catalog::commands as catalog,
    challenges::commands::{self as challenges, CommandError, ErrorKind},
    settings::ChallengeSettings,
};

#[tokio::test]
async fn challenge_errors_keep_their_kind() {
    let fx = fixture();
    let state = &fx.state;
    let remedy = seed_remedy(state, 14).await;

    let err = challenges::complete_challenge_day(state, USER.into(), remedy.id.clone(), 1)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotJoined);

    challenges::join_challenge(state, USER.into(), remedy.id.clone())
        .await
        .unwrap();

    let err = challenges::complete_challenge_day(state, USER.into(), remedy.id.clone(), 3)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::OutOfSequence);
    assert_eq!(err.hours_remaining, None);

    for day in 1..=2 {
        challenges::complete_challenge_day(state, USER.into(), remedy.id.clone(), day)
            .await
            .unwrap();
    }
    fx.clock.advance(Duration::hours(10) + Duration::minutes(30));

    let err = challenges::complete_challenge_day(state, USER.into(), remedy.id.clone(), 3)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        CommandError {
            kind: ErrorKind::CooldownActive,
            message: "cooldown active: wait 2 more hours".into(),
            hours_remaining: Some(2),
        }
    );
}

#[tokio::test]
async fn command_errors_serialize_for_the_frontend() {
    let fx = fixture();
    challenges::join_challenge(&fx.state, USER.into(), "rm_x".into())
        .await
        .unwrap();
    let err = challenges::complete_challenge_day(&fx.state, USER.into(), "rm_x".into(), 0)
        .await
        .unwrap_err();

    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["kind"], "invalidInput");
    assert!(json.get("hoursRemaining").is_none());

    let cooldown = CommandError {
        kind: ErrorKind::CooldownActive,
        message: "wait".into(),
        hours_remaining: Some(3),
    };
    let json = serde_json::to_value(&cooldown).unwrap();
    assert_eq!(json["kind"], "cooldownActive");
    assert_eq!(json["hoursRemaining"], 3);
}

#[tokio::test]
async fn progress_serializes_in_camel_case() {
    let fx = fixture();
    let progress = challenges::join_challenge(&fx.state, USER.into(), "rm_x".into())
        .await
        .unwrap();

    let json = serde_json::to_value(&progress).unwrap();
    assert_eq!(json["currentDay"], 1);
    assert_eq!(json["completedDays"], serde_json::json!([]));
    assert_eq!(json["batchCount"], 0);
    assert!(json["batchStartTime"].is_null());
}

#[tokio::test]
async fn settings_change_applies_to_running_engine() {
    let fx = fixture();
    let state = &fx.state;

    assert_eq!(
        challenges::get_challenge_settings(state),
        ChallengeSettings::default()
    );

    let err = challenges::set_challenge_settings(
        state,
        ChallengeSettings {
            max_per_batch: 0,
            window_hours: 12,
        },
    )
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);

    challenges::set_challenge_settings(
        state,
        ChallengeSettings {
            max_per_batch: 1,
            window_hours: 6,
        },
    )
    .unwrap();

    challenges::join_challenge(state, USER.into(), "rm_x".into())
        .await
        .unwrap();
    challenges::complete_challenge_day(state, USER.into(), "rm_x".into(), 1)
        .await
        .unwrap();
    let err = challenges::complete_challenge_day(state, USER.into(), "rm_x".into(), 2)
        .await
        .unwrap_err();
    assert_eq!(err.hours_remaining, Some(6));
}

#[tokio::test]
async fn catalog_commands_validate_input() {
    let fx = fixture();
    let state = &fx.state;

    let err = catalog::create_remedy(state, remedy_input("Bad", "growth", 0))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);

    let remedy = catalog::create_remedy(state, remedy_input("Good", "growth", 3))
        .await
        .unwrap();

    let plan = catalog::get_day_plan(state, remedy.id.clone(), 3)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(plan.tasks, vec!["Good task for day 3"]);
    assert!(catalog::get_day_plan(state, remedy.id.clone(), 4)
        .await
        .unwrap()
        .is_none());
    let err = catalog::get_day_plan(state, remedy.id.clone(), 0)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);

    catalog::add_to_favorites(state, USER.into(), remedy.id.clone())
        .await
        .unwrap();
    assert!(catalog::is_favorite(state, USER.into(), remedy.id.clone())
        .await
        .unwrap());
    let favorites = catalog::get_user_favorites(state, USER.into()).await.unwrap();
    assert_eq!(favorites[0].title, "Good");
    catalog::remove_from_favorites(state, USER.into(), remedy.id.clone())
        .await
        .unwrap();

    let by_category = catalog::get_remedies_by_category(state, "growth".into())
        .await
        .unwrap();
    assert_eq!(by_category.len(), 1);
    assert_eq!(catalog::get_remedies(state).await.unwrap().len(), 1);
    assert!(catalog::get_remedy(state, "rm_missing".into())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn overview_and_listing_commands() {
    let fx = fixture();
    let state = &fx.state;
    let remedy = seed_remedy(state, 1).await;

    assert!(
        challenges::get_challenge_progress(state, USER.into(), remedy.id.clone())
            .await
            .unwrap()
            .is_none()
    );
    challenges::join_challenge(state, USER.into(), remedy.id.clone())
        .await
        .unwrap();
    challenges::complete_challenge_day(state, USER.into(), remedy.id.clone(), 1)
        .await
        .unwrap();

    let overview = challenges::get_challenge_overview(state, USER.into(), remedy.id.clone())
        .await
        .unwrap();
    assert!(overview.finished);

    let mine = challenges::list_user_challenges(state, USER.into())
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
}

#[tokio::test]
async fn reloaded_settings_reach_the_engine() {
    let fx = fixture();
    let state = &fx.state;
    let path = fx.data_dir().join(strandly_lib::SETTINGS_FILE);

    std::fs::write(&path, r#"{"challenge":{"maxPerBatch":0,"windowHours":0}}"#).unwrap();
    let err = challenges::reload_challenge_settings(state).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Internal);
    assert_eq!(
        challenges::get_challenge_settings(state),
        ChallengeSettings::default()
    );
    assert_eq!(
        state.challenges.policy(),
        ChallengeSettings::default().policy()
    );

    std::fs::write(&path, r#"{"challenge":{"maxPerBatch":1,"windowHours":3}}"#).unwrap();
    let reloaded = challenges::reload_challenge_settings(state).unwrap();
    assert_eq!(
        reloaded,
        ChallengeSettings {
            max_per_batch: 1,
            window_hours: 3,
        }
    );

    challenges::join_challenge(state, USER.into(), "rm_x".into())
        .await
        .unwrap();
    challenges::complete_challenge_day(state, USER.into(), "rm_x".into(), 1)
        .await
        .unwrap();
    let err = challenges::complete_challenge_day(state, USER.into(), "rm_x".into(), 2)
        .await
        .unwrap_err();
    assert_eq!(err.hours_remaining, Some(3));
}
