mod common;

use common::{fixture, remedy_input, seed_remedy, USER};
use strandly_lib::db::{models::day_plans_from_parallel, DayPlan};

#[tokio::test]
async fn created_remedy_round_trips_with_day_plans() {
    let fx = fixture();
    let created = seed_remedy(&fx.state, 3).await;

    assert!(created.id.starts_with("rm_"));
    assert_eq!(created.total_days, 3);
    assert_eq!(created.ingredients, vec!["rosemary oil", "aloe vera"]);

    let loaded = fx.state.db.get_remedy(&created.id).await.unwrap().unwrap();
    assert_eq!(loaded, created);

    let day_one = loaded.day_plan(1).unwrap();
    assert_eq!(day_one.tasks, vec!["Rosemary Growth task for day 1"]);
    assert_eq!(day_one.instruction_for(0), Some("do it gently on day 1"));
    assert!(loaded.day_plan(0).is_none());
    assert!(loaded.day_plan(4).is_none());
}

#[tokio::test]
async fn parallel_arrays_keep_day_numbers_one_based() {
    let fx = fixture();
    let mut input = remedy_input("Aloe Soothe", "moisture", 2);
    input.days = day_plans_from_parallel(
        vec![vec!["apply aloe".into()], vec!["rinse".into(), "seal".into()]],
        vec![vec!["leave 20 minutes".into()], vec![]],
    );

    let remedy = fx.state.db.create_remedy(input).await.unwrap();
    assert_eq!(remedy.day_plan(1).unwrap().tasks, vec!["apply aloe"]);
    assert_eq!(
        remedy.day_plan(2),
        Some(&DayPlan {
            tasks: vec!["rinse".into(), "seal".into()],
            instructions: vec![],
        })
    );
}

#[tokio::test]
async fn rejects_invalid_remedies() {
    let fx = fixture();

    let mut blank = remedy_input("x", "growth", 2);
    blank.title = "   ".into();
    assert!(fx.state.db.create_remedy(blank).await.is_err());

    let zero_days = remedy_input("Zero", "growth", 0);
    assert!(fx.state.db.create_remedy(zero_days).await.is_err());

    let mut overflowing = remedy_input("Overflow", "growth", 2);
    overflowing.days.insert(3, DayPlan::default());
    let err = fx.state.db.create_remedy(overflowing).await.unwrap_err();
    assert!(err.to_string().contains("day 3"));

    assert!(fx.state.db.list_remedies().await.unwrap().is_empty());
}

#[tokio::test]
async fn lists_by_category() {
    let fx = fixture();
    let db = &fx.state.db;
    db.create_remedy(remedy_input("Rosemary", "growth", 14))
        .await
        .unwrap();
    db.create_remedy(remedy_input("Aloe", "moisture", 7))
        .await
        .unwrap();
    db.create_remedy(remedy_input("Onion", "growth", 21))
        .await
        .unwrap();

    assert_eq!(db.list_remedies().await.unwrap().len(), 3);

    let mut growth: Vec<_> = db
        .list_remedies_by_category("growth")
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.title)
        .collect();
    growth.sort();
    assert_eq!(growth, vec!["Onion", "Rosemary"]);
    assert!(db
        .list_remedies_by_category("styling")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn favorites_are_idempotent_per_user() {
    let fx = fixture();
    let db = &fx.state.db;
    let remedy = seed_remedy(&fx.state, 5).await;

    assert!(!db.is_favorite(USER, &remedy.id).await.unwrap());

    let first = db.add_favorite(USER, &remedy.id).await.unwrap();
    let second = db.add_favorite(USER, &remedy.id).await.unwrap();
    assert_eq!(first, second);
    assert!(db.is_favorite(USER, &remedy.id).await.unwrap());
    assert!(!db.is_favorite("someone_else", &remedy.id).await.unwrap());

    let favorites = db.list_favorites(USER).await.unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].id, remedy.id);

    db.remove_favorite(USER, &remedy.id).await.unwrap();
    db.remove_favorite(USER, &remedy.id).await.unwrap();
    assert!(!db.is_favorite(USER, &remedy.id).await.unwrap());
    assert!(db.list_favorites(USER).await.unwrap().is_empty());
}

#[tokio::test]
async fn favoriting_unknown_remedy_fails() {
    let fx = fixture();
    let err = fx
        .state
        .db
        .add_favorite(USER, "rm_missing")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}
