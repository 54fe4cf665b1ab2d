mod common;

use green_server::{AppError, EntityKind};
use shared::models::{PromotionCreate, PromotionUpdate, QuestCreate};

fn quest(title: &str, start_at: i64, end_at: i64) -> QuestCreate {
    QuestCreate {
        title: title.into(),
        description: Some(format!("{title} quest")),
        points: 50,
        start_at,
        end_at,
    }
}

fn promo(code: &str, product_ids: Vec<i64>) -> PromotionCreate {
    PromotionCreate {
        promocode: code.into(),
        promo_value: 10.0,
        url: None,
        valid_from: None,
        valid_until: None,
        product_ids,
    }
}

#[tokio::test]
async fn test_quest_status_at_creation_and_refresh() {
    let state = common::state().await;
    let quests = &state.quests;

    let running = quests.add_quest_at(quest("Walk", 100, 200), 150).await.unwrap();
    let upcoming = quests.add_quest_at(quest("Cycle", 300, 400), 150).await.unwrap();
    assert!(running.is_active);
    assert!(!upcoming.is_active);

    assert_eq!(quests.get_active_quests().await.unwrap().len(), 1);
    assert_eq!(quests.get_inactive_quests().await.unwrap().len(), 1);

    // At 300 the first has ended and the second started
    assert_eq!(quests.refresh_all_at(300).await.unwrap(), 2);
    assert_eq!(quests.refresh_all_at(300).await.unwrap(), 0);
    assert!(!quests.get_quest(running.id).await.unwrap().is_active);

    let refreshed = quests.refresh_quest_at(upcoming.id, 400).await.unwrap();
    assert!(!refreshed.is_active);
}

#[tokio::test]
async fn test_quest_rejections() {
    let state = common::state().await;
    let quests = &state.quests;
    let created = quests.add_quest_at(quest("Walk", 100, 200), 0).await.unwrap();

    let err = quests.add_quest_at(quest("Walk", 500, 600), 0).await.unwrap_err();
    assert!(matches!(err, AppError::AlreadyExists(EntityKind::Quest)));

    let err = quests.add_quest_at(quest("Swim", 200, 200), 0).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    quests.delete_quest(created.id).await.unwrap();
    let err = quests.get_quest(created.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(EntityKind::Quest)));
    assert!(quests.get_all_quests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_promotion_lifecycle() {
    let state = common::state().await;
    common::merchant(&state, "cafe").await;
    let cat = common::category(&state, "Menu").await;
    let coffee = common::product(&state, "cafe", cat, "Coffee", 2.5).await;
    let cake = common::product(&state, "cafe", cat, "Cake", 3.0).await;
    let promotions = &state.promotions;

    let created = promotions
        .create_promotion("cafe", promo("GREEN10", vec![coffee.id]))
        .await
        .unwrap();
    assert_eq!(created.product_ids, [coffee.id]);
    assert!(created.is_active);

    let by_code = promotions.get_promotion_by_promocode("GREEN10").await.unwrap();
    assert_eq!(by_code.promotion.id, created.promotion.id);

    let updated = promotions
        .update_promotion(
            created.promotion.id,
            PromotionUpdate {
                promo_value: Some(15.0),
                valid_until: Some(1),
                product_ids: Some(vec![coffee.id, cake.id]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.promotion.promo_value, 15.0);
    assert_eq!(updated.product_ids, [coffee.id, cake.id]);
    assert!(!updated.is_active);

    assert_eq!(promotions.get_promotions_by_merchant("cafe").await.unwrap().len(), 1);
    assert_eq!(promotions.get_all_promotions().await.unwrap().len(), 1);

    // Product deletion drops the link
    state.catalog.delete_product(cake.id).await.unwrap();
    let reloaded = promotions.get_promotion(created.promotion.id).await.unwrap();
    assert_eq!(reloaded.product_ids, [coffee.id]);

    promotions.delete_promotion(created.promotion.id).await.unwrap();
    let err = promotions.get_promotion(created.promotion.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(EntityKind::Promotion)));
}

#[tokio::test]
async fn test_promotion_fields_can_be_cleared() {
    let state = common::state().await;
    common::merchant(&state, "cafe").await;
    let promotions = &state.promotions;

    let created = promotions
        .create_promotion(
            "cafe",
            PromotionCreate {
                url: Some("https://cafe.example.com/green".into()),
                valid_from: Some(100),
                valid_until: Some(200),
                ..promo("WINDOW", vec![])
            },
        )
        .await
        .unwrap();
    assert!(!created.is_active);
    let id = created.promotion.id;

    // Plain updates keep the stored values
    let kept = promotions
        .update_promotion(
            id,
            PromotionUpdate {
                promo_value: Some(12.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(kept.promotion.valid_until, Some(200));
    assert!(kept.promotion.url.is_some());

    let cleared = promotions
        .update_promotion(
            id,
            PromotionUpdate {
                clear_url: true,
                clear_window: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.promotion.url, None);
    assert_eq!(cleared.promotion.valid_from, None);
    assert_eq!(cleared.promotion.valid_until, None);
    assert!(cleared.is_active);

    // A supplied bound wins over the clear flag
    let reopened = promotions
        .update_promotion(
            id,
            PromotionUpdate {
                valid_until: Some(1),
                clear_window: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(reopened.promotion.valid_from, None);
    assert_eq!(reopened.promotion.valid_until, Some(1));
    assert!(!reopened.is_active);
}

#[tokio::test]
async fn test_promotion_rejections() {
    let state = common::state().await;
    common::merchant(&state, "cafe").await;
    common::merchant(&state, "teahouse").await;
    let cat = common::category(&state, "Menu").await;
    let tea = common::product(&state, "teahouse", cat, "Tea", 1.0).await;
    let promotions = &state.promotions;

    promotions.create_promotion("cafe", promo("SAVE5", vec![])).await.unwrap();

    let err = promotions
        .create_promotion("cafe", promo("SAVE5", vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyExists(EntityKind::Promotion)));

    // Another merchant's product
    let err = promotions
        .create_promotion("cafe", promo("TEA", vec![tea.id]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(EntityKind::Product)));

    let err = promotions
        .create_promotion(
            "cafe",
            PromotionCreate {
                promo_value: 0.0,
                ..promo("FREE", vec![])
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = promotions
        .create_promotion("nobody", promo("X", vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(EntityKind::Merchant)));

    assert_eq!(promotions.get_all_promotions().await.unwrap().len(), 1);
}
