mod common;

use rust_decimal_macros::dec;

use cardledger_core::cards::{CardError, CardService, CardServiceTrait, CardStatus};

#[tokio::test]
async fn test_full_lifecycle_with_side_effects() {
    let db = common::setup_db();
    let account = common::seed_account(&db.pool, dec!(1000), dec!(1000));
    let card = common::seed_card(&db.pool, &account.account_id, common::future_expiry());
    let service = CardService::new(db.pool.clone());

    assert_eq!(card.status, CardStatus::Inactive);
    assert!(card.activated_at.is_none());

    let card = service
        .update_status(&card.card_id, CardStatus::Active, "issuer")
        .await
        .unwrap();
    assert_eq!(card.status, CardStatus::Active);
    assert!(card.activated_at.is_some());
    assert!(card.blocked_at.is_none());
    assert_eq!(card.updated_by.as_deref(), Some("issuer"));

    let card = service
        .update_status(&card.card_id, CardStatus::Blocked, "fraud-desk")
        .await
        .unwrap();
    assert_eq!(card.status, CardStatus::Blocked);
    assert!(card.blocked_at.is_some());
    assert_eq!(card.updated_by.as_deref(), Some("fraud-desk"));

    // Reinstatement clears the blocked timestamp.
    let card = service
        .update_status(&card.card_id, CardStatus::Active, "support")
        .await
        .unwrap();
    assert_eq!(card.status, CardStatus::Active);
    assert!(card.blocked_at.is_none());
    assert!(card.activated_at.is_some());
}

#[tokio::test]
async fn test_every_illegal_transition_is_rejected() {
    let db = common::setup_db();
    let account = common::seed_account(&db.pool, dec!(1000), dec!(1000));
    let service = CardService::new(db.pool.clone());

    // (starting status, illegal targets) for every reachable state.
    let cases: Vec<(CardStatus, Vec<CardStatus>)> = vec![
        (
            CardStatus::Inactive,
            vec![CardStatus::Inactive, CardStatus::Blocked, CardStatus::Expired],
        ),
        (
            CardStatus::Active,
            vec![CardStatus::Inactive, CardStatus::Active, CardStatus::Expired],
        ),
        (
            CardStatus::Blocked,
            vec![CardStatus::Inactive, CardStatus::Blocked, CardStatus::Expired],
        ),
    ];

    for (start, targets) in cases {
        for target in targets {
            let card = common::seed_card(&db.pool, &account.account_id, common::future_expiry());
            match start {
                CardStatus::Inactive => {}
                CardStatus::Active => {
                    service
                        .update_status(&card.card_id, CardStatus::Active, "setup")
                        .await
                        .unwrap();
                }
                CardStatus::Blocked => {
                    service
                        .update_status(&card.card_id, CardStatus::Active, "setup")
                        .await
                        .unwrap();
                    service
                        .update_status(&card.card_id, CardStatus::Blocked, "setup")
                        .await
                        .unwrap();
                }
                CardStatus::Expired => unreachable!(),
            }

            let err = service
                .update_status(&card.card_id, target, "tester")
                .await
                .unwrap_err();
            assert!(
                matches!(err, CardError::InvalidTransition { .. }),
                "{:?} -> {:?} should be an invalid transition",
                start,
                target
            );
        }
    }
}

#[tokio::test]
async fn test_expired_card_accepts_no_transitions() {
    let db = common::setup_db();
    let account = common::seed_account(&db.pool, dec!(1000), dec!(1000));
    let service = CardService::new(db.pool.clone());

    // Activate a card whose expiry date has already passed; its effective
    // status becomes expired without any recorded transition.
    let card = common::seed_active_card(&db.pool, &account.account_id, common::past_expiry());
    let card = service.get_card(&card.card_id).unwrap();
    assert_eq!(
        card.effective_status(chrono::Utc::now().date_naive()),
        CardStatus::Expired
    );

    for target in [CardStatus::Blocked, CardStatus::Active, CardStatus::Inactive] {
        let err = service
            .update_status(&card.card_id, target, "tester")
            .await
            .unwrap_err();
        assert!(matches!(err, CardError::InvalidTransition { .. }));
    }
}

#[tokio::test]
async fn test_list_cards_in_creation_order_excluding_deleted() {
    let db = common::setup_db();
    let account = common::seed_account(&db.pool, dec!(1000), dec!(1000));
    let service = CardService::new(db.pool.clone());

    let first = common::seed_card(&db.pool, &account.account_id, common::future_expiry());
    let second = common::seed_card(&db.pool, &account.account_id, common::future_expiry());
    let third = common::seed_card(&db.pool, &account.account_id, common::future_expiry());

    service.delete_card(&second.card_id, "admin").await.unwrap();

    let cards = service.list_cards_for_account(&account.account_id).unwrap();
    let ids: Vec<&str> = cards.iter().map(|c| c.card_id.as_str()).collect();
    assert_eq!(ids, vec![first.card_id.as_str(), third.card_id.as_str()]);
}

#[tokio::test]
async fn test_get_card_not_found() {
    let db = common::setup_db();
    let service = CardService::new(db.pool.clone());

    assert!(matches!(
        service.get_card("missing"),
        Err(CardError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_domain_model_never_exposes_pan_token() {
    let db = common::setup_db();
    let account = common::seed_account(&db.pool, dec!(1000), dec!(1000));
    let card = common::seed_card(&db.pool, &account.account_id, common::future_expiry());

    let json = serde_json::to_value(&card).unwrap();
    assert!(json.get("panToken").is_none());
    assert_eq!(json["panLast4"], "4242");
}
