mod common;

use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use common::TestDb;
use retail_tracker::{
    entities::{payment, PaymentMethod},
    errors::ServiceError,
    repositories::{NewPayment, NewProduct, NewReturn, NewSale, NewSeller},
};
use rstest::rstest;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, Set};

#[tokio::test]
async fn product_round_trip_keeps_price_and_stock() {
    let t = TestDb::new().await;

    let created = t
        .repos
        .products
        .create(NewProduct {
            name: "Aceite 900ml".into(),
            price: dec!(12.50),
            stock: Some(30),
        })
        .await
        .unwrap();

    let found = t
        .repos
        .products
        .find_by_id(created.id)
        .await
        .unwrap()
        .expect("product should exist");
    assert_eq!(found.name, "Aceite 900ml");
    assert_eq!(found.price, dec!(12.50));
    assert_eq!(found.stock, 30);
}

#[tokio::test]
async fn product_stock_falls_back_to_zero() {
    let t = TestDb::new().await;

    let product = t.product("Fideos", dec!(2.30)).await;
    assert_eq!(product.stock, 0);

    let reloaded = t.repos.products.find_by_id(product.id).await.unwrap().unwrap();
    assert_eq!(reloaded.stock, 0);
}

#[tokio::test]
async fn ids_are_assigned_by_the_store() {
    let t = TestDb::new().await;

    let first = t.seller("Ana").await;
    let second = t.seller("Bruno").await;
    assert!(first.id > 0);
    assert!(second.id > first.id);
}

#[tokio::test]
async fn missing_rows_are_none() {
    let t = TestDb::new().await;

    assert!(t.repos.products.find_by_id(404).await.unwrap().is_none());
    assert!(t.repos.sellers.find_by_id(404).await.unwrap().is_none());
    assert!(t.repos.sales.find_by_id(404).await.unwrap().is_none());
    assert!(t.repos.returns.find_by_id(404).await.unwrap().is_none());
    assert!(t.repos.payments.find_by_id(404).await.unwrap().is_none());
    assert!(t.repos.sales.find_with_returns(404).await.unwrap().is_none());
}

#[tokio::test]
async fn listing_is_paginated_and_counted() {
    let t = TestDb::new().await;
    for name in ["Ana", "Bruno", "Carla", "Dario", "Eva"] {
        t.seller(name).await;
    }

    let (first_page, total) = t.repos.sellers.find_all(1, 2).await.unwrap();
    assert_eq!(total, 5);
    assert_eq!(
        first_page.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
        vec!["Ana", "Bruno"]
    );

    let (last_page, _) = t.repos.sellers.find_all(3, 2).await.unwrap();
    assert_eq!(last_page.len(), 1);
    assert_eq!(last_page[0].name, "Eva");

    assert_matches!(
        t.repos.sellers.find_all(0, 2).await,
        Err(ServiceError::InvalidInput(_))
    );
    assert_matches!(
        t.repos.products.find_all(1, 0).await,
        Err(ServiceError::InvalidInput(_))
    );
}

#[tokio::test]
async fn sale_requires_existing_seller() {
    let t = TestDb::new().await;
    let product = t.product("Yerba 1kg", dec!(4.75)).await;

    let result = t
        .repos
        .sales
        .create(NewSale {
            seller_id: 77,
            product_id: product.id,
            quantity: 1,
            total: dec!(4.75),
            created_at: None,
        })
        .await;
    assert_matches!(result, Err(ServiceError::ForeignKeyViolation(_)));

    let (sales, total) = t.repos.sales.find_all(1, 10).await.unwrap();
    assert!(sales.is_empty());
    assert_eq!(total, 0);
}

#[tokio::test]
async fn sale_requires_existing_product() {
    let t = TestDb::new().await;
    let seller = t.seller("Ana").await;

    let result = t
        .repos
        .sales
        .create(NewSale {
            seller_id: seller.id,
            product_id: 77,
            quantity: 1,
            total: dec!(4.75),
            created_at: None,
        })
        .await;
    assert_matches!(result, Err(ServiceError::ForeignKeyViolation(_)));
}

#[tokio::test]
async fn sale_does_not_touch_stock() {
    let t = TestDb::new().await;
    let seller = t.seller("Ana").await;
    let product = t
        .repos
        .products
        .create(NewProduct {
            name: "Yerba 1kg".into(),
            price: dec!(4.75),
            stock: Some(10),
        })
        .await
        .unwrap();

    let sale = t.sale(seller.id, product.id, 3).await;
    t.repos
        .returns
        .create(NewReturn {
            sale_id: sale.id,
            quantity: 1,
            created_at: None,
        })
        .await
        .unwrap();

    let reloaded = t.repos.products.find_by_id(product.id).await.unwrap().unwrap();
    assert_eq!(reloaded.stock, 10);
}

#[tokio::test]
async fn sale_is_stamped_with_insert_time() {
    let t = TestDb::new().await;
    let seller = t.seller("Ana").await;
    let product = t.product("Yerba 1kg", dec!(4.75)).await;

    let before = Utc::now();
    let sale = t.sale(seller.id, product.id, 2).await;
    let after = Utc::now();

    assert!(sale.created_at >= before && sale.created_at <= after);
    assert_eq!(sale.total, dec!(20.00));
}

#[tokio::test]
async fn explicit_timestamp_is_kept() {
    let t = TestDb::new().await;
    let seller = t.seller("Ana").await;
    let product = t.product("Yerba 1kg", dec!(4.75)).await;
    let stamp = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();

    let sale = t
        .repos
        .sales
        .create(NewSale {
            seller_id: seller.id,
            product_id: product.id,
            quantity: 1,
            total: dec!(4.75),
            created_at: Some(stamp),
        })
        .await
        .unwrap();
    assert_eq!(sale.created_at, stamp);

    let reloaded = t.repos.sales.find_by_id(sale.id).await.unwrap().unwrap();
    assert_eq!(reloaded.created_at, stamp);
}

#[tokio::test]
async fn sales_are_filtered_by_seller_and_product() {
    let t = TestDb::new().await;
    let ana = t.seller("Ana").await;
    let bruno = t.seller("Bruno").await;
    let yerba = t.product("Yerba 1kg", dec!(4.75)).await;
    let cafe = t.product("Cafe 500g", dec!(9.10)).await;

    t.sale(ana.id, yerba.id, 1).await;
    t.sale(ana.id, cafe.id, 2).await;
    t.sale(bruno.id, yerba.id, 3).await;

    let by_ana = t.repos.sales.find_by_seller(ana.id).await.unwrap();
    assert_eq!(by_ana.len(), 2);
    assert!(by_ana.iter().all(|s| s.seller_id == ana.id));

    let of_yerba = t.repos.sales.find_by_product(yerba.id).await.unwrap();
    assert_eq!(
        of_yerba.iter().map(|s| s.quantity).collect::<Vec<_>>(),
        vec![1, 3]
    );
}

#[tokio::test]
async fn seller_sales_are_paginated() {
    let t = TestDb::new().await;
    let ana = t.seller("Ana").await;
    let bruno = t.seller("Bruno").await;
    let yerba = t.product("Yerba 1kg", dec!(4.75)).await;

    for quantity in 1..=5 {
        t.sale(ana.id, yerba.id, quantity).await;
    }
    t.sale(bruno.id, yerba.id, 9).await;

    let (page, total) = t
        .repos
        .sales
        .find_by_seller_paginated(ana.id, 2, 2)
        .await
        .unwrap();
    assert_eq!(total, 5);
    assert_eq!(page.iter().map(|s| s.quantity).collect::<Vec<_>>(), vec![3, 4]);

    let (last, _) = t
        .repos
        .sales
        .find_by_seller_paginated(ana.id, 3, 2)
        .await
        .unwrap();
    assert_eq!(last.len(), 1);

    assert_matches!(
        t.repos.sales.find_by_seller_paginated(ana.id, 0, 2).await,
        Err(ServiceError::InvalidInput(_))
    );
}

#[tokio::test]
async fn returns_reference_their_sale() {
    let t = TestDb::new().await;
    let seller = t.seller("Ana").await;
    let product = t.product("Yerba 1kg", dec!(4.75)).await;
    let sale = t.sale(seller.id, product.id, 5).await;
    let other = t.sale(seller.id, product.id, 1).await;

    for quantity in [1, 2] {
        t.repos
            .returns
            .create(NewReturn {
                sale_id: sale.id,
                quantity,
                created_at: None,
            })
            .await
            .unwrap();
    }

    let (found, returns) = t
        .repos
        .sales
        .find_with_returns(sale.id)
        .await
        .unwrap()
        .expect("sale should exist");
    assert_eq!(found.id, sale.id);
    assert_eq!(returns.iter().map(|r| r.quantity).sum::<i32>(), 3);

    let (_, none) = t.repos.sales.find_with_returns(other.id).await.unwrap().unwrap();
    assert!(none.is_empty());

    assert_eq!(t.repos.returns.find_by_sale(sale.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn return_requires_existing_sale() {
    let t = TestDb::new().await;

    let result = t
        .repos
        .returns
        .create(NewReturn {
            sale_id: 12,
            quantity: 1,
            created_at: None,
        })
        .await;
    assert_matches!(result, Err(ServiceError::ForeignKeyViolation(_)));
}

#[rstest]
#[case(PaymentMethod::Cash)]
#[case(PaymentMethod::Transfer)]
#[tokio::test]
async fn payment_round_trip(#[case] method: PaymentMethod) {
    let t = TestDb::new().await;
    let seller = t.seller("Ana").await;

    let payment = t
        .repos
        .payments
        .create(NewPayment {
            seller_id: seller.id,
            amount: dec!(150.00),
            method,
            created_at: None,
        })
        .await
        .unwrap();

    let reloaded = t.repos.payments.find_by_id(payment.id).await.unwrap().unwrap();
    assert_eq!(reloaded.method, method);
    assert_eq!(reloaded.amount, dec!(150.00));
    assert_eq!(reloaded.seller_id, seller.id);
}

#[tokio::test]
async fn payments_are_listed_per_seller() {
    let t = TestDb::new().await;
    let ana = t.seller("Ana").await;
    let bruno = t.seller("Bruno").await;

    for (seller_id, amount, method) in [
        (ana.id, dec!(10), PaymentMethod::Cash),
        (bruno.id, dec!(20), PaymentMethod::Transfer),
        (ana.id, dec!(30), PaymentMethod::Transfer),
    ] {
        t.repos
            .payments
            .create(NewPayment {
                seller_id,
                amount,
                method,
                created_at: None,
            })
            .await
            .unwrap();
    }

    let payments = t.repos.payments.find_by_seller(ana.id).await.unwrap();
    assert_eq!(
        payments.iter().map(|p| p.method).collect::<Vec<_>>(),
        vec![PaymentMethod::Cash, PaymentMethod::Transfer]
    );
}

#[tokio::test]
async fn payment_requires_existing_seller() {
    let t = TestDb::new().await;

    let result = t
        .repos
        .payments
        .create(NewPayment {
            seller_id: 5,
            amount: dec!(1),
            method: PaymentMethod::Cash,
            created_at: None,
        })
        .await;
    assert_matches!(result, Err(ServiceError::ForeignKeyViolation(_)));
}

#[tokio::test]
async fn payment_without_method_is_rejected() {
    let t = TestDb::new().await;
    let seller = t.seller("Ana").await;

    let result = payment::ActiveModel {
        seller_id: Set(seller.id),
        amount: Set(dec!(5)),
        method: NotSet,
        ..Default::default()
    }
    .insert(t.db.as_ref())
    .await;

    let err = result.expect_err("method is NOT NULL");
    assert!(ServiceError::from_db_err(err).is_constraint_violation());
}

#[tokio::test]
async fn seller_name_is_stored_verbatim() {
    let t = TestDb::new().await;

    let seller = t
        .repos
        .sellers
        .create(NewSeller {
            name: "María José".into(),
        })
        .await
        .unwrap();
    let found = t.repos.sellers.find_by_id(seller.id).await.unwrap().unwrap();
    assert_eq!(found.name, "María José");
}
