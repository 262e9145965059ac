//! Tests contra PostgreSQL real
//!
//! Necesitan `DATABASE_URL`; sin ella cada test termina sin hacer nada.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use car_rental::build_app;
use car_rental::config::{DatabaseConfig, EnvironmentConfig};
use car_rental::controllers::{
    CarController, CustomerController, ImageController, RentalController, StatsController,
};
use car_rental::database::{create_pool, run_migrations};
use car_rental::dto::car_dto::{CreateCarRequest, UpdateCarRequest};
use car_rental::dto::customer_dto::{CreateCustomerRequest, UpdateCustomerRequest};
use car_rental::dto::rental_dto::{CreateRentalRequest, ReturnRentalRequest};
use car_rental::models::{Car, CarStatus, Customer};
use car_rental::repositories::RentalRepository;
use car_rental::services::{ImageStore, PriceModel};
use car_rental::state::AppState;
use car_rental::utils::errors::AppError;

async fn setup() -> Option<PgPool> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL missing; skip database tests.");
        return None;
    }
    let config = DatabaseConfig::from_env().unwrap();
    let pool = create_pool(&config).await.unwrap();
    run_migrations(&pool).await.unwrap();
    Some(pool)
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..10])
}

async fn new_car(pool: &PgPool) -> Car {
    CarController::new(pool.clone())
        .create(CreateCarRequest {
            license_plate: unique("TST"),
            brand: "Peugeot".to_string(),
            model: "308".to_string(),
            mileage: 42_000,
            rental_price: Decimal::new(4550, 2),
        })
        .await
        .unwrap()
}

async fn new_customer(pool: &PgPool) -> Customer {
    CustomerController::new(pool.clone())
        .create(CreateCustomerRequest {
            customer_code: unique("C"),
            last_name: "Martin".to_string(),
            first_name: "Lucie".to_string(),
            address: Some("  12 rue des Lilas  ".to_string()),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_rent_and_return_cycle() {
    let Some(pool) = setup().await else { return };
    let cars = CarController::new(pool.clone());
    let rentals = RentalController::new(pool.clone());

    let car = new_car(&pool).await;
    let customer = new_customer(&pool).await;
    assert_eq!(car.status, CarStatus::Available);
    assert_eq!(cars.get_by_id(car.id).await.unwrap(), car);
    assert_eq!(customer.address.as_deref(), Some("12 rue des Lilas"));
    assert_eq!(
        CustomerController::new(pool.clone()).get_by_id(customer.id).await.unwrap(),
        customer
    );

    let rental = rentals
        .create(CreateRentalRequest { car_id: car.id, customer_id: customer.id })
        .await
        .unwrap();
    assert!(rental.is_active());
    assert_eq!(cars.get_by_id(car.id).await.unwrap().status, CarStatus::Rented);
    let mut conn = pool.acquire().await.unwrap();
    assert_eq!(RentalRepository::count_active_for_car(&mut conn, car.id).await.unwrap(), 1);
    drop(conn);

    // Un coche alquilado no se puede borrar
    let dir = tempfile::tempdir().unwrap();
    let images = ImageStore::new(dir.path().join("cars"), 1024).await.unwrap();
    match cars.delete(car.id, &images).await {
        Err(AppError::InvalidState(message)) => assert!(message.contains("currently rented")),
        other => panic!("unexpected result: {:?}", other),
    }

    // Un coche alquilado no se puede volver a alquilar
    let second = rentals
        .create(CreateRentalRequest { car_id: car.id, customer_id: customer.id })
        .await;
    assert!(matches!(second, Err(AppError::InvalidState(_))));

    let detail = rentals.get_detail(rental.id).await.unwrap();
    assert_eq!(detail.car.id, car.id);
    assert_eq!(detail.customer.id, customer.id);

    let returned = rentals
        .return_rental(rental.id, ReturnRentalRequest::default())
        .await
        .unwrap();
    assert!(returned.returned_at.is_some());
    assert!(returned.ended_at.is_some());
    assert_eq!(cars.get_by_id(car.id).await.unwrap().status, CarStatus::Available);

    let again = rentals.return_rental(rental.id, ReturnRentalRequest::default()).await;
    assert!(matches!(again, Err(AppError::InvalidState(_))));

    let mut conn = pool.acquire().await.unwrap();
    assert_eq!(RentalRepository::count_active_for_car(&mut conn, car.id).await.unwrap(), 0);
    drop(conn);

    let history = rentals.history_by_car(car.id).await.unwrap();
    assert_eq!(history.len(), 1);
    let history = rentals.history_by_customer(customer.id).await.unwrap();
    assert_eq!(history.len(), 1);

    // Con historial no se puede borrar ni el coche ni el cliente
    assert!(matches!(cars.delete(car.id, &images).await, Err(AppError::InvalidState(_))));
    assert!(matches!(
        CustomerController::new(pool.clone()).delete(customer.id).await,
        Err(AppError::InvalidState(_))
    ));
}

#[tokio::test]
async fn test_rental_missing_entities() {
    let Some(pool) = setup().await else { return };
    let rentals = RentalController::new(pool.clone());
    let car = new_car(&pool).await;
    let customer = new_customer(&pool).await;

    let missing_car = rentals
        .create(CreateRentalRequest { car_id: i64::MAX, customer_id: customer.id })
        .await;
    assert!(matches!(missing_car, Err(AppError::NotFound(_))));

    let missing_customer = rentals
        .create(CreateRentalRequest { car_id: car.id, customer_id: i64::MAX })
        .await;
    assert!(matches!(missing_customer, Err(AppError::NotFound(_))));

    // El coche sigue disponible tras los intentos fallidos
    let car = CarController::new(pool.clone()).get_by_id(car.id).await.unwrap();
    assert_eq!(car.status, CarStatus::Available);

    assert!(matches!(rentals.get_detail(i64::MAX).await, Err(AppError::NotFound(_))));
    assert!(matches!(rentals.history_by_car(i64::MAX).await, Err(AppError::NotFound(_))));
    assert!(matches!(
        rentals.return_rental(i64::MAX, ReturnRentalRequest::default()).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_concurrent_rentals_single_winner() {
    let Some(pool) = setup().await else { return };
    let car = new_car(&pool).await;
    let first = new_customer(&pool).await;
    let second = new_customer(&pool).await;

    let handles: Vec<_> = [first.id, second.id]
        .into_iter()
        .map(|customer_id| {
            let pool = pool.clone();
            tokio::spawn(async move {
                RentalController::new(pool)
                    .create(CreateRentalRequest { car_id: car.id, customer_id })
                    .await
            })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(e) => assert!(matches!(e, AppError::InvalidState(_)), "{:?}", e),
        }
    }
    assert_eq!(successes, 1);

    let active = RentalController::new(pool.clone()).history_by_car(car.id).await.unwrap();
    assert_eq!(active.len(), 1);
}

/// Abre una transacción que alquila el coche sin confirmar, como haría
/// `RentalController::create` a mitad de camino.
async fn open_uncommitted_rental(
    pool: &PgPool,
    car_id: i64,
    customer_id: i64,
) -> sqlx::Transaction<'static, sqlx::Postgres> {
    let mut tx = pool.begin().await.unwrap();
    sqlx::query("UPDATE cars SET status = 'rented' WHERE id = $1 AND status = 'available'")
        .bind(car_id)
        .execute(&mut *tx)
        .await
        .unwrap();
    sqlx::query("INSERT INTO rentals (car_id, customer_id) VALUES ($1, $2)")
        .bind(car_id)
        .bind(customer_id)
        .execute(&mut *tx)
        .await
        .unwrap();
    tx
}

#[tokio::test]
async fn test_delete_car_waits_for_pending_rental() {
    let Some(pool) = setup().await else { return };
    let car = new_car(&pool).await;
    let customer = new_customer(&pool).await;

    let tx = open_uncommitted_rental(&pool, car.id, customer.id).await;

    let delete = {
        let pool = pool.clone();
        tokio::spawn(async move {
            let dir = tempfile::tempdir().unwrap();
            let images = ImageStore::new(dir.path().join("cars"), 1024).await.unwrap();
            CarController::new(pool).delete(car.id, &images).await
        })
    };
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    tx.commit().await.unwrap();

    let result = delete.await.unwrap();
    assert!(matches!(result, Err(AppError::InvalidState(_))), "{:?}", result);

    let car = CarController::new(pool.clone()).get_by_id(car.id).await.unwrap();
    assert_eq!(car.status, CarStatus::Rented);
}

#[tokio::test]
async fn test_delete_customer_waits_for_pending_rental() {
    let Some(pool) = setup().await else { return };
    let car = new_car(&pool).await;
    let customer = new_customer(&pool).await;

    let tx = open_uncommitted_rental(&pool, car.id, customer.id).await;

    let delete = {
        let pool = pool.clone();
        tokio::spawn(async move { CustomerController::new(pool).delete(customer.id).await })
    };
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    tx.commit().await.unwrap();

    let result = delete.await.unwrap();
    assert!(matches!(result, Err(AppError::InvalidState(_))), "{:?}", result);
    assert!(CustomerController::new(pool.clone()).get_by_id(customer.id).await.is_ok());
}

#[tokio::test]
async fn test_delete_active_rental_frees_car() {
    let Some(pool) = setup().await else { return };
    let rentals = RentalController::new(pool.clone());
    let car = new_car(&pool).await;
    let customer = new_customer(&pool).await;

    let rental = rentals
        .create(CreateRentalRequest { car_id: car.id, customer_id: customer.id })
        .await
        .unwrap();
    rentals.delete(rental.id).await.unwrap();

    let car = CarController::new(pool.clone()).get_by_id(car.id).await.unwrap();
    assert_eq!(car.status, CarStatus::Available);
    assert!(matches!(rentals.delete(rental.id).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_return_before_start_is_rejected() {
    let Some(pool) = setup().await else { return };
    let rentals = RentalController::new(pool.clone());
    let car = new_car(&pool).await;
    let customer = new_customer(&pool).await;

    let rental = rentals
        .create(CreateRentalRequest { car_id: car.id, customer_id: customer.id })
        .await
        .unwrap();

    let early = ReturnRentalRequest { returned_at: Some(rental.started_at - Duration::days(1)) };
    assert!(matches!(
        rentals.return_rental(rental.id, early).await,
        Err(AppError::Validation(_))
    ));

    // Sigue abierto y se puede devolver con una fecha válida
    let later = ReturnRentalRequest { returned_at: Some(Utc::now() + Duration::hours(2)) };
    let returned = rentals.return_rental(rental.id, later).await.unwrap();
    assert!(returned.returned_at.unwrap() > returned.started_at);
}

#[tokio::test]
async fn test_duplicates_and_updates() {
    let Some(pool) = setup().await else { return };
    let cars = CarController::new(pool.clone());
    let customers = CustomerController::new(pool.clone());
    let car = new_car(&pool).await;
    let customer = new_customer(&pool).await;

    let duplicate = cars
        .create(CreateCarRequest {
            license_plate: car.license_plate.clone(),
            brand: "Renault".to_string(),
            model: "Clio".to_string(),
            mileage: 0,
            rental_price: Decimal::new(30, 0),
        })
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let duplicate = customers
        .create(CreateCustomerRequest {
            customer_code: customer.customer_code.clone(),
            last_name: "Durand".to_string(),
            first_name: "Paul".to_string(),
            address: None,
        })
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let updated = cars
        .update(car.id, UpdateCarRequest { mileage: Some(43_500), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(updated.mileage, 43_500);
    assert_eq!(updated.brand, car.brand);
    assert_eq!(updated.status, CarStatus::Available);

    let unchanged = cars.update(car.id, UpdateCarRequest::default()).await.unwrap();
    assert_eq!(unchanged, updated);

    let updated = customers
        .update(customer.id, UpdateCustomerRequest { address: Some("  ".to_string()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(updated.address, None);
    assert_eq!(updated.last_name, customer.last_name);

    let found = customers.get_by_customer_code(&customer.customer_code).await.unwrap();
    assert_eq!(found.id, customer.id);
    let found = cars.get_by_license_plate(&car.license_plate).await.unwrap();
    assert_eq!(found.id, car.id);

    assert!(matches!(
        cars.update(i64::MAX, UpdateCarRequest::default()).await,
        Err(AppError::NotFound(_))
    ));

    let stats = StatsController::new(pool.clone()).get().await.unwrap();
    assert!(stats.total_cars >= 1);
    assert_eq!(stats.total_cars, stats.available_cars + stats.rented_cars);
}

#[tokio::test]
async fn test_image_lifecycle() {
    let Some(pool) = setup().await else { return };
    let dir = tempfile::tempdir().unwrap();
    let store = ImageStore::new(dir.path().join("cars"), 1024).await.unwrap();
    let images = ImageController::new(pool.clone(), store.clone());
    let car = new_car(&pool).await;

    assert!(matches!(images.download(car.id).await, Err(AppError::NotFound(_))));
    assert!(matches!(
        images.upload(car.id, Some("photo.exe"), b"data").await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        images.upload(i64::MAX, Some("photo.png"), b"data").await,
        Err(AppError::NotFound(_))
    ));

    let first = images.upload(car.id, Some("photo.PNG"), b"first").await.unwrap();
    assert!(first.filename.starts_with(&format!("car_{}_", car.id)));
    assert_eq!(first.url, format!("/api/images/cars/{}/download", car.id));

    // Una segunda subida reemplaza la anterior y borra su fichero
    let second = images.upload(car.id, Some("photo.jpg"), b"second").await.unwrap();
    assert!(!dir.path().join("cars").join(&first.filename).exists());

    let image = images.download(car.id).await.unwrap();
    assert_eq!(image.filename, second.filename);
    assert_eq!(image.content_type, "image/jpeg");
    assert_eq!(image.data, b"second");

    images.delete(car.id).await.unwrap();
    assert!(matches!(images.delete(car.id).await, Err(AppError::NotFound(_))));

    let car = CarController::new(pool.clone()).get_by_id(car.id).await.unwrap();
    assert_eq!(car.image_filename, None);
}

#[tokio::test]
async fn test_http_create_and_delete_car() {
    let Some(pool) = setup().await else { return };
    let dir = tempfile::tempdir().unwrap();
    let images = ImageStore::new(dir.path().join("cars"), 1024).await.unwrap();
    let state = AppState::new(pool, EnvironmentConfig::default(), PriceModel::train().unwrap(), images);
    let app = build_app(state);

    let plate = unique("HTTP");
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/cars")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "license_plate": plate,
                "brand": "Audi",
                "model": "A3",
                "mileage": 1000,
                "rental_price": 65.5,
                "status": "rented"
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "available");
    assert_eq!(body["rental_price"], 65.5);
    let id = body["id"].as_i64().unwrap();

    let request = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/api/cars/{}", id))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let request = Request::builder()
        .uri(format!("/api/cars/{}", id))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
