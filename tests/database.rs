use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use std::env;

use swapi_loader::{
    database::{Database, PersonRow, RecordSink},
    models::{FetchedPerson, Person},
};

// All tests recreate the `swapi` table; run with `--ignored --test-threads=1`
async fn setup_test_db() -> Pool<Postgres> {
    dotenvy::dotenv().ok();
    let database_url =
        env::var("DATABASE_URL").expect("Environment variable DATABASE_URL required");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    // Tests share one table; start from a clean slate
    sqlx::query("DROP TABLE IF EXISTS swapi")
        .execute(&pool)
        .await
        .expect("Failed to drop table");

    pool
}

fn person(id: u32, height: &str, mass: &str) -> FetchedPerson {
    FetchedPerson::Found(Person {
        name: Some(format!("Person {}", id)),
        birth_year: Some("19BBY".to_string()),
        height: Some(height.to_string()),
        mass: Some(mass.to_string()),
        url: Some(format!("https://swapi.py4e.com/api/people/{}/", id)),
        films: vec!["A New Hope".to_string(), "Return of the Jedi".to_string()],
        homeworld: Some(vec!["Tatooine".to_string()]),
        ..Default::default()
    })
}

#[ignore = "requires a PostgreSQL database in DATABASE_URL"]
#[tokio::test]
async fn test_insert_batch() {
    let pool = setup_test_db().await;
    let db = Database::new(pool.clone()).await.unwrap();

    let written = db
        .insert_batch(vec![
            person(1, "172", "77"),
            FetchedPerson::NotFound { id: 2 },
            person(3, "unknown", "1,358"),
        ])
        .await
        .expect("Failed to insert people");
    assert_eq!(written, 2);

    let rows: Vec<PersonRow> = sqlx::query_as("SELECT * FROM swapi ORDER BY id")
        .fetch_all(&pool)
        .await
        .expect("Failed to retrieve people");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, 1);
    assert_eq!(rows[0].height, 172);
    assert_eq!(rows[0].mass, Some(77));
    assert_eq!(rows[0].films, "A New Hope, Return of the Jedi");
    assert_eq!(rows[0].homeworld.as_deref(), Some("Tatooine"));
    assert_eq!(rows[1].id, 3);
    assert_eq!(rows[1].height, 0);
    assert_eq!(rows[1].mass, None);
}

#[ignore = "requires a PostgreSQL database in DATABASE_URL"]
#[tokio::test]
async fn test_failed_batch_is_rolled_back() {
    let pool = setup_test_db().await;
    let db = Database::new(pool.clone()).await.unwrap();

    db.insert_batch(vec![person(5, "96", "32")]).await.unwrap();
    // Duplicate key fails the whole batch, including person 6
    let result = db
        .insert_batch(vec![person(6, "150", "49"), person(5, "96", "32")])
        .await;
    assert!(result.is_err());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM swapi")
        .fetch_one(&pool)
        .await
        .expect("Failed to count people");
    assert_eq!(count, 1);
}

#[ignore = "requires a PostgreSQL database in DATABASE_URL"]
#[tokio::test]
async fn test_create_table_is_idempotent() {
    let pool = setup_test_db().await;
    Database::new(pool.clone()).await.unwrap();
    let db = Database::new(pool.clone()).await.unwrap();

    assert_eq!(
        db.insert_batch(vec![FetchedPerson::NotFound { id: 1 }])
            .await
            .unwrap(),
        0
    );
    db.close().await;
}
