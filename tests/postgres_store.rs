//! Exercises `PgStore` against a real database when `TEST_DATABASE_URL` is set.

use std::env;

use anyhow::{anyhow, Context, Result};
use chrono::{Duration, Utc};
use diesel::RunQueryDsl;
use jobboard::db;
use jobboard::models::{EmployeeChanges, NewEmployee, NewJobApplication, NewJobCampaign, NewRating};
use jobboard::status::ApplicationStatus;
use jobboard::store::{
    EmployeeStore, JobApplicationStore, JobCampaignStore, PgStore, RatingStore, StoreError,
};
use once_cell::sync::Lazy;
use tokio::sync::Mutex;

static DB_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

fn connect() -> Result<Option<PgStore>> {
    let Ok(database_url) = env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping PgStore test");
        return Ok(None);
    };
    let pool = db::init_pool_with_size(&database_url, db::DEFAULT_MAX_POOL_SIZE)?;
    db::run_migrations(&pool)?;

    let mut conn = pool
        .get()
        .map_err(|err| anyhow!("failed to get cleanup connection: {err}"))?;
    diesel::sql_query(
        "TRUNCATE TABLE ratings, campaign_applications, job_campaigns, job_applications, job_cards, employers, employees, users RESTART IDENTITY CASCADE;",
    )
    .execute(&mut conn)
    .context("failed to truncate tables")?;

    Ok(Some(PgStore::new(pool)))
}

fn employee(name: &str, phone: &str) -> NewEmployee {
    NewEmployee {
        name: name.to_string(),
        phone: phone.to_string(),
        pin_hash: "hash".to_string(),
        age: Some(28),
        gender: Some("female".to_string()),
        address_proof: None,
        open_to_work: true,
        work_experience: Some("2 years".to_string()),
        type_of_work: vec!["cook".to_string()],
        photo_url: None,
        verified: true,
    }
}

#[tokio::test]
async fn employees_keep_unique_phones() -> Result<()> {
    let _lock = DB_LOCK.lock().await;
    let Some(store) = connect()? else {
        return Ok(());
    };

    let first = store.insert_employee(employee("Asha", "555"))?;
    assert_eq!(first.type_of_work, vec!["cook".to_string()]);
    assert!(matches!(
        store.insert_employee(employee("Other", "555")),
        Err(StoreError::Conflict(_))
    ));

    let second = store.insert_employee(employee("Ravi", "777"))?;
    let clash = store.update_employee(
        second.id,
        EmployeeChanges {
            phone: Some("555".to_string()),
            ..Default::default()
        },
    );
    assert!(matches!(clash, Err(StoreError::Conflict(_))));

    store.update_employee(
        first.id,
        EmployeeChanges {
            name: Some("Asha K".to_string()),
            ..Default::default()
        },
    )?;
    let reloaded = store.get_employee(first.id)?;
    assert_eq!(reloaded.name, "Asha K");
    assert_eq!(reloaded.phone, "555");

    store.delete_employee(first.id)?;
    assert!(matches!(
        store.delete_employee(first.id),
        Err(StoreError::NotFound)
    ));
    Ok(())
}

#[tokio::test]
async fn counts_and_ratings_feed_metrics() -> Result<()> {
    let _lock = DB_LOCK.lock().await;
    let Some(store) = connect()? else {
        return Ok(());
    };

    let worker = store.insert_employee(employee("Asha", "555"))?;
    let accepted = store.insert_job_application(NewJobApplication {
        employer_id: 1,
        employee_id: worker.id,
        job_id: 1,
        status: ApplicationStatus::Accepted,
    })?;
    store.insert_job_application(NewJobApplication {
        employer_id: 1,
        employee_id: worker.id,
        job_id: 2,
        status: ApplicationStatus::Rejected,
    })?;
    for score in [3, 4] {
        store.insert_rating(NewRating {
            job_application_id: accepted.id,
            employer_id: 1,
            employee_id: worker.id,
            rating: score,
            comment: None,
        })?;
    }

    assert_eq!(
        store.count_job_applications(worker.id, ApplicationStatus::Accepted)?,
        1
    );
    assert_eq!(
        store.count_job_applications(worker.id, ApplicationStatus::Rejected)?,
        1
    );
    assert_eq!(store.average_rating(worker.id)?, Some(3.5));
    assert_eq!(store.average_rating(worker.id + 1)?, None);
    Ok(())
}

#[tokio::test]
async fn expired_campaigns_are_closed() -> Result<()> {
    let _lock = DB_LOCK.lock().await;
    let Some(store) = connect()? else {
        return Ok(());
    };

    let today = Utc::now().date_naive();
    let campaign = |title: &str, end_offset: i64| NewJobCampaign {
        title: title.to_string(),
        description: None,
        location: None,
        start_date: Some(today - Duration::days(30)),
        end_date: Some(today + Duration::days(end_offset)),
        active: true,
    };
    let expired = store.insert_job_campaign(campaign("Past", -1))?;
    let ending_today = store.insert_job_campaign(campaign("Today", 0))?;

    assert_eq!(store.close_expired_campaigns(today)?, 1);
    assert!(!store.get_job_campaign(expired.id)?.active);
    assert!(store.get_job_campaign(ending_today.id)?.active);
    assert_eq!(store.close_expired_campaigns(today)?, 0);
    Ok(())
}
