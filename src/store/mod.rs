//! Persistence accessors.
//!
//! Each entity has its own accessor trait; [`Store`] bundles them so handlers
//! can hold a single `Arc<dyn Store>`. [`PgStore`] talks to PostgreSQL through
//! diesel. `MemoryStore` keeps everything in process; it is compiled for unit
//! tests and behind the `memory-store` feature for the HTTP tests.

use chrono::NaiveDate;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::models::{
    CampaignApplication, Employee, EmployeeChanges, Employer, EmployerChanges, JobApplication,
    JobCampaign, JobCampaignChanges, JobCard, JobCardChanges, NewCampaignApplication,
    NewEmployee, NewEmployer, NewJobApplication, NewJobCampaign, NewJobCard, NewRating, NewUser,
    Rating, User,
};
use crate::status::{ApplicationStatus, CampaignApplicationStatus};

#[cfg(any(test, feature = "memory-store"))]
pub mod memory;
pub mod postgres;

#[cfg(any(test, feature = "memory-store"))]
pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<DieselError> for StoreError {
    fn from(value: DieselError) -> Self {
        match value {
            DieselError::NotFound => StoreError::NotFound,
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                StoreError::Conflict(info.message().to_string())
            }
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

/// Which side of a job application a listing is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationParty {
    Employer(i32),
    Employee(i32),
}

pub trait EmployeeStore {
    fn insert_employee(&self, employee: NewEmployee) -> StoreResult<Employee>;
    fn list_employees(&self) -> StoreResult<Vec<Employee>>;
    fn get_employee(&self, id: i32) -> StoreResult<Employee>;
    fn find_employee_by_phone(&self, phone: &str) -> StoreResult<Option<Employee>>;
    fn update_employee(&self, id: i32, changes: EmployeeChanges) -> StoreResult<()>;
    fn delete_employee(&self, id: i32) -> StoreResult<()>;
}

pub trait EmployerStore {
    fn insert_employer(&self, employer: NewEmployer) -> StoreResult<Employer>;
    fn list_employers(&self) -> StoreResult<Vec<Employer>>;
    fn get_employer(&self, id: i32) -> StoreResult<Employer>;
    fn find_employer_by_email(&self, email: &str) -> StoreResult<Option<Employer>>;
    fn update_employer(&self, id: i32, changes: EmployerChanges) -> StoreResult<()>;
    fn delete_employer(&self, id: i32) -> StoreResult<()>;
}

pub trait JobCardStore {
    fn insert_job_card(&self, job_card: NewJobCard) -> StoreResult<JobCard>;
    fn list_job_cards(&self, active_only: bool) -> StoreResult<Vec<JobCard>>;
    fn get_job_card(&self, id: i32) -> StoreResult<JobCard>;
    fn update_job_card(&self, id: i32, changes: JobCardChanges) -> StoreResult<()>;
    fn delete_job_card(&self, id: i32) -> StoreResult<()>;
}

pub trait JobApplicationStore {
    fn insert_job_application(&self, application: NewJobApplication)
        -> StoreResult<JobApplication>;
    fn get_job_application(&self, id: i32) -> StoreResult<JobApplication>;
    fn list_job_applications(&self, party: ApplicationParty) -> StoreResult<Vec<JobApplication>>;
    fn set_job_application_status(&self, id: i32, status: ApplicationStatus) -> StoreResult<()>;
    fn delete_job_application(&self, id: i32) -> StoreResult<()>;
    fn count_job_applications(&self, employee_id: i32, status: ApplicationStatus)
        -> StoreResult<i64>;
}

pub trait JobCampaignStore {
    fn insert_job_campaign(&self, campaign: NewJobCampaign) -> StoreResult<JobCampaign>;
    fn list_job_campaigns(&self, active_only: bool) -> StoreResult<Vec<JobCampaign>>;
    fn get_job_campaign(&self, id: i32) -> StoreResult<JobCampaign>;
    fn update_job_campaign(&self, id: i32, changes: JobCampaignChanges) -> StoreResult<()>;
    fn delete_job_campaign(&self, id: i32) -> StoreResult<()>;
    /// Deactivates active campaigns whose end date is before `today`.
    fn close_expired_campaigns(&self, today: NaiveDate) -> StoreResult<usize>;
}

pub trait CampaignApplicationStore {
    fn insert_campaign_application(
        &self,
        application: NewCampaignApplication,
    ) -> StoreResult<CampaignApplication>;
    fn list_campaign_applications(&self, campaign_id: i32)
        -> StoreResult<Vec<CampaignApplication>>;
    fn set_campaign_application_status(
        &self,
        id: i32,
        status: CampaignApplicationStatus,
    ) -> StoreResult<()>;
    fn delete_campaign_application(&self, id: i32) -> StoreResult<()>;
}

pub trait RatingStore {
    fn insert_rating(&self, rating: NewRating) -> StoreResult<Rating>;
    fn list_ratings_for_employee(&self, employee_id: i32) -> StoreResult<Vec<Rating>>;
    /// Mean rating for an employee, `None` when nothing has been rated yet.
    fn average_rating(&self, employee_id: i32) -> StoreResult<Option<f64>>;
}

pub trait UserStore {
    fn insert_user(&self, user: NewUser) -> StoreResult<User>;
    fn list_users(&self) -> StoreResult<Vec<User>>;
}

pub trait Store:
    EmployeeStore
    + EmployerStore
    + JobCardStore
    + JobApplicationStore
    + JobCampaignStore
    + CampaignApplicationStore
    + RatingStore
    + UserStore
    + Send
    + Sync
    + 'static
{
}

impl<T> Store for T where
    T: EmployeeStore
        + EmployerStore
        + JobCardStore
        + JobApplicationStore
        + JobCampaignStore
        + CampaignApplicationStore
        + RatingStore
        + UserStore
        + Send
        + Sync
        + 'static
{
}

fn mean(values: &[i16]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let total: f64 = values.iter().map(|value| f64::from(*value)).sum();
    Some(total / values.len() as f64)
}

fn ensure_affected(rows: usize) -> StoreResult<()> {
    if rows == 0 {
        Err(StoreError::NotFound)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[4, 5]), Some(4.5));
    }

    #[test]
    fn zero_rows_is_not_found() {
        assert!(matches!(ensure_affected(0), Err(StoreError::NotFound)));
        assert!(ensure_affected(1).is_ok());
    }

    #[test]
    fn diesel_not_found_maps_to_not_found() {
        assert!(matches!(
            StoreError::from(DieselError::NotFound),
            StoreError::NotFound
        ));
        assert!(matches!(
            StoreError::from(DieselError::RollbackTransaction),
            StoreError::Unavailable(_)
        ));
    }
}
