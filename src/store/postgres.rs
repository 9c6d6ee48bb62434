use chrono::{NaiveDate, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};

use super::{
    ensure_affected, mean, ApplicationParty, CampaignApplicationStore, EmployeeStore,
    EmployerStore, JobApplicationStore, JobCampaignStore, JobCardStore, RatingStore, StoreError,
    StoreResult, UserStore,
};
use crate::db::PgPool;
use crate::models::{
    CampaignApplication, Employee, EmployeeChanges, Employer, EmployerChanges, JobApplication,
    JobCampaign, JobCampaignChanges, JobCard, JobCardChanges, NewCampaignApplication,
    NewEmployee, NewEmployer, NewJobApplication, NewJobCampaign, NewJobCard, NewRating, NewUser,
    Rating, User,
};
use crate::schema::{
    campaign_applications, employees, employers, job_applications, job_campaigns, job_cards,
    ratings, users,
};
use crate::status::{ApplicationStatus, CampaignApplicationStatus};

type PgPooledConnection = PooledConnection<ConnectionManager<PgConnection>>;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> StoreResult<PgPooledConnection> {
        self.pool
            .get()
            .map_err(|err| StoreError::Unavailable(format!("database pool error: {err}")))
    }
}

impl EmployeeStore for PgStore {
    fn insert_employee(&self, employee: NewEmployee) -> StoreResult<Employee> {
        let mut conn = self.conn()?;
        let created = diesel::insert_into(employees::table)
            .values(&employee)
            .get_result(&mut conn)?;
        Ok(created)
    }

    fn list_employees(&self) -> StoreResult<Vec<Employee>> {
        let mut conn = self.conn()?;
        Ok(employees::table
            .order(employees::id.asc())
            .load(&mut conn)?)
    }

    fn get_employee(&self, id: i32) -> StoreResult<Employee> {
        let mut conn = self.conn()?;
        Ok(employees::table.find(id).first(&mut conn)?)
    }

    fn find_employee_by_phone(&self, phone: &str) -> StoreResult<Option<Employee>> {
        let mut conn = self.conn()?;
        Ok(employees::table
            .filter(employees::phone.eq(phone))
            .first(&mut conn)
            .optional()?)
    }

    fn update_employee(&self, id: i32, changes: EmployeeChanges) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let updated = diesel::update(employees::table.find(id))
            .set((&changes, employees::updated_at.eq(now)))
            .execute(&mut conn)?;
        ensure_affected(updated)
    }

    fn delete_employee(&self, id: i32) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(employees::table.find(id)).execute(&mut conn)?;
        ensure_affected(deleted)
    }
}

impl EmployerStore for PgStore {
    fn insert_employer(&self, employer: NewEmployer) -> StoreResult<Employer> {
        let mut conn = self.conn()?;
        let created = diesel::insert_into(employers::table)
            .values(&employer)
            .get_result(&mut conn)?;
        Ok(created)
    }

    fn list_employers(&self) -> StoreResult<Vec<Employer>> {
        let mut conn = self.conn()?;
        Ok(employers::table
            .order(employers::id.asc())
            .load(&mut conn)?)
    }

    fn get_employer(&self, id: i32) -> StoreResult<Employer> {
        let mut conn = self.conn()?;
        Ok(employers::table.find(id).first(&mut conn)?)
    }

    fn find_employer_by_email(&self, email: &str) -> StoreResult<Option<Employer>> {
        let mut conn = self.conn()?;
        Ok(employers::table
            .filter(employers::email.eq(email))
            .first(&mut conn)
            .optional()?)
    }

    fn update_employer(&self, id: i32, changes: EmployerChanges) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let updated = diesel::update(employers::table.find(id))
            .set((&changes, employers::updated_at.eq(now)))
            .execute(&mut conn)?;
        ensure_affected(updated)
    }

    fn delete_employer(&self, id: i32) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(employers::table.find(id)).execute(&mut conn)?;
        ensure_affected(deleted)
    }
}

impl JobCardStore for PgStore {
    fn insert_job_card(&self, job_card: NewJobCard) -> StoreResult<JobCard> {
        let mut conn = self.conn()?;
        let created = diesel::insert_into(job_cards::table)
            .values(&job_card)
            .get_result(&mut conn)?;
        Ok(created)
    }

    fn list_job_cards(&self, active_only: bool) -> StoreResult<Vec<JobCard>> {
        let mut conn = self.conn()?;
        let mut query = job_cards::table.order(job_cards::id.asc()).into_boxed();
        if active_only {
            query = query.filter(job_cards::active.eq(true));
        }
        Ok(query.load(&mut conn)?)
    }

    fn get_job_card(&self, id: i32) -> StoreResult<JobCard> {
        let mut conn = self.conn()?;
        Ok(job_cards::table.find(id).first(&mut conn)?)
    }

    fn update_job_card(&self, id: i32, changes: JobCardChanges) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let updated = diesel::update(job_cards::table.find(id))
            .set((&changes, job_cards::updated_at.eq(now)))
            .execute(&mut conn)?;
        ensure_affected(updated)
    }

    fn delete_job_card(&self, id: i32) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(job_cards::table.find(id)).execute(&mut conn)?;
        ensure_affected(deleted)
    }
}

impl JobApplicationStore for PgStore {
    fn insert_job_application(
        &self,
        application: NewJobApplication,
    ) -> StoreResult<JobApplication> {
        let mut conn = self.conn()?;
        let created = diesel::insert_into(job_applications::table)
            .values(&application)
            .get_result(&mut conn)?;
        Ok(created)
    }

    fn get_job_application(&self, id: i32) -> StoreResult<JobApplication> {
        let mut conn = self.conn()?;
        Ok(job_applications::table.find(id).first(&mut conn)?)
    }

    fn list_job_applications(&self, party: ApplicationParty) -> StoreResult<Vec<JobApplication>> {
        let mut conn = self.conn()?;
        let query = job_applications::table
            .order(job_applications::id.asc())
            .into_boxed();
        let query = match party {
            ApplicationParty::Employer(id) => query.filter(job_applications::employer_id.eq(id)),
            ApplicationParty::Employee(id) => query.filter(job_applications::employee_id.eq(id)),
        };
        Ok(query.load(&mut conn)?)
    }

    fn set_job_application_status(&self, id: i32, status: ApplicationStatus) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let updated = diesel::update(job_applications::table.find(id))
            .set((
                job_applications::status.eq(status),
                job_applications::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;
        ensure_affected(updated)
    }

    fn delete_job_application(&self, id: i32) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(job_applications::table.find(id)).execute(&mut conn)?;
        ensure_affected(deleted)
    }

    fn count_job_applications(
        &self,
        employee_id: i32,
        status: ApplicationStatus,
    ) -> StoreResult<i64> {
        let mut conn = self.conn()?;
        Ok(job_applications::table
            .filter(job_applications::employee_id.eq(employee_id))
            .filter(job_applications::status.eq(status))
            .count()
            .get_result(&mut conn)?)
    }
}

impl JobCampaignStore for PgStore {
    fn insert_job_campaign(&self, campaign: NewJobCampaign) -> StoreResult<JobCampaign> {
        let mut conn = self.conn()?;
        let created = diesel::insert_into(job_campaigns::table)
            .values(&campaign)
            .get_result(&mut conn)?;
        Ok(created)
    }

    fn list_job_campaigns(&self, active_only: bool) -> StoreResult<Vec<JobCampaign>> {
        let mut conn = self.conn()?;
        let mut query = job_campaigns::table
            .order(job_campaigns::id.asc())
            .into_boxed();
        if active_only {
            query = query.filter(job_campaigns::active.eq(true));
        }
        Ok(query.load(&mut conn)?)
    }

    fn get_job_campaign(&self, id: i32) -> StoreResult<JobCampaign> {
        let mut conn = self.conn()?;
        Ok(job_campaigns::table.find(id).first(&mut conn)?)
    }

    fn update_job_campaign(&self, id: i32, changes: JobCampaignChanges) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let updated = diesel::update(job_campaigns::table.find(id))
            .set((&changes, job_campaigns::updated_at.eq(now)))
            .execute(&mut conn)?;
        ensure_affected(updated)
    }

    fn delete_job_campaign(&self, id: i32) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(job_campaigns::table.find(id)).execute(&mut conn)?;
        ensure_affected(deleted)
    }

    fn close_expired_campaigns(&self, today: NaiveDate) -> StoreResult<usize> {
        let mut conn = self.conn()?;
        let closed = diesel::update(
            job_campaigns::table
                .filter(job_campaigns::active.eq(true))
                .filter(job_campaigns::end_date.lt(today)),
        )
        .set((
            job_campaigns::active.eq(false),
            job_campaigns::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?;
        Ok(closed)
    }
}

impl CampaignApplicationStore for PgStore {
    fn insert_campaign_application(
        &self,
        application: NewCampaignApplication,
    ) -> StoreResult<CampaignApplication> {
        let mut conn = self.conn()?;
        let created = diesel::insert_into(campaign_applications::table)
            .values(&application)
            .get_result(&mut conn)?;
        Ok(created)
    }

    fn list_campaign_applications(
        &self,
        campaign_id: i32,
    ) -> StoreResult<Vec<CampaignApplication>> {
        let mut conn = self.conn()?;
        Ok(campaign_applications::table
            .filter(campaign_applications::job_campaign_id.eq(campaign_id))
            .order(campaign_applications::id.asc())
            .load(&mut conn)?)
    }

    fn set_campaign_application_status(
        &self,
        id: i32,
        status: CampaignApplicationStatus,
    ) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let updated = diesel::update(campaign_applications::table.find(id))
            .set((
                campaign_applications::status.eq(status),
                campaign_applications::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;
        ensure_affected(updated)
    }

    fn delete_campaign_application(&self, id: i32) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let deleted =
            diesel::delete(campaign_applications::table.find(id)).execute(&mut conn)?;
        ensure_affected(deleted)
    }
}

impl RatingStore for PgStore {
    fn insert_rating(&self, rating: NewRating) -> StoreResult<Rating> {
        let mut conn = self.conn()?;
        let created = diesel::insert_into(ratings::table)
            .values(&rating)
            .get_result(&mut conn)?;
        Ok(created)
    }

    fn list_ratings_for_employee(&self, employee_id: i32) -> StoreResult<Vec<Rating>> {
        let mut conn = self.conn()?;
        Ok(ratings::table
            .filter(ratings::employee_id.eq(employee_id))
            .order(ratings::id.asc())
            .load(&mut conn)?)
    }

    fn average_rating(&self, employee_id: i32) -> StoreResult<Option<f64>> {
        let mut conn = self.conn()?;
        let values: Vec<i16> = ratings::table
            .filter(ratings::employee_id.eq(employee_id))
            .select(ratings::rating)
            .load(&mut conn)?;
        Ok(mean(&values))
    }
}

impl UserStore for PgStore {
    fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut conn = self.conn()?;
        let created = diesel::insert_into(users::table)
            .values(&user)
            .get_result(&mut conn)?;
        Ok(created)
    }

    fn list_users(&self) -> StoreResult<Vec<User>> {
        let mut conn = self.conn()?;
        Ok(users::table.order(users::id.asc()).load(&mut conn)?)
    }
}
