use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, NaiveDateTime, Utc};

use super::{
    ensure_affected, mean, ApplicationParty, CampaignApplicationStore, EmployeeStore,
    EmployerStore, JobApplicationStore, JobCampaignStore, JobCardStore, RatingStore, StoreError,
    StoreResult, UserStore,
};
use crate::models::{
    CampaignApplication, Employee, EmployeeChanges, Employer, EmployerChanges, JobApplication,
    JobCampaign, JobCampaignChanges, JobCard, JobCardChanges, NewCampaignApplication,
    NewEmployee, NewEmployer, NewJobApplication, NewJobCampaign, NewJobCard, NewRating, NewUser,
    Rating, User,
};
use crate::status::{ApplicationStatus, CampaignApplicationStatus};

/// Rows of one table keyed by primary key, with a SERIAL-style id counter.
struct Table<T> {
    rows: BTreeMap<i32, T>,
    last_id: i32,
}

impl<T: Clone> Table<T> {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn get(&self, id: i32) -> StoreResult<T> {
        self.rows.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    fn get_mut(&mut self, id: i32) -> StoreResult<&mut T> {
        self.rows.get_mut(&id).ok_or(StoreError::NotFound)
    }

    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    fn filtered(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }

    fn remove(&mut self, id: i32) -> StoreResult<()> {
        ensure_affected(usize::from(self.rows.remove(&id).is_some()))
    }
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

#[derive(Default)]
struct Tables {
    employees: Table<Employee>,
    employers: Table<Employer>,
    job_cards: Table<JobCard>,
    job_applications: Table<JobApplication>,
    job_campaigns: Table<JobCampaign>,
    campaign_applications: Table<CampaignApplication>,
    ratings: Table<Rating>,
    users: Table<User>,
}

/// In-process store with the same uniqueness rules as the PostgreSQL schema.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn conflict(constraint: &str) -> StoreError {
    StoreError::Conflict(format!(
        "duplicate key value violates unique constraint \"{constraint}\""
    ))
}

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn set_nullable<T>(target: &mut Option<T>, value: Option<T>) {
    if let Some(value) = value {
        *target = Some(value);
    }
}

impl EmployeeStore for MemoryStore {
    fn insert_employee(&self, employee: NewEmployee) -> StoreResult<Employee> {
        let mut tables = self.lock()?;
        let table = &mut tables.employees;
        if table.rows.values().any(|row| row.phone == employee.phone) {
            return Err(conflict("employees_phone_key"));
        }
        let id = table.next_id();
        let timestamp = now();
        let created = Employee {
            id,
            name: employee.name,
            phone: employee.phone,
            pin_hash: employee.pin_hash,
            age: employee.age,
            gender: employee.gender,
            address_proof: employee.address_proof,
            open_to_work: employee.open_to_work,
            work_experience: employee.work_experience,
            type_of_work: employee.type_of_work,
            photo_url: employee.photo_url,
            verified: employee.verified,
            created_at: timestamp,
            updated_at: timestamp,
        };
        table.rows.insert(id, created.clone());
        Ok(created)
    }

    fn list_employees(&self) -> StoreResult<Vec<Employee>> {
        Ok(self.lock()?.employees.all())
    }

    fn get_employee(&self, id: i32) -> StoreResult<Employee> {
        self.lock()?.employees.get(id)
    }

    fn find_employee_by_phone(&self, phone: &str) -> StoreResult<Option<Employee>> {
        Ok(self
            .lock()?
            .employees
            .rows
            .values()
            .find(|row| row.phone == phone)
            .cloned())
    }

    fn update_employee(&self, id: i32, changes: EmployeeChanges) -> StoreResult<()> {
        let mut tables = self.lock()?;
        let table = &mut tables.employees;
        if let Some(phone) = &changes.phone {
            if table
                .rows
                .values()
                .any(|row| row.id != id && &row.phone == phone)
            {
                return Err(conflict("employees_phone_key"));
            }
        }
        let row = table.get_mut(id)?;
        set(&mut row.name, changes.name);
        set(&mut row.phone, changes.phone);
        set(&mut row.pin_hash, changes.pin_hash);
        set_nullable(&mut row.age, changes.age);
        set_nullable(&mut row.gender, changes.gender);
        set_nullable(&mut row.address_proof, changes.address_proof);
        set(&mut row.open_to_work, changes.open_to_work);
        set_nullable(&mut row.work_experience, changes.work_experience);
        set(&mut row.type_of_work, changes.type_of_work);
        set_nullable(&mut row.photo_url, changes.photo_url);
        row.updated_at = now();
        Ok(())
    }

    fn delete_employee(&self, id: i32) -> StoreResult<()> {
        self.lock()?.employees.remove(id)
    }
}

impl EmployerStore for MemoryStore {
    fn insert_employer(&self, employer: NewEmployer) -> StoreResult<Employer> {
        let mut tables = self.lock()?;
        let table = &mut tables.employers;
        if table.rows.values().any(|row| row.email == employer.email) {
            return Err(conflict("employers_email_key"));
        }
        let id = table.next_id();
        let timestamp = now();
        let created = Employer {
            id,
            name: employer.name,
            email: employer.email,
            password_hash: employer.password_hash,
            age: employer.age,
            gender: employer.gender,
            phone: employer.phone,
            address_proof: employer.address_proof,
            employer_type: employer.employer_type,
            otp: employer.otp,
            verified: employer.verified,
            created_at: timestamp,
            updated_at: timestamp,
        };
        table.rows.insert(id, created.clone());
        Ok(created)
    }

    fn list_employers(&self) -> StoreResult<Vec<Employer>> {
        Ok(self.lock()?.employers.all())
    }

    fn get_employer(&self, id: i32) -> StoreResult<Employer> {
        self.lock()?.employers.get(id)
    }

    fn find_employer_by_email(&self, email: &str) -> StoreResult<Option<Employer>> {
        Ok(self
            .lock()?
            .employers
            .rows
            .values()
            .find(|row| row.email == email)
            .cloned())
    }

    fn update_employer(&self, id: i32, changes: EmployerChanges) -> StoreResult<()> {
        let mut tables = self.lock()?;
        let table = &mut tables.employers;
        if let Some(email) = &changes.email {
            if table
                .rows
                .values()
                .any(|row| row.id != id && &row.email == email)
            {
                return Err(conflict("employers_email_key"));
            }
        }
        let row = table.get_mut(id)?;
        set(&mut row.name, changes.name);
        set(&mut row.email, changes.email);
        set(&mut row.password_hash, changes.password_hash);
        set_nullable(&mut row.age, changes.age);
        set_nullable(&mut row.gender, changes.gender);
        set_nullable(&mut row.phone, changes.phone);
        set_nullable(&mut row.address_proof, changes.address_proof);
        set_nullable(&mut row.employer_type, changes.employer_type);
        set(&mut row.otp, changes.otp);
        set(&mut row.verified, changes.verified);
        row.updated_at = now();
        Ok(())
    }

    fn delete_employer(&self, id: i32) -> StoreResult<()> {
        self.lock()?.employers.remove(id)
    }
}

impl JobCardStore for MemoryStore {
    fn insert_job_card(&self, job_card: NewJobCard) -> StoreResult<JobCard> {
        let mut tables = self.lock()?;
        let table = &mut tables.job_cards;
        let id = table.next_id();
        let timestamp = now();
        let created = JobCard {
            id,
            employer_id: job_card.employer_id,
            pincode: job_card.pincode,
            location: job_card.location,
            gender: job_card.gender,
            job_type: job_card.job_type,
            salary: job_card.salary,
            duration: job_card.duration,
            experience_required: job_card.experience_required,
            available_from: job_card.available_from,
            working_hours: job_card.working_hours,
            holidays: job_card.holidays,
            vacancy: job_card.vacancy,
            active: job_card.active,
            created_at: timestamp,
            updated_at: timestamp,
        };
        table.rows.insert(id, created.clone());
        Ok(created)
    }

    fn list_job_cards(&self, active_only: bool) -> StoreResult<Vec<JobCard>> {
        Ok(self
            .lock()?
            .job_cards
            .filtered(|row| !active_only || row.active))
    }

    fn get_job_card(&self, id: i32) -> StoreResult<JobCard> {
        self.lock()?.job_cards.get(id)
    }

    fn update_job_card(&self, id: i32, changes: JobCardChanges) -> StoreResult<()> {
        let mut tables = self.lock()?;
        let row = tables.job_cards.get_mut(id)?;
        set(&mut row.employer_id, changes.employer_id);
        set_nullable(&mut row.pincode, changes.pincode);
        set(&mut row.location, changes.location);
        set_nullable(&mut row.gender, changes.gender);
        set(&mut row.job_type, changes.job_type);
        set_nullable(&mut row.salary, changes.salary);
        set_nullable(&mut row.duration, changes.duration);
        set_nullable(&mut row.experience_required, changes.experience_required);
        set_nullable(&mut row.available_from, changes.available_from);
        set_nullable(&mut row.working_hours, changes.working_hours);
        set_nullable(&mut row.holidays, changes.holidays);
        set(&mut row.vacancy, changes.vacancy);
        set(&mut row.active, changes.active);
        row.updated_at = now();
        Ok(())
    }

    fn delete_job_card(&self, id: i32) -> StoreResult<()> {
        self.lock()?.job_cards.remove(id)
    }
}

impl JobApplicationStore for MemoryStore {
    fn insert_job_application(
        &self,
        application: NewJobApplication,
    ) -> StoreResult<JobApplication> {
        let mut tables = self.lock()?;
        let table = &mut tables.job_applications;
        let id = table.next_id();
        let timestamp = now();
        let created = JobApplication {
            id,
            employer_id: application.employer_id,
            employee_id: application.employee_id,
            job_id: application.job_id,
            status: application.status,
            created_at: timestamp,
            updated_at: timestamp,
        };
        table.rows.insert(id, created.clone());
        Ok(created)
    }

    fn get_job_application(&self, id: i32) -> StoreResult<JobApplication> {
        self.lock()?.job_applications.get(id)
    }

    fn list_job_applications(&self, party: ApplicationParty) -> StoreResult<Vec<JobApplication>> {
        Ok(self
            .lock()?
            .job_applications
            .filtered(|row| match party {
                ApplicationParty::Employer(id) => row.employer_id == id,
                ApplicationParty::Employee(id) => row.employee_id == id,
            }))
    }

    fn set_job_application_status(&self, id: i32, status: ApplicationStatus) -> StoreResult<()> {
        let mut tables = self.lock()?;
        let row = tables.job_applications.get_mut(id)?;
        row.status = status;
        row.updated_at = now();
        Ok(())
    }

    fn delete_job_application(&self, id: i32) -> StoreResult<()> {
        self.lock()?.job_applications.remove(id)
    }

    fn count_job_applications(
        &self,
        employee_id: i32,
        status: ApplicationStatus,
    ) -> StoreResult<i64> {
        let tables = self.lock()?;
        let count = tables
            .job_applications
            .rows
            .values()
            .filter(|row| row.employee_id == employee_id && row.status == status)
            .count();
        Ok(count as i64)
    }
}

impl JobCampaignStore for MemoryStore {
    fn insert_job_campaign(&self, campaign: NewJobCampaign) -> StoreResult<JobCampaign> {
        let mut tables = self.lock()?;
        let table = &mut tables.job_campaigns;
        let id = table.next_id();
        let timestamp = now();
        let created = JobCampaign {
            id,
            title: campaign.title,
            description: campaign.description,
            location: campaign.location,
            start_date: campaign.start_date,
            end_date: campaign.end_date,
            active: campaign.active,
            created_at: timestamp,
            updated_at: timestamp,
        };
        table.rows.insert(id, created.clone());
        Ok(created)
    }

    fn list_job_campaigns(&self, active_only: bool) -> StoreResult<Vec<JobCampaign>> {
        Ok(self
            .lock()?
            .job_campaigns
            .filtered(|row| !active_only || row.active))
    }

    fn get_job_campaign(&self, id: i32) -> StoreResult<JobCampaign> {
        self.lock()?.job_campaigns.get(id)
    }

    fn update_job_campaign(&self, id: i32, changes: JobCampaignChanges) -> StoreResult<()> {
        let mut tables = self.lock()?;
        let row = tables.job_campaigns.get_mut(id)?;
        set(&mut row.title, changes.title);
        set_nullable(&mut row.description, changes.description);
        set_nullable(&mut row.location, changes.location);
        set_nullable(&mut row.start_date, changes.start_date);
        set_nullable(&mut row.end_date, changes.end_date);
        set(&mut row.active, changes.active);
        row.updated_at = now();
        Ok(())
    }

    fn delete_job_campaign(&self, id: i32) -> StoreResult<()> {
        self.lock()?.job_campaigns.remove(id)
    }

    fn close_expired_campaigns(&self, today: NaiveDate) -> StoreResult<usize> {
        let mut tables = self.lock()?;
        let timestamp = now();
        let mut closed = 0;
        for row in tables.job_campaigns.rows.values_mut() {
            if row.active && row.end_date.is_some_and(|end| end < today) {
                row.active = false;
                row.updated_at = timestamp;
                closed += 1;
            }
        }
        Ok(closed)
    }
}

impl CampaignApplicationStore for MemoryStore {
    fn insert_campaign_application(
        &self,
        application: NewCampaignApplication,
    ) -> StoreResult<CampaignApplication> {
        let mut tables = self.lock()?;
        let table = &mut tables.campaign_applications;
        let id = table.next_id();
        let timestamp = now();
        let created = CampaignApplication {
            id,
            employee_id: application.employee_id,
            job_campaign_id: application.job_campaign_id,
            status: application.status,
            created_at: timestamp,
            updated_at: timestamp,
        };
        table.rows.insert(id, created.clone());
        Ok(created)
    }

    fn list_campaign_applications(
        &self,
        campaign_id: i32,
    ) -> StoreResult<Vec<CampaignApplication>> {
        Ok(self
            .lock()?
            .campaign_applications
            .filtered(|row| row.job_campaign_id == campaign_id))
    }

    fn set_campaign_application_status(
        &self,
        id: i32,
        status: CampaignApplicationStatus,
    ) -> StoreResult<()> {
        let mut tables = self.lock()?;
        let row = tables.campaign_applications.get_mut(id)?;
        row.status = status;
        row.updated_at = now();
        Ok(())
    }

    fn delete_campaign_application(&self, id: i32) -> StoreResult<()> {
        self.lock()?.campaign_applications.remove(id)
    }
}

impl RatingStore for MemoryStore {
    fn insert_rating(&self, rating: NewRating) -> StoreResult<Rating> {
        let mut tables = self.lock()?;
        let table = &mut tables.ratings;
        let id = table.next_id();
        let timestamp = now();
        let created = Rating {
            id,
            job_application_id: rating.job_application_id,
            employer_id: rating.employer_id,
            employee_id: rating.employee_id,
            rating: rating.rating,
            comment: rating.comment,
            created_at: timestamp,
            updated_at: timestamp,
        };
        table.rows.insert(id, created.clone());
        Ok(created)
    }

    fn list_ratings_for_employee(&self, employee_id: i32) -> StoreResult<Vec<Rating>> {
        Ok(self
            .lock()?
            .ratings
            .filtered(|row| row.employee_id == employee_id))
    }

    fn average_rating(&self, employee_id: i32) -> StoreResult<Option<f64>> {
        let tables = self.lock()?;
        let values: Vec<i16> = tables
            .ratings
            .rows
            .values()
            .filter(|row| row.employee_id == employee_id)
            .map(|row| row.rating)
            .collect();
        Ok(mean(&values))
    }
}

impl UserStore for MemoryStore {
    fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.lock()?;
        let table = &mut tables.users;
        if table.rows.values().any(|row| row.email == user.email) {
            return Err(conflict("users_email_key"));
        }
        let id = table.next_id();
        let timestamp = now();
        let created = User {
            id,
            name: user.name,
            email: user.email,
            created_at: timestamp,
            updated_at: timestamp,
        };
        table.rows.insert(id, created.clone());
        Ok(created)
    }

    fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.lock()?.users.all())
    }
}
