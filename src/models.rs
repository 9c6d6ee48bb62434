use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::schema::*;
use crate::status::{ApplicationStatus, CampaignApplicationStatus};

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = employees)]
pub struct Employee {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub pin_hash: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub address_proof: Option<String>,
    pub open_to_work: bool,
    pub work_experience: Option<String>,
    pub type_of_work: Vec<String>,
    pub photo_url: Option<String>,
    pub verified: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = employees)]
pub struct NewEmployee {
    pub name: String,
    pub phone: String,
    pub pin_hash: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub address_proof: Option<String>,
    pub open_to_work: bool,
    pub work_experience: Option<String>,
    pub type_of_work: Vec<String>,
    pub photo_url: Option<String>,
    pub verified: bool,
}

/// Partial update for an employee. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = employees)]
pub struct EmployeeChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub pin_hash: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub address_proof: Option<String>,
    pub open_to_work: Option<bool>,
    pub work_experience: Option<String>,
    pub type_of_work: Option<Vec<String>>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = employers)]
pub struct Employer {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address_proof: Option<String>,
    pub employer_type: Option<String>,
    pub otp: Option<String>,
    pub verified: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = employers)]
pub struct NewEmployer {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address_proof: Option<String>,
    pub employer_type: Option<String>,
    pub otp: Option<String>,
    pub verified: bool,
}

/// Partial update for an employer. `otp: Some(None)` clears the stored code.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = employers)]
pub struct EmployerChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address_proof: Option<String>,
    pub employer_type: Option<String>,
    pub otp: Option<Option<String>>,
    pub verified: Option<bool>,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = job_cards)]
pub struct JobCard {
    pub id: i32,
    pub employer_id: i32,
    pub pincode: Option<i32>,
    pub location: String,
    pub gender: Option<String>,
    pub job_type: Vec<String>,
    pub salary: Option<String>,
    pub duration: Option<String>,
    pub experience_required: Option<String>,
    pub available_from: Option<NaiveDate>,
    pub working_hours: Option<String>,
    pub holidays: Option<String>,
    pub vacancy: i32,
    pub active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = job_cards)]
pub struct NewJobCard {
    pub employer_id: i32,
    pub pincode: Option<i32>,
    pub location: String,
    pub gender: Option<String>,
    pub job_type: Vec<String>,
    pub salary: Option<String>,
    pub duration: Option<String>,
    pub experience_required: Option<String>,
    pub available_from: Option<NaiveDate>,
    pub working_hours: Option<String>,
    pub holidays: Option<String>,
    pub vacancy: i32,
    pub active: bool,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = job_cards)]
pub struct JobCardChanges {
    pub employer_id: Option<i32>,
    pub pincode: Option<i32>,
    pub location: Option<String>,
    pub gender: Option<String>,
    pub job_type: Option<Vec<String>>,
    pub salary: Option<String>,
    pub duration: Option<String>,
    pub experience_required: Option<String>,
    pub available_from: Option<NaiveDate>,
    pub working_hours: Option<String>,
    pub holidays: Option<String>,
    pub vacancy: Option<i32>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = job_applications)]
pub struct JobApplication {
    pub id: i32,
    pub employer_id: i32,
    pub employee_id: i32,
    pub job_id: i32,
    pub status: ApplicationStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = job_applications)]
pub struct NewJobApplication {
    pub employer_id: i32,
    pub employee_id: i32,
    pub job_id: i32,
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = job_campaigns)]
pub struct JobCampaign {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = job_campaigns)]
pub struct NewJobCampaign {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub active: bool,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = job_campaigns)]
pub struct JobCampaignChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = campaign_applications)]
pub struct CampaignApplication {
    pub id: i32,
    pub employee_id: i32,
    pub job_campaign_id: i32,
    pub status: CampaignApplicationStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = campaign_applications)]
pub struct NewCampaignApplication {
    pub employee_id: i32,
    pub job_campaign_id: i32,
    pub status: CampaignApplicationStatus,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = ratings)]
pub struct Rating {
    pub id: i32,
    pub job_application_id: i32,
    pub employer_id: i32,
    pub employee_id: i32,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ratings)]
pub struct NewRating {
    pub job_application_id: i32,
    pub employer_id: i32,
    pub employee_id: i32,
    pub rating: i16,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}
