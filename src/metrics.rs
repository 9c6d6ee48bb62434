//! Employee feature vectors and the dropout heuristic.
//!
//! The same features feed the CSV export and the external prediction service.

use std::io;

use serde::Serialize;

use crate::models::Employee;
use crate::status::ApplicationStatus;
use crate::store::{Store, StoreResult};

pub const CSV_HEADER: [&str; 7] = [
    "age",
    "gender",
    "experience",
    "applications_accepted",
    "applications_rejected",
    "ratings_avg",
    "dropout_percentage",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropoutFeatures {
    pub age: i32,
    pub gender: i32,
    pub experience: i32,
    pub applications_accepted: i64,
    pub applications_rejected: i64,
    pub ratings_avg: f64,
}

impl DropoutFeatures {
    pub fn dropout_percentage(&self) -> f64 {
        dropout_heuristic(self.applications_accepted, self.ratings_avg, self.experience)
    }

    fn csv_record(&self) -> [String; 7] {
        [
            self.age.to_string(),
            self.gender.to_string(),
            self.experience.to_string(),
            self.applications_accepted.to_string(),
            self.applications_rejected.to_string(),
            format!("{:.2}", self.ratings_avg),
            format!("{:.2}", self.dropout_percentage()),
        ]
    }
}

/// 1 for "male" in any casing, 0 otherwise.
pub fn binarize_gender(gender: Option<&str>) -> i32 {
    match gender {
        Some(value) if value.to_lowercase() == "male" => 1,
        _ => 0,
    }
}

/// Years of experience taken from the leading token, e.g. "3 years as a cook" -> 3.
pub fn parse_experience(work_experience: Option<&str>) -> i32 {
    work_experience
        .and_then(|text| text.split_whitespace().next())
        .and_then(|token| token.parse().ok())
        .unwrap_or(0)
}

pub fn dropout_heuristic(accepted: i64, ratings_avg: f64, experience: i32) -> f64 {
    let score = accepted as f64 * 20.0 + ratings_avg * 10.0 + f64::from(experience) * 5.0;
    (100.0 - score).max(0.0)
}

pub fn compute_features(store: &dyn Store, employee: &Employee) -> StoreResult<DropoutFeatures> {
    let applications_accepted =
        store.count_job_applications(employee.id, ApplicationStatus::Accepted)?;
    let applications_rejected =
        store.count_job_applications(employee.id, ApplicationStatus::Rejected)?;
    let ratings_avg = store.average_rating(employee.id)?.unwrap_or(0.0);

    Ok(DropoutFeatures {
        age: employee.age.unwrap_or(0),
        gender: binarize_gender(employee.gender.as_deref()),
        experience: parse_experience(employee.work_experience.as_deref()),
        applications_accepted,
        applications_rejected,
        ratings_avg,
    })
}

/// Features for every employee, in id order.
pub fn collect_features(store: &dyn Store) -> StoreResult<Vec<DropoutFeatures>> {
    store
        .list_employees()?
        .iter()
        .map(|employee| compute_features(store, employee))
        .collect()
}

pub fn write_csv<W: io::Write>(sink: W, rows: &[DropoutFeatures]) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.write_record(row.csv_record())?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewEmployee, NewJobApplication, NewRating};
    use crate::store::{EmployeeStore, JobApplicationStore, MemoryStore, RatingStore};

    #[test]
    fn gender_is_case_insensitive_male_flag() {
        assert_eq!(binarize_gender(Some("Male")), 1);
        assert_eq!(binarize_gender(Some("MALE")), 1);
        assert_eq!(binarize_gender(Some("female")), 0);
        assert_eq!(binarize_gender(Some("")), 0);
        assert_eq!(binarize_gender(None), 0);
    }

    #[test]
    fn experience_reads_leading_integer_only() {
        assert_eq!(parse_experience(Some("3 years driving")), 3);
        assert_eq!(parse_experience(Some("  12")), 12);
        assert_eq!(parse_experience(Some("three years")), 0);
        assert_eq!(parse_experience(Some("")), 0);
        assert_eq!(parse_experience(None), 0);
    }

    #[test]
    fn heuristic_is_clamped_at_zero() {
        assert_eq!(dropout_heuristic(0, 0.0, 0), 100.0);
        assert_eq!(dropout_heuristic(1, 4.5, 2), 25.0);
        assert_eq!(dropout_heuristic(5, 5.0, 10), 0.0);
    }

    #[test]
    fn csv_has_header_and_two_decimal_floats() {
        let rows = vec![DropoutFeatures {
            age: 29,
            gender: 1,
            experience: 2,
            applications_accepted: 1,
            applications_rejected: 3,
            ratings_avg: 4.5,
        }];
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &rows).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "age,gender,experience,applications_accepted,applications_rejected,ratings_avg,dropout_percentage\n\
             29,1,2,1,3,4.50,25.00\n"
        );
    }

    #[test]
    fn features_are_derived_from_store_counts() {
        let store = MemoryStore::new();
        let employee = store
            .insert_employee(NewEmployee {
                name: "Ravi".to_string(),
                phone: "900".to_string(),
                pin_hash: "hash".to_string(),
                age: Some(40),
                gender: Some("Male".to_string()),
                address_proof: None,
                open_to_work: true,
                work_experience: Some("4 yrs masonry".to_string()),
                type_of_work: Vec::new(),
                photo_url: None,
                verified: true,
            })
            .unwrap();
        for status in [ApplicationStatus::Accepted, ApplicationStatus::Rejected] {
            store
                .insert_job_application(NewJobApplication {
                    employer_id: 1,
                    employee_id: employee.id,
                    job_id: 1,
                    status,
                })
                .unwrap();
        }
        store
            .insert_rating(NewRating {
                job_application_id: 1,
                employer_id: 1,
                employee_id: employee.id,
                rating: 2,
                comment: None,
            })
            .unwrap();

        let features = compute_features(&store, &employee).unwrap();
        assert_eq!(
            features,
            DropoutFeatures {
                age: 40,
                gender: 1,
                experience: 4,
                applications_accepted: 1,
                applications_rejected: 1,
                ratings_avg: 2.0,
            }
        );
        assert_eq!(features.dropout_percentage(), 40.0);
        assert_eq!(collect_features(&store).unwrap().len(), 1);
    }
}
