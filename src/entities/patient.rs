// 🧑 Patient Entity - identity + eligibility at registration
//
// Identity is the normalized identifier (###.###.###-##). A patient is never
// edited after registration; removal goes through the consistency guard.

use chrono::{Datelike, NaiveDate};
use std::fmt;

use crate::error::{DeskError, Result};
use crate::input::{format_date, normalize_identifier, parse_date};
use crate::policy::ClinicPolicy;

// ============================================================================
// PATIENT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    /// Normalized identifier - NEVER changes
    pub id: String,

    pub name: String,

    pub birth_date: NaiveDate,
}

impl Patient {
    /// Age in whole years on `today`.
    ///
    /// Year difference, minus one when today's (month, day) comes before the
    /// birthday's (month, day).
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        age_on(self.birth_date, today)
    }
}

impl fmt::Display for Patient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {} | Name: {} | Birth date: {}",
            self.id,
            self.name,
            format_date(self.birth_date)
        )
    }
}

pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

// ============================================================================
// SORT KEY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Id,
    Name,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Id => "ID",
            SortKey::Name => "Name",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            SortKey::Id => SortKey::Name,
            SortKey::Name => SortKey::Id,
        }
    }
}

// ============================================================================
// PATIENT REGISTRY
// ============================================================================

/// Registered patients, in registration order.
#[derive(Debug, Default)]
pub struct PatientRegistry {
    patients: Vec<Patient>,
}

impl PatientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append a new patient.
    ///
    /// Checks run in order: identifier shape, uniqueness, name length, birth
    /// date format, minimum age.
    pub fn register(
        &mut self,
        raw_id: &str,
        name: &str,
        birth_date: &str,
        policy: &ClinicPolicy,
        today: NaiveDate,
    ) -> Result<Patient> {
        let id = normalize_identifier(raw_id)?;

        if self.contains(&id) {
            return Err(DeskError::DuplicateIdentifier(id));
        }

        let name = name.trim();
        if name.chars().count() < policy.minimum_name_length {
            return Err(DeskError::InvalidName {
                minimum: policy.minimum_name_length,
            });
        }

        let birth_date = parse_date(birth_date).ok_or(DeskError::InvalidDateFormat)?;

        // Thresholds beyond i32 admit nobody
        let minimum_age = i32::try_from(policy.minimum_age_years).unwrap_or(i32::MAX);
        if age_on(birth_date, today) < minimum_age {
            return Err(DeskError::UnderageWithoutGuardian {
                minimum_age: policy.minimum_age_years,
            });
        }

        let patient = Patient {
            id,
            name: name.to_string(),
            birth_date,
        };
        self.patients.push(patient.clone());
        Ok(patient)
    }

    /// Exact match on the normalized identifier
    pub fn find(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Copy of all patients, stably sorted by the chosen field
    pub fn sorted_by(&self, key: SortKey) -> Vec<Patient> {
        let mut sorted = self.patients.clone();
        match key {
            SortKey::Id => sorted.sort_by(|a, b| a.id.cmp(&b.id)),
            SortKey::Name => sorted.sort_by(|a, b| a.name.cmp(&b.name)),
        }
        sorted
    }

    /// Only the consistency guard calls this
    pub(crate) fn remove(&mut self, id: &str) -> Option<Patient> {
        let index = self.patients.iter().position(|p| p.id == id)?;
        Some(self.patients.remove(index))
    }

    pub fn count(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn register(registry: &mut PatientRegistry, id: &str, name: &str, birth: &str) -> Result<Patient> {
        registry.register(id, name, birth, &ClinicPolicy::default(), today())
    }

    #[test]
    fn test_register_normalizes_identifier() {
        let mut registry = PatientRegistry::new();
        let patient = register(&mut registry, "12345678901", "Maria Silva", "01/01/1990").unwrap();

        assert_eq!(patient.id, "123.456.789-01");
        assert_eq!(registry.find("123.456.789-01"), Some(&patient));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_register_duplicate_identifier() {
        let mut registry = PatientRegistry::new();
        register(&mut registry, "12345678901", "Maria Silva", "01/01/1990").unwrap();

        let err = register(&mut registry, "123.456.789-01", "Joao Souza", "01/01/1980").unwrap_err();

        assert_eq!(err, DeskError::DuplicateIdentifier("123.456.789-01".to_string()));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_register_check_order() {
        let mut registry = PatientRegistry::new();

        // Bad id wins over everything else
        assert_eq!(
            register(&mut registry, "123", "Ana", "bad").unwrap_err(),
            DeskError::InvalidIdentifierFormat
        );
        // Short name wins over bad date
        assert_eq!(
            register(&mut registry, "12345678901", "Ana", "bad").unwrap_err(),
            DeskError::InvalidName { minimum: 5 }
        );
        assert_eq!(
            register(&mut registry, "12345678901", "Ana Lima", "1990-01-01").unwrap_err(),
            DeskError::InvalidDateFormat
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_name_length_counts_characters() {
        let mut registry = PatientRegistry::new();

        assert!(register(&mut registry, "11111111111", "  Ana  ", "01/01/1990").is_err());
        let patient = register(&mut registry, "22222222222", "Joãoz", "01/01/1990").unwrap();
        assert_eq!(patient.name, "Joãoz");
    }

    #[test]
    fn test_minimum_age_boundary() {
        let mut registry = PatientRegistry::new();

        // 13 years minus one day
        assert_eq!(
            register(&mut registry, "11111111111", "Young Patient", "11/03/2013").unwrap_err(),
            DeskError::UnderageWithoutGuardian { minimum_age: 13 }
        );
        // Exactly 13 years
        assert!(register(&mut registry, "22222222222", "Teen Patient", "10/03/2013").is_ok());
    }

    #[test]
    fn test_oversized_minimum_age_admits_nobody() {
        let mut registry = PatientRegistry::new();
        let policy = ClinicPolicy {
            minimum_age_years: u32::MAX,
            ..ClinicPolicy::default()
        };

        let err = registry
            .register("11111111111", "Old Patient", "01/01/1900", &policy, today())
            .unwrap_err();

        assert_eq!(err, DeskError::UnderageWithoutGuardian { minimum_age: u32::MAX });
        assert!(registry.is_empty());
    }

    #[test]
    fn test_age_on() {
        let birth = NaiveDate::from_ymd_opt(2000, 2, 29).unwrap();

        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2013, 2, 28).unwrap()), 12);
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2013, 3, 1).unwrap()), 13);
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()), -1);
    }

    #[test]
    fn test_sorted_by_leaves_registry_order() {
        let mut registry = PatientRegistry::new();
        register(&mut registry, "33333333333", "Carla Dias", "01/01/1990").unwrap();
        register(&mut registry, "11111111111", "Bruno Reis", "01/01/1990").unwrap();
        register(&mut registry, "22222222222", "Alice Neves", "01/01/1990").unwrap();

        let by_id: Vec<String> = registry.sorted_by(SortKey::Id).into_iter().map(|p| p.id).collect();
        assert_eq!(by_id, vec!["111.111.111-11", "222.222.222-22", "333.333.333-33"]);

        let by_name: Vec<String> = registry.sorted_by(SortKey::Name).into_iter().map(|p| p.name).collect();
        assert_eq!(by_name, vec!["Alice Neves", "Bruno Reis", "Carla Dias"]);

        let removed = registry.remove("333.333.333-33").unwrap();
        assert_eq!(removed.name, "Carla Dias");
        assert_eq!(registry.count(), 2);
    }

    #[test]
    fn test_display() {
        let patient = Patient {
            id: "123.456.789-01".to_string(),
            name: "Maria Silva".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 5).unwrap(),
        };

        assert_eq!(
            patient.to_string(),
            "ID: 123.456.789-01 | Name: Maria Silva | Birth date: 05/01/1990"
        );
    }
}
