//! Car use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for request handlers.
//! - Delegate persistence and validation to repository implementations.
//! - Map repository failures to handler-facing outcomes.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Repository errors are returned unchanged; logging here is metadata-only.

use crate::model::car::{Car, CarId, NewCar};
use crate::repo::car_repo::{CarFilter, CarRepository, CarUpdate, RepoError, RepoResult};
use log::{debug, info, warn};

/// Price threshold used by `find_expensive` when callers have no preference.
pub const DEFAULT_EXPENSIVE_MIN_PRICE: f64 = 40_000.0;

/// Use-case service wrapper for car CRUD operations.
pub struct CarService<R: CarRepository> {
    repo: R,
}

impl<R: CarRepository> CarService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every car in ascending id order.
    pub fn list_cars(&self) -> RepoResult<Vec<Car>> {
        self.repo.find_all()
    }

    /// Gets one car by id. Missing ids fail with `RepoError::NotFound`.
    pub fn get_car(&self, id: CarId) -> RepoResult<Car> {
        self.repo.find_by_id(id)
    }

    /// Lists cars matching every set predicate in `criteria`.
    pub fn filter_cars(&self, criteria: &CarFilter) -> RepoResult<Vec<Car>> {
        self.repo.filter(criteria)
    }

    /// Lists cars whose make matches exactly.
    pub fn find_by_make(&self, make: impl Into<String>) -> RepoResult<Vec<Car>> {
        self.repo.filter(&CarFilter {
            make: Some(make.into()),
            ..CarFilter::default()
        })
    }

    /// Lists cars priced at or above `min_price`.
    pub fn find_expensive(&self, min_price: Option<f64>) -> RepoResult<Vec<Car>> {
        self.repo.filter(&CarFilter {
            min_price: Some(min_price.unwrap_or(DEFAULT_EXPENSIVE_MIN_PRICE)),
            ..CarFilter::default()
        })
    }

    /// Lists cars built within `start_year..=end_year`.
    pub fn find_by_year_range(&self, start_year: i32, end_year: i32) -> RepoResult<Vec<Car>> {
        self.repo.filter(&CarFilter {
            min_year: Some(start_year),
            max_year: Some(end_year),
            ..CarFilter::default()
        })
    }

    /// Creates one car from already-parsed handler input.
    pub fn create_car(
        &self,
        make: &str,
        model: &str,
        year: i32,
        color: &str,
        price: f64,
    ) -> RepoResult<Car> {
        let input = NewCar::new(make, model, year, color, price);
        let result = self.repo.create(&input);
        log_outcome("car_create", None, &result);
        result
    }

    /// Applies a partial update and returns the stored record.
    ///
    /// An empty `fields` set re-validates and returns the unchanged car.
    pub fn update_car(&self, id: CarId, fields: &CarUpdate) -> RepoResult<Car> {
        let result = self.repo.update(id, fields);
        log_outcome("car_update", Some(id), &result);
        result
    }

    /// Deletes one car. Repeated deletes keep failing with `NotFound`.
    pub fn delete_car(&self, id: CarId) -> RepoResult<()> {
        let result = self.repo.delete(id);
        match &result {
            Ok(()) => info!("event=car_delete module=service status=ok id={id}"),
            Err(err) => log_failure("car_delete", Some(id), err),
        }
        result
    }

    /// Returns the number of stored cars.
    pub fn count_cars(&self) -> RepoResult<usize> {
        self.repo.count()
    }

    /// Returns whether a car with `id` is stored; never fails with `NotFound`.
    pub fn car_exists(&self, id: CarId) -> RepoResult<bool> {
        self.repo.exists(id)
    }

    /// Inserts `samples` only when the store is empty.
    ///
    /// All-or-nothing: an invalid sample leaves the store empty. Returns the
    /// number of inserted cars (0 when data already exists).
    pub fn seed_if_empty(&self, samples: &[NewCar]) -> RepoResult<usize> {
        match self.repo.create_many_if_empty(samples) {
            Ok(created) if created.is_empty() && !samples.is_empty() => {
                debug!("event=car_seed module=service status=skipped reason=not_empty");
                Ok(0)
            }
            Ok(created) => {
                info!(
                    "event=car_seed module=service status=ok inserted={}",
                    created.len()
                );
                Ok(created.len())
            }
            Err(err) => {
                log_failure("car_seed", None, &err);
                Err(err)
            }
        }
    }
}

/// Starter inventory used to populate an empty store.
pub fn sample_cars() -> Vec<NewCar> {
    vec![
        NewCar::new("Toyota", "Camry", 2023, "Blue", 28_500.0),
        NewCar::new("Honda", "Civic", 2022, "Silver", 24_000.0),
        NewCar::new("Ford", "Mustang", 2024, "Red", 45_000.0),
        NewCar::new("Tesla", "Model 3", 2023, "White", 42_000.0),
    ]
}

/// Handler-facing failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Requested record does not exist.
    NotFound,
    /// Input violated a field constraint.
    BadInput,
    /// Storage or schema failure; not caused by the caller's input.
    Internal,
}

/// Failure summary a request handler can turn into a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl HandlerFailure {
    /// Classifies `err` and keeps its message for display to the user.
    pub fn from_repo_error(err: &RepoError) -> Self {
        let kind = match err {
            RepoError::NotFound(_) => FailureKind::NotFound,
            RepoError::Validation(_) => FailureKind::BadInput,
            _ => FailureKind::Internal,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

impl From<&RepoError> for HandlerFailure {
    fn from(value: &RepoError) -> Self {
        Self::from_repo_error(value)
    }
}

fn log_outcome(event: &str, id: Option<CarId>, result: &RepoResult<Car>) {
    match result {
        Ok(car) => info!("event={event} module=service status=ok id={}", car.id),
        Err(err) => log_failure(event, id, err),
    }
}

fn log_failure(event: &str, id: Option<CarId>, err: &RepoError) {
    let id = id.map_or_else(|| "none".to_string(), |id| id.to_string());
    match err {
        RepoError::Validation(validation) => debug!(
            "event={event} module=service status=error id={id} error_code=validation field={}",
            validation.field()
        ),
        RepoError::NotFound(_) => {
            debug!("event={event} module=service status=error id={id} error_code=not_found")
        }
        other => warn!(
            "event={event} module=service status=error id={id} error_code=storage error={other}"
        ),
    }
}
