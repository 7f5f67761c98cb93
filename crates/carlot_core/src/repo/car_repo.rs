//! Car repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the only read/write path between callers and the `cars` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate the full record before any SQL mutation.
//! - `update` reads, validates and writes inside one immediate transaction.
//! - `create_many_if_empty` is all-or-nothing: count and inserts share one
//!   immediate transaction.
//! - Missing ids surface as `RepoError::NotFound`, never as empty success.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Nothing here logs; failures are returned to the caller as-is.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::car::{Car, CarId, CarValidationError, NewCar};
use rusqlite::types::Value;
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, Transaction, TransactionBehavior,
};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CAR_SELECT_SQL: &str = "SELECT
    id,
    make,
    model,
    year,
    color,
    price
FROM cars";

const CARS_TABLE: &str = "cars";
const CARS_REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "make",
    "model",
    "year",
    "color",
    "price",
    "created_at",
    "updated_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for car persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Input violates a field constraint; storage was not touched.
    Validation(CarValidationError),
    /// Storage failure, propagated unmodified.
    Db(DbError),
    /// No car is stored under the requested id.
    NotFound(CarId),
    /// Persisted row cannot be converted to a valid `Car`.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid {}: {err}", err.field()),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "car not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted car data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "car repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "car repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "car repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CarValidationError> for RepoError {
    fn from(value: CarValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Optional predicates for car queries. Unset options are not applied.
///
/// Deserializing from loosely typed input ignores unrecognized keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarFilter {
    /// Exact, case-sensitive match.
    pub make: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
    /// Inclusive lower year bound.
    pub min_year: Option<i32>,
    /// Inclusive upper year bound.
    pub max_year: Option<i32>,
}

/// Partial field assignment for `update`. Unset fields keep stored values.
///
/// Deserializing from loosely typed input ignores unrecognized keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarUpdate {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub price: Option<f64>,
}

impl CarUpdate {
    /// Returns whether no field is assigned.
    pub fn is_empty(&self) -> bool {
        self.make.is_none()
            && self.model.is_none()
            && self.year.is_none()
            && self.color.is_none()
            && self.price.is_none()
    }

    fn apply_to(&self, car: &mut Car) {
        if let Some(make) = &self.make {
            car.make.clone_from(make);
        }
        if let Some(model) = &self.model {
            car.model.clone_from(model);
        }
        if let Some(year) = self.year {
            car.year = year;
        }
        if let Some(color) = &self.color {
            car.color.clone_from(color);
        }
        if let Some(price) = self.price {
            car.price = price;
        }
    }
}

/// Repository interface for car CRUD operations.
pub trait CarRepository {
    /// Returns every stored car in ascending `id` order.
    fn find_all(&self) -> RepoResult<Vec<Car>>;
    /// Returns the car with `id`, or `NotFound`.
    fn find_by_id(&self, id: CarId) -> RepoResult<Car>;
    /// Returns cars matching every set predicate, in ascending `id` order.
    fn filter(&self, criteria: &CarFilter) -> RepoResult<Vec<Car>>;
    /// Validates and inserts a car, returning it with its assigned id.
    fn create(&self, car: &NewCar) -> RepoResult<Car>;
    /// Inserts all `cars` in one transaction, only when the store is empty.
    ///
    /// Returns the created cars, or an empty list when data already exists.
    /// Any invalid entry fails the whole call before storage is touched.
    fn create_many_if_empty(&self, cars: &[NewCar]) -> RepoResult<Vec<Car>>;
    /// Applies `fields`, re-validates the full record and commits it.
    fn update(&self, id: CarId, fields: &CarUpdate) -> RepoResult<Car>;
    /// Removes the car with `id`, or fails with `NotFound`.
    fn delete(&self, id: CarId) -> RepoResult<()>;
    /// Returns the number of stored cars.
    fn count(&self) -> RepoResult<usize>;
    /// Returns whether a car with `id` is stored.
    fn exists(&self, id: CarId) -> RepoResult<bool>;
}

/// SQLite-backed car repository over an injected connection.
pub struct SqliteCarRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCarRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_car_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CarRepository for SqliteCarRepository<'_> {
    fn find_all(&self) -> RepoResult<Vec<Car>> {
        self.filter(&CarFilter::default())
    }

    fn find_by_id(&self, id: CarId) -> RepoResult<Car> {
        let car = load_car(self.conn, id)?.ok_or(RepoError::NotFound(id))?;
        ensure_persisted_valid(car)
    }

    fn filter(&self, criteria: &CarFilter) -> RepoResult<Vec<Car>> {
        let mut sql = format!("{CAR_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(make) = criteria.make.as_ref() {
            sql.push_str(" AND make = ?");
            bind_values.push(Value::Text(make.clone()));
        }
        if let Some(min_price) = criteria.min_price {
            sql.push_str(" AND price >= ?");
            bind_values.push(Value::Real(min_price));
        }
        if let Some(max_price) = criteria.max_price {
            sql.push_str(" AND price <= ?");
            bind_values.push(Value::Real(max_price));
        }
        if let Some(min_year) = criteria.min_year {
            sql.push_str(" AND year >= ?");
            bind_values.push(Value::Integer(i64::from(min_year)));
        }
        if let Some(max_year) = criteria.max_year {
            sql.push_str(" AND year <= ?");
            bind_values.push(Value::Integer(i64::from(max_year)));
        }

        sql.push_str(" ORDER BY id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut cars = Vec::new();

        while let Some(row) = rows.next()? {
            cars.push(ensure_persisted_valid(parse_car_row(row)?)?);
        }

        Ok(cars)
    }

    fn create(&self, car: &NewCar) -> RepoResult<Car> {
        car.validate()?;
        insert_car(self.conn, car)
    }

    fn create_many_if_empty(&self, cars: &[NewCar]) -> RepoResult<Vec<Car>> {
        for car in cars {
            car.validate()?;
        }

        // Dropping `tx` on any early return rolls every insert back.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if count_cars(&tx)? > 0 {
            return Ok(Vec::new());
        }

        let created = cars
            .iter()
            .map(|car| insert_car(&tx, car))
            .collect::<RepoResult<Vec<_>>>()?;

        tx.commit()?;
        Ok(created)
    }

    fn update(&self, id: CarId, fields: &CarUpdate) -> RepoResult<Car> {
        // Dropping `tx` on any early return rolls the transaction back.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let mut car = load_car(&tx, id)?.ok_or(RepoError::NotFound(id))?;
        fields.apply_to(&mut car);
        car.validate()?;

        if !fields.is_empty() {
            tx.execute(
                "UPDATE cars
                 SET
                    make = ?1,
                    model = ?2,
                    year = ?3,
                    color = ?4,
                    price = ?5,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?6;",
                params![
                    car.make.as_str(),
                    car.model.as_str(),
                    car.year,
                    car.color.as_str(),
                    car.price,
                    id,
                ],
            )?;
        }

        tx.commit()?;
        Ok(car)
    }

    fn delete(&self, id: CarId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM cars WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn count(&self) -> RepoResult<usize> {
        count_cars(self.conn)
    }

    fn exists(&self, id: CarId) -> RepoResult<bool> {
        let found: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM cars WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(found == 1)
    }
}

fn insert_car(conn: &Connection, car: &NewCar) -> RepoResult<Car> {
    conn.execute(
        "INSERT INTO cars (
            make,
            model,
            year,
            color,
            price
        ) VALUES (?1, ?2, ?3, ?4, ?5);",
        params![
            car.make.as_str(),
            car.model.as_str(),
            car.year,
            car.color.as_str(),
            car.price,
        ],
    )?;

    Ok(car.clone().into_car(conn.last_insert_rowid()))
}

fn count_cars(conn: &Connection) -> RepoResult<usize> {
    let total: i64 = conn.query_row("SELECT COUNT(*) FROM cars;", [], |row| row.get(0))?;
    usize::try_from(total)
        .map_err(|_| RepoError::InvalidData(format!("invalid car count `{total}`")))
}

fn load_car(conn: &Connection, id: CarId) -> RepoResult<Option<Car>> {
    let car = conn
        .query_row(
            &format!("{CAR_SELECT_SQL} WHERE id = ?1;"),
            [id],
            parse_car_row,
        )
        .optional()?;
    Ok(car)
}

fn parse_car_row(row: &Row<'_>) -> rusqlite::Result<Car> {
    Ok(Car {
        id: row.get("id")?,
        make: row.get("make")?,
        model: row.get("model")?,
        year: row.get("year")?,
        color: row.get("color")?,
        price: row.get("price")?,
    })
}

fn ensure_persisted_valid(car: Car) -> RepoResult<Car> {
    match car.validate() {
        Ok(()) => Ok(car),
        Err(err) => Err(RepoError::InvalidData(format!(
            "car {} in cars table: {err}",
            car.id
        ))),
    }
}

fn ensure_car_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [CARS_TABLE],
        |row| row.get(0),
    )?;
    if table_exists != 1 {
        return Err(RepoError::MissingRequiredTable(CARS_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([CARS_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    for &column in CARS_REQUIRED_COLUMNS {
        if !columns.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: CARS_TABLE,
                column,
            });
        }
    }

    Ok(())
}
