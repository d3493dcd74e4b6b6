//! Shared test support utilities for integration tests
//!
//! Example models and fixture trees used across the integration and property
//! tests.

#![allow(dead_code)]

use anyhow::{anyhow, bail};
use chrono::NaiveDateTime;
use modelmap_core::converter::built_in;
use modelmap_core::{
    Converter, DateValue, DateZone, Model, ModelOptions, Native, Required, SchemaBuilder, TypeTag,
};
use serde_json::{json, Value};

/// Flat model whose `id` starts out at -1
#[derive(Debug, Clone, PartialEq)]
pub struct TestModel {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Default for TestModel {
    fn default() -> Self {
        Self {
            id: -1,
            first_name: None,
            last_name: None,
        }
    }
}

impl Model for TestModel {
    fn describe(schema: &mut SchemaBuilder<Self>) {
        schema
            .field("id", |m| &m.id, |m| &mut m.id)
            .field("firstName", |m| &m.first_name, |m| &mut m.first_name)
            .field("lastName", |m| &m.last_name, |m| &mut m.last_name);
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct UserModel {
    pub id: Required<i64>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
}

impl Model for UserModel {
    fn describe(schema: &mut SchemaBuilder<Self>) {
        schema
            .field("id", |m| &m.id, |m| &mut m.id)
            .field("firstName", |m| &m.first_name, |m| &mut m.first_name)
            .field("middleName", |m| &m.middle_name, |m| &mut m.middle_name)
            .field("lastName", |m| &m.last_name, |m| &mut m.last_name);
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AddressModel {
    pub id: Required<i64>,
    pub street_address: Option<String>,
    pub extended_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
}

impl Model for AddressModel {
    fn describe(schema: &mut SchemaBuilder<Self>) {
        schema
            .field("id", |m| &m.id, |m| &mut m.id)
            .field("streetAddress", |m| &m.street_address, |m| &mut m.street_address)
            .field("extendedAddress", |m| &m.extended_address, |m| &mut m.extended_address)
            .field("city", |m| &m.city, |m| &mut m.city)
            .field("state", |m| &m.state, |m| &mut m.state)
            .field("zipcode", |m| &m.zipcode, |m| &mut m.zipcode);
    }
}

/// A user with an address, a birthday and friends
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PersonModel {
    pub user: UserModel,
    pub facebook_id: Option<i64>,
    pub address: AddressModel,
    pub birthday: Option<NaiveDateTime>,
    pub friends: Vec<PersonModel>,
}

impl Model for PersonModel {
    fn describe(schema: &mut SchemaBuilder<Self>) {
        schema
            .inherit(|m| &m.user, |m| &mut m.user)
            .field("facebookId", |m| &m.facebook_id, |m| &mut m.facebook_id)
            .nested("address", |m| &m.address, |m| &mut m.address)
            .field("birthday", |m| &m.birthday, |m| &mut m.birthday)
            .nested_list("friends", |m| &m.friends, |m| &mut m.friends);
    }

    fn options(&self) -> ModelOptions {
        ModelOptions::new().with_converter(built_in::date_for_type(TypeTag::Date, "%m/%d/%y"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn from_index(index: i64) -> Option<Day> {
        usize::try_from(index).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn index(self) -> i64 {
        self as i64
    }
}

/// Days stored as weekday indices; unknown indices are dropped
pub fn day_list_converter() -> Converter {
    Converter::for_field(
        "daysOfTheWeek",
        |value: &Value| {
            let raw = value
                .as_array()
                .ok_or_else(|| anyhow!("expected an array of day indices"))?;
            let days: Vec<Day> = raw
                .iter()
                .filter_map(Value::as_i64)
                .filter_map(Day::from_index)
                .collect();
            Ok(Native::custom(days))
        },
        |native: &Native| match native.downcast_ref::<Vec<Day>>() {
            Some(days) => Ok(Value::Array(days.iter().map(|d| json!(d.index())).collect())),
            None => bail!("expected a list of days, found {}", native.kind()),
        },
    )
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct StudentModel {
    pub user: UserModel,
}

impl Model for StudentModel {
    fn describe(schema: &mut SchemaBuilder<Self>) {
        schema.inherit(|m| &m.user, |m| &mut m.user);
    }

    fn options(&self) -> ModelOptions {
        ModelOptions::new().snake_cased(true)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TeacherModel {
    pub user: UserModel,
    pub employee_id: Required<i64>,
}

impl Model for TeacherModel {
    fn describe(schema: &mut SchemaBuilder<Self>) {
        schema
            .inherit(|m| &m.user, |m| &mut m.user)
            .field("employeeId", |m| &m.employee_id, |m| &mut m.employee_id);
    }

    fn options(&self) -> ModelOptions {
        ModelOptions::new().snake_cased(true)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ClassroomModel {
    pub id: Required<i64>,
    pub name: Required<String>,
    pub grade_average: Required<f64>,
    pub days_of_the_week: Vec<Day>,
    pub students: Vec<StudentModel>,
    pub teacher: TeacherModel,
}

impl Model for ClassroomModel {
    fn describe(schema: &mut SchemaBuilder<Self>) {
        schema
            .field("id", |m| &m.id, |m| &mut m.id)
            .field("name", |m| &m.name, |m| &mut m.name)
            .field("gradeAverage", |m| &m.grade_average, |m| &mut m.grade_average)
            .custom("daysOfTheWeek", |m| &m.days_of_the_week, |m| &mut m.days_of_the_week)
            .nested_list("students", |m| &m.students, |m| &mut m.students)
            .nested("teacher", |m| &m.teacher, |m| &mut m.teacher);
    }

    fn options(&self) -> ModelOptions {
        ModelOptions::new()
            .snake_cased(true)
            .with_converter(day_list_converter())
    }
}

/// Model whose options depend on the instance
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OptionsModel {
    pub snake_cased: bool,
    pub id: Required<i64>,
    pub is_valid: Required<bool>,
    pub time: Option<NaiveDateTime>,
    pub created_on: Option<NaiveDateTime>,
    pub pin: Required<String>,
}

impl OptionsModel {
    pub fn snake_cased() -> Self {
        Self {
            snake_cased: true,
            ..Self::default()
        }
    }
}

impl Model for OptionsModel {
    fn describe(schema: &mut SchemaBuilder<Self>) {
        schema
            .field("snakeCased", |m| &m.snake_cased, |m| &mut m.snake_cased)
            .field("id", |m| &m.id, |m| &mut m.id)
            .field("isValid", |m| &m.is_valid, |m| &mut m.is_valid)
            .field("time", |m| &m.time, |m| &mut m.time)
            .field("createdOn", |m| &m.created_on, |m| &mut m.created_on)
            .field("pin", |m| &m.pin, |m| &mut m.pin);
    }

    fn options(&self) -> ModelOptions {
        ModelOptions::new()
            .snake_cased(self.snake_cased)
            .hide("snakeCased")
            .hide("pin")
            .with_converter(built_in::date_for_type(TypeTag::Date, "%m/%d/%y"))
            .with_converter(built_in::date_for_field("time", "%H:%M"))
            .with_converter(built_in::bool_strings("isValid", "Yes", "No"))
    }
}

/// Dates read through the default coercer
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EventModel {
    pub starts_at: Option<NaiveDateTime>,
    pub noted: DateValue,
}

impl Model for EventModel {
    fn describe(schema: &mut SchemaBuilder<Self>) {
        schema
            .field("startsAt", |m| &m.starts_at, |m| &mut m.starts_at)
            .field("noted", |m| &m.noted, |m| &mut m.noted);
    }
}

/// Dates read in the instance's zone, plus one field pinned to UTC
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ZonedEventModel {
    pub zone: DateZone,
    pub starts_at: Option<NaiveDateTime>,
    pub logged_at: Option<NaiveDateTime>,
}

impl ZonedEventModel {
    pub fn in_zone(zone: DateZone) -> Self {
        Self {
            zone,
            ..Self::default()
        }
    }
}

impl Model for ZonedEventModel {
    fn describe(schema: &mut SchemaBuilder<Self>) {
        schema
            .field("startsAt", |m| &m.starts_at, |m| &mut m.starts_at)
            .field("loggedAt", |m| &m.logged_at, |m| &mut m.logged_at);
    }

    fn options(&self) -> ModelOptions {
        ModelOptions::new()
            .time_zone(self.zone)
            .with_converter(built_in::date_in_zone("loggedAt", "%Y-%m-%d %H:%M", DateZone::Utc))
    }
}

pub fn my_address() -> Value {
    json!({
        "id": 1,
        "streetAddress": "123 1st Street",
        "extendedAddress": null,
        "city": "San Diego",
        "state": "California",
        "zipcode": "92093"
    })
}

pub fn friend(id: i64, first: &str, last: &str, address_id: i64, city: &str) -> Value {
    json!({
        "id": id,
        "firstName": first,
        "middleName": null,
        "lastName": last,
        "facebookId": null,
        "address": {
            "id": address_id,
            "streetAddress": "42 West Street",
            "extendedAddress": null,
            "city": city,
            "state": "California",
            "zipcode": "95062"
        },
        "friends": []
    })
}

pub fn me() -> Value {
    json!({
        "id": 1,
        "firstName": "Nicholas",
        "middleName": null,
        "lastName": "Mata",
        "facebookId": null,
        "birthday": "02/18/94",
        "address": my_address(),
        "friends": [
            friend(3, "Baoquan", "Dinh", 5, "San Jose"),
            friend(15, "Ignacio", "Sepulveda", 72, "Torrance")
        ]
    })
}

pub fn my_classroom() -> Value {
    json!({
        "id": 1,
        "name": "Computer Science",
        "grade_average": 75.6,
        "days_of_the_week": [0, 2, 4],
        "students": [
            {"id": 654, "first_name": "Nicholas", "last_name": "Mata"},
            {"id": 134, "first_name": "Baoquan", "last_name": "Dinh"}
        ],
        "teacher": {"id": 194, "first_name": "Jake", "last_name": "Amberson", "employee_id": 83}
    })
}
