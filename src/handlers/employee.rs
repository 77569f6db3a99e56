use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use validator::Validate;

use crate::errors::AppError;
use crate::models::cafe::Cafe;
use crate::models::employee::Employee;
use crate::reports;
use crate::utils::ids;
use crate::utils::validation::{
    validate_email_address, validate_gender, validate_payload, validate_phone_number,
};

#[derive(Deserialize, Validate)]
pub struct NewEmployee {
    #[validate(length(min = 1))]
    name: String,
    #[validate(custom = "validate_email_address")]
    email_address: String,
    #[validate(custom = "validate_phone_number")]
    phone_number: String,
    #[validate(custom = "validate_gender")]
    gender: String,
    #[serde(rename = "cafeId")]
    cafe_id: String,
}

/// Allow-listed partial update. `id` is accepted into the struct only so the
/// handler can reject the mutation attempt explicitly.
#[derive(Deserialize, Validate)]
pub struct EmployeeUpdate {
    id: Option<String>,
    #[validate(length(min = 1))]
    name: Option<String>,
    #[validate(custom = "validate_email_address")]
    email_address: Option<String>,
    #[validate(custom = "validate_phone_number")]
    phone_number: Option<String>,
    #[validate(custom = "validate_gender")]
    gender: Option<String>,
    #[serde(rename = "cafeId")]
    cafe_id: Option<String>,
}

#[derive(Deserialize)]
pub struct EmployeeQueryParams {
    cafe: Option<String>,
}

#[derive(Serialize)]
struct EmployeeDetail {
    id: String,
    name: String,
    email_address: String,
    phone_number: String,
    gender: String,
    start_date: chrono::DateTime<Utc>,
    cafe: Option<Cafe>,
}

async fn find_employee(pool: &sqlx::PgPool, id: &str) -> Result<Option<Employee>, AppError> {
    let employee = sqlx::query_as::<_, Employee>(
        "SELECT id, name, email_address, phone_number, gender, cafe, start_date
         FROM employees WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(employee)
}

async fn find_cafe(pool: &sqlx::PgPool, id: &str) -> Result<Option<Cafe>, AppError> {
    let cafe = sqlx::query_as::<_, Cafe>(
        "SELECT id, name, description, location, logo FROM cafes WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(cafe)
}

pub async fn create_employee(
    pool: web::Data<sqlx::PgPool>,
    new_employee: web::Json<NewEmployee>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*new_employee)?;

    let new_employee = new_employee.into_inner();
    let cafe = find_cafe(&pool, &new_employee.cafe_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cafe not found".to_string()))?;

    let employee = Employee {
        id: ids::next_employee_id(&pool).await?,
        name: new_employee.name,
        email_address: new_employee.email_address,
        phone_number: new_employee.phone_number,
        gender: new_employee.gender,
        cafe: Some(cafe.id),
        start_date: Utc::now(),
    };

    sqlx::query(
        "INSERT INTO employees (id, name, email_address, phone_number, gender, cafe, start_date)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(&employee.id)
    .bind(&employee.name)
    .bind(&employee.email_address)
    .bind(&employee.phone_number)
    .bind(&employee.gender)
    .bind(&employee.cafe)
    .bind(employee.start_date)
    .execute(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(employee))
}

pub async fn get_employees(
    pool: web::Data<sqlx::PgPool>,
    query: web::Query<EmployeeQueryParams>,
) -> Result<HttpResponse, AppError> {
    let employees = match &query.cafe {
        Some(cafe_id) => {
            // Unknown cafe is a 404; a known cafe with no staff yields an
            // empty report.
            if find_cafe(&pool, cafe_id).await?.is_none() {
                return Err(AppError::NotFound("Cafe not found".to_string()));
            }
            sqlx::query_as::<_, Employee>(
                "SELECT id, name, email_address, phone_number, gender, cafe, start_date
                 FROM employees WHERE cafe = $1",
            )
            .bind(cafe_id)
            .fetch_all(&**pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Employee>(
                "SELECT id, name, email_address, phone_number, gender, cafe, start_date
                 FROM employees",
            )
            .fetch_all(&**pool)
            .await?
        }
    };

    let cafe_names: HashMap<String, String> =
        sqlx::query_as::<_, (String, String)>("SELECT id, name FROM cafes")
            .fetch_all(&**pool)
            .await?
            .into_iter()
            .collect();

    Ok(HttpResponse::Ok().json(reports::tenure_report(employees, &cafe_names, Utc::now())))
}

pub async fn get_employee(
    pool: web::Data<sqlx::PgPool>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let employee = find_employee(&pool, &id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    let cafe = match &employee.cafe {
        Some(cafe_id) => find_cafe(&pool, cafe_id).await?,
        None => None,
    };

    Ok(HttpResponse::Ok().json(EmployeeDetail {
        id: employee.id,
        name: employee.name,
        email_address: employee.email_address,
        phone_number: employee.phone_number,
        gender: employee.gender,
        start_date: employee.start_date,
        cafe,
    }))
}

/// Allow-list merge for partial updates. Rejects `id` mutation, applies the
/// provided fields, and re-stamps `start_date` when a new cafe assignment is
/// supplied (`new_cafe` is the already-resolved target).
fn apply_update(
    employee: &mut Employee,
    updates: EmployeeUpdate,
    new_cafe: Option<Cafe>,
    now: chrono::DateTime<Utc>,
) -> Result<(), AppError> {
    if updates.id.is_some() {
        return Err(AppError::InvalidArgument("Employee ID cannot be updated".to_string()));
    }

    if let Some(cafe) = new_cafe {
        // Transfer restarts the days-worked clock.
        employee.cafe = Some(cafe.id);
        employee.start_date = now;
    }
    if let Some(name) = updates.name {
        employee.name = name;
    }
    if let Some(email_address) = updates.email_address {
        employee.email_address = email_address;
    }
    if let Some(phone_number) = updates.phone_number {
        employee.phone_number = phone_number;
    }
    if let Some(gender) = updates.gender {
        employee.gender = gender;
    }
    Ok(())
}

pub async fn update_employee(
    pool: web::Data<sqlx::PgPool>,
    id: web::Path<String>,
    updates: web::Json<EmployeeUpdate>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*updates)?;

    let mut employee = find_employee(&pool, &id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    let updates = updates.into_inner();
    // An id mutation is rejected before the cafe reference is resolved, so
    // the lookup is skipped when the guard is going to fail anyway.
    let new_cafe = match &updates.cafe_id {
        Some(cafe_id) if updates.id.is_none() => Some(
            find_cafe(&pool, cafe_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Cafe not found".to_string()))?,
        ),
        _ => None,
    };
    apply_update(&mut employee, updates, new_cafe, Utc::now())?;

    sqlx::query(
        "UPDATE employees SET name = $1, email_address = $2, phone_number = $3, gender = $4,
         cafe = $5, start_date = $6 WHERE id = $7",
    )
    .bind(&employee.name)
    .bind(&employee.email_address)
    .bind(&employee.phone_number)
    .bind(&employee.gender)
    .bind(&employee.cafe)
    .bind(employee.start_date)
    .bind(&employee.id)
    .execute(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(employee))
}

pub async fn delete_employee(
    pool: web::Data<sqlx::PgPool>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    if find_employee(&pool, &id).await?.is_none() {
        return Err(AppError::NotFound("Employee not found".to_string()));
    }

    sqlx::query("DELETE FROM employees WHERE id = $1")
        .bind(&id)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee deleted successfully",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn employee(start_date: chrono::DateTime<Utc>) -> Employee {
        Employee {
            id: "UI0000001".to_string(),
            name: "Ann Lee".to_string(),
            email_address: "ann@x.com".to_string(),
            phone_number: "91234567".to_string(),
            gender: "Female".to_string(),
            cafe: Some("cafe_1".to_string()),
            start_date,
        }
    }

    fn no_updates() -> EmployeeUpdate {
        EmployeeUpdate {
            id: None,
            name: None,
            email_address: None,
            phone_number: None,
            gender: None,
            cafe_id: None,
        }
    }

    fn cafe(id: &str) -> Cafe {
        Cafe {
            id: id.to_string(),
            name: "Joe's Café".to_string(),
            description: "Corner shop".to_string(),
            location: "Main St".to_string(),
            logo: None,
        }
    }

    #[test]
    fn id_mutation_is_rejected_and_nothing_changes() {
        let now = Utc::now();
        let mut subject = employee(now - Duration::days(5));
        let updates = EmployeeUpdate {
            id: Some("UI0000099".to_string()),
            name: Some("New Name".to_string()),
            ..no_updates()
        };

        let err = apply_update(&mut subject, updates, None, now).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
        assert_eq!(subject.id, "UI0000001");
        assert_eq!(subject.name, "Ann Lee");
    }

    #[test]
    fn reassignment_restamps_start_date() {
        let now = Utc::now();
        let mut subject = employee(now - Duration::days(90));
        let updates = EmployeeUpdate {
            cafe_id: Some("cafe_2".to_string()),
            ..no_updates()
        };

        apply_update(&mut subject, updates, Some(cafe("cafe_2")), now).unwrap();
        assert_eq!(subject.cafe.as_deref(), Some("cafe_2"));
        assert_eq!(subject.start_date, now);
    }

    #[test]
    fn update_without_cafe_keeps_start_date() {
        let now = Utc::now();
        let original_start = now - Duration::days(90);
        let mut subject = employee(original_start);
        let updates = EmployeeUpdate {
            phone_number: Some("81234567".to_string()),
            ..no_updates()
        };

        apply_update(&mut subject, updates, None, now).unwrap();
        assert_eq!(subject.phone_number, "81234567");
        assert_eq!(subject.start_date, original_start);
        assert_eq!(subject.cafe.as_deref(), Some("cafe_1"));
    }

    #[test]
    fn omitted_fields_are_left_unchanged() {
        let now = Utc::now();
        let mut subject = employee(now);
        let updates = EmployeeUpdate {
            name: Some("Ann Tan".to_string()),
            gender: Some("Female".to_string()),
            ..no_updates()
        };

        apply_update(&mut subject, updates, None, now).unwrap();
        assert_eq!(subject.name, "Ann Tan");
        assert_eq!(subject.email_address, "ann@x.com");
        assert_eq!(subject.phone_number, "91234567");
    }
}
