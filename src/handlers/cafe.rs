use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::cafe::Cafe;
use crate::reports;
use crate::utils::validation::validate_payload;

#[derive(Deserialize, Validate)]
pub struct NewCafe {
    id: Option<String>,
    #[validate(length(min = 1))]
    name: String,
    #[validate(length(min = 1, max = 256))]
    description: String,
    #[validate(length(min = 1))]
    location: String,
    logo: Option<String>,
}

/// Mutable-field allow-list for partial updates; anything else in the body is
/// ignored, except `id`, which is rejected outright.
#[derive(Deserialize, Validate)]
pub struct CafeUpdate {
    id: Option<String>,
    #[validate(length(min = 1))]
    name: Option<String>,
    #[validate(length(min = 1, max = 256))]
    description: Option<String>,
    #[validate(length(min = 1))]
    location: Option<String>,
    logo: Option<String>,
}

#[derive(Deserialize)]
pub struct CafeQueryParams {
    location: Option<String>,
}

#[derive(Serialize)]
struct CafeDetail {
    #[serde(flatten)]
    cafe: Cafe,
    employees: i64,
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

pub async fn create_cafe(
    pool: web::Data<sqlx::PgPool>,
    new_cafe: web::Json<NewCafe>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*new_cafe)?;

    let new_cafe = new_cafe.into_inner();
    let id = new_cafe
        .id
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM cafes WHERE id = $1)")
        .bind(&id)
        .fetch_one(&**pool)
        .await?;
    if exists {
        return Err(AppError::Conflict(format!("Cafe id '{}' already exists", id)));
    }

    let cafe = Cafe {
        id,
        name: new_cafe.name,
        description: new_cafe.description,
        location: new_cafe.location,
        logo: new_cafe.logo,
    };

    sqlx::query("INSERT INTO cafes (id, name, description, location, logo) VALUES ($1, $2, $3, $4, $5)")
        .bind(&cafe.id)
        .bind(&cafe.name)
        .bind(&cafe.description)
        .bind(&cafe.location)
        .bind(&cafe.logo)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Created().json(cafe))
}

pub async fn get_cafes(
    pool: web::Data<sqlx::PgPool>,
    query: web::Query<CafeQueryParams>,
) -> Result<HttpResponse, AppError> {
    let cafes = match &query.location {
        Some(location) => {
            sqlx::query_as::<_, Cafe>(
                "SELECT id, name, description, location, logo FROM cafes WHERE location = $1",
            )
            .bind(location)
            .fetch_all(&**pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Cafe>("SELECT id, name, description, location, logo FROM cafes")
                .fetch_all(&**pool)
                .await?
        }
    };

    let assignments = sqlx::query_scalar::<_, Option<String>>("SELECT cafe FROM employees")
        .fetch_all(&**pool)
        .await?;
    let counts = reports::count_assignments(&assignments);

    Ok(HttpResponse::Ok().json(reports::cafe_headcounts(cafes, &counts)))
}

pub async fn get_cafe(
    pool: web::Data<sqlx::PgPool>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    let cafe = find_cafe(&pool, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cafe not found".to_string()))?;

    let employees = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees WHERE cafe = $1")
        .bind(&id)
        .fetch_one(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(CafeDetail { cafe, employees }))
}

/// Allow-list merge for partial cafe updates; `id` mutation is rejected,
/// omitted fields keep their stored values.
fn apply_update(cafe: &mut Cafe, updates: CafeUpdate) -> Result<(), AppError> {
    if updates.id.is_some() {
        return Err(AppError::InvalidArgument("Cafe ID cannot be updated".to_string()));
    }
    if let Some(name) = updates.name {
        cafe.name = name;
    }
    if let Some(description) = updates.description {
        cafe.description = description;
    }
    if let Some(location) = updates.location {
        cafe.location = location;
    }
    if let Some(logo) = updates.logo {
        cafe.logo = Some(logo);
    }
    Ok(())
}

pub async fn update_cafe(
    pool: web::Data<sqlx::PgPool>,
    id: web::Path<String>,
    updates: web::Json<CafeUpdate>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*updates)?;

    let id = id.into_inner();
    let mut cafe = find_cafe(&pool, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cafe not found".to_string()))?;

    apply_update(&mut cafe, updates.into_inner())?;

    sqlx::query("UPDATE cafes SET name = $1, description = $2, location = $3, logo = $4 WHERE id = $5")
        .bind(&cafe.name)
        .bind(&cafe.description)
        .bind(&cafe.location)
        .bind(&cafe.logo)
        .bind(&cafe.id)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(cafe))
}

/// Dependent employees and the cafe go in one transaction, employees first,
/// so a failure never leaves orphaned references.
pub async fn delete_cafe(
    pool: web::Data<sqlx::PgPool>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    if find_cafe(&pool, &id).await?.is_none() {
        return Err(AppError::NotFound("Cafe not found".to_string()));
    }

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM employees WHERE cafe = $1")
        .bind(&id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM cafes WHERE id = $1")
        .bind(&id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Cafe and its employees deleted successfully",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cafe() -> Cafe {
        Cafe {
            id: "cafe_1".to_string(),
            name: "Joe's Café".to_string(),
            description: "Corner shop".to_string(),
            location: "Main St".to_string(),
            logo: None,
        }
    }

    fn no_updates() -> CafeUpdate {
        CafeUpdate {
            id: None,
            name: None,
            description: None,
            location: None,
            logo: None,
        }
    }

    #[test]
    fn id_mutation_is_rejected_and_nothing_changes() {
        let mut subject = cafe();
        let updates = CafeUpdate {
            id: Some("cafe_2".to_string()),
            name: Some("New Name".to_string()),
            ..no_updates()
        };

        let err = apply_update(&mut subject, updates).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
        assert_eq!(subject.id, "cafe_1");
        assert_eq!(subject.name, "Joe's Café");
    }

    #[test]
    fn omitted_fields_are_left_unchanged() {
        let mut subject = cafe();
        let updates = CafeUpdate {
            description: Some("Renovated corner shop".to_string()),
            logo: Some("/img/joes.png".to_string()),
            ..no_updates()
        };

        apply_update(&mut subject, updates).unwrap();
        assert_eq!(subject.description, "Renovated corner shop");
        assert_eq!(subject.logo.as_deref(), Some("/img/joes.png"));
        assert_eq!(subject.name, "Joe's Café");
        assert_eq!(subject.location, "Main St");
    }
}
