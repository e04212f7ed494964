//! Employee endpoints
//!
//! | Method | Path | Operation |
//! |---|---|---|
//! | POST | /employees | create |
//! | GET | /employees?department=X | list by department |
//! | GET | /employees/avg-salary | average salary per department |
//! | GET | /employees/search?skill=X | skill search |
//! | GET / PUT / DELETE | /employees/{id} | get / partial update / delete |

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use roster_core::model::PaginationParams;
use roster_core::{Employee, FieldPatch, NewEmployee, SalaryAverages, ValidationError};

use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ApiQuery};
use crate::state::AppState;

/// Query parameters for GET /employees
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub department: Option<String>,
    pub page: Option<u32>,
    #[serde(alias = "limit")]
    pub per_page: Option<u32>,
}

/// Query parameters for GET /employees/search
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub skill: Option<String>,
}

/// Delete confirmation
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub status: &'static str,
    pub message: String,
}

/// POST /employees - create a new employee
async fn create_employee(
    State(state): State<Arc<AppState>>,
    ApiJson(new): ApiJson<NewEmployee>,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    let employee = state.employees().create(new).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// GET /employees - list employees, optionally by department
async fn list_employees(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    let page = PaginationParams {
        page: params.page,
        per_page: params.per_page,
    }
    .into_pagination();

    let employees = state
        .employees()
        .list_by_department(params.department.as_deref(), page)
        .await?;
    Ok(Json(employees))
}

/// GET /employees/avg-salary - mean salary per department
async fn average_salary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SalaryAverages>, ApiError> {
    let averages = state.employees().average_salary_by_department().await?;
    Ok(Json(averages))
}

/// GET /employees/search - employees holding a skill
async fn search_employees(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    let skill = params
        .skill
        .ok_or(ValidationError::Missing { field: "skill" })?;
    let employees = state.employees().search_by_skill(&skill).await?;
    Ok(Json(employees))
}

/// GET /employees/{id} - get a single employee
async fn get_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Employee>, ApiError> {
    let employee = state.employees().get(&id).await?;
    Ok(Json(employee))
}

/// PUT /employees/{id} - partial update
async fn update_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<serde_json::Value>,
) -> Result<Json<Employee>, ApiError> {
    let patch = FieldPatch::from_json(body)?;
    let employee = state.employees().update(&id, patch).await?;
    Ok(Json(employee))
}

/// DELETE /employees/{id} - remove an employee
async fn delete_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.employees().delete(&id).await?;
    Ok(Json(DeleteResponse {
        status: "success",
        message: format!("Employee {} deleted", id),
    }))
}

/// Employee routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/avg-salary", get(average_salary))
        .route("/employees/search", get(search_employees))
        .route(
            "/employees/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}
