//! Request/response shapes for projects, plots, customers, and executives.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Customer, Executive, ExecutiveRole, Plot, PlotStatus, Project};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 32))]
    pub code: String,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: String,
    pub name: String,
    pub code: String,
    pub location: String,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Project> for ProjectResponse {
    fn from(p: Project) -> Self {
        Self {
            id: p.id,
            name: p.name,
            code: p.code,
            location: p.location,
            description: p.description,
            active: p.active,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlotRequest {
    #[validate(length(min = 1))]
    pub project_id: String,
    #[validate(length(min = 1, max = 32))]
    pub plot_number: String,
    #[validate(range(min = 0.01))]
    pub size_sqft: f64,
    #[validate(range(min = 0.01))]
    pub rate_per_sqft: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlotRequest {
    pub size_sqft: Option<f64>,
    pub rate_per_sqft: Option<f64>,
    pub status: Option<PlotStatus>,
}

#[derive(Debug, Deserialize)]
pub struct PlotListParams {
    pub project_id: Option<String>,
    pub status: Option<PlotStatus>,
}

#[derive(Debug, Serialize)]
pub struct PlotResponse {
    pub id: String,
    pub project_id: String,
    pub plot_number: String,
    pub size_sqft: f64,
    pub rate_per_sqft: f64,
    pub total_value: f64,
    pub status: PlotStatus,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Plot> for PlotResponse {
    fn from(p: Plot) -> Self {
        Self {
            id: p.id,
            project_id: p.project_id,
            plot_number: p.plot_number,
            size_sqft: p.size_sqft,
            rate_per_sqft: p.rate_per_sqft,
            total_value: p.total_value,
            status: p.status,
            active: p.active,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 5, max = 20))]
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
    #[validate(length(min = 1))]
    pub project_id: String,
    #[validate(length(min = 1))]
    pub plot_id: String,
    pub executive_id: Option<String>,
    #[validate(range(min = 0.01))]
    pub deal_value: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub executive_id: Option<String>,
    pub deal_value: Option<f64>,
    pub active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub project_id: String,
    pub plot_id: String,
    pub executive_id: Option<String>,
    pub deal_value: f64,
    pub paid_amount: f64,
    pub balance_amount: f64,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Customer> for CustomerResponse {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id,
            name: c.name,
            phone: c.phone,
            email: c.email,
            address: c.address,
            project_id: c.project_id,
            plot_id: c.plot_id,
            executive_id: c.executive_id,
            deal_value: c.deal_value,
            paid_amount: c.paid_amount,
            balance_amount: c.balance_amount,
            active: c.active,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateExecutiveRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 5, max = 20))]
    pub phone: String,
    pub role: ExecutiveRole,
}

#[derive(Debug, Serialize)]
pub struct ExecutiveResponse {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub role: ExecutiveRole,
    pub active: bool,
    pub created_at: String,
}

impl From<Executive> for ExecutiveResponse {
    fn from(e: Executive) -> Self {
        Self {
            id: e.id,
            name: e.name,
            phone: e.phone,
            role: e.role,
            active: e.active,
            created_at: e.created_at.to_rfc3339(),
        }
    }
}
