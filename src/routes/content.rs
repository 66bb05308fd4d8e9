//! Read-only section endpoints.

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::content::{ALL_CATEGORIES, BlogPost, Certification, PortfolioContent, Project, Theme};
use crate::state::AppState;

pub const DEFAULT_BLOG_TEASER_LIMIT: usize = 3;
pub const MAX_BLOG_LIMIT: usize = 50;

pub async fn get_content(State(state): State<AppState>) -> Json<PortfolioContent> {
    Json(state.content.as_ref().clone())
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectsQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectsResponse {
    pub category: String,
    pub categories: Vec<String>,
    pub projects: Vec<Project>,
    /// Highlighted projects, independent of the filter.
    pub featured: Vec<Project>,
}

pub async fn list_projects(State(state): State<AppState>, Query(query): Query<ProjectsQuery>) -> Json<ProjectsResponse> {
    let category = query
        .category
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| ALL_CATEGORIES.to_string());
    let projects = state
        .content
        .projects_in(&category)
        .into_iter()
        .cloned()
        .collect();
    let categories = state
        .content
        .categories()
        .into_iter()
        .map(str::to_string)
        .collect();
    let featured = state
        .content
        .featured_projects()
        .into_iter()
        .cloned()
        .collect();
    Json(ProjectsResponse { category, categories, projects, featured })
}

#[derive(Debug, Default, Deserialize)]
pub struct BlogQuery {
    pub limit: Option<usize>,
}

pub async fn latest_posts(State(state): State<AppState>, Query(query): Query<BlogQuery>) -> Json<Vec<BlogPost>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_BLOG_TEASER_LIMIT)
        .min(MAX_BLOG_LIMIT);
    Json(state.content.latest_posts(limit).into_iter().cloned().collect())
}

pub async fn list_certifications(State(state): State<AppState>) -> Json<Vec<Certification>> {
    Json(state.content.certifications.clone())
}

pub async fn get_theme(State(state): State<AppState>) -> Json<Theme> {
    Json(state.content.theme.clone())
}

#[cfg(test)]
#[path = "content_test.rs"]
mod tests;
