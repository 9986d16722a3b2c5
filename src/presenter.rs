//! Page contexts for the handlebars templates.
//!
//! Only formatting happens here; every number comes from a [`DashboardView`].

use crate::dashboard::DashboardView;
use crate::error::{GraphError, LoadError, PageError};
use crate::format::metric_cards;
use crate::graph::{hourly_sales_chart, product_sales_chart};
use crate::video::{PlayerState, VideoCatalog};
use handlebars::Handlebars;
use serde_json::{Value, json};

/// Render the landing page linking both pages
///
/// # Arguments
/// * `templates` - Registry from [`crate::templates::registry`]
/// * `catalog` - Episode list; only its title is shown
///
/// # Returns
/// * `Result<String, PageError>` - HTML or the rendering error
pub fn landing_page(templates: &Handlebars<'_>, catalog: &VideoCatalog) -> Result<String, PageError> {
    Ok(templates.render("landing", &json!({ "series_title": catalog.title }))?)
}

/// Context of the player page for one session.
pub fn player_context(catalog: &VideoCatalog, player: &PlayerState) -> Value {
    let buttons: Vec<Value> = catalog
        .episodes
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            json!({
                "index": index,
                "label": entry.button_label(),
                "selected": index == player.index(),
            })
        })
        .collect();

    json!({
        "title": catalog.title,
        "synopsis": catalog.synopsis,
        "current": player.current(catalog),
        "buttons": buttons,
    })
}

/// Render the player page for the episode `player` points at.
pub fn player_page(
    templates: &Handlebars<'_>,
    catalog: &VideoCatalog,
    player: &PlayerState,
) -> Result<String, PageError> {
    Ok(templates.render("player", &player_context(catalog, player))?)
}

/// Context of the dashboard page: sidebar controls, metric cards, both
/// charts as inline SVG and the raw rows.
pub fn dashboard_context(view: &DashboardView) -> Result<Value, GraphError> {
    Ok(json!({
        "row_count": view.filtered.len(),
        "controls": view.controls,
        "cards": metric_cards(&view.metrics),
        "hour_chart": hourly_sales_chart(&view.hourly_sales)?,
        "product_chart": product_sales_chart(&view.product_sales)?,
        "columns": view.filtered.display_columns(),
        "rows": view.filtered.display_rows(),
    }))
}

/// Render the dashboard page
///
/// # Arguments
/// * `templates` - Registry from [`crate::templates::registry`]
/// * `view` - One completed filter and aggregate run
///
/// # Returns
/// * `Result<String, PageError>` - HTML, or the chart or template error
pub fn dashboard_page(templates: &Handlebars<'_>, view: &DashboardView) -> Result<String, PageError> {
    let context = dashboard_context(view)?;
    Ok(templates.render("dashboard", &context)?)
}

/// Context of the page shown when the spreadsheet cannot be loaded.
pub fn load_error_context(error: &LoadError) -> Value {
    let (path, listing, missing) = match error {
        LoadError::MissingFile { path, listing } => {
            (Some(path.display().to_string()), listing.clone(), Vec::new())
        }
        LoadError::MissingColumns(columns) => (None, Vec::new(), columns.clone()),
        _ => (None, Vec::new(), Vec::new()),
    };

    json!({
        "message": error.to_string(),
        "path": path,
        "listing": listing,
        "missing": missing,
        "hints": error.hints(),
    })
}

/// Render the diagnostic page for a failed load.
pub fn load_error_page(templates: &Handlebars<'_>, error: &LoadError) -> Result<String, PageError> {
    Ok(templates.render("load_error", &load_error_context(error))?)
}
