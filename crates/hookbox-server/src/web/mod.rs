// ABOUTME: Web UI route handler serving the static index page via an Askama template.
// ABOUTME: The page drives the /webhook and /ai/run endpoints from the browser and keeps no state.

use askama::Template;
use askama_derive_axum::IntoResponse as AskamaIntoResponse;

/// Index page with forms for append, delete, list, and inference.
#[derive(Template, AskamaIntoResponse)]
#[template(path = "index.html")]
pub struct IndexTemplate {}

/// GET / - Render the main index page.
pub async fn index() -> IndexTemplate {
    IndexTemplate {}
}
