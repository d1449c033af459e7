//! Route listing served at the root

use axum::response::Html;

use super::v1::API_PREFIX;

/// GET /
pub async fn list_routes() -> Html<String> {
    Html(routes_page())
}

fn routes_page() -> String {
    [
        "Available Routes:<br/>".to_string(),
        format!("{API_PREFIX}/precipitation<br/>"),
        format!("{API_PREFIX}/stations<br/>"),
        format!("{API_PREFIX}/tobs<br/>"),
        format!("{API_PREFIX}/&lt;startdate&gt;<br/>"),
        format!("{API_PREFIX}/&lt;startdate&gt;/&lt;enddate&gt;<br/><br/>"),
        "(Write 'startdate' and 'enddate' in YYYY-MM-DD format, examples below)<br/>".to_string(),
        format!("{API_PREFIX}/2016-05-31<br/>"),
        format!("{API_PREFIX}/2016-05-31/2016-08-25"),
    ]
    .concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_page_lists_every_endpoint() {
        let page = routes_page();

        for path in [
            "/api/v1.0/precipitation",
            "/api/v1.0/stations",
            "/api/v1.0/tobs",
            "/api/v1.0/&lt;startdate&gt;",
            "/api/v1.0/&lt;startdate&gt;/&lt;enddate&gt;",
            "/api/v1.0/2016-05-31/2016-08-25",
        ] {
            assert!(page.contains(path), "missing {path}");
        }
    }
}
