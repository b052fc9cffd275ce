use axum::response::Html;

/// Marketing page. `/auth` and `/auth?action=signup` are pages of the web
/// client served in front of this API; they drive the `/api/v1/auth/*` and
/// `/api/v1/registration/*` endpoints.
const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>SOS Jobs</title>
  <meta name="description" content="Connect employers, agencies, and job seekers">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <link rel="icon" href="/favicon.ico">
</head>
<body>
  <main>
    <h1>Welcome to SOS Jobs</h1>
    <nav>
      <a href="/auth">Sign In</a>
      <a href="/auth?action=signup">Sign Up</a>
    </nav>
  </main>
</body>
</html>
"#;

/// GET /
pub async fn landing_handler() -> Html<&'static str> {
    Html(LANDING_PAGE)
}
