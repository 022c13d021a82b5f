use axum::{extract::State, response::Html};
use taramock_oidc::{html_escape, OidcState};

/// Handler for the landing page (GET /).
///
/// Lists the provider endpoints and the identities available for login.
pub async fn index(State(state): State<OidcState>) -> Html<String> {
    let config = &state.config;

    let endpoints = [
        ("Discovery", config.endpoint("/.well-known/openid-configuration")),
        ("Authorization", config.endpoint("/oidc/authorize")),
        ("Token", config.endpoint("/oidc/token")),
        ("JWKS", config.endpoint("/oidc/jwks")),
        ("Health", config.endpoint("/health")),
    ]
    .iter()
    .map(|(name, url)| {
        let url = html_escape(url);
        format!(r#"<li>{name}: <a href="{url}"><code>{url}</code></a></li>"#)
    })
    .collect::<Vec<_>>()
    .join("\n");

    let identities = state
        .identities
        .identities()
        .iter()
        .map(|identity| {
            format!(
                "<tr><td><code>{}</code></td><td>{}</td><td>{}</td></tr>",
                html_escape(&identity.sub),
                html_escape(&identity.given_name),
                html_escape(&identity.family_name),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8" />
    <title>TARA-Mock</title>
    <link rel="stylesheet" href="/static/style.css" />
</head>
<body>
    <h1>TARA-Mock</h1>
    <p>Issuer: <code>{issuer}</code></p>
    <h2>Endpoints</h2>
    <ul>
{endpoints}
    </ul>
    <h2>Identities</h2>
    <p>The first identity is used unless the request selects another with
    <code>login_hint</code> or asks for <code>prompt=select_account</code>.</p>
    <table>
        <tr><th>Subject</th><th>Given name</th><th>Family name</th></tr>
{identities}
    </table>
</body>
</html>"#,
        issuer = html_escape(&config.issuer),
    ))
}
