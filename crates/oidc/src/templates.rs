//! HTML pages of the simulated login screen.

use taramock_core::identity::Identity;

/// Escape HTML special characters to prevent XSS.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Request values carried through the identity-selection page to `/back`.
pub struct SelectionForm<'a> {
    pub client_id: &'a str,
    pub redirect_uri: &'a str,
    pub state: Option<&'a str>,
    pub nonce: Option<&'a str>,
    pub govsso_login_challenge: Option<&'a str>,
}

impl SelectionForm<'_> {
    fn hidden_fields(&self) -> String {
        let mut fields = vec![
            hidden("client_id", self.client_id),
            hidden("redirect_uri", self.redirect_uri),
        ];
        if let Some(state) = self.state {
            fields.push(hidden("state", state));
        }
        if let Some(nonce) = self.nonce {
            fields.push(hidden("nonce", nonce));
        }
        if let Some(challenge) = self.govsso_login_challenge {
            fields.push(hidden("govsso_login_challenge", challenge));
        }
        fields.join("\n        ")
    }
}

fn hidden(name: &str, value: &str) -> String {
    format!(
        r#"<input type="hidden" name="{}" value="{}" />"#,
        name,
        html_escape(value)
    )
}

/// Page that lets the tester pick which identity to authenticate as.
///
/// Every form submits with GET to `/back`, which mints the code.
pub fn select_identity_page(form: &SelectionForm<'_>, identities: &[Identity]) -> String {
    let hidden = form.hidden_fields();

    let identity_forms: String = identities
        .iter()
        .map(|identity| {
            format!(
                r#"
    <form class="identity" action="/back" method="GET">
        {hidden}
        <input type="hidden" name="sub" value="{sub}" />
        <button type="submit">{given} {family} <span class="sub">{sub}</span></button>
    </form>"#,
                hidden = hidden,
                sub = html_escape(&identity.sub),
                given = html_escape(&identity.given_name),
                family = html_escape(&identity.family_name),
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8" />
    <title>TARA-Mock sign in</title>
    <link rel="stylesheet" href="/static/style.css" />
</head>
<body>
    <div class="warning">
        <h2>Test use only</h2>
        <p>This is a <strong>mock authentication service</strong>. No credentials are checked.</p>
        <p>Client <code>{client_id}</code> is asking you to sign in. Choose an identity:</p>
    </div>
{identity_forms}

    <form class="custom" action="/back" method="GET">
        {hidden}
        <label for="sub">Subject</label>
        <input type="text" id="sub" name="sub" placeholder="EE60001019906" required />

        <label for="given_name">Given name</label>
        <input type="text" id="given_name" name="given_name" />

        <label for="family_name">Family name</label>
        <input type="text" id="family_name" name="family_name" />

        <button type="submit">Sign in as this identity</button>
    </form>
</body>
</html>"#,
        client_id = html_escape(form.client_id),
    )
}

/// Local error page for requests that cannot be redirected back.
pub fn error_page(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8" />
    <title>TARA-Mock error</title>
    <link rel="stylesheet" href="/static/style.css" />
</head>
<body>
    <div class="error">
        <h2>Authentication request failed</h2>
        <p>{}</p>
    </div>
</body>
</html>"#,
        html_escape(message)
    )
}
