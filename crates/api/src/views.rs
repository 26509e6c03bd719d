//! Server-rendered HTML pages.

use std::fmt::Write;

use axum::response::Html;
use fedigram_core::RegistrationPolicy;

/// Escape text for use in HTML content and attribute values.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap a body fragment in the page layout. `title` is escaped, `body` is not.
#[must_use]
pub fn page(instance_name: &str, title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} - {instance}</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        title = escape(title),
        instance = escape(instance_name),
    ))
}

/// The sign-up form.
#[must_use]
pub fn register_form(instance_name: &str, policy: &RegistrationPolicy) -> Html<String> {
    let mut body = String::new();
    let _ = write!(
        body,
        "<h1>Create a new account</h1>\n\
         <form method=\"POST\" action=\"/register\">\n\
         <input type=\"text\" name=\"name\" maxlength=\"{max_name}\" placeholder=\"Name\">\n\
         <input type=\"text\" name=\"username\" maxlength=\"15\" placeholder=\"Username\" required>\n\
         <input type=\"email\" name=\"email\" maxlength=\"255\" placeholder=\"Email\" required>\n\
         <input type=\"password\" name=\"password\" minlength=\"{min_password}\" placeholder=\"Password\" required>\n\
         <input type=\"password\" name=\"password_confirmation\" placeholder=\"Confirm Password\" required>\n\
         <label><input type=\"checkbox\" name=\"agecheck\" value=\"1\" required> I am at least 16 years old</label>\n",
        max_name = policy.max_name_length,
        min_password = policy.min_password_length,
    );
    if policy.captcha_enabled {
        body.push_str("<div class=\"h-captcha\"></div>\n");
    }
    body.push_str("<button type=\"submit\">Register</button>\n</form>");
    page(instance_name, "Register", &body)
}

/// A labelled list of rows for the deck pages.
#[must_use]
pub fn stat_list(rows: &[(&str, String)]) -> String {
    let mut out = String::from("<dl>\n");
    for (label, value) in rows {
        let _ = writeln!(out, "<dt>{}</dt><dd>{}</dd>", escape(label), escape(value));
    }
    out.push_str("</dl>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fedigram_common::config::RegistrationConfig;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<a href=\"x\">Tom & 'Jerry'</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_register_form_reflects_policy() {
        let mut config = RegistrationConfig::default();
        config.captcha_enabled = true;
        let Html(html) = register_form("Pix", &RegistrationPolicy::from_config(&config));

        assert!(html.contains("minlength=\"8\""));
        assert!(html.contains("name=\"agecheck\""));
        assert!(html.contains("h-captcha"));
        assert!(html.contains("<title>Register - Pix</title>"));
    }
}
