//! Page rendering. Templates are compiled into the binary.

use api::SessionIdentity;
use axum::response::Html;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Login,
    Register,
    Documentation,
}

impl Page {
    pub fn name(self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Login => "login",
            Page::Register => "register",
            Page::Documentation => "documentation",
        }
    }

    fn template(self) -> &'static str {
        match self {
            Page::Home => include_str!("../templates/home.html"),
            Page::Login => include_str!("../templates/login.html"),
            Page::Register => include_str!("../templates/register.html"),
            Page::Documentation => include_str!("../templates/documentation.html"),
        }
    }
}

/// Render a page that needs no per-user data.
pub fn render(page: Page) -> Html<&'static str> {
    tracing::trace!(page = page.name(), "render");
    Html(page.template())
}

/// Render the protected documentation page for `identity`.
pub fn render_documentation(identity: &SessionIdentity) -> Html<String> {
    let name = escape(identity.greeting_name());
    Html(Page::Documentation.template().replace("{{name}}", &name))
}

fn escape(text: &str) -> String {
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
