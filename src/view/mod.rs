use maud::{DOCTYPE, Markup, html};

pub mod admin;
pub mod index;
pub mod score;
pub mod standings;

/// Page shell shared by every full page: head, nav, and the body content.
#[must_use]
pub fn render_layout(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                link rel="stylesheet" type="text/css" href="static/styles.css";
                title { (title) }
                script src=(crate::HTMX_PATH) {}
            }
            body {
                nav class="navbar" {
                    a href="/" { "Home" }
                    a href="/standings?view=weekly" { "Weekly" }
                    a href="/standings?view=season" { "Season" }
                }
                main { (content) }
            }
        }
    }
}

/// Inline error banner used above forms.
#[must_use]
pub fn render_error(message: &str) -> Markup {
    html! {
        div class="error" role="alert" { (message) }
    }
}
