use crate::session::Session;
use axum::response::Html;
use core_types::Role;
use std::fmt::Display;

/// Escapes text for use in HTML bodies and attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Renders an optional value, blank when absent.
pub fn opt<T: Display>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn nav(session: Option<&Session>) -> String {
    let links: &[(&str, &str)] = match session.map(|s| s.role) {
        None => &[("/login", "Вход"), ("/register", "Регистрация")],
        Some(Role::User) => &[
            ("/user/vessels", "Суда"),
            ("/user/voyages", "Рейсы"),
            ("/user/crew", "Экипаж"),
            ("/user/visits", "Посещения банок"),
            ("/user/catches", "Улов"),
        ],
        Some(Role::Admin) => &[
            ("/admin/vessels", "Суда"),
            ("/admin/banks", "Банки"),
            ("/admin/reports", "Отчёты"),
        ],
    };
    let mut html = String::from("<nav><a href=\"/\">Главная</a>");
    for (href, label) in links {
        html.push_str(&format!(" | <a href=\"{href}\">{label}</a>"));
    }
    if let Some(session) = session {
        html.push_str(&format!(
            " | {} ({}) <a href=\"/logout\">Выход</a>",
            escape(&session.username),
            session.role
        ));
    }
    html.push_str("</nav>");
    html
}

/// Wraps `body` (already HTML) in the site layout.
pub fn page(title: &str, session: Option<&Session>, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{title} · Fleetbook</title></head><body>\
{nav}<h1>{title}</h1>{body}</body></html>",
        title = escape(title),
        nav = nav(session),
    ))
}

pub fn message_page(title: &str, message: &str) -> Html<String> {
    page(title, None, &format!("<p>{}</p>", escape(message)))
}

/// A table of plain-text cells; every cell is escaped here.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return "<p>Нет данных.</p>".to_string();
    }
    let mut html = String::from("<table border=\"1\"><tr>");
    for header in headers {
        html.push_str(&format!("<th>{}</th>", escape(header)));
    }
    html.push_str("</tr>");
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");
    html
}

/// One labelled `<input>`. `kind` is the HTML input type.
pub fn input(name: &str, label: &str, kind: &str, required: bool) -> String {
    let required = if required { " required" } else { "" };
    format!("<label>{label} <input type=\"{kind}\" name=\"{name}\"{required}></label><br>")
}

/// One labelled `<select>` of `(value, label)` pairs.
pub fn select(name: &str, label: &str, options: &[(&str, &str)]) -> String {
    let mut html = format!("<label>{label} <select name=\"{name}\">");
    for (value, text) in options {
        html.push_str(&format!("<option value=\"{value}\">{text}</option>"));
    }
    html.push_str("</select></label><br>");
    html
}

fn form_with_method(method: &str, action: &str, fields: &[String], submit: &str) -> String {
    format!(
        "<form method=\"{method}\" action=\"{}\">{}<button type=\"submit\">{submit}</button></form>",
        escape(action),
        fields.concat()
    )
}

pub fn form(action: &str, fields: &[String], submit: &str) -> String {
    form_with_method("post", action, fields, submit)
}

/// A form that submits its fields as the query string of `action`.
pub fn get_form(action: &str, fields: &[String], submit: &str) -> String {
    form_with_method("get", action, fields, submit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_form_submits_as_query() {
        let html = get_form("/admin/reports/above_avg/2", &[input("date_from", "С", "date", false)], "Показать");
        assert!(html.starts_with("<form method=\"get\" action=\"/admin/reports/above_avg/2\">"));
        assert!(html.contains("name=\"date_from\""));
    }

    #[test]
    fn escape_neutralises_markup() {
        assert_eq!(
            escape("<script>alert(\"x\") & 'y'</script>"),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
        assert_eq!(escape("Шторм"), "Шторм");
    }

    #[test]
    fn table_escapes_cells_and_handles_empty() {
        let html = table(&["Судно"], &[vec!["<b>Storm</b>".to_string()]]);
        assert!(html.contains("<td>&lt;b&gt;Storm&lt;/b&gt;</td>"));
        assert_eq!(table(&["Судно"], &[]), "<p>Нет данных.</p>");
    }

    #[test]
    fn nav_depends_on_role() {
        let admin = Session { username: "anna".into(), role: Role::Admin };
        let html = page("Отчёты", Some(&admin), "").0;
        assert!(html.contains("/admin/reports"));
        assert!(!html.contains("/user/catches"));
        assert!(page("Вход", None, "").0.contains("/register"));
    }
}
