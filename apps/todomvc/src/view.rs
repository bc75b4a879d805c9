//! HTML rendering of the to-do page.
//!
//! Rendering is a pure function of [`TodoState`]. Interactive elements carry
//! stable `data-cy` attributes so browser tests can address them.

use crate::types::{ErrorMessage, Filter, TodoItem, TodoState};

/// Render the whole page
#[must_use]
pub fn render_page(state: &TodoState) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    if state.loading {
        // Poll until the initial fetch settles
        html.push_str("<meta http-equiv=\"refresh\" content=\"1\">\n");
    }
    html.push_str("<title>Todos</title>\n</head>\n<body>\n<div class=\"todoapp\">\n");
    html.push_str("<h1 class=\"todoapp__title\">todos</h1>\n<div class=\"todoapp__content\">\n");

    html.push_str(&render_header(state));
    html.push_str(&render_list(state));
    if !state.is_empty() {
        html.push_str(&render_footer(state.remaining_count(), state.filter));
    }

    html.push_str("</div>\n");
    html.push_str(&render_error(state.error));
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

fn render_header(state: &TodoState) -> String {
    let toggle_class = if state.all_completed() {
        "todoapp__toggle-all active"
    } else {
        "todoapp__toggle-all"
    };

    format!(
        "<header class=\"todoapp__header\">\n\
         <form method=\"post\" action=\"/todos/toggle-all\">\
         <button type=\"submit\" class=\"{toggle_class}\" data-cy=\"ToggleAllButton\"></button>\
         </form>\n\
         <form method=\"post\" action=\"/todos\">\
         <input data-cy=\"NewTodoField\" type=\"text\" name=\"title\" class=\"todoapp__new-todo\" \
         placeholder=\"What needs to be done?\" value=\"{draft}\" autofocus>\
         </form>\n\
         </header>\n",
        draft = escape(&state.draft),
    )
}

fn render_list(state: &TodoState) -> String {
    let mut html = String::from("<section class=\"todoapp__main\" data-cy=\"TodoList\">\n");

    if state.loading {
        html.push_str(
            "<div data-cy=\"TodoLoader\" class=\"modal overlay\">\
             <div class=\"modal-background has-background-white-ter\"></div>\
             <div class=\"loader\"></div></div>\n",
        );
    } else {
        for todo in state.visible_todos() {
            html.push_str(&render_todo(todo));
        }
    }

    html.push_str("</section>\n");
    html
}

/// Render one todo row
#[must_use]
pub fn render_todo(todo: &TodoItem) -> String {
    let id = todo.id;
    let (class, checked) = if todo.completed {
        ("todo completed", " checked")
    } else {
        ("todo", "")
    };

    format!(
        "<div data-cy=\"Todo\" class=\"{class}\">\
         <form method=\"post\" action=\"/todos/{id}/toggle\">\
         <label class=\"todo__status-label\" for=\"todo-checkbox-{id}\">Toggle completed\
         <input id=\"todo-checkbox-{id}\" data-cy=\"TodoStatus\" type=\"checkbox\" class=\"todo__status\"{checked} \
         onchange=\"this.form.submit()\"></label>\
         </form>\
         <span data-cy=\"TodoTitle\" class=\"todo__title\">{title}</span>\
         <form method=\"post\" action=\"/todos/{id}/delete\">\
         <button type=\"submit\" class=\"todo__remove\" data-cy=\"TodoDelete\">×</button>\
         </form>\
         </div>\n",
        title = escape(&todo.title),
    )
}

/// "1 item left" / "N items left"
#[must_use]
pub fn items_left(remaining: usize) -> String {
    let noun = if remaining == 1 { "item" } else { "items" };
    format!("{remaining} {noun} left")
}

/// Render the footer: remaining count, filter links and clear-completed
#[must_use]
pub fn render_footer(remaining: usize, current: Filter) -> String {
    let mut html = format!(
        "<footer class=\"todoapp__footer\" data-cy=\"Footer\">\n\
         <span class=\"todo-count\" data-cy=\"TodosCounter\">{}</span>\n\
         <nav class=\"filter\" data-cy=\"Filter\">\n",
        items_left(remaining),
    );

    for filter in Filter::ALL {
        let class = if filter == current {
            "filter__link selected"
        } else {
            "filter__link"
        };
        html.push_str(&format!(
            "<a href=\"{href}\" class=\"{class}\" data-cy=\"FilterLink{label}\">{label}</a>\n",
            href = filter.path(),
            label = filter.label(),
        ));
    }

    html.push_str(
        "</nav>\n\
         <form method=\"post\" action=\"/todos/clear-completed\">\
         <button type=\"submit\" class=\"todoapp__clear-completed\" data-cy=\"ClearCompletedButton\">\
         Clear completed</button></form>\n\
         </footer>\n",
    );
    html
}

fn render_error(error: Option<ErrorMessage>) -> String {
    let class = if error.is_some() {
        "notification is-danger is-light has-text-weight-normal"
    } else {
        "notification is-danger is-light has-text-weight-normal hidden"
    };

    format!(
        "<div data-cy=\"ErrorNotification\" class=\"{class}\">\
         <form method=\"post\" action=\"/error/dismiss\">\
         <button data-cy=\"HideErrorButton\" type=\"submit\" class=\"delete\"></button>\
         </form>{text}</div>\n",
        text = error.map(ErrorMessage::text).unwrap_or_default(),
    )
}

/// Escape text for use in HTML content and attribute values
#[must_use]
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
