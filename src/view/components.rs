use super::escape;
use crate::domain::{ShowFilter, Todo};

const DATASTAR_SCRIPT: &str =
    "https://cdn.jsdelivr.net/gh/starfederation/datastar@1.0.0-RC.6/bundles/datastar.js";

/// Full HTML page wrapping `body`.
///
/// The page opens the live stream at `/endpoint` as soon as it loads.
#[must_use]
pub fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<script type="module" src="{DATASTAR_SCRIPT}"></script>
</head>
<body data-init="@get('/endpoint', {{openWhenHidden: true}})">
{body}
</body>
</html>"#,
        title = escape(title),
    )
}

/// List view with the filter selector.
#[must_use]
pub fn todo_list(todos: &[Todo], show: ShowFilter) -> String {
    let mut html = String::from("<main id=\"view\">\n<header>\n<h1>Todos</h1>\n");
    html.push_str("<select data-bind:show data-on:change=\"@get('/')\">\n");
    for option in [ShowFilter::Open, ShowFilter::Done, ShowFilter::All] {
        let selected = if option == show { " selected" } else { "" };
        html.push_str(&format!(
            "<option value=\"{value}\"{selected}>{value}</option>\n",
            value = option.as_str(),
        ));
    }
    html.push_str("</select>\n");
    html.push_str("<button data-on:click=\"@get('/todos/new')\">New todo</button>\n</header>\n");

    if todos.is_empty() {
        html.push_str("<p class=\"empty\">Nothing here.</p>\n");
    } else {
        html.push_str("<ul id=\"todos\">\n");
        for todo in todos {
            html.push_str(&todo_item(todo));
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</main>");
    html
}

fn todo_item(todo: &Todo) -> String {
    let id = todo.id;
    let class = if todo.done { "done" } else { "open" };
    let complete = if todo.done {
        String::new()
    } else {
        format!("<button data-on:click=\"@post('/todos/{id}/completed')\">Done</button>\n")
    };
    format!(
        "<li id=\"todo-{id}\" class=\"{class}\">\n\
         <strong>{name}</strong>\n\
         <p>{description}</p>\n\
         {complete}\
         <button data-on:click=\"@get('/todos/{id}/edit')\">Edit</button>\n\
         <button data-on:click=\"@delete('/todos/{id}')\">Delete</button>\n\
         </li>\n",
        name = escape(&todo.name),
        description = escape(&todo.description),
    )
}

/// Form for a new todo; fields are bound to the `name` and
/// `description` signals.
#[must_use]
pub fn todo_new() -> String {
    String::from(
        "<main id=\"view\">\n\
         <h1>New todo</h1>\n\
         <input data-bind:name placeholder=\"Name\" required>\n\
         <textarea data-bind:description placeholder=\"Description\"></textarea>\n\
         <button data-on:click=\"@post('/todos')\">Create</button>\n\
         <button data-on:click=\"@get('/')\">Cancel</button>\n\
         </main>",
    )
}

/// Edit form for `todo`; fields are bound to the `name` and
/// `description` signals.
#[must_use]
pub fn todo_edit(todo: &Todo) -> String {
    format!(
        "<main id=\"view\">\n\
         <h1>Edit todo</h1>\n\
         <input data-bind:name value=\"{name}\" required>\n\
         <textarea data-bind:description>{description}</textarea>\n\
         <button data-on:click=\"@put('/todos/{id}')\">Save</button>\n\
         <button data-on:click=\"@get('/')\">Cancel</button>\n\
         </main>",
        id = todo.id,
        name = escape(&todo.name),
        description = escape(&todo.description),
    )
}
