//! HTML rendering for the server-rendered pages.
//!
//! Every interpolated value passes through `escape_html`.

use intfeed_core::Record;
use std::fmt::Write;

const STYLE: &str = "body{font-family:sans-serif;max-width:40rem;margin:2rem auto}\
.message{color:#17692b}.error{color:#a11}\
table{border-collapse:collapse;width:100%}th,td{border:1px solid #ccc;padding:.4rem;text-align:left}";

/// Input form page, optionally showing the outcome of the last submission.
pub fn index_page(message: Option<&str>, error: Option<&str>) -> String {
    let mut body = String::from("<h1>Add a record</h1>\n");
    push_notice(&mut body, "message", message);
    push_notice(&mut body, "error", error);
    body.push_str(
        "<form method=\"post\" action=\"/save\">\n\
         <label>Name <input type=\"text\" name=\"name\" required></label>\n\
         <label>Age <input type=\"number\" name=\"age\" required></label>\n\
         <button type=\"submit\">Save</button>\n\
         </form>\n\
         <p><a href=\"/list\">View all records</a></p>\n",
    );
    layout("intFeed", &body)
}

/// Table of records in the given order, or an empty-state line.
pub fn list_page(records: &[Record], error: Option<&str>) -> String {
    let mut body = String::from("<h1>Records</h1>\n");
    push_notice(&mut body, "error", error);

    if records.is_empty() {
        body.push_str("<p>No records found.</p>\n");
    } else {
        body.push_str("<table>\n<thead><tr><th>#</th><th>Name</th><th>Age</th></tr></thead>\n<tbody>\n");
        for record in records {
            // Writing into a String cannot fail.
            let _ = writeln!(
                body,
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                record.id,
                escape_html(&record.name),
                record.age
            );
        }
        body.push_str("</tbody>\n</table>\n");
    }

    body.push_str("<p><a href=\"/\">Add another record</a></p>\n");
    layout("intFeed records", &body)
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn push_notice(body: &mut String, class: &str, text: Option<&str>) {
    if let Some(text) = text {
        let _ = writeln!(body, "<p class=\"{class}\">{}</p>", escape_html(text));
    }
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
        escape_html(title)
    )
}
