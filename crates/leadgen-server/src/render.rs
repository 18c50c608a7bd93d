//! Server-side HTML for the single leads page.

use std::fmt::Write;

use axum::response::Html;
use leadgen_core::Lead;

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:2rem}\
table{border-collapse:collapse;width:100%;margin-top:1rem}\
th,td{border:1px solid #ccc;padding:.4rem .6rem;text-align:left}\
th{background:#1f497d;color:#fff}\
form{display:inline-block;margin-right:1rem}\
.notice{padding:.5rem;background:#eef}";

/// Renders the search form, the action buttons, and the lead table.
pub fn leads_page(leads: &[Lead], notice: Option<&str>) -> Html<String> {
    let mut out = String::with_capacity(4096 + leads.len() * 512);
    out.push_str("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">");
    out.push_str("<title>Business Leads</title><style>");
    out.push_str(STYLE);
    out.push_str("</style></head><body><h1>Business Leads</h1>");

    out.push_str(
        "<form method=\"post\" action=\"/search\">\
         <input name=\"name\" placeholder=\"Business type or name\"> \
         <input name=\"area\" placeholder=\"Area\"> \
         <input name=\"limit\" type=\"number\" min=\"1\" value=\"20\"> \
         <button type=\"submit\">Search</button></form>",
    );
    out.push_str("<form method=\"get\" action=\"/export\"><button>Export to Excel</button></form>");
    out.push_str(
        "<form method=\"post\" action=\"/clear\"><button>Clear leads</button></form>",
    );

    if let Some(notice) = notice {
        let _ = write!(out, "<p class=\"notice\">{}</p>", escape(notice));
    }

    if leads.is_empty() {
        out.push_str("<p>No leads yet.</p>");
    } else {
        let has_flags = leads.iter().any(|l| l.is_justdial.is_some());
        out.push_str("<table><thead><tr><th>Name</th><th>Phone</th><th>Website</th><th>Photos</th>");
        if has_flags {
            out.push_str("<th>Justdial</th><th>Tripadvisor</th>");
        }
        out.push_str("<th>Address</th><th>Rating</th><th>Map</th></tr></thead><tbody>");
        for lead in leads {
            push_row(&mut out, lead, has_flags);
        }
        out.push_str("</tbody></table>");
    }

    out.push_str("</body></html>");
    Html(out)
}

fn push_row(out: &mut String, lead: &Lead, has_flags: bool) {
    let _ = write!(
        out,
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
        escape(&lead.name),
        escape(&lead.phone),
        escape(&lead.website),
        lead.photos_count
    );
    if has_flags {
        let flag = |f: Option<leadgen_core::YesNo>| f.map_or("", leadgen_core::YesNo::as_str);
        let _ = write!(
            out,
            "<td>{}</td><td>{}</td>",
            flag(lead.is_justdial),
            flag(lead.is_tripadvisor)
        );
    }
    let _ = write!(
        out,
        "<td>{}</td><td>{}</td><td><a href=\"{}\" target=\"_blank\" rel=\"noopener\">View</a></td></tr>",
        escape(&lead.address),
        escape(&lead.rating.to_string()),
        escape(&safe_href(&lead.location_link))
    );
}

/// Only http(s) links survive; anything else becomes `#`.
fn safe_href(link: &str) -> &str {
    if link.starts_with("https://") || link.starts_with("http://") {
        link
    } else {
        "#"
    }
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_page_says_so() {
        let Html(body) = leads_page(&[], None);
        assert!(body.contains("No leads yet."));
        assert!(!body.contains("<table>"));
    }

    #[test]
    fn values_are_escaped() {
        let lead = Lead {
            name: "<script>alert('x')</script>".to_string(),
            ..Lead::default()
        };
        let Html(body) = leads_page(&[lead], Some("a & b"));
        assert!(!body.contains("<script>"));
        assert!(body.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(body.contains("a &amp; b"));
    }

    #[test]
    fn flag_columns_only_when_present() {
        let Html(plain) = leads_page(&[Lead::default()], None);
        assert!(!plain.contains("Justdial"));

        let Html(flagged) = leads_page(&[Lead::default().with_flags()], None);
        assert!(flagged.contains("<th>Justdial</th>"));
        assert!(flagged.contains("<td>No</td>"));
    }

    #[test]
    fn non_http_links_are_neutralized() {
        assert_eq!(safe_href("javascript:alert(1)"), "#");
        assert_eq!(safe_href("https://maps.google.com/?cid=1"), "https://maps.google.com/?cid=1");
    }
}
