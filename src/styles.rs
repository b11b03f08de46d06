//! Presentation for converted résumés.
//!
//! The rewrite emits a fixed set of classes (`name`, `contact-info`,
//! `section-title`, `twocol`, `three-col-entry`, `highlights`, ...). This
//! module carries the stylesheet that gives them an A4 résumé layout, and a
//! wrapper that turns a fragment into a complete page.

/// Stylesheet for every class the rule table emits.
pub const RESUME_STYLESHEET: &str = r#"body {
  margin: 0;
  padding: 0;
  font-family: "Charter", "Georgia", serif;
  font-size: 10pt;
  color: #000;
}
.page {
  width: 210mm;
  min-height: 297mm;
  padding: 20mm;
  margin: 1em auto;
  background: #fff;
  border: 1px solid #ddd;
  box-shadow: 0 0 10px rgba(0, 0, 0, 0.1);
  box-sizing: border-box;
}
.name {
  text-align: center;
  font-size: 25pt;
  font-weight: bold;
  margin: 0 0 5px 0;
}
.contact-info {
  display: flex;
  justify-content: center;
  align-items: center;
  flex-wrap: wrap;
  gap: 5px;
  margin: 10px 0;
}
.separator {
  color: #999;
  margin: 0 5px;
}
.section-title {
  font-size: 1.2em;
  font-weight: bold;
  border-bottom: 1px solid #000;
  margin: 0 0 10px 0;
}
.subsection-title {
  font-size: 1.1em;
  font-weight: bold;
  margin: 10px 0;
}
.twocol {
  display: flex;
  justify-content: space-between;
  align-items: flex-start;
  margin: 5px 0;
}
.twocol1 {
  flex: 1;
  text-align: left;
}
.twocol2 {
  flex: 0 0 4.5cm;
  order: 2;
}
.text-right {
  text-align: right;
}
.three-col-entry {
  display: grid;
  grid-template-columns: 1fr auto 4.5cm;
  gap: 10px;
  margin: 5px 0;
}
.col.middle {
  text-align: center;
}
.col.right {
  text-align: right;
}
.one-col-entry {
  margin: 5px 0;
}
.highlights {
  margin: 2px 0 0 0;
  padding-left: 1.2em;
}
.highlights li {
  margin: 1px 0;
}
.vspace {
  display: block;
}
a {
  color: #004f90;
  text-decoration: none;
}
a:hover {
  text-decoration: underline;
}
@media print {
  .page {
    margin: 0;
    border: none;
    box-shadow: none;
  }
  a {
    color: #000;
  }
}
"#;

/// Wrap a converted fragment in a complete HTML page.
///
/// The title is escaped; the fragment is inserted as-is.
pub fn standalone_document(fragment: &str, title: &str) -> String {
    let title = htmlize::escape_text(title);
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<style>\n{RESUME_STYLESHEET}</style>\n</head>\n\
         <body>\n<main class=\"page\">\n{fragment}\n</main>\n</body>\n</html>\n"
    )
}
