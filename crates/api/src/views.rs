//! Server-rendered pages.
//!
//! Templates are compiled into the binary and rendered with Tera. Every
//! page receives the record kind's labels so one set of templates serves
//! both `characters` and `items`.

use axum::response::Html;
use roster_core::record::RecordKind;
use roster_db::models::record::Record;
use tera::{Context, Tera};

const LAYOUT: &str = include_str!("../templates/layout.html");
const INDEX: &str = include_str!("../templates/index.html");
const DETAIL: &str = include_str!("../templates/detail.html");

/// Compiled page templates.
#[derive(Debug)]
pub struct Views {
    tera: Tera,
    kind: RecordKind,
    image_uploads: bool,
}

impl Views {
    /// `image_uploads` toggles the image column and the file input.
    pub fn new(kind: RecordKind, image_uploads: bool) -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("layout.html", LAYOUT),
            ("index.html", INDEX),
            ("detail.html", DETAIL),
        ])?;
        Ok(Self {
            tera,
            kind,
            image_uploads,
        })
    }

    /// The list page.
    pub fn index(&self, records: &[Record]) -> Result<Html<String>, tera::Error> {
        let mut context = self.base_context();
        context.insert("records", records);
        self.render("index.html", &context)
    }

    /// The create form (`record == None`) or the edit form.
    pub fn detail(&self, record: Option<&Record>) -> Result<Html<String>, tera::Error> {
        let mut context = self.base_context();
        context.insert("record", &record);
        self.render("detail.html", &context)
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("base_path", self.kind.base_path());
        context.insert("singular", self.kind.singular());
        context.insert("plural", self.kind.plural());
        context.insert("plural_title", &capitalize(self.kind.plural()));
        context.insert("image_uploads", &self.image_uploads);
        context
    }

    fn render(&self, template: &str, context: &Context) -> Result<Html<String>, tera::Error> {
        self.tera.render(template, context).map(Html)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
