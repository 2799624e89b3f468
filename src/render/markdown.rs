use pulldown_cmark::{html, Event, Options, Parser};

/// Renders contact notes to HTML. Raw HTML in the notes is escaped rather than passed through.
pub fn to_html(source: &str) -> String {
    // Strikethroughs and tables are not part of the CommonMark standard
    // and we therefore must enable them explicitly.
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) => Event::Text(raw),
        event => event,
    });

    let mut html_output = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut html_output, parser);
    html_output
}
