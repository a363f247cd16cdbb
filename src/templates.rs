//! Handlebars registry with every page template compiled into the binary.

use handlebars::Handlebars;

use crate::error::Error;

/// The layout every page wraps itself in with `{{#> layout}}`.
const LAYOUT: (&str, &str) = ("layout", include_str!("../templates/layout.hbs"));

const PAGES: &[(&str, &str)] = &[
    ("index", include_str!("../templates/index.hbs")),
    ("projects", include_str!("../templates/projects.hbs")),
    ("certifications", include_str!("../templates/certifications.hbs")),
    ("experience", include_str!("../templates/experience.hbs")),
    ("404", include_str!("../templates/404.hbs")),
    ("500", include_str!("../templates/500.hbs")),
];

pub(crate) fn registry() -> Result<Handlebars<'static>, Error> {
    let mut hb = Handlebars::new();

    let (name, source) = LAYOUT;
    hb.register_partial(name, source)
        .map_err(|e| Error::Template { name, source: Box::new(e) })?;

    for &(name, source) in PAGES {
        hb.register_template_string(name, source)
            .map_err(|e| Error::Template { name, source: Box::new(e) })?;
    }

    Ok(hb)
}
