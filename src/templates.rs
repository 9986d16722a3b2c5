use handlebars::{Handlebars, TemplateError};

/// Registry with every page template and the shared header partial.
///
/// Templates are compiled into the binary.
pub fn registry() -> Result<Handlebars<'static>, TemplateError> {
    let mut templates = Handlebars::new();

    templates.register_partial("header", include_str!("../templates/header.hbs"))?;
    templates.register_template_string("landing", include_str!("../templates/landing.hbs"))?;
    templates.register_template_string("player", include_str!("../templates/player.hbs"))?;
    templates.register_template_string("dashboard", include_str!("../templates/dashboard.hbs"))?;
    templates.register_template_string("load_error", include_str!("../templates/load_error.hbs"))?;

    Ok(templates)
}
