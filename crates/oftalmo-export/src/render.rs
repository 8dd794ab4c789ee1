use tera::{Context, Tera};

use crate::error::ExportError;
use crate::summary::SummaryContext;

/// Built-in evaluation summary template (tera / Jinja2 syntax).
///
/// The output uses the same Markdown subset that [`crate::docx`] understands.
pub const DEFAULT_SUMMARY_TEMPLATE: &str = r#"# Ophthalmology evaluation

**Patient:** {{ patient.name }}
**Medical record:** {{ patient.medical_record }}
{% if patient.cpf %}**CPF:** {{ patient.cpf }}
{% endif %}{% if patient.age is number %}**Age:** {{ patient.age }} years
{% endif %}**Sex:** {{ patient.sex }}
**Date:** {{ date }}
{% if clinic %}**Clinic:** {{ clinic }}
{% endif %}**Status:** {{ status }}
{% if collaborators %}
## Examiners
{% for c in collaborators %}- {{ c }}
{% endfor %}{% endif %}{% if anamnesis %}
## Anamnesis
{% for s in anamnesis %}**{{ s.title }}:** {{ s.text }}
{% endfor %}{% endif %}
## Examination
{% for eye in eyes %}
### {{ eye.label }} ({{ eye.abbreviation }})
{% if eye.findings %}{% for f in eye.findings %}- **{{ f.title }}:** {{ f.text }}
{% endfor %}{% else %}- No findings recorded.
{% endif %}{% if eye.best_refraction %}- **Best refraction:** {{ eye.best_refraction }}
{% endif %}{% endfor %}{% if refractions %}
## Refractions
{% for r in refractions %}- {{ r }}
{% endfor %}{% endif %}{% if surgeries %}
## Surgeries
{% for s in surgeries %}- {{ s }}
{% endfor %}{% endif %}{% if attachments %}
## Imaging
{% for a in attachments %}- {{ a }}
{% endfor %}{% endif %}{% if conclusion %}
## Conclusion
{% for s in conclusion %}**{{ s.title }}:** {{ s.text }}
{% endfor %}{% endif %}"#;

/// Render the summary with the built-in template.
pub fn render_summary(context: &SummaryContext) -> Result<String, ExportError> {
    render_template("summary", DEFAULT_SUMMARY_TEMPLATE, context)
}

/// Render a tera template against an evaluation summary.
///
/// The `template_content` is the raw template string. Autoescaping is off
/// because the output is plain text, not HTML.
pub fn render_template(
    template_name: &str,
    template_content: &str,
    context: &SummaryContext,
) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.add_raw_template(template_name, template_content)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let value = serde_json::to_value(context)?;
    let context = Context::from_value(value)
        .map_err(|e| ExportError::TemplateRender(e.to_string()))?;

    let rendered = tidy(&tera.render(template_name, &context)?);
    tracing::debug!(template = template_name, bytes = rendered.len(), "rendered template");
    Ok(rendered)
}

/// Trim trailing whitespace and collapse runs of blank lines.
fn tidy(rendered: &str) -> String {
    let mut out = String::with_capacity(rendered.len());
    let mut blank_run = 0;
    for line in rendered.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 || out.is_empty() {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}
