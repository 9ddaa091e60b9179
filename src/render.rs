//! Plain-text rendering of a page view for the terminal.

use crate::form::{FieldView, PageView};

pub const LOADING_INDICATOR: &str = "Loading...";

/// Prompt answer that empties a field's current value
pub const CLEAR_TOKEN: &str = "-";

/// What a prompt answer does to a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Keep,
    Replace(String),
}

/// Interprets one line typed at a field prompt. Empty input keeps the
/// current value and `CLEAR_TOKEN` clears it.
pub fn parse_answer(line: &str) -> Answer {
    match line.trim() {
        "" => Answer::Keep,
        CLEAR_TOKEN => Answer::Replace(String::new()),
        value => Answer::Replace(value.to_string()),
    }
}

pub fn render(view: &PageView) -> String {
    match view {
        PageView::Loading => format!("{}\n", LOADING_INDICATOR),
        PageView::Error { message } => format!("Unable to display this form.\n{}\n", message),
        PageView::Form(form) => {
            let mut out = format!("{}\n", form.company_name);
            if !form.description.is_empty() {
                out.push_str(&format!("{}\n", form.description));
            }
            out.push('\n');
            for field in &form.fields {
                out.push_str(&render_field(field));
            }
            if form.submitting {
                out.push_str("\nSubmitting...\n");
            }
            out
        }
        PageView::Submitted { company_name } => {
            format!("Thank you! {} has received your details.\n", company_name)
        }
    }
}

/// Label line used when prompting for a value. A filled field shows its
/// current value and how to clear it.
pub fn field_prompt(field: &FieldView) -> String {
    let label = if field.required {
        format!("{}*", field.label)
    } else {
        format!("{} (optional)", field.label)
    };
    if field.value.is_empty() {
        format!("{}: ", label)
    } else {
        format!("{} [{}, '{}' to clear]: ", label, field.value, CLEAR_TOKEN)
    }
}

fn render_field(field: &FieldView) -> String {
    let marker = if field.required { "*" } else { "" };
    let mut line = format!("  {}{}: {}\n", field.label, marker, field.value);
    if let Some(error) = &field.error {
        line.push_str(&format!("    ! {}\n", error));
    }
    line
}
