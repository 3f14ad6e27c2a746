//! Text and HTML presentation of prediction outcomes.

use crate::domain::model::{District, Outcome, PredictionRequest, CONCENTRATION_UNIT, REGION};
use std::fmt::Write;

pub const PAGE_TITLE: &str = "Punjab Groundwater Uranium Predictor";

/// Plain-text result used by the CLI.
pub fn format_result(district: &str, value: f64) -> String {
    format!(
        "District: {}\nPredicted Uranium Concentration: {:.2} {}",
        district, value, CONCENTRATION_UNIT
    )
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn render_success_panel(district: &str, value: f64) -> String {
    format!(
        "<div class=\"result\">\n<strong>District:</strong> {}<br>Predicted Uranium Concentration:<br>\
         <span class=\"value\">{:.2} {}</span></div>",
        escape_html(district),
        value,
        CONCENTRATION_UNIT
    )
}

pub fn render_error_panel(message: &str) -> String {
    format!(
        "<div class=\"error\" role=\"alert\">{}</div>",
        escape_html(message)
    )
}

const STYLE: &str = "body{font-family:sans-serif;max-width:40em;margin:2em auto;color:#173042}\
form{display:grid;gap:.75em}label{display:grid;gap:.25em}\
.result{padding:1.5em 1em;background:#F3F6FA;border-radius:8px;font-size:1.25em;font-weight:600;text-align:center;margin-top:1.5em}\
.result .value{font-size:2em;color:#4F8A10}\
.error{padding:1em;background:#FDECEA;color:#8A1C1C;border-radius:8px;margin-top:1.5em}";

/// Full form page, pre-filled with the last submission and followed by its outcome.
pub fn render_page(form: &PredictionRequest, outcome: Option<&Outcome>) -> String {
    let mut html = String::new();
    // write! 到 String 不會失敗
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<h1>{title}</h1>\n\
         <p>Enter your Punjab district, latitude, and longitude to get a prediction of uranium \
         concentration in groundwater.</p>\n\
         <p><em>(Based on the data from the 2023 Punjab Groundwater Survey)</em></p>\n\
         <form method=\"post\" action=\"/predict\">\n<label>District\n<select name=\"district\">\n",
        title = PAGE_TITLE,
    );

    for district in District::ALL {
        let selected = if district.name().eq_ignore_ascii_case(form.district.trim()) {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(
            html,
            "<option value=\"{name}\"{selected}>{name}</option>",
            name = escape_html(district.name()),
        );
    }

    let _ = write!(
        html,
        "</select></label>\n\
         <label>Latitude\n<input type=\"number\" name=\"latitude\" step=\"0.000001\" \
         min=\"{:.1}\" max=\"{:.1}\" value=\"{}\"></label>\n\
         <label>Longitude\n<input type=\"number\" name=\"longitude\" step=\"0.000001\" \
         min=\"{:.1}\" max=\"{:.1}\" value=\"{}\"></label>\n\
         <button type=\"submit\">Predict</button>\n</form>\n",
        REGION.min_latitude,
        REGION.max_latitude,
        escape_html(&form.latitude),
        REGION.min_longitude,
        REGION.max_longitude,
        escape_html(&form.longitude),
    );

    match outcome {
        Some(Outcome::Success(prediction)) => {
            html.push_str(&render_success_panel(
                prediction.district.name(),
                prediction.prediction,
            ));
        }
        Some(Outcome::Failure(message)) => html.push_str(&render_error_panel(message)),
        None => {}
    }

    html.push_str("\n</body>\n</html>\n");
    html
}
