use super::error::RenderError;
use super::number::{float_text, value_text};
use crate::core::models::measurement::{Estimate, Value};
use crate::core::models::record::{MeasurementTable, SystemRecord};
use crate::core::thermo::rounding::leading_digit_exponent;
use phf::{Map, phf_map};
use std::fmt::{self, Write};

/// Experimental technique footnotes attached to specific systems.
static FOOTNOTE_MARKERS: Map<&'static str, char> = phf_map! {
    "CB8-G1" => 'c', "CB8-G2" => 'c', "CB8-G7" => 'c',
    "CB8-G3" => 'd', "CB8-G4" => 'd',
    "CB8-G5" => 'e', "CB8-G6" => 'e',
    "TEETOA-G3" => 'f',
    "TEETOA-G5" => 'g',
};

const COLUMN_HEADERS: [&str; 8] = [
    "ID",
    "name",
    "SMILES",
    r"$K_a$ (M$^{-1}$)",
    r"$\Delta G$ (kcal/mol) $^{(a)}$",
    r"$\Delta H$ (kcal/mol)",
    r"$T\Delta S$ (kcal/mol) $^{(b)}$",
    "$n$",
];

const PREAMBLE: &str = r"\documentclass{article}
\usepackage[a4paper,margin=0.4in,tmargin=0.5in,landscape]{geometry}
\usepackage{tabu}
\pagenumbering{gobble}
\begin{document}
\begin{center}
\footnotesize
\begin{tabu}";

pub fn footnote_marker(id: &str) -> Option<char> {
    FOOTNOTE_MARKERS.get(id).copied()
}

/// Escapes characters that LaTeX treats specially in running text.
///
/// SMILES strings use `#`, `%`, `\` and ring-bond digits freely, so every structure cell goes
/// through here as well as the names.
pub fn escape_latex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '_' | '%' | '&' | '#' | '$' | '{' | '}' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\\' => escaped.push_str(r"\textbackslash{}"),
            '^' => escaped.push_str(r"\^{}"),
            '~' => escaped.push_str(r"\~{}"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn scale_down(x: f64, exponent: i32) -> f64 {
    if exponent >= 0 {
        x / 10f64.powi(exponent)
    } else {
        x * 10f64.powi(-exponent)
    }
}

fn estimate_cell(estimate: &Estimate) -> String {
    match estimate.uncertainty {
        Some(uncertainty) => format!("{} +- {}", value_text(estimate.value), value_text(uncertainty)),
        None => value_text(estimate.value),
    }
}

/// The association constant in scientific notation, `(m +- dm) $\times$ 10$^{e}$`, where `e`
/// is the exponent of the uncertainty's leading digit. The exponent is omitted when it is 1.
fn association_constant_cell(ka: &Estimate) -> String {
    let (Value::Measured(value), Some(Value::Measured(uncertainty))) = (ka.value, ka.uncertainty)
    else {
        return estimate_cell(ka);
    };
    if uncertainty == 0.0 {
        return estimate_cell(ka);
    }

    let exponent = leading_digit_exponent(uncertainty);
    let mantissa = format!(
        r"({} +- {}) $\times$ 10",
        float_text(scale_down(value, exponent)),
        float_text(scale_down(uncertainty, exponent))
    );
    if exponent == 1 {
        mantissa
    } else {
        format!("{mantissa}$^{{{exponent}}}$")
    }
}

fn stoichiometry_cell(n: Value) -> String {
    match n {
        Value::Measured(v) if v >= 0.0 => format!(" {:.2}", v),
        Value::Measured(v) => format!("{:.2}", v),
        Value::Unavailable => format!(" {}", value_text(n)),
    }
}

fn write_row(writer: &mut impl Write, record: &SystemRecord) -> fmt::Result {
    let id = record.id.to_string();
    write!(writer, "{} & {}", escape_latex(&id), escape_latex(&record.name))?;
    if let Some(marker) = footnote_marker(&id) {
        write!(writer, "$^{{({})}}$", marker)?;
    }
    for cell in [
        escape_latex(&record.smiles),
        association_constant_cell(&record.ka),
        estimate_cell(&record.dg),
        estimate_cell(&record.dh),
        estimate_cell(&record.tds),
    ] {
        write!(writer, " & {}", cell)?;
    }
    write!(writer, " & {} \\\\\n\\hline\n", stoichiometry_cell(record.n))
}

fn temperature_text(temperature_kelvin: f64) -> String {
    if temperature_kelvin.fract() == 0.0 {
        format!("{:.0}", temperature_kelvin)
    } else {
        format!("{}", temperature_kelvin)
    }
}

fn write_footer(writer: &mut impl Write, temperature_kelvin: f64) -> fmt::Result {
    write!(
        writer,
        concat!(
            r"\end{{tabu}}\end{{center}}\vspace{{5mm}}",
            "\n",
            "All quantities are reported as point estimate +- statistical error from the ITC data fitting procedure. ",
            r"The upper bound ($1\%$) was used for errors reported to be $<1\%$. We also included a 3\% relative ",
            "uncertainty in the titrant concentration assuming the stoichiometry coefficient to be fitted to the ITC ",
            "data for the Isaacs (CB8) dataset, where concentration error had not been factored in to the original ",
            r"error estimates. For the TEMOA/TEETOA sets, provided uncertainties already include concentration error.\\",
            "\n",
            r"($^a$) Statistical errors were propagated from the $K_a$ measurements. \\",
            "\n",
            r"($^b$) All experiments were performed at {} K. \\",
            "\n",
            r"($^c$) Direct ITC titration. \\",
            "\n",
            r"($^d$) Competitive ITC titration with C1. \\",
            "\n",
            r"($^e$) Competitive ITC titration with C2.\\",
            "\n",
            r"($^f$) Binding is too weak to be observed by NMR or ITC. \\",
            "\n",
            r"($^g$) Determined by 1H NMR spectroscopy.",
            "\n",
            r"\end{{document}}",
            "\n",
        ),
        temperature_text(temperature_kelvin)
    )
}

/// Renders a standalone landscape LaTeX document holding one table row per system.
///
/// Rows of different host families are separated by an extra horizontal rule.
pub fn render_latex(
    table: &MeasurementTable,
    temperature_kelvin: f64,
) -> Result<String, RenderError> {
    let mut document = String::new();
    write_document(&mut document, table, temperature_kelvin)?;
    Ok(document)
}

fn write_document(
    writer: &mut impl Write,
    table: &MeasurementTable,
    temperature_kelvin: f64,
) -> fmt::Result {
    writer.write_str(PREAMBLE)?;
    let alignment = vec!["c"; COLUMN_HEADERS.len()].join(" | ");
    writeln!(writer, "{{| {} |}}", alignment)?;
    writer.write_str("\\hline\n")?;
    writeln!(writer, "\\rowfont{{\\bfseries}} {} \\\\", COLUMN_HEADERS.join(" & "))?;
    writer.write_str("\\hline\n")?;

    let mut previous_host: Option<&str> = None;
    for record in table.iter() {
        if previous_host != Some(record.id.host.as_str()) {
            writer.write_str("\\hline\n")?;
            previous_host = Some(record.id.host.as_str());
        }
        write_row(writer, record)?;
    }

    write_footer(writer, temperature_kelvin)
}
