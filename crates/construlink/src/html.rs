//! HTML document sent to the PDF renderer.
//!
//! The layout is fixed: header data, weather, personnel and equipment lists,
//! long-text sections and the checklist as a `true, false, ...` sequence.
//! Every interpolated value goes through [`escape_html`].

use crate::draft::ReportDraft;

/// Escape text for interpolation into element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn paragraph(html: &mut String, label: &str, value: &str) {
    html.push_str(&format!("<p>{label}{}</p>\n", escape_html(value)));
}

fn section(html: &mut String, title: &str, body: &str) {
    html.push_str(&format!("<h3>{title}</h3>\n"));
    paragraph(html, "", body);
}

/// Render a draft into the report's HTML document.
pub fn render_html(draft: &ReportDraft) -> String {
    let mut html = String::with_capacity(2048);
    html.push_str("<html>\n<head><meta charset=\"utf-8\"></head>\n<body>\n");
    html.push_str("<h1>Relatório Diário de Obras</h1>\n");

    paragraph(&mut html, "Número RDO: ", &draft.report_number);
    paragraph(&mut html, "Data: ", &draft.formatted_date());
    paragraph(&mut html, "Empresa: ", &draft.company);
    paragraph(&mut html, "Cliente: ", &draft.client);
    paragraph(&mut html, "Local da Obra: ", &draft.site_location);
    paragraph(&mut html, "Gerência: ", &draft.management);
    paragraph(&mut html, "Responsável: ", &draft.site_manager);

    html.push_str("<h3>Condições Climáticas</h3>\n");
    html.push_str(&format!(
        "<p>Manhã: {}, {}°C, Umidade: {}%</p>\n",
        escape_html(&draft.weather_morning),
        escape_html(&draft.temperature_morning),
        escape_html(&draft.humidity_morning),
    ));
    html.push_str(&format!(
        "<p>Tarde: {}, {}°C, Umidade: {}%</p>\n",
        escape_html(&draft.weather_afternoon),
        escape_html(&draft.temperature_afternoon),
        escape_html(&draft.humidity_afternoon),
    ));

    html.push_str("<h3>Efetivo</h3>\n<ul>");
    for entry in &draft.personnel {
        html.push_str(&format!(
            "<li>{}, Cargo: {}, Horas Trabalhadas: {}</li>",
            escape_html(&entry.name),
            escape_html(&entry.role),
            escape_html(&entry.hours_worked),
        ));
    }
    html.push_str("</ul>\n");

    html.push_str("<h3>Equipamentos</h3>\n<ul>");
    for entry in &draft.equipment {
        html.push_str(&format!(
            "<li>{}, Quantidade: {}, Condição: {}</li>",
            escape_html(&entry.name),
            escape_html(&entry.quantity),
            escape_html(&entry.condition),
        ));
    }
    html.push_str("</ul>\n");

    section(&mut html, "Atividades", &draft.activities);
    section(&mut html, "Incidentes", &draft.incidents);

    let checklist: Vec<String> = draft
        .safety_checklist
        .iter()
        .map(|checked| checked.to_string())
        .collect();
    section(&mut html, "Checklist de Segurança", &checklist.join(", "));

    section(
        &mut html,
        "Observações da Fiscalização",
        &draft.inspection_notes,
    );
    section(&mut html, "Observações da Contratada", &draft.contractor_notes);
    section(&mut html, "Assinaturas", &draft.signatures);

    html.push_str("</body>\n</html>\n");
    html
}
