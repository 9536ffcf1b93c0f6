// src/services/export_service.rs

use std::path::{Path, PathBuf};

use genpdf::{elements, style, Element};

use crate::{common::error::AppError, models::customer::Customer};

pub const DEFAULT_FONT_FAMILY: &str = "Roboto";
const TITLE: &str = "Customer User Data";
const COLUMNS: [&str; 5] = ["Name", "Email", "Phone", "Status", "Created"];

#[derive(Clone)]
pub struct ExportService {
    fonts_dir: PathBuf,
    // Espera `<família>-{Regular,Bold,Italic,BoldItalic}.ttf` em `fonts_dir`
    font_family: String,
}

impl ExportService {
    pub fn new(fonts_dir: impl Into<PathBuf>, font_family: impl Into<String>) -> Self {
        Self {
            fonts_dir: fonts_dir.into(),
            font_family: font_family.into(),
        }
    }

    /// Renderiza a visão atual da tabela em PDF (em memória).
    pub async fn render_customers(&self, customers: Vec<Customer>) -> Result<Vec<u8>, AppError> {
        let fonts_dir = self.fonts_dir.clone();
        let font_family = self.font_family.clone();

        // O layout do PDF é CPU puro; roda fora do executor
        tokio::task::spawn_blocking(move || render_pdf(&fonts_dir, &font_family, &customers))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de renderização: {}", e))?
    }
}

fn display(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

/// Uma linha de texto por cliente, na ordem de `COLUMNS`.
pub(crate) fn customer_rows(customers: &[Customer]) -> Vec<[String; 5]> {
    customers
        .iter()
        .map(|c| {
            [
                display(&c.name),
                display(&c.email),
                display(&c.phone),
                if c.status { "Active" } else { "Inactive" }.to_string(),
                c.created_at.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect()
}

fn pdf_error(e: genpdf::error::Error) -> AppError {
    AppError::PdfRender(e.to_string())
}

fn render_pdf(fonts_dir: &Path, family: &str, customers: &[Customer]) -> Result<Vec<u8>, AppError> {
    let font_family = genpdf::fonts::from_files(fonts_dir, family, None)
        .map_err(|_| AppError::FontNotFound(format!("{} em {}", family, fonts_dir.display())))?;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(TITLE);
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    doc.push(elements::Paragraph::new(TITLE).styled(style::Style::new().bold().with_font_size(18)));
    doc.push(
        elements::Paragraph::new(format!("Total: {}", customers.len()))
            .styled(style::Style::new().with_font_size(10)),
    );
    doc.push(elements::Break::new(1.5));

    // Pesos das colunas: Nome (3), Email (4), Telefone (3), Status (2), Data (2)
    let mut table = elements::TableLayout::new(vec![3, 4, 3, 2, 2]);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    let style_bold = style::Style::new().bold();
    let mut header = table.row();
    for title in COLUMNS {
        header = header.element(elements::Paragraph::new(title).styled(style_bold));
    }
    header.push().map_err(pdf_error)?;

    for cells in customer_rows(customers) {
        let mut row = table.row();
        for cell in cells {
            row = row.element(elements::Paragraph::new(cell));
        }
        row.push().map_err(pdf_error)?;
    }

    doc.push(table);

    let mut buffer = Vec::new();
    doc.render(&mut buffer).map_err(pdf_error)?;

    Ok(buffer)
}
