// bubble-sheet: Generate bubble sheet answer forms from JSON form definitions

use bubble_sheet::record::DEFAULT_DATE_FORMAT;
use bubble_sheet::{
    load_records, parse_date, DateStamp, FieldLayout, FontFace, FontSpec, FormDefinition,
    FormError, FormLayout, FormRenderer, RenderOptions, Result,
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use log::error;
use std::path::{Path, PathBuf};

// ============================================================================
// Data Structures
// ============================================================================

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Generate bubble sheet answer forms")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one sheet per record
    Fill {
        /// Form definition (JSON)
        #[arg(short, long)]
        form: PathBuf,

        /// Records file (JSON array of objects, field name -> value)
        #[arg(short, long)]
        records: PathBuf,

        /// Output filename (defaults to <form>-<date>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Field that receives the date on records that leave it out
        #[arg(long)]
        date_field: Option<String>,

        /// Date (YYYY-MM-DD format, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// strftime format for the stamped date
        #[arg(long, default_value = DEFAULT_DATE_FORMAT)]
        date_format: String,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Render a single alignment sheet with every field filled
    TestPage {
        /// Form definition (JSON)
        #[arg(short, long)]
        form: PathBuf,

        /// Output filename
        #[arg(short, long, default_value = "out.pdf")]
        output: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Validate a form definition and list its fields
    Check {
        /// Form definition (JSON)
        #[arg(short, long)]
        form: PathBuf,
    },
}

/// Print placement shared by the rendering commands
#[derive(Args, Debug)]
struct LayoutArgs {
    /// Font face (Courier, Courier-Bold or Helvetica)
    #[arg(long)]
    font: Option<FontFace>,

    /// Font size in points
    #[arg(long, allow_hyphen_values = true)]
    font_size: Option<f32>,

    /// Horizontal offset in points added to every position
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    x_offset: f32,

    /// Vertical offset in points added to every position
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    y_offset: f32,
}

impl LayoutArgs {
    fn render_options(&self, form: &FormDefinition) -> Result<RenderOptions> {
        if let Some(size) = self.font_size {
            if size <= 0.0 {
                return Err(FormError::InvalidOption(format!(
                    "font size must be positive, got {}",
                    size
                )));
            }
        }

        let base = form.font().unwrap_or_default();
        let font = match (self.font, self.font_size) {
            (None, None) => None,
            (face, size) => Some(FontSpec::new(
                face.unwrap_or(base.face),
                size.unwrap_or(base.size),
            )),
        };
        Ok(RenderOptions {
            font,
            x_offset: self.x_offset,
            y_offset: self.y_offset,
            ..RenderOptions::default()
        })
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Fill {
            form,
            records,
            output,
            date_field,
            date,
            date_format,
            layout,
        } => {
            let date = parse_date(date.as_deref())?;
            let stamp = date_field
                .map(|field| DateStamp::new(&field, date, &date_format))
                .transpose()?;
            let output = output.unwrap_or_else(|| default_output(&form, &date));
            fill(&form, &records, &output, stamp.as_ref(), &layout)
        }
        Command::TestPage {
            form,
            output,
            layout,
        } => test_page(&form, &output, &layout),
        Command::Check { form } => check(&form),
    }
}

// ============================================================================
// Commands
// ============================================================================

fn fill(
    form_path: &Path,
    records_path: &Path,
    output: &Path,
    stamp: Option<&DateStamp>,
    layout: &LayoutArgs,
) -> Result<()> {
    let form = FormDefinition::load(form_path)?;
    let records = load_records(records_path)?;

    // Render in memory so a bad record leaves no partial file behind
    let mut sheets = FormRenderer::new(&form, layout.render_options(&form)?, Vec::<u8>::new());
    for (index, mut record) in records.into_iter().enumerate() {
        if let Some(stamp) = stamp {
            stamp.apply(&mut record);
        }
        if let Err(e) = sheets.page(&record) {
            error!("Record {} could not be rendered", index + 1);
            return Err(e);
        }
    }
    let pages = sheets.page_count();
    let bytes = sheets.save()?;
    std::fs::write(output, bytes)?;

    println!("✓ Generated: {}", output.display());
    println!("  Form: {}", form_path.display());
    println!("  Pages: {}", pages);
    if let Some(stamp) = stamp {
        println!("  Date: {}", stamp.text());
    }

    Ok(())
}

fn test_page(form_path: &Path, output: &Path, layout: &LayoutArgs) -> Result<()> {
    let form = FormDefinition::load(form_path)?;

    let mut sheets = FormRenderer::new(&form, layout.render_options(&form)?, Vec::<u8>::new());
    sheets.test_page()?;
    let bytes = sheets.save()?;
    std::fs::write(output, bytes)?;

    println!("✓ Generated: {}", output.display());
    println!("  Form: {}", form_path.display());

    Ok(())
}

fn check(form_path: &Path) -> Result<()> {
    let form = FormDefinition::load(form_path)?;
    let page = form.page_size();
    let slug = form.slug_size();

    println!("✓ Valid: {}", form_path.display());
    println!("  Page: {} x {} pt", page.width, page.height);
    println!("  Slug: {} x {} pt", slug.width, slug.height);
    println!("  Fields:");
    for field in form.fields() {
        match &field.layout {
            FieldLayout::Text { start } => {
                println!("    {} (text at {}, {})", field.name, start.0, start.1)
            }
            FieldLayout::Numeric(grid) => {
                println!("    {} (numeric, {} digits)", field.name, grid.length)
            }
        }
    }

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn default_output(form_path: &Path, date: &NaiveDate) -> PathBuf {
    let stem = form_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bubble-sheets".to_string());
    PathBuf::from(format!("{}-{}.pdf", stem, date.format("%Y-%m-%d")))
}
