use std::fs::File;
use std::path::{Path, PathBuf};

use barink::{
    Palette, PixmapSurface, PostScriptRenderer, RasterRenderer, Rgb, SvgRenderer, Symbol,
    SymbolRenderer, canvas_size,
};
use clap::Parser;

/// Render barcode symbol geometry to SVG, EPS, PNG or PDF
#[derive(Parser, Debug)]
#[command(name = "barink")]
#[command(version)]
#[command(about = "Render barcode symbol geometry to SVG, EPS, PNG or PDF", long_about = None)]
struct Args {
    /// Symbol description (.json, .toml, .yaml; use "-" for JSON on stdin)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file path (extension determines format: .svg, .eps, .png or .pdf)
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Magnification applied to the symbol geometry
    #[arg(short, long, default_value_t = 1.0)]
    scale: f64,

    /// Built-in palette name or path to a palette file (TOML or YAML)
    #[arg(short, long, value_name = "PALETTE")]
    palette: Option<String>,

    /// Ink color as #RRGGBB (overrides the palette)
    #[arg(long, value_name = "COLOR")]
    ink: Option<Rgb>,

    /// Paper color as #RRGGBB (overrides the palette)
    #[arg(long, value_name = "COLOR")]
    paper: Option<Rgb>,
}

fn main() -> Result<(), String> {
    env_logger::init();
    let args = Args::parse();

    if !args.scale.is_finite() || args.scale <= 0.0 {
        return Err(format!("Invalid --scale value: {}", args.scale));
    }

    let mut palette = match args.palette.as_deref() {
        Some(spec) => load_palette(spec)?,
        None => Palette::default(),
    };
    if let Some(ink) = args.ink {
        palette.ink = ink;
    }
    if let Some(paper) = args.paper {
        palette.paper = paper;
    }

    let symbol = load_symbol(&args.input)?;

    let output_ext = extension(&args.output).ok_or("Output file has no extension")?;

    match output_ext.as_str() {
        "svg" => {
            let file = create(&args.output)?;
            SvgRenderer::new(file, args.scale, palette.paper, palette.ink)
                .render(&symbol)
                .map_err(|e| format!("Failed to write SVG: {}", e))?;
            eprintln!("SVG saved to: {}", args.output.display());
        }
        "eps" | "ps" => {
            let file = create(&args.output)?;
            PostScriptRenderer::new(file, args.scale, palette.paper, palette.ink)
                .render(&symbol)
                .map_err(|e| format!("Failed to write EPS: {}", e))?;
            eprintln!("EPS saved to: {}", args.output.display());
        }
        "png" => {
            let (width, height) = canvas_size(&symbol, args.scale);
            let mut surface = PixmapSurface::new(width, height)?;
            surface.fill(palette.paper);
            RasterRenderer::new(&mut surface, args.scale, palette.paper, palette.ink)
                .render(&symbol)
                .map_err(|e| format!("Failed to paint symbol: {}", e))?;
            let png_data = surface.encode_png()?;
            std::fs::write(&args.output, png_data)
                .map_err(|e| format!("Failed to write PNG: {}", e))?;
            eprintln!("PNG saved to: {}", args.output.display());
        }
        "pdf" => {
            let mut renderer = SvgRenderer::new(Vec::new(), args.scale, palette.paper, palette.ink);
            renderer
                .render(&symbol)
                .map_err(|e| format!("Failed to render SVG: {}", e))?;
            let svg = String::from_utf8(renderer.into_inner())
                .map_err(|e| format!("Rendered SVG is not UTF-8: {}", e))?;
            let pdf_data = svg_to_pdf(&svg)?;
            std::fs::write(&args.output, pdf_data)
                .map_err(|e| format!("Failed to write PDF: {}", e))?;
            eprintln!("PDF saved to: {}", args.output.display());
        }
        _ => {
            return Err(format!(
                "Unsupported output format: .{} (use .svg, .eps, .png or .pdf)",
                output_ext
            ));
        }
    }

    Ok(())
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn create(path: &Path) -> Result<File, String> {
    File::create(path).map_err(|e| format!("Failed to create {}: {}", path.display(), e))
}

fn load_palette(spec: &str) -> Result<Palette, String> {
    let path = Path::new(spec);
    if !path.is_file() {
        return Palette::from_builtin(spec);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read palette file: {}", e))?;
    match extension(path).as_deref() {
        Some("yaml" | "yml") => Palette::from_yaml(&content),
        _ => Palette::from_toml(&content),
    }
}

fn load_symbol(input: &Path) -> Result<Symbol, String> {
    if input.to_str() == Some("-") {
        let mut buffer = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        return Symbol::from_json(&buffer);
    }

    let content = std::fs::read_to_string(input)
        .map_err(|e| format!("Failed to read input file: {}", e))?;

    match extension(input).as_deref() {
        Some("json") => Symbol::from_json(&content),
        Some("toml") => Symbol::from_toml(&content),
        Some("yaml" | "yml") => Symbol::from_yaml(&content),
        _ => Err(format!(
            "Unsupported input format: {} (use .json, .toml or .yaml)",
            input.display()
        )),
    }
}

fn svg_to_pdf(svg: &str) -> Result<Vec<u8>, String> {
    use svg2pdf::usvg::fontdb;

    let mut fontdb = fontdb::Database::new();
    fontdb.load_system_fonts();
    configure_font_fallbacks(&mut fontdb);

    let opts = svg2pdf::usvg::Options {
        fontdb: std::sync::Arc::new(fontdb),
        ..Default::default()
    };

    let tree = svg2pdf::usvg::Tree::from_str(svg, &opts)
        .map_err(|e| format!("Failed to parse SVG: {}", e))?;

    // Text is converted to paths so the PDF never depends on font embedding.
    let options = svg2pdf::ConversionOptions {
        embed_text: false,
        ..Default::default()
    };
    let page_options = svg2pdf::PageOptions::default();

    svg2pdf::to_pdf(&tree, options, page_options)
        .map_err(|e| format!("Failed to convert SVG to PDF: {}", e))
}

/// Symbols usually name PostScript core fonts (Helvetica, OCR-B) that are
/// rarely installed; point the generic families at something that is.
fn configure_font_fallbacks(fontdb: &mut svg2pdf::usvg::fontdb::Database) {
    let mut sans_family: Option<String> = None;
    let mut mono_family: Option<String> = None;
    let mut first_family: Option<String> = None;

    for face in fontdb.faces() {
        for (family, _) in &face.families {
            if first_family.is_none() {
                first_family = Some(family.clone());
            }
            let lower = family.to_ascii_lowercase();
            if sans_family.is_none() && lower.contains("sans") {
                sans_family = Some(family.clone());
            }
            if mono_family.is_none() && (lower.contains("mono") || lower.contains("ocr")) {
                mono_family = Some(family.clone());
            }
        }
    }

    if let Some(family) = sans_family.as_deref().or(first_family.as_deref()) {
        fontdb.set_sans_serif_family(family);
        fontdb.set_serif_family(family);
    }
    if let Some(family) = mono_family
        .as_deref()
        .or(sans_family.as_deref())
        .or(first_family.as_deref())
    {
        fontdb.set_monospace_family(family);
    }
}
