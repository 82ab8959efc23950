//! Content stream rendering for pages.

use crate::colour::Colour;
use crate::font::Font;
use crate::page::{PageContents, Shape, ShapeLayout, SpanLayout};
use crate::units::Pt;
use crate::ReportError;
use id_arena::Arena;
use std::io::Write;

/// Bézier control point distance for approximating a quarter circle
const KAPPA: f32 = 0.552_284_8;

/// Renders page contents to a PDF content stream, converting high-level
/// content items into low-level PDF operators.
#[allow(clippy::write_with_newline)]
pub(crate) fn render_contents(
    contents: &[PageContents],
    fonts: &Arena<Font>,
) -> Result<Vec<u8>, ReportError> {
    let mut content: Vec<u8> = Vec::default();

    for page_content in contents.iter() {
        match page_content {
            PageContents::Text(spans) => {
                render_text_spans(&mut content, spans, fonts)?;
            }
            PageContents::Image(image) => {
                write!(&mut content, "q\n")?;
                write!(
                    &mut content,
                    "{} 0 0 {} {} {} cm\n",
                    image.position.width(),
                    image.position.height(),
                    image.position.x1,
                    image.position.y1
                )?;
                write!(&mut content, "/I{} Do\n", image.image_id.index())?;
                write!(&mut content, "Q\n")?;
            }
            PageContents::Shape(shape) => {
                render_shape(&mut content, shape)?;
            }
        }
    }

    Ok(content)
}

#[allow(clippy::write_with_newline)]
fn render_text_spans(
    content: &mut Vec<u8>,
    spans: &[SpanLayout],
    fonts: &Arena<Font>,
) -> Result<(), ReportError> {
    let Some(first) = spans.first() else {
        return Ok(());
    };

    write!(content, "q\n")?;
    let mut current_font = first.font;
    let mut current_colour = first.colour;
    write!(
        content,
        "/F{} {} Tf\n",
        current_font.id.index(),
        current_font.size
    )?;
    write_fill_colour(content, current_colour)?;

    for span in spans.iter() {
        if span.font != current_font {
            current_font = span.font;
            write!(
                content,
                "/F{} {} Tf\n",
                current_font.id.index(),
                current_font.size
            )?;
        }
        if span.colour != current_colour {
            current_colour = span.colour;
            write_fill_colour(content, current_colour)?;
        }

        let font = fonts
            .get(current_font.id)
            .ok_or(ReportError::FontMissing(current_font.id.index()))?;

        write!(content, "BT\n")?;
        write!(content, "{} {} Td\n", span.coords.0, span.coords.1)?;
        write!(content, "<")?;
        for byte in font.encode(&span.text) {
            write!(content, "{byte:02x}")?;
        }
        write!(content, "> Tj\n")?;
        write!(content, "ET\n")?;
    }

    write!(content, "Q\n")?;
    Ok(())
}

#[allow(clippy::write_with_newline)]
fn render_shape(content: &mut Vec<u8>, shape: &ShapeLayout) -> Result<(), ReportError> {
    if shape.stroke.is_none() && shape.fill.is_none() {
        return Ok(());
    }

    write!(content, "q\n")?;
    if let Some(fill) = shape.fill {
        write_fill_colour(content, fill)?;
    }
    if let Some((stroke, width)) = shape.stroke {
        write_stroke_colour(content, stroke)?;
        write!(content, "{} w\n", width)?;
    }

    match shape.shape {
        Shape::Rect(r) => {
            write!(
                content,
                "{} {} {} {} re\n",
                r.x1,
                r.y1,
                r.width(),
                r.height()
            )?;
        }
        Shape::RoundedRect(r, radius) => {
            let radius = radius.min(r.width() / 2.0).min(r.height() / 2.0);
            let k = radius * KAPPA;
            let (x1, y1, x2, y2) = (r.x1, r.y1, r.x2, r.y2);
            write!(content, "{} {} m\n", x1 + radius, y1)?;
            write!(content, "{} {} l\n", x2 - radius, y1)?;
            write_curve(content, (x2 - radius + k, y1), (x2, y1 + radius - k), (x2, y1 + radius))?;
            write!(content, "{} {} l\n", x2, y2 - radius)?;
            write_curve(content, (x2, y2 - radius + k), (x2 - radius + k, y2), (x2 - radius, y2))?;
            write!(content, "{} {} l\n", x1 + radius, y2)?;
            write_curve(content, (x1 + radius - k, y2), (x1, y2 - radius + k), (x1, y2 - radius))?;
            write!(content, "{} {} l\n", x1, y1 + radius)?;
            write_curve(content, (x1, y1 + radius - k), (x1 + radius - k, y1), (x1 + radius, y1))?;
            write!(content, "h\n")?;
        }
        Shape::Line(from, to) => {
            write!(content, "{} {} m\n", from.0, from.1)?;
            write!(content, "{} {} l\n", to.0, to.1)?;
        }
    }

    let op = match (shape.fill.is_some(), shape.stroke.is_some()) {
        (true, true) => "B",
        (true, false) => "f",
        _ => "S",
    };
    write!(content, "{op}\nQ\n")?;
    Ok(())
}

#[allow(clippy::write_with_newline)]
fn write_curve(
    content: &mut Vec<u8>,
    c1: (Pt, Pt),
    c2: (Pt, Pt),
    end: (Pt, Pt),
) -> Result<(), std::io::Error> {
    write!(
        content,
        "{} {} {} {} {} {} c\n",
        c1.0, c1.1, c2.0, c2.1, end.0, end.1
    )
}

#[allow(clippy::write_with_newline)]
fn write_fill_colour(content: &mut Vec<u8>, colour: Colour) -> Result<(), std::io::Error> {
    match colour {
        Colour::RGB { r, g, b } => write!(content, "{r} {g} {b} rg\n"),
        Colour::Grey { g } => write!(content, "{g} g\n"),
    }
}

#[allow(clippy::write_with_newline)]
fn write_stroke_colour(content: &mut Vec<u8>, colour: Colour) -> Result<(), std::io::Error> {
    match colour {
        Colour::RGB { r, g, b } => write!(content, "{r} {g} {b} RG\n"),
        Colour::Grey { g } => write!(content, "{g} G\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::SpanFont;
    use crate::rect::Rect;

    #[test]
    fn renders_text_with_winansi_hex() {
        let mut fonts = Arena::new();
        let id = fonts.alloc(Font::helvetica());
        let spans = vec![SpanLayout {
            text: "Año".into(),
            font: SpanFont { id, size: Pt(9.0) },
            colour: crate::colours::BLACK,
            coords: (Pt(10.0), Pt(20.0)),
        }];
        let out = render_contents(&[PageContents::Text(spans)], &fonts).expect("renders");
        let out = String::from_utf8(out).expect("ascii stream");
        assert!(out.contains("/F0 9 Tf"));
        assert!(out.contains("10 20 Td"));
        assert!(out.contains("<41f16f> Tj"));
    }

    #[test]
    fn renders_filled_and_stroked_shapes() {
        let fonts = Arena::new();
        let rect = Rect::from_origin(Pt(1.0), Pt(2.0), Pt(3.0), Pt(4.0));
        let shapes = vec![
            PageContents::Shape(ShapeLayout {
                shape: Shape::Rect(rect),
                stroke: None,
                fill: Some(crate::colours::WHITE),
            }),
            PageContents::Shape(ShapeLayout {
                shape: Shape::RoundedRect(rect, Pt(6.0)),
                stroke: Some((crate::colours::BLACK, Pt(1.0))),
                fill: None,
            }),
        ];
        let out = String::from_utf8(render_contents(&shapes, &fonts).expect("renders"))
            .expect("ascii stream");
        assert!(out.contains("1 2 3 4 re\nf\n"));
        assert!(out.contains(" c\n"));
        assert!(out.contains("h\nS\n"));
    }
}
