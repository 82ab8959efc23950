use crate::{
    refs::{ObjectReferences, RefType},
    ReportError, Pt,
};
use id_arena::Id;
use owned_ttf_parser::{AsFaceRef, GlyphId, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Filter, Name, Pdf, Ref, Str,
};
use std::{collections::HashMap, sync::Arc};

/// One of the standard PDF faces every viewer ships with. These are never
/// embedded; their metrics come from the Adobe font metrics tables.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    pub fn base_name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Advance width of a character in 1/1000 em. Characters outside WinAnsi
    /// measure as the `?` they are rendered with.
    fn advance(&self, ch: char) -> u16 {
        let table = match self {
            StandardFont::Helvetica => &HELVETICA_WIDTHS,
            StandardFont::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        };
        let bold = *self == StandardFont::HelveticaBold;
        match ch {
            ' '..='~' => table[ch as usize - 32],
            '\u{A0}' => 278,
            '°' => 400,
            '±' | '×' | '÷' | '¬' => 584,
            '·' => 278,
            '«' | '»' => 556,
            '¡' => 333,
            '¿' => 611,
            'Æ' => 1000,
            'æ' => 889,
            'ß' => 611,
            'Þ' => 667,
            'ð' | 'þ' => {
                if bold {
                    611
                } else {
                    556
                }
            }
            'ì'..='ï' => 278,
            '…' | '—' | '‰' => 1000,
            '–' | '€' => 556,
            '•' => 350,
            '‘' | '’' | '‚' => {
                if bold {
                    278
                } else {
                    222
                }
            }
            '“' | '”' | '„' => {
                if bold {
                    500
                } else {
                    333
                }
            }
            _ => match latin1_base_letter(ch) {
                Some(base) => table[base as usize - 32],
                None if char_to_winansi(ch).is_some() => 556,
                None => table['?' as usize - 32],
            },
        }
    }
}

/// Accented Latin-1 letters share the advance of their base letter
fn latin1_base_letter(ch: char) -> Option<char> {
    let base = match ch {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ð' => 'D',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        _ => return None,
    };
    Some(base)
}

/// Helvetica advance widths for ASCII 32..=126
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

/// Helvetica-Bold advance widths for ASCII 32..=126
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    333, 333, 584, 584, 584, 611, 975, // :..@
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    333, 278, 333, 584, 556, 333, // [..`
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a..m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n..z
    389, 280, 389, 584, // {..~
];

/// Map a character to its WinAnsi (Windows-1252) byte, if it has one
pub(crate) fn char_to_winansi(ch: char) -> Option<u8> {
    match ch as u32 {
        0x20..=0x7E => Some(ch as u8),
        0xA0..=0xFF => Some(ch as u8),
        0x20AC => Some(0x80),
        0x201A => Some(0x82),
        0x0192 => Some(0x83),
        0x201E => Some(0x84),
        0x2026 => Some(0x85),
        0x2020 => Some(0x86),
        0x2021 => Some(0x87),
        0x02C6 => Some(0x88),
        0x2030 => Some(0x89),
        0x0160 => Some(0x8A),
        0x2039 => Some(0x8B),
        0x0152 => Some(0x8C),
        0x017D => Some(0x8E),
        0x2018 => Some(0x91),
        0x2019 => Some(0x92),
        0x201C => Some(0x93),
        0x201D => Some(0x94),
        0x2022 => Some(0x95),
        0x2013 => Some(0x96),
        0x2014 => Some(0x97),
        0x02DC => Some(0x98),
        0x2122 => Some(0x99),
        0x0161 => Some(0x9A),
        0x203A => Some(0x9B),
        0x0153 => Some(0x9C),
        0x017E => Some(0x9E),
        0x0178 => Some(0x9F),
        _ => None,
    }
}

#[derive(Clone)]
enum FontKind {
    Standard(StandardFont),
    TrueType(Arc<OwnedFace>),
}

/// A font used to measure and draw report text. Standard fonts are referenced
/// by name; TrueType / OpenType fonts are embedded in their entirety as a CID
/// font with an Identity-H encoding.
///
/// Cloning is cheap: embedded faces are shared between clones, so one loaded
/// font can serve any number of concurrent renders.
#[derive(Clone)]
pub struct Font {
    kind: FontKind,
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Font").field(&self.name()).finish()
    }
}

impl Font {
    pub fn standard(font: StandardFont) -> Font {
        Font {
            kind: FontKind::Standard(font),
        }
    }

    pub fn helvetica() -> Font {
        Font::standard(StandardFont::Helvetica)
    }

    pub fn helvetica_bold() -> Font {
        Font::standard(StandardFont::HelveticaBold)
    }

    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, ReportError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(Font {
            kind: FontKind::TrueType(Arc::new(face)),
        })
    }

    /// The full name of the font, falling back to a generic name when an
    /// embedded font carries no name table entry
    pub fn name(&self) -> String {
        match &self.kind {
            FontKind::Standard(font) => font.base_name().to_string(),
            FontKind::TrueType(face) => face
                .as_face_ref()
                .names()
                .into_iter()
                .find(|name| {
                    name.name_id == owned_ttf_parser::name_id::FULL_NAME && name.is_unicode()
                })
                .and_then(|name| name.to_string())
                .unwrap_or_else(|| "EmbeddedFont".to_string()),
        }
    }

    /// (units per em, ascender, descender) in font units
    fn vertical_metrics(&self) -> (f32, f32, f32) {
        match &self.kind {
            // Helvetica and Helvetica-Bold share these AFM values
            FontKind::Standard(_) => (1000.0, 718.0, -207.0),
            FontKind::TrueType(face) => {
                let face = face.as_face_ref();
                (
                    face.units_per_em() as f32,
                    face.ascender() as f32,
                    face.descender() as f32,
                )
            }
        }
    }

    /// Calculate the ascent (distance from the baseline to the top of the font) for the given font size
    pub fn ascent(&self, size: Pt) -> Pt {
        let (upem, ascender, _) = self.vertical_metrics();
        size * (ascender / upem)
    }

    /// Calculate the descent (distance from the baseline to the bottom of the font) for the given font size.
    /// Note: this is usually negative
    pub fn descent(&self, size: Pt) -> Pt {
        let (upem, _, descender) = self.vertical_metrics();
        size * (descender / upem)
    }

    /// Horizontal advance of a single character at the given size
    pub fn char_width(&self, ch: char, size: Pt) -> Pt {
        match &self.kind {
            FontKind::Standard(font) => size * (font.advance(ch) as f32 / 1000.0),
            FontKind::TrueType(face) => {
                let face = face.as_face_ref();
                let advance = self
                    .glyph_id(ch)
                    .and_then(|gid| face.glyph_hor_advance(GlyphId(gid)))
                    .unwrap_or_default();
                size * (advance as f32 / face.units_per_em() as f32)
            }
        }
    }

    /// Glyph id for a character in an embedded font, falling back to the
    /// replacement glyph and then to `?`. Standard fonts have no glyph ids.
    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        match &self.kind {
            FontKind::Standard(_) => None,
            FontKind::TrueType(face) => {
                let face = face.as_face_ref();
                face.glyph_index(ch)
                    .or_else(|| face.glyph_index('\u{FFFD}'))
                    .or_else(|| face.glyph_index('?'))
                    .map(|gid| gid.0)
            }
        }
    }

    /// Encode text into the byte string shown by a `Tj` operator
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match &self.kind {
            FontKind::Standard(_) => text
                .chars()
                .map(|ch| char_to_winansi(ch).unwrap_or(b'?'))
                .collect(),
            FontKind::TrueType(_) => {
                let mut out = Vec::with_capacity(text.len() * 2);
                for ch in text.chars() {
                    let gid = self.glyph_id(ch).unwrap_or(0);
                    out.extend_from_slice(&gid.to_be_bytes());
                }
                out
            }
        }
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        id: Id<Font>,
        writer: &mut Pdf,
    ) -> Result<(), ReportError> {
        let font_index = id.index();
        match &self.kind {
            FontKind::Standard(font) => {
                let font_id = refs.gen(RefType::Font(font_index));
                writer
                    .type1_font(font_id)
                    .base_font(Name(font.base_name().as_bytes()))
                    .encoding_predefined(Name(b"WinAnsiEncoding"));
            }
            FontKind::TrueType(face) => {
                let font_id = refs.gen(RefType::Font(font_index));
                let cid_font_id = write_cid(face, refs, font_index, writer)?;
                let to_unicode_id = write_to_unicode(face, refs, font_index, writer);

                let mut font = writer.type0_font(font_id);
                font.base_font(Name(format!("F{font_index}").as_bytes()));
                font.encoding_predefined(Name(b"Identity-H"));
                font.descendant_font(cid_font_id);
                font.to_unicode(to_unicode_id);
            }
        }
        Ok(())
    }
}

/// glyph id -> (char, advance) for every unicode-mapped glyph in the face
fn glyph_advances(face: &OwnedFace) -> HashMap<u16, (char, u16)> {
    let face = face.as_face_ref();
    let mut map: HashMap<u16, (char, u16)> = HashMap::new();
    let Some(cmap) = face.tables().cmap else {
        return map;
    };

    for subtable in cmap.subtables.into_iter().filter(|table| table.is_unicode()) {
        subtable.codepoints(|codepoint: u32| {
            let Ok(ch) = char::try_from(codepoint) else {
                return;
            };
            if let Some(gid) = subtable.glyph_index(codepoint).filter(|gid| gid.0 > 0) {
                let advance = face.glyph_hor_advance(gid).unwrap_or_default();
                map.entry(gid.0).or_insert((ch, advance));
            }
        });
    }

    map
}

fn write_cid(
    face: &OwnedFace,
    refs: &mut ObjectReferences,
    font_index: usize,
    writer: &mut Pdf,
) -> Result<Ref, ReportError> {
    let glyphs = glyph_advances(face);
    if glyphs.is_empty() {
        return Err(ReportError::EmptyFont);
    }
    let font_descriptor_id = write_descriptor(face, &glyphs, refs, font_index, writer);

    let id = refs.gen(RefType::CidFont(font_index));
    let scaling = 1000.0 / face.as_face_ref().units_per_em() as f32;

    let mut cid_font = writer.cid_font(id);
    cid_font.subtype(CidFontType::Type2);
    cid_font.base_font(Name(format!("F{font_index}").as_bytes()));
    cid_font.system_info(SystemInfo {
        registry: Str(b"Adobe"),
        ordering: Str(b"Identity"),
        supplement: 0,
    });
    cid_font.font_descriptor(font_descriptor_id);
    cid_font.default_width(1000.0);
    cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

    let mut id_widths: Vec<(u16, f32)> = glyphs
        .iter()
        .map(|(&gid, &(_, advance))| (gid, advance as f32 * scaling))
        .collect();
    id_widths.sort_by_key(|(gid, _)| *gid);

    // runs of consecutive glyph ids share one widths entry
    let mut widths = cid_font.widths();
    let mut start = id_widths[0].0;
    let mut run: Vec<f32> = Vec::new();
    for (gid, width) in id_widths {
        if gid as usize != start as usize + run.len() {
            widths.consecutive(start, run.drain(..));
            start = gid;
        }
        run.push(width);
    }
    if !run.is_empty() {
        widths.consecutive(start, run);
    }

    Ok(id)
}

fn write_descriptor(
    face: &OwnedFace,
    glyphs: &HashMap<u16, (char, u16)>,
    refs: &mut ObjectReferences,
    font_index: usize,
    writer: &mut Pdf,
) -> Ref {
    let data_id = refs.gen(RefType::FontData(font_index));
    writer
        .stream(data_id, face.as_slice())
        .pair(Name(b"Length1"), face.as_slice().len() as i32);

    let face_ref = face.as_face_ref();
    let scaling = 1000.0 / face_ref.units_per_em() as f32;
    let max_width = glyphs.values().map(|&(_, w)| w).max().unwrap_or_default() as f32;
    let avg_width =
        glyphs.values().map(|&(_, w)| w as f32).sum::<f32>() / glyphs.len().max(1) as f32;
    let bbox = face_ref.global_bounding_box();

    let id = refs.gen(RefType::FontDescriptor(font_index));
    let mut descriptor = writer.font_descriptor(id);
    descriptor.name(Name(format!("F{font_index}").as_bytes()));

    let mut flags = FontFlags::NON_SYMBOLIC;
    if face_ref.is_monospaced() {
        flags.insert(FontFlags::FIXED_PITCH);
    }
    if face_ref.is_italic() {
        flags.insert(FontFlags::ITALIC);
    }
    descriptor.flags(flags);
    descriptor.bbox(pdf_writer::Rect::new(
        bbox.x_min as f32 * scaling,
        bbox.y_min as f32 * scaling,
        bbox.x_max as f32 * scaling,
        bbox.y_max as f32 * scaling,
    ));
    descriptor.italic_angle(face_ref.italic_angle());
    descriptor.ascent(face_ref.ascender() as f32 * scaling);
    descriptor.descent(face_ref.descender() as f32 * scaling);
    descriptor.cap_height(
        face_ref
            .capital_height()
            .map(|h| h as f32 * scaling)
            .unwrap_or(1000.0),
    );
    // no reliable source for the stem width in the font tables
    descriptor.stem_v(80.0);
    descriptor.avg_width(avg_width * scaling);
    descriptor.max_width(max_width * scaling);
    descriptor.font_file2(data_id);

    id
}

fn write_to_unicode(
    face: &OwnedFace,
    refs: &mut ObjectReferences,
    font_index: usize,
    writer: &mut Pdf,
) -> Ref {
    let id = refs.gen(RefType::ToUnicode(font_index));

    let mut map = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo\n\
         << /Registry (Adobe)\n\
         /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );

    let mut ids: Vec<(u16, char)> = glyph_advances(face)
        .into_iter()
        .map(|(gid, (ch, _))| (gid, ch))
        .collect();
    ids.sort_by_key(|&(gid, _)| gid);

    // bfchar blocks hold at most 100 entries
    for block in ids.chunks(100) {
        map.push_str(&format!("{} beginbfchar\n", block.len()));
        for &(gid, ch) in block {
            let mut utf16 = [0u16; 2];
            let units: String = ch
                .encode_utf16(&mut utf16)
                .iter()
                .map(|unit| format!("{unit:04x}"))
                .collect();
            map.push_str(&format!("<{gid:04x}> <{units}>\n"));
        }
        map.push_str("endbfchar\n");
    }
    map.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");

    let compressed = miniz_oxide::deflate::compress_to_vec_zlib(map.as_bytes(), 6);
    writer
        .stream(id, compressed.as_slice())
        .filter(Filter::FlateDecode);

    id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Pt, b: Pt) -> bool {
        (a.0 - b.0).abs() < 1e-3
    }

    #[test]
    fn helvetica_matches_afm_widths() {
        let font = Font::helvetica();
        assert!(close(font.char_width('a', Pt(1000.0)), Pt(556.0)));
        assert!(close(font.char_width('i', Pt(1000.0)), Pt(222.0)));
        assert!(close(font.char_width('W', Pt(1000.0)), Pt(944.0)));
        assert!(close(font.char_width(' ', Pt(10.0)), Pt(2.78)));
    }

    #[test]
    fn accented_letters_use_base_widths() {
        let font = Font::helvetica();
        assert_eq!(font.char_width('á', Pt(10.0)), font.char_width('a', Pt(10.0)));
        assert_eq!(font.char_width('Ñ', Pt(10.0)), font.char_width('N', Pt(10.0)));
        assert!(close(font.char_width('í', Pt(1000.0)), Pt(278.0)));
    }

    #[test]
    fn bold_is_wider_than_regular() {
        let regular = Font::helvetica();
        let bold = Font::helvetica_bold();
        assert!(bold.char_width('n', Pt(9.0)) > regular.char_width('n', Pt(9.0)));
        assert_eq!(bold.ascent(Pt(10.0)), regular.ascent(Pt(10.0)));
        assert!(regular.descent(Pt(10.0)) < Pt(0.0));
    }

    #[test]
    fn standard_fonts_encode_winansi() {
        let font = Font::helvetica();
        assert_eq!(font.encode("Año °C…"), vec![b'A', 0xF1, b'o', b' ', 0xB0, b'C', 0x85]);
        assert_eq!(font.encode("日"), vec![b'?']);
    }

    #[test]
    fn unknown_characters_measure_as_question_mark() {
        let font = Font::helvetica_bold();
        assert_eq!(font.char_width('日', Pt(9.0)), font.char_width('?', Pt(9.0)));
    }

    #[test]
    fn rejects_garbage_font_data() {
        assert!(Font::load(vec![0, 1, 2, 3]).is_err());
    }
}
