use crate::refs::{ObjectReferences, RefType};
use base64::Engine;
use image::{ColorType, DynamicImage, GenericImageView, ImageFormat, RgbImage};
use miniz_oxide::deflate::compress_to_vec_zlib;
use pdf_writer::{Filter, Finish, Pdf};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Base64(#[from] base64::DecodeError),

    #[error("malformed data URI: {0}")]
    DataUri(String),
}

/// Where a photo or signature comes from. Form submissions deliver either
/// uploaded bytes or a data URI (signature pads); stored reports refer to
/// files on disk.
///
/// When deserialized from a string, `data:` URIs become [ImageSource::DataUri],
/// the empty string and the `"N/A"` sentinel become [ImageSource::Missing] and
/// anything else is treated as a file path.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "String")]
pub enum ImageSource {
    #[default]
    Missing,
    Bytes(Vec<u8>),
    DataUri(String),
    Path(PathBuf),
}

impl From<String> for ImageSource {
    fn from(s: String) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == crate::report::NOT_AVAILABLE {
            ImageSource::Missing
        } else if trimmed.starts_with("data:") {
            ImageSource::DataUri(trimmed.to_string())
        } else {
            ImageSource::Path(PathBuf::from(trimmed))
        }
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        if bytes.is_empty() {
            ImageSource::Missing
        } else {
            ImageSource::Bytes(bytes)
        }
    }
}

impl ImageSource {
    pub fn is_missing(&self) -> bool {
        matches!(self, ImageSource::Missing)
    }

    /// Resolve the source to raw encoded image bytes. `Ok(None)` means there
    /// is nothing to load: no source was supplied, or the file is gone.
    pub fn read_bytes(&self) -> Result<Option<Vec<u8>>, ImageError> {
        match self {
            ImageSource::Missing => Ok(None),
            ImageSource::Bytes(bytes) => Ok(Some(bytes.clone())),
            ImageSource::DataUri(uri) => decode_data_uri(uri).map(Some),
            ImageSource::Path(path) => match std::fs::read(path) {
                Ok(bytes) => Ok(Some(bytes)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            },
        }
    }
}

/// Decode a `data:image/png;base64,....` URI into its payload bytes
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, ImageError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| ImageError::DataUri("missing `data:` prefix".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ImageError::DataUri("missing `,` separator".into()))?;
    if !header.ends_with(";base64") {
        return Err(ImageError::DataUri(format!(
            "only base64 payloads are supported, got `{header}`"
        )));
    }
    let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(base64::engine::general_purpose::STANDARD.decode(payload)?)
}

/// The outcome of trying to load an image source
pub enum ImageLoad {
    Loaded(Image),
    /// Nothing was supplied, or the referenced file does not exist
    Missing,
    /// Something was supplied but could not be read or decoded
    Invalid(ImageError),
}

impl ImageLoad {
    pub fn from_source(source: &ImageSource) -> ImageLoad {
        match source.read_bytes() {
            Ok(None) => ImageLoad::Missing,
            Ok(Some(bytes)) => match Image::from_bytes(bytes) {
                Ok(image) => ImageLoad::Loaded(image),
                Err(e) => ImageLoad::Invalid(e),
            },
            Err(e) => ImageLoad::Invalid(e),
        }
    }
}

pub enum RasterData {
    /// Baseline RGB JPEG data that PDF viewers decode natively
    Jpeg(Vec<u8>),
    Decoded(DynamicImage),
}

/// A raster image ready to be embedded in the document
pub struct Image {
    pub data: RasterData,
    pub width: u32,
    pub height: u32,
}

struct EncodeOutput {
    filter: Filter,
    bytes: Vec<u8>,
    mask: Option<Vec<u8>>,
}

impl Image {
    /// Decode encoded image bytes (PNG, JPEG, and anything else the `image`
    /// crate can guess). RGB JPEGs are kept as-is and embedded directly.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Image, ImageError> {
        let format = image::guess_format(&bytes)?;
        let image = image::load_from_memory_with_format(&bytes, format)?;

        match (format, image.color()) {
            (ImageFormat::Jpeg, ColorType::Rgb8) => {
                let (width, height) = image.dimensions();
                Ok(Image {
                    data: RasterData::Jpeg(bytes),
                    width,
                    height,
                })
            }
            _ => Ok(Image::from_dynamic(image)),
        }
    }

    pub fn from_dynamic(image: DynamicImage) -> Image {
        let (width, height) = image.dimensions();
        Image {
            data: RasterData::Decoded(image),
            width,
            height,
        }
    }

    pub fn has_alpha(&self) -> bool {
        match &self.data {
            RasterData::Jpeg(_) => false,
            RasterData::Decoded(image) => image.color().has_alpha(),
        }
    }

    /// Composite the image over an opaque white background. Signature pads
    /// export transparent strokes, which would otherwise render on a black
    /// background in some viewers.
    pub fn on_white(self) -> Image {
        let RasterData::Decoded(image) = &self.data else {
            return self;
        };
        if !image.color().has_alpha() {
            return self;
        }

        let rgba = image.to_rgba8();
        let flattened = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            let [r, g, b, a] = rgba.get_pixel(x, y).0;
            let alpha = a as u16;
            let blend = |c: u8| ((c as u16 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
            image::Rgb([blend(r), blend(g), blend(b)])
        });
        Image::from_dynamic(DynamicImage::ImageRgb8(flattened))
    }

    fn encode(&self) -> EncodeOutput {
        match &self.data {
            RasterData::Jpeg(bytes) => EncodeOutput {
                filter: Filter::DctDecode,
                bytes: bytes.clone(),
                mask: None,
            },
            RasterData::Decoded(image) => {
                let level = 6;
                let mask = image.color().has_alpha().then(|| {
                    let alphas: Vec<u8> = image.to_rgba8().pixels().map(|p| p.0[3]).collect();
                    compress_to_vec_zlib(&alphas, level)
                });
                let bytes = compress_to_vec_zlib(image.to_rgb8().as_raw(), level);

                EncodeOutput {
                    filter: Filter::FlateDecode,
                    bytes,
                    mask,
                }
            }
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, image_index: usize, writer: &mut Pdf) {
        let id = refs.gen(RefType::Image(image_index));
        let encoded = self.encode();

        let mask_id = encoded
            .mask
            .as_ref()
            .map(|_| refs.gen(RefType::ImageMask(image_index)));

        let mut image = writer.image_xobject(id, encoded.bytes.as_slice());
        image.filter(encoded.filter);
        image.width(self.width as i32);
        image.height(self.height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        if let Some(mask_id) = mask_id {
            image.s_mask(mask_id);
        }
        image.finish();

        // add a transparency mask if we have one
        if let (Some(mask_id), Some(mask)) = (mask_id, encoded.mask.as_ref()) {
            let mut s_mask = writer.image_xobject(mask_id, mask.as_slice());
            s_mask.filter(Filter::FlateDecode);
            s_mask.width(self.width as i32);
            s_mask.height(self.height as i32);
            s_mask.color_space().device_gray();
            s_mask.bits_per_component(8);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::io::Cursor;

    pub(crate) fn png_bytes(width: u32, height: u32, pixel: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba(pixel));
        let mut out = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .expect("can encode png");
        out
    }

    #[test]
    fn strings_map_to_sources() {
        assert_eq!(ImageSource::from(String::new()), ImageSource::Missing);
        assert_eq!(ImageSource::from("N/A".to_string()), ImageSource::Missing);
        assert!(matches!(
            ImageSource::from("data:image/png;base64,AAAA".to_string()),
            ImageSource::DataUri(_)
        ));
        assert_eq!(
            ImageSource::from("photos/1.png".to_string()),
            ImageSource::Path(PathBuf::from("photos/1.png"))
        );
    }

    #[test]
    fn decodes_data_uris() {
        let png = png_bytes(2, 2, [255, 0, 0, 255]);
        let uri = format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&png)
        );
        assert_eq!(decode_data_uri(&uri).expect("valid uri"), png);
        assert!(decode_data_uri("data:image/png,rawtext").is_err());
        assert!(decode_data_uri("image/png;base64,AAAA").is_err());
    }

    #[test]
    fn load_distinguishes_missing_from_invalid() {
        assert!(matches!(
            ImageLoad::from_source(&ImageSource::Missing),
            ImageLoad::Missing
        ));
        assert!(matches!(
            ImageLoad::from_source(&ImageSource::Path("/definitely/not/here.png".into())),
            ImageLoad::Missing
        ));
        assert!(matches!(
            ImageLoad::from_source(&ImageSource::Bytes(b"not an image".to_vec())),
            ImageLoad::Invalid(_)
        ));
        match ImageLoad::from_source(&ImageSource::Bytes(png_bytes(4, 3, [0, 0, 0, 255]))) {
            ImageLoad::Loaded(image) => assert_eq!((image.width, image.height), (4, 3)),
            _ => panic!("expected a decoded image"),
        }
    }

    #[test]
    fn transparent_pixels_become_white() {
        let image = Image::from_bytes(png_bytes(1, 1, [0, 0, 0, 0])).expect("valid png");
        assert!(image.has_alpha());
        let flat = image.on_white();
        assert!(!flat.has_alpha());
        match flat.data {
            RasterData::Decoded(img) => assert_eq!(img.to_rgb8().get_pixel(0, 0).0, [255, 255, 255]),
            RasterData::Jpeg(_) => panic!("png should stay decoded"),
        }
    }

    #[test]
    fn opaque_ink_is_kept() {
        let image = Image::from_bytes(png_bytes(1, 1, [10, 20, 30, 255])).expect("valid png");
        match image.on_white().data {
            RasterData::Decoded(img) => assert_eq!(img.to_rgb8().get_pixel(0, 0).0, [10, 20, 30]),
            RasterData::Jpeg(_) => panic!("png should stay decoded"),
        }
    }
}
