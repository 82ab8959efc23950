#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use service_report::report::{ChecklistEntry, Photo, ReportRecord};
use service_report::Document;
use std::io::Cursor;

pub fn png(width: u32, height: u32, pixel: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(pixel));
    let mut out = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .expect("can encode png");
    out
}

pub fn record(equipment: &str, service: &str) -> ReportRecord {
    let mut record = ReportRecord::default();
    record.folio = "TIJ-0042".into();
    record.date = "2024-05-02".into();
    record.technician = "Juan Pérez".into();
    record.locality = "Tijuana".into();
    record.client.name = "Aceros del Norte".into();
    record.client.contact = "Ing. Laura Méndez".into();
    record.client.address = "Blvd. Industrial 1200, Parque Pacífico".into();
    record.equipment.kind = equipment.into();
    record.equipment.model = "GA37".into();
    record.equipment.serial = "API123456".into();
    record.equipment.brand = "atlas copco".into();
    record.equipment.power = "50".into();
    record.service.kind = service.into();
    record.service.description = "Servicio programado".into();
    record
}

pub fn photos(count: usize) -> Vec<Photo> {
    (0..count)
        .map(|i| Photo::new(png(40, 30, [(i * 20 % 256) as u8, 90, 160, 255]), format!("Vista {}", i + 1)))
        .collect()
}

/// 25 standard activities with the first `done` of them marked as done
pub fn checklist(done: usize) -> Vec<ChecklistEntry> {
    let flags: Vec<bool> = (0..25).map(|i| i < done).collect();
    ChecklistEntry::standard_catalogue(&flags, false)
}

/// Text of every page, in page order
pub fn page_texts(document: &Document) -> Vec<Vec<String>> {
    document
        .pages_in_order()
        .map(|page| page.spans().map(|s| s.text.clone()).collect())
        .collect()
}
