mod common;

use common::{checklist, page_texts, photos, png, record};
use service_report::pagesize::{A5, LETTER};
use service_report::report::schema::titles;
use service_report::report::{
    ImageOutcome, LayoutConfig, Letterhead, Photo, ReportRecord, ReportRenderer,
};
use service_report::{Document, PageContents, Pt, Shape};
use std::collections::HashSet;

/// A record that exercises every block at once
fn full_record() -> ReportRecord {
    let mut record = record("Compresor libre de aceite", "Preventivo");
    record.checklist = checklist(25);
    record.other_activities = lipsum::lipsum(60);
    for i in 1..=10 {
        record.readings.insert(format!("dg_{i}"), format!("{} (psi)", 100 + i));
        record.readings.insert(format!("of_{i}"), format!("{} (°C)", 40 + i));
    }
    for key in ["v_carga", "v_descarga"] {
        for phase in ["l12", "l23", "l31"] {
            record.electrical.insert(format!("{key}_{phase}"), "460".into());
        }
    }
    for key in ["v_tierra", "i_carga", "i_descarga", "i_total"] {
        for phase in ["l1", "l2", "l3"] {
            record.electrical.insert(format!("{key}_{phase}"), "52.1".into());
        }
    }
    record.electrical.insert("i_placa".into(), "54".into());
    record.electrical.insert("rpm_vfd".into(), "1780".into());
    record.observations = lipsum::lipsum(400);
    record.photos = photos(4);
    record.technician_signature.name = "Juan Pérez".into();
    record.technician_signature.image = png(120, 40, [0, 0, 0, 200]).into();
    record.client_signature.name = "Laura Méndez".into();
    record
}

/// Section frames must stay between the header band and the footer band
fn assert_frames_within_flow_area(document: &Document, config: &LayoutConfig) {
    let bottom = config.content_bottom();
    let top = config.content_top();
    for page in document.pages_in_order() {
        for content in &page.contents {
            if let PageContents::Shape(shape) = content {
                if let Shape::RoundedRect(rect, _) = shape.shape {
                    // the footer band lives below the flow area
                    if rect.y2 <= bottom {
                        continue;
                    }
                    assert!(rect.y1 >= bottom - Pt(0.05), "frame crosses the bottom: {rect:?}");
                    assert!(rect.y2 <= top + Pt(0.05), "frame crosses the top: {rect:?}");
                }
            }
        }
    }
}

#[test]
fn renders_a_complete_report() {
    let _ = env_logger::try_init();
    let record = full_record();
    let renderer = ReportRenderer::new();
    let (pdf, summary) = renderer.render_with_summary(&record).expect("can render");
    assert!(pdf.starts_with(b"%PDF-"));
    assert!(summary.pages >= 2);
    assert_eq!(summary.checklist_columns, Some((13, 12)));
    assert_eq!(summary.photos, vec![ImageOutcome::Placed; 4]);
    assert_eq!(
        summary.signatures,
        vec![ImageOutcome::Placed, ImageOutcome::Missing]
    );
    assert_eq!(summary.section(titles::READINGS).map(|s| s.rows), Some(10));
    assert_eq!(summary.section(titles::OIL_FREE_READINGS).map(|s| s.rows), Some(10));
    assert_eq!(summary.section(titles::ELECTRICAL).map(|s| s.rows), Some(8));

    let (document, _) = renderer.layout(&record).expect("can lay out");
    assert_frames_within_flow_area(&document, renderer.config());
}

#[test]
fn every_page_carries_the_letterhead_once() {
    let record = full_record();
    let (document, summary) = ReportRenderer::new().layout(&record).expect("can lay out");
    let pages = page_texts(&document);
    assert_eq!(pages.len(), summary.pages);
    for page in &pages {
        assert_eq!(page.iter().filter(|t| *t == "TIJ-0042").count(), 1);
        assert_eq!(page.iter().filter(|t| *t == "REPORTE TÉCNICO").count(), 1);
        assert_eq!(page.iter().filter(|t| *t == "Fecha: 2024-05-02").count(), 1);
    }
}

#[test]
fn sections_appear_in_report_order() {
    let record = full_record();
    let (_, summary) = ReportRenderer::new().layout(&record).expect("can lay out");
    let order: Vec<&str> = summary.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(
        order,
        vec![
            titles::CLIENT,
            titles::SERVICE,
            titles::EQUIPMENT,
            titles::CHECKLIST,
            titles::READINGS,
            titles::OIL_FREE_READINGS,
            titles::ELECTRICAL,
            titles::OBSERVATIONS,
            titles::PHOTOS,
            titles::SIGNATURES,
        ]
    );
    // pages only ever increase through the report
    let firsts: Vec<usize> = summary.sections.iter().map(|s| s.pages[0]).collect();
    assert!(firsts.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn alternate_page_sizes_keep_frames_inside_the_page() {
    let record = full_record();
    for size in [A5, LETTER] {
        let config = LayoutConfig::default().with_page_size(size);
        let renderer = ReportRenderer::new().with_config(config);
        let (document, summary) = renderer.layout(&record).expect("can lay out");
        assert_eq!(document.page_count(), summary.pages);
        assert_frames_within_flow_area(&document, renderer.config());
        assert_eq!(summary.photos.len(), 4);
    }
}

#[test]
fn smaller_pages_need_more_of_them() {
    let record = full_record();
    let a4 = ReportRenderer::new().layout(&record).expect("can lay out").1;
    let a5 = ReportRenderer::new()
        .with_config(LayoutConfig::default().with_page_size(A5))
        .layout(&record)
        .expect("can lay out")
        .1;
    assert!(a5.pages > a4.pages);
}

#[test]
fn long_observations_span_pages() {
    let mut record = record("Compresor de tornillo", "Revisión");
    record.observations = lipsum::lipsum(3000);
    let (_, summary) = ReportRenderer::new().layout(&record).expect("can lay out");
    let observations = summary
        .section(titles::OBSERVATIONS)
        .expect("observations are printed");
    assert!(observations.pages.len() >= 2);
    assert!(summary.pages >= 3);
}

#[test]
fn long_service_descriptions_continue_on_the_next_page() {
    let mut record = record("Compresor de tornillo", "Correctivo");
    record.service.description = lipsum::lipsum(1500);
    record.client.address = lipsum::lipsum(300);
    let renderer = ReportRenderer::new();
    let (document, summary) = renderer.layout(&record).expect("can lay out");
    assert_frames_within_flow_area(&document, renderer.config());

    let service = summary.section(titles::SERVICE).expect("service is printed");
    assert_eq!(service.rows, 1);
    assert!(service.pages.len() >= 2);
    assert_eq!(summary.section(titles::CLIENT).map(|s| s.rows), Some(3));

    let words: HashSet<String> = page_texts(&document)
        .concat()
        .iter()
        .flat_map(|span| span.split_whitespace().map(str::to_string).collect::<Vec<_>>())
        .collect();
    for word in record.service.description.split_whitespace() {
        assert!(words.contains(word), "{word} is printed");
    }
}

#[test]
fn blank_photo_captions_print_the_sentinel() {
    let mut record = record("Compresor de tornillo", "Preventivo");
    record.photos = vec![
        Photo::new(png(20, 20, [10, 10, 10, 255]), ""),
        Photo::new(png(20, 20, [10, 10, 10, 255]), "N/A"),
        Photo::new(png(20, 20, [10, 10, 10, 255]), "Tablero"),
    ];
    let (document, _) = ReportRenderer::new().layout(&record).expect("can lay out");
    let text: Vec<String> = page_texts(&document).concat();
    assert!(text.contains(&"Foto 1: N/A".to_string()));
    assert!(text.contains(&"Foto 2: N/A".to_string()));
    assert!(text.contains(&"Foto 3: Tablero".to_string()));
}

#[test]
fn broken_images_do_not_abort_the_render() {
    let mut record = record("Compresor de tornillo", "Preventivo");
    record.photos = vec![
        Photo::new(vec![0x89, b'P', b'N', b'G', 0, 0], "Corrupta"),
        Photo::new(png(10, 10, [255, 255, 255, 255]), "Buena"),
        Photo::new("/definitely/not/here.png".to_string(), "Perdida"),
    ];
    record.client_signature.image = "data:image/png;base64,@@@".to_string().into();

    let (pdf, summary) = ReportRenderer::new()
        .render_with_summary(&record)
        .expect("renders despite bad images");
    assert!(pdf.starts_with(b"%PDF-"));
    assert_eq!(
        summary.photos,
        vec![
            ImageOutcome::Invalid,
            ImageOutcome::Placed,
            ImageOutcome::Missing
        ]
    );
    assert_eq!(summary.signatures[1], ImageOutcome::Invalid);
}

#[test]
fn renders_from_json() {
    let json = r#"{
        "folio": "MXL-0311",
        "date": "2024-09-14",
        "technician": "Luis Ortega",
        "locality": "Mexicali",
        "client": {"name": "Empacadora del Valle", "phone": "686 555 0101"},
        "equipment": {"type": "Secador refrigerativo", "brand": "KAESER", "power": "200"},
        "service": {"type": "Preventivo", "description": "Mantenimiento trimestral"},
        "checklist": [
            {"activity": "Limpieza trampa de condensados", "status": "Realizado"},
            {"activity": "Cambio de filtro de aire"}
        ],
        "readings": {"sec_5": "3 (°C)", "sec_prefiltro": "Saturado"},
        "electrical": {"i_carga_l1": "12.4", "i_placa": "15"},
        "observations": "Se recomienda cambiar el prefiltro en la próxima visita.",
        "photos": [{"image": "N/A", "caption": "Sin foto"}]
    }"#;
    let record = ReportRecord::from_json(json).expect("valid record");
    let (pdf, summary) = ReportRenderer::new()
        .render_with_summary(&record)
        .expect("can render");
    assert!(pdf.starts_with(b"%PDF-"));
    assert_eq!(summary.checklist_columns, Some((1, 0)));
    assert_eq!(summary.section(titles::DRYER_READINGS).map(|s| s.rows), Some(2));
    // dryers only report the three-phase load rows
    assert_eq!(summary.section(titles::ELECTRICAL).map(|s| s.rows), Some(1));
    assert!(summary.photos.is_empty());
    assert!(!summary.has_section(titles::PHOTOS));
    assert_eq!(record.suggested_file_name(), "REPORTE_PREVENTIVO_Empacadora_del_Valle.pdf");
}

#[test]
fn letterhead_logo_is_painted_on_every_page() {
    let mut record = record("Compresor de tornillo", "Correctivo");
    record.observations = lipsum::lipsum(1500);
    let letterhead = Letterhead::default().with_logo(png(60, 20, [0, 70, 140, 255]));
    let (document, summary) = ReportRenderer::new()
        .with_letterhead(letterhead)
        .layout(&record)
        .expect("can lay out");
    assert!(summary.pages > 1);
    for page in document.pages_in_order() {
        let images = page
            .contents
            .iter()
            .filter(|c| matches!(c, PageContents::Image(_)))
            .count();
        assert!(images >= 1);
    }
}

#[test]
fn renders_are_independent() {
    let record = full_record();
    let renderer = ReportRenderer::new();
    let handles: Vec<_> = (0..3)
        .map(|_| {
            let renderer = renderer.clone();
            let record = record.clone();
            std::thread::spawn(move || renderer.render_with_summary(&record).map(|(_, s)| s.pages))
        })
        .collect();
    let pages: Vec<usize> = handles
        .into_iter()
        .map(|h| h.join().expect("thread finished").expect("can render"))
        .collect();
    assert!(pages.windows(2).all(|w| w[0] == w[1]));
}
