//! Fixture PDFs for the integration tests.

use lopdf::{dictionary, Document, Object, Stream};

/// One-page PDF whose content stream draws `text` with font `/F1`.
pub fn syllabus_pdf(text: &str) -> Vec<u8> {
    single_page_pdf("F1", text)
}

/// Like `syllabus_pdf`, but the page draws with `/F9`, which its resources
/// never declare.
pub fn pdf_with_undeclared_font(text: &str) -> Vec<u8> {
    single_page_pdf("F9", text)
}

fn single_page_pdf(font_in_content: &str, text: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.4");

    let helvetica = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let content = format!("BT /{font_in_content} 12 Tf 72 720 Td ({text}) Tj ET");
    let contents = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

    let page = doc.add_object(dictionary! {
        "Type" => "Page",
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Contents" => contents,
        "Resources" => dictionary! { "Font" => dictionary! { "F1" => helvetica } },
    });
    let pages = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page.into()],
        "Count" => 1,
    });
    if let Ok(Object::Dictionary(page_dict)) = doc.get_object_mut(page) {
        page_dict.set("Parent", pages);
    }
    let catalog = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages,
    });
    doc.trailer.set("Root", catalog);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}
