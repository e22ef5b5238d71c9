//! Text extraction from real PDFs built in-memory.

mod common;

use papercast_common::DocumentSource;
use papercast_sources::{DocumentResolver, PdfExtractBackend, PdfTextExtractor, ResolverConfig, SourceError};

fn resolver() -> DocumentResolver {
    DocumentResolver::new(ResolverConfig::default()).unwrap()
}

#[tokio::test]
async fn single_page_hello_world() {
    let pdf = common::pdf_with_pages(&["Hello World"]);

    let doc = resolver().extract_from_upload("hello.pdf", pdf).await.unwrap();

    assert_eq!(doc.text.trim(), "Hello World");
    assert_eq!(
        doc.source,
        DocumentSource::Upload {
            file_name: "hello.pdf".into()
        }
    );
    assert_eq!(doc.metadata().title, "Hello World");
}

#[test]
fn backend_yields_one_entry_per_page() {
    let pdf = common::pdf_with_pages(&["Alpha section", "Beta section", "Gamma section"]);
    let pages = PdfExtractBackend.page_texts(&pdf).unwrap();
    assert_eq!(pages.len(), 3);
    assert!(pages[1].contains("Beta section"));
}

#[tokio::test]
async fn pages_are_concatenated_in_page_order() {
    let pdf = common::pdf_with_pages(&["Alpha section", "Beta section", "Gamma section"]);

    let doc = resolver().extract_from_upload("three.pdf", pdf).await.unwrap();

    let alpha = doc.text.find("Alpha section").expect("page 1 text");
    let beta = doc.text.find("Beta section").expect("page 2 text");
    let gamma = doc.text.find("Gamma section").expect("page 3 text");
    assert!(alpha < beta && beta < gamma, "pages out of order: {:?}", doc.text);
}

#[tokio::test]
async fn page_without_text_is_rejected() {
    let pdf = common::pdf_with_pages(&[""]);

    let err = resolver().extract_from_upload("scan.pdf", pdf).await.unwrap_err();

    assert!(matches!(err, SourceError::NoExtractableText(ref name) if name == "scan.pdf"));
    assert!(err.is_input_error());
}

#[tokio::test]
async fn non_pdf_upload_is_rejected() {
    let err = resolver()
        .extract_from_upload("notes.docx", b"PK\x03\x04word/document.xml".to_vec())
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::NotPdf(_)));
}
