// Document sources: arXiv topic search, PDF download and PDF text extraction.
// Everything here returns plain-text Documents; nothing is stored.

pub mod arxiv;
pub mod error;
pub mod pdf;
pub mod resolver;
mod scratch;

pub use arxiv::{parse_pdf_links, ArxivClient, MAX_RESULTS};
pub use error::{Result, SourceError};
pub use pdf::{looks_like_pdf, PdfExtractBackend, PdfTextExtractor};
pub use resolver::{DocumentResolver, FetchedPaper, ResolverConfig};
