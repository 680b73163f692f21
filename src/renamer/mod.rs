//! リネームパイプライン - 画像およびPDF

mod images;
mod pdfs;

pub use images::{ImageRenamer, TempImage};
pub use pdfs::PdfRenamer;
