pub mod json_document_writer;

pub use json_document_writer::JsonDocumentWriter;
