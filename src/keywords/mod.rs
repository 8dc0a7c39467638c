// Keyword records, text normalization, and entity extraction.

pub mod entities;
pub mod normalizer;
pub mod record;
