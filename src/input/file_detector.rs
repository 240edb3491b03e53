//! File type detection

#[derive(Debug, Clone, PartialEq)]
pub enum FileType {
    Pdf,
    Word,
    /// Everything else is read as raw text, including .txt
    Plain,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "doc" | "docx" => FileType::Word,
            _ => FileType::Plain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_routing() {
        assert_eq!(FileType::from_extension("pdf"), FileType::Pdf);
        assert_eq!(FileType::from_extension("PDF"), FileType::Pdf);
        assert_eq!(FileType::from_extension("doc"), FileType::Word);
        assert_eq!(FileType::from_extension("docx"), FileType::Word);
        assert_eq!(FileType::from_extension("txt"), FileType::Plain);
        assert_eq!(FileType::from_extension("rtf"), FileType::Plain);
    }
}
