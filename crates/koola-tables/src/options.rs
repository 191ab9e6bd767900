use std::collections::BTreeSet;
use std::str::FromStr;

pub const DEFAULT_SHEET_NAME: &str = "Combined_Data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMode {
    /// Promote the first row when its trimmed labels are pairwise distinct.
    AutoDetect,
    NoHeader,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Xlsx,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unsupported output format: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    pages: BTreeSet<u32>,
}

impl PageSelection {
    #[must_use]
    pub fn contains(&self, page: u32) -> bool {
        self.pages.contains(&page)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl FromStr for PageSelection {
    type Err = String;

    fn from_str(selection: &str) -> Result<Self, Self::Err> {
        let mut pages = BTreeSet::new();
        for token in selection.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if let Some((start, end)) = token.split_once('-') {
                let start: u32 = start
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid page range start: '{start}'"))?;
                let end: u32 = end
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid page range end: '{end}'"))?;
                if start == 0 || end == 0 {
                    return Err("pages are 1-based".to_string());
                }
                if end < start {
                    return Err(format!(
                        "invalid range '{token}': end is smaller than start"
                    ));
                }
                pages.extend(start..=end);
            } else {
                let page: u32 = token
                    .parse()
                    .map_err(|_| format!("invalid page number: '{token}'"))?;
                if page == 0 {
                    return Err("pages are 1-based".to_string());
                }
                pages.insert(page);
            }
        }

        if pages.is_empty() {
            return Err("page selection cannot be empty".to_string());
        }

        Ok(Self { pages })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    pub pages: Option<PageSelection>,
    pub header_mode: HeaderMode,
    pub min_cols: usize,
    pub delimiter: u8,
    pub sheet_name: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            pages: None,
            header_mode: HeaderMode::AutoDetect,
            min_cols: 2,
            delimiter: b',',
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }
}
