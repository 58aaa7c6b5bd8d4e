use std::fmt;

/// Income and expense entries share one shape but live in separate tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn table(self) -> &'static str {
        match self {
            Self::Income => "incomes",
            Self::Expense => "expenses",
        }
    }

    /// Route segment under `/api/v1`.
    pub fn path(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Human name; also the spreadsheet's sheet name.
    pub fn title(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    /// Column header for the label field in exports.
    pub fn label_header(self) -> &'static str {
        match self {
            Self::Income => "Source",
            Self::Expense => "Category",
        }
    }

    pub fn export_file_name(self) -> &'static str {
        match self {
            Self::Income => "income_details.xlsx",
            Self::Expense => "expense_details.xlsx",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
